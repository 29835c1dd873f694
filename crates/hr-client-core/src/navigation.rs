//! Sidebar menu entries and which roles see them

use hr_shared::{const_config::screen::*, uac::Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub name: &'static str,
    pub path: &'static str,
    /// `None` means every logged in user sees the entry
    pub roles: Option<&'static [Role]>,
    pub children: &'static [MenuEntry],
}

const ADMIN: &[Role] = &[Role::Admin];
const EMPLOYEE: &[Role] = &[Role::Employee];

const fn entry(name: &'static str, path: &'static str, roles: Option<&'static [Role]>) -> MenuEntry {
    MenuEntry {
        name,
        path,
        roles,
        children: &[],
    }
}

pub const MENU: &[MenuEntry] = &[
    entry("Dashboard", SCREEN_DASHBOARD, None),
    entry("Employees", SCREEN_EMPLOYEES, Some(ADMIN)),
    entry("Departments", SCREEN_DEPARTMENTS, Some(ADMIN)),
    entry("Attendance", SCREEN_ATTENDANCE, None),
    entry("Leave Request", SCREEN_LEAVE_REQUEST, Some(EMPLOYEE)),
    entry("Overtime", SCREEN_OVERTIME, None),
    MenuEntry {
        name: "Reports & Statistics",
        path: SCREEN_REPORTS,
        roles: Some(ADMIN),
        children: &[
            entry("Overview", SCREEN_REPORTS, None),
            entry("Activity History", SCREEN_REPORTS_ACTIVITY, None),
        ],
    },
    entry("Activity Logs", SCREEN_ACTIVITY_LOGS, Some(ADMIN)),
    entry("Profile", SCREEN_PROFILE, None),
];

impl MenuEntry {
    pub fn is_visible_to(&self, role: Role) -> bool {
        self.roles.map_or(true, |roles| roles.contains(&role))
    }
}

/// Top level menu entries `role` may see, in display order
pub fn visible_menu(role: Role) -> impl Iterator<Item = &'static MenuEntry> {
    MENU.iter().filter(move |entry| entry.is_visible_to(role))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        routes::{decide, Decision},
        session::{
            tests::{test_token, test_user},
            AuthenticatedSession, Session,
        },
    };

    fn names(role: Role) -> Vec<&'static str> {
        visible_menu(role).map(|x| x.name).collect()
    }

    #[test]
    fn employee_menu() {
        assert_eq!(
            names(Role::Employee),
            [
                "Dashboard",
                "Attendance",
                "Leave Request",
                "Overtime",
                "Profile"
            ]
        );
    }

    #[test]
    fn admin_menu_hides_employee_only_entries() {
        let admin = names(Role::Admin);
        assert!(admin.contains(&"Activity Logs"));
        assert!(!admin.contains(&"Leave Request"));
    }

    #[test]
    fn visible_entries_render_for_their_role() {
        for role in [Role::Admin, Role::Employee] {
            // Arrange
            let session = Session::LoggedIn(AuthenticatedSession {
                user: test_user(role),
                token: test_token("tok"),
                last_screen: None,
            });

            for entry in visible_menu(role) {
                for target in std::iter::once(entry).chain(entry.children) {
                    // Act
                    let decision = decide(target.path, &session);

                    // Assert
                    assert!(
                        matches!(decision, Decision::Render(view) if view.is_protected()),
                        "{role} sees {:?} but gets {decision:?}",
                        target.path
                    );
                }
            }
        }
    }
}
