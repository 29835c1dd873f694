//! Declarative route table and the guard that evaluates it

use hr_shared::{const_config::screen::*, uac::Role};

use crate::session::Session;

/// Screens the client can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum View {
    Login,
    Dashboard,
    Employees,
    Departments,
    /// Aggregate attendance of all employees
    AttendanceReport,
    /// Self service check in / check out
    EmployeeAttendance,
    LeaveRequest,
    OvertimeReport,
    EmployeeOvertime,
    Profile,
    Statistics,
    ActivityReport,
    ActivityLogs,
    NotFound,
}

impl View {
    /// Protected views are the ones only shown to logged in users
    pub fn is_protected(&self) -> bool {
        !matches!(self, View::Login | View::NotFound)
    }
}

/// Outcome of evaluating a path against the session
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Render(View),
    Redirect(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPattern {
    Exact(&'static str),
    /// Matches the path itself and everything below it
    Subtree(&'static str),
}

/// Who may see a route and what they get
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Only for logged out users
    Public(View),
    /// Logged in users are sent on to another screen
    Forward(&'static str),
    /// Any logged in user
    Authenticated(View),
    AdminOnly(View),
    /// Other roles are sent to the screen they use for the same purpose
    EmployeeOnly {
        view: View,
        admin_equivalent: &'static str,
    },
    /// Same path, different screen depending on the role
    RoleSplit { admin: View, employee: View },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub pattern: PathPattern,
    pub access: Access,
}

pub const ROUTES: &[Route] = &[
    Route {
        pattern: PathPattern::Exact(SCREEN_LOGIN),
        access: Access::Public(View::Login),
    },
    Route {
        pattern: PathPattern::Exact(SCREEN_ROOT),
        access: Access::Forward(SCREEN_DEFAULT_LANDING),
    },
    Route {
        pattern: PathPattern::Exact(SCREEN_DASHBOARD),
        access: Access::Authenticated(View::Dashboard),
    },
    Route {
        pattern: PathPattern::Subtree(SCREEN_EMPLOYEES),
        access: Access::AdminOnly(View::Employees),
    },
    Route {
        pattern: PathPattern::Subtree(SCREEN_DEPARTMENTS),
        access: Access::AdminOnly(View::Departments),
    },
    Route {
        pattern: PathPattern::Exact(SCREEN_ATTENDANCE),
        access: Access::RoleSplit {
            admin: View::AttendanceReport,
            employee: View::EmployeeAttendance,
        },
    },
    Route {
        pattern: PathPattern::Exact(SCREEN_LEAVE_REQUEST),
        access: Access::EmployeeOnly {
            view: View::LeaveRequest,
            admin_equivalent: SCREEN_ATTENDANCE,
        },
    },
    Route {
        pattern: PathPattern::Exact(SCREEN_OVERTIME),
        access: Access::RoleSplit {
            admin: View::OvertimeReport,
            employee: View::EmployeeOvertime,
        },
    },
    Route {
        pattern: PathPattern::Exact(SCREEN_PROFILE),
        access: Access::Authenticated(View::Profile),
    },
    Route {
        pattern: PathPattern::Exact(SCREEN_REPORTS),
        access: Access::AdminOnly(View::Statistics),
    },
    Route {
        pattern: PathPattern::Exact(SCREEN_REPORTS_ACTIVITY),
        access: Access::AdminOnly(View::ActivityReport),
    },
    Route {
        pattern: PathPattern::Exact(SCREEN_ACTIVITY_LOGS),
        access: Access::AdminOnly(View::ActivityLogs),
    },
];

impl PathPattern {
    /// Expects `path` to already be normalized. Matching ignores ASCII case.
    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Exact(pattern) => path.eq_ignore_ascii_case(pattern),
            PathPattern::Subtree(base) => {
                let Some(head) = path.get(..base.len()) else {
                    return false;
                };
                let rest = &path[base.len()..];
                head.eq_ignore_ascii_case(base) && (rest.is_empty() || rest.starts_with('/'))
            }
        }
    }
}

/// Removes query and fragment and collapses empty segments so that
/// `/employees/?page=2` and `/employees` are the same screen
pub fn normalize_path(path: &str) -> String {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let segments: Vec<&str> = path[..end].split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

/// True for the login screen in any spelling the router would accept
pub fn is_login_path(path: &str) -> bool {
    PathPattern::Exact(SCREEN_LOGIN).matches(&normalize_path(path))
}

/// First route whose pattern matches, if any
pub fn find_route(path: &str) -> Option<&'static Route> {
    let path = normalize_path(path);
    ROUTES.iter().find(|route| route.pattern.matches(&path))
}

/// Decides what to show for `path` given the session
///
/// Paths that match no route render [`View::NotFound`] whether or not a user
/// is logged in.
pub fn decide(path: &str, session: &Session) -> Decision {
    let Some(route) = find_route(path) else {
        return Decision::Render(View::NotFound);
    };

    match (route.access, session.role()) {
        (Access::Public(_), Some(_)) => Decision::Redirect(SCREEN_DEFAULT_LANDING),
        (Access::Public(view), None) => Decision::Render(view),
        (_, None) => Decision::Redirect(SCREEN_LOGIN),
        (Access::Forward(target), Some(_)) => Decision::Redirect(target),
        (Access::Authenticated(view), Some(_)) => Decision::Render(view),
        (Access::AdminOnly(view), Some(Role::Admin)) => Decision::Render(view),
        (Access::AdminOnly(_), Some(Role::Employee)) => Decision::Redirect(SCREEN_DEFAULT_LANDING),
        (Access::EmployeeOnly { view, .. }, Some(Role::Employee)) => Decision::Render(view),
        (
            Access::EmployeeOnly {
                admin_equivalent, ..
            },
            Some(Role::Admin),
        ) => Decision::Redirect(admin_equivalent),
        (Access::RoleSplit { admin, .. }, Some(Role::Admin)) => Decision::Render(admin),
        (Access::RoleSplit { employee, .. }, Some(Role::Employee)) => Decision::Render(employee),
    }
}
