use hr_shared::const_config::screen::{SCREEN_DEFAULT_LANDING, SCREEN_ROOT};
use tracing::info;

use crate::{
    routes::{is_login_path, normalize_path},
    session::SessionStore,
    storage::SessionStorage,
};

/// What happened when the persisted session was read at startup
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Restoration {
    /// Nothing usable was persisted, the user has to log in
    NoSession,
    /// A session was already active so storage was not consulted
    AlreadyAuthenticated,
    /// The persisted session is now the active session
    Restored {
        /// Where to go instead of the requested path. `None` means the
        /// requested path should be shown as is (deep link).
        redirect_to: Option<String>,
    },
}

impl Restoration {
    /// The redirect to apply, if any
    pub fn redirect_to(&self) -> Option<&str> {
        match self {
            Restoration::Restored { redirect_to } => redirect_to.as_deref(),
            Restoration::NoSession | Restoration::AlreadyAuthenticated => None,
        }
    }
}

impl<S: SessionStorage> SessionStore<S> {
    /// Re-establishes a persisted session. Must run before the first route
    /// decision.
    ///
    /// Only redirects when starting at the login or root screen, in which
    /// case the user is returned to their last screen (or the default
    /// landing screen).
    #[tracing::instrument(skip(self), ret)]
    pub fn restore(&mut self, current_path: &str) -> Restoration {
        if self.session().is_authenticated() {
            return Restoration::AlreadyAuthenticated;
        }
        let Some(session) = self.load_persisted() else {
            return Restoration::NoSession;
        };
        let is_entry_path =
            is_login_path(current_path) || normalize_path(current_path) == SCREEN_ROOT;
        let redirect_to = if is_entry_path {
            let target = session
                .last_screen()
                .map(|x| x.path.clone())
                .unwrap_or_else(|| SCREEN_DEFAULT_LANDING.to_string());
            Some(target)
        } else {
            None
        };
        info!(role = ?session.role(), "session restored");
        self.adopt(session);
        Restoration::Restored { redirect_to }
    }
}

#[cfg(test)]
mod tests {
    use hr_shared::{const_config::storage::STORAGE_AUTH_STATE_KEY, uac::Role};
    use rstest::rstest;

    use super::*;
    use crate::{
        session::{
            tests::{new_store, test_token, test_user},
            ScreenData,
        },
        storage::MemoryStorage,
    };

    const EMPLOYEE_WITH_LAST_SCREEN: &str = r#"{"isAuthenticated":true,"user":{"id":"7","email":"em@hr.io","name":"Em","role":"employee"},"token":"abc","lastScreen":{"path":"/attendance/leave-request","timestamp":1700000000000}}"#;

    #[test]
    fn login_survives_reload() {
        // Arrange
        let user = test_user(Role::Admin);
        let mut store = new_store(MemoryStorage::new());
        store.login(user.clone(), test_token("tok123"));

        // Act - Simulate reload
        let mut reloaded = new_store(store.into_storage());
        let outcome = reloaded.restore("/dashboard");

        // Assert
        assert_eq!(outcome, Restoration::Restored { redirect_to: None });
        assert!(reloaded.session().is_authenticated());
        assert_eq!(reloaded.session().user(), Some(&user));
        assert_eq!(reloaded.session().token(), Some(&test_token("tok123")));
        assert!(reloaded.api_client().has_bearer_token());
    }

    #[rstest]
    #[case::root("/")]
    #[case::login("/login")]
    #[case::login_trailing_slash("/login/")]
    #[case::login_mixed_case("/Login")]
    fn returns_to_last_screen(#[case] start: &str) {
        // Arrange
        let storage =
            MemoryStorage::new().with_entry(STORAGE_AUTH_STATE_KEY, EMPLOYEE_WITH_LAST_SCREEN);
        let mut store = new_store(storage);

        // Act
        let outcome = store.restore(start);

        // Assert
        assert_eq!(outcome.redirect_to(), Some("/attendance/leave-request"));
        assert_eq!(store.session().role(), Some(Role::Employee));
    }

    #[test]
    fn default_landing_without_last_screen() {
        // Arrange
        let mut store = new_store(MemoryStorage::new());
        store.login(test_user(Role::Admin), test_token("tok"));
        let mut reloaded = new_store(store.into_storage());

        // Act
        let outcome = reloaded.restore("/");

        // Assert
        assert_eq!(outcome.redirect_to(), Some("/dashboard"));
    }

    #[test]
    fn deep_link_left_untouched() {
        let storage =
            MemoryStorage::new().with_entry(STORAGE_AUTH_STATE_KEY, EMPLOYEE_WITH_LAST_SCREEN);
        let mut store = new_store(storage);
        assert_eq!(
            store.restore("/profile"),
            Restoration::Restored { redirect_to: None }
        );
    }

    #[test]
    fn malformed_value_leaves_session_empty() {
        // Arrange
        let storage = MemoryStorage::new().with_entry(STORAGE_AUTH_STATE_KEY, "not valid json");
        let mut store = new_store(storage);

        // Act
        let outcome = store.restore("/");

        // Assert
        assert_eq!(outcome, Restoration::NoSession);
        assert!(!store.session().is_authenticated());
        assert!(!store.api_client().has_bearer_token());
    }

    #[test]
    fn free_form_screen_data_does_not_drop_session() {
        // Arrange
        let snapshot = r#"{"isAuthenticated":true,"user":{"id":"7","email":"em@hr.io","name":"Em","role":"employee"},"token":"abc","lastScreen":{"path":"/overtime","data":{"selectedItems":[1,2],"pagination":{"page":"first"}},"timestamp":1700000000000}}"#;
        let mut store = new_store(MemoryStorage::new().with_entry(STORAGE_AUTH_STATE_KEY, snapshot));

        // Act
        let outcome = store.restore("/");

        // Assert
        assert_eq!(outcome.redirect_to(), Some("/overtime"));
        let data = store.saved_screen_data("/overtime").unwrap();
        assert_eq!(data.extra["selectedItems"], serde_json::json!([1, 2]));
        assert_eq!(data.extra["pagination"]["page"], "first");
    }

    #[test]
    fn screen_data_with_repeated_key_survives_reload() {
        // Arrange
        let mut store = new_store(MemoryStorage::new());
        store.login(test_user(Role::Admin), test_token("tok"));
        let mut extra = serde_json::Map::new();
        extra.insert("tabIndex".to_string(), 2.into());
        let data = ScreenData {
            tab_index: Some(1),
            extra,
            ..Default::default()
        };
        store.record_screen("/employees", Some(data));

        // Act
        let mut reloaded = new_store(store.into_storage());
        let outcome = reloaded.restore("/");

        // Assert
        assert_eq!(outcome.redirect_to(), Some("/employees"));
        let saved = reloaded.saved_screen_data("/employees").unwrap();
        assert_eq!(saved.tab_index, Some(1));
        assert!(saved.extra.is_empty());
    }

    #[test]
    fn nothing_persisted() {
        let mut store = new_store(MemoryStorage::new());
        assert_eq!(store.restore("/"), Restoration::NoSession);
    }

    #[test]
    fn second_call_is_noop() {
        // Arrange
        let storage =
            MemoryStorage::new().with_entry(STORAGE_AUTH_STATE_KEY, EMPLOYEE_WITH_LAST_SCREEN);
        let mut store = new_store(storage);
        let _ = store.restore("/");
        store.record_screen("/overtime", None);

        // Act
        let outcome = store.restore("/");

        // Assert
        assert_eq!(outcome, Restoration::AlreadyAuthenticated);
        assert_eq!(store.session().last_screen().unwrap().path, "/overtime");
    }

    #[test]
    fn restore_does_not_rewrite_storage() {
        // Arrange
        let storage =
            MemoryStorage::new().with_entry(STORAGE_AUTH_STATE_KEY, EMPLOYEE_WITH_LAST_SCREEN);
        let mut store = new_store(storage.clone());

        // Act
        let _ = store.restore("/profile");

        // Assert
        assert_eq!(store.storage(), &storage);
    }
}
