use hr_shared::{
    const_config::{
        client::CLIENT_MAX_REDIRECT_HOPS,
        screen::SCREEN_LOGIN,
    },
    debug_panic,
    token::AuthToken,
    uac::User,
};
use tracing::{error, info};

use crate::{
    restore::Restoration,
    routes::{decide, normalize_path, Decision, View},
    session::{Session, SessionStore},
    storage::SessionStorage,
};

/// A screen that is being shown and the path it is shown at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub path: String,
    pub view: View,
}

/// Explicit context for everything that needs the session
///
/// Owns the [`SessionStore`] and applies the route guard on every
/// navigation, recording the screen whenever a protected view is shown.
#[derive(Debug)]
pub struct Navigator<S> {
    store: SessionStore<S>,
    current: Option<Rendered>,
}

impl<S: SessionStorage> Navigator<S> {
    pub fn new(store: SessionStore<S>) -> Self {
        Self {
            store,
            current: None,
        }
    }

    pub fn session(&self) -> &Session {
        self.store.session()
    }

    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SessionStore<S> {
        &mut self.store
    }

    pub fn into_store(self) -> SessionStore<S> {
        self.store
    }

    /// What is currently shown, `None` before the first navigation
    pub fn current(&self) -> Option<&Rendered> {
        self.current.as_ref()
    }

    /// Restores any persisted session then shows the initial screen
    #[tracing::instrument(skip(self))]
    pub fn boot(&mut self, initial_path: &str) -> Rendered {
        let restoration = self.store.restore(initial_path);
        let start = match &restoration {
            Restoration::Restored {
                redirect_to: Some(target),
            } => target.clone(),
            Restoration::Restored { redirect_to: None }
            | Restoration::NoSession
            | Restoration::AlreadyAuthenticated => initial_path.to_string(),
        };
        self.navigate(&start)
    }

    /// Shows `path`, following redirects until something renders
    #[tracing::instrument(skip(self), ret)]
    pub fn navigate(&mut self, path: &str) -> Rendered {
        let mut path = normalize_path(path);
        for _ in 0..=CLIENT_MAX_REDIRECT_HOPS {
            match decide(&path, self.store.session()) {
                Decision::Render(view) => return self.show(path, view),
                Decision::Redirect(target) => {
                    info!(from = %path, to = %target, "redirect");
                    path = target.to_string();
                }
            }
        }
        error!(
            ?path,
            "gave up after {CLIENT_MAX_REDIRECT_HOPS} redirects, route table has a cycle"
        );
        debug_panic!(format!("redirect cycle at {path}"));
        self.show(path, View::NotFound)
    }

    /// Logs in and leaves the login screen, returning to the last screen if
    /// the session kept one
    pub fn login(&mut self, user: User, token: AuthToken) -> Rendered {
        self.store.login(user, token);
        let target = self
            .store
            .session()
            .last_screen()
            .map(|x| x.path.clone())
            .unwrap_or_else(|| SCREEN_LOGIN.to_string());
        self.navigate(&target)
    }

    /// Logs out and returns to the login screen
    pub fn logout(&mut self) -> Rendered {
        self.store.logout();
        self.navigate(SCREEN_LOGIN)
    }

    fn show(&mut self, path: String, view: View) -> Rendered {
        if view.is_protected() {
            self.store.touch_screen(&path);
        }
        let rendered = Rendered { path, view };
        self.current = Some(rendered.clone());
        rendered
    }
}
