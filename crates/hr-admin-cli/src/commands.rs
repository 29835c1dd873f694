//! Runs one command against the saved session
//!
//! Every invocation is a fresh start of the client, so the persisted session
//! is restored before anything else happens.

use anyhow::Context as _;
use hr_client_core::{
    storage::FileStorage, Client, Navigator, Rendered, Session, SessionStore,
};
use hr_shared::{
    const_config::screen::SCREEN_LOGIN, errors::NotLoggedInError, req_args::LoginReqArgs,
};
use secrecy::SecretString;
use tracing::{info, warn};

use crate::{cli::Command, configuration::Configuration};

pub fn navigator(config: &Configuration) -> Navigator<FileStorage> {
    let api_client = Client::new(config.api.base_url.clone());
    let storage = FileStorage::new(config.storage.directory.clone());
    Navigator::new(SessionStore::new(storage, api_client))
}

#[tracing::instrument(skip_all)]
pub async fn run(command: Command, config: &Configuration) -> anyhow::Result<()> {
    let mut navigator = navigator(config);
    let initial_path = config.navigation.initial_path.as_str();
    match command {
        Command::Boot { path } => {
            let rendered = navigator.boot(path.as_deref().unwrap_or(initial_path));
            println!("{}", describe(&rendered));
        }
        Command::Navigate { path } => {
            navigator.boot(initial_path);
            let rendered = navigator.navigate(&path);
            println!("{}", describe(&rendered));
        }
        Command::Login { email, password } => {
            navigator.boot(SCREEN_LOGIN);
            let args = LoginReqArgs::new(email, SecretString::from(password));
            let rx = navigator.store().api_client().login(args, || {});
            let response = rx
                .await
                .context("login response was never received")?
                .context("login failed")?;
            info!(user_id = %response.user.id, "logged in");
            let rendered = navigator.login(response.user, response.token);
            println!("{}", describe(&rendered));
        }
        Command::Logout => {
            let rendered = navigator.logout();
            println!("{}", describe(&rendered));
        }
        Command::Status { verify } => {
            let _ = navigator.store_mut().restore(initial_path);
            for line in status_lines(navigator.session()) {
                println!("{line}");
            }
            if verify && navigator.session().is_authenticated() {
                verify_token(&mut navigator).await?;
            }
        }
    }
    Ok(())
}

/// Asks the API who the token belongs to and drops the session if the token
/// is no longer accepted
async fn verify_token(navigator: &mut Navigator<FileStorage>) -> anyhow::Result<()> {
    let rx = navigator.store().api_client().current_user(|| {});
    match rx.await.context("response was never received")? {
        Ok(user) => println!("Token accepted for {}", user.email),
        Err(e) if e.is::<NotLoggedInError>() => {
            warn!("saved token rejected by the API");
            navigator.logout();
            println!("Token rejected, logged out");
        }
        Err(e) => return Err(e.context("failed to verify token")),
    }
    Ok(())
}

pub fn describe(rendered: &Rendered) -> String {
    format!("{} at {}", rendered.view, rendered.path)
}

pub fn status_lines(session: &Session) -> Vec<String> {
    let Some(auth) = session.authenticated() else {
        return vec!["Not logged in".to_string()];
    };
    let mut result = vec![format!(
        "Logged in as {} <{}> ({})",
        auth.user.name, auth.user.email, auth.user.role
    )];
    match &auth.last_screen {
        Some(last_screen) => result.push(format!(
            "Last screen {} at {}",
            last_screen.path,
            last_screen.timestamp.display_as_locale_datetime()
        )),
        None => result.push("No screen visited yet".to_string()),
    }
    result
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use hr_client_core::{SessionStorage as _, View};
    use hr_shared::const_config::storage::STORAGE_AUTH_STATE_KEY;

    use super::*;
    use crate::configuration::{ApiSettings, NavigationSettings, StorageSettings};

    const EMPLOYEE_SNAPSHOT: &str = r#"{"isAuthenticated":true,"user":{"id":"7","email":"em@hr.io","name":"Em","role":"employee"},"token":"abc","lastScreen":{"path":"/overtime","timestamp":1700000000000}}"#;

    fn test_config(test_name: &str) -> Configuration {
        let directory: PathBuf = std::env::temp_dir().join(format!(
            "hr-admin-cli-{test_name}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&directory);
        Configuration {
            api: ApiSettings {
                base_url: "http://127.0.0.1:9/api".to_string(),
            },
            storage: StorageSettings { directory },
            navigation: NavigationSettings {
                initial_path: "/".to_string(),
            },
        }
    }

    fn save_snapshot(config: &Configuration, snapshot: &str) {
        let mut storage = FileStorage::new(config.storage.directory.clone());
        storage.set(STORAGE_AUTH_STATE_KEY, snapshot).unwrap();
    }

    #[test]
    fn boot_without_session_shows_login() {
        let config = test_config("boot_without_session");
        let rendered = navigator(&config).boot("/");
        assert_eq!(describe(&rendered), "Login at /login");
    }

    #[test]
    fn boot_returns_to_saved_screen() {
        // Arrange
        let config = test_config("boot_returns");
        save_snapshot(&config, EMPLOYEE_SNAPSHOT);

        // Act
        let rendered = navigator(&config).boot("/");

        // Assert
        assert_eq!(rendered.view, View::EmployeeOvertime);
        assert_eq!(rendered.path, "/overtime");
    }

    #[tokio::test]
    async fn navigate_is_remembered_between_runs() {
        // Arrange
        let config = test_config("navigate_remembered");
        save_snapshot(&config, EMPLOYEE_SNAPSHOT);

        // Act
        run(
            Command::Navigate {
                path: "/profile".to_string(),
            },
            &config,
        )
        .await
        .unwrap();

        // Assert
        let mut next_run = navigator(&config);
        assert_eq!(next_run.boot("/login").view, View::Profile);
    }

    #[tokio::test]
    async fn logout_deletes_saved_session() {
        // Arrange
        let config = test_config("logout_deletes");
        save_snapshot(&config, EMPLOYEE_SNAPSHOT);

        // Act
        run(Command::Logout, &config).await.unwrap();

        // Assert
        let next_run = navigator(&config);
        assert!(next_run
            .store()
            .storage()
            .get(STORAGE_AUTH_STATE_KEY)
            .unwrap()
            .is_none());
    }

    #[test]
    fn status_when_logged_out() {
        assert_eq!(status_lines(&Session::LoggedOut), ["Not logged in"]);
    }

    #[test]
    fn status_when_logged_in() {
        // Arrange
        let session = Session::from_persisted(EMPLOYEE_SNAPSHOT).unwrap();

        // Act
        let lines = status_lines(&session);

        // Assert
        assert_eq!(lines[0], "Logged in as Em <em@hr.io> (employee)");
        assert!(lines[1].starts_with("Last screen /overtime at "));
    }
}
