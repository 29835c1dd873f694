use std::{
    convert::{TryFrom, TryInto},
    path::{Path, PathBuf},
};

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Configuration {
    pub api: ApiSettings,
    pub storage: StorageSettings,
    pub navigation: NavigationSettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ApiSettings {
    /// Prefix of every request path, without a trailing slash
    pub base_url: String,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct StorageSettings {
    /// Where the persisted session is kept
    pub directory: PathBuf,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct NavigationSettings {
    /// Path the app starts at when none is given
    pub initial_path: String,
}

/// Loads `base.toml` then the file for the current environment from
/// `configuration_directory`, with `APP_` variables taking precedence
pub fn get_configuration(
    configuration_directory: &Path,
) -> Result<Configuration, config::ConfigError> {
    // Detect the running environment.
    // Default to `local` if unspecified.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.toml", environment.as_str());
    let settings = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join("base.toml"),
        ))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        // Add in settings from environment variables (with a prefix of APP and '__' as separator)
        // E.g. `APP_API__BASE_URL=http://10.0.0.5/api` would set `Configuration.api.base_url`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Configuration>()
}

/// Default location of the configuration folder, relative to the working
/// directory
pub fn default_configuration_directory() -> anyhow::Result<PathBuf> {
    let base_path = std::env::current_dir()?;
    Ok(base_path.join("configuration"))
}

/// The possible runtime environment for our application.
#[derive(Debug, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{other} is not a supported environment. Use either `local` or `production`."
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn crate_configuration_directory() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("configuration")
    }

    #[rstest]
    #[case::local("local", Environment::Local)]
    #[case::mixed_case("Production", Environment::Production)]
    fn environment_parsing(#[case] input: &str, #[case] expected: Environment) {
        let actual: Environment = input.to_string().try_into().unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn unknown_environment_rejected() {
        let actual: Result<Environment, _> = "staging".to_string().try_into();
        assert!(actual.unwrap_err().contains("staging"));
    }

    #[test]
    fn shipped_configuration_loads() {
        // Act
        let config = get_configuration(&crate_configuration_directory()).unwrap();

        // Assert
        assert!(!config.api.base_url.ends_with('/'));
        assert!(config.navigation.initial_path.starts_with('/'));
        assert!(!config.storage.directory.as_os_str().is_empty());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = std::env::temp_dir().join("hr-admin-cli-no-such-configuration");
        assert!(get_configuration(&dir).is_err());
    }
}
