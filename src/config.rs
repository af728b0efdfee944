use crate::error::{AppError, AppResult};
use config::{Config, ConfigError, Environment, File, Map};
use serde::Deserialize;
use shootout_types::RegistrationRequest;
use std::fmt;
use zeroize::Zeroize;

/// Player name used when `PLAYER_NAME` is unset.
pub const DEFAULT_PLAYER_NAME: &str = "encrypted-template";

/// Environment variables consulted for registration.
/// `GITHUB_REPOSITORY` is what CI runners export; `GITHUB_REPO` is the manual fallback.
pub const ENV_KEYS: [&str; 5] = [
    "SERVER_URL",
    "GAME_TOKEN",
    "PLAYER_NAME",
    "GITHUB_REPOSITORY",
    "GITHUB_REPO",
];

/// Raw registration configuration as read from file and environment.
/// Nothing is validated here; see [`RegistrationConfig::validate`].
#[derive(Deserialize, Clone, Default)]
pub struct RegistrationConfig {
    #[serde(default)]
    pub server_url: Option<String>,
    #[serde(default)]
    pub game_token: Option<String>,
    #[serde(default)]
    pub player_name: Option<String>,
    #[serde(default)]
    pub github_repository: Option<String>,
    #[serde(default)]
    pub github_repo: Option<String>,
}

impl fmt::Debug for RegistrationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationConfig")
            .field("server_url", &self.server_url)
            .field("game_token", &self.game_token.as_ref().map(|_| "<redacted>"))
            .field("player_name", &self.player_name)
            .field("github_repository", &self.github_repository)
            .field("github_repo", &self.github_repo)
            .finish()
    }
}

impl RegistrationConfig {
    /// Load configuration from `config/register.*` and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let vars = ENV_KEYS
            .iter()
            .filter_map(|key| std::env::var(key).ok().map(|value| (key.to_string(), value)))
            .collect();
        Self::from_vars(vars)
    }

    /// Same as [`load`](Self::load) but with an explicit variable map in place
    /// of the process environment.
    pub fn from_vars(vars: Map<String, String>) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/register").required(false))
            // Keys are lowercased: SERVER_URL -> server_url
            .add_source(Environment::default().source(Some(vars)))
            .build()?;

        config.try_deserialize()
    }

    fn server_url_value(&self) -> String {
        trimmed(self.server_url.as_deref())
    }

    fn token_value(&self) -> String {
        trimmed(self.game_token.as_deref())
    }

    fn player_name_value(&self) -> String {
        self.player_name
            .as_deref()
            .map(str::trim)
            .unwrap_or(DEFAULT_PLAYER_NAME)
            .to_string()
    }

    /// First defined of `GITHUB_REPOSITORY`, `GITHUB_REPO`. A defined but
    /// empty `GITHUB_REPOSITORY` still wins.
    fn repo_value(&self) -> String {
        trimmed(self.github_repository.as_deref().or(self.github_repo.as_deref()))
    }

    /// Which values are present, without revealing any of them.
    pub fn presence(&self) -> ConfigPresence {
        ConfigPresence {
            server_url: !self.server_url_value().is_empty(),
            game_token: !self.token_value().is_empty(),
            player_name: !self.player_name_value().is_empty(),
            github_repo: !self.repo_value().is_empty(),
        }
    }

    /// Check required values and produce settings ready for a request.
    pub fn validate(&self) -> AppResult<RegistrationSettings> {
        let server_url = self.server_url_value();
        let token = self.token_value();
        let player_name = self.player_name_value();
        let github_repo = self.repo_value();

        if server_url.is_empty() {
            return Err(AppError::MissingValue("SERVER_URL environment variable not set"));
        }
        if token.is_empty() {
            return Err(AppError::MissingValue("GAME_TOKEN environment variable not set"));
        }
        if player_name.is_empty() {
            return Err(AppError::MissingValue("PLAYER_NAME environment variable not set"));
        }
        if github_repo.is_empty() {
            return Err(AppError::MissingValue(
                "GITHUB_REPO or GITHUB_REPOSITORY environment variable not set",
            ));
        }

        if !server_url.starts_with("http://") && !server_url.starts_with("https://") {
            return Err(AppError::InvalidServerUrl(server_url));
        }

        Ok(RegistrationSettings {
            server_url: server_url.trim_end_matches('/').to_string(),
            token,
            player_name,
            github_repo,
        })
    }
}

fn trimmed(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

/// Set/missing summary of the four registration values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigPresence {
    pub server_url: bool,
    pub game_token: bool,
    pub player_name: bool,
    pub github_repo: bool,
}

impl fmt::Display for ConfigPresence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn state(present: bool) -> &'static str {
            if present {
                "set"
            } else {
                "missing"
            }
        }
        write!(
            f,
            "Config state: SERVER_URL={}, GAME_TOKEN={}, PLAYER_NAME={}, GITHUB_REPO={}",
            state(self.server_url),
            state(self.game_token),
            state(self.player_name),
            state(self.github_repo),
        )
    }
}

/// Validated registration settings. The token is zeroized on drop.
#[derive(Clone)]
pub struct RegistrationSettings {
    server_url: String,
    token: String,
    player_name: String,
    github_repo: String,
}

impl RegistrationSettings {
    pub fn endpoint(&self) -> String {
        format!("{}/register", self.server_url)
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn github_repo(&self) -> &str {
        &self.github_repo
    }

    /// Lines reported to the operator before the request is sent. The token
    /// is named, never shown.
    pub fn diagnostics(&self) -> Vec<String> {
        vec![
            format!("Using endpoint {}", self.endpoint()),
            format!("Configuring auto-trigger for repo: {}", self.github_repo),
            "Using GAME_TOKEN for both authentication and workflow triggering".to_string(),
        ]
    }

    pub fn request(&self) -> RegistrationRequest {
        RegistrationRequest {
            player_name: self.player_name.clone(),
            github_repo: self.github_repo.clone(),
        }
    }
}

impl fmt::Debug for RegistrationSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationSettings")
            .field("server_url", &self.server_url)
            .field("token", &"<redacted>")
            .field("player_name", &self.player_name)
            .field("github_repo", &self.github_repo)
            .finish()
    }
}

impl Drop for RegistrationSettings {
    fn drop(&mut self) {
        self.token.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::{prop_assert_eq, proptest};

    fn full_config() -> RegistrationConfig {
        RegistrationConfig {
            server_url: Some("https://shootout.example.com".to_string()),
            game_token: Some("ghp_secret".to_string()),
            player_name: Some("bot1".to_string()),
            github_repository: Some("owner/bot1".to_string()),
            github_repo: None,
        }
    }

    fn missing_message(config: &RegistrationConfig) -> String {
        config.validate().unwrap_err().to_string()
    }

    #[test]
    fn test_valid_config() {
        let settings = full_config().validate().unwrap();
        assert_eq!(settings.endpoint(), "https://shootout.example.com/register");
        assert_eq!(settings.token(), "ghp_secret");
        assert_eq!(settings.player_name(), "bot1");
        assert_eq!(settings.github_repo(), "owner/bot1");
    }

    #[test]
    fn test_each_missing_value_is_named() {
        let mut config = full_config();
        config.server_url = None;
        assert!(missing_message(&config).contains("SERVER_URL"));

        let mut config = full_config();
        config.game_token = Some("   ".to_string());
        assert!(missing_message(&config).contains("GAME_TOKEN"));

        let mut config = full_config();
        config.player_name = Some(String::new());
        assert!(missing_message(&config).contains("PLAYER_NAME"));

        let mut config = full_config();
        config.github_repository = None;
        assert!(missing_message(&config).contains("GITHUB_REPO"));
    }

    #[test]
    fn test_player_name_defaults_when_unset() {
        let mut config = full_config();
        config.player_name = None;
        let settings = config.validate().unwrap();
        assert_eq!(settings.player_name(), DEFAULT_PLAYER_NAME);
    }

    #[test]
    fn test_repository_fallback_order() {
        let mut config = full_config();
        config.github_repository = None;
        config.github_repo = Some("owner/fallback".to_string());
        assert_eq!(config.validate().unwrap().github_repo(), "owner/fallback");

        config.github_repository = Some("owner/preferred".to_string());
        assert_eq!(config.validate().unwrap().github_repo(), "owner/preferred");
    }

    #[test]
    fn test_rejects_url_without_scheme() {
        let mut config = full_config();
        config.server_url = Some("shootout.example.com".to_string());
        let err = config.validate().unwrap_err();
        assert!(matches!(err, AppError::InvalidServerUrl(_)));
        assert!(err.to_string().contains("http/https"));
    }

    #[test]
    fn test_presence_never_leaks_values() {
        let mut config = full_config();
        config.github_repository = None;
        let line = config.presence().to_string();
        assert_eq!(
            line,
            "Config state: SERVER_URL=set, GAME_TOKEN=set, PLAYER_NAME=set, GITHUB_REPO=missing"
        );
        assert!(!line.contains("ghp_secret"));
    }

    #[test]
    fn test_diagnostics_name_endpoint_and_repo() {
        let settings = full_config().validate().unwrap();
        let lines = settings.diagnostics();
        assert_eq!(
            lines,
            vec![
                "Using endpoint https://shootout.example.com/register",
                "Configuring auto-trigger for repo: owner/bot1",
                "Using GAME_TOKEN for both authentication and workflow triggering",
            ]
        );
        assert!(lines.iter().all(|line| !line.contains("ghp_secret")));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = full_config();
        assert!(!format!("{:?}", config).contains("ghp_secret"));
        let settings = config.validate().unwrap();
        assert!(!format!("{:?}", settings).contains("ghp_secret"));
    }

    #[test]
    fn test_from_vars() {
        let vars = Map::from([
            ("SERVER_URL".to_string(), "http://localhost:8000/".to_string()),
            ("GAME_TOKEN".to_string(), "token".to_string()),
            ("GITHUB_REPO".to_string(), "owner/repo".to_string()),
        ]);
        let config = RegistrationConfig::from_vars(vars).unwrap();
        let settings = config.validate().unwrap();
        assert_eq!(settings.endpoint(), "http://localhost:8000/register");
        assert_eq!(settings.player_name(), DEFAULT_PLAYER_NAME);
        assert_eq!(settings.github_repo(), "owner/repo");
    }

    proptest! {
        #[test]
        fn endpoint_strips_trailing_slashes(host in "[a-z]{1,12}", slashes in 0usize..5) {
            let mut config = full_config();
            config.server_url = Some(format!("https://{}{}", host, "/".repeat(slashes)));
            let settings = config.validate().unwrap();
            prop_assert_eq!(settings.endpoint(), format!("https://{}/register", host));
        }
    }
}
