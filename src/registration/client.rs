use crate::config::RegistrationSettings;
use crate::error::{AppError, AppResult};
use crate::registration::transport::RegistrationTransport;
use shootout_types::{RegistrationResponse, RegistrationStatus};
use std::fmt;
use tracing::{info, warn};

/// How the server answered a successful registration request.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationOutcome {
    /// Newly registered; the repository is now linked for auto-triggering
    Registered {
        player_name: Option<String>,
        player_id: Option<String>,
        github_repo: String,
    },
    AlreadyRegistered {
        player_name: Option<String>,
        player_id: Option<String>,
    },
    /// JSON without a recognised status
    Unrecognized(serde_json::Value),
    /// 2xx with a body that is not JSON
    NotJson,
}

impl RegistrationOutcome {
    fn from_json(payload: serde_json::Value, github_repo: &str) -> Self {
        let response = match RegistrationResponse::from_json(&payload) {
            Some(response) => response,
            None => return Self::Unrecognized(payload),
        };

        match response.status() {
            RegistrationStatus::Registered => Self::Registered {
                player_name: response.player_name,
                player_id: response.player_id,
                github_repo: github_repo.to_string(),
            },
            RegistrationStatus::AlreadyRegistered => Self::AlreadyRegistered {
                player_name: response.player_name,
                player_id: response.player_id,
            },
            RegistrationStatus::Other(_) => Self::Unrecognized(payload),
        }
    }
}

fn or_unknown(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("unknown")
}

impl fmt::Display for RegistrationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registered {
                player_name,
                player_id,
                github_repo,
            } => {
                writeln!(
                    f,
                    "Player '{}' registered with id {}.",
                    or_unknown(player_name),
                    or_unknown(player_id)
                )?;
                write!(f, "Auto-trigger configured for repo: {}", github_repo)
            }
            Self::AlreadyRegistered {
                player_name,
                player_id,
            } => write!(
                f,
                "Player '{}' already registered. Using id {}.",
                or_unknown(player_name),
                or_unknown(player_id)
            ),
            Self::Unrecognized(payload) => write!(f, "Registration response: {}", payload),
            Self::NotJson => f.write_str("Registration succeeded but response was not JSON."),
        }
    }
}

/// Registers the configured player once per call. No retries.
pub struct RegistrationClient<T> {
    transport: T,
    settings: RegistrationSettings,
}

impl<T: RegistrationTransport> RegistrationClient<T> {
    pub fn new(transport: T, settings: RegistrationSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    /// POST the registration and interpret the reply.
    ///
    /// Transport failures and non-2xx statuses are errors. Everything else,
    /// including an unreadable body, is an `Ok` outcome.
    pub async fn register(&self) -> AppResult<RegistrationOutcome> {
        let endpoint = self.settings.endpoint();
        let request = self.settings.request();

        let reply = self
            .transport
            .post_json(&endpoint, self.settings.token(), &request)
            .await?;

        if !reply.is_success() {
            return Err(AppError::Server {
                status: reply.status,
                body: reply.body,
            });
        }

        let outcome = match reply.json {
            Some(payload) => RegistrationOutcome::from_json(payload, self.settings.github_repo()),
            None => RegistrationOutcome::NotJson,
        };

        match &outcome {
            RegistrationOutcome::Registered { .. } => info!("Player registered"),
            RegistrationOutcome::AlreadyRegistered { .. } => info!("Player already registered"),
            RegistrationOutcome::Unrecognized(_) => warn!("Unrecognised registration status"),
            RegistrationOutcome::NotJson => warn!("Registration response body was not JSON"),
        }

        Ok(outcome)
    }
}
