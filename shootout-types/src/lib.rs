//! Wire types for the tournament server's registration endpoint.
//!
//! These are shared between the registration client and anything that needs
//! to speak the same JSON shape (mock servers in tests, tooling).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub player_name: String,
    pub github_repo: String,
}

/// Successful response from `POST /register`.
///
/// Only `status` drives interpretation. `player_name` and `player_id` are
/// kept for display whatever JSON type the server used: strings as-is,
/// anything else in its JSON form (`42`, `42.0`, `true`), null as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationResponse {
    pub status: Option<String>,
    pub player_name: Option<String>,
    pub player_id: Option<String>,
}

impl RegistrationResponse {
    /// Read a response body. `None` when the JSON is not an object.
    pub fn from_json(payload: &Value) -> Option<Self> {
        let fields = payload.as_object()?;
        Some(Self {
            status: fields.get("status").and_then(Value::as_str).map(str::to_string),
            player_name: fields.get("player_name").and_then(display_value),
            player_id: fields.get("player_id").and_then(display_value),
        })
    }

    /// Interpret the `status` field. A missing or non-string status maps to `Other("")`.
    pub fn status(&self) -> RegistrationStatus {
        RegistrationStatus::parse(self.status.as_deref().unwrap_or_default())
    }
}

fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Registration status reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationStatus {
    Registered,
    AlreadyRegistered,
    Other(String),
}

impl RegistrationStatus {
    /// Case-insensitive parse of the server's status string.
    pub fn parse(raw: &str) -> Self {
        let lowered = raw.to_lowercase();
        match lowered.as_str() {
            "registered" => Self::Registered,
            "already_registered" => Self::AlreadyRegistered,
            _ => Self::Other(lowered),
        }
    }
}
