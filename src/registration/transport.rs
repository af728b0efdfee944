use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::Client;
use shootout_types::RegistrationRequest;
use std::error::Error as _;
use std::time::Duration;
use tracing::{debug, error};

/// Client-side timeout for the registration request
pub const REGISTRATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Status, raw body, and the body parsed as JSON when it is JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
    pub json: Option<serde_json::Value>,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let json = serde_json::from_str(&body).ok();
        Self { status, body, json }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends an authenticated JSON POST and returns whatever the server said.
///
/// Implementations return `AppError::Transport` when no response was
/// received; any HTTP status, including errors, is an `Ok(HttpReply)`.
#[async_trait]
pub trait RegistrationTransport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        bearer_token: &str,
        body: &RegistrationRequest,
    ) -> AppResult<HttpReply>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new() -> AppResult<Self> {
        Self::with_timeout(REGISTRATION_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> AppResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl RegistrationTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        bearer_token: &str,
        body: &RegistrationRequest,
    ) -> AppResult<HttpReply> {
        debug!("POST {}", url);

        // .json() sets Content-Type: application/json
        let response = self
            .http
            .post(url)
            .bearer_auth(bearer_token)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!("Registration request failed: {}", e);
                AppError::transport(describe(&e))
            })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::transport(describe(&e)))?;

        debug!("Registration endpoint answered {}", status);
        Ok(HttpReply::new(status, text))
    }
}

/// reqwest's Display hides the root cause (refused, timed out, dns); append it.
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_parses_json_body() {
        let reply = HttpReply::new(200, r#"{"status": "registered"}"#);
        assert!(reply.is_success());
        assert_eq!(reply.json.unwrap()["status"], "registered");
    }

    #[test]
    fn test_reply_keeps_non_json_body() {
        let reply = HttpReply::new(200, "<html>ok</html>");
        assert!(reply.json.is_none());
        assert_eq!(reply.body, "<html>ok</html>");

        assert!(HttpReply::new(204, "").json.is_none());
    }

    #[test]
    fn test_success_range() {
        assert!(HttpReply::new(201, "").is_success());
        assert!(!HttpReply::new(302, "").is_success());
        assert!(!HttpReply::new(500, "boom").is_success());
    }
}
