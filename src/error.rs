use thiserror::Error;

/// Registration error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("{0}")]
    MissingValue(&'static str),

    #[error("SERVER_URL must include scheme (http/https); got '{0}'")]
    InvalidServerUrl(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request never produced a response (DNS, refused, timeout)
    #[error("Registration error: {0}")]
    Transport(String),

    /// Server answered with a non-2xx status
    #[error("Registration failed: {status} {body}")]
    Server { status: u16, body: String },
}

impl AppError {
    pub fn transport<S: Into<String>>(msg: S) -> Self {
        Self::Transport(msg.into())
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
