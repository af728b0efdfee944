pub mod config;
pub mod error;
pub mod registration;

pub use crate::config::{RegistrationConfig, RegistrationSettings};
pub use error::{AppError, AppResult};
pub use registration::{RegistrationClient, RegistrationOutcome, ReqwestTransport};
