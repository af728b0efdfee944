//! Registration of this player with the tournament server.
//!
//! [`RegistrationClient`] owns the request/response contract; the actual HTTP
//! call sits behind [`RegistrationTransport`] so it can be replaced in tests.

pub mod client;
pub mod transport;

pub use client::{RegistrationClient, RegistrationOutcome};
pub use transport::{HttpReply, RegistrationTransport, ReqwestTransport, REGISTRATION_TIMEOUT};
