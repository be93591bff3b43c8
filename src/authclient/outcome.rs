use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Result of one login attempt. Every submission ends in exactly one of these, and this is the
/// only thing the login screen gets back from the query worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoginOutcome {
    /// Server accepted the credentials
    Success(String),
    /// Server was reached, but refused the credentials
    Rejected(String),
    /// Server answered with a non-2xx status
    ServerError(u16),
    /// No response was received
    NetworkError(String),
    /// 2xx response without a body
    MalformedResponse,
    /// 2xx response whose body is not a JSON object
    UnparsableResponse(String),
}

impl LoginOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, LoginOutcome::Success(_))
    }
}

impl Display for LoginOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoginOutcome::Success(msg) => write!(f, "{msg}"),
            LoginOutcome::Rejected(msg) => write!(f, "Login Failed: {msg}"),
            LoginOutcome::ServerError(code) => write!(f, "Server error: {code}"),
            LoginOutcome::NetworkError(detail) => write!(f, "Network error: {detail}"),
            LoginOutcome::MalformedResponse => write!(f, "Empty response from server"),
            LoginOutcome::UnparsableResponse(detail) => {
                write!(f, "An unexpected error occurred: {detail}")
            }
        }
    }
}
