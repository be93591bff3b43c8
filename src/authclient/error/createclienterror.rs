use std::{error::Error, fmt::Display};

#[derive(Debug)]
pub enum CreateClientFailureReason {
    // Base URL in the config could not be parsed
    InvalidURL(String),
    // Base URL is not an http(s) address
    UnsupportedScheme(String),
    // reqwest could not build the client (TLS backend, etc)
    Builder(reqwest::Error),
}

#[derive(Debug)]
pub struct CreateClientError {
    base_url: String,
    reason: CreateClientFailureReason,
}

impl CreateClientError {
    pub fn new(base_url: &str, reason: CreateClientFailureReason) -> Self {
        Self {
            base_url: base_url.to_string(),
            reason,
        }
    }
}

impl Error for CreateClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.reason {
            CreateClientFailureReason::InvalidURL(_)
            | CreateClientFailureReason::UnsupportedScheme(_) => None,
            CreateClientFailureReason::Builder(e) => Some(e),
        }
    }
}

impl Display for CreateClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.reason {
            CreateClientFailureReason::InvalidURL(e) => {
                write!(f, "Invalid base URL {:?}: {}", self.base_url, e)
            }
            CreateClientFailureReason::UnsupportedScheme(scheme) => write!(
                f,
                "Invalid base URL {:?}: scheme must be http or https, not {}",
                self.base_url, scheme
            ),
            CreateClientFailureReason::Builder(e) => {
                write!(f, "Failed to create HTTP client: {}", e)
            }
        }
    }
}
