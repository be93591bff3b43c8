use reqwest::Url;
use serde_json::json;

use crate::authclient::credentials::Credentials;

/// A single credential submission, ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginRequest {
    url: Url,
    body: String,
}

impl LoginRequest {
    pub const CONTENT_TYPE: &'static str = "application/json; charset=utf-8";

    pub fn new(url: Url, credentials: &Credentials) -> Self {
        let body = json!({
            "username": credentials.username(),
            "password": credentials.password(),
        })
        .to_string();
        Self { url, body }
    }
    pub fn url(&self) -> &Url {
        &self.url
    }
    pub fn body(&self) -> &str {
        &self.body
    }
}
