pub mod credentials;
pub mod error;
pub mod outcome;
pub mod request;
pub mod response;

use std::{error::Error, time::Duration};

use credentials::Credentials;
use error::createclienterror::{CreateClientError, CreateClientFailureReason};
use outcome::LoginOutcome;
use reqwest::{header::CONTENT_TYPE, Client, Url};
use request::LoginRequest;
use tracing::{debug, error, info};

/// Endpoint that is appended to the base URL
pub const LOGIN_ENDPOINT: &str = "login.php";

/// A backend that accepts the connection but never answers ends up as a network error after this
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the attendance backend.
/// A single instance is shared by every login attempt; the underlying [`Client`] keeps its own
/// connection pool and is safe to use from several tasks at once.
#[derive(Debug)]
pub struct AuthClient {
    client: Client,
    login_url: Url,
}

impl AuthClient {
    pub fn new(base_url: &str) -> Result<Self, CreateClientError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, CreateClientError> {
        let login_url = Self::login_url_from(base_url)?;
        let client = Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()
            .map_err(|e| CreateClientError::new(base_url, CreateClientFailureReason::Builder(e)))?;
        Ok(Self { client, login_url })
    }

    /// Base URL is used as a directory, so "http://host/auth" and "http://host/auth/" both end
    /// up at "http://host/auth/login.php"
    fn login_url_from(base_url: &str) -> Result<Url, CreateClientError> {
        let invalid = |e: String| {
            CreateClientError::new(base_url, CreateClientFailureReason::InvalidURL(e))
        };
        let mut base = Url::parse(base_url.trim()).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(CreateClientError::new(
                base_url,
                CreateClientFailureReason::UnsupportedScheme(base.scheme().to_string()),
            ));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(LOGIN_ENDPOINT).map_err(|e| invalid(e.to_string()))
    }

    pub fn login_url(&self) -> &Url {
        &self.login_url
    }

    /// Sends the credentials to the server once, and classifies whatever comes back.
    /// This function never fails; every error is turned into a [`LoginOutcome`].
    pub async fn submit(&self, credentials: &Credentials) -> LoginOutcome {
        let req = LoginRequest::new(self.login_url().clone(), credentials);
        debug!(
            "Submitting login request to {} as {}",
            req.url(),
            credentials.username()
        );
        let res = match self
            .client
            .post(req.url().clone())
            .header(CONTENT_TYPE, LoginRequest::CONTENT_TYPE)
            .body(req.body().to_string())
            .send()
            .await
        {
            Ok(res) => res,
            Err(e) => {
                let detail = describe(&e);
                error!("Login network error: {}", detail);
                return LoginOutcome::NetworkError(detail);
            }
        };
        let status = res.status();
        if !status.is_success() {
            error!(
                "Login HTTP error: {} - {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            );
            return response::interpret(status.as_u16(), None);
        }
        let body = match res.text().await {
            Ok(body) => body,
            Err(e) => {
                let detail = describe(&e);
                error!("Login network error while reading response: {}", detail);
                return LoginOutcome::NetworkError(detail);
            }
        };
        debug!("Login response: {}", body);
        let outcome = response::interpret(status.as_u16(), Some(&body));
        info!("Login finished for {}: {:?}", credentials.username(), outcome);
        outcome
    }
}

/// reqwest puts the interesting part ("Connection refused", "dns error", ...) in the source chain
fn describe(err: &reqwest::Error) -> String {
    let mut detail = err.to_string();
    let mut source = err.source();
    while let Some(s) = source {
        detail.push_str(": ");
        detail.push_str(&s.to_string());
        source = s.source();
    }
    detail
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    fn can_bind_localhost() -> bool {
        std::net::TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn creds() -> Credentials {
        Credentials::new("admin", "hunter2").unwrap()
    }

    #[test]
    fn test_login_url() {
        let with_slash = AuthClient::new("http://10.0.2.2/android_auth/").unwrap();
        let without_slash = AuthClient::new("http://10.0.2.2/android_auth").unwrap();
        let root = AuthClient::new("https://example.com").unwrap();
        assert_eq!(
            with_slash.login_url().as_str(),
            "http://10.0.2.2/android_auth/login.php"
        );
        assert_eq!(with_slash.login_url(), without_slash.login_url());
        assert_eq!(root.login_url().as_str(), "https://example.com/login.php");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(AuthClient::new("not a url").is_err());
        assert!(AuthClient::new("ftp://example.com/").is_err());
    }

    #[tokio::test]
    async fn test_submit_sends_one_json_post() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/android_auth/login.php"))
            .and(header("content-type", "application/json; charset=utf-8"))
            .and(body_json(json!({"username": "admin", "password": "hunter2"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"status":"success","message":"Welcome"}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = AuthClient::new(&format!("{}/android_auth/", server.uri())).unwrap();
        let outcome = client.submit(&creds()).await;
        assert_eq!(outcome, LoginOutcome::Success("Welcome".to_string()));
    }

    #[tokio::test]
    async fn test_submit_rejected() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login.php"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"status":"error","message":"Invalid credentials"}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = AuthClient::new(&server.uri()).unwrap();
        assert_eq!(
            client.submit(&creds()).await,
            LoginOutcome::Rejected("Invalid credentials".to_string())
        );
    }

    #[tokio::test]
    async fn test_submit_server_error() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login.php"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_string(r#"{"status":"success","message":"Welcome"}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = AuthClient::new(&server.uri()).unwrap();
        assert_eq!(client.submit(&creds()).await, LoginOutcome::ServerError(404));
    }

    #[tokio::test]
    async fn test_submit_empty_and_garbage_body() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/empty/login.php"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/garbage/login.php"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<b>Warning</b>: mysqli"))
            .expect(1)
            .mount(&server)
            .await;

        let empty = AuthClient::new(&format!("{}/empty", server.uri())).unwrap();
        assert_eq!(
            empty.submit(&creds()).await,
            LoginOutcome::MalformedResponse
        );
        let garbage = AuthClient::new(&format!("{}/garbage", server.uri())).unwrap();
        assert!(matches!(
            garbage.submit(&creds()).await,
            LoginOutcome::UnparsableResponse(_)
        ));
    }

    #[tokio::test]
    async fn test_submit_times_out_on_silent_server() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login.php"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"status":"success","message":"Welcome"}"#)
                    .set_delay(Duration::from_secs(30)),
            )
            .mount(&server)
            .await;

        let client = AuthClient::with_timeout(&server.uri(), Duration::from_millis(300)).unwrap();
        let outcome = tokio::time::timeout(Duration::from_secs(10), client.submit(&creds()))
            .await
            .expect("submit should give up on its own");
        match outcome {
            LoginOutcome::NetworkError(detail) => assert!(!detail.is_empty()),
            other => panic!("Expected a network error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_submit_connection_refused() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        // Grab a free port, then close it so nothing is listening
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = AuthClient::new(&format!("http://127.0.0.1:{port}/")).unwrap();
        match client.submit(&creds()).await {
            LoginOutcome::NetworkError(detail) => assert!(!detail.is_empty()),
            other => panic!("Expected a network error, got {other:?}"),
        }
    }
}
