pub mod query;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use color_eyre::Result;
use query::{FromQueryWorker, Query, QueryResponse, ToQueryWorker};
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};
use tracing::{debug, warn};

use crate::{
    action::Action,
    authclient::{credentials::Credentials, AuthClient},
    trace_dbg,
};

/// Runs network requests away from the UI loop.
///
/// Every login query gets its own task. Only the most recent login is allowed to finish: if a new
/// one arrives while the previous task is still running, the previous task is aborted and its
/// reply is never sent.
pub struct QueryWorker {
    client: Arc<AuthClient>,
    req_tx: UnboundedSender<ToQueryWorker>,
    req_rx: UnboundedReceiver<ToQueryWorker>,
    action_tx: UnboundedSender<Action>,
    login_task: Option<(usize, JoinHandle<()>)>,
}

static COUNTER: AtomicUsize = AtomicUsize::new(1);

impl QueryWorker {
    /// Returns a unique ticket number
    /// This value must be included in every request sent to this worker
    pub fn get_ticket() -> usize {
        COUNTER.fetch_add(1, Ordering::Relaxed)
    }

    pub fn new(action_tx: UnboundedSender<Action>, client: Arc<AuthClient>) -> Self {
        let (req_tx, req_rx) = mpsc::unbounded_channel();
        Self {
            client,
            req_tx,
            req_rx,
            action_tx,
            login_task: None,
        }
    }

    pub fn get_tx(&self) -> UnboundedSender<ToQueryWorker> {
        self.req_tx.clone()
    }

    fn cancel_login(&mut self) {
        if let Some((ticket, handle)) = self.login_task.take() {
            if !handle.is_finished() {
                warn!("Login request #{} superseded, aborting", ticket);
                handle.abort();
            }
        }
    }

    fn login(&mut self, ticket: usize, credentials: Credentials) {
        self.cancel_login();
        let client = self.client.clone();
        let tx = self.action_tx.clone();
        let handle = tokio::spawn(async move {
            let outcome = client.submit(&credentials).await;
            let _ = tx.send(Action::FromQueryWorker(FromQueryWorker::new(
                ticket,
                QueryResponse::Login(outcome),
            )));
        });
        self.login_task = Some((ticket, handle));
    }

    pub async fn run(&mut self) -> Result<()> {
        trace_dbg!("Starting QueryWorker...");
        loop {
            let Some(event) = self.req_rx.recv().await else {
                break;
            };
            debug!("Query #{}: {}", event.ticket, event.query);
            match event.query {
                Query::Kill => break,
                Query::Login(credentials) => self.login(event.ticket, credentials),
            }
        }
        self.cancel_login();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use tokio::time::timeout;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;
    use crate::authclient::outcome::LoginOutcome;

    fn can_bind_localhost() -> bool {
        std::net::TcpListener::bind("127.0.0.1:0").is_ok()
    }

    #[test]
    fn test_tickets_are_unique() {
        let a = ToQueryWorker::new(Query::Kill);
        let b = ToQueryWorker::new(Query::Kill);
        assert!(b.ticket > a.ticket);
    }

    #[tokio::test]
    async fn test_login_reply_carries_ticket() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login.php"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"status":"success","message":"Welcome"}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let client = Arc::new(AuthClient::new(&server.uri()).unwrap());
        let mut qw = QueryWorker::new(action_tx, client);
        let query_tx = qw.get_tx();
        let worker = tokio::spawn(async move { qw.run().await });

        let q = ToQueryWorker::new(Query::Login(Credentials::new("admin", "pw").unwrap()));
        let ticket = q.ticket;
        query_tx.send(q).unwrap();

        let reply = timeout(Duration::from_secs(5), action_rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            reply,
            Action::FromQueryWorker(FromQueryWorker::new(
                ticket,
                QueryResponse::Login(LoginOutcome::Success("Welcome".to_string()))
            ))
        );

        query_tx.send(ToQueryWorker::new(Query::Kill)).unwrap();
        assert!(worker.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_superseded_login_is_dropped() {
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
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server)
            .await;

        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let client = Arc::new(AuthClient::new(&server.uri()).unwrap());
        let mut qw = QueryWorker::new(action_tx, client);
        let query_tx = qw.get_tx();
        tokio::spawn(async move { qw.run().await });

        let creds = Credentials::new("admin", "pw").unwrap();
        let first = ToQueryWorker::new(Query::Login(creds.clone()));
        let second = ToQueryWorker::new(Query::Login(creds));
        let second_ticket = second.ticket;
        query_tx.send(first).unwrap();
        query_tx.send(second).unwrap();

        let Some(Action::FromQueryWorker(reply)) =
            timeout(Duration::from_secs(5), action_rx.recv()).await.unwrap()
        else {
            panic!("Expected a reply from the query worker");
        };
        assert_eq!(reply.ticket, second_ticket);
        // Aborted request must stay silent
        assert!(timeout(Duration::from_millis(800), action_rx.recv())
            .await
            .is_err());
    }
}
