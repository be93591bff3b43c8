use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{
    authclient::{credentials::Credentials, outcome::LoginOutcome},
    queryworker::QueryWorker,
};

#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum Query {
    /// Stop the query worker
    Kill,
    /// Submit the credentials to the login endpoint
    Login(Credentials),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToQueryWorker {
    pub ticket: usize,
    pub query: Query,
}

impl ToQueryWorker {
    pub fn new(query: Query) -> Self {
        Self {
            ticket: QueryWorker::get_ticket(),
            query,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum QueryResponse {
    Login(LoginOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FromQueryWorker {
    /// Same ticket as the [`ToQueryWorker`] this is a reply to
    pub ticket: usize,
    pub res: QueryResponse,
}

impl FromQueryWorker {
    pub fn new(ticket: usize, res: QueryResponse) -> Self {
        Self { ticket, res }
    }
}
