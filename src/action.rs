use serde::{Deserialize, Serialize};
use strum::Display;

use crate::queryworker::query::{FromQueryWorker, ToQueryWorker};

#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum Action {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    ClearScreen,
    Error(String),
    /// Forget the keys typed so far for a multi-key binding
    EndKeySeq,

    /// Request to be forwarded to the query worker
    ToQueryWorker(ToQueryWorker),
    /// Reply from the query worker in response to a previous request
    FromQueryWorker(FromQueryWorker),
}
