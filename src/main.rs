use std::sync::Arc;

use clap::Parser;
use cli::Cli;
use color_eyre::{
    eyre::{eyre, Error},
    Result,
};
use tokio::{sync::mpsc, task::JoinSet};
use tracing::info;

use crate::{app::App, authclient::AuthClient, config::Config, queryworker::QueryWorker};

mod action;
mod app;
mod authclient;
mod cli;
mod components;
mod config;
mod errors;
mod logging;
mod queryworker;
mod tui;

pub fn run(args: Cli) -> Result<JoinSet<Result<(), Error>>> {
    let config = Config::new(args.paths())?;
    info!("Using backend at {}", config.config.base_url);

    // One client for the whole session, shared by every login attempt
    let client = Arc::new(AuthClient::new(&config.config.base_url)?);

    let (action_tx, action_rx) = mpsc::unbounded_channel();
    let mut qw = QueryWorker::new(action_tx.clone(), client);
    let query_tx = qw.get_tx();

    let mut app = App::new(
        config,
        action_tx,
        action_rx,
        query_tx,
        args.tick_rate,
        args.frame_rate,
    );

    let mut set = JoinSet::new();
    // Start query worker
    set.spawn(async move { qw.run().await });
    // Start app
    set.spawn(async move { app.run().await });

    Ok(set)
}

#[tokio::main]
async fn main() -> Result<()> {
    crate::errors::init()?;

    let args = Cli::parse();
    if let Some(msg) = args.is_valid() {
        return Err(eyre!(msg));
    }
    crate::logging::init(&args.paths().data)?;

    let mut set = run(args)?;
    // Either the app quit, or the worker died; both end the program
    match set.join_next().await {
        Some(Ok(res)) => res,
        Some(Err(e)) => Err(eyre!("Failed to wait for the task to finish: {}", e)),
        None => Err(eyre!("No tasks were started")),
    }
}
