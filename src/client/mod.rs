//! main file for the client

mod api;
mod cart;
pub mod cli;
mod controller;
pub mod model;
mod pricing;
mod scheduler;
mod state;
mod util;

use crate::client::cli::Commands;
use crate::client::model::config::ClientConfig;

/// Run one command against the platform
pub async fn run(config: ClientConfig, command: Commands) -> Result<(), anyhow::Error> {
    cli::dispatch(config, command).await
}
