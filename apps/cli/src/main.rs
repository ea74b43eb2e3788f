//! benchbrief CLI — daily LLM benchmark digest for Telegram.
//!
//! Fetches leaderboard data, ranks the top models per category, and sends
//! a short summary message. Designed to be triggered by a scheduler.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
