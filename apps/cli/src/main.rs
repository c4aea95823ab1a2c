//! Wikiracer CLI: find a chain of links between two encyclopedia articles.
//!
//! Resolves free-text start/end terms to canonical article titles, then
//! searches the article link graph breadth-first until the target appears.

mod commands;
mod prompt;

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
