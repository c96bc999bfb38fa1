//! faf CLI: deterministic completeness scores for `.faf` project documents.
//!
//! Scores a document, verifies previously issued checksums, and exposes the
//! compiler's trace and intermediate representation for inspection.

mod commands;
mod render;

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
