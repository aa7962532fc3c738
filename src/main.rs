mod catalog;
mod cli;
mod model;
mod orchestrator;
mod provider;
mod telemetry;
mod text_summary;
#[cfg(feature = "tui")]
mod tui;
mod wizard;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let is_non_tui = args.json || args.text || args.list;

    match cli::run(args).await {
        Ok(()) => {
            // Explicitly exit with code 0 on success, especially for non-TUI modes
            if is_non_tui {
                std::process::exit(0);
            }
            Ok(())
        }
        Err(e) => {
            if is_non_tui {
                eprintln!("{e:#}");
                std::process::exit(1);
            }
            Err(e)
        }
    }
}
