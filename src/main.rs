//! Launch Records Dashboard.
//!
//! Usage:
//!   cargo run                          # serve the page on http://127.0.0.1:8050
//!   cargo run -- serve --port 9000     # serve on another port
//!   cargo run -- tui                   # terminal dashboard
//!   cargo run -- check                 # check chart properties against the dataset
//!   cargo run -- --data launches.csv   # load a local CSV instead of the public copy
//!   cargo run -- --demo 200            # generated launches, no download

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use launch_dashboard::config::{Args, Command};
use launch_dashboard::dataset::Dataset;
use launch_dashboard::generator::LaunchGenerator;
use launch_dashboard::server::{self, AppState};
use launch_dashboard::{tui, verify};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mode = args.mode();

    // Keep the terminal dashboard's screen clear of routine log lines.
    let level = if mode == Command::Tui { "warn" } else { "info" };
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.parse()?))
        .with_writer(std::io::stderr)
        .init();

    let dataset = match args.demo {
        Some(count) => {
            tracing::info!(count, "using generated launches");
            Arc::new(LaunchGenerator::new().generate_dataset(count))
        }
        None => Dataset::load(&args.source()).await?,
    };

    match mode {
        Command::Serve { host, port } => {
            server::serve(SocketAddr::new(host, port), Arc::new(AppState::new(dataset))).await?;
        }
        Command::Tui => {
            tokio::task::spawn_blocking(move || tui::run(dataset)).await??;
        }
        Command::Check => {
            let summary = verify::run(&dataset);
            if !summary.ok() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
