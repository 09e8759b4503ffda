//! `parcel-custody` command line.
//!
//! Each order command opens the collections, runs one ledger operation and shuts the
//! ledger down again. `interactive` starts the pick-up point session on stdin/stdout.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use parcel_custody::commands::{CommandRunner, OrderCommand};
use parcel_custody::config::Config;
use parcel_custody::lifecycle::{setup_tracing, CustodySystem};
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing::info;

#[derive(Parser)]
#[command(name = "parcel-custody", version, about = "Pick-up point parcel custody ledger")]
struct Cli {
    /// Path to a TOML config file (missing file = defaults)
    #[arg(short, long, default_value = "parcel-custody.toml")]
    config: PathBuf,

    /// Overrides `data_dir` from the config file
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(flatten)]
    Order(OrderCommand),

    /// Read and write pick-up points interactively (`read`, `write <name>, <address>, <contact>`, `exit`).
    Interactive,
}

#[tokio::main]
async fn main() {
    setup_tracing();
    if let Err(err) = run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load(&cli.config)?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    let system = CustodySystem::start(config)
        .await
        .context("start custody system")?;

    let outcome = match cli.command {
        Command::Order(command) => {
            let runner = CommandRunner::new(system.order_client.clone(), system.clock.clone());
            let result = runner.execute(command).await;
            drop(runner);
            result.map(|lines| {
                for line in lines {
                    println!("{line}");
                }
            })
        }
        Command::Interactive => {
            info!("Starting interactive session");
            let session = system.session();
            session
                .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
                .await
                .context("interactive session")?;
            Ok(())
        }
    };

    system.shutdown().await.context("shut down custody system")?;
    outcome.map_err(Into::into)
}
