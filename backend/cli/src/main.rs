mod check_cmd;
mod init_cmd;
mod modules_cmd;
mod run_cmd;
mod terminal_output;
mod wiring;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cyborg")]
#[command(about = "Cyborg: text-command router with hot-loadable handler modules")]
#[command(version)]
struct Cli {
    /// Config file (default: $CYBORG_CONFIG, ./cyborg.yaml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to the transport and start routing commands
    Run {
        /// Read commands from stdin instead of the configured transport
        #[arg(long)]
        console: bool,
    },
    /// Validate the config and print it with secrets masked
    CheckConfig,
    /// Load every module once and list its commands
    Modules,
    /// Write a starter config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cyborg_config::resolve_config_path(cli.config.as_deref());

    match cli.command {
        Commands::Run { console } => run_cmd::run(&config_path, console).await,
        Commands::CheckConfig => check_cmd::run(&config_path).await,
        Commands::Modules => modules_cmd::run(&config_path).await,
        Commands::Init { force } => init_cmd::run(&config_path, force).await,
    }
}
