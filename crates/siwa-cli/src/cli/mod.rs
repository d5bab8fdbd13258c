//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use siwa_core::config::{self, CONFIG_ENV, Config};
use siwa_core::platform::ScriptedSignal;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "siwa")]
#[command(version)]
#[command(about = "Sign in with Apple credential-status store")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the config file (default: ./siwa.toml)
    #[arg(long, global = true, env = CONFIG_ENV, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Query the credential status of a user through the store
    Status {
        /// The user identifier to query
        #[arg(value_name = "USER_ID")]
        user_id: String,

        /// Override the scripted platform answer for this user
        #[arg(long, value_name = "SIGNAL")]
        signal: Option<ScriptedSignal>,

        /// Seconds to wait for the query to settle
        #[arg(long, default_value_t = 30)]
        wait_secs: u64,
    },

    /// Fold a JSON array of actions through the reducer
    Replay {
        /// File with the actions ("-" reads stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config_path = config::resolve_path(cli.config.as_deref());

    match cli.command {
        // Config commands work even when the file is broken.
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path(&config_path);
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(&config_path),
        },
        Commands::Replay { file } => {
            let config = Config::load_from(&config_path).context("load config")?;
            logging::init(config.log_filter.as_deref());
            commands::replay::run(&file)
        }
        Commands::Status {
            user_id,
            signal,
            wait_secs,
        } => {
            let config = Config::load_from(&config_path).context("load config")?;
            logging::init(config.log_filter.as_deref());

            let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
            rt.block_on(commands::status::run(&config, &user_id, signal, wait_secs))
        }
    }
}
