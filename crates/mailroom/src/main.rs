// SPDX-FileCopyrightText: 2026 Mailroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mailroom - contact-ticket and admin-messaging backend.
//!
//! Binary entry point: loads configuration, initializes tracing, and
//! dispatches to the selected subcommand.

mod serve;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Mailroom - contact-ticket and admin-messaging backend.
#[derive(Parser, Debug)]
#[command(name = "mailroom", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the mailroom server.
    Serve,
    /// Manage mailroom configuration.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Load the configuration and report whether it is valid.
    Check,
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match mailroom_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            mailroom_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            init_tracing(&config.server.log_level);
            if let Err(e) = serve::run(config).await {
                tracing::error!("server failed: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config { command: ConfigCommands::Check }) => {
            println!(
                "configuration ok (server {}:{}, database {})",
                config.server.host, config.server.port, config.storage.database_path
            );
            if config.admin.secret.is_none() {
                println!("warning: admin.secret is not set, admin endpoints will fail closed");
            }
        }
        None => {
            println!("mailroom: use --help for available commands");
        }
    }
}
