use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use lifelog::{cli, config, server};

#[derive(Parser)]
#[command(name = "lifelog", version, about = "Conversational life-tracking documentation assistant")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP chat server
    Serve,
    /// Chat interactively in the terminal
    Chat,
    /// Process a single message and exit
    Message {
        text: String,
        /// Continue in interactive mode after the message
        #[arg(short, long)]
        interactive: bool,
    },
    /// Process messages from a file, or stdin when omitted
    Batch {
        file: Option<PathBuf>,
        /// Treat the input as CSV and read the first column
        #[arg(long)]
        csv: bool,
    },
    /// Show the documentation summary for the trailing window
    Summary,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Load config (for log level)
    let config = config::LifelogConfig::load()?;

    // Initialize tracing with the configured log level.
    // Log to stderr so stdout stays clean for chat output.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Serve => {
            tokio::runtime::Runtime::new()?.block_on(server::serve(config))?;
        }
        Command::Chat => cli::chat(&config)?,
        Command::Message { text, interactive } => cli::message(&config, &text, interactive)?,
        Command::Batch { file, csv } => cli::batch(&config, file, csv)?,
        Command::Summary => cli::summary(&config)?,
    }

    Ok(())
}
