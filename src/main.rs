//! hl7wire - MLLP sender for HL7 v2 clinical messages
//!
//! Builds ADT^A01 messages from patient records and delivers them to an MLLP
//! receiver, one exchange per invocation.

use clap::{Parser, Subcommand};
use colored::Colorize;
use hl7wire_client::{Client, ConnectionConfig};
use hl7wire_message::AdtA01;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hl7wire")]
#[command(about = "MLLP sender for HL7 v2 clinical messages")]
#[command(version)]
struct Cli {
    /// Receiver address
    #[arg(short, long, default_value = "127.0.0.1:2575", env = "HL7WIRE_SERVER")]
    server: SocketAddr,

    /// Connect timeout in seconds
    #[arg(long, default_value = "10")]
    connect_timeout: u64,

    /// Acknowledgment read timeout in seconds
    #[arg(long, default_value = "30")]
    read_timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an ADT^A01 message from a patient record and print it
    Build {
        /// Patient record JSON file
        file: PathBuf,
    },

    /// Build an ADT^A01 message from a patient record and deliver it
    Send {
        /// Patient record JSON file
        file: PathBuf,
    },

    /// Deliver a prebuilt ER7 message as-is
    SendEr7 {
        /// ER7 message file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let config = ConnectionConfig::new(cli.server)
        .with_connect_timeout(Duration::from_secs(cli.connect_timeout))
        .with_read_timeout(Duration::from_secs(cli.read_timeout));

    match cli.command {
        Commands::Build { file } => {
            let message = build_message(&file)?;
            println!("{}", message.replace('\r', "\n"));
        }
        Commands::Send { file } => {
            let message = build_message(&file)?;
            deliver(&Client::new(config), &message).await;
        }
        Commands::SendEr7 { file } => {
            let text = std::fs::read_to_string(&file)?;
            // ER7 segments are CR-separated on the wire; files usually aren't.
            let message = text.trim_end().replace("\r\n", "\r").replace('\n', "\r");
            deliver(&Client::new(config), &message).await;
        }
    }

    Ok(())
}

fn build_message(file: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(file)?;
    let record = AdtA01::from_json(&json)?;
    Ok(record.to_er7()?)
}

async fn deliver(client: &Client, message: &str) {
    tracing::debug!(
        "Delivering {} byte message to {}",
        message.len(),
        client.endpoint()
    );

    match client.exchange(message).await {
        Ok(ack) => {
            eprintln!("{}", "Acknowledgment received".green());
            println!("{}", ack.replace('\r', "\n"));
        }
        Err(e) => {
            eprintln!("{}: {} (delivery unconfirmed)", "Error".red(), e);
            std::process::exit(1);
        }
    }
}
