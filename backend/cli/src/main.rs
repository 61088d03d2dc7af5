mod serve_cmd;
mod settings_cmd;

use anyhow::Result;
use clap::{Parser, Subcommand};

use chatrelay_config::RelayConfig;

#[derive(Parser)]
#[command(name = "chatrelay")]
#[command(about = "chatrelay — WhatsApp chat relay with per-chat AI replies")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook listener and relay loop
    Serve {
        /// Port to bind the webhook listener to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the persisted per-conversation settings
    Settings,
    /// Print the effective configuration (secrets redacted) and validation results
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = RelayConfig::from_env();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            let config = RelayConfig {
                port: port.unwrap_or(config.port),
                ..config
            };
            serve_cmd::run(config).await?;
        }
        Commands::Settings => settings_cmd::print_settings(&config).await?,
        Commands::Config => settings_cmd::print_config(&config)?,
    }

    Ok(())
}
