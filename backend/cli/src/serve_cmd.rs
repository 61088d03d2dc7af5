//! `chatrelay serve`: wire the store, commands, completion client, and
//! WhatsApp adapter together and run until interrupted.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{info, warn};

use chatrelay_channels::{ChannelAdapter, WhatsAppAdapter, WhatsAppSender};
use chatrelay_commands::build_default_dispatcher;
use chatrelay_completion::CompletionClient;
use chatrelay_config::{log_report, open_store, validate, RelayConfig};
use chatrelay_core::Transport;
use chatrelay_logging::init_logger;
use chatrelay_routing::{MessageRouter, Relay};

const INBOUND_QUEUE: usize = 256;

pub async fn run(config: RelayConfig) -> Result<()> {
    let log_dir = config.log_dir();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating session directory {}", config.session_dir.display()))?;
    init_logger(&log_dir, &config.log_level);

    info!(
        listen = %config.listen_addr(),
        model = %config.openai_model,
        settings = %config.settings_file.display(),
        default_ai_enabled = config.default_ai_enabled,
        "Starting chatrelay"
    );
    log_report(&validate(&config));

    let store = Arc::new(open_store(&config).await);
    let dispatcher = build_default_dispatcher(Arc::clone(&store), config.owner.clone());
    let completion = CompletionClient::from_config(&config);
    info!(provider = %completion.provider_name(), model = %completion.model(), "Completion client ready");
    let router = MessageRouter::new(store, completion, &config.welcome_trigger);
    let relay = Arc::new(Relay::new(dispatcher, router));

    let sender = WhatsAppSender::from_config(&config.whatsapp);
    if !sender.is_configured() {
        warn!("WhatsApp access token or phone number id missing; replies will fail to send");
    }
    let transport: Arc<dyn Transport> = Arc::new(sender);

    let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_QUEUE);
    let adapter = WhatsAppAdapter::new(config.listen_addr(), config.whatsapp.verify_token.clone());
    adapter.start(inbound_tx).await?;
    info!("Registered {} channel adapter", adapter.name());

    tokio::select! {
        _ = relay.run(inbound_rx, transport) => info!("Relay loop finished"),
        res = tokio::signal::ctrl_c() => {
            res.context("waiting for shutdown signal")?;
            info!("Shutting down");
        }
    }

    Ok(())
}
