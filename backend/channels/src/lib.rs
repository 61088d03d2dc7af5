use async_trait::async_trait;
use chatrelay_core::InboundMessage;
use tokio::sync::mpsc;

pub mod whatsapp;

pub use whatsapp::{WhatsAppAdapter, WhatsAppSender};

/// Inbound half of a messaging transport.
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    /// Human-readable adapter name for logging.
    fn name(&self) -> &str;

    /// Start receiving; every decoded message is pushed to `inbound_tx`.
    async fn start(&self, inbound_tx: mpsc::Sender<InboundMessage>) -> anyhow::Result<()>;
}
