use crate::ChannelAdapter;
use anyhow::Context;
use async_trait::async_trait;
use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use chatrelay_config::WhatsAppConfig;
use chatrelay_core::{InboundMessage, OutboundReply, Transport};
use chatrelay_logging::redact_sensitive_data;
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

pub const WEBHOOK_PATH: &str = "/webhook/whatsapp";
const BUSINESS_ACCOUNT_OBJECT: &str = "whatsapp_business_account";

#[derive(Clone)]
struct AppState {
    inbound_tx: mpsc::Sender<InboundMessage>,
    verify_token: Option<String>,
}

// Meta/WhatsApp Cloud API webhook payloads
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    pub object: String,
    #[serde(default)]
    pub entry: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub changes: Vec<Change>,
}

#[derive(Debug, Deserialize)]
pub struct Change {
    pub field: String,
    pub value: ChangeValue,
}

/// Only `messages` changes carry metadata; other fields decode to defaults.
#[derive(Debug, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub metadata: MetaData,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub messages: Vec<WhatsAppMessage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MetaData {
    #[serde(default)]
    pub display_phone_number: String,
    #[serde(default)]
    pub phone_number_id: String,
}

#[derive(Debug, Deserialize)]
pub struct Contact {
    pub wa_id: String,
    pub profile: Option<Profile>,
}

#[derive(Debug, Deserialize)]
pub struct Profile {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct WhatsAppMessage {
    pub from: String,
    pub id: String,
    #[serde(default)]
    pub timestamp: String,
    pub text: Option<TextData>,
    #[serde(rename = "type")]
    pub msg_type: String,
}

#[derive(Debug, Deserialize)]
pub struct TextData {
    pub body: String,
}

// Verification query
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    #[serde(rename = "hub.mode")]
    pub mode: String,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: String,
    #[serde(rename = "hub.challenge")]
    pub challenge: String,
}

fn digits(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

impl ChangeValue {
    /// Decode every message in this change. Non-text messages arrive with an
    /// empty body.
    pub fn to_inbound(&self) -> Vec<InboundMessage> {
        let own_number = digits(&self.metadata.display_phone_number);

        self.messages
            .iter()
            .map(|msg| {
                let name = self
                    .contacts
                    .iter()
                    .find(|c| c.wa_id == msg.from)
                    .and_then(|c| c.profile.as_ref())
                    .map(|p| p.name.clone())
                    .unwrap_or_default();
                let text = match (msg.msg_type.as_str(), &msg.text) {
                    ("text", Some(t)) => t.body.clone(),
                    _ => String::new(),
                };

                let mut inbound = InboundMessage::new(msg.from.clone(), msg.from.clone(), text)
                    .with_message_id(msg.id.clone())
                    .with_display_name(name)
                    .from_self(!own_number.is_empty() && digits(&msg.from) == own_number);
                if let Some(ts) = msg.timestamp.parse::<i64>().ok().and_then(|s| DateTime::from_timestamp(s, 0)) {
                    inbound.received_at = ts;
                }
                inbound
            })
            .collect()
    }
}

pub struct WhatsAppAdapter {
    listen_addr: String,
    verify_token: Option<String>,
}

impl WhatsAppAdapter {
    pub fn new(listen_addr: impl Into<String>, verify_token: Option<String>) -> Self {
        Self { listen_addr: listen_addr.into(), verify_token }
    }

    /// Webhook routes feeding `inbound_tx`.
    pub fn router(&self, inbound_tx: mpsc::Sender<InboundMessage>) -> Router {
        let state = AppState { inbound_tx, verify_token: self.verify_token.clone() };
        Router::new()
            .route(WEBHOOK_PATH, get(verify_webhook).post(handle_webhook))
            .with_state(state)
    }
}

#[async_trait]
impl ChannelAdapter for WhatsAppAdapter {
    fn name(&self) -> &str {
        "whatsapp"
    }

    async fn start(&self, inbound_tx: mpsc::Sender<InboundMessage>) -> anyhow::Result<()> {
        if self.verify_token.is_none() {
            warn!("WHATSAPP_VERIFY_TOKEN is not set; webhook verification will be refused");
        }

        let app = self.router(inbound_tx);
        let listener = TcpListener::bind(&self.listen_addr)
            .await
            .with_context(|| format!("binding WhatsApp webhook on {}", self.listen_addr))?;

        info!("WhatsApp webhook listening on {}{}", self.listen_addr, WEBHOOK_PATH);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                error!("WhatsApp server error: {}", e);
            }
        });

        Ok(())
    }
}

async fn verify_webhook(
    State(state): State<AppState>,
    Query(params): Query<VerifyRequest>,
) -> Result<String, StatusCode> {
    let token_ok = state.verify_token.as_deref() == Some(params.verify_token.as_str());
    if params.mode == "subscribe" && token_ok {
        info!("WhatsApp webhook verified successfully");
        Ok(params.challenge)
    } else {
        error!("WhatsApp webhook verification failed");
        Err(StatusCode::FORBIDDEN)
    }
}

async fn handle_webhook(State(state): State<AppState>, Json(payload): Json<WebhookPayload>) -> StatusCode {
    if payload.object != BUSINESS_ACCOUNT_OBJECT {
        debug!("Ignoring webhook for object {}", payload.object);
        return StatusCode::OK;
    }

    for change in payload.entry.iter().flat_map(|e| &e.changes) {
        if change.field != "messages" {
            continue;
        }
        for msg in change.value.to_inbound() {
            debug!("WhatsApp message {} from {}", msg.message_id, redact_sensitive_data(&msg.sender_id));
            if state.inbound_tx.send(msg).await.is_err() {
                error!("Relay inbound channel closed; dropping WhatsApp message");
                return StatusCode::SERVICE_UNAVAILABLE;
            }
        }
    }

    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct SendTextRequest<'a> {
    messaging_product: &'static str,
    to: &'a str,
    #[serde(rename = "type")]
    msg_type: &'static str,
    text: SendTextBody<'a>,
}

#[derive(Debug, Serialize)]
struct SendTextBody<'a> {
    body: &'a str,
}

/// Sends replies through the Graph API `/{phone_number_id}/messages` endpoint.
pub struct WhatsAppSender {
    client: reqwest::Client,
    graph_url: String,
    phone_number_id: Option<String>,
    access_token: Option<String>,
}

impl WhatsAppSender {
    pub fn from_config(config: &WhatsAppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            graph_url: config.graph_url.trim_end_matches('/').to_string(),
            phone_number_id: config.phone_number_id.clone(),
            access_token: config.access_token.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.phone_number_id.is_some() && self.access_token.is_some()
    }
}

#[async_trait]
impl Transport for WhatsAppSender {
    fn name(&self) -> &str {
        "whatsapp"
    }

    async fn send(&self, reply: &OutboundReply) -> anyhow::Result<()> {
        let (Some(phone_number_id), Some(token)) = (&self.phone_number_id, &self.access_token) else {
            anyhow::bail!("WhatsApp sender is not configured (phone number id / access token missing)");
        };

        let url = format!("{}/{}/messages", self.graph_url, phone_number_id);
        let body = SendTextRequest {
            messaging_product: "whatsapp",
            to: &reply.conversation_id,
            msg_type: "text",
            text: SendTextBody { body: &reply.text },
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .context("WhatsApp Graph API request failed")?;

        let status = response.status();
        if !status.is_success() {
            let detail = redact_sensitive_data(&response.text().await.unwrap_or_default());
            anyhow::bail!("WhatsApp Graph API returned {}: {}", status, detail);
        }

        debug!("WhatsApp reply delivered to {}", redact_sensitive_data(&reply.conversation_id));
        Ok(())
    }
}
