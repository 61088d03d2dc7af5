/// Relay pipeline — filter, log, dispatch or route, then send.
use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info};

use chatrelay_commands::{CommandContext, CommandDispatcher};
use chatrelay_core::{InboundMessage, OutboundReply, RelayError, Transport};
use chatrelay_logging::{redact_sensitive_data, EventLogger, RelayEvent};

use crate::filter::drop_reason;
use crate::router::MessageRouter;

const INBOUND_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const COMMAND_SOURCE: &str = "command";

/// Local wall-clock time for the inbound log line.
fn inbound_timestamp(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format(INBOUND_TIME_FORMAT).to_string()
}

pub struct Relay {
    dispatcher: CommandDispatcher,
    router: MessageRouter,
}

impl Relay {
    pub fn new(dispatcher: CommandDispatcher, router: MessageRouter) -> Self {
        Self { dispatcher, router }
    }

    /// Compute the reply for one inbound message, if any.
    ///
    /// Filtered messages and unrecognized commands yield `Ok(None)`.
    pub async fn handle(&self, msg: &InboundMessage) -> Result<Option<OutboundReply>, RelayError> {
        if let Some(reason) = drop_reason(msg) {
            debug!("[Relay] Dropping {} from {}: {}", msg.message_id, msg.conversation_id, reason);
            return Ok(None);
        }

        info!(
            "[{}] {} ({}): {}",
            inbound_timestamp(&msg.received_at),
            msg.display_name,
            msg.conversation_id,
            redact_sensitive_data(&msg.text)
        );
        EventLogger::log_event(
            &msg.conversation_id,
            RelayEvent::Inbound { display_name: msg.display_name.clone(), text: msg.text.clone() },
        );

        let (source, text) = if msg.is_command() {
            let ctx = CommandContext {
                conversation_id: msg.conversation_id.clone(),
                sender_id: msg.sender_id.clone(),
            };
            match self.dispatcher.dispatch_text(&ctx, &msg.text).await.map_err(RelayError::Command)? {
                Some(response) => (COMMAND_SOURCE, response.text),
                None => return Ok(None),
            }
        } else {
            let routed = self.router.route(&msg.conversation_id, &msg.text).await;
            (routed.source.as_str(), routed.text)
        };

        EventLogger::log_event(
            &msg.conversation_id,
            RelayEvent::Reply { source: source.to_string(), text: text.clone() },
        );
        Ok(Some(OutboundReply::new(msg.conversation_id.clone(), text)))
    }

    /// Handle and deliver one message. Errors stop here.
    pub async fn process(&self, msg: InboundMessage, transport: &dyn Transport) {
        let reply = match self.handle(&msg).await {
            Ok(Some(reply)) => reply,
            Ok(None) => return,
            Err(e) => {
                error!("[Relay] Failed to handle {}: {}", msg.message_id, e);
                EventLogger::log_event(&msg.conversation_id, RelayEvent::Error { error_msg: e.to_string() });
                return;
            }
        };

        if let Err(e) = transport.send(&reply).await {
            let e = RelayError::Transport { transport: transport.name().to_string(), message: format!("{e:#}") };
            error!("[Relay] Reply to {} not delivered: {}", reply.conversation_id, e);
            EventLogger::log_event(&reply.conversation_id, RelayEvent::Error { error_msg: e.to_string() });
        }
    }

    /// Consume inbound messages until the channel closes, one task per message.
    pub async fn run(self: Arc<Self>, mut rx: mpsc::Receiver<InboundMessage>, transport: Arc<dyn Transport>) {
        info!("[Relay] Running on {}", transport.name());
        let mut tasks = JoinSet::new();

        loop {
            tokio::select! {
                next = rx.recv() => match next {
                    Some(msg) => {
                        let relay = Arc::clone(&self);
                        let transport = Arc::clone(&transport);
                        tasks.spawn(async move { relay.process(msg, transport.as_ref()).await });
                    }
                    None => break,
                },
                Some(done) = tasks.join_next(), if !tasks.is_empty() => log_task_result(done),
            }
        }

        while let Some(done) = tasks.join_next().await {
            log_task_result(done);
        }
        info!("[Relay] Inbound channel closed");
    }
}

fn log_task_result(result: Result<(), JoinError>) {
    if let Err(e) = result {
        if e.is_panic() {
            error!("[Relay] Message task panicked: {}", e);
        } else {
            debug!("[Relay] Message task cancelled: {}", e);
        }
    }
}
