/// Inbound filter — decide which transport events never reach the relay.
use std::fmt;

use chatrelay_core::InboundMessage;

pub const STATUS_BROADCAST_ID: &str = "status@broadcast";
const BROADCAST_SUFFIX: &str = "@broadcast";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    FromSelf,
    Broadcast,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            DropReason::FromSelf => "sent by this session",
            DropReason::Broadcast => "broadcast or status channel",
        };
        f.write_str(reason)
    }
}

pub fn is_broadcast(conversation_id: &str) -> bool {
    conversation_id == STATUS_BROADCAST_ID || conversation_id.ends_with(BROADCAST_SUFFIX)
}

/// Why `msg` should be dropped, or `None` if it should be handled.
pub fn drop_reason(msg: &InboundMessage) -> Option<DropReason> {
    if msg.is_from_self {
        Some(DropReason::FromSelf)
    } else if is_broadcast(&msg.conversation_id) {
        Some(DropReason::Broadcast)
    } else {
        None
    }
}
