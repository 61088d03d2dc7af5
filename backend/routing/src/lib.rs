pub mod filter;
pub mod relay;
pub mod router;

pub use filter::{drop_reason, DropReason};
pub use relay::Relay;
pub use router::{MessageRouter, ReplySource, RoutedReply, AI_DISABLED_TEXT, DEFAULT_PERSONA};
