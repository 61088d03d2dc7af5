pub mod error;
pub mod message;
pub mod traits;

pub use error::{CompletionError, RelayError};
pub use message::{ChatMessage, InboundMessage, OutboundReply, Role};
pub use traits::{LlmProvider, LlmRequest, LlmResponse, Transport};
