//! Structured logging for the relay.
//!
//! Handles subscriber setup (console + rolling NDJSON file), redaction of
//! phone numbers and credentials, and the per-conversation relay event log.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{EventLogEntry, EventLogger, RelayEvent};
pub use logger::{init_logger, LOG_FILE_PREFIX};
pub use redact::redact_sensitive_data;
