pub mod auth;
pub mod detection;
pub mod dispatch;
pub mod handlers;
pub mod registry;
pub mod types;

pub use auth::{normalize_id, OwnerPolicy, OWNER_ONLY_TEXT};
pub use detection::{detect_command, COMMAND_MARKER};
pub use dispatch::{CommandContext, CommandDispatcher, CommandHandler, CommandResponse};
pub use handlers::{AiHandler, ClearWelcomeHandler, HelpHandler, SetWelcomeHandler};
pub use registry::{builtin_commands, CommandRegistry};
pub use types::{CommandDef, CommandInvocation};

use std::sync::Arc;

use chatrelay_config::ConfigStore;

/// Build a dispatcher pre-wired with all built-in handlers.
pub fn build_default_dispatcher(store: Arc<ConfigStore>, owner: Option<String>) -> CommandDispatcher {
    let registry = CommandRegistry::new();
    let help = HelpHandler::from_registry(&registry);
    let mut dispatcher = CommandDispatcher::new(registry, OwnerPolicy::new(owner));

    dispatcher.register("help", Arc::new(help));
    dispatcher.register("ai", Arc::new(AiHandler { store: Arc::clone(&store) }));
    dispatcher.register("setwelcome", Arc::new(SetWelcomeHandler { store: Arc::clone(&store) }));
    dispatcher.register("clearwelcome", Arc::new(ClearWelcomeHandler { store }));

    dispatcher
}
