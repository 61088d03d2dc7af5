/// Slash command types.

/// A fully-defined slash command entry in the registry.
#[derive(Debug, Clone)]
pub struct CommandDef {
    /// Unique key (e.g. "ai", "setwelcome").
    pub key: String,
    pub description: String,
    /// Usage line shown in /help (e.g. "/ai on").
    pub usage: Vec<String>,
    /// Only the configured owner may run it.
    pub owner_only: bool,
    /// Slash aliases (must start with '/').
    pub text_aliases: Vec<String>,
}

/// A detected and parsed slash-command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub key: String,
    pub raw_alias: String,
    /// Full remaining text after the command name, trimmed.
    pub raw_args: String,
}
