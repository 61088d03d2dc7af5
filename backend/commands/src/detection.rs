/// Slash command detection — identify /commands in inbound messages.
use crate::registry::CommandRegistry;
use crate::types::CommandInvocation;

/// Character that marks a message as a command.
pub const COMMAND_MARKER: char = '/';

/// Detect a known slash command at the start of a message string.
///
/// Returns `None` for normal messages and for unrecognized commands.
pub fn detect_command(text: &str, registry: &CommandRegistry) -> Option<CommandInvocation> {
    let trimmed = text.trim();
    if !trimmed.starts_with(COMMAND_MARKER) {
        return None;
    }

    let (alias_part, rest) = trimmed
        .split_once(char::is_whitespace)
        .map(|(a, r)| (a, r.trim()))
        .unwrap_or((trimmed, ""));

    let def = registry.find_by_alias(alias_part)?;

    Some(CommandInvocation {
        key: def.key.clone(),
        raw_alias: alias_part.to_string(),
        raw_args: rest.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_not_a_command() {
        let registry = CommandRegistry::new();
        assert!(detect_command("hello /help", &registry).is_none());
    }

    #[test]
    fn splits_alias_and_arguments() {
        let registry = CommandRegistry::new();
        let inv = detect_command("/AI   on", &registry).unwrap();
        assert_eq!(inv.key, "ai");
        assert_eq!(inv.raw_alias, "/AI");
        assert_eq!(inv.raw_args, "on");
    }

    #[test]
    fn keeps_inner_spacing_of_remaining_text() {
        let registry = CommandRegistry::new();
        let inv = detect_command("/setwelcome  Welcome to  our shop! ", &registry).unwrap();
        assert_eq!(inv.raw_args, "Welcome to  our shop!");
    }

    #[test]
    fn bare_command_has_no_arguments() {
        let registry = CommandRegistry::new();
        let inv = detect_command("/setwelcome", &registry).unwrap();
        assert_eq!(inv.raw_args, "");
    }

    #[test]
    fn unknown_command_is_none() {
        let registry = CommandRegistry::new();
        assert!(detect_command("/weather riyadh", &registry).is_none());
    }
}
