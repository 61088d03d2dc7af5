/// Slash command registry — the relay's command grammar.
use crate::types::CommandDef;

fn command(key: &str, description: &str, usage: &[&str], owner_only: bool) -> CommandDef {
    CommandDef {
        key: key.to_string(),
        description: description.to_string(),
        usage: usage.iter().map(|s| s.to_string()).collect(),
        owner_only,
        text_aliases: vec![format!("/{key}")],
    }
}

/// Build the built-in command list.
pub fn builtin_commands() -> Vec<CommandDef> {
    vec![
        command("help", "show this help", &["/help"], false),
        command("ai", "turn AI replies on or off for this chat", &["/ai on", "/ai off"], true),
        command("setwelcome", "set the welcome message", &["/setwelcome <text>"], true),
        command("clearwelcome", "remove the welcome message", &["/clearwelcome"], true),
    ]
}

pub struct CommandRegistry {
    commands: Vec<CommandDef>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self { commands: builtin_commands() }
    }

    pub fn all(&self) -> &[CommandDef] {
        &self.commands
    }

    /// Find a command by slash-text alias (e.g. "/AI"), case-insensitively.
    pub fn find_by_alias(&self, alias: &str) -> Option<&CommandDef> {
        let lower = alias.to_lowercase();
        self.commands.iter().find(|c| {
            c.text_aliases.iter().any(|a| a.to_lowercase() == lower)
        })
    }

    /// Find a command by its key.
    pub fn find_by_key(&self, key: &str) -> Option<&CommandDef> {
        self.commands.iter().find(|c| c.key == key)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self { Self::new() }
}
