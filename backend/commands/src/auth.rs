//! Owner authorization for admin commands.

/// Reply sent when a non-owner runs an owner-only command.
pub const OWNER_ONLY_TEXT: &str = "Failed: this command is restricted to the bot owner.";

/// Normalize a phone-like identifier: trim, drop any `@domain` suffix, drop a leading `+`.
pub fn normalize_id(id: &str) -> String {
    let id = id.trim();
    let local = id.split_once('@').map(|(l, _)| l).unwrap_or(id);
    local.trim_start_matches('+').to_string()
}

/// Decides whether a sender is the configured owner. Fails closed when no
/// owner is configured.
#[derive(Debug, Clone, Default)]
pub struct OwnerPolicy {
    owner: Option<String>,
}

impl OwnerPolicy {
    pub fn new(owner: Option<String>) -> Self {
        let owner = owner.map(|o| normalize_id(&o)).filter(|o| !o.is_empty());
        Self { owner }
    }

    pub fn is_owner(&self, sender_id: &str) -> bool {
        match &self.owner {
            Some(owner) => normalize_id(sender_id) == *owner,
            None => false,
        }
    }
}
