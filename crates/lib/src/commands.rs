//! Control commands intercepted before relay: reset, status, help.

/// A recognized control command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Reset,
    Status,
    Help,
}

impl Command {
    /// Parse an exact `<prefix><name>` command, case-insensitively.
    /// Anything else returns None and is relayed to the backend.
    pub fn parse(text: &str, prefix: &str) -> Option<Self> {
        let lowered = text.to_lowercase();
        let name = lowered.strip_prefix(&prefix.to_lowercase())?;
        match name {
            "reset" => Some(Self::Reset),
            "status" => Some(Self::Status),
            "help" => Some(Self::Help),
            _ => None,
        }
    }
}

/// Confirmation after a context reset.
pub fn reset_reply() -> String {
    "conversation reset. the next message starts a fresh session.".to_string()
}

/// Current relay configuration and the channel's context token.
pub fn status_reply(backend_url: &str, timeout_secs: u64, context_id: &str) -> String {
    let context = if context_id.is_empty() {
        "(none)"
    } else {
        context_id
    };
    format!(
        "relay status\nbackend: {}\ncontext: {}\ntimeout: {}s",
        backend_url, context, timeout_secs
    )
}

/// Usage text listing the three commands.
pub fn help_reply(prefix: &str) -> String {
    format!(
        "send any message to chat with the backend agent.\n\n\
         commands:\n\
         {p}reset - start a new conversation\n\
         {p}status - show relay status\n\
         {p}help - show this message",
        p = prefix
    )
}
