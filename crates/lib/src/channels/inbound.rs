//! Inbound message from a channel: delivered to the dispatcher for relay handling.

/// A channel event reduced to what the dispatcher needs. Adapters build one
/// per platform message.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Platform channel identifier; the unit of context isolation.
    pub channel_id: String,
    /// Display name of the sender (log lines only).
    pub author: String,
    /// The sender is this relay's own account.
    pub from_self: bool,
    /// The sender is flagged as an automated account.
    pub from_bot: bool,
    pub text: String,
}
