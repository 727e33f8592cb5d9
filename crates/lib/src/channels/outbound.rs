//! Outbound delivery seam: how the dispatcher answers the triggering message.

use async_trait::async_trait;

/// Delivery primitives bound to one inbound message. Implemented by channel
/// adapters; the dispatcher never sees platform types.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Send a threaded reply to the triggering message.
    async fn reply(&self, text: &str) -> Result<(), String>;

    /// Send a plain message to the same channel.
    async fn send(&self, text: &str) -> Result<(), String>;

    /// Show a typing indicator while a relay call is in flight.
    async fn start_typing(&self) {}

    async fn stop_typing(&self) {}
}
