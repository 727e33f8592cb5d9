//! Channel seam between platform adapters and the relay core.
//!
//! Adapters turn platform events into InboundMessage values and implement
//! Responder for delivery back to the originating conversation.

mod inbound;
mod outbound;

pub use inbound::InboundMessage;
pub use outbound::Responder;
