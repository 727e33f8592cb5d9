//! Event dispatcher: one inbound message in, at most one backend call out.
//!
//! Filtering, command interception, context lookup/update, and chunked reply
//! delivery. Every failure is converted into a single user-visible reply in
//! the originating channel and never escapes the handling of one message.

use crate::backend::{BackendError, RelayBackend};
use crate::channels::{InboundMessage, Responder};
use crate::chunker;
use crate::commands::{self, Command};
use crate::context::ContextStore;
use std::collections::HashSet;
use std::sync::Arc;

/// How much of a message or reply is quoted in log lines.
const LOG_EXCERPT_CHARS: usize = 100;
/// How much of an unexpected error is echoed back to the user.
const ERROR_REPLY_CHARS: usize = 500;

/// Resolved settings the dispatcher needs per message.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    /// Backend endpoint; shown in status and unreachable replies.
    pub backend_url: String,
    /// Per-call timeout in seconds; shown in status and timeout replies.
    pub timeout_secs: u64,
    pub command_prefix: String,
    /// When non-empty, only these channel ids are answered.
    pub allowed_channels: HashSet<String>,
    /// Transport message-size limit for reply chunks.
    pub max_message_len: usize,
}

/// Orchestrates one inbound message to completion.
pub struct Dispatcher {
    settings: RelaySettings,
    contexts: ContextStore,
    backend: Arc<dyn RelayBackend>,
}

impl Dispatcher {
    pub fn new(
        settings: RelaySettings,
        contexts: ContextStore,
        backend: Arc<dyn RelayBackend>,
    ) -> Self {
        Self {
            settings,
            contexts,
            backend,
        }
    }

    /// Handle one channel message: filter, intercept commands, relay, deliver.
    pub async fn handle(&self, msg: InboundMessage, responder: &dyn Responder) {
        if msg.from_self || msg.from_bot {
            return;
        }
        if !self.settings.allowed_channels.is_empty()
            && !self.settings.allowed_channels.contains(&msg.channel_id)
        {
            return;
        }
        let text = msg.text.trim();
        if text.is_empty() {
            return;
        }

        if let Some(cmd) = Command::parse(text, &self.settings.command_prefix) {
            self.run_command(cmd, &msg.channel_id, responder).await;
            return;
        }

        let context_id = self.contexts.get(&msg.channel_id).await;
        log::info!(
            "[{}] -> backend: {}",
            msg.author,
            chunker::truncate_chars(text, LOG_EXCERPT_CHARS)
        );

        responder.start_typing().await;
        match self.backend.relay(text, &context_id).await {
            Ok(reply) => {
                self.contexts.set(&msg.channel_id, &reply.context_id).await;
                log::info!(
                    "backend -> [{}]: {}",
                    msg.author,
                    chunker::truncate_chars(&reply.text, LOG_EXCERPT_CHARS)
                );
                self.deliver(&reply.text, responder).await;
            }
            Err(BackendError::Timeout) => {
                log::warn!(
                    "relay: backend timed out after {}s for [{}]",
                    self.settings.timeout_secs,
                    msg.author
                );
                let _ = responder
                    .reply(&format!(
                        "the backend took too long to respond (timeout: {}s). \
                         try again or use {}reset to start fresh.",
                        self.settings.timeout_secs, self.settings.command_prefix
                    ))
                    .await;
            }
            Err(BackendError::Unreachable(e)) => {
                log::error!("relay: backend unreachable: {}", e);
                let _ = responder
                    .reply(&format!(
                        "cannot reach the backend at {}. is the server running?",
                        self.settings.backend_url
                    ))
                    .await;
            }
            Err(e) => {
                log::error!("relay: backend call failed: {}", e);
                let _ = responder
                    .reply(&format!(
                        "relay error: {}",
                        chunker::truncate_chars(&e.to_string(), ERROR_REPLY_CHARS)
                    ))
                    .await;
            }
        }
        responder.stop_typing().await;
    }

    async fn run_command(&self, cmd: Command, channel_id: &str, responder: &dyn Responder) {
        let reply = match cmd {
            Command::Reset => {
                self.contexts.clear(channel_id).await;
                log::info!("relay: context reset for channel {}", channel_id);
                commands::reset_reply()
            }
            Command::Status => {
                let context_id = self.contexts.get(channel_id).await;
                commands::status_reply(
                    &self.settings.backend_url,
                    self.settings.timeout_secs,
                    &context_id,
                )
            }
            Command::Help => commands::help_reply(&self.settings.command_prefix),
        };
        if responder.reply(&reply).await.is_err() {
            log::warn!("relay: command reply failed for channel {}", channel_id);
        }
    }

    /// Split the reply to the transport limit; the first chunk answers the
    /// triggering message, the rest go to the channel in order.
    async fn deliver(&self, text: &str, responder: &dyn Responder) {
        let chunks = match chunker::split_message(text, self.settings.max_message_len) {
            Ok(chunks) => chunks,
            Err(e) => {
                log::error!("relay: splitting reply failed: {}", e);
                return;
            }
        };
        for (i, chunk) in chunks.iter().enumerate() {
            let sent = if i == 0 {
                responder.reply(chunk).await
            } else {
                responder.send(chunk).await
            };
            if sent.is_err() {
                log::warn!(
                    "relay: delivering reply chunk {}/{} failed",
                    i + 1,
                    chunks.len()
                );
                return;
            }
        }
    }
}
