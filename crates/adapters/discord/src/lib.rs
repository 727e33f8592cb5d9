//! Discord channel: serenity gateway events in, threaded replies and channel
//! sends out.
//!
//! The handler reduces each message event to an InboundMessage and hands it
//! to the dispatcher; delivery goes back through a Responder bound to the
//! triggering message. The dispatcher does all filtering and command
//! handling; nothing platform-specific leaks past this crate.

use async_trait::async_trait;
use lib::channels::{InboundMessage, Responder};
use lib::dispatcher::Dispatcher;
use serenity::all::{Client, Context, EventHandler, GatewayIntents, Http, Message, Ready, Typing};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Discord message length limit, in characters.
pub const MAX_MESSAGE_LEN: usize = 2000;

/// Bridges Discord gateway events to the dispatcher.
pub struct Handler {
    dispatcher: Arc<Dispatcher>,
    /// Own user id, learned from the ready event; 0 until then.
    bot_user_id: AtomicU64,
}

impl Handler {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            bot_user_id: AtomicU64::new(0),
        }
    }

    /// Gateway intents the relay needs (guild and DM messages with content).
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT
    }
}

/// Responder bound to one triggering message: reply threads onto it, send
/// posts plainly to the same channel.
struct MessageResponder {
    http: Arc<Http>,
    message: Message,
    typing: Mutex<Option<Typing>>,
}

#[async_trait]
impl Responder for MessageResponder {
    async fn reply(&self, text: &str) -> Result<(), String> {
        self.message
            .reply(&self.http, text)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    async fn send(&self, text: &str) -> Result<(), String> {
        self.message
            .channel_id
            .say(&self.http, text)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    async fn start_typing(&self) {
        let typing = self.message.channel_id.start_typing(&self.http);
        *self.typing.lock().await = Some(typing);
    }

    async fn stop_typing(&self) {
        if let Some(typing) = self.typing.lock().await.take() {
            typing.stop();
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        self.bot_user_id.store(ready.user.id.get(), Ordering::SeqCst);
        log::info!("discord channel: logged in as {}", ready.user.name);
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let bot_id = self.bot_user_id.load(Ordering::SeqCst);
        let inbound = InboundMessage {
            channel_id: msg.channel_id.to_string(),
            author: msg.author.name.clone(),
            from_self: bot_id != 0 && msg.author.id.get() == bot_id,
            from_bot: msg.author.bot,
            text: msg.content.clone(),
        };
        let responder = MessageResponder {
            http: ctx.http.clone(),
            message: msg,
            typing: Mutex::new(None),
        };
        self.dispatcher.handle(inbound, &responder).await;
    }
}

/// Connect to Discord and run the event loop until the connection ends.
pub async fn run(token: &str, dispatcher: Arc<Dispatcher>) -> anyhow::Result<()> {
    let mut client = Client::builder(token, Handler::intents())
        .event_handler(Handler::new(dispatcher))
        .await?;
    client.start().await?;
    Ok(())
}
