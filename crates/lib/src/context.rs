//! Per-channel conversation context: channel id -> backend context token.
//!
//! Created lazily on first use, replaced after a successful relay, removed by
//! the reset command. In-memory only; lives for the process lifetime.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory store of backend context tokens, one per channel.
#[derive(Clone)]
pub struct ContextStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl Default for ContextStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Current token for a channel; empty string when none is stored.
    pub async fn get(&self, channel_id: &str) -> String {
        self.inner
            .read()
            .await
            .get(channel_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Store a token for a channel. An empty token is ignored: a stored
    /// context is only replaced by a newer token or an explicit clear.
    pub async fn set(&self, channel_id: &str, token: &str) {
        if token.is_empty() {
            return;
        }
        self.inner
            .write()
            .await
            .insert(channel_id.to_string(), token.to_string());
    }

    /// Forget a channel's context; the next relay starts a fresh conversation.
    pub async fn clear(&self, channel_id: &str) {
        self.inner.write().await.remove(channel_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_channel_yields_empty() {
        let store = ContextStore::new();
        assert_eq!(store.get("42").await, "");
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let store = ContextStore::new();
        store.set("42", "ctx-1").await;
        assert_eq!(store.get("42").await, "ctx-1");
    }

    #[tokio::test]
    async fn empty_token_does_not_overwrite() {
        let store = ContextStore::new();
        store.set("42", "abc").await;
        store.set("42", "").await;
        assert_eq!(store.get("42").await, "abc");
    }

    #[tokio::test]
    async fn clear_removes_the_entry() {
        let store = ContextStore::new();
        store.set("42", "ctx-1").await;
        store.clear("42").await;
        assert_eq!(store.get("42").await, "");
    }

    #[tokio::test]
    async fn channels_are_isolated() {
        let store = ContextStore::new();
        store.set("42", "ctx-1").await;
        store.set("43", "ctx-2").await;
        store.clear("42").await;
        assert_eq!(store.get("42").await, "");
        assert_eq!(store.get("43").await, "ctx-2");
    }
}
