//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.courier/config.json`) and the
//! environment; env values override file values per setting. Missing file
//! means defaults, but the Discord token and backend API key have no default
//! and their absence is a fatal startup error (checked by the CLI).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Backend endpoint settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Discord connection settings.
    #[serde(default)]
    pub discord: DiscordConfig,

    /// Control-command settings.
    #[serde(default)]
    pub commands: CommandsConfig,
}

/// Backend endpoint, credential, and timeout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendConfig {
    /// Relay endpoint URL. Overridden by BACKEND_API_URL env when set.
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// API key sent in the X-API-KEY header. Overridden by BACKEND_API_KEY env.
    pub api_key: Option<String>,

    /// Per-call timeout in seconds (default 300; the backend can be slow).
    /// Overridden by BACKEND_TIMEOUT_SECS env.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_backend_url() -> String {
    "http://127.0.0.1:80/api_message".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

/// Discord bot token and optional channel allow-list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscordConfig {
    /// Bot token from the developer portal. Overridden by DISCORD_BOT_TOKEN env when set.
    pub bot_token: Option<String>,

    /// Channel ids the relay answers in; empty means all channels and DMs.
    /// Overridden by DISCORD_CHANNEL_IDS env (comma-separated).
    #[serde(default)]
    pub allowed_channels: Vec<String>,
}

/// Control-command settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandsConfig {
    /// Prefix for reset/status/help (default "!"). Overridden by COURIER_CMD_PREFIX env.
    #[serde(default = "default_command_prefix")]
    pub prefix: String,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            prefix: default_command_prefix(),
        }
    }
}

fn default_command_prefix() -> String {
    "!".to_string()
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|s| {
        let t = s.trim();
        if t.is_empty() {
            None
        } else {
            Some(t.to_string())
        }
    })
}

/// Resolve the Discord bot token: env DISCORD_BOT_TOKEN overrides config.
pub fn resolve_discord_token(config: &Config) -> Option<String> {
    env_non_empty("DISCORD_BOT_TOKEN").or_else(|| {
        config
            .discord
            .bot_token
            .as_ref()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

/// Resolve the backend API key: env BACKEND_API_KEY overrides config.
pub fn resolve_api_key(config: &Config) -> Option<String> {
    env_non_empty("BACKEND_API_KEY").or_else(|| {
        config
            .backend
            .api_key
            .as_ref()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

/// Resolve the backend URL: env BACKEND_API_URL overrides config.
pub fn resolve_backend_url(config: &Config) -> String {
    env_non_empty("BACKEND_API_URL").unwrap_or_else(|| config.backend.url.trim().to_string())
}

/// Resolve the per-call timeout: env BACKEND_TIMEOUT_SECS overrides config.
pub fn resolve_timeout_secs(config: &Config) -> u64 {
    env_non_empty("BACKEND_TIMEOUT_SECS")
        .and_then(|s| s.parse().ok())
        .unwrap_or(config.backend.timeout_secs)
}

/// Resolve the command prefix: env COURIER_CMD_PREFIX overrides config.
pub fn resolve_command_prefix(config: &Config) -> String {
    env_non_empty("COURIER_CMD_PREFIX").unwrap_or_else(|| config.commands.prefix.clone())
}

/// Parse a comma-separated channel id list; blank entries are dropped.
pub fn parse_channel_allowlist(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Resolve the channel allow-list: env DISCORD_CHANNEL_IDS (comma-separated)
/// overrides config. Empty means the relay responds everywhere.
pub fn resolve_allowed_channels(config: &Config) -> HashSet<String> {
    match env_non_empty("DISCORD_CHANNEL_IDS") {
        Some(raw) => parse_channel_allowlist(&raw),
        None => config
            .discord
            .allowed_channels
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    }
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("COURIER_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".courier").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from the default path (or COURIER_CONFIG_PATH). Missing file => default config.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(default_config_path);
    if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        return Ok(Config::default());
    }
    let s = std::fs::read_to_string(&path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parsing config from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let c = Config::default();
        assert_eq!(c.backend.url, "http://127.0.0.1:80/api_message");
        assert_eq!(c.backend.timeout_secs, 300);
        assert_eq!(c.commands.prefix, "!");
        assert!(c.discord.allowed_channels.is_empty());
        assert!(c.discord.bot_token.is_none());
    }

    #[test]
    fn parses_camel_case_config() {
        let c: Config = serde_json::from_str(
            r#"{
                "backend": {"url": "http://10.0.0.5/api_message", "apiKey": "k", "timeoutSecs": 60},
                "discord": {"botToken": "t", "allowedChannels": ["1", "2"]},
                "commands": {"prefix": "?"}
            }"#,
        )
        .expect("parse config");
        assert_eq!(c.backend.url, "http://10.0.0.5/api_message");
        assert_eq!(c.backend.timeout_secs, 60);
        assert_eq!(c.backend.api_key.as_deref(), Some("k"));
        assert_eq!(c.discord.bot_token.as_deref(), Some("t"));
        assert_eq!(c.discord.allowed_channels, vec!["1", "2"]);
        assert_eq!(c.commands.prefix, "?");
    }

    #[test]
    fn empty_object_uses_defaults() {
        let c: Config = serde_json::from_str("{}").expect("parse config");
        assert_eq!(c.backend.timeout_secs, 300);
        assert_eq!(c.commands.prefix, "!");
    }

    #[test]
    fn allowlist_parsing_trims_and_drops_blanks() {
        let set = parse_channel_allowlist(" 111, 222 ,,333 ");
        assert_eq!(set.len(), 3);
        assert!(set.contains("111"));
        assert!(set.contains("222"));
        assert!(set.contains("333"));
    }

    #[test]
    fn allowlist_of_blanks_is_empty() {
        assert!(parse_channel_allowlist(" , ,").is_empty());
    }
}
