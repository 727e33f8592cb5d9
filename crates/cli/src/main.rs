use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "courier")]
#[command(about = "Courier CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Connect to Discord and relay channel messages to the backend.
    Run {
        /// Config file path (default: COURIER_CONFIG_PATH or ~/.courier/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("courier {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Run { config }) => {
            if let Err(e) = run_relay(config).await {
                log::error!("relay failed: {}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

async fn run_relay(config_path: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    let config = lib::config::load_config(config_path)?;

    let Some(token) = lib::config::resolve_discord_token(&config) else {
        anyhow::bail!("discord bot token not configured (set DISCORD_BOT_TOKEN or discord.botToken)");
    };
    let Some(api_key) = lib::config::resolve_api_key(&config) else {
        anyhow::bail!("backend api key not configured (set BACKEND_API_KEY or backend.apiKey)");
    };

    let backend_url = lib::config::resolve_backend_url(&config);
    let timeout_secs = lib::config::resolve_timeout_secs(&config);
    let command_prefix = lib::config::resolve_command_prefix(&config);
    let allowed_channels = lib::config::resolve_allowed_channels(&config);

    log::info!("backend url: {}", backend_url);
    log::info!("backend api key: {}****", masked_prefix(&api_key));
    log::info!("timeout: {}s", timeout_secs);
    if allowed_channels.is_empty() {
        log::info!("responding in all channels and DMs");
    } else {
        log::info!("restricted to channels: {:?}", allowed_channels);
    }

    let backend = Arc::new(lib::backend::BackendClient::new(
        backend_url.clone(),
        api_key,
        Duration::from_secs(timeout_secs),
    ));
    let settings = lib::dispatcher::RelaySettings {
        backend_url,
        timeout_secs,
        command_prefix,
        allowed_channels,
        max_message_len: discord_channel::MAX_MESSAGE_LEN,
    };
    let dispatcher = Arc::new(lib::dispatcher::Dispatcher::new(
        settings,
        lib::context::ContextStore::new(),
        backend,
    ));

    discord_channel::run(&token, dispatcher).await
}

/// First characters of a secret for startup logs; the rest stays masked.
fn masked_prefix(secret: &str) -> String {
    secret.chars().take(4).collect()
}
