//! Bingohall Room Server Binary
//!
//! Standalone HTTP/WebSocket server hosting multiplayer bingo rooms.

use bingohall::api::ApiServer;
use bingohall::config::BingohallConfig;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "bingohall")]
#[command(about = "Bingohall Room Server", long_about = None)]
struct Args {
    /// Server host
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Server port
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<String>,

    /// Allowed CORS origins (comma-separated, use * for all)
    #[arg(long, default_value = "*")]
    cors_origins: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,

    /// Default player limit for new rooms
    #[arg(long, default_value = "2")]
    player_limit: usize,

    /// Bot call delay in milliseconds (solo rooms)
    #[arg(long, default_value = "1000")]
    bot_delay: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bingohall=info,tower_http=info".into()),
        )
        .init();

    let args = Args::parse();

    // File config first, CLI flags override
    let mut config = match &args.config {
        Some(path) => BingohallConfig::load_from_file(path)?,
        None => BingohallConfig::default(),
    };

    config.server.host = args.host;
    config.server.port = args.port;
    config.server.request_timeout_secs = args.timeout;
    config.server.allowed_origins = args
        .cors_origins
        .split(',')
        .map(|s| s.trim().to_string())
        .collect();
    config.room.default_player_limit = args.player_limit;
    config.game.bot_delay_ms = args.bot_delay;

    config.validate()?;

    let server = ApiServer::new(config);
    server.run().await?;

    Ok(())
}
