//! API Server
//!
//! Server setup and lifecycle for the room service.

use super::{
    handlers::AppState,
    middleware::{create_cors_layer, request_id_middleware},
    routes::create_router,
};
use crate::config::BingohallConfig;
use crate::room::RoomManager;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::signal;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

/// Room server over the configured bind address
pub struct ApiServer {
    config: BingohallConfig,
    rooms: Arc<RoomManager>,
}

impl ApiServer {
    pub fn new(config: BingohallConfig) -> Self {
        let rooms = Arc::new(RoomManager::new(config.room.clone()));
        Self { config, rooms }
    }

    /// Start the server and run until shutdown
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = self.socket_addr()?;
        let app = self.create_app();

        info!("Starting Bingohall room server");
        info!("   Listen: http://{}", addr);
        info!("   Default player limit: {}", self.config.room.default_player_limit);
        info!("   Request timeout: {}s", self.config.server.request_timeout_secs);
        info!("Available endpoints:");
        info!("   GET  /health            - Health check");
        info!("   POST /rooms             - Create a room");
        info!("   GET  /rooms/:code       - Room status");
        info!("   POST /rooms/:code/join  - Join a room");
        info!("   GET  /ws/:code          - Room event stream");

        let listener = tokio::net::TcpListener::bind(addr).await?;

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Room server stopped gracefully");
        Ok(())
    }

    /// Create the application with the middleware stack
    fn create_app(&self) -> axum::Router {
        let state = Arc::new(AppState {
            rooms: Arc::clone(&self.rooms),
            config: self.config.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        });

        create_router(state)
            // Request ID middleware (first for tracing)
            .layer(axum::middleware::from_fn(request_id_middleware))
            // CORS layer (before timeout to handle preflight)
            .layer(create_cors_layer(self.config.server.allowed_origins.clone()))
            .layer(TimeoutLayer::new(Duration::from_secs(
                self.config.server.request_timeout_secs,
            )))
            // Tracing layer (last for complete request tracing)
            .layer(TraceLayer::new_for_http())
    }

    fn socket_addr(&self) -> Result<SocketAddr, Box<dyn std::error::Error>> {
        Ok(SocketAddr::from((
            self.config.server.host.parse::<std::net::IpAddr>()?,
            self.config.server.port,
        )))
    }
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }
}
