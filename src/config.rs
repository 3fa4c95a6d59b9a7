//! Configuration management with validation and defaults
//!
//! Centralized configuration for the game engine and room server.

use crate::errors::{BingoResult, ConfigurationError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level Bingohall configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct BingohallConfig {
    pub server: ServerConfig,
    pub room: RoomConfig,
    pub game: GameConfig,
}

/// HTTP/WebSocket server configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            allowed_origins: vec!["*".to_string()],
            request_timeout_secs: 30,
        }
    }
}

/// Room registry configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Player limit applied when the host does not choose one
    pub default_player_limit: usize,
    pub max_player_limit: usize,
    /// Capacity of each room's event broadcast channel
    pub event_buffer: usize,
    /// Attempts at generating an unused room code before giving up
    pub code_retry_limit: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            default_player_limit: 2,
            max_player_limit: 8,
            event_buffer: 256,
            code_retry_limit: 32,
        }
    }
}

/// Game rule configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameConfig {
    /// Completed lines required to win
    pub lines_to_win: usize,
    /// Delay before a bot makes its pick
    pub bot_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            lines_to_win: 5,
            bot_delay_ms: 1000,
        }
    }
}

impl BingohallConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> BingoResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> BingoResult<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .map_err(|e| ConfigurationError::SaveFailed(e.to_string()))?;
        Ok(())
    }

    /// Validate configuration for logical consistency
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.game.lines_to_win == 0 || self.game.lines_to_win > 12 {
            return Err(ConfigurationError::InvalidValue {
                field: "game.lines_to_win".to_string(),
                value: self.game.lines_to_win.to_string(),
                reason: "must be between 1 and 12".to_string(),
            });
        }

        if self.game.bot_delay_ms == 0 {
            return Err(ConfigurationError::InvalidValue {
                field: "game.bot_delay_ms".to_string(),
                value: "0".to_string(),
                reason: "must be > 0".to_string(),
            });
        }

        if self.room.default_player_limit < 2 {
            return Err(ConfigurationError::InvalidValue {
                field: "room.default_player_limit".to_string(),
                value: self.room.default_player_limit.to_string(),
                reason: "a room needs at least 2 players".to_string(),
            });
        }

        if self.room.default_player_limit > self.room.max_player_limit {
            return Err(ConfigurationError::ValidationFailed(
                "default_player_limit exceeds max_player_limit".to_string(),
            ));
        }

        if self.room.event_buffer == 0 {
            return Err(ConfigurationError::InvalidValue {
                field: "room.event_buffer".to_string(),
                value: "0".to_string(),
                reason: "must be > 0".to_string(),
            });
        }

        Ok(())
    }

    /// Convert to duration types for internal use
    pub fn bot_delay(&self) -> Duration {
        Duration::from_millis(self.game.bot_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }
}
