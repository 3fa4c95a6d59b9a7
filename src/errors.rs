//! Error types for the Bingohall game engine and room server
//!
//! Game-rule rejections are ordinary values here, never panics: an
//! out-of-turn call or a duplicate call is feedback for the player, not a
//! fault in the program.

use crate::bridge::BridgeError;
use std::error::Error as StdError;
use std::fmt;

/// Root error type for all Bingohall operations
#[derive(Debug)]
pub enum BingoError {
    /// Game rule violations (non-fatal, surfaced as player feedback)
    Game(GameError),

    /// Room lifecycle and realtime bridge errors
    Room(BridgeError),

    /// Configuration related errors
    Configuration(ConfigurationError),
}

/// Game rule violations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// A call was attempted while another player holds the turn
    InvalidTurn { turn_index: usize },
    /// The number is already in the call ledger
    AlreadyCalled(u8),
    /// A called number falls outside 1..=25
    OutOfRange(u8),
    /// Setup completion was attempted before all 25 cells were filled
    IncompleteBoard { filled: usize },
    /// The cell values do not form a permutation of 1..=25
    MalformedBoard,
    /// The operation requires an active game
    NotPlaying,
}

/// Configuration and validation errors
#[derive(Debug)]
pub enum ConfigurationError {
    ValidationFailed(String),
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
    LoadFailed(String),
    SaveFailed(String),
}

impl fmt::Display for BingoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BingoError::Game(e) => write!(f, "Game error: {}", e),
            BingoError::Room(e) => write!(f, "Room error: {}", e),
            BingoError::Configuration(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::InvalidTurn { turn_index } => {
                write!(f, "Not your turn (player {} holds the turn)", turn_index)
            }
            GameError::AlreadyCalled(n) => write!(f, "Number {} was already called", n),
            GameError::OutOfRange(n) => write!(f, "Number {} is outside 1..=25", n),
            GameError::IncompleteBoard { filled } => {
                write!(f, "Board incomplete: {} of 25 cells filled", filled)
            }
            GameError::MalformedBoard => write!(f, "Board is not a permutation of 1..=25"),
            GameError::NotPlaying => write!(f, "No active game"),
        }
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::ValidationFailed(msg) => write!(f, "Validation failed: {}", msg),
            ConfigurationError::InvalidValue {
                field,
                value,
                reason,
            } => {
                write!(f, "Invalid value for {}: '{}' ({})", field, value, reason)
            }
            ConfigurationError::LoadFailed(msg) => {
                write!(f, "Failed to load configuration: {}", msg)
            }
            ConfigurationError::SaveFailed(msg) => {
                write!(f, "Failed to save configuration: {}", msg)
            }
        }
    }
}

impl StdError for BingoError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            BingoError::Game(e) => Some(e),
            BingoError::Room(e) => Some(e),
            BingoError::Configuration(e) => Some(e),
        }
    }
}

impl StdError for GameError {}
impl StdError for ConfigurationError {}

impl From<GameError> for BingoError {
    fn from(e: GameError) -> Self {
        BingoError::Game(e)
    }
}

impl From<BridgeError> for BingoError {
    fn from(e: BridgeError) -> Self {
        BingoError::Room(e)
    }
}

impl From<ConfigurationError> for BingoError {
    fn from(e: ConfigurationError) -> Self {
        BingoError::Configuration(e)
    }
}

// External error conversions
impl From<std::io::Error> for BingoError {
    fn from(e: std::io::Error) -> Self {
        BingoError::Configuration(ConfigurationError::LoadFailed(e.to_string()))
    }
}

impl From<toml::de::Error> for BingoError {
    fn from(e: toml::de::Error) -> Self {
        BingoError::Configuration(ConfigurationError::LoadFailed(e.to_string()))
    }
}

impl From<toml::ser::Error> for BingoError {
    fn from(e: toml::ser::Error) -> Self {
        BingoError::Configuration(ConfigurationError::SaveFailed(e.to_string()))
    }
}

// Convenience type alias for Results
pub type BingoResult<T> = Result<T, BingoError>;
