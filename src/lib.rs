//! Bingohall - Realtime Multiplayer Bingo
//!
//! Game core (board setup, line matching, turn resolution, session state
//! machine) plus a room server that fans room events out over WebSockets.

pub mod api;
pub mod bridge;
pub mod config;
pub mod errors;
pub mod game;
pub mod room;

pub use config::BingohallConfig;
pub use errors::{BingoError, BingoResult};
pub use game::{Board, BoardSetup, GameSession, Mode, Phase, Player};
