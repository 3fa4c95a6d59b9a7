//! Bingo game core: board generation, line matching, turn rotation and the
//! session state machine.

pub mod board;
pub mod bot;
pub mod lines;
pub mod session;
pub mod turn;

pub use board::{Board, BoardSetup, SetupEvent, BOARD_CELLS, MAX_NUMBER};
pub use bot::BotScheduler;
pub use lines::{evaluate, LineReport, LINE_PATTERNS};
pub use session::{GameSession, Phase, SessionEffect, SoundCue};
pub use turn::{turn_index, Mode, Player};
