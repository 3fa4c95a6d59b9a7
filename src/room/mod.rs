//! Live room registry and event fan-out for online games.

pub mod manager;

pub use manager::{Room, RoomManager, RoomSnapshot};
