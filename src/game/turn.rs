//! Turn rotation and per-mode call validation

use serde::{Deserialize, Serialize};
use std::fmt;

/// Session mode, fixed for the session lifetime
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Local player against bots, turn based
    Solo,
    /// Pass-and-play on one device; turns never gate calls
    Offline,
    /// Multiple participants synchronized through the realtime bridge
    Online,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Solo => write!(f, "solo"),
            Mode::Offline => write!(f, "offline"),
            Mode::Online => write!(f, "online"),
        }
    }
}

/// Participant identity; roster order defines turn rotation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_bot: bool,
}

impl Player {
    pub fn human(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_bot: false,
        }
    }

    pub fn bot(index: usize) -> Self {
        Self {
            id: format!("bot{}", index),
            name: format!("Bot {}", index + 1),
            is_bot: true,
        }
    }
}

/// Whose turn it is: `called_count mod player_count`
pub fn turn_index(called_count: usize, player_count: usize) -> usize {
    debug_assert!(player_count >= 1);
    called_count % player_count
}

impl Mode {
    /// Whether the local player owns the current turn.
    ///
    /// Offline never gates; Solo gives the local player index 0 only;
    /// Online compares roster identity at the turn index.
    pub fn is_local_turn(&self, turn_index: usize, players: &[Player], local_id: &str) -> bool {
        match self {
            Mode::Offline => true,
            Mode::Solo => turn_index == 0,
            Mode::Online => players
                .get(turn_index)
                .map(|p| p.id == local_id)
                .unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_index_rotation() {
        for called in 0..50 {
            for players in 1..6 {
                assert_eq!(turn_index(called, players), called % players);
            }
        }
    }

    #[test]
    fn test_solo_owns_index_zero_only() {
        let players = vec![Player::human("me", "You"), Player::bot(0)];
        assert!(Mode::Solo.is_local_turn(0, &players, "me"));
        assert!(!Mode::Solo.is_local_turn(1, &players, "me"));
    }

    #[test]
    fn test_offline_never_gates() {
        let players = vec![Player::human("p", "Player")];
        assert!(Mode::Offline.is_local_turn(0, &players, "p"));
        assert!(Mode::Offline.is_local_turn(7, &players, "someone-else"));
    }

    #[test]
    fn test_online_matches_roster_identity() {
        let players = vec![Player::human("a", "Alice"), Player::human("b", "Bob")];
        // calledCount = 0 -> turn index 0 -> player "a"
        assert!(!Mode::Online.is_local_turn(0, &players, "b"));
        assert!(Mode::Online.is_local_turn(0, &players, "a"));
        assert!(Mode::Online.is_local_turn(1, &players, "b"));
    }

    #[test]
    fn test_mode_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Mode::Online).unwrap(), "\"online\"");
    }
}
