//! Game session state machine
//!
//! Owns all mutable session state: the board, the call ledger, the
//! completed-pattern set, the roster and the phase. Every mutation funnels
//! through the named operations here; the outside world only sees the
//! `SessionEffect` values they return.
//!
//! Online calls are never applied optimistically. `attempt_call` validates
//! and emits `PublishCall`; the ledger mutates only when the call comes
//! back through the bridge via `apply_call`, so every participant applies
//! calls in the bridge's delivery order.

use crate::config::GameConfig;
use crate::errors::GameError;
use crate::game::board::{Board, MAX_NUMBER};
use crate::game::lines;
use crate::game::turn::{self, Mode, Player};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Session lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Setup,
    Playing,
    Finished,
}

/// Sound cues consumed fire-and-forget by the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundCue {
    Cut,
    Fill,
    Click,
    Win,
    Error,
}

/// Side effects requested from the presentation and audio collaborators.
///
/// These are data, not actions: the session stays sequential and never
/// blocks on rendering, audio or the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEffect {
    /// Re-render the board with current marks
    RenderBoard,
    /// Light up the cells of newly completed patterns
    HighlightLines { patterns: Vec<usize> },
    /// B-I-N-G-O letter progress: letter `i` is lit iff count > i
    LettersLit { count: usize },
    /// Turn indicator text
    TurnMessage { text: String, is_local: bool },
    /// Shake feedback for an invalid pick
    Shake,
    /// Play a sound cue
    Sound { cue: SoundCue },
    /// Forward the call to the realtime bridge (online only)
    PublishCall { number: u8 },
    /// Announce our win through the bridge (online only)
    PublishWinner { name: String },
    /// Terminal winner announcement
    AnnounceWinner { name: String },
    /// Run a bot pick after the given delay (solo only)
    ScheduleBot { delay_ms: u64 },
}

/// A single game from setup through play to a winner
#[derive(Debug)]
pub struct GameSession {
    mode: Mode,
    players: Vec<Player>,
    local_player_id: String,
    board: Board,
    /// Call ledger: set membership gates acceptance, size drives rotation
    called: HashSet<u8>,
    /// Pattern indices already reported as complete
    completed: HashSet<usize>,
    total_lines: usize,
    win_reported: bool,
    phase: Phase,
    /// Shared with scheduled bot moves so a stale pick cannot apply after
    /// the session ends or resets
    active: Arc<AtomicBool>,
    lines_to_win: usize,
    bot_delay_ms: u64,
}

impl GameSession {
    pub fn new(
        mode: Mode,
        players: Vec<Player>,
        local_player_id: impl Into<String>,
        config: &GameConfig,
    ) -> Self {
        debug_assert!(!players.is_empty());
        Self {
            mode,
            players,
            local_player_id: local_player_id.into(),
            board: Board::from_cells(std::array::from_fn(|i| (i + 1) as u8))
                .expect("identity board"),
            called: HashSet::new(),
            completed: HashSet::new(),
            total_lines: 0,
            win_reported: false,
            phase: Phase::Setup,
            active: Arc::new(AtomicBool::new(false)),
            lines_to_win: config.lines_to_win,
            bot_delay_ms: config.bot_delay_ms,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn called_numbers(&self) -> &HashSet<u8> {
        &self.called
    }

    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Flag handed to deferred bot moves; cleared on finish or teardown
    pub fn active_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.active)
    }

    pub fn turn_index(&self) -> usize {
        turn::turn_index(self.called.len(), self.players.len())
    }

    /// Finalize setup and enter play
    pub fn begin_play(&mut self, board: Board) -> Vec<SessionEffect> {
        self.board = board;
        self.called.clear();
        self.completed.clear();
        self.total_lines = 0;
        self.win_reported = false;
        self.phase = Phase::Playing;
        self.active.store(true, Ordering::SeqCst);

        let mut effects = vec![SessionEffect::RenderBoard];
        if self.mode == Mode::Offline {
            effects.push(SessionEffect::TurnMessage {
                text: "Tap to Mark".to_string(),
                is_local: true,
            });
        } else {
            effects.push(self.turn_message());
        }
        effects
    }

    /// Classify a prospective local call against the current state.
    ///
    /// Duplicate check precedes the turn check, so tapping an already
    /// marked cell is never treated as an out-of-turn attempt.
    pub fn check_call(&self, number: u8) -> Result<(), GameError> {
        if self.phase != Phase::Playing {
            return Err(GameError::NotPlaying);
        }
        if number == 0 || number > MAX_NUMBER {
            return Err(GameError::OutOfRange(number));
        }
        if self.called.contains(&number) {
            return Err(GameError::AlreadyCalled(number));
        }
        let turn_index = self.turn_index();
        if !self
            .mode
            .is_local_turn(turn_index, &self.players, &self.local_player_id)
        {
            return Err(GameError::InvalidTurn { turn_index });
        }
        Ok(())
    }

    /// Handle the local player tapping a number.
    ///
    /// Rejections leave all state untouched; only an out-of-turn attempt
    /// gets audible feedback. Accepted online calls are only published here
    /// and applied on echo.
    pub fn attempt_call(&mut self, number: u8) -> Vec<SessionEffect> {
        match self.check_call(number) {
            Ok(()) => {}
            Err(GameError::InvalidTurn { .. }) => {
                return vec![
                    SessionEffect::Sound {
                        cue: SoundCue::Error,
                    },
                    SessionEffect::Shake,
                ];
            }
            // Idempotent no-ops: finished session, out-of-range, duplicate
            Err(_) => return Vec::new(),
        }

        let mut effects = vec![SessionEffect::Sound { cue: SoundCue::Cut }];
        if self.mode == Mode::Online {
            // Pending until the bridge echoes it back
            effects.push(SessionEffect::PublishCall { number });
        } else {
            effects.extend(self.apply_call(number, true));
        }
        effects
    }

    /// Apply a resolved call: a local solo/offline pick, a bot pick, or a
    /// call delivered by the bridge. The single mutation path for the
    /// ledger in every mode.
    pub fn apply_call(&mut self, number: u8, initiated_locally: bool) -> Vec<SessionEffect> {
        if self.phase != Phase::Playing {
            return Vec::new();
        }
        if number == 0 || number > MAX_NUMBER {
            return Vec::new();
        }
        if !self.called.insert(number) {
            return Vec::new();
        }

        let mut effects = Vec::new();

        // A remote call that lands on our board still clicks audibly
        if !initiated_locally && self.board.contains(number) {
            effects.push(SessionEffect::Sound { cue: SoundCue::Cut });
        }

        let report = lines::evaluate(&self.board, &self.called, &self.completed);
        if !report.newly_completed.is_empty() {
            self.completed.extend(report.newly_completed.iter().copied());
            effects.push(SessionEffect::HighlightLines {
                patterns: report.newly_completed,
            });
        }
        self.total_lines = report.total_lines;
        effects.push(SessionEffect::LettersLit {
            count: self.total_lines.min(5),
        });
        effects.push(SessionEffect::RenderBoard);

        if self.total_lines >= self.lines_to_win && !self.win_reported {
            self.win_reported = true;
            effects.push(SessionEffect::Sound { cue: SoundCue::Win });
            let name = self.local_player_name();
            if self.mode == Mode::Online {
                // The bridge's winner announcement finishes the game
                effects.push(SessionEffect::PublishWinner { name });
            } else {
                effects.extend(self.finish(name));
                return effects;
            }
        }

        if self.phase == Phase::Playing {
            effects.push(self.turn_message());
            if self.mode == Mode::Solo {
                let turn_index = self.turn_index();
                if self.players[turn_index].is_bot {
                    effects.push(SessionEffect::ScheduleBot {
                        delay_ms: self.bot_delay_ms,
                    });
                }
            }
        }

        effects
    }

    /// Handle a winner announcement (bridge echo in online mode)
    pub fn apply_winner(&mut self, name: impl Into<String>) -> Vec<SessionEffect> {
        if self.phase == Phase::Finished {
            return Vec::new();
        }
        self.finish(name.into())
    }

    /// Tear the session down without a winner (navigate home / replay)
    pub fn abandon(&mut self) {
        self.phase = Phase::Finished;
        self.active.store(false, Ordering::SeqCst);
    }

    /// Uniform random pick from the not-yet-called numbers
    pub fn bot_pick<R: Rng>(&self, rng: &mut R) -> Option<u8> {
        let open: Vec<u8> = (1..=MAX_NUMBER)
            .filter(|n| !self.called.contains(n))
            .collect();
        if open.is_empty() {
            return None;
        }
        Some(open[rng.gen_range(0..open.len())])
    }

    fn finish(&mut self, winner: String) -> Vec<SessionEffect> {
        self.phase = Phase::Finished;
        self.active.store(false, Ordering::SeqCst);
        vec![SessionEffect::AnnounceWinner { name: winner }]
    }

    fn turn_message(&self) -> SessionEffect {
        let turn_index = self.turn_index();
        let is_local = self
            .mode
            .is_local_turn(turn_index, &self.players, &self.local_player_id);
        let text = if is_local {
            "YOUR TURN".to_string()
        } else {
            format!("{}'s Turn", self.players[turn_index].name)
        };
        SessionEffect::TurnMessage { text, is_local }
    }

    fn local_player_name(&self) -> String {
        self.players
            .iter()
            .find(|p| p.id == self.local_player_id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| "You".to_string())
    }
}
