//! Bubble Pop - A tap-the-bubbles arcade game
//!
//! Core modules:
//! - `sim`: Session engine (countdown, bubble spawning, movement, scoring)
//! - `settings`: Player-tunable session configuration
//! - `highscores`: Top 10 leaderboard
//! - `persistence`: Key-value storage backends

pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use highscores::{HighScoreEntry, HighScores, Leaderboard};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Slow (bookkeeping) tick interval in seconds
    pub const SLOW_TICK_SECS: f32 = 1.0;
    /// Fast (movement) ticks per second
    pub const FAST_TICK_HZ: u32 = 30;
    /// Fast (movement) tick interval in seconds
    pub const FAST_TICK_DT: f32 = 1.0 / FAST_TICK_HZ as f32;

    /// Countdown starts here and counts down once per slow tick
    pub const COUNTDOWN_START: u8 = 3;

    /// Chance that a freshly made bubble is gold
    pub const GOLD_CHANCE: f32 = 0.03;
    /// Factory draws allowed per bubble before the planner gives up on it
    pub const PLACEMENT_ATTEMPTS: u32 = 30;

    /// Delay between a pop and the bubble leaving the field (exit animation)
    pub const POP_GRACE_SECS: f32 = 0.2;
    /// How long a pop effect overlay stays up
    pub const EFFECT_DISPLAY_SECS: f32 = 1.0;

    /// Leaderboard entries kept in storage
    pub const MAX_HIGH_SCORES: usize = 10;
    /// Leaderboard entries retained by a finished session for display
    pub const GAME_OVER_LEADERS: usize = 3;
}
