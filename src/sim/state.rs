//! Session state published to the presentation layer
//!
//! Everything a renderer needs to draw a frame lives here.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::bubble::{Bubble, BubbleKind};
use super::scoring::{PopEffect, Streak};
use crate::consts::COUNTDOWN_START;
use crate::highscores::HighScoreEntry;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Pre-game countdown; the value is what the HUD shows
    Countdown(u8),
    /// Bubbles on screen, clock running
    Active,
    /// Clock ran out
    GameOver,
}

/// Complete published session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    /// Score
    pub score: u64,
    /// Seconds left on the clock
    pub time_remaining: u32,
    /// Duration captured when play started
    pub session_duration: u32,
    /// Bubbles on the field (order irrelevant)
    pub bubbles: Vec<Bubble>,
    /// Bubbles mid exit animation
    pub popping: BTreeSet<u32>,
    /// Active pop overlays
    pub effects: Vec<PopEffect>,
    /// Same-color streak
    pub streak: Streak,
    /// Best scores, retained at game over
    pub leaders: Vec<HighScoreEntry>,
}

impl GameState {
    /// Fresh state at the top of the countdown
    pub fn new(session_duration: u32) -> Self {
        Self {
            phase: GamePhase::Countdown(COUNTDOWN_START),
            score: 0,
            time_remaining: session_duration,
            session_duration,
            bubbles: Vec::new(),
            popping: BTreeSet::new(),
            effects: Vec::new(),
            streak: Streak::default(),
            leaders: Vec::new(),
        }
    }

    pub fn is_counting_down(&self) -> bool {
        matches!(self.phase, GamePhase::Countdown(_))
    }

    /// Countdown value shown on the HUD (0 once play starts)
    pub fn countdown_value(&self) -> u8 {
        match self.phase {
            GamePhase::Countdown(n) => n,
            _ => 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == GamePhase::Active
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn is_popping(&self, id: u32) -> bool {
        self.popping.contains(&id)
    }

    pub fn last_popped(&self) -> Option<BubbleKind> {
        self.streak.last_kind
    }

    pub fn bubble(&self, id: u32) -> Option<&Bubble> {
        self.bubbles.iter().find(|b| b.id == id)
    }

    /// Drop a bubble and its popping flag; no-op when absent
    pub fn remove_bubble(&mut self, id: u32) {
        self.bubbles.retain(|b| b.id != id);
        self.popping.remove(&id);
    }

    /// Drop a pop effect; no-op when absent
    pub fn remove_effect(&mut self, id: u32) {
        self.effects.retain(|e| e.id != id);
    }
}
