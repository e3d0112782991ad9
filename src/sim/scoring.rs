//! Pop scoring: base points, same-color streaks and gold time bonuses

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bubble::{Bubble, BubbleKind};

/// How a fractional bonus is turned back into whole points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rounding {
    /// Toward zero
    #[default]
    Truncate,
    /// To nearest, halves away from zero
    Round,
}

/// Multiplier applied to pops that continue a same-color streak
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreakBonus {
    /// Streak count at which the multiplier starts (1 = second pop in a row).
    /// The first pop of a run is never boosted.
    pub min_streak: u32,
    pub multiplier: f64,
    pub rounding: Rounding,
}

impl Default for StreakBonus {
    fn default() -> Self {
        Self {
            min_streak: 1,
            multiplier: 1.5,
            rounding: Rounding::Truncate,
        }
    }
}

impl StreakBonus {
    /// Points for a pop of `base` worth with the given streak count
    pub fn apply(&self, base: u64, streak: u32) -> u64 {
        if streak < self.min_streak.max(1) {
            return base;
        }
        let boosted = base as f64 * self.multiplier;
        match self.rounding {
            Rounding::Truncate => boosted.trunc() as u64,
            Rounding::Round => boosted.round() as u64,
        }
    }
}

/// Tracks consecutive pops of the same kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub last_kind: Option<BubbleKind>,
    /// Repeats after the first pop of the run (0 on the first pop)
    pub count: u32,
}

impl Streak {
    /// Register a pop and return the streak count it lands on
    pub fn record(&mut self, kind: BubbleKind) -> u32 {
        if self.last_kind == Some(kind) {
            self.count += 1;
        } else {
            self.last_kind = Some(kind);
            self.count = 0;
        }
        self.count
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Transient "+10s" style overlay left where a bubble was popped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopEffect {
    /// Same as the id of the bubble that produced it
    pub id: u32,
    pub pos: Vec2,
    pub text: String,
}

/// What a single pop is worth
#[derive(Debug, Clone, PartialEq)]
pub struct PopOutcome {
    pub points: u64,
    pub time_bonus_secs: u32,
    pub effect: Option<PopEffect>,
}

/// Score a pop and advance the streak
pub fn score_pop(bubble: &Bubble, streak: &mut Streak, bonus: &StreakBonus) -> PopOutcome {
    let time_bonus_secs = bubble.kind.time_bonus_secs();
    let effect = (time_bonus_secs > 0).then(|| PopEffect {
        id: bubble.id,
        pos: bubble.pos,
        text: format!("+{time_bonus_secs}s"),
    });

    let count = streak.record(bubble.kind);
    let points = bonus.apply(bubble.kind.points(), count);

    PopOutcome {
        points,
        time_bonus_secs,
        effect,
    }
}
