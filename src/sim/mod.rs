//! Session engine
//!
//! All gameplay logic lives here. This module must stay reactive and
//! deterministic:
//! - Driven only by external ticks and pop commands
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod bubble;
pub mod deferred;
pub mod movement;
pub mod placement;
pub mod scoring;
pub mod state;
pub mod tick;

pub use bubble::{Bubble, BubbleKind, PlayArea, make_bubble};
pub use deferred::{DeferredAction, DeferredQueue};
pub use movement::{advance, elapsed_fraction, speed_at};
pub use placement::place_bubbles;
pub use scoring::{PopEffect, PopOutcome, Rounding, Streak, StreakBonus, score_pop};
pub use state::{GamePhase, GameState};
pub use tick::{ScoreKeeper, Session, SessionEvent, TickClock};
