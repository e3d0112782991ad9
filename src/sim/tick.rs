//! Session event loop
//!
//! The engine is driven by three inputs: a 1 Hz slow tick (countdown, game
//! clock, bubble refresh, game over), a 30 Hz fast tick (movement, deferred
//! cleanup) and pop commands from taps. Callers funnel all three into one
//! ordered stream of `SessionEvent`s and feed it to `Session::handle`.

use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::bubble::{PlayArea, make_bubble};
use super::deferred::{DeferredAction, DeferredQueue};
use super::movement::{advance, elapsed_fraction};
use super::placement::place_bubbles;
use super::scoring::{StreakBonus, score_pop};
use super::state::{GamePhase, GameState};
use crate::consts::*;
use crate::highscores::HighScoreEntry;
use crate::settings::Settings;

/// A single input to the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    /// 1 Hz bookkeeping tick
    SlowTick,
    /// 30 Hz movement tick
    FastTick,
    /// Player tapped a bubble
    Pop(u32),
    /// Play again after game over
    Restart,
    /// Play area changed size
    Resize(PlayArea),
    /// Presentation layer is done with a pop effect
    DismissEffect(u32),
}

/// Where finished sessions report their score
pub trait ScoreKeeper {
    /// Record a score and return the ranking, best first
    fn submit(&mut self, name: &str, score: u64) -> Vec<HighScoreEntry>;
}

/// One player's run of sessions: countdown, play, game over, play again
pub struct Session {
    state: GameState,
    settings: Settings,
    area: PlayArea,
    streak_bonus: StreakBonus,
    rng: Pcg32,
    deferred: DeferredQueue,
    scores: Box<dyn ScoreKeeper>,
    /// Next bubble ID (never reset, so stale cleanups miss new bubbles)
    next_id: u32,
}

impl Session {
    /// Start a session at the top of the countdown
    pub fn new(
        seed: u64,
        settings: Settings,
        area: PlayArea,
        scores: Box<dyn ScoreKeeper>,
    ) -> Self {
        log::info!(
            "New session for {} (seed {}, {}s, up to {} bubbles)",
            settings.player_name,
            seed,
            settings.session_duration_secs,
            settings.max_bubbles
        );
        Self {
            state: GameState::new(settings.session_duration_secs),
            settings,
            area,
            streak_bonus: StreakBonus::default(),
            rng: Pcg32::seed_from_u64(seed),
            deferred: DeferredQueue::new(),
            scores,
            next_id: 1,
        }
    }

    /// Use a different streak scoring policy
    pub fn with_streak_bonus(mut self, bonus: StreakBonus) -> Self {
        self.streak_bonus = bonus;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn area(&self) -> PlayArea {
        self.area
    }

    /// Replace settings. The bubble cap applies from the next refresh; the
    /// duration from the next session.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Process one event
    pub fn handle(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::SlowTick => self.slow_tick(),
            SessionEvent::FastTick => self.fast_tick(FAST_TICK_DT),
            SessionEvent::Pop(id) => self.pop(id),
            SessionEvent::Restart => self.restart(),
            SessionEvent::Resize(area) => self.area = area,
            SessionEvent::DismissEffect(id) => self.state.remove_effect(id),
        }
    }

    /// Process events in order
    pub fn run(&mut self, events: impl IntoIterator<Item = SessionEvent>) {
        for event in events {
            self.handle(event);
        }
    }

    /// Countdown progression, game clock and bubble refresh
    pub fn slow_tick(&mut self) {
        match self.state.phase {
            GamePhase::Countdown(n) => {
                let n = n.saturating_sub(1);
                if n == 0 {
                    self.begin_play();
                } else {
                    self.state.phase = GamePhase::Countdown(n);
                }
            }
            GamePhase::Active => {
                if self.state.time_remaining > 0 {
                    self.state.time_remaining -= 1;
                    self.refresh_bubbles();
                }
                if self.state.time_remaining == 0 {
                    self.finish();
                }
            }
            GamePhase::GameOver => {}
        }
    }

    /// Movement and deferred cleanup
    pub fn fast_tick(&mut self, dt: f32) {
        for action in self.deferred.advance(dt) {
            match action {
                DeferredAction::RemoveBubble(id) => self.state.remove_bubble(id),
                DeferredAction::RemoveEffect(id) => self.state.remove_effect(id),
            }
        }

        if !self.state.is_active() {
            return;
        }

        let fraction = elapsed_fraction(self.state.session_duration, self.state.time_remaining);
        advance(
            &mut self.state.bubbles,
            self.area,
            fraction,
            dt,
            &self.settings,
        );
    }

    /// Pop a bubble. No-op outside play, for unknown ids, and for bubbles
    /// already popping.
    pub fn pop(&mut self, id: u32) {
        if !self.state.is_active() || self.state.is_popping(id) {
            return;
        }
        let Some(bubble) = self.state.bubble(id).cloned() else {
            return;
        };

        let outcome = score_pop(&bubble, &mut self.state.streak, &self.streak_bonus);

        self.state.popping.insert(id);
        self.state.score += outcome.points;
        self.state.time_remaining += outcome.time_bonus_secs;
        self.deferred
            .schedule(POP_GRACE_SECS, DeferredAction::RemoveBubble(id));

        if let Some(effect) = outcome.effect {
            self.deferred
                .schedule(EFFECT_DISPLAY_SECS, DeferredAction::RemoveEffect(effect.id));
            self.state.effects.push(effect);
        }

        log::debug!(
            "Popped {} bubble {} for {} points (+{}s)",
            bubble.kind.as_str(),
            id,
            outcome.points,
            outcome.time_bonus_secs
        );
    }

    /// Play again. Only honored once the game is over.
    pub fn restart(&mut self) {
        if !self.state.is_game_over() {
            return;
        }
        log::info!("Restarting session");
        self.state = GameState::new(self.settings.session_duration_secs);
    }

    /// Countdown finished: reset the scoreboard and lay out the first bubbles
    fn begin_play(&mut self) {
        let duration = self.settings.session_duration_secs;
        let count = self.random_bubble_count();
        let state = &mut self.state;
        state.phase = GamePhase::Active;
        state.score = 0;
        state.session_duration = duration;
        state.time_remaining = duration;
        state.popping.clear();
        state.effects.clear();
        state.streak.reset();
        state.leaders.clear();

        state.bubbles = place_bubbles(
            &mut self.rng,
            count,
            self.area,
            &[],
            &self.settings,
            &mut self.next_id,
        );
        log::info!(
            "Go! {}s on the clock, {} bubbles",
            duration,
            state.bubbles.len()
        );
    }

    /// Keep a random subset of the field and top it up to a new random size.
    ///
    /// Top-ups come straight from the factory without the overlap check.
    fn refresh_bubbles(&mut self) {
        let target = self.random_bubble_count();
        let current = std::mem::take(&mut self.state.bubbles);
        let keep = current.len().min(target);

        let mut slots: Vec<_> = current.into_iter().map(Some).collect();
        let mut bubbles: Vec<_> = index::sample(&mut self.rng, slots.len(), keep)
            .into_iter()
            .filter_map(|i| slots[i].take())
            .collect();

        for _ in keep..target {
            bubbles.push(make_bubble(
                &mut self.rng,
                self.next_id,
                self.area,
                &self.settings,
            ));
            self.next_id += 1;
        }

        log::debug!("Refreshed bubbles: kept {}, total {}", keep, bubbles.len());
        self.state.bubbles = bubbles;
    }

    /// Clock ran out: record the score and keep the podium for display
    fn finish(&mut self) {
        self.state.phase = GamePhase::GameOver;
        let mut leaders = self
            .scores
            .submit(&self.settings.player_name, self.state.score);
        leaders.truncate(GAME_OVER_LEADERS);
        self.state.leaders = leaders;
        log::info!(
            "Game over: {} scored {}",
            self.settings.player_name,
            self.state.score
        );
    }

    /// Random bubble count in [1, max_bubbles]
    fn random_bubble_count(&mut self) -> usize {
        let max = self.settings.max_bubbles.max(1);
        self.rng.random_range(1..=max) as usize
    }
}

/// Merges the slow and fast clocks into one ordered event stream.
///
/// Feed it frame deltas; it returns the ticks that fell inside the frame in
/// time order. A fast tick that lands on the same instant as a slow tick
/// comes first.
#[derive(Debug, Clone, Default)]
pub struct TickClock {
    elapsed: f64,
    slow_count: u64,
    fast_count: u64,
}

impl TickClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the clock started
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn advance(&mut self, dt: f32) -> Vec<SessionEvent> {
        self.elapsed += dt as f64;
        let mut events = Vec::new();
        loop {
            let next_slow = (self.slow_count + 1) as f64 * SLOW_TICK_SECS as f64;
            let next_fast = (self.fast_count + 1) as f64 / FAST_TICK_HZ as f64;
            if next_fast <= next_slow && next_fast <= self.elapsed {
                self.fast_count += 1;
                events.push(SessionEvent::FastTick);
            } else if next_slow <= self.elapsed {
                self.slow_count += 1;
                events.push(SessionEvent::SlowTick);
            } else {
                break;
            }
        }
        events
    }
}
