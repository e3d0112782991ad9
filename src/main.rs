//! Bubble Pop entry point
//!
//! Native: plays one headless session with a simple autoplayer and records
//! the result on the local leaderboard. Web: exposes the engine to the page
//! script, which owns rendering, timers and taps.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use wasm_bindgen::prelude::*;

    use bubble_pop::Settings;
    use bubble_pop::{HighScores, Leaderboard};
    use bubble_pop::persistence::LocalStore;
    use bubble_pop::sim::{PlayArea, Session, SessionEvent};

    /// Engine handle owned by the page script
    #[wasm_bindgen]
    pub struct WebGame {
        session: Session,
    }

    #[wasm_bindgen]
    impl WebGame {
        #[wasm_bindgen(constructor)]
        pub fn new(width: f32, height: f32) -> WebGame {
            let settings = Settings::load(&LocalStore).clamped();
            let seed = random_seed();
            let leaderboard = Leaderboard::open(LocalStore);
            WebGame {
                session: Session::new(
                    seed,
                    settings,
                    PlayArea::new(width, height),
                    Box::new(leaderboard),
                ),
            }
        }

        pub fn slow_tick(&mut self) {
            self.session.handle(SessionEvent::SlowTick);
        }

        pub fn fast_tick(&mut self) {
            self.session.handle(SessionEvent::FastTick);
        }

        pub fn pop(&mut self, id: u32) {
            self.session.handle(SessionEvent::Pop(id));
        }

        /// Page is done showing the effect with this id
        pub fn dismiss_effect(&mut self, id: u32) {
            self.session.handle(SessionEvent::DismissEffect(id));
        }

        pub fn restart(&mut self) {
            // Pick up settings edited between sessions
            self.session
                .set_settings(Settings::load(&LocalStore).clamped());
            self.session.handle(SessionEvent::Restart);
        }

        pub fn resize(&mut self, width: f32, height: f32) {
            self.session
                .handle(SessionEvent::Resize(PlayArea::new(width, height)));
        }

        /// Published state as JSON for the renderer
        pub fn state_json(&self) -> String {
            serde_json::to_string(self.session.state()).unwrap_or_default()
        }

        /// Persisted top 10 as JSON, best first
        pub fn high_scores_json(&self) -> String {
            serde_json::to_string(Leaderboard::open(LocalStore).load_top()).unwrap_or_default()
        }

        /// Rank the current score would take if the game ended now
        pub fn potential_rank(&self) -> Option<u32> {
            HighScores::load(&LocalStore)
                .potential_rank(
                    &self.session.settings().player_name,
                    self.session.state().score,
                )
                .map(|rank| rank as u32)
        }
    }

    fn random_seed() -> u64 {
        use rand::Rng;
        rand::rng().random()
    }

    pub fn init() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
        log::info!("Bubble Pop (web) ready");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::init();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use rand::Rng;

    use bubble_pop::persistence::{FileStore, KeyValueStore, MemoryStore};
    use bubble_pop::sim::{BubbleKind, GameState, PlayArea, Session, SessionEvent, TickClock};
    use bubble_pop::{Leaderboard, Settings};

    /// Render frame length for the simulated run
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Seconds between autoplayer taps
    const TAP_INTERVAL: f64 = 0.4;
    const APP_NAME: &str = "bubble-pop";

    pub fn run() {
        log::info!("Bubble Pop (native) starting...");

        match FileStore::in_data_dir(APP_NAME) {
            Ok(store) => play(store),
            Err(e) => {
                log::warn!("{}; scores will not be kept", e);
                play(MemoryStore::new());
            }
        }
    }

    fn play<K: KeyValueStore + 'static>(store: K) {
        let mut settings = Settings::load(&store).clamped();
        if let Some(name) = std::env::args().nth(1) {
            settings.player_name = name;
        }

        let seed: u64 = rand::rng().random();
        let mut session = Session::new(
            seed,
            settings,
            PlayArea::new(480.0, 800.0),
            Box::new(Leaderboard::open(store)),
        );

        let mut clock = TickClock::new();
        let mut next_tap = TAP_INTERVAL;
        while !session.state().is_game_over() {
            session.run(clock.advance(FRAME_DT));
            if session.state().is_active() && clock.elapsed() >= next_tap {
                next_tap += TAP_INTERVAL;
                if let Some(id) = pick_target(session.state()) {
                    session.handle(SessionEvent::Pop(id));
                }
            }
        }

        report(session.state());
    }

    /// Tap the most valuable bubble that is not already popping.
    /// Gold is left alone so the clock always runs out.
    fn pick_target(state: &GameState) -> Option<u32> {
        state
            .bubbles
            .iter()
            .filter(|b| b.kind != BubbleKind::Gold && !state.is_popping(b.id))
            .max_by_key(|b| b.kind.points())
            .map(|b| b.id)
    }

    fn report(state: &GameState) {
        println!("Final score: {}", state.score);
        println!("Top scores:");
        for (rank, entry) in state.leaders.iter().enumerate() {
            println!("  {}. {:<16} {}", rank + 1, entry.name, entry.score);
        }
    }
}
