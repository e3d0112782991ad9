//! Game settings and preferences
//!
//! Persisted as JSON in a key-value store. The settings screen keeps the
//! duration and bubble cap inside their bounds; the engine itself accepts
//! any positive values.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StorageError};

/// Bounds for the session length in seconds
pub const SESSION_DURATION_RANGE: (u32, u32) = (10, 120);
/// Bounds for the number of bubbles on screen
pub const MAX_BUBBLES_RANGE: (u32, u32) = (1, 20);

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name recorded on the leaderboard
    pub player_name: String,

    // === Session ===
    /// Length of a session in seconds
    pub session_duration_secs: u32,
    /// Upper bound for the random bubble count
    pub max_bubbles: u32,

    // === Field ===
    /// Bubble diameter (same units as the play area)
    pub bubble_diameter: f32,
    /// Speed at the start of a session (units/sec)
    pub base_speed: f32,
    /// Speed reached when the clock runs out (units/sec)
    pub max_speed: f32,
    /// Band at the top of the play area reserved for the HUD
    pub hud_height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: "Player".to_string(),

            session_duration_secs: 60,
            max_bubbles: 15,

            bubble_diameter: 60.0,
            base_speed: 60.0,
            max_speed: 180.0,
            hud_height: 80.0,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "bubble_pop_settings";

    /// Copy with duration and bubble cap pulled into the settings-screen bounds
    pub fn clamped(&self) -> Self {
        let mut settings = self.clone();
        settings.session_duration_secs = settings
            .session_duration_secs
            .clamp(SESSION_DURATION_RANGE.0, SESSION_DURATION_RANGE.1);
        settings.max_bubbles = settings
            .max_bubbles
            .clamp(MAX_BUBBLES_RANGE.0, MAX_BUBBLES_RANGE.1);
        settings
    }

    /// Bubble radius
    #[inline]
    pub fn bubble_radius(&self) -> f32 {
        self.bubble_diameter / 2.0
    }

    /// Load settings from a store, falling back to defaults
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring malformed settings: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Could not read settings: {}", e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to a store
    pub fn save(&self, store: &mut impl KeyValueStore) {
        let result = serde_json::to_string(self)
            .map_err(StorageError::from)
            .and_then(|json| store.set(Self::STORAGE_KEY, &json));
        match result {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Could not save settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.session_duration_secs, 60);
        assert_eq!(settings.max_bubbles, 15);
        assert_eq!(settings.bubble_radius(), 30.0);
    }

    #[test]
    fn test_clamped() {
        let settings = Settings {
            session_duration_secs: 5,
            max_bubbles: 50,
            ..Default::default()
        };
        let clamped = settings.clamped();
        assert_eq!(clamped.session_duration_secs, 10);
        assert_eq!(clamped.max_bubbles, 20);

        let settings = Settings {
            session_duration_secs: 500,
            max_bubbles: 0,
            ..Default::default()
        };
        let clamped = settings.clamped();
        assert_eq!(clamped.session_duration_secs, 120);
        assert_eq!(clamped.max_bubbles, 1);
    }

    #[test]
    fn test_save_load() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            player_name: "Ann".to_string(),
            max_bubbles: 7,
            ..Default::default()
        };
        settings.save(&mut store);
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_partial_blob_fills_defaults() {
        let mut store = MemoryStore::new();
        store
            .set(Settings::STORAGE_KEY, r#"{"max_bubbles": 3}"#)
            .unwrap();
        let settings = Settings::load(&store);
        assert_eq!(settings.max_bubbles, 3);
        assert_eq!(settings.session_duration_secs, 60);
    }

    #[test]
    fn test_malformed_blob_uses_defaults() {
        let mut store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, "not json").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }
}
