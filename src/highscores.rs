//! High score leaderboard system
//!
//! Tracks the top 10 scores, one entry per player name, persisted as JSON
//! in a key-value store.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_HIGH_SCORES;
use crate::persistence::{KeyValueStore, StorageError};
use crate::sim::ScoreKeeper;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Stable identity for list rendering
    pub id: u64,
    /// Player's name
    pub name: String,
    /// Player's best score
    pub score: u64,
}

/// High score leaderboard (sorted descending by score)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
    #[serde(default)]
    next_id: u64,
}

impl HighScores {
    /// Storage key
    const STORAGE_KEY: &'static str = "bubble_pop_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Would `update(name, score)` change the board?
    pub fn qualifies(&self, name: &str, score: u64) -> bool {
        match self.entries.iter().find(|e| e.name == name) {
            Some(entry) => score > entry.score,
            // A newcomer tied with the last row sorts after it and is cut
            None => {
                self.entries.len() < MAX_HIGH_SCORES
                    || self.entries.last().is_some_and(|e| score > e.score)
            }
        }
    }

    /// Rank `name` would hold after `update(name, score)` (1-indexed), or
    /// None when that update leaves the board as it is
    pub fn potential_rank(&self, name: &str, score: u64) -> Option<usize> {
        if !self.qualifies(name, score) {
            return None;
        }
        let ahead = self
            .entries
            .iter()
            .filter(|e| e.name != name && e.score >= score)
            .count();
        Some(ahead + 1)
    }

    /// Record a score for a player.
    ///
    /// A known name only moves up: its score is replaced when the new one is
    /// strictly greater. Unknown names are inserted. The list is then sorted
    /// descending (ties keep their order) and trimmed to the top 10.
    pub fn update(&mut self, name: &str, score: u64) -> &[HighScoreEntry] {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => {
                if score > entry.score {
                    entry.score = score;
                }
            }
            None => {
                let id = self.next_id;
                self.next_id += 1;
                self.entries.push(HighScoreEntry {
                    id,
                    name: name.to_string(),
                    score,
                });
            }
        }

        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
        &self.entries
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores from a store; missing or malformed data means no scores yet
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<HighScores>(&json) {
                Ok(mut scores) => {
                    // Stored lists are trusted for content, not for order
                    scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
                    scores.entries.truncate(MAX_HIGH_SCORES);
                    let max_id = scores.entries.iter().map(|e| e.id + 1).max().unwrap_or(0);
                    scores.next_id = scores.next_id.max(max_id);
                    log::info!("Loaded {} high scores", scores.entries.len());
                    return scores;
                }
                Err(e) => log::warn!("Ignoring malformed high scores: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Could not read high scores: {}", e),
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores to a store
    pub fn save(&self, store: &mut impl KeyValueStore) {
        let result = serde_json::to_string(self)
            .map_err(StorageError::from)
            .and_then(|json| store.set(Self::STORAGE_KEY, &json));
        match result {
            Ok(()) => log::info!("High scores saved ({} entries)", self.entries.len()),
            Err(e) => log::warn!("Could not save high scores: {}", e),
        }
    }
}

/// High scores bound to the store they persist to
#[derive(Debug)]
pub struct Leaderboard<K: KeyValueStore> {
    store: K,
    scores: HighScores,
}

impl<K: KeyValueStore> Leaderboard<K> {
    /// Open the leaderboard kept in `store`
    pub fn open(store: K) -> Self {
        let scores = HighScores::load(&store);
        Self { store, scores }
    }

    /// Current ranking, best first (at most 10)
    pub fn load_top(&self) -> &[HighScoreEntry] {
        &self.scores.entries
    }

    /// Record a score, persist, and return the new ranking
    pub fn update(&mut self, name: &str, score: u64) -> &[HighScoreEntry] {
        self.scores.update(name, score);
        self.scores.save(&mut self.store);
        &self.scores.entries
    }

    pub fn scores(&self) -> &HighScores {
        &self.scores
    }

    pub fn into_store(self) -> K {
        self.store
    }
}

impl<K: KeyValueStore> ScoreKeeper for Leaderboard<K> {
    fn submit(&mut self, name: &str, score: u64) -> Vec<HighScoreEntry> {
        self.update(name, score).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use proptest::prelude::*;

    fn names(scores: &HighScores) -> Vec<(&str, u64)> {
        scores
            .entries
            .iter()
            .map(|e| (e.name.as_str(), e.score))
            .collect()
    }

    #[test]
    fn test_score_only_rises() {
        let mut scores = HighScores::new();
        scores.update("Ann", 50);
        scores.update("Ann", 30);
        assert_eq!(names(&scores), vec![("Ann", 50)]);

        scores.update("Ann", 70);
        assert_eq!(names(&scores), vec![("Ann", 70)]);
    }

    #[test]
    fn test_sorted_and_trimmed() {
        let mut scores = HighScores::new();
        for i in 0..15u64 {
            scores.update(&format!("p{i}"), i * 10);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(140));
        assert_eq!(scores.entries.last().map(|e| e.score), Some(50));
    }

    #[test]
    fn test_existing_name_moves_up() {
        let mut scores = HighScores::new();
        scores.update("Ann", 10);
        scores.update("Bob", 20);
        scores.update("Ann", 30);
        assert_eq!(names(&scores), vec![("Ann", 30), ("Bob", 20)]);
    }

    #[test]
    fn test_ids_are_stable() {
        let mut scores = HighScores::new();
        scores.update("Ann", 10);
        scores.update("Bob", 20);
        let ann = scores.entries.iter().find(|e| e.name == "Ann").unwrap().id;
        scores.update("Ann", 30);
        assert_eq!(scores.entries[0].id, ann);
        assert_ne!(scores.entries[0].id, scores.entries[1].id);
    }

    #[test]
    fn test_qualifies() {
        let mut scores = HighScores::new();
        // Zero still makes a row on a board with room
        assert!(scores.qualifies("Z", 0));
        for i in 1..=10u64 {
            scores.update(&format!("p{i}"), i * 10);
        }
        assert!(!scores.qualifies("new", 10));
        assert!(scores.qualifies("new", 11));
        assert_eq!(scores.potential_rank("new", 1000), Some(1));
        assert_eq!(scores.potential_rank("new", 55), Some(6));
        assert_eq!(scores.potential_rank("new", 5), None);
        // Ties go behind the rows already holding that score
        assert_eq!(scores.potential_rank("new", 50), Some(7));
    }

    #[test]
    fn test_known_name_only_qualifies_by_beating_itself() {
        let mut scores = HighScores::new();
        for i in 1..=10u64 {
            scores.update(&format!("p{i}"), i * 10);
        }
        // p10 already holds 100
        assert!(!scores.qualifies("p10", 20));
        assert_eq!(scores.potential_rank("p10", 20), None);
        assert!(!scores.qualifies("p10", 100));

        // p1 holds 10 and moving to 65 puts it behind 100..70
        assert!(scores.qualifies("p1", 65));
        assert_eq!(scores.potential_rank("p1", 65), Some(5));
        scores.update("p1", 65);
        let rank = scores.entries.iter().position(|e| e.name == "p1");
        assert_eq!(rank, Some(4));
    }

    #[test]
    fn test_leaderboard_persists() {
        let mut board = Leaderboard::open(MemoryStore::new());
        assert!(board.load_top().is_empty());
        board.update("Ann", 50);
        board.update("Bob", 80);

        let reopened = Leaderboard::open(board.into_store());
        let top: Vec<_> = reopened.load_top().iter().map(|e| e.score).collect();
        assert_eq!(top, vec![80, 50]);
    }

    #[test]
    fn test_malformed_store_is_empty() {
        let mut store = MemoryStore::new();
        store.set(HighScores::STORAGE_KEY, "{broken").unwrap();
        let board = Leaderboard::open(store);
        assert!(board.scores().is_empty());
    }

    proptest! {
        #[test]
        fn prop_rank_predicts_update(
            updates in proptest::collection::vec(("[a-l]", 0u64..100), 0..40),
            name in "[a-n]",
            score in 0u64..100,
        ) {
            let mut scores = HighScores::new();
            for (n, s) in &updates {
                scores.update(n, *s);
            }
            let qualifies = scores.qualifies(&name, score);
            let rank = scores.potential_rank(&name, score);
            let before = names(&scores)
                .into_iter()
                .map(|(n, s)| (n.to_string(), s))
                .collect::<Vec<_>>();

            scores.update(&name, score);
            let after = names(&scores)
                .into_iter()
                .map(|(n, s)| (n.to_string(), s))
                .collect::<Vec<_>>();

            prop_assert_eq!(qualifies, before != after);
            if qualifies {
                let actual = scores.entries.iter().position(|e| e.name == name).map(|i| i + 1);
                prop_assert_eq!(rank, actual);
            } else {
                prop_assert_eq!(rank, None);
            }
        }

        #[test]
        fn prop_always_sorted_and_bounded(
            updates in proptest::collection::vec(("[a-e]", 0u64..1000), 0..60)
        ) {
            let mut scores = HighScores::new();
            for (name, score) in &updates {
                scores.update(name, *score);
                prop_assert!(scores.entries.len() <= MAX_HIGH_SCORES);
                prop_assert!(scores.entries.windows(2).all(|w| w[0].score >= w[1].score));
            }
        }
    }
}
