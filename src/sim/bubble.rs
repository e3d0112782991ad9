//! Bubble types and the bubble factory
//!
//! A bubble is a colored disc drifting in a straight line. Its kind decides
//! how many points it is worth and whether it grants bonus time.

use std::ops::RangeInclusive;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::GOLD_CHANCE;
use crate::settings::Settings;

/// Bubble kinds, in the declared spawn-table order (gold last, drawn separately)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BubbleKind {
    Red,
    Pink,
    Green,
    Blue,
    Black,
    Gold,
}

impl BubbleKind {
    /// Non-gold kinds in spawn-table order
    pub const WEIGHTED: [BubbleKind; 5] = [
        BubbleKind::Red,
        BubbleKind::Pink,
        BubbleKind::Green,
        BubbleKind::Blue,
        BubbleKind::Black,
    ];

    /// Points awarded for popping this kind (before streak bonus)
    pub fn points(self) -> u64 {
        match self {
            BubbleKind::Red => 1,
            BubbleKind::Pink => 2,
            BubbleKind::Green => 5,
            BubbleKind::Blue => 8,
            BubbleKind::Black => 10,
            BubbleKind::Gold => 0,
        }
    }

    /// Seconds added to the clock when popped
    pub fn time_bonus_secs(self) -> u32 {
        match self {
            BubbleKind::Gold => 10,
            _ => 0,
        }
    }

    /// Share of non-gold spawns (weights sum to 1.0; gold is 0)
    pub fn spawn_weight(self) -> f32 {
        match self {
            BubbleKind::Red => 0.40,
            BubbleKind::Pink => 0.30,
            BubbleKind::Green => 0.15,
            BubbleKind::Blue => 0.10,
            BubbleKind::Black => 0.05,
            BubbleKind::Gold => 0.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BubbleKind::Red => "red",
            BubbleKind::Pink => "pink",
            BubbleKind::Green => "green",
            BubbleKind::Blue => "blue",
            BubbleKind::Black => "black",
            BubbleKind::Gold => "gold",
        }
    }

    /// Map a uniform roll in [0, 1) to a kind.
    ///
    /// Rolls below the gold chance are gold; the rest are rescaled into
    /// [0, 1) and walked through the cumulative weight table. Float drift
    /// that leaves the roll unassigned falls back to red.
    pub fn from_roll(roll: f32) -> Self {
        if roll < GOLD_CHANCE {
            return BubbleKind::Gold;
        }
        let r = (roll - GOLD_CHANCE) / (1.0 - GOLD_CHANCE);
        let mut cumulative = 0.0;
        for kind in Self::WEIGHTED {
            cumulative += kind.spawn_weight();
            if r < cumulative {
                return kind;
            }
        }
        BubbleKind::Red
    }
}

/// Size of the play area supplied by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayArea {
    pub width: f32,
    pub height: f32,
}

impl PlayArea {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A bubble entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bubble {
    pub id: u32,
    pub kind: BubbleKind,
    /// Center position
    pub pos: Vec2,
    /// Unit direction of travel, fixed at creation
    pub dir: Vec2,
}

impl Bubble {
    /// Center-to-center distance to another bubble
    #[inline]
    pub fn distance_to(&self, other: &Bubble) -> f32 {
        self.pos.distance(other.pos)
    }
}

/// Make one bubble somewhere fully visible below the HUD band.
///
/// When the area is too short to fit a bubble under the HUD, the bubble sits
/// flush with the bottom edge instead. Narrower than a diameter, it sits
/// flush with the right edge.
pub fn make_bubble(rng: &mut impl Rng, id: u32, area: PlayArea, settings: &Settings) -> Bubble {
    let kind = BubbleKind::from_roll(rng.random::<f32>());

    let radius = settings.bubble_diameter / 2.0;
    let x = rng.random_range(span(radius, area.width - radius));
    let y = rng.random_range(span(settings.hud_height + radius, area.height - radius));

    let theta = rng.random_range(0.0..std::f32::consts::TAU);

    Bubble {
        id,
        kind,
        pos: Vec2::new(x, y),
        dir: Vec2::from_angle(theta),
    }
}

/// `lo..=hi`, pulling `lo` down to `hi` when the band is empty
fn span(lo: f32, hi: f32) -> RangeInclusive<f32> {
    lo.min(hi)..=hi
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_weights_sum_to_one() {
        let total: f32 = BubbleKind::WEIGHTED.iter().map(|k| k.spawn_weight()).sum();
        assert!((total - 1.0).abs() < 1e-6);
        assert_eq!(BubbleKind::Gold.spawn_weight(), 0.0);
    }

    #[test]
    fn test_roll_table() {
        assert_eq!(BubbleKind::from_roll(0.0), BubbleKind::Gold);
        assert_eq!(BubbleKind::from_roll(0.029), BubbleKind::Gold);
        assert_eq!(BubbleKind::from_roll(0.03), BubbleKind::Red);
        // 0.03 + 0.97 * 0.5 lands in pink (cumulative 0.40..0.70)
        assert_eq!(BubbleKind::from_roll(0.515), BubbleKind::Pink);
        // 0.03 + 0.97 * 0.8 lands in green (0.70..0.85)
        assert_eq!(BubbleKind::from_roll(0.806), BubbleKind::Green);
        // 0.03 + 0.97 * 0.9 lands in blue (0.85..0.95)
        assert_eq!(BubbleKind::from_roll(0.903), BubbleKind::Blue);
        assert_eq!(BubbleKind::from_roll(0.99), BubbleKind::Black);
    }

    #[test]
    fn test_unassigned_roll_falls_back_to_red() {
        // Past the end of the cumulative table
        assert_eq!(BubbleKind::from_roll(1.5), BubbleKind::Red);
    }

    #[test]
    fn test_kind_table() {
        let points: Vec<u64> = [
            BubbleKind::Red,
            BubbleKind::Pink,
            BubbleKind::Green,
            BubbleKind::Blue,
            BubbleKind::Black,
            BubbleKind::Gold,
        ]
        .iter()
        .map(|k| k.points())
        .collect();
        assert_eq!(points, vec![1, 2, 5, 8, 10, 0]);
        assert_eq!(BubbleKind::Gold.time_bonus_secs(), 10);
        assert_eq!(BubbleKind::Black.time_bonus_secs(), 0);
    }

    #[test]
    fn test_direction_is_unit() {
        let mut rng = Pcg32::seed_from_u64(7);
        let settings = Settings::default();
        for id in 0..200 {
            let b = make_bubble(&mut rng, id, PlayArea::new(400.0, 800.0), &settings);
            assert!((b.dir.length() - 1.0).abs() < 1e-5);
            assert!(b.pos.is_finite());
        }
    }

    #[test]
    fn test_gold_shows_up_rarely() {
        let mut rng = Pcg32::seed_from_u64(42);
        let settings = Settings::default();
        let area = PlayArea::new(400.0, 800.0);
        let gold = (0..10_000)
            .filter(|&id| make_bubble(&mut rng, id, area, &settings).kind == BubbleKind::Gold)
            .count();
        // 3% expected; allow generous slack
        assert!((150..=450).contains(&gold), "gold count {gold}");
    }

    #[test]
    fn test_short_area_keeps_bubble_on_screen() {
        // 100x100 leaves no room under an 80px HUD for a 60px bubble
        let settings = Settings::default();
        let radius = settings.bubble_diameter / 2.0;
        let mut rng = Pcg32::seed_from_u64(3);
        for id in 0..50 {
            let b = make_bubble(&mut rng, id, PlayArea::new(100.0, 100.0), &settings);
            assert!(b.pos.x >= radius && b.pos.x <= 100.0 - radius);
            assert_eq!(b.pos.y, 100.0 - radius);
        }
    }

    #[test]
    fn test_narrow_area_does_not_panic() {
        let settings = Settings::default();
        let mut rng = Pcg32::seed_from_u64(4);
        let b = make_bubble(&mut rng, 1, PlayArea::new(40.0, 40.0), &settings);
        assert!(b.pos.is_finite());
        assert_eq!(b.pos.x, 40.0 - settings.bubble_diameter / 2.0);
    }

    proptest! {
        #[test]
        fn prop_bubble_stays_inside_area(
            seed in any::<u64>(),
            width in 61.0f32..2000.0,
            height in 141.0f32..2000.0,
        ) {
            let settings = Settings::default();
            let radius = settings.bubble_diameter / 2.0;
            let mut rng = Pcg32::seed_from_u64(seed);
            let b = make_bubble(&mut rng, 1, PlayArea::new(width, height), &settings);
            prop_assert!(b.pos.x >= radius && b.pos.x <= width - radius);
            prop_assert!(b.pos.y >= settings.hud_height + radius && b.pos.y <= height - radius);
        }
    }
}
