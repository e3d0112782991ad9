//! Non-overlapping bubble placement
//!
//! Each new bubble gets a bounded number of factory draws to find a spot at
//! least one diameter away from everything already on the field. Bubbles
//! that cannot find room are dropped, so a crowded field yields fewer
//! bubbles than asked for.

use rand::Rng;

use super::bubble::{Bubble, PlayArea, make_bubble};
use crate::consts::PLACEMENT_ATTEMPTS;
use crate::settings::Settings;

/// Place up to `count` bubbles that overlap neither `existing` nor each other.
///
/// Ids are taken from `next_id`, which only advances for accepted bubbles.
pub fn place_bubbles(
    rng: &mut impl Rng,
    count: usize,
    area: PlayArea,
    existing: &[Bubble],
    settings: &Settings,
    next_id: &mut u32,
) -> Vec<Bubble> {
    let min_distance = settings.bubble_diameter;
    let mut placed: Vec<Bubble> = Vec::with_capacity(count);

    for _ in 0..count {
        let accepted = (0..PLACEMENT_ATTEMPTS)
            .map(|_| make_bubble(rng, *next_id, area, settings))
            .find(|candidate| {
                existing
                    .iter()
                    .chain(placed.iter())
                    .all(|other| candidate.distance_to(other) >= min_distance)
            });

        match accepted {
            Some(bubble) => {
                *next_id += 1;
                placed.push(bubble);
            }
            None => log::debug!("No room for bubble after {} attempts", PLACEMENT_ATTEMPTS),
        }
    }

    placed
}
