//! Per-frame bubble movement
//!
//! Bubbles travel in straight lines. Speed ramps linearly from the base
//! speed to the max speed over the session, and bubbles that drift more
//! than one diameter past an edge are culled.

use super::bubble::{Bubble, PlayArea};
use crate::settings::Settings;

/// Fraction of the session that has elapsed, clamped to [0, 1]
pub fn elapsed_fraction(duration_secs: u32, time_remaining_secs: u32) -> f32 {
    if duration_secs == 0 {
        return 1.0;
    }
    let elapsed = duration_secs as f32 - time_remaining_secs as f32;
    (elapsed / duration_secs as f32).clamp(0.0, 1.0)
}

/// Instantaneous bubble speed for a given session progress
#[inline]
pub fn speed_at(settings: &Settings, elapsed_fraction: f32) -> f32 {
    settings.base_speed + elapsed_fraction * (settings.max_speed - settings.base_speed)
}

/// Whether a bubble center has left the cull box around the play area
pub fn is_off_screen(bubble: &Bubble, area: PlayArea, settings: &Settings) -> bool {
    let margin = settings.bubble_diameter;
    let p = bubble.pos;
    p.x < -margin
        || p.x > area.width + margin
        || p.y < settings.hud_height - margin
        || p.y > area.height + margin
}

/// Move every bubble one step and drop the ones that left the field
pub fn advance(
    bubbles: &mut Vec<Bubble>,
    area: PlayArea,
    elapsed_fraction: f32,
    dt: f32,
    settings: &Settings,
) {
    let step = speed_at(settings, elapsed_fraction) * dt;
    for bubble in bubbles.iter_mut() {
        bubble.pos += bubble.dir * step;
    }
    bubbles.retain(|b| !is_off_screen(b, area, settings));
}
