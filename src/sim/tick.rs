//! Per-frame update
//!
//! Advances the game by one rendered frame of variable length.

use super::spawner::{spawn_due, spawn_raindrop};
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Input sampled for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// World-space x of the active pointer/touch, if any
    pub pointer_x: Option<f32>,
    /// Left arrow or A held
    pub left: bool,
    /// Right arrow or D held
    pub right: bool,
}

/// What happens to a raindrop after it moved this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fate {
    Falling,
    Missed,
    Caught,
}

/// Advance the game by `delta` seconds; `now` is the monotonic clock in seconds
pub fn tick(state: &mut GameState, input: &FrameInput, delta: f32, now: f64) {
    state.events.clear();

    if !state.is_running() {
        return;
    }

    // Pointer first, keys on top of it, then clamp
    if let Some(x) = input.pointer_x {
        state.bucket.center_on(x);
    }
    if input.left {
        state.bucket.rect.x -= BUCKET_SPEED * delta;
    }
    if input.right {
        state.bucket.rect.x += BUCKET_SPEED * delta;
    }
    state.bucket.clamp_to_screen();

    if spawn_due(state, now) {
        spawn_raindrop(state, now);
    }

    // Move, then mark-and-filter so survivors keep their order
    let bucket = state.bucket.rect;
    let mut events = Vec::new();
    state.raindrops.retain_mut(|raindrop| {
        raindrop.rect.y -= RAINDROP_SPEED * delta;

        let fate = if raindrop.is_offscreen() {
            Fate::Missed
        } else if raindrop.rect.overlaps(&bucket) {
            Fate::Caught
        } else {
            Fate::Falling
        };

        match fate {
            Fate::Falling => {}
            Fate::Missed => events.push(GameEvent::RaindropMissed {
                id: raindrop.id,
                x: raindrop.rect.x,
            }),
            Fate::Caught => events.push(GameEvent::RaindropCaught {
                id: raindrop.id,
                x: raindrop.rect.x,
                y: raindrop.rect.y,
            }),
        }

        fate == Fate::Falling
    });

    for event in &events {
        match event {
            GameEvent::RaindropCaught { id, .. } => {
                state.caught += 1;
                log::debug!("Caught raindrop {} (total {})", id, state.caught);
            }
            GameEvent::RaindropMissed { id, .. } => {
                state.missed += 1;
                log::debug!("Missed raindrop {} (total {})", id, state.missed);
            }
            GameEvent::RaindropSpawned { .. } => {}
        }
    }
    state.events.extend(events);
}
