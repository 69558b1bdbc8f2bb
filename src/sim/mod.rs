//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time is passed in, never read from a clock
//! - Seeded RNG only
//! - Stable raindrop order (spawn order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod rect;
pub mod spawner;
pub mod state;
pub mod tick;

pub use autopilot::autopilot_input;
pub use rect::Rect;
pub use spawner::{random_spawn_x, spawn_due, spawn_raindrop};
pub use state::{Bucket, GameEvent, GameState, Raindrop, ScreenState};
pub use tick::{FrameInput, tick};
