//! Droppy - catch the falling raindrops
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bucket, raindrops, spawn timer)
//! - `camera`: Orthographic world <-> screen mapping
//! - `renderer`: WebGPU rendering pipeline
//! - `audio`: Web Audio rain loop and catch sound
//! - `settings`: Persisted player preferences

pub mod audio;
pub mod camera;
pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use camera::OrthoCamera;
pub use error::StartupError;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// World dimensions (the camera always shows exactly this area)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 480.0;

    /// Bucket defaults
    pub const BUCKET_WIDTH: f32 = 64.0;
    pub const BUCKET_HEIGHT: f32 = 64.0;
    /// Bucket rests 20px above the bottom edge
    pub const BUCKET_START_Y: f32 = SCREEN_HEIGHT - 460.0;
    /// Keyboard movement speed (pixels/s)
    pub const BUCKET_SPEED: f32 = 500.0;

    /// Raindrop defaults
    pub const RAINDROP_WIDTH: f32 = 64.0;
    pub const RAINDROP_HEIGHT: f32 = 64.0;
    /// Fall speed (pixels/s)
    pub const RAINDROP_SPEED: f32 = 200.0;
    /// A raindrop is gone once `y + OFFSCREEN_MARGIN < 0`
    pub const OFFSCREEN_MARGIN: f32 = BUCKET_WIDTH;

    /// Minimum time between two spawns (seconds)
    pub const SPAWN_INTERVAL_SECS: f64 = 1.0;

    /// Rightmost x a bucket or raindrop may occupy
    pub const MAX_X: f32 = SCREEN_WIDTH - BUCKET_WIDTH;

    /// Largest frame delta fed to the simulation (tab switches, debugger stops)
    pub const MAX_FRAME_DELTA: f32 = 0.1;
}
