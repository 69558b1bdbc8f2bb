//! Game state and core simulation types
//!
//! Everything the per-frame update touches is owned by `GameState`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;

/// Screen lifecycle state, driven by the host's pause/resume callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScreenState {
    #[default]
    Run,
    /// Host paused the screen (tab hidden, window blurred)
    Pause,
    /// Host resumed after a pause; updates like `Run`
    Resume,
}

/// Something that happened during the last frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RaindropSpawned { id: u32, x: f32 },
    /// Raindrop landed in the bucket
    RaindropCaught { id: u32, x: f32, y: f32 },
    /// Raindrop fell past the bottom edge
    RaindropMissed { id: u32, x: f32 },
}

/// The player's bucket
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub rect: Rect,
}

impl Default for Bucket {
    fn default() -> Self {
        Self {
            // Centered horizontally
            rect: Rect::new(
                (SCREEN_WIDTH / 2.0).floor() - (BUCKET_WIDTH / 2.0).floor(),
                BUCKET_START_Y,
                BUCKET_WIDTH,
                BUCKET_HEIGHT,
            ),
        }
    }
}

impl Bucket {
    /// Center the bucket on a world-space x (no clamping)
    pub fn center_on(&mut self, world_x: f32) {
        self.rect.x = world_x - (BUCKET_WIDTH / 2.0).floor();
    }

    /// Keep the bucket inside the screen
    pub fn clamp_to_screen(&mut self) {
        self.rect.x = self.rect.x.clamp(0.0, MAX_X);
    }
}

/// A falling raindrop
#[derive(Debug, Clone, PartialEq)]
pub struct Raindrop {
    pub id: u32,
    pub rect: Rect,
}

impl Raindrop {
    pub fn new(id: u32, x: f32, y: f32) -> Self {
        Self {
            id,
            rect: Rect::new(x, y, RAINDROP_WIDTH, RAINDROP_HEIGHT),
        }
    }

    /// Entirely below the bottom edge
    pub fn is_offscreen(&self) -> bool {
        self.rect.y + OFFSCREEN_MARGIN < 0.0
    }
}

/// Complete game state for one game screen
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub screen: ScreenState,
    pub bucket: Bucket,
    /// Live raindrops in spawn order
    pub raindrops: Vec<Raindrop>,
    /// Monotonic time of the last spawn (seconds)
    pub last_spawn_time: f64,
    /// Raindrops caught this session
    pub caught: u32,
    /// Raindrops that reached the bottom this session
    pub missed: u32,
    /// Events from the most recent frame
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a new game screen; the first raindrop spawns immediately at `now`
    pub fn new(seed: u64, now: f64) -> Self {
        let mut state = Self {
            seed,
            screen: ScreenState::Run,
            bucket: Bucket::default(),
            raindrops: Vec::new(),
            last_spawn_time: now,
            caught: 0,
            missed: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };

        super::spawner::spawn_raindrop(&mut state, now);

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Host lifecycle: screen paused
    pub fn pause(&mut self) {
        self.screen = ScreenState::Pause;
    }

    /// Host lifecycle: screen resumed
    pub fn resume(&mut self) {
        self.screen = ScreenState::Resume;
    }

    /// Whether the update routine advances the game
    pub fn is_running(&self) -> bool {
        self.screen != ScreenState::Pause
    }

    /// Take the events recorded by the last frame
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = GameState::new(7, 0.0);
        assert_eq!(state.bucket.rect, Rect::new(368.0, 20.0, 64.0, 64.0));
        assert_eq!(state.raindrops.len(), 1);
        assert_eq!(state.raindrops[0].rect.y, SCREEN_HEIGHT);
        assert_eq!(state.screen, ScreenState::Run);
        assert!(matches!(
            state.events[..],
            [GameEvent::RaindropSpawned { id: 1, .. }]
        ));
    }

    #[test]
    fn test_lifecycle() {
        let mut state = GameState::new(7, 0.0);
        assert!(state.is_running());
        state.pause();
        assert_eq!(state.screen, ScreenState::Pause);
        assert!(!state.is_running());
        state.resume();
        assert_eq!(state.screen, ScreenState::Resume);
        assert!(state.is_running());
    }

    #[test]
    fn test_center_on_is_unclamped() {
        let mut bucket = Bucket::default();
        bucket.center_on(10.0);
        assert_eq!(bucket.rect.x, -22.0);
        bucket.clamp_to_screen();
        assert_eq!(bucket.rect.x, 0.0);

        bucket.center_on(790.0);
        bucket.clamp_to_screen();
        assert_eq!(bucket.rect.x, MAX_X);
    }

    #[test]
    fn test_offscreen_threshold() {
        assert!(!Raindrop::new(1, 0.0, -64.0).is_offscreen());
        assert!(Raindrop::new(1, 0.0, -64.5).is_offscreen());
    }

    #[test]
    fn test_drain_events() {
        let mut state = GameState::new(7, 0.0);
        assert_eq!(state.drain_events().len(), 1);
        assert!(state.events.is_empty());
    }
}
