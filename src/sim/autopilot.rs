//! Idle/demo mode - steer the bucket on its own
//!
//! Produces the same `FrameInput` a player would, using only the arrow keys.

use super::state::GameState;
use super::tick::FrameInput;

/// Don't twitch when already lined up within this many pixels
const DEAD_ZONE: f32 = 4.0;

/// Pick the raindrop that will land first and walk the bucket under it
pub fn autopilot_input(state: &GameState) -> FrameInput {
    let bucket = state.bucket.rect;

    // Lowest raindrop whose bottom is still above the bucket floor
    let target = state
        .raindrops
        .iter()
        .filter(|r| r.rect.y + r.rect.height > bucket.y)
        .min_by(|a, b| a.rect.y.total_cmp(&b.rect.y));

    let Some(target) = target else {
        return FrameInput::default();
    };

    let offset = target.rect.center().x - bucket.center().x;
    FrameInput {
        pointer_x: None,
        left: offset < -DEAD_ZONE,
        right: offset > DEAD_ZONE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Raindrop, tick};

    #[test]
    fn test_no_raindrops_no_input() {
        let mut state = GameState::new(1, 0.0);
        state.raindrops.clear();
        assert_eq!(autopilot_input(&state), FrameInput::default());
    }

    #[test]
    fn test_moves_toward_lowest() {
        let mut state = GameState::new(1, 0.0);
        state.raindrops.clear();
        state.raindrops.push(Raindrop::new(1, 700.0, 400.0));
        state.raindrops.push(Raindrop::new(2, 10.0, 200.0));
        let input = autopilot_input(&state);
        assert!(input.left);
        assert!(!input.right);
    }

    #[test]
    fn test_lined_up_stays_put() {
        let mut state = GameState::new(1, 0.0);
        state.raindrops.clear();
        state.raindrops.push(Raindrop::new(1, 370.0, 300.0));
        assert_eq!(autopilot_input(&state), FrameInput::default());
    }

    #[test]
    fn test_catches_in_demo_run() {
        let mut state = GameState::new(2024, 0.0);
        let delta = 1.0 / 60.0;
        let mut now = 0.0;
        for _ in 0..60 * 30 {
            now += delta as f64;
            let input = autopilot_input(&state);
            tick(&mut state, &input, delta, now);
        }
        // One raindrop per second at bucket speed 500px/s is easy to keep up with
        assert!(state.caught >= 20, "caught {}", state.caught);
    }
}
