//! Raindrop spawning

use rand::Rng;

use super::state::{GameEvent, GameState, Raindrop};
use crate::consts::*;

/// Random spawn column, uniform over the whole pixels in `[0, MAX_X]`
pub fn random_spawn_x<R: Rng>(rng: &mut R) -> f32 {
    rng.random_range(0..=MAX_X as i32) as f32
}

/// Whether enough time passed since the last spawn
pub fn spawn_due(state: &GameState, now: f64) -> bool {
    now - state.last_spawn_time > SPAWN_INTERVAL_SECS
}

/// Append a new raindrop at the top of the screen and restart the spawn timer
pub fn spawn_raindrop(state: &mut GameState, now: f64) {
    let x = random_spawn_x(&mut state.rng);
    let id = state.next_entity_id();
    state.raindrops.push(Raindrop::new(id, x, SCREEN_HEIGHT));
    state.last_spawn_time = now;
    state.events.push(GameEvent::RaindropSpawned { id, x });
    log::trace!("Spawned raindrop {} at x={}", id, x);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_x_in_range() {
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..10_000 {
            let x = random_spawn_x(&mut rng);
            assert!((0.0..=MAX_X).contains(&x));
            assert_eq!(x.fract(), 0.0);
        }
    }

    #[test]
    fn test_spawn_x_covers_both_ends() {
        let mut rng = Pcg32::seed_from_u64(1);
        let xs: Vec<f32> = (0..50_000).map(|_| random_spawn_x(&mut rng)).collect();
        assert!(xs.iter().any(|&x| x == 0.0));
        assert!(xs.iter().any(|&x| x == MAX_X));
    }

    #[test]
    fn test_spawn_raindrop() {
        let mut state = GameState::new(3, 0.0);
        state.events.clear();
        spawn_raindrop(&mut state, 5.5);

        assert_eq!(state.raindrops.len(), 2);
        let raindrop = state.raindrops.last().unwrap();
        assert_eq!(raindrop.rect.y, SCREEN_HEIGHT);
        assert_eq!(raindrop.rect.width, 64.0);
        assert_eq!(raindrop.rect.height, 64.0);
        assert_eq!(state.last_spawn_time, 5.5);
        assert_eq!(
            state.events,
            vec![GameEvent::RaindropSpawned {
                id: raindrop.id,
                x: raindrop.rect.x
            }]
        );
    }

    #[test]
    fn test_spawn_due_is_strict() {
        let state = GameState::new(3, 10.0);
        assert!(!spawn_due(&state, 10.5));
        assert!(!spawn_due(&state, 11.0));
        assert!(spawn_due(&state, 11.001));
    }

    #[test]
    fn test_same_seed_same_drops() {
        let mut a = GameState::new(99, 0.0);
        let mut b = GameState::new(99, 0.0);
        for t in 1..20 {
            spawn_raindrop(&mut a, t as f64);
            spawn_raindrop(&mut b, t as f64);
        }
        assert_eq!(a.raindrops, b.raindrops);
    }
}
