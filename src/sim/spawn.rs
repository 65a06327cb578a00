//! Obstacle placement
//!
//! Type and lane are drawn from the run's content RNG, so a given seed always
//! produces the same slope.

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{GameState, Obstacle, ObstacleKind};
use crate::consts::{DRAW_DIST, FINISH_RUNOUT};

/// Pick an obstacle type and its lateral position
pub fn roll_obstacle(rng: &mut Pcg32) -> (ObstacleKind, f32) {
    let roll: f32 = rng.random();

    if roll < 0.45 {
        // Trees line the edges and sometimes stand on the trail
        let lane = if rng.random::<f32>() < 0.35 {
            let side = if rng.random_bool(0.5) { -1.0 } else { 1.0 };
            side * (0.5 + rng.random::<f32>() * 0.8)
        } else {
            (rng.random::<f32>() - 0.5) * 1.8
        };
        (ObstacleKind::Tree, lane)
    } else if roll < 0.7 {
        (ObstacleKind::Rock, (rng.random::<f32>() - 0.5) * 1.4)
    } else if roll < 0.85 {
        (ObstacleKind::Snowman, (rng.random::<f32>() - 0.5) * 1.2)
    } else {
        (ObstacleKind::Gate, (rng.random::<f32>() - 0.5) * 0.8)
    }
}

/// Gap to the next obstacle for a mean spacing
pub fn roll_spacing(rng: &mut Pcg32, mean_spacing: f32) -> f32 {
    mean_spacing * (0.6 + rng.random::<f32>() * 0.8)
}

/// Fill the slope ahead of the skier up to the draw distance
pub fn spawn_ahead(state: &mut GameState) {
    let horizon = state.distance + DRAW_DIST;
    let limit = match state.mode.finish_line() {
        Some(finish) => horizon.min(finish - FINISH_RUNOUT),
        None => horizon,
    };

    while state.next_obstacle_z < limit {
        let (kind, lane) = roll_obstacle(&mut state.rng);
        let id = state.next_entity_id();
        log::debug!("Spawned {:?} at z={:.1} lane={:.2}", kind, state.next_obstacle_z, lane);
        state.obstacles.push(Obstacle {
            id,
            kind,
            lane,
            z: state.next_obstacle_z,
            passed: false,
        });
        state.next_obstacle_z += roll_spacing(&mut state.rng, state.difficulty.obstacle_spacing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;
    use crate::sim::trails::{GameMode, TRAILS};
    use crate::tuning::Tuning;
    use rand::SeedableRng;

    #[test]
    fn test_lanes_stay_in_range() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut seen = [false; 4];
        for _ in 0..2000 {
            let (kind, lane) = roll_obstacle(&mut rng);
            let bound = match kind {
                ObstacleKind::Tree => {
                    seen[0] = true;
                    1.3
                }
                ObstacleKind::Rock => {
                    seen[1] = true;
                    0.7
                }
                ObstacleKind::Snowman => {
                    seen[2] = true;
                    0.6
                }
                ObstacleKind::Gate => {
                    seen[3] = true;
                    0.4
                }
            };
            assert!(lane.abs() <= bound, "{:?} lane {} out of range", kind, lane);
        }
        assert!(seen.iter().all(|s| *s), "all kinds should appear");
    }

    #[test]
    fn test_spacing_band() {
        let mut rng = Pcg32::seed_from_u64(2);
        for _ in 0..500 {
            let gap = roll_spacing(&mut rng, 10.0);
            assert!((6.0..14.0).contains(&gap));
        }
    }

    #[test]
    fn test_same_seed_same_slope() {
        let mut a = Pcg32::seed_from_u64(99);
        let mut b = Pcg32::seed_from_u64(99);
        for _ in 0..100 {
            assert_eq!(roll_obstacle(&mut a), roll_obstacle(&mut b));
        }
    }

    #[test]
    fn test_spawn_ahead_fills_to_draw_distance() {
        let mut state = GameState::new(5, Viewport::new(400.0, 800.0), Tuning::default());
        state.start_run(GameMode::Endless);
        spawn_ahead(&mut state);

        assert!(!state.obstacles.is_empty());
        assert!(state.next_obstacle_z >= DRAW_DIST);
        assert!(state.obstacles.iter().all(|o| o.z < DRAW_DIST));
        assert!(state.obstacles.windows(2).all(|w| w[0].z < w[1].z));
    }

    #[test]
    fn test_no_obstacles_past_finish_runout() {
        let mut state = GameState::new(5, Viewport::new(400.0, 800.0), Tuning::default());
        state.start_run(GameMode::Trail(&TRAILS[0]));
        state.distance = TRAILS[0].length - 50.0;
        spawn_ahead(&mut state);
        let limit = TRAILS[0].length - FINISH_RUNOUT;
        assert!(state.obstacles.iter().all(|o| o.z < limit));
    }
}
