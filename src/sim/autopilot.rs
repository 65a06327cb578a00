//! Idle/demo steering
//!
//! Looks a short way down the slope, heads for the nearest unscored gate and
//! swerves around anything solid in its path.

use super::state::{GameState, ObstacleKind, TurnDir};

/// How far ahead the autopilot reads the slope
const LOOKAHEAD: f32 = 45.0;
/// Lateral clearance it tries to keep from solid obstacles
const CLEARANCE: f32 = 0.3;
/// Dead zone around the aim point
const AIM_TOLERANCE: f32 = 0.05;

/// Choose a turn direction for the current state
pub fn steer(state: &GameState) -> TurnDir {
    let x = state.skier.x;
    let ahead = |z: f32| z > state.distance && z < state.distance + LOOKAHEAD;

    // Nearest solid obstacle that would hit us if we held our line
    let threat = state
        .obstacles
        .iter()
        .filter(|o| o.kind != ObstacleKind::Gate && ahead(o.z))
        .filter(|o| (o.lane - x).abs() < o.hit_radius() + CLEARANCE)
        .min_by(|a, b| a.z.total_cmp(&b.z));

    let aim = if let Some(threat) = threat {
        // Dodge toward the trail centre side when possible
        let away = if threat.lane > x { -1.0 } else { 1.0 };
        let dodge = threat.lane + away * (threat.hit_radius() + CLEARANCE + 0.05);
        if dodge.abs() > state.difficulty.half_width + 0.3 {
            threat.lane - away * (threat.hit_radius() + CLEARANCE + 0.05)
        } else {
            dodge
        }
    } else if let Some(gate) = state
        .obstacles
        .iter()
        .filter(|o| o.kind == ObstacleKind::Gate && !o.passed && ahead(o.z))
        .min_by(|a, b| a.z.total_cmp(&b.z))
    {
        gate.lane
    } else {
        // Drift back to the middle, leaning against the bend
        -state.track.curve_at(state.distance) * 0.1
    };

    let delta = aim - x;
    if delta > AIM_TOLERANCE {
        TurnDir::Right
    } else if delta < -AIM_TOLERANCE {
        TurnDir::Left
    } else {
        TurnDir::Straight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Obstacle, Viewport};
    use crate::sim::trails::GameMode;
    use crate::tuning::Tuning;

    fn playing() -> GameState {
        let mut state = GameState::new(11, Viewport::new(400.0, 800.0), Tuning::default());
        state.start_run(GameMode::Endless);
        state.distance = 100.0;
        state
    }

    fn place(state: &mut GameState, kind: ObstacleKind, lane: f32, z: f32) {
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            kind,
            lane,
            z,
            passed: false,
        });
    }

    #[test]
    fn test_swerves_around_tree() {
        let mut state = playing();
        place(&mut state, ObstacleKind::Tree, 0.05, 120.0);
        assert_eq!(steer(&state), TurnDir::Left);

        let mut state = playing();
        place(&mut state, ObstacleKind::Rock, -0.05, 120.0);
        assert_eq!(steer(&state), TurnDir::Right);
    }

    #[test]
    fn test_heads_for_gate() {
        let mut state = playing();
        place(&mut state, ObstacleKind::Gate, 0.3, 130.0);
        assert_eq!(steer(&state), TurnDir::Right);
    }

    #[test]
    fn test_ignores_obstacles_behind_and_far() {
        let mut state = playing();
        place(&mut state, ObstacleKind::Tree, 0.0, 90.0);
        place(&mut state, ObstacleKind::Tree, 0.0, 400.0);
        assert_eq!(steer(&state), TurnDir::Straight);
    }
}
