//! Fixed timestep simulation tick
//!
//! Core game loop that advances the run deterministically and drives the
//! menu / playing / crashed / finished state machine.

use glam::Vec2;

use super::autopilot;
use super::collision::{Contact, check_contact};
use super::spawn::spawn_ahead;
use super::state::{GameEvent, GamePhase, GameState, TurnDir};
use super::trails::GameMode;
use crate::consts::PRUNE_BEHIND;
use crate::ui::{self, UiAction};

/// Particles thrown up by a crash
pub const CRASH_PARTICLES: usize = 35;
/// Minimum speed for the skis to spray snow while turning
const SPRAY_MIN_SPEED: f32 = 5.0;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held turn direction
    pub turn: TurnDir,
    /// Pointer tap position (CSS pixels), consumed by one tick
    pub tap: Option<Vec2>,
    /// Idle/demo mode - autopilot steers
    pub idle_mode: bool,
}

/// Advance the game state by one timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Ambient effects run in every phase
    let drift = state.track.curve_at(state.distance) * state.skier.speed * 0.3;
    state.update_snowflakes(dt, drift);
    state.update_particles(dt);

    match state.phase {
        GamePhase::Playing => {}
        phase => {
            let action = input.tap.and_then(|tap| {
                ui::hit_test(phase, state.viewport.width, state.viewport.height, tap)
            });
            if let Some(action) = action {
                apply_action(state, action);
            }
            return;
        }
    }

    state.skier.turn = if input.idle_mode {
        autopilot::steer(state)
    } else {
        input.turn
    };

    advance_run(state, dt);
}

/// Carry out a menu/results button press
pub fn apply_action(state: &mut GameState, action: UiAction) {
    match action {
        UiAction::StartEndless => state.start_run(GameMode::Endless),
        UiAction::StartTrail(trail) => state.start_run(GameMode::Trail(trail)),
        UiAction::Retry => state.start_run(state.mode),
        UiAction::Menu => state.return_to_menu(),
    }
}

fn advance_run(state: &mut GameState, dt: f32) {
    let tuning = state.tuning.clone();

    // Difficulty ramp
    let t = state.mode.ramp_t(&tuning, state.distance);
    state.difficulty = tuning.at(t);
    let max_speed = state.difficulty.max_speed;

    // Accelerate toward the current top speed
    let skier = &mut state.skier;
    if skier.speed < max_speed {
        skier.speed = (skier.speed + dt * tuning.acceleration).min(max_speed);
    }

    // Turning carves sideways and bleeds a little speed
    if skier.turn.is_turning() {
        skier.x += skier.turn.sign() * tuning.turn_rate * dt;
        skier.speed *= 1.0 - tuning.turn_drag * dt;
    }

    // The bend under the skis pushes outward
    let curve = state.track.curve_at(state.distance);
    state.skier.x += curve * state.skier.speed * dt * tuning.centrifugal;

    // Trail sway
    state
        .steer
        .update(dt, state.difficulty.curve_amplitude, &tuning, &mut state.rng);

    // Move forward
    state.distance += state.skier.speed * dt;
    state.score = state.compute_score();

    state.track.recycle(state.distance, state.steer.curvature);
    spawn_ahead(state);

    let cutoff = state.distance - PRUNE_BEHIND;
    state.obstacles.retain(|o| o.z >= cutoff);

    // Contacts
    let mut crashed = false;
    for obstacle in &mut state.obstacles {
        match check_contact(state.skier.x, state.distance, obstacle) {
            Contact::Clear => {}
            Contact::GatePassed => {
                obstacle.passed = true;
                state.bonus += tuning.gate_bonus;
                state.skier.speed += tuning.gate_speed_boost;
                state.events.push(GameEvent::GatePassed {
                    bonus: tuning.gate_bonus,
                });
            }
            Contact::Crash => {
                crashed = true;
                break;
            }
        }
    }
    state.score = state.compute_score();

    if crashed {
        crash(state);
        return;
    }

    if state
        .mode
        .finish_line()
        .is_some_and(|finish| state.distance >= finish)
    {
        finish_trail(state);
        return;
    }

    // Snow spray off the skis while carving
    if state.skier.turn.is_turning() && state.skier.speed > SPRAY_MIN_SPEED {
        let sign = state.skier.turn.sign();
        let origin = Vec2::new(
            state.viewport.width / 2.0 - sign * 20.0,
            state.viewport.height * 0.88,
        );
        state.spawn_spray(origin, -sign);
    }
}

fn crash(state: &mut GameState) {
    state.phase = GamePhase::Crashed;
    state.skier.speed = 0.0;
    state.skier.turn = TurnDir::Straight;

    let anchor = state.viewport.skier_anchor();
    state.spawn_crash(anchor, CRASH_PARTICLES);

    log::info!(
        "Wipeout at {:.0}m, score {}",
        state.distance,
        state.score
    );
    state.events.push(GameEvent::Crashed {
        mode: state.mode,
        score: state.score,
        distance: state.distance,
    });
}

fn finish_trail(state: &mut GameState) {
    if let GameMode::Trail(trail) = state.mode {
        state.bonus += trail.finish_bonus;
    }
    state.score = state.compute_score();
    state.phase = GamePhase::Finished;
    state.skier.speed = 0.0;
    state.skier.turn = TurnDir::Straight;

    log::info!(
        "Finished {} with score {}",
        state.mode.key(),
        state.score
    );
    state.events.push(GameEvent::Finished {
        mode: state.mode,
        score: state.score,
        distance: state.distance,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::state::{Obstacle, ObstacleKind, Viewport};
    use crate::sim::trails::{GameMode, TRAILS};
    use crate::tuning::Tuning;

    const W: f32 = 400.0;
    const H: f32 = 800.0;

    fn menu_state(seed: u64) -> GameState {
        GameState::new(seed, Viewport::new(W, H), Tuning::default())
    }

    fn playing(seed: u64) -> GameState {
        let mut state = menu_state(seed);
        state.start_run(GameMode::Endless);
        state.drain_events();
        state
    }

    /// Empty slope: nothing spawns unless a test places it
    fn empty_slope(seed: u64) -> GameState {
        let mut state = playing(seed);
        state.next_obstacle_z = f32::MAX;
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

    fn run(state: &mut GameState, input: &TickInput, ticks: usize) {
        for _ in 0..ticks {
            tick(state, input, SIM_DT);
        }
    }

    #[test]
    fn test_menu_tap_starts_run() {
        let mut state = menu_state(1);
        let start = ui::menu_layout(W, H).start.center();

        // Tap outside any button does nothing
        let miss = TickInput {
            tap: Some(Vec2::new(2.0, 2.0)),
            ..Default::default()
        };
        tick(&mut state, &miss, SIM_DT);
        assert_eq!(state.phase, GamePhase::Menu);

        let hit = TickInput {
            tap: Some(start),
            ..Default::default()
        };
        tick(&mut state, &hit, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.mode, GameMode::Endless);
    }

    #[test]
    fn test_menu_trail_button_starts_trail() {
        let mut state = menu_state(1);
        let button = ui::menu_layout(W, H).trails[2].center();
        let input = TickInput {
            tap: Some(button),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.mode, GameMode::Trail(&TRAILS[2]));
        assert_eq!(state.difficulty.t, TRAILS[2].t_start);
    }

    #[test]
    fn test_menu_does_not_move_skier() {
        let mut state = menu_state(1);
        let input = TickInput {
            turn: TurnDir::Left,
            ..Default::default()
        };
        run(&mut state, &input, 120);
        assert_eq!(state.distance, 0.0);
        assert_eq!(state.skier.x, 0.0);
    }

    #[test]
    fn test_accelerates_to_top_speed() {
        let mut state = empty_slope(2);
        run(&mut state, &TickInput::default(), 120 * 5);
        assert!((state.skier.speed - state.difficulty.max_speed).abs() < 1e-3);
        assert!(state.skier.speed <= state.difficulty.max_speed);
    }

    #[test]
    fn test_turning_moves_and_slows() {
        let mut straight = empty_slope(3);
        let mut turning = empty_slope(3);
        let left = TickInput {
            turn: TurnDir::Left,
            ..Default::default()
        };
        run(&mut straight, &TickInput::default(), 60);
        run(&mut turning, &left, 60);
        assert!(turning.skier.x < straight.skier.x);
        assert!(turning.skier.speed < straight.skier.speed);
        assert!(!turning.particles.is_empty());
    }

    #[test]
    fn test_score_monotonic_with_distance() {
        let mut state = playing(4);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let mut last_score = 0;
        let mut last_distance = 0.0;
        for _ in 0..120 * 30 {
            tick(&mut state, &input, SIM_DT);
            if state.phase != GamePhase::Playing {
                break;
            }
            assert!(state.distance >= last_distance);
            assert!(state.score >= last_score);
            assert!(state.score >= (state.distance / 3.0).floor() as u64);
            last_score = state.score;
            last_distance = state.distance;
        }
        assert!(last_distance > 0.0);
    }

    #[test]
    fn test_obstacles_behind_are_pruned() {
        let mut state = playing(5);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..120 * 20 {
            tick(&mut state, &input, SIM_DT);
            if state.phase != GamePhase::Playing {
                break;
            }
            assert!(
                state
                    .obstacles
                    .iter()
                    .all(|o| o.z >= state.distance - PRUNE_BEHIND)
            );
        }
    }

    #[test]
    fn test_gate_awards_bonus_once() {
        let mut state = empty_slope(6);
        place(&mut state, ObstacleKind::Gate, 0.0, 6.0);
        run(&mut state, &TickInput::default(), 120 * 3);

        let gate_events = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GatePassed { .. }))
            .count();
        assert_eq!(gate_events, 1);
        assert_eq!(state.bonus, 200);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(
            state.score,
            (state.distance / 3.0).floor() as u64 + 200
        );
    }

    #[test]
    fn test_crash_ends_run() {
        let mut state = empty_slope(7);
        place(&mut state, ObstacleKind::Tree, 0.0, 6.0);
        let input = TickInput::default();
        let mut steps = 0;
        while state.phase == GamePhase::Playing && steps < 120 * 3 {
            tick(&mut state, &input, SIM_DT);
            steps += 1;
        }

        // Checked on the crash tick itself; the burst fades within about a second
        assert_eq!(state.phase, GamePhase::Crashed);
        assert_eq!(state.skier.speed, 0.0);
        assert!(!state.particles.is_empty());
        let events = state.drain_events();
        assert!(matches!(
            events.last(),
            Some(GameEvent::Crashed {
                mode: GameMode::Endless,
                ..
            })
        ));

        // Frozen after the crash
        let distance = state.distance;
        run(&mut state, &TickInput::default(), 60);
        assert_eq!(state.distance, distance);
    }

    #[test]
    fn test_passing_beside_obstacle_is_safe() {
        let mut state = empty_slope(8);
        place(&mut state, ObstacleKind::Rock, 0.5, 6.0);
        run(&mut state, &TickInput::default(), 120 * 3);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_trail_finishes_once() {
        let mut state = menu_state(9);
        state.start_run(GameMode::Trail(&TRAILS[0]));
        state.next_obstacle_z = f32::MAX;
        state.distance = TRAILS[0].length - 5.0;
        state.skier.speed = 30.0;
        state.drain_events();

        run(&mut state, &TickInput::default(), 120);
        assert_eq!(state.phase, GamePhase::Finished);
        assert_eq!(state.bonus, TRAILS[0].finish_bonus);
        assert_eq!(
            state.score,
            (state.distance / 3.0).floor() as u64 + TRAILS[0].finish_bonus
        );

        run(&mut state, &TickInput::default(), 120);
        let finishes = state
            .drain_events()
            .into_iter()
            .filter(|e| {
                matches!(e, GameEvent::Finished { mode: GameMode::Trail(t), .. } if t.id == TRAILS[0].id)
            })
            .count();
        assert_eq!(finishes, 1);
    }

    #[test]
    fn test_results_buttons() {
        let mut state = menu_state(10);
        state.start_run(GameMode::Trail(&TRAILS[1]));
        state.phase = GamePhase::Crashed;

        let layout = ui::results_layout(W, H);
        let retry = TickInput {
            tap: Some(layout.retry.center()),
            ..Default::default()
        };
        tick(&mut state, &retry, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.mode, GameMode::Trail(&TRAILS[1]));

        state.phase = GamePhase::Finished;
        let menu = TickInput {
            tap: Some(layout.menu.center()),
            ..Default::default()
        };
        tick(&mut state, &menu, SIM_DT);
        assert_eq!(state.phase, GamePhase::Menu);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = playing(99999);
        let mut state2 = playing(99999);

        let inputs = [
            TickInput {
                turn: TurnDir::Left,
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                turn: TurnDir::Right,
                ..Default::default()
            },
        ];

        for input in inputs.iter().cycle().take(120 * 10) {
            tick(&mut state1, input, SIM_DT);
            tick(&mut state2, input, SIM_DT);
        }

        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.distance, state2.distance);
        assert_eq!(state1.skier.x, state2.skier.x);
        assert_eq!(state1.obstacles, state2.obstacles);
    }

    #[test]
    fn test_trail_layout_reproducible() {
        let mut a = menu_state(1);
        let mut b = menu_state(2);
        a.start_run(GameMode::Trail(&TRAILS[3]));
        b.start_run(GameMode::Trail(&TRAILS[3]));
        spawn_ahead(&mut a);
        spawn_ahead(&mut b);
        assert_eq!(a.obstacles, b.obstacles);
    }
}
