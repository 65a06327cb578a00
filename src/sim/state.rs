//! Game state and core simulation types
//!
//! Everything a run needs lives here and is rebuilt by `start_run`; nothing
//! but the seed RNG and the ambient snowfall survives from one run to the next.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::trails::GameMode;
use super::track::{CurveSteer, Track};
use crate::consts::*;
use crate::tuning::{Difficulty, Tuning};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen with mode selection
    Menu,
    /// Active run
    Playing,
    /// Hit an obstacle; results shown
    Crashed,
    /// Reached the bottom of a trail; results shown
    Finished,
}

impl GamePhase {
    /// Phases that show a results overlay
    pub fn is_results(&self) -> bool {
        matches!(self, GamePhase::Crashed | GamePhase::Finished)
    }
}

/// Held turn direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnDir {
    Left,
    #[default]
    Straight,
    Right,
}

impl TurnDir {
    pub fn sign(&self) -> f32 {
        match self {
            TurnDir::Left => -1.0,
            TurnDir::Straight => 0.0,
            TurnDir::Right => 1.0,
        }
    }

    pub fn is_turning(&self) -> bool {
        *self != TurnDir::Straight
    }
}

/// The player
#[derive(Debug, Clone, Default)]
pub struct Skier {
    /// Lateral position on the trail (0 = centre, ±1 = starting trail edge)
    pub x: f32,
    /// Forward speed (units/s)
    pub speed: f32,
    pub turn: TurnDir,
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    Tree,
    Rock,
    Snowman,
    /// Scoring gate, passed through rather than avoided
    Gate,
}

impl ObstacleKind {
    /// Lateral contact radius in lane units
    pub fn hit_radius(&self) -> f32 {
        match self {
            ObstacleKind::Gate => 0.35,
            _ => 0.12,
        }
    }
}

/// An obstacle placed on the slope
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Lateral position, trail-relative
    pub lane: f32,
    /// World depth
    pub z: f32,
    /// Gate already scored
    pub passed: bool,
}

impl Obstacle {
    pub fn hit_radius(&self) -> f32 {
        self.kind.hit_radius()
    }
}

/// A snow particle (screen space)
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds remaining
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
}

/// Ambient falling snow (screen space)
#[derive(Debug, Clone)]
pub struct Snowflake {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub opacity: f32,
}

/// Drawing surface size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn horizon_y(&self) -> f32 {
        self.height * HORIZON
    }

    /// Where the skier's skis meet the snow on screen
    pub fn skier_anchor(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height * 0.82)
    }
}

/// Things the host reacts to (sound, persistence, HUD)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    RunStarted { mode: GameMode },
    GatePassed { bonus: u64 },
    Crashed {
        mode: GameMode,
        score: u64,
        distance: f32,
    },
    Finished {
        mode: GameMode,
        score: u64,
        distance: f32,
    },
    ReturnedToMenu,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed of the current run's content RNG
    pub seed: u64,
    pub mode: GameMode,
    pub phase: GamePhase,
    pub tuning: Tuning,
    pub viewport: Viewport,

    pub skier: Skier,
    /// Total distance travelled this run
    pub distance: f32,
    pub score: u64,
    /// Points earned from gates and the finish line
    pub bonus: u64,
    pub difficulty: Difficulty,

    pub track: Track,
    pub steer: CurveSteer,
    pub obstacles: Vec<Obstacle>,
    /// Depth at which the next obstacle will be placed
    pub next_obstacle_z: f32,

    pub particles: Vec<Particle>,
    pub snowflakes: Vec<Snowflake>,
    /// Particle budget (from quality settings)
    pub max_particles: usize,

    /// Pending events, drained by the host each frame
    pub events: Vec<GameEvent>,

    /// Produces run seeds
    seed_rng: Pcg32,
    /// Run content: curves, obstacle types and spacing
    pub(crate) rng: Pcg32,
    /// Cosmetics only, so visual settings never change a layout
    pub(crate) fx_rng: Pcg32,
    next_id: u32,
}

/// Default particle budget
pub const MAX_PARTICLES: usize = 400;
/// Default snowflake count
pub const SNOWFLAKE_COUNT: usize = 80;

impl GameState {
    /// Create a new game sitting on the menu
    pub fn new(seed: u64, viewport: Viewport, tuning: Tuning) -> Self {
        let difficulty = tuning.at(0.0);
        let mut state = Self {
            seed,
            mode: GameMode::Endless,
            phase: GamePhase::Menu,
            tuning,
            viewport,
            skier: Skier::default(),
            distance: 0.0,
            score: 0,
            bonus: 0,
            difficulty,
            track: Track::new(),
            steer: CurveSteer::default(),
            obstacles: Vec::new(),
            next_obstacle_z: FIRST_OBSTACLE_Z,
            particles: Vec::new(),
            snowflakes: Vec::new(),
            max_particles: MAX_PARTICLES,
            events: Vec::new(),
            seed_rng: Pcg32::seed_from_u64(seed),
            rng: Pcg32::seed_from_u64(seed),
            fx_rng: Pcg32::seed_from_u64(seed ^ 0x9E37_79B9_7F4A_7C15),
            next_id: 1,
        };
        state.init_snowflakes(SNOWFLAKE_COUNT);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reset all per-run state and start skiing
    pub fn start_run(&mut self, mode: GameMode) {
        let seed = match mode {
            GameMode::Endless => self.seed_rng.random::<u64>(),
            GameMode::Trail(trail) => trail.seed,
        };
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.mode = mode;

        self.skier = Skier::default();
        self.distance = 0.0;
        self.score = 0;
        self.bonus = 0;
        self.difficulty = self.tuning.at(mode.ramp_t(&self.tuning, 0.0));
        self.track.reset();
        self.steer = CurveSteer::default();
        self.obstacles.clear();
        self.next_obstacle_z = FIRST_OBSTACLE_Z;
        self.particles.clear();
        self.next_id = 1;
        self.phase = GamePhase::Playing;

        log::info!("Run started: {} (seed {})", mode.key(), seed);
        self.events.push(GameEvent::RunStarted { mode });
    }

    /// Leave the results screen for the title screen
    pub fn return_to_menu(&mut self) {
        self.phase = GamePhase::Menu;
        self.skier.turn = TurnDir::Straight;
        self.events.push(GameEvent::ReturnedToMenu);
    }

    /// Resize the drawing surface, keeping snowflakes on screen
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        let sx = viewport.width / self.viewport.width;
        let sy = viewport.height / self.viewport.height;
        for flake in &mut self.snowflakes {
            flake.pos.x *= sx;
            flake.pos.y *= sy;
        }
        self.viewport = viewport;
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Score from distance plus earned bonuses
    pub fn compute_score(&self) -> u64 {
        (self.distance / DISTANCE_PER_POINT).floor() as u64 + self.bonus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::trails::TRAILS;

    fn state() -> GameState {
        GameState::new(42, Viewport::new(400.0, 800.0), Tuning::default())
    }

    #[test]
    fn test_new_state_on_menu() {
        let state = state();
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.snowflakes.len(), SNOWFLAKE_COUNT);
        assert_eq!(state.track.len(), NUM_SEGMENTS);
    }

    #[test]
    fn test_start_run_resets() {
        let mut state = state();
        state.start_run(GameMode::Endless);
        state.distance = 500.0;
        state.bonus = 200;
        state.skier.x = 0.7;

        state.start_run(GameMode::Endless);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.distance, 0.0);
        assert_eq!(state.bonus, 0);
        assert_eq!(state.skier.x, 0.0);
        assert_eq!(state.next_obstacle_z, FIRST_OBSTACLE_Z);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_endless_runs_get_fresh_seeds_trails_fixed() {
        let mut state = state();
        state.start_run(GameMode::Endless);
        let first = state.seed;
        state.start_run(GameMode::Endless);
        assert_ne!(first, state.seed);

        state.start_run(GameMode::Trail(&TRAILS[2]));
        assert_eq!(state.seed, TRAILS[2].seed);
    }

    #[test]
    fn test_events_drain() {
        let mut state = state();
        state.start_run(GameMode::Endless);
        let events = state.drain_events();
        assert_eq!(
            events,
            vec![GameEvent::RunStarted {
                mode: GameMode::Endless
            }]
        );
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_hit_radii() {
        assert_eq!(ObstacleKind::Gate.hit_radius(), 0.35);
        assert_eq!(ObstacleKind::Tree.hit_radius(), 0.12);
        assert_eq!(ObstacleKind::Snowman.hit_radius(), 0.12);
    }
}
