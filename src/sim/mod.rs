//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (content and cosmetics drawn from separate streams)
//! - Stable iteration order (by spawn order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod effects;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod track;
pub mod trails;

pub use collision::{Contact, check_contact};
pub use state::{
    GameEvent, GamePhase, GameState, MAX_PARTICLES, Obstacle, ObstacleKind, Particle,
    SNOWFLAKE_COUNT, Skier, Snowflake, TurnDir, Viewport,
};
pub use tick::{TickInput, apply_action, tick};
pub use track::{CurveSteer, Segment, Track};
pub use trails::{GameMode, TRAILS, TrailDef};
