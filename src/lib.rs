//! Ski Run - An endless first-person skiing game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (skier, trail, obstacles, particles)
//! - `renderer`: Pseudo-3D projection and WebGPU rendering
//! - `platform`: Browser input mapping and frame timing
//! - `persistence`: Best-effort key-value storage
//! - `tuning`: Data-driven difficulty ramp
//! - `ui`: Menu/results layout and tap hit-testing

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use highscores::BestScores;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta accepted from the host (seconds)
    pub const MAX_FRAME_DT: f32 = 0.05;

    /// World units per trail segment
    pub const SEG_LENGTH: f32 = 5.0;
    /// How far ahead of the skier the world is populated and drawn
    pub const DRAW_DIST: f32 = 180.0;
    /// Segment window length, kept constant by recycling: ceil(DRAW_DIST / SEG_LENGTH) + 5
    pub const NUM_SEGMENTS: usize = 41;

    /// Camera height above the snow
    pub const CAMERA_HEIGHT: f32 = 4.0;
    /// Horizontal field of view in degrees
    pub const FOV_DEGREES: f32 = 80.0;
    /// Horizon line as fraction of screen height
    pub const HORIZON: f32 = 0.38;
    /// Objects closer than this are behind the near plane
    pub const NEAR_PLANE: f32 = 0.1;

    /// Obstacles further behind the skier than this are pruned
    pub const PRUNE_BEHIND: f32 = 10.0;
    /// Depth window ahead of the skier in which contacts are resolved
    pub const CONTACT_DEPTH: f32 = 3.0;
    /// Where the first obstacle of a run is placed
    pub const FIRST_OBSTACLE_Z: f32 = 30.0;
    /// No obstacles are spawned this close to a trail's finish line
    pub const FINISH_RUNOUT: f32 = 20.0;

    /// Distance units per score point
    pub const DISTANCE_PER_POINT: f32 = 3.0;

    /// Lateral sway (lane units) added per segment per unit of curvature
    pub const CURVE_SHIFT: f32 = 0.004;
}

/// Camera focal depth derived from the field of view
#[inline]
pub fn camera_depth() -> f32 {
    1.0 / (consts::FOV_DEGREES / 2.0).to_radians().tan()
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
