//! Trail catalog and game modes
//!
//! Endless mode ramps difficulty over distance until the skier crashes.
//! Trail mode runs a named course of fixed length whose layout is seeded, so
//! every attempt at the same trail meets the same obstacles.

use crate::lerp;
use crate::tuning::Tuning;

/// A named finite course
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailDef {
    /// Stable identifier (persisted as the best-score key)
    pub id: &'static str,
    pub name: &'static str,
    /// Course length in world units
    pub length: f32,
    /// Difficulty ramp position at the top and the bottom of the course
    pub t_start: f32,
    pub t_end: f32,
    /// Content seed for the course layout
    pub seed: u64,
    /// Points awarded for reaching the finish line
    pub finish_bonus: u64,
}

/// Number of trails in the catalog
pub const TRAIL_COUNT: usize = 4;

/// All trails, easiest first
pub static TRAILS: [TrailDef; TRAIL_COUNT] = [
    TrailDef {
        id: "bunny-hill",
        name: "Bunny Hill",
        length: 1500.0,
        t_start: 0.0,
        t_end: 0.15,
        seed: 0x5EED_0001,
        finish_bonus: 250,
    },
    TrailDef {
        id: "blue-ridge",
        name: "Blue Ridge",
        length: 3000.0,
        t_start: 0.2,
        t_end: 0.4,
        seed: 0x5EED_0002,
        finish_bonus: 500,
    },
    TrailDef {
        id: "black-diamond",
        name: "Black Diamond",
        length: 4500.0,
        t_start: 0.45,
        t_end: 0.65,
        seed: 0x5EED_0003,
        finish_bonus: 1000,
    },
    TrailDef {
        id: "widowmaker",
        name: "Widowmaker",
        length: 6000.0,
        t_start: 0.7,
        t_end: 1.0,
        seed: 0x5EED_0004,
        finish_bonus: 2000,
    },
];

/// Which variant of the game is being played
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameMode {
    Endless,
    Trail(&'static TrailDef),
}

impl GameMode {
    /// Best-score key for this mode
    pub fn key(&self) -> &'static str {
        match self {
            GameMode::Endless => "endless",
            GameMode::Trail(trail) => trail.id,
        }
    }

    /// Trail length, if the mode has a finish line
    pub fn finish_line(&self) -> Option<f32> {
        match self {
            GameMode::Endless => None,
            GameMode::Trail(trail) => Some(trail.length),
        }
    }

    /// Difficulty ramp position at a distance travelled
    pub fn ramp_t(&self, tuning: &Tuning, distance: f32) -> f32 {
        match self {
            GameMode::Endless => tuning.endless_t(distance),
            GameMode::Trail(trail) => {
                let progress = (distance / trail.length).clamp(0.0, 1.0);
                lerp(trail.t_start, trail.t_end, progress)
            }
        }
    }

    /// Fraction of the course completed (0 for endless)
    pub fn progress(&self, distance: f32) -> f32 {
        match self.finish_line() {
            Some(length) => (distance / length).clamp(0.0, 1.0),
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trail_ids_unique() {
        for trail in TRAILS.iter() {
            assert_eq!(TRAILS.iter().filter(|t| t.id == trail.id).count(), 1);
        }
    }

    #[test]
    fn test_trail_ramp_stays_in_band() {
        let tuning = Tuning::default();
        let mode = GameMode::Trail(&TRAILS[1]);
        assert_eq!(mode.ramp_t(&tuning, 0.0), 0.2);
        assert!((mode.ramp_t(&tuning, 1500.0) - 0.3).abs() < 1e-5);
        assert!((mode.ramp_t(&tuning, 99999.0) - 0.4).abs() < 1e-5);
    }

    #[test]
    fn test_endless_has_no_finish() {
        assert_eq!(GameMode::Endless.finish_line(), None);
        assert_eq!(GameMode::Endless.progress(5000.0), 0.0);
        assert_eq!(GameMode::Endless.key(), "endless");
        assert_eq!(GameMode::Trail(&TRAILS[0]).key(), "bunny-hill");
    }
}
