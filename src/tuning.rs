//! Data-driven game balance
//!
//! The difficulty ramp interpolates speed, trail width, obstacle spacing and
//! curve strength between a start and an end bound. Defaults reproduce the
//! classic endless run; a JSON override can replace any subset of fields.

use serde::{Deserialize, Serialize};

use crate::consts::SIM_DT;
use crate::lerp;

/// Tunable gameplay parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Distance over which the endless ramp goes from 0 to 1
    pub ramp_distance: f32,

    /// Top speed at the start / end of the ramp
    pub start_max_speed: f32,
    pub end_max_speed: f32,
    /// Trail half-width (lane units) at the start / end of the ramp
    pub start_half_width: f32,
    pub end_half_width: f32,
    /// Mean distance between obstacles at the start / end of the ramp
    pub start_obstacle_spacing: f32,
    pub end_obstacle_spacing: f32,
    /// Curve target amplitude at ramp 0, and extra amplitude gained at ramp 1
    pub base_curve_amplitude: f32,
    pub extra_curve_amplitude: f32,

    /// Forward acceleration (units/s²)
    pub acceleration: f32,
    /// Lateral turn rate (lane units/s)
    pub turn_rate: f32,
    /// Fraction of speed lost per second while turning
    pub turn_drag: f32,
    /// How strongly trail curvature pushes the skier sideways
    pub centrifugal: f32,
    /// How quickly curvature eases toward its target
    pub curve_follow: f32,
    /// Curve target hold time: min + random * range (seconds)
    pub curve_hold_min: f32,
    pub curve_hold_range: f32,

    /// Points for passing through a gate
    pub gate_bonus: u64,
    /// Speed added when passing through a gate
    pub gate_speed_boost: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ramp_distance: 15000.0,

            start_max_speed: 28.0,
            end_max_speed: 70.0,
            start_half_width: 1.0,
            end_half_width: 0.55,
            start_obstacle_spacing: 18.0,
            end_obstacle_spacing: 8.0,
            base_curve_amplitude: 1.5,
            extra_curve_amplitude: 2.5,

            acceleration: 12.0,
            turn_rate: 1.8,
            turn_drag: 0.15,
            centrifugal: 0.012,
            curve_follow: 1.2,
            curve_hold_min: 1.5,
            curve_hold_range: 3.0,

            gate_bonus: 200,
            gate_speed_boost: 3.0,
        }
    }
}

/// Tuning load/validation error
#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    /// JSON could not be parsed
    Parse(String),
    /// A field holds an unusable value
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl std::fmt::Display for TuningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TuningError::Parse(msg) => write!(f, "Tuning parse error: {}", msg),
            TuningError::Invalid { field, reason } => {
                write!(f, "Invalid tuning field `{}`: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for TuningError {}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e.to_string())
    }
}

/// Difficulty values at one point of the ramp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Difficulty {
    /// Ramp position in [0, 1]
    pub t: f32,
    pub max_speed: f32,
    pub half_width: f32,
    pub obstacle_spacing: f32,
    pub curve_amplitude: f32,
}

/// Piste rating shown on the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifficultyTier {
    Green,
    Blue,
    Black,
    DoubleBlack,
}

impl DifficultyTier {
    pub fn from_t(t: f32) -> Self {
        let pct = (t.clamp(0.0, 1.0) * 100.0).floor() as u32;
        match pct {
            0..20 => DifficultyTier::Green,
            20..45 => DifficultyTier::Blue,
            45..70 => DifficultyTier::Black,
            _ => DifficultyTier::DoubleBlack,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DifficultyTier::Green => "GREEN",
            DifficultyTier::Blue => "BLUE",
            DifficultyTier::Black => "BLACK",
            DifficultyTier::DoubleBlack => "DOUBLE BLACK",
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would stall or break the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, v: f32) -> Result<(), TuningError> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be a positive number",
                })
            }
        }
        fn non_negative(field: &'static str, v: f32) -> Result<(), TuningError> {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be a non-negative number",
                })
            }
        }

        positive("ramp_distance", self.ramp_distance)?;
        positive("start_max_speed", self.start_max_speed)?;
        positive("end_max_speed", self.end_max_speed)?;
        positive("start_half_width", self.start_half_width)?;
        positive("end_half_width", self.end_half_width)?;
        positive("start_obstacle_spacing", self.start_obstacle_spacing)?;
        positive("end_obstacle_spacing", self.end_obstacle_spacing)?;
        positive("acceleration", self.acceleration)?;
        positive("turn_rate", self.turn_rate)?;
        positive("curve_hold_min", self.curve_hold_min)?;
        non_negative("curve_follow", self.curve_follow)?;
        non_negative("centrifugal", self.centrifugal)?;
        non_negative("extra_curve_amplitude", self.extra_curve_amplitude)?;
        non_negative("gate_speed_boost", self.gate_speed_boost)?;

        // Easing past the target in one step makes curvature oscillate and grow
        if self.curve_follow * SIM_DT >= 1.0 {
            return Err(TuningError::Invalid {
                field: "curve_follow",
                reason: "must be below one per simulation step",
            });
        }

        if !(0.0..1.0).contains(&self.turn_drag) {
            return Err(TuningError::Invalid {
                field: "turn_drag",
                reason: "must be in [0, 1)",
            });
        }
        if self.curve_hold_range < 0.0 || self.base_curve_amplitude < 0.0 {
            return Err(TuningError::Invalid {
                field: "curve",
                reason: "curve amplitude and hold range must not be negative",
            });
        }
        Ok(())
    }

    /// Endless ramp position for a distance travelled
    pub fn endless_t(&self, distance: f32) -> f32 {
        (distance / self.ramp_distance).clamp(0.0, 1.0)
    }

    /// Difficulty at ramp position `t` (clamped to [0, 1])
    pub fn at(&self, t: f32) -> Difficulty {
        let t = t.clamp(0.0, 1.0);
        Difficulty {
            t,
            max_speed: lerp(self.start_max_speed, self.end_max_speed, t),
            half_width: lerp(self.start_half_width, self.end_half_width, t),
            obstacle_spacing: lerp(self.start_obstacle_spacing, self.end_obstacle_spacing, t),
            curve_amplitude: self.base_curve_amplitude + self.extra_curve_amplitude * t,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_ramp_endpoints() {
        let tuning = Tuning::default();
        let start = tuning.at(0.0);
        assert_eq!(start.max_speed, 28.0);
        assert_eq!(start.half_width, 1.0);
        assert_eq!(start.obstacle_spacing, 18.0);

        let end = tuning.at(tuning.endless_t(1.0e6));
        assert_eq!(end.t, 1.0);
        assert!((end.max_speed - 70.0).abs() < 1e-4);
        assert!((end.half_width - 0.55).abs() < 1e-4);
        assert!((end.obstacle_spacing - 8.0).abs() < 1e-4);
        assert!((end.curve_amplitude - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_partial_json_override() {
        let tuning = Tuning::from_json(r#"{ "end_max_speed": 90.0 }"#).unwrap();
        assert_eq!(tuning.end_max_speed, 90.0);
        assert_eq!(tuning.start_max_speed, 28.0);
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
        assert_eq!(
            Tuning::from_json(r#"{ "ramp_distance": 0.0 }"#),
            Err(TuningError::Invalid {
                field: "ramp_distance",
                reason: "must be a positive number",
            })
        );
        assert!(Tuning::from_json(r#"{ "turn_drag": 1.5 }"#).is_err());
    }

    #[test]
    fn test_unstable_curve_fields_rejected() {
        for json in [
            r#"{ "curve_follow": -1.0 }"#,
            r#"{ "curve_follow": 500.0 }"#,
            r#"{ "centrifugal": -0.1 }"#,
            r#"{ "extra_curve_amplitude": -2.0 }"#,
            r#"{ "gate_speed_boost": -3.0 }"#,
        ] {
            assert!(
                matches!(Tuning::from_json(json), Err(TuningError::Invalid { .. })),
                "accepted {}",
                json
            );
        }
        assert!(Tuning::from_json(r#"{ "curve_follow": 0.0, "centrifugal": 0.0 }"#).is_ok());
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(DifficultyTier::from_t(0.0), DifficultyTier::Green);
        assert_eq!(DifficultyTier::from_t(0.199), DifficultyTier::Green);
        assert_eq!(DifficultyTier::from_t(0.2), DifficultyTier::Blue);
        assert_eq!(DifficultyTier::from_t(0.5), DifficultyTier::Black);
        assert_eq!(DifficultyTier::from_t(0.7), DifficultyTier::DoubleBlack);
        assert_eq!(DifficultyTier::from_t(1.0).label(), "DOUBLE BLACK");
    }

    proptest! {
        #[test]
        fn prop_ramp_is_monotonic(a in 0.0f32..30000.0, b in 0.0f32..30000.0) {
            let tuning = Tuning::default();
            let (near, far) = if a <= b { (a, b) } else { (b, a) };
            let d_near = tuning.at(tuning.endless_t(near));
            let d_far = tuning.at(tuning.endless_t(far));

            prop_assert!(d_far.max_speed >= d_near.max_speed);
            prop_assert!(d_far.half_width <= d_near.half_width);
            prop_assert!(d_far.obstacle_spacing <= d_near.obstacle_spacing);
            prop_assert!(d_far.max_speed <= tuning.end_max_speed + 1e-3);
            prop_assert!(d_far.half_width >= tuning.end_half_width - 1e-4);
        }
    }
}
