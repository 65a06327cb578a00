//! Skier/obstacle contact detection
//!
//! Contacts are only resolved inside a thin depth window just ahead of the
//! skier; laterally they compare trail-relative positions against the
//! obstacle's hit radius.

use super::state::{Obstacle, ObstacleKind};
use crate::consts::CONTACT_DEPTH;

/// Outcome of testing one obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Not in reach, or already scored
    Clear,
    /// Skied through a gate that had not been scored yet
    GatePassed,
    /// Hit a solid obstacle
    Crash,
}

/// Whether an obstacle at `z` is inside the contact window
#[inline]
pub fn in_contact_window(z: f32, distance: f32) -> bool {
    let rel_z = z - distance;
    rel_z > 0.0 && rel_z < CONTACT_DEPTH
}

/// Test the skier at lateral `skier_x` and depth `distance` against an obstacle
pub fn check_contact(skier_x: f32, distance: f32, obstacle: &Obstacle) -> Contact {
    if !in_contact_window(obstacle.z, distance) {
        return Contact::Clear;
    }

    let dx = (skier_x - obstacle.lane).abs();
    if dx >= obstacle.hit_radius() {
        return Contact::Clear;
    }

    match obstacle.kind {
        ObstacleKind::Gate if obstacle.passed => Contact::Clear,
        ObstacleKind::Gate => Contact::GatePassed,
        _ => Contact::Crash,
    }
}
