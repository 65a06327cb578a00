//! Pseudo-3D camera
//!
//! The camera sits `CAMERA_HEIGHT` above the skier, looking down the slope.
//! Depth maps to screen rows below the horizon; lateral trail positions
//! scale with `1 / depth`. Road strips invert the row mapping so the trail
//! edges and the obstacles standing on them go through the same camera.

use crate::consts::{CAMERA_HEIGHT, DRAW_DIST, HORIZON, NEAR_PLANE};
use crate::sim::state::{GameState, Viewport};
use crate::sim::track::Track;

/// Vertical spread of depth below the horizon, as a fraction of height
const ROW_SPREAD: f32 = 0.3;

/// A point after projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub x: f32,
    pub y: f32,
    /// Width of one lane unit in pixels at this depth
    pub lane_px: f32,
    pub scale: f32,
}

/// Camera for one frame
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub viewport: Viewport,
    /// Skier's trail-relative lateral position
    pub skier_x: f32,
    /// Skier's world depth
    pub distance: f32,
    focal: f32,
}

impl Camera {
    pub fn new(viewport: Viewport, skier_x: f32, distance: f32) -> Self {
        Self {
            viewport,
            skier_x,
            distance,
            focal: crate::camera_depth(),
        }
    }

    pub fn from_state(state: &GameState) -> Self {
        Self::new(state.viewport, state.skier.x, state.distance)
    }

    /// Screen row for a depth ahead of the camera
    pub fn row_for_depth(&self, rel_z: f32) -> f32 {
        let h = self.viewport.height;
        let scale = self.focal / rel_z;
        h * HORIZON + CAMERA_HEIGHT * scale * h * ROW_SPREAD
    }

    /// Depth seen at a screen row, `None` at or above the horizon
    pub fn depth_for_row(&self, y: f32) -> Option<f32> {
        let h = self.viewport.height;
        let below = y - h * HORIZON;
        if below <= 0.0 {
            return None;
        }
        let scale = below / (CAMERA_HEIGHT * h * ROW_SPREAD);
        Some(self.focal / scale)
    }

    /// Project a lateral position (already including centreline sway) at a
    /// world depth; `None` when behind the near plane
    pub fn project(&self, lateral: f32, world_z: f32) -> Option<Projected> {
        let rel_z = world_z - self.distance;
        if rel_z <= NEAR_PLANE {
            return None;
        }
        let (w, h) = (self.viewport.width, self.viewport.height);
        let scale = self.focal / rel_z;
        let lane_px = scale * w * 0.5;
        Some(Projected {
            x: w / 2.0 + (lateral - self.skier_x) * lane_px,
            y: h * HORIZON + CAMERA_HEIGHT * scale * h * ROW_SPREAD,
            lane_px,
            scale,
        })
    }

    /// Project a trail-relative lane position, following the trail's sway
    pub fn project_on_track(&self, track: &Track, lane: f32, world_z: f32) -> Option<Projected> {
        let sway = track.centerline_offset(self.distance, world_z);
        self.project(lane + sway, world_z)
    }
}

/// One horizontal band of slope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadStrip {
    pub y_top: f32,
    pub y_bottom: f32,
    /// World depth at the strip's top edge
    pub world_z: f32,
    /// Trail centre and half-width in pixels at top and bottom edges
    pub center_top: f32,
    pub center_bottom: f32,
    pub half_top: f32,
    pub half_bottom: f32,
}

/// Slice the slope between the draw distance and the bottom of the screen
/// into `count` strips, far to near
pub fn road_strips(camera: &Camera, track: &Track, half_width: f32, count: usize) -> Vec<RoadStrip> {
    let count = count.max(1);
    let h = camera.viewport.height;
    let y_far = camera.row_for_depth(DRAW_DIST);
    let step = (h - y_far) / count as f32;

    let edge = |y: f32| -> Option<(f32, f32, f32)> {
        let rel_z = camera.depth_for_row(y)?;
        let world_z = camera.distance + rel_z;
        let p = camera.project_on_track(track, 0.0, world_z)?;
        Some((world_z, p.x, half_width * p.lane_px))
    };

    let mut strips = Vec::with_capacity(count);
    for i in 0..count {
        let y_top = y_far + step * i as f32;
        let y_bottom = y_top + step;
        let (Some(top), Some(bottom)) = (edge(y_top), edge(y_bottom)) else {
            continue;
        };
        strips.push(RoadStrip {
            y_top,
            // Overlap a hair so rounding never leaves gaps
            y_bottom: y_bottom + 0.5,
            world_z: top.0,
            center_top: top.1,
            center_bottom: bottom.1,
            half_top: top.2,
            half_bottom: bottom.2,
        });
    }
    strips
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SEG_LENGTH;

    fn camera() -> Camera {
        Camera::new(Viewport::new(400.0, 800.0), 0.0, 100.0)
    }

    #[test]
    fn test_nearer_is_lower_and_larger() {
        let cam = camera();
        let near = cam.project(0.0, 110.0).unwrap();
        let far = cam.project(0.0, 200.0).unwrap();
        assert!(near.y > far.y);
        assert!(near.lane_px > far.lane_px);
        // Everything projects below the horizon
        assert!(far.y > 800.0 * HORIZON);
    }

    #[test]
    fn test_behind_camera_is_culled() {
        let cam = camera();
        assert!(cam.project(0.0, 100.0).is_none());
        assert!(cam.project(0.0, 95.0).is_none());
        assert!(cam.project(0.0, 100.05).is_none());
        assert!(cam.project(0.0, 100.2).is_some());
    }

    #[test]
    fn test_lateral_offset_relative_to_skier() {
        let cam = Camera::new(Viewport::new(400.0, 800.0), 0.5, 100.0);
        let p = cam.project(0.5, 120.0).unwrap();
        assert!((p.x - 200.0).abs() < 1e-3);
        let right = cam.project(1.0, 120.0).unwrap();
        assert!(right.x > p.x);
    }

    #[test]
    fn test_row_depth_inverse() {
        let cam = camera();
        for rel_z in [2.5, 10.0, 60.0, 180.0] {
            let y = cam.row_for_depth(rel_z);
            let back = cam.depth_for_row(y).unwrap();
            assert!((back - rel_z).abs() / rel_z < 1e-4);
        }
        assert!(cam.depth_for_row(800.0 * HORIZON).is_none());
        assert!(cam.depth_for_row(10.0).is_none());
    }

    #[test]
    fn test_road_edges_match_obstacle_projection() {
        let cam = camera();
        let track = Track::new();
        let strips = road_strips(&cam, &track, 1.0, 120);
        assert_eq!(strips.len(), 120);

        // An obstacle on the trail edge lands on the strip edge at its depth
        let strip = strips[80];
        let p = cam.project_on_track(&track, 1.0, strip.world_z).unwrap();
        assert!((p.x - (strip.center_top + strip.half_top)).abs() < 0.01);
        assert!((p.y - strip.y_top).abs() < 0.01);
    }

    #[test]
    fn test_strips_ordered_far_to_near() {
        let cam = camera();
        let strips = road_strips(&cam, &Track::new(), 0.8, 60);
        for pair in strips.windows(2) {
            assert!(pair[0].world_z > pair[1].world_z);
            assert!(pair[0].y_top < pair[1].y_top);
            assert!(pair[0].half_top < pair[1].half_top);
        }
        // Nearest strip reaches the bottom of the screen
        assert!(strips.last().unwrap().y_bottom >= 800.0);
        assert!(strips[0].world_z - cam.distance <= DRAW_DIST + SEG_LENGTH);
    }
}
