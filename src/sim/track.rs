//! Scrolling trail segments and curve steering

use std::collections::VecDeque;

use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::{CURVE_SHIFT, NUM_SEGMENTS, SEG_LENGTH};
use crate::tuning::Tuning;

/// One slice of trail
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// World depth where the segment starts
    pub z: f32,
    /// Curvature baked in when the segment was laid down
    pub curve: f32,
}

/// Fixed-length window of segments around the skier
#[derive(Debug, Clone)]
pub struct Track {
    segments: VecDeque<Segment>,
}

impl Default for Track {
    fn default() -> Self {
        Self::new()
    }
}

impl Track {
    /// Straight track starting at z = 0
    pub fn new() -> Self {
        let mut track = Self {
            segments: VecDeque::with_capacity(NUM_SEGMENTS),
        };
        track.reset();
        track
    }

    pub fn reset(&mut self) {
        self.segments.clear();
        for i in 0..NUM_SEGMENTS {
            self.segments.push_back(Segment {
                z: i as f32 * SEG_LENGTH,
                curve: 0.0,
            });
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Drop segments behind the skier and lay new ones ahead with `curvature`
    pub fn recycle(&mut self, distance: f32, curvature: f32) {
        while self
            .segments
            .front()
            .is_some_and(|s| s.z < distance - SEG_LENGTH)
        {
            self.segments.pop_front();
        }
        while self.segments.len() < NUM_SEGMENTS {
            let z = self
                .segments
                .back()
                .map(|s| s.z + SEG_LENGTH)
                .unwrap_or(distance);
            self.segments.push_back(Segment { z, curve: curvature });
        }
    }

    /// Curvature of the segment under the skier
    pub fn curve_at(&self, distance: f32) -> f32 {
        self.segments
            .iter()
            .find(|s| distance < s.z + SEG_LENGTH)
            .map(|s| s.curve)
            .unwrap_or(0.0)
    }

    /// Lateral sway of the trail centreline at `world_z`, relative to the
    /// centreline under the skier at `distance`.
    ///
    /// Curvature accumulates into a slope which accumulates into an offset,
    /// so bends bow away quadratically with depth.
    pub fn centerline_offset(&self, distance: f32, world_z: f32) -> f32 {
        let mut offset = 0.0;
        let mut slope = 0.0;
        let mut z = distance;

        for seg in &self.segments {
            if z >= world_z {
                break;
            }
            let seg_end = seg.z + SEG_LENGTH;
            if seg_end <= z {
                continue;
            }
            let span_end = seg_end.min(world_z);
            let frac = (span_end - z) / SEG_LENGTH;
            slope += seg.curve * CURVE_SHIFT * frac;
            offset += slope * frac;
            z = span_end;
        }

        offset
    }
}

/// Curvature that wanders toward randomly chosen targets
#[derive(Debug, Clone, Default)]
pub struct CurveSteer {
    pub curvature: f32,
    pub target: f32,
    /// Seconds until a new target is picked
    pub timer: f32,
}

impl CurveSteer {
    pub fn update(&mut self, dt: f32, amplitude: f32, tuning: &Tuning, rng: &mut Pcg32) {
        self.timer -= dt;
        if self.timer <= 0.0 {
            self.target = (rng.random::<f32>() - 0.5) * amplitude;
            self.timer = tuning.curve_hold_min + rng.random::<f32>() * tuning.curve_hold_range;
        }
        self.curvature += (self.target - self.curvature) * dt * tuning.curve_follow;
    }
}
