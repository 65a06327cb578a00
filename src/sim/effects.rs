//! Snow spray, crash bursts and ambient snowfall
//!
//! Purely cosmetic: everything here draws from the effects RNG and lives in
//! screen space.

use glam::Vec2;
use rand::Rng;

use super::state::{GameState, Particle, Snowflake};

/// Gravity on particles, pixels per (1/60 s)²
const PARTICLE_GRAVITY: f32 = 4.0;
/// Effects are authored in pixels per 60 Hz frame
const FRAME_RATE: f32 = 60.0;

impl GameState {
    /// Scatter `count` snowflakes over the viewport
    pub fn init_snowflakes(&mut self, count: usize) {
        let (w, h) = (self.viewport.width, self.viewport.height);
        let rng = &mut self.fx_rng;
        self.snowflakes = (0..count)
            .map(|_| Snowflake {
                pos: Vec2::new(rng.random::<f32>() * w, rng.random::<f32>() * h),
                vel: Vec2::new(
                    rng.random::<f32>() * 0.4 - 0.2,
                    rng.random::<f32>() * 1.2 + 0.4,
                ),
                radius: rng.random::<f32>() * 2.5 + 0.5,
                opacity: rng.random::<f32>() * 0.5 + 0.2,
            })
            .collect();
    }

    /// Drift snowflakes, pushed sideways by the trail's bend, and wrap them
    pub fn update_snowflakes(&mut self, dt: f32, drift: f32) {
        let (w, h) = (self.viewport.width, self.viewport.height);
        for flake in &mut self.snowflakes {
            flake.pos.x += (flake.vel.x + drift) * dt * FRAME_RATE;
            flake.pos.y += flake.vel.y * dt * FRAME_RATE;
            if flake.pos.y > h {
                flake.pos.y = -2.0;
                flake.pos.x = self.fx_rng.random::<f32>() * w;
            }
            if flake.pos.x < 0.0 {
                flake.pos.x = w;
            }
            if flake.pos.x > w {
                flake.pos.x = 0.0;
            }
        }
    }

    fn push_particle(&mut self, particle: Particle) {
        if self.particles.len() < self.max_particles {
            self.particles.push(particle);
        }
    }

    /// Snow kicked up by the skis while carving; `dir` is the spray direction
    pub fn spawn_spray(&mut self, origin: Vec2, dir: f32) {
        for _ in 0..2 {
            let rng = &mut self.fx_rng;
            let max_life = 0.3 + rng.random::<f32>() * 0.2;
            let particle = Particle {
                pos: origin,
                vel: Vec2::new(
                    (rng.random::<f32>() - 0.5) * 2.0 + dir * 2.0,
                    -(rng.random::<f32>() * 2.0 + 1.0),
                ),
                life: max_life,
                max_life,
                size: rng.random::<f32>() * 2.5 + 1.0,
            };
            self.push_particle(particle);
        }
    }

    /// Radial burst of snow at the crash site
    pub fn spawn_crash(&mut self, origin: Vec2, count: usize) {
        for _ in 0..count {
            let rng = &mut self.fx_rng;
            let angle = rng.random::<f32>() * std::f32::consts::TAU;
            let speed = rng.random::<f32>() * 6.0 + 2.0;
            let max_life = 0.6 + rng.random::<f32>() * 0.5;
            let particle = Particle {
                pos: origin,
                vel: Vec2::new(angle.cos() * speed, angle.sin() * speed - 3.0),
                life: max_life,
                max_life,
                size: rng.random::<f32>() * 3.5 + 1.0,
            };
            self.push_particle(particle);
        }
    }

    /// Integrate particles with gravity and drop expired ones
    pub fn update_particles(&mut self, dt: f32) {
        for particle in self.particles.iter_mut() {
            particle.pos += particle.vel * dt * FRAME_RATE;
            particle.vel.y += PARTICLE_GRAVITY * dt * FRAME_RATE;
            particle.life -= dt;
        }
        self.particles.retain(|p| p.life > 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;
    use crate::tuning::Tuning;

    fn state() -> GameState {
        GameState::new(3, Viewport::new(300.0, 600.0), Tuning::default())
    }

    #[test]
    fn test_snowflakes_stay_on_screen() {
        let mut state = state();
        for _ in 0..600 {
            state.update_snowflakes(1.0 / 60.0, 3.0);
        }
        for flake in &state.snowflakes {
            assert!(flake.pos.x >= 0.0 && flake.pos.x <= 300.0);
            assert!(flake.pos.y >= -2.0 && flake.pos.y <= 600.0 + 2.0);
        }
    }

    #[test]
    fn test_particles_expire() {
        let mut state = state();
        state.spawn_crash(Vec2::new(150.0, 500.0), 35);
        assert_eq!(state.particles.len(), 35);
        for _ in 0..120 {
            state.update_particles(1.0 / 60.0);
        }
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_particle_budget() {
        let mut state = state();
        state.max_particles = 10;
        state.spawn_crash(Vec2::ZERO, 35);
        state.spawn_spray(Vec2::ZERO, 1.0);
        assert_eq!(state.particles.len(), 10);
    }

    #[test]
    fn test_spray_leans_with_direction() {
        let mut state = state();
        for _ in 0..50 {
            state.spawn_spray(Vec2::ZERO, 1.0);
        }
        let mean_vx: f32 =
            state.particles.iter().map(|p| p.vel.x).sum::<f32>() / state.particles.len() as f32;
        assert!(mean_vx > 1.0);
        assert!(state.particles.iter().all(|p| p.vel.y < 0.0));
    }
}
