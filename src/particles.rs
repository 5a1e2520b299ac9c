//! Short-lived burst particles.
//!
//! Particles are spawned in bursts at a fingertip, drift with damped
//! velocity, fade out over a fixed number of frames and are dropped when
//! their life runs out.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::ParticleConfig;
use crate::geom::{remap, Point};

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Point,
    pub vel: Point,
    /// Remaining frames.
    pub life: i32,
    /// Disc diameter in pixels.
    pub size: f32,
    pub color: Color,
}

impl Particle {
    /// Advance one frame. Returns false once the particle has expired.
    pub fn step(&mut self, damping: f32) -> bool {
        self.pos.x += self.vel.x;
        self.pos.y += self.vel.y;
        self.life -= 1;
        self.vel.x *= damping;
        self.vel.y *= damping;
        self.life > 0
    }
}

pub struct ParticleSystem {
    particles: Vec<Particle>,
    config: ParticleConfig,
    rng: StdRng,
}

impl ParticleSystem {
    pub fn new(config: ParticleConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            particles: Vec::new(),
            config,
            rng,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Spawn the configured number of particles at `origin`.
    pub fn burst(&mut self, origin: Point, color: Color) {
        self.spawn_burst(origin, color, self.config.burst_count);
    }

    pub fn spawn_burst(&mut self, origin: Point, color: Color, count: usize) {
        let speed = self.config.max_speed.abs();
        let (size_lo, size_hi) = self.config.size_range;
        let (size_lo, size_hi) = (size_lo.min(size_hi), size_lo.max(size_hi));

        self.particles.reserve(count);
        for _ in 0..count {
            let vel = Point::new(
                self.rng.random_range(-speed..=speed),
                self.rng.random_range(-speed..=speed),
            );
            let size = self.rng.random_range(size_lo..=size_hi);
            self.particles.push(Particle {
                pos: origin,
                vel,
                life: self.config.life,
                size,
                color,
            });
        }
        log::debug!(
            "burst of {count} at ({:.0}, {:.0}), {} live",
            origin.x,
            origin.y,
            self.particles.len()
        );

        let cap = self.config.max_particles;
        if self.particles.len() > cap {
            let excess = self.particles.len() - cap;
            self.particles.drain(..excess);
            log::trace!("particle cap {cap} reached, dropped {excess} oldest");
        }
    }

    /// Advance, draw and cull every particle; call once per frame.
    pub fn tick(&mut self, canvas: &mut dyn Canvas) {
        let ParticleConfig {
            damping,
            life,
            max_alpha,
            ..
        } = self.config;
        let full_life = life.max(1) as f32;
        self.particles.retain_mut(|p| {
            let alive = p.step(damping);
            let alpha = remap(p.life as f32, 0.0, full_life, 0.0, max_alpha)
                .round()
                .clamp(0.0, 255.0) as u8;
            canvas.fill_circle(p.pos, p.size, p.color.with_alpha(alpha));
            alive
        });
    }
}

impl std::fmt::Debug for ParticleSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticleSystem")
            .field("particles", &self.particles.len())
            .field("config", &self.config)
            .finish()
    }
}
