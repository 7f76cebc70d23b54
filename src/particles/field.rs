//! Portrait particle field
//!
//! Hundreds of small photo tiles rise from the tree and settle onto the
//! sampled portrait points. Particles are spawned in bounded batches per
//! tick and each one eases toward its own target on a damped spring.

use std::f32::consts::TAU;
use rand::seq::IndexedRandom;
use rand::Rng;
use crate::animation::approach;
use crate::math::Vec2;
use crate::sampling::TargetPoint;

/// Spring pull toward the target, per tick
pub const SPRING: f32 = 0.085;
/// Velocity retained each tick
pub const DAMPING: f32 = 0.88;
/// Fraction of the remaining alpha gap closed each tick
pub const ALPHA_RATE: f32 = 0.06;
/// Particles spawned per tick on normal and narrow viewports
pub const BATCH_WIDE: usize = 120;
pub const BATCH_NARROW: usize = 70;
/// Viewports narrower than this use the smaller batch
pub const NARROW_WIDTH: f32 = 560.0;
/// Longest start delay, in seconds
pub const MAX_DELAY: f32 = 1.2;

/// Opacity a particle settles at for a target of the given luminance
pub fn target_alpha(luminance: f32) -> f32 {
    (0.55 + luminance * 0.55).clamp(0.35, 0.95)
}

/// Placement of the portrait and the spawn point in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldLayout {
    /// World position of the portrait's local (0, 0)
    pub origin: Vec2,
    /// Center of the spawn area, just above the tree crown
    pub spawn: Vec2,
    /// Particle size before the per-particle random factor
    pub base_size: f32,
    /// Maximum particles spawned per tick
    pub batch: usize,
}

impl FieldLayout {
    /// Portrait centered horizontally, top edge at 22% of the height
    pub fn for_viewport(width: f32, height: f32, side: u32) -> Self {
        let side = side as f32;
        Self {
            origin: Vec2::new((width - side) * 0.5, height * 0.22),
            spawn: Vec2::new(width * 0.5, height * 0.72),
            base_size: (side / 34.0).clamp(7.0, 14.0),
            batch: if width < NARROW_WIDTH { BATCH_NARROW } else { BATCH_WIDE },
        }
    }

    pub fn to_world(&self, point: &TargetPoint) -> Vec2 {
        self.origin + Vec2::new(point.x, point.y)
    }
}

/// A single portrait sprite
#[derive(Debug, Clone)]
pub struct Particle<H> {
    pub target: Vec2,
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: f32,
    pub rotation: f32,
    /// Angular velocity in radians per tick
    pub spin: f32,
    pub alpha: f32,
    pub target_alpha: f32,
    /// Photo tile drawn for this particle, assigned once one is loaded
    pub tile: Option<H>,
    /// Seconds to wait before moving
    pub delay: f32,
    /// Seconds since spawn
    pub age: f32,
    float_phase: f32,
}

impl<H> Particle<H> {
    pub fn is_moving(&self) -> bool {
        self.age >= self.delay
    }

    /// One tick of spring motion, spin and alpha easing
    fn step(&mut self) {
        self.velocity += (self.target - self.position).scale(SPRING);
        self.velocity = self.velocity.scale(DAMPING);
        self.position += self.velocity;
        self.rotation = (self.rotation + self.spin) % TAU;
        self.alpha = approach(self.alpha, self.target_alpha, ALPHA_RATE);
    }

    /// Small vertical bob added at draw time; does not feed the spring
    pub fn float_offset(&self, time: f32) -> f32 {
        if !self.is_moving() {
            return 0.0;
        }
        (time * 1.6 + self.float_phase).sin() * 1.4
    }
}

/// Owns every portrait particle for one portrait cycle
#[derive(Debug, Clone)]
pub struct ParticleField<H> {
    particles: Vec<Particle<H>>,
    target_count: usize,
    time: f32,
}

impl<H> Default for ParticleField<H> {
    fn default() -> Self {
        Self {
            particles: Vec::new(),
            target_count: 0,
            time: 0.0,
        }
    }
}

impl<H: Clone> ParticleField<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every particle (scene reset)
    pub fn clear(&mut self) {
        self.particles.clear();
        self.target_count = 0;
        self.time = 0.0;
    }

    pub fn particles(&self) -> &[Particle<H>] {
        &self.particles
    }

    pub fn count(&self) -> usize {
        self.particles.len()
    }

    /// Seconds of portrait motion simulated so far
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Every target point has a particle
    pub fn ready(&self) -> bool {
        self.target_count > 0 && self.particles.len() >= self.target_count
    }

    /// Advance one tick: spawn the next batch, assign tiles, move particles
    pub fn update<R: Rng>(
        &mut self,
        dt: f32,
        targets: &[TargetPoint],
        layout: &FieldLayout,
        tiles: &[H],
        rng: &mut R,
    ) {
        let dt = dt.max(0.0);
        self.time += dt;
        self.target_count = targets.len();

        self.spawn_batch(targets, layout, rng);

        for particle in &mut self.particles {
            if particle.tile.is_none() {
                particle.tile = tiles.choose(rng).cloned();
            }

            particle.age += dt;
            if particle.is_moving() {
                particle.step();
            }
        }
    }

    /// Move every particle's target after the layout changed (viewport resize).
    /// Particle `i` always belongs to `targets[i]`.
    pub fn retarget(&mut self, targets: &[TargetPoint], layout: &FieldLayout) {
        for (particle, point) in self.particles.iter_mut().zip(targets) {
            particle.target = layout.to_world(point);
        }
    }

    fn spawn_batch<R: Rng>(&mut self, targets: &[TargetPoint], layout: &FieldLayout, rng: &mut R) {
        let start = self.particles.len();
        let end = (start + layout.batch).min(targets.len());
        if start >= end {
            return;
        }

        for point in &targets[start..end] {
            let jitter = Vec2::new(rng.random_range(-18.0..=18.0), rng.random_range(-10.0..=10.0));

            self.particles.push(Particle {
                target: layout.to_world(point),
                position: layout.spawn + jitter,
                velocity: Vec2::ZERO,
                size: layout.base_size * rng.random_range(0.70..=1.25),
                rotation: rng.random_range(0.0..TAU),
                spin: rng.random_range(-0.012..=0.012),
                alpha: 0.0,
                target_alpha: target_alpha(point.luminance),
                tile: None,
                delay: rng.random_range(0.0..=MAX_DELAY),
                age: 0.0,
                float_phase: rng.random_range(0.0..TAU),
            });
        }

        if end == targets.len() {
            log::debug!("portrait fully spawned: {} particles", end);
        }
    }
}
