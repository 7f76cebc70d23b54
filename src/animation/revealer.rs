//! Tree growth reveal
//!
//! Maps time spent in the tree scene to how many segments are drawn:
//! - duration scales with viewport width (narrow screens grow faster)
//! - an S-curve so growth starts slow, speeds up, and settles
//! - segments are revealed in the generator's trunk-first order

use super::easing::{Easing, ease};
use super::TIME_EPSILON;

/// Shortest and longest growth duration, in seconds
pub const MIN_GROWTH_DURATION: f32 = 4.8;
pub const MAX_GROWTH_DURATION: f32 = 7.2;

/// Growth duration for a viewport of the given width
pub fn growth_duration_for_width(width: f32) -> f32 {
    (MIN_GROWTH_DURATION + width.max(0.0) * 0.0016).clamp(MIN_GROWTH_DURATION, MAX_GROWTH_DURATION)
}

/// Number of segments visible at an eased progress value
pub fn reveal_count(progress: f32, total: usize) -> usize {
    ((progress.clamp(0.0, 1.0) * total as f32).floor() as usize).min(total)
}

/// Growth state for one tree
#[derive(Debug, Clone)]
pub struct GrowthRevealer {
    /// Seconds from first segment to fully grown
    pub duration: f32,
    /// Seconds elapsed in the current growth cycle
    pub elapsed: f32,
    /// Total number of segments to reveal
    pub total: usize,
    pub easing: Easing,
}

impl Default for GrowthRevealer {
    fn default() -> Self {
        Self {
            duration: MIN_GROWTH_DURATION,
            elapsed: 0.0,
            total: 0,
            easing: Easing::SmoothStep,
        }
    }
}

impl GrowthRevealer {
    pub fn new(duration: f32, total: usize) -> Self {
        Self {
            duration: duration.max(TIME_EPSILON),
            total,
            ..Default::default()
        }
    }

    /// Revealer whose duration follows the viewport width
    pub fn for_viewport(width: f32, total: usize) -> Self {
        Self::new(growth_duration_for_width(width), total)
    }

    /// Restart the growth cycle, optionally with a new segment count
    pub fn reset(&mut self, total: usize) {
        self.elapsed = 0.0;
        self.total = total;
    }

    pub fn update(&mut self, dt: f32) {
        if dt > 0.0 {
            self.elapsed += dt;
        }
    }

    /// Linear time ratio in [0, 1]
    pub fn ratio(&self) -> f32 {
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Eased progress in [0, 1]
    pub fn progress(&self) -> f32 {
        ease(self.ratio(), self.easing)
    }

    /// How many segments are drawn right now
    pub fn revealed(&self) -> usize {
        reveal_count(self.progress(), self.total)
    }

    /// Partial growth (0..1) of the first segment not yet fully revealed
    pub fn frontier(&self) -> f32 {
        if self.revealed() >= self.total {
            return 0.0;
        }
        let exact = self.progress() * self.total as f32;
        (exact - exact.floor()).clamp(0.0, 1.0)
    }

    /// Terminal state: the time ratio has reached 1
    pub fn is_grown(&self) -> bool {
        self.elapsed + TIME_EPSILON >= self.duration
    }
}
