//! Animation timing for the tree scene and the portrait fade
//!
//! Handles the eased growth reveal of the tree and the easing curves
//! shared by the painter and the particle field.

mod easing;
mod revealer;

pub use easing::{Easing, approach, ease};
pub use revealer::{
    GrowthRevealer, MAX_GROWTH_DURATION, MIN_GROWTH_DURATION, growth_duration_for_width,
    reveal_count,
};

/// Tolerance used when comparing accumulated time against a duration
pub const TIME_EPSILON: f32 = 1e-4;
