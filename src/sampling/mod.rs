//! Photograph to particle-target conversion
//!
//! The face photograph is cover-fitted into a square, read back as RGBA8,
//! and walked on a grid. Brighter pixels are more likely to become targets.

pub mod cover;
pub mod sampler;

pub use cover::{CoverCrop, cover_crop};
pub use sampler::{
    FALLBACK_POINTS, ImageSampler, MIN_POINTS, TargetPoint, grid_step, keep_probability,
    luminance, sample_side_for_width,
};
