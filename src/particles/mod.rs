pub mod field;

pub use field::{FieldLayout, Particle, ParticleField, target_alpha};
