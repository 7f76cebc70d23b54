pub mod sequencer;

pub use sequencer::{Scene, SceneSequencer, SceneState};
