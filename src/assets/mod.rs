pub mod loader;
pub mod registry;

pub use loader::AssetLoader;
pub use registry::{AssetEvent, AssetKind, AssetRegistry};
