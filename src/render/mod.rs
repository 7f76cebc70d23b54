pub mod canvas;
pub mod painter;
pub mod surface;

pub use canvas::CanvasSurface;
pub use painter::{FrameView, Painter};
pub use surface::{BlendMode, DrawSurface, TilePlacement};
