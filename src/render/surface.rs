use crate::error::ShowResult;
use crate::math::{CubicBezier, Vec2};

/// How new pixels combine with what is already drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    Normal,
    /// Additive, for glows
    Lighter,
}

impl BlendMode {
    pub fn as_css(&self) -> &'static str {
        match self {
            BlendMode::Normal => "source-over",
            BlendMode::Lighter => "lighter",
        }
    }
}

/// A gradient color stop: offset in [0, 1] and a CSS color
pub type ColorStop<'a> = (f32, &'a str);

/// `rgba(...)` CSS string for an 8-bit color with alpha
pub fn rgba(r: u8, g: u8, b: u8, a: f32) -> String {
    format!("rgba({}, {}, {}, {:.3})", r, g, b, a.clamp(0.0, 1.0))
}

/// Where and how to place one portrait tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePlacement {
    pub center: Vec2,
    /// Side of the square tile
    pub size: f32,
    pub rotation: f32,
    pub alpha: f32,
}

impl TilePlacement {
    /// Corner rounding for tiles of this size
    pub fn corner_radius(&self) -> f32 {
        self.size * 0.18
    }
}

/// Immediate-mode 2D drawing target.
///
/// Implemented by the browser canvas and by test recorders, so everything
/// above it can run without a browser.
pub trait DrawSurface {
    /// Host image handle (decoded photo or tile)
    type Image: Clone;

    fn width(&self) -> f32;
    fn height(&self) -> f32;

    fn save(&mut self);
    fn restore(&mut self);
    fn set_alpha(&mut self, alpha: f32);
    fn set_blend(&mut self, mode: BlendMode) -> ShowResult<()>;

    /// Fill a rectangle with a linear gradient running from `from` to `to`
    fn fill_linear_gradient(
        &mut self,
        origin: Vec2,
        size: Vec2,
        from: Vec2,
        to: Vec2,
        stops: &[ColorStop],
    ) -> ShowResult<()>;

    /// Fill a disc with a radial gradient fading outward from the center
    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, stops: &[ColorStop]) -> ShowResult<()>;

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, color: &str) -> ShowResult<()>;

    fn stroke_cubic(&mut self, curve: &CubicBezier, width: f32, color: &str);

    /// Draw a rotated, rounded, softly shadowed tile. With no image a flat
    /// rounded square in `placeholder` is drawn instead.
    fn draw_tile(
        &mut self,
        image: Option<&Self::Image>,
        placement: &TilePlacement,
        placeholder: &str,
    ) -> ShowResult<()>;

    /// Cover-fit `image` into a `side`×`side` square and read back RGBA8 pixels
    fn rasterize_cover(&mut self, image: &Self::Image, side: u32) -> ShowResult<Vec<u8>>;
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;
    use crate::error::ShowError;

    /// One recorded draw call
    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawOp {
        Save,
        Restore,
        Alpha(f32),
        Blend(BlendMode),
        LinearGradient { origin: Vec2, size: Vec2 },
        RadialGradient { center: Vec2, radius: f32 },
        Ellipse { center: Vec2, radii: Vec2 },
        Cubic { curve: CubicBezier, width: f32 },
        Tile { image: Option<u32>, placement: TilePlacement },
    }

    /// Surface that records calls instead of drawing. Images are plain ids.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingSurface {
        pub width: f32,
        pub height: f32,
        pub ops: Vec<DrawOp>,
        /// Pixels handed out by `rasterize_cover`; `None` simulates a failure
        pub pixels: Option<[u8; 4]>,
        pub rasterized: usize,
    }

    impl RecordingSurface {
        pub fn new(width: f32, height: f32) -> Self {
            Self {
                width,
                height,
                pixels: Some([255, 255, 255, 255]),
                ..Default::default()
            }
        }

        pub fn clear_ops(&mut self) {
            self.ops.clear();
        }

        pub fn count(&self, pred: impl Fn(&DrawOp) -> bool) -> usize {
            self.ops.iter().filter(|op| pred(op)).count()
        }

        pub fn tiles(&self) -> Vec<(Option<u32>, TilePlacement)> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Tile { image, placement } => Some((*image, *placement)),
                    _ => None,
                })
                .collect()
        }
    }

    impl DrawSurface for RecordingSurface {
        type Image = u32;

        fn width(&self) -> f32 {
            self.width
        }

        fn height(&self) -> f32 {
            self.height
        }

        fn save(&mut self) {
            self.ops.push(DrawOp::Save);
        }

        fn restore(&mut self) {
            self.ops.push(DrawOp::Restore);
        }

        fn set_alpha(&mut self, alpha: f32) {
            self.ops.push(DrawOp::Alpha(alpha));
        }

        fn set_blend(&mut self, mode: BlendMode) -> ShowResult<()> {
            self.ops.push(DrawOp::Blend(mode));
            Ok(())
        }

        fn fill_linear_gradient(
            &mut self,
            origin: Vec2,
            size: Vec2,
            _from: Vec2,
            _to: Vec2,
            _stops: &[ColorStop],
        ) -> ShowResult<()> {
            self.ops.push(DrawOp::LinearGradient { origin, size });
            Ok(())
        }

        fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, _stops: &[ColorStop]) -> ShowResult<()> {
            self.ops.push(DrawOp::RadialGradient { center, radius });
            Ok(())
        }

        fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, _color: &str) -> ShowResult<()> {
            self.ops.push(DrawOp::Ellipse { center, radii });
            Ok(())
        }

        fn stroke_cubic(&mut self, curve: &CubicBezier, width: f32, _color: &str) {
            self.ops.push(DrawOp::Cubic { curve: *curve, width });
        }

        fn draw_tile(
            &mut self,
            image: Option<&u32>,
            placement: &TilePlacement,
            _placeholder: &str,
        ) -> ShowResult<()> {
            self.ops.push(DrawOp::Tile {
                image: image.copied(),
                placement: *placement,
            });
            Ok(())
        }

        fn rasterize_cover(&mut self, _image: &u32, side: u32) -> ShowResult<Vec<u8>> {
            self.rasterized += 1;
            match self.pixels {
                Some(rgba) => Ok(rgba
                    .iter()
                    .copied()
                    .cycle()
                    .take(side as usize * side as usize * 4)
                    .collect()),
                None => Err(ShowError::Raster("canvas is tainted".to_string())),
            }
        }
    }
}
