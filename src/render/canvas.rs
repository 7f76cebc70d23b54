use std::f64::consts::TAU;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::error::{ShowError, ShowResult};
use crate::math::{CubicBezier, Vec2};
use crate::sampling::cover_crop;
use super::surface::{BlendMode, ColorStop, DrawSurface, TilePlacement};

fn surface_error(err: JsValue) -> ShowError {
    ShowError::Surface(format!("{:?}", err))
}

fn raster_error(err: JsValue) -> ShowError {
    ShowError::Raster(format!("{:?}", err))
}

/// Look up the 2D context of a canvas element
pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or("Failed to get 2D context")?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(JsValue::from)
}

/// [`DrawSurface`] backed by a browser canvas
pub struct CanvasSurface {
    pub ctx: CanvasRenderingContext2d,
    width: f32,
    height: f32,
    /// Offscreen canvas for pixel readback, created on first use
    scratch: Option<(HtmlCanvasElement, CanvasRenderingContext2d)>,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d, width: f32, height: f32) -> Self {
        Self {
            ctx,
            width,
            height,
            scratch: None,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    fn scratch(&mut self) -> ShowResult<&(HtmlCanvasElement, CanvasRenderingContext2d)> {
        if self.scratch.is_none() {
            let document = web_sys::window()
                .and_then(|w| w.document())
                .ok_or_else(|| ShowError::Raster("no document for offscreen canvas".to_string()))?;
            let canvas = document
                .create_element("canvas")
                .map_err(raster_error)?
                .dyn_into::<HtmlCanvasElement>()
                .map_err(|_| ShowError::Raster("created element is not a canvas".to_string()))?;
            let ctx = context_2d(&canvas).map_err(raster_error)?;
            self.scratch = Some((canvas, ctx));
        }
        self.scratch
            .as_ref()
            .ok_or_else(|| ShowError::Raster("offscreen canvas unavailable".to_string()))
    }

    /// Trace a rounded square centered on the origin
    fn rounded_square_path(&self, size: f64, radius: f64) -> ShowResult<()> {
        let ctx = &self.ctx;
        let h = size * 0.5;
        let r = radius.min(h);

        ctx.begin_path();
        ctx.move_to(-h + r, -h);
        ctx.arc_to(h, -h, h, h, r).map_err(surface_error)?;
        ctx.arc_to(h, h, -h, h, r).map_err(surface_error)?;
        ctx.arc_to(-h, h, -h, -h, r).map_err(surface_error)?;
        ctx.arc_to(-h, -h, h, -h, r).map_err(surface_error)?;
        ctx.close_path();
        Ok(())
    }

    fn tile_layers(
        &self,
        image: Option<&HtmlImageElement>,
        placement: &TilePlacement,
        placeholder: &str,
    ) -> ShowResult<()> {
        let ctx = &self.ctx;
        let size = placement.size as f64;

        ctx.translate(placement.center.x as f64, placement.center.y as f64)
            .map_err(surface_error)?;
        ctx.rotate(placement.rotation as f64).map_err(surface_error)?;
        ctx.set_global_alpha(placement.alpha as f64);

        // The backing square casts the shadow; the clipped photo sits on top
        ctx.set_shadow_blur(size * 0.35);
        ctx.set_shadow_offset_y(size * 0.08);
        ctx.set_shadow_color("rgba(0, 0, 0, 0.35)");
        self.rounded_square_path(size, placement.corner_radius() as f64)?;
        ctx.set_fill_style_str(placeholder);
        ctx.fill();

        if let Some(image) = image {
            ctx.set_shadow_blur(0.0);
            ctx.set_shadow_color("rgba(0, 0, 0, 0)");
            ctx.clip();

            let side = image.natural_width().min(image.natural_height()) as f32;
            match cover_crop(image.natural_width() as f32, image.natural_height() as f32, side, side) {
                Some(crop) => ctx
                    .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                        image,
                        crop.sx as f64,
                        crop.sy as f64,
                        crop.sw as f64,
                        crop.sh as f64,
                        -size * 0.5,
                        -size * 0.5,
                        size,
                        size,
                    )
                    .map_err(surface_error)?,
                None => log::debug!("tile image has no size, keeping placeholder"),
            }
        }
        Ok(())
    }
}

impl DrawSurface for CanvasSurface {
    type Image = HtmlImageElement;

    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
    }

    fn set_blend(&mut self, mode: BlendMode) -> ShowResult<()> {
        self.ctx
            .set_global_composite_operation(mode.as_css())
            .map_err(surface_error)
    }

    fn fill_linear_gradient(
        &mut self,
        origin: Vec2,
        size: Vec2,
        from: Vec2,
        to: Vec2,
        stops: &[ColorStop],
    ) -> ShowResult<()> {
        let gradient = self
            .ctx
            .create_linear_gradient(from.x as f64, from.y as f64, to.x as f64, to.y as f64);
        for (offset, color) in stops {
            gradient.add_color_stop(*offset, color).map_err(surface_error)?;
        }
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx
            .fill_rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
        Ok(())
    }

    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, stops: &[ColorStop]) -> ShowResult<()> {
        let (x, y, r) = (center.x as f64, center.y as f64, radius.max(0.0) as f64);
        let gradient = self
            .ctx
            .create_radial_gradient(x, y, 0.0, x, y, r)
            .map_err(surface_error)?;
        for (offset, color) in stops {
            gradient.add_color_stop(*offset, color).map_err(surface_error)?;
        }
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.begin_path();
        self.ctx.arc(x, y, r, 0.0, TAU).map_err(surface_error)?;
        self.ctx.fill();
        Ok(())
    }

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, color: &str) -> ShowResult<()> {
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        self.ctx
            .ellipse(
                center.x as f64,
                center.y as f64,
                radii.x.max(0.0) as f64,
                radii.y.max(0.0) as f64,
                0.0,
                0.0,
                TAU,
            )
            .map_err(surface_error)?;
        self.ctx.fill();
        Ok(())
    }

    fn stroke_cubic(&mut self, curve: &CubicBezier, width: f32, color: &str) {
        let ctx = &self.ctx;
        ctx.set_stroke_style_str(color);
        ctx.set_line_width(width.max(0.5) as f64);
        ctx.set_line_cap("round");
        ctx.begin_path();
        ctx.move_to(curve.start.x as f64, curve.start.y as f64);
        ctx.bezier_curve_to(
            curve.c1.x as f64,
            curve.c1.y as f64,
            curve.c2.x as f64,
            curve.c2.y as f64,
            curve.end.x as f64,
            curve.end.y as f64,
        );
        ctx.stroke();
    }

    fn draw_tile(
        &mut self,
        image: Option<&HtmlImageElement>,
        placement: &TilePlacement,
        placeholder: &str,
    ) -> ShowResult<()> {
        self.ctx.save();
        let result = self.tile_layers(image, placement, placeholder);
        self.ctx.restore();
        result
    }

    fn rasterize_cover(&mut self, image: &HtmlImageElement, side: u32) -> ShowResult<Vec<u8>> {
        let crop = cover_crop(
            image.natural_width() as f32,
            image.natural_height() as f32,
            side as f32,
            side as f32,
        )
        .ok_or_else(|| ShowError::Raster("image has no size".to_string()))?;

        let (canvas, ctx) = self.scratch()?;
        canvas.set_width(side);
        canvas.set_height(side);
        ctx.clear_rect(0.0, 0.0, side as f64, side as f64);
        ctx.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
            image,
            crop.sx as f64,
            crop.sy as f64,
            crop.sw as f64,
            crop.sh as f64,
            0.0,
            0.0,
            side as f64,
            side as f64,
        )
        .map_err(raster_error)?;

        // Fails on a cross-origin (tainted) canvas
        let data = ctx
            .get_image_data(0.0, 0.0, side as f64, side as f64)
            .map_err(raster_error)?;
        Ok(data.data().0)
    }
}
