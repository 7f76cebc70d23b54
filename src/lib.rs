use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, HtmlImageElement};

pub mod animation;
pub mod assets;
pub mod config;
pub mod error;
pub mod growth;
pub mod math;
pub mod particles;
pub mod render;
pub mod sampling;
pub mod scene;
pub mod show;

pub use config::ShowConfig;
pub use error::{ShowError, ShowResult};
pub use show::{Show, Viewport};

use assets::AssetLoader;
use render::canvas::{CanvasSurface, context_2d};

/// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // Already set when the module is initialized twice; keep the first logger
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Random seed from the host (Math.random carries 53 bits)
fn host_seed() -> u64 {
    (js_sys::Math::random() * (1u64 << 53) as f64) as u64
}

/// The presentation, exposed to JavaScript
#[wasm_bindgen]
pub struct PortraitShow {
    show: Show<HtmlImageElement>,
    surface: CanvasSurface,
    canvas: HtmlCanvasElement,
    loading_started: bool,
}

#[wasm_bindgen]
impl PortraitShow {
    /// Create a show on a canvas, optionally configured from a YAML string
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, config_yaml: Option<String>) -> Result<PortraitShow, JsValue> {
        let config = match config_yaml.as_deref() {
            Some(yaml) => ShowConfig::from_yaml(yaml)?,
            None => ShowConfig::default(),
        };

        let ctx = context_2d(&canvas)?;
        let viewport = Viewport::new(canvas.width() as f32, canvas.height() as f32);
        let structural_seed = config.seed.unwrap_or_else(host_seed);

        let show = Show::new(config, viewport, structural_seed, host_seed());
        let surface = CanvasSurface::new(ctx, viewport.width, viewport.height);

        Ok(Self {
            show,
            surface,
            canvas,
            loading_started: false,
        })
    }

    /// Begin loading the face photograph and the tiles. Only the first call has an effect.
    #[wasm_bindgen]
    pub fn start_loading(&mut self) -> Result<(), JsValue> {
        if self.loading_started {
            return Ok(());
        }
        AssetLoader::new(self.show.asset_sender()).dispatch_all(&self.show.config().assets)?;
        self.loading_started = true;
        Ok(())
    }

    /// Update and render a frame
    #[wasm_bindgen]
    pub fn render(&mut self, dt: f32) {
        self.show.frame(dt, &mut self.surface);
    }

    /// Resize the canvas
    #[wasm_bindgen]
    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);

        let viewport = Viewport::new(width as f32, height as f32);
        self.surface.resize(viewport.width, viewport.height);
        self.show.resize(viewport);
    }

    /// Start over from the seed
    #[wasm_bindgen]
    pub fn restart(&mut self) {
        self.show.restart();
    }

    #[wasm_bindgen]
    pub fn scene_name(&self) -> String {
        self.show.scene().name().to_string()
    }

    /// Seconds spent in the current scene
    #[wasm_bindgen]
    pub fn scene_elapsed(&self) -> f32 {
        self.show.scene_elapsed()
    }

    #[wasm_bindgen]
    pub fn particle_count(&self) -> usize {
        self.show.field().count()
    }

    #[wasm_bindgen]
    pub fn segment_count(&self) -> usize {
        self.show.segments().len()
    }

    #[wasm_bindgen]
    pub fn revealed_count(&self) -> usize {
        self.show.revealed_count()
    }

    #[wasm_bindgen]
    pub fn tiles_ready(&self) -> usize {
        self.show.assets().tiles_ready()
    }

    /// Every portrait target has its particle
    #[wasm_bindgen]
    pub fn is_portrait_ready(&self) -> bool {
        self.show.is_portrait_ready()
    }
}
