//! The show context
//!
//! [`Show`] owns every piece of state for one presentation: the scene
//! sequencer, the tree and its revealer, the portrait sampler and particle
//! field, the asset registry, and both random sources. A host drives it with
//! one [`Show::frame`] call per animation frame.
//!
//! Tick order is fixed: clamp dt, drain finished asset loads, build the
//! portrait targets once the face is available, advance the sequencer, then
//! update whichever scene is active.

use std::f32::consts::TAU;
use std::sync::mpsc::Sender;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::animation::GrowthRevealer;
use crate::assets::{AssetEvent, AssetRegistry};
use crate::config::ShowConfig;
use crate::error::ShowResult;
use crate::growth::{BranchSegment, TreeGenerator, TreeLayout, TreeParams};
use crate::particles::{FieldLayout, ParticleField};
use crate::render::{DrawSurface, FrameView, Painter};
use crate::sampling::{ImageSampler, sample_side_for_width};
use crate::scene::{Scene, SceneSequencer};

/// Steps longer than this many `max_dt` are logged as frame gaps
const SPIKE_FACTOR: f32 = 4.0;

/// Clamp a host time step to `[0, max_dt]`. Negative and non-finite steps count as zero.
pub fn clamp_dt(dt: f32, max_dt: f32) -> f32 {
    if !dt.is_finite() || dt < 0.0 {
        log::debug!("ignoring time step {}", dt);
        return 0.0;
    }
    if dt > max_dt * SPIKE_FACTOR {
        log::warn!("frame gap of {:.3}s clamped to {:.3}s", dt, max_dt);
    }
    dt.min(max_dt)
}

/// Logical size of the drawing area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }
}

/// One running presentation, generic over the host's image handle
pub struct Show<H> {
    config: ShowConfig,
    viewport: Viewport,
    sequencer: SceneSequencer,
    generator: TreeGenerator,
    tree_layout: TreeLayout,
    segments: Vec<BranchSegment>,
    revealer: GrowthRevealer,
    sampler: ImageSampler,
    field: ParticleField<H>,
    assets: AssetRegistry<H>,
    painter: Painter,
    /// Tree shape and portrait sampling; reproducible from the seed
    structural: SmallRng,
    /// Sway phase, particle jitter and tile choice
    cosmetic: SmallRng,
}

impl<H: Clone> Show<H> {
    pub fn new(config: ShowConfig, viewport: Viewport, structural_seed: u64, cosmetic_seed: u64) -> Self {
        log::info!(
            "show starting at {}x{} (structural seed {})",
            viewport.width,
            viewport.height,
            structural_seed
        );

        let mut show = Self {
            sequencer: SceneSequencer::new(&config.timing),
            generator: TreeGenerator::new(TreeParams::default()),
            tree_layout: TreeLayout::for_viewport(viewport.width, viewport.height),
            segments: Vec::new(),
            revealer: GrowthRevealer::default(),
            sampler: ImageSampler::new(),
            field: ParticleField::new(),
            assets: AssetRegistry::new(config.assets.tile_count),
            painter: Painter::new(config.palette.clone()),
            structural: SmallRng::seed_from_u64(structural_seed),
            cosmetic: SmallRng::seed_from_u64(cosmetic_seed),
            viewport,
            config,
        };
        show.regrow();
        show
    }

    /// Channel end for image loaders
    pub fn asset_sender(&self) -> Sender<AssetEvent<H>> {
        self.assets.sender()
    }

    /// Advance one tick and draw it. Drawing failures are logged, never fatal.
    pub fn frame<S: DrawSurface<Image = H>>(&mut self, dt: f32, surface: &mut S) {
        self.tick(dt, surface);
        if let Err(err) = self.draw(surface) {
            log::warn!("frame skipped: {}", err);
        }
    }

    /// Advance the simulation. `surface` is only used to read back the face
    /// photograph when the portrait targets are built.
    pub fn tick<S: DrawSurface<Image = H>>(&mut self, dt: f32, surface: &mut S) {
        let dt = clamp_dt(dt, self.config.timing.max_dt);

        self.assets.drain();
        self.build_targets(surface);

        let grown = self.revealer.is_grown();
        match self.sequencer.advance(dt, grown) {
            Some(scene) => self.enter(scene),
            None => self.update_scene(dt),
        }
    }

    pub fn draw<S: DrawSurface<Image = H>>(&self, surface: &mut S) -> ShowResult<()> {
        let state = self.sequencer.state();
        let frame = FrameView {
            scene: state.scene,
            scene_elapsed: state.elapsed,
            time: self.sequencer.global_time(),
            seed_duration: self.config.timing.seed_duration,
            portrait_fade: self.config.timing.portrait_fade,
            root: self.tree_layout.root,
            segments: &self.segments,
            revealed: self.revealer.revealed(),
            frontier: self.revealer.frontier(),
            particles: self.field.particles(),
        };
        self.painter.paint(surface, &frame)
    }

    /// Back to the seed with a freshly grown tree. Loaded images and the
    /// portrait targets are kept.
    pub fn restart(&mut self) {
        log::info!("restart from {}", self.sequencer.scene().name());
        self.sequencer.reset();
        self.field.clear();
        self.regrow();
    }

    /// Adopt a new viewport. The tree is regrown for the new size at the
    /// same growth stage; portrait particles keep their targets' new positions.
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        log::debug!("resize to {}x{}", viewport.width, viewport.height);

        let elapsed = self.revealer.elapsed;
        self.viewport = viewport;
        self.regrow();

        match self.sequencer.scene() {
            Scene::Seed => {}
            Scene::Tree => self.revealer.elapsed = elapsed.min(self.revealer.duration),
            Scene::Pause | Scene::Portrait => self.revealer.elapsed = self.revealer.duration,
        }

        let layout = self.field_layout();
        self.field.retarget(self.sampler.points(), &layout);
    }

    fn regrow(&mut self) {
        self.tree_layout = TreeLayout::for_viewport(self.viewport.width, self.viewport.height);
        let root_phase = self.cosmetic.random_range(0.0..TAU);
        self.segments = self
            .generator
            .generate(&self.tree_layout, root_phase, &mut self.structural);
        self.revealer = GrowthRevealer::for_viewport(self.viewport.width, self.segments.len());
        log::debug!(
            "tree grown: {} segments over {:.2}s",
            self.segments.len(),
            self.revealer.duration
        );
    }

    fn build_targets<S: DrawSurface<Image = H>>(&mut self, surface: &mut S) {
        if self.sampler.is_built() {
            return;
        }
        let side = sample_side_for_width(self.viewport.width);

        if let Some(face) = self.assets.face() {
            match surface.rasterize_cover(face, side) {
                Ok(pixels) => {
                    self.sampler.build(&pixels, side, &mut self.structural);
                }
                Err(err) => {
                    log::warn!("face could not be sampled ({}), using a synthetic portrait", err);
                    self.sampler.build_synthetic(side, &mut self.structural);
                }
            }
        } else if self.assets.face_failed() {
            self.sampler.build_synthetic(side, &mut self.structural);
        }
    }

    fn enter(&mut self, scene: Scene) {
        match scene {
            Scene::Seed => {}
            Scene::Tree => self.revealer.reset(self.segments.len()),
            Scene::Pause => {}
            Scene::Portrait => self.field.clear(),
        }
    }

    fn update_scene(&mut self, dt: f32) {
        match self.sequencer.scene() {
            Scene::Tree => self.revealer.update(dt),
            Scene::Portrait => {
                let layout = self.field_layout();
                self.field.update(
                    dt,
                    self.sampler.points(),
                    &layout,
                    self.assets.tiles(),
                    &mut self.cosmetic,
                );
            }
            Scene::Seed | Scene::Pause => {}
        }
    }

    fn field_layout(&self) -> FieldLayout {
        FieldLayout::for_viewport(self.viewport.width, self.viewport.height, self.sampler.side())
    }

    pub fn config(&self) -> &ShowConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scene(&self) -> Scene {
        self.sequencer.scene()
    }

    pub fn scene_elapsed(&self) -> f32 {
        self.sequencer.elapsed()
    }

    pub fn global_time(&self) -> f32 {
        self.sequencer.global_time()
    }

    pub fn segments(&self) -> &[BranchSegment] {
        &self.segments
    }

    pub fn revealer(&self) -> &GrowthRevealer {
        &self.revealer
    }

    pub fn revealed_count(&self) -> usize {
        self.revealer.revealed()
    }

    pub fn sampler(&self) -> &ImageSampler {
        &self.sampler
    }

    pub fn field(&self) -> &ParticleField<H> {
        &self.field
    }

    pub fn assets(&self) -> &AssetRegistry<H> {
        &self.assets
    }

    pub fn is_portrait_ready(&self) -> bool {
        self.field.ready()
    }
}
