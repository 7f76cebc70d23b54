//! Frame painter
//!
//! Turns the simulation state of one tick into draw calls on a
//! [`DrawSurface`]. Layers, back to front:
//! 1. Sky gradient and a faint ground shadow
//! 2. Seed glow (seed scene only)
//! 3. Tree, swaying, with the newest branch fading in
//! 4. Portrait tiles, faded in over the first seconds of the portrait scene

use crate::animation::{Easing, ease};
use crate::config::Palette;
use crate::error::ShowResult;
use crate::growth::BranchSegment;
use crate::math::Vec2;
use crate::particles::Particle;
use crate::scene::Scene;
use super::surface::{BlendMode, DrawSurface, TilePlacement};

/// Sideways sway of the tree, in pixels before depth scaling
pub const SWAY_AMPLITUDE: f32 = 1.2;
/// Tree opacity once the portrait has fully faded in
pub const PORTRAIT_TREE_ALPHA: f32 = 0.35;
/// Particles fainter than this are not drawn
const MIN_VISIBLE_ALPHA: f32 = 0.001;

/// Everything the painter reads for one frame
pub struct FrameView<'a, H> {
    pub scene: Scene,
    /// Seconds in the current scene
    pub scene_elapsed: f32,
    /// Monotonic time driving sway and float
    pub time: f32,
    pub seed_duration: f32,
    pub portrait_fade: f32,
    /// Where the seed sits and the trunk starts
    pub root: Vec2,
    pub segments: &'a [BranchSegment],
    pub revealed: usize,
    /// Partial growth of `segments[revealed]`
    pub frontier: f32,
    pub particles: &'a [Particle<H>],
}

impl<H> FrameView<'_, H> {
    /// Eased portrait fade in [0, 1]; zero outside the portrait scene
    pub fn portrait_fade_factor(&self) -> f32 {
        match self.scene {
            Scene::Portrait => ease(self.scene_elapsed / self.portrait_fade, Easing::EaseOutCubic),
            _ => 0.0,
        }
    }
}

/// Draws frames with a fixed palette
#[derive(Debug, Clone)]
pub struct Painter {
    palette: Palette,
}

impl Painter {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    /// Paint one full frame
    pub fn paint<S: DrawSurface>(&self, surface: &mut S, frame: &FrameView<'_, S::Image>) -> ShowResult<()> {
        self.draw_background(surface, frame.root)?;

        match frame.scene {
            Scene::Seed => self.draw_seed(surface, frame),
            Scene::Tree | Scene::Pause => self.draw_tree(surface, frame, 1.0),
            Scene::Portrait => {
                let fade = frame.portrait_fade_factor();
                let tree_alpha = 1.0 - (1.0 - PORTRAIT_TREE_ALPHA) * fade;
                self.draw_tree(surface, frame, tree_alpha)?;
                self.draw_particles(surface, frame, fade)
            }
        }
    }

    fn draw_background<S: DrawSurface>(&self, surface: &mut S, root: Vec2) -> ShowResult<()> {
        let (w, h) = (surface.width(), surface.height());
        surface.set_alpha(1.0);
        surface.fill_linear_gradient(
            Vec2::ZERO,
            Vec2::new(w, h),
            Vec2::ZERO,
            Vec2::new(0.0, h),
            &[(0.0, self.palette.sky_top.as_str()), (1.0, self.palette.sky_bottom.as_str())],
        )?;

        // Ground shadow under the root
        surface.save();
        surface.set_alpha(0.25);
        let result = surface.fill_ellipse(root, Vec2::new(w * 0.18, h * 0.02), "#000000");
        surface.restore();
        result
    }

    fn draw_seed<S: DrawSurface>(&self, surface: &mut S, frame: &FrameView<'_, S::Image>) -> ShowResult<()> {
        let swell = ease(frame.scene_elapsed / frame.seed_duration, Easing::EaseInOut);
        let pulse = (frame.time * 3.0).sin() * 1.5;
        let radius = 6.0 + swell * 18.0 + pulse;

        surface.save();
        let result = self.seed_layers(surface, frame.root, radius.max(1.0), swell);
        surface.restore();
        result
    }

    fn seed_layers<S: DrawSurface>(&self, surface: &mut S, root: Vec2, radius: f32, swell: f32) -> ShowResult<()> {
        surface.set_blend(BlendMode::Lighter)?;
        surface.set_alpha(0.35 + swell * 0.5);
        surface.fill_radial_gradient(
            root,
            radius * 2.5,
            &[(0.0, self.palette.glow.as_str()), (1.0, "rgba(0, 0, 0, 0)")],
        )?;
        surface.set_blend(BlendMode::Normal)?;
        surface.set_alpha(1.0);
        surface.fill_ellipse(root, Vec2::new(5.0, 3.5), &self.palette.bark)
    }

    fn draw_tree<S: DrawSurface>(
        &self,
        surface: &mut S,
        frame: &FrameView<'_, S::Image>,
        alpha: f32,
    ) -> ShowResult<()> {
        let revealed = frame.revealed.min(frame.segments.len());
        let bark = &self.palette.bark;

        surface.save();
        surface.set_alpha(alpha);
        for segment in &frame.segments[..revealed] {
            let curve = segment.swayed(frame.time, SWAY_AMPLITUDE);
            surface.stroke_cubic(&curve, segment.thickness, bark);
        }

        if let Some(segment) = frame.segments.get(revealed) {
            if frame.frontier > 0.0 {
                let curve = segment.swayed(frame.time, SWAY_AMPLITUDE).split_front(frame.frontier);
                surface.set_alpha(alpha * (0.4 + 0.6 * frame.frontier));
                surface.stroke_cubic(&curve, segment.thickness, bark);
            }
        }
        surface.restore();
        Ok(())
    }

    fn draw_particles<S: DrawSurface>(
        &self,
        surface: &mut S,
        frame: &FrameView<'_, S::Image>,
        fade: f32,
    ) -> ShowResult<()> {
        for particle in frame.particles {
            let alpha = fade * particle.alpha;
            if alpha < MIN_VISIBLE_ALPHA {
                continue;
            }

            let placement = TilePlacement {
                center: particle.position + Vec2::new(0.0, particle.float_offset(frame.time)),
                size: particle.size,
                rotation: particle.rotation,
                alpha,
            };
            surface.draw_tile(particle.tile.as_ref(), &placement, &self.palette.placeholder)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::{TreeGenerator, TreeLayout, TreeParams};
    use crate::particles::{FieldLayout, ParticleField};
    use crate::render::surface::recording::{DrawOp, RecordingSurface};
    use crate::sampling::TargetPoint;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn segments() -> Vec<BranchSegment> {
        let mut rng = SmallRng::seed_from_u64(11);
        TreeGenerator::new(TreeParams::default()).generate(&TreeLayout::for_viewport(800.0, 600.0), 0.0, &mut rng)
    }

    fn frame<'a>(
        scene: Scene,
        elapsed: f32,
        segments: &'a [BranchSegment],
        revealed: usize,
        frontier: f32,
        particles: &'a [Particle<u32>],
    ) -> FrameView<'a, u32> {
        FrameView {
            scene,
            scene_elapsed: elapsed,
            time: 3.0,
            seed_duration: 2.4,
            portrait_fade: 2.2,
            root: Vec2::new(400.0, 564.0),
            segments,
            revealed,
            frontier,
            particles,
        }
    }

    fn is_cubic(op: &DrawOp) -> bool {
        matches!(op, DrawOp::Cubic { .. })
    }

    fn settled_particles(tiles: &[u32]) -> Vec<Particle<u32>> {
        let points: Vec<TargetPoint> = (0..40)
            .map(|i| TargetPoint { x: i as f32 * 4.0, y: 10.0, luminance: 0.8 })
            .collect();
        let mut field = ParticleField::new();
        let mut rng = SmallRng::seed_from_u64(12);
        let layout = FieldLayout::for_viewport(800.0, 600.0, 300);
        for _ in 0..200 {
            field.update(0.04, &points, &layout, tiles, &mut rng);
        }
        field.particles().to_vec()
    }

    #[test]
    fn test_seed_scene_draws_glow_only() {
        let segs = segments();
        let mut surface = RecordingSurface::new(800.0, 600.0);
        Painter::new(Palette::default())
            .paint(&mut surface, &frame(Scene::Seed, 1.0, &segs, 0, 0.0, &[]))
            .unwrap();

        assert_eq!(surface.count(|op| matches!(op, DrawOp::LinearGradient { .. })), 1);
        assert_eq!(surface.count(|op| matches!(op, DrawOp::RadialGradient { .. })), 1);
        assert_eq!(surface.count(is_cubic), 0);
        assert!(surface.tiles().is_empty());
    }

    #[test]
    fn test_background_covers_viewport() {
        let mut surface = RecordingSurface::new(640.0, 480.0);
        Painter::new(Palette::default())
            .paint(&mut surface, &frame(Scene::Pause, 0.0, &[], 0, 0.0, &[]))
            .unwrap();
        assert_eq!(
            surface.ops[1],
            DrawOp::LinearGradient { origin: Vec2::ZERO, size: Vec2::new(640.0, 480.0) }
        );
    }

    #[test]
    fn test_tree_draws_revealed_plus_frontier() {
        let segs = segments();
        let mut surface = RecordingSurface::new(800.0, 600.0);
        let painter = Painter::new(Palette::default());

        painter
            .paint(&mut surface, &frame(Scene::Tree, 1.0, &segs, 10, 0.5, &[]))
            .unwrap();
        assert_eq!(surface.count(is_cubic), 11);

        // The frontier curve stops short of the full segment
        let partial = surface
            .ops
            .iter()
            .rev()
            .find_map(|op| match op {
                DrawOp::Cubic { curve, .. } => Some(*curve),
                _ => None,
            })
            .unwrap();
        let full = segs[10].swayed(3.0, SWAY_AMPLITUDE);
        assert_eq!(partial.start, full.start);
        assert!(partial.end.distance(&full.end) > 0.01);

        surface.clear_ops();
        painter
            .paint(&mut surface, &frame(Scene::Tree, 1.0, &segs, 10, 0.0, &[]))
            .unwrap();
        assert_eq!(surface.count(is_cubic), 10);
    }

    #[test]
    fn test_save_restore_balanced() {
        let segs = segments();
        let particles = settled_particles(&[]);
        let mut surface = RecordingSurface::new(800.0, 600.0);
        let painter = Painter::new(Palette::default());
        for scene in [Scene::Seed, Scene::Tree, Scene::Pause, Scene::Portrait] {
            painter
                .paint(&mut surface, &frame(scene, 1.0, &segs, segs.len(), 0.0, &particles))
                .unwrap();
        }
        assert_eq!(
            surface.count(|op| *op == DrawOp::Save),
            surface.count(|op| *op == DrawOp::Restore)
        );
    }

    #[test]
    fn test_portrait_fades_in() {
        let particles = settled_particles(&[7]);
        let painter = Painter::new(Palette::default());

        let mut surface = RecordingSurface::new(800.0, 600.0);
        painter
            .paint(&mut surface, &frame(Scene::Portrait, 0.0, &[], 0, 0.0, &particles))
            .unwrap();
        assert!(surface.tiles().is_empty());

        surface.clear_ops();
        painter
            .paint(&mut surface, &frame(Scene::Portrait, 1.1, &[], 0, 0.0, &particles))
            .unwrap();
        let half = surface.tiles();
        assert_eq!(half.len(), particles.len());

        surface.clear_ops();
        painter
            .paint(&mut surface, &frame(Scene::Portrait, 5.0, &[], 0, 0.0, &particles))
            .unwrap();
        let full = surface.tiles();

        for ((_, a), ((_, b), p)) in half.iter().zip(full.iter().zip(&particles)) {
            assert!(a.alpha < b.alpha);
            assert!((b.alpha - p.alpha).abs() < 0.0001);
        }
    }

    #[test]
    fn test_portrait_tiles_and_placeholders() {
        let painter = Painter::new(Palette::default());

        let with_tiles = settled_particles(&[3]);
        let mut surface = RecordingSurface::new(800.0, 600.0);
        painter
            .paint(&mut surface, &frame(Scene::Portrait, 3.0, &[], 0, 0.0, &with_tiles))
            .unwrap();
        assert!(surface.tiles().iter().all(|(image, _)| *image == Some(3)));

        let without = settled_particles(&[]);
        surface.clear_ops();
        painter
            .paint(&mut surface, &frame(Scene::Portrait, 3.0, &[], 0, 0.0, &without))
            .unwrap();
        assert!(surface.tiles().iter().all(|(image, _)| image.is_none()));
    }

    #[test]
    fn test_float_applied_at_draw_time() {
        let particles = settled_particles(&[1]);
        let mut surface = RecordingSurface::new(800.0, 600.0);
        Painter::new(Palette::default())
            .paint(&mut surface, &frame(Scene::Portrait, 3.0, &[], 0, 0.0, &particles))
            .unwrap();

        for ((_, placement), particle) in surface.tiles().iter().zip(&particles) {
            assert_eq!(placement.center.x, particle.position.x);
            assert!((placement.center.y - particle.position.y).abs() <= 1.4 + 0.0001);
        }
    }

    #[test]
    fn test_tree_dims_under_portrait() {
        let segs = segments();
        let mut surface = RecordingSurface::new(800.0, 600.0);
        Painter::new(Palette::default())
            .paint(&mut surface, &frame(Scene::Portrait, 10.0, &segs, segs.len(), 0.0, &[]))
            .unwrap();
        assert!(surface
            .ops
            .iter()
            .any(|op| matches!(op, DrawOp::Alpha(a) if (*a - PORTRAIT_TREE_ALPHA).abs() < 0.0001)));
    }
}
