use std::f32::consts::FRAC_PI_2;
use rand::Rng;
use crate::math::{CubicBezier, Vec2};

/// Parameters controlling the silhouette of the generated tree
#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    /// Recursion stops at this depth (the trunk is depth 0)
    pub max_depth: u32,
    /// Maximum bend of each segment's endpoint away from its direction
    /// (radians, symmetric). Shapes the curve only; children ignore it.
    pub bend: f32,
    /// Where along the parent curve children sprout (parametric t)
    pub sprout_range: (f32, f32),
    /// Child length multiplier range
    pub length_decay: (f32, f32),
    /// Child thickness multiplier range
    pub thickness_decay: (f32, f32),
    /// Maximum angular deviation of a child from its parent's direction at
    /// the trunk (radians, symmetric); scaled down toward `max_depth`
    pub spread: f32,
    /// Below this depth every node splits in two
    pub always_split_below: u32,
    /// Chance of a second child past `always_split_below`
    pub split_probability: f64,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: 7,
            bend: 0.35,
            sprout_range: (0.45, 0.88),
            length_decay: (0.58, 0.78),
            thickness_decay: (0.62, 0.78),
            spread: 0.75,
            always_split_below: 2,
            split_probability: 0.65,
        }
    }
}

/// One curved piece of the tree. Immutable once generated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchSegment {
    pub start: Vec2,
    pub c1: Vec2,
    pub c2: Vec2,
    pub end: Vec2,
    pub thickness: f32,
    /// Recursion depth (0 = trunk)
    pub depth: u32,
    /// Phase offset for the cosmetic sway; never affects structure
    pub sway_phase: f32,
}

impl BranchSegment {
    pub fn curve(&self) -> CubicBezier {
        CubicBezier::new(self.start, self.c1, self.c2, self.end)
    }

    pub fn point_at(&self, t: f32) -> Vec2 {
        self.curve().evaluate(t)
    }

    /// Curve displaced sideways by a slow oscillation. Deeper segments sway more.
    pub fn swayed(&self, time: f32, amplitude: f32) -> CubicBezier {
        let chord = self.end - self.start;
        let side = chord.normalize().perpendicular();
        let reach = amplitude * (0.2 + self.depth as f32 * 0.35);
        let offset = side.scale((time * 0.9 + self.sway_phase).sin() * reach);

        CubicBezier::new(
            self.start,
            self.c1 + offset.scale(0.3),
            self.c2 + offset.scale(0.7),
            self.end + offset,
        )
    }
}

/// Root placement and trunk dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeLayout {
    pub root: Vec2,
    /// Initial orientation in radians (-PI/2 points straight up)
    pub angle: f32,
    pub trunk_length: f32,
    pub trunk_thickness: f32,
}

impl TreeLayout {
    /// Trunk rooted at the bottom center, scaled to the viewport
    pub fn for_viewport(width: f32, height: f32) -> Self {
        let trunk_length = (height * 0.2).min(width * 0.32).clamp(40.0, 190.0);
        let trunk_thickness = (width.min(height) * 0.022).clamp(6.0, 16.0);

        Self {
            root: Vec2::new(width * 0.5, height * 0.94),
            angle: -FRAC_PI_2,
            trunk_length,
            trunk_thickness,
        }
    }
}

/// Recursive branch generator
pub struct TreeGenerator {
    pub params: TreeParams,
}

impl TreeGenerator {
    pub fn new(params: TreeParams) -> Self {
        Self { params }
    }

    /// Generate the full segment list, sorted trunk-first and bottom-up.
    ///
    /// All structural choices are drawn from `rng`; a seeded generator
    /// reproduces the same tree.
    pub fn generate<R: Rng>(
        &self,
        layout: &TreeLayout,
        root_phase: f32,
        rng: &mut R,
    ) -> Vec<BranchSegment> {
        let mut segments = Vec::new();
        self.grow(
            layout.root,
            layout.angle,
            layout.trunk_length,
            layout.trunk_thickness,
            0,
            root_phase,
            rng,
            &mut segments,
        );
        sort_for_reveal(&mut segments);
        segments
    }

    #[allow(clippy::too_many_arguments)]
    fn grow<R: Rng>(
        &self,
        start: Vec2,
        angle: f32,
        length: f32,
        thickness: f32,
        depth: u32,
        sway_phase: f32,
        rng: &mut R,
        out: &mut Vec<BranchSegment>,
    ) {
        let params = &self.params;

        let bend = rng.random_range(-params.bend..=params.bend);
        let heading = angle + bend;

        // Leaves along `angle`, arrives along `heading`
        let end = start + Vec2::from_angle(heading).scale(length);
        let c1 = start + Vec2::from_angle(angle).scale(length * 0.35);
        let c2 = end - Vec2::from_angle(heading).scale(length * 0.35);

        let segment = BranchSegment {
            start,
            c1,
            c2,
            end,
            thickness,
            depth,
            sway_phase,
        };
        out.push(segment);

        if depth >= params.max_depth {
            return;
        }

        let children = if depth < params.always_split_below || rng.random_bool(params.split_probability) {
            2
        } else {
            1
        };

        // Narrower and straighter toward the tips
        let taper = 1.0 - 0.6 * (depth as f32 / params.max_depth as f32);
        let spread = params.spread * taper;

        for index in 0..children {
            let t = rng.random_range(params.sprout_range.0..=params.sprout_range.1);
            let origin = segment.point_at(t);
            let child_length = length * rng.random_range(params.length_decay.0..=params.length_decay.1);
            let child_thickness =
                thickness * rng.random_range(params.thickness_decay.0..=params.thickness_decay.1);
            let child_angle = angle + rng.random_range(-spread..=spread);
            let child_phase = sway_phase + (depth + 1) as f32 * 0.61 + index as f32 * 1.37;

            self.grow(
                origin,
                child_angle,
                child_length,
                child_thickness,
                depth + 1,
                child_phase,
                rng,
                out,
            );
        }
    }
}

/// Order segments by depth, then from the lowest start point upward
/// (screen space: larger y first).
pub fn sort_for_reveal(segments: &mut [BranchSegment]) {
    segments.sort_by(|a, b| {
        a.depth
            .cmp(&b.depth)
            .then_with(|| b.start.y.total_cmp(&a.start.y))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn layout() -> TreeLayout {
        TreeLayout::for_viewport(1280.0, 800.0)
    }

    fn generate(seed: u64) -> Vec<BranchSegment> {
        let mut rng = SmallRng::seed_from_u64(seed);
        TreeGenerator::new(TreeParams::default()).generate(&layout(), 0.0, &mut rng)
    }

    fn count_at(segments: &[BranchSegment], depth: u32) -> usize {
        segments.iter().filter(|s| s.depth == depth).count()
    }

    #[test]
    fn test_depth_never_exceeds_max() {
        for seed in 0..20 {
            let segments = generate(seed);
            assert!(segments.iter().all(|s| s.depth <= 7));
            assert!(count_at(&segments, 7) > 0, "every tree reaches the tips");
        }
    }

    #[test]
    fn test_branching_rules() {
        for seed in 0..20 {
            let segments = generate(seed);

            // One trunk, forced binary splits near the base
            assert_eq!(count_at(&segments, 0), 1);
            assert_eq!(count_at(&segments, 1), 2);
            assert_eq!(count_at(&segments, 2), 4);

            // Afterwards each node has one or two children
            for depth in 2..7 {
                let parents = count_at(&segments, depth);
                let children = count_at(&segments, depth + 1);
                assert!(children >= parents && children <= parents * 2);
            }
        }
    }

    #[test]
    fn test_segment_count_matches_invocations() {
        // Always splitting yields a full binary tree of depth 7
        let mut rng = SmallRng::seed_from_u64(99);
        let params = TreeParams {
            split_probability: 1.0,
            ..Default::default()
        };
        let full = TreeGenerator::new(params).generate(&layout(), 0.0, &mut rng);
        assert_eq!(full.len(), (1 << 8) - 1);

        // Never splitting past depth 2: 1 + 2 + 4 nodes on each of depths 2..=7
        let params = TreeParams {
            split_probability: 0.0,
            ..Default::default()
        };
        let sparse = TreeGenerator::new(params).generate(&layout(), 0.0, &mut rng);
        assert_eq!(sparse.len(), 1 + 2 + 4 * 6);
    }

    #[test]
    fn test_deterministic_with_seed() {
        assert_eq!(generate(123), generate(123));
        assert_ne!(generate(123), generate(124));
    }

    #[test]
    fn test_reveal_order() {
        let segments = generate(5);
        assert_eq!(segments[0].depth, 0);
        for pair in segments.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(a.depth <= b.depth);
            if a.depth == b.depth {
                assert!(a.start.y >= b.start.y);
            }
        }
    }

    #[test]
    fn test_trunk_grows_upward_from_root() {
        let segments = generate(1);
        let trunk = &segments[0];
        assert_eq!(trunk.start, layout().root);
        assert!(trunk.end.y < trunk.start.y);
    }

    #[test]
    fn test_children_shrink() {
        let segments = generate(8);
        let trunk = &segments[0];
        for s in segments.iter().filter(|s| s.depth == 1) {
            assert!(s.thickness <= trunk.thickness * 0.78 + 0.0001);
            assert!(s.thickness >= trunk.thickness * 0.62 - 0.0001);
            let len = s.start.distance(&s.end);
            assert!(len <= trunk.start.distance(&trunk.end) * 0.78 + 0.01);
        }
    }

    #[test]
    fn test_children_sprout_from_parent_curve() {
        let mut rng = SmallRng::seed_from_u64(3);
        let params = TreeParams {
            max_depth: 1,
            ..Default::default()
        };
        let segments = TreeGenerator::new(params).generate(&layout(), 0.0, &mut rng);
        assert_eq!(segments.len(), 3);

        let trunk = segments[0].curve();
        for child in &segments[1..] {
            // Some t in the sprout range must land on the child's origin
            let hit = (45..=88).any(|i| trunk.evaluate(i as f32 / 100.0).distance(&child.start) < 2.0);
            assert!(hit, "child origin should lie on the parent curve");
        }
    }

    fn direction(from: Vec2, to: Vec2) -> f32 {
        (to.y - from.y).atan2(to.x - from.x)
    }

    fn angle_between(a: f32, b: f32) -> f32 {
        let d = (a - b).rem_euclid(TAU);
        d.min(TAU - d)
    }

    #[test]
    fn test_child_angle_within_spread() {
        let params = TreeParams {
            max_depth: 1,
            ..Default::default()
        };
        for seed in 0..200 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let segments = TreeGenerator::new(params).generate(&layout(), 0.0, &mut rng);
            let trunk = direction(segments[0].start, segments[0].c1);
            for child in &segments[1..] {
                let deviation = angle_between(direction(child.start, child.c1), trunk);
                assert!(deviation <= params.spread + 1e-4, "deviation {}", deviation);
            }
        }
    }

    #[test]
    fn test_zero_spread_children_follow_parent() {
        let params = TreeParams {
            max_depth: 1,
            spread: 0.0,
            ..Default::default()
        };
        for seed in 0..200 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let segments = TreeGenerator::new(params).generate(&layout(), 0.0, &mut rng);
            let trunk = direction(segments[0].start, segments[0].c1);
            for child in &segments[1..] {
                let deviation = angle_between(direction(child.start, child.c1), trunk);
                assert!(deviation < 1e-3, "deviation {}", deviation);
            }
        }
    }

    #[test]
    fn test_endpoint_bend_bounded() {
        let params = TreeParams {
            max_depth: 0,
            ..Default::default()
        };
        for seed in 0..200 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let trunk = TreeGenerator::new(params).generate(&layout(), 0.0, &mut rng)[0];
            let start_dir = direction(trunk.start, trunk.c1);
            let chord = angle_between(direction(trunk.start, trunk.end), start_dir);
            assert!(chord <= params.bend + 1e-3, "bend {}", chord);
            assert!((trunk.start.distance(&trunk.end) - layout().trunk_length).abs() < 0.01);
        }
    }

    #[test]
    fn test_sway_phase_derivation() {
        let mut rng = SmallRng::seed_from_u64(11);
        let params = TreeParams {
            max_depth: 1,
            ..Default::default()
        };
        let segments = TreeGenerator::new(params).generate(&layout(), 2.0, &mut rng);
        let mut phases: Vec<f32> = segments[1..].iter().map(|s| s.sway_phase).collect();
        phases.sort_by(f32::total_cmp);

        assert_eq!(segments[0].sway_phase, 2.0);
        assert!((phases[0] - (2.0 + 0.61)).abs() < 0.0001);
        assert!((phases[1] - (2.0 + 0.61 + 1.37)).abs() < 0.0001);
    }

    #[test]
    fn test_sway_keeps_start_fixed() {
        let segment = generate(4)[10];
        let swayed = segment.swayed(1.3, 2.0);
        assert_eq!(swayed.start, segment.start);
        assert!(swayed.end.distance(&segment.end) <= 2.0 * (0.2 + segment.depth as f32 * 0.35) + 0.001);
    }

    #[test]
    fn test_layout_scales_with_viewport() {
        let narrow = TreeLayout::for_viewport(360.0, 720.0);
        let wide = TreeLayout::for_viewport(1920.0, 1080.0);
        assert!(narrow.trunk_length < wide.trunk_length);
        assert!(narrow.trunk_thickness >= 6.0);
        assert!(wide.trunk_thickness <= 16.0);
        assert_eq!(wide.root.x, 960.0);
    }
}
