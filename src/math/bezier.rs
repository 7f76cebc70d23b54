use super::Vec2;

/// Cubic Bézier curve described by its start point, two controls and end point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub start: Vec2,
    pub c1: Vec2,
    pub c2: Vec2,
    pub end: Vec2,
}

impl CubicBezier {
    pub fn new(start: Vec2, c1: Vec2, c2: Vec2, end: Vec2) -> Self {
        Self { start, c1, c2, end }
    }

    /// Evaluate the curve at parameter t (0.0 to 1.0)
    pub fn evaluate(&self, t: f32) -> Vec2 {
        evaluate_cubic(self.start, self.c1, self.c2, self.end, t)
    }

    /// Portion of the curve between t = 0 and t = `t` (de Casteljau split)
    pub fn split_front(&self, t: f32) -> CubicBezier {
        let t = t.clamp(0.0, 1.0);
        let p01 = self.start.lerp(&self.c1, t);
        let p12 = self.c1.lerp(&self.c2, t);
        let p23 = self.c2.lerp(&self.end, t);
        let p012 = p01.lerp(&p12, t);
        let p123 = p12.lerp(&p23, t);
        let p0123 = p012.lerp(&p123, t);
        CubicBezier::new(self.start, p01, p012, p0123)
    }
}

/// Evaluate a cubic Bézier at t
pub fn evaluate_cubic(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let t = t.clamp(0.0, 1.0);
    let u = 1.0 - t;
    let uu = u * u;
    let tt = t * t;

    p0.scale(uu * u) + p1.scale(3.0 * uu * t) + p2.scale(3.0 * u * tt) + p3.scale(tt * t)
}
