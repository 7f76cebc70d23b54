use rand::Rng;

/// Largest side of the offscreen sampling square
pub const MAX_SAMPLE_SIDE: u32 = 420;
/// Smallest side, so tiny viewports still get a recognizable portrait
pub const MIN_SAMPLE_SIDE: u32 = 96;
/// Roughly this many samples are taken across the width
pub const TARGET_SAMPLES_ACROSS: f32 = 80.0;
/// Below this many kept points the sample counts as degenerate
pub const MIN_POINTS: usize = 600;
/// Synthetic points injected into a degenerate sample
pub const FALLBACK_POINTS: usize = 900;

/// At or below this luminance a pixel is never kept
pub const NEVER_KEEP_LUMINANCE: f32 = 0.15;
/// At or above this luminance a pixel is always kept (0.15 + 1 / 1.6)
pub const ALWAYS_KEEP_LUMINANCE: f32 = 0.775;

/// A sampled location in portrait-local space with its luminance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetPoint {
    pub x: f32,
    pub y: f32,
    /// Perceptual luminance in [0, 1]
    pub luminance: f32,
}

/// Side of the offscreen square for a viewport width
pub fn sample_side_for_width(width: f32) -> u32 {
    ((width.max(0.0) * 0.78).round() as u32).clamp(MIN_SAMPLE_SIDE, MAX_SAMPLE_SIDE)
}

/// Grid step targeting ~80 samples across; coarser on large images
pub fn grid_step(side: u32) -> u32 {
    ((side as f32 / TARGET_SAMPLES_ACROSS).round() as u32).clamp(4, 8)
}

/// Rec. 709 luminance of an 8-bit color, normalized to [0, 1]
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    (0.2126 * r as f32 + 0.7152 * g as f32 + 0.0722 * b as f32) / 255.0
}

/// Chance that a pixel of this luminance becomes a target point.
///
/// Zero at or below 0.15, one from ~0.775 upward, linear in between.
pub fn keep_probability(lum: f32) -> f32 {
    if lum >= ALWAYS_KEEP_LUMINANCE {
        return 1.0;
    }
    ((lum - NEVER_KEEP_LUMINANCE) * 1.6).clamp(0.0, 1.0)
}

/// Walk an RGBA8 buffer on a grid and keep points weighted by brightness
pub fn sample_pixels<R: Rng>(
    pixels: &[u8],
    width: u32,
    height: u32,
    step: u32,
    rng: &mut R,
) -> Vec<TargetPoint> {
    let needed = width as usize * height as usize * 4;
    if pixels.len() < needed || step == 0 {
        log::warn!(
            "pixel buffer too short for {}x{} ({} of {} bytes)",
            width,
            height,
            pixels.len(),
            needed
        );
        return Vec::new();
    }

    let mut points = Vec::new();
    for y in (0..height).step_by(step as usize) {
        for x in (0..width).step_by(step as usize) {
            let i = (y as usize * width as usize + x as usize) * 4;
            let (r, g, b, a) = (pixels[i], pixels[i + 1], pixels[i + 2], pixels[i + 3]);

            // Nearly transparent pixels count as black
            let lum = if a < 16 { 0.0 } else { luminance(r, g, b) };

            if rng.random::<f32>() < keep_probability(lum) {
                points.push(TargetPoint {
                    x: x as f32,
                    y: y as f32,
                    luminance: lum,
                });
            }
        }
    }
    points
}

/// Append synthetic points when too few qualified. Returns how many were added.
pub fn inject_fallback<R: Rng>(
    points: &mut Vec<TargetPoint>,
    width: u32,
    height: u32,
    rng: &mut R,
) -> usize {
    if points.len() >= MIN_POINTS {
        return 0;
    }

    points.reserve(FALLBACK_POINTS);
    for _ in 0..FALLBACK_POINTS {
        points.push(TargetPoint {
            x: rng.random::<f32>() * width as f32,
            y: rng.random::<f32>() * height as f32,
            luminance: 0.2 + rng.random::<f32>() * 0.7,
        });
    }
    FALLBACK_POINTS
}

/// Builds the portrait target set once and keeps it
#[derive(Debug, Clone, Default)]
pub struct ImageSampler {
    points: Option<Vec<TargetPoint>>,
    side: u32,
}

impl ImageSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_built(&self) -> bool {
        self.points.is_some()
    }

    /// Target points, empty until built
    pub fn points(&self) -> &[TargetPoint] {
        self.points.as_deref().unwrap_or(&[])
    }

    /// Side of the square the points were sampled in (the portrait's local frame)
    pub fn side(&self) -> u32 {
        self.side
    }

    /// Sample a `side`×`side` RGBA8 buffer (already cover-fitted).
    ///
    /// Returns `false` without touching anything if a target set already exists.
    pub fn build<R: Rng>(&mut self, pixels: &[u8], side: u32, rng: &mut R) -> bool {
        if self.is_built() {
            return false;
        }

        let step = grid_step(side);
        let mut points = sample_pixels(pixels, side, side, step, rng);
        let kept = points.len();
        let synthetic = inject_fallback(&mut points, side, side, rng);

        if synthetic > 0 {
            log::warn!(
                "portrait sample degenerate ({} points kept), added {} synthetic points",
                kept,
                synthetic
            );
        }
        log::info!(
            "portrait targets built: {} points, side {}px, step {}px",
            points.len(),
            side,
            step
        );

        self.side = side;
        self.points = Some(points);
        true
    }

    /// Build from a degenerate (unavailable) image: synthetic points only
    pub fn build_synthetic<R: Rng>(&mut self, side: u32, rng: &mut R) -> bool {
        self.build(&[], side, rng)
    }
}
