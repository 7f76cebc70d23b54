//! Easing curves shared by the tree reveal, the seed glow and the portrait fade

/// Shape of an eased transition
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Easing {
    /// Hermite S-curve `3t² − 2t³` (default for tree growth)
    #[default]
    SmoothStep,
    /// Smooth ease-in-out, quadratic halves
    EaseInOut,
    /// Fast start, long gentle finish
    EaseOutCubic,
}

/// Eased value of `t`; input outside [0, 1] is clamped first
pub fn ease(t: f32, easing: Easing) -> f32 {
    let t = t.clamp(0.0, 1.0);

    match easing {
        Easing::SmoothStep => t * t * (3.0 - 2.0 * t),
        Easing::EaseInOut => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
            }
        }
        Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
    }
}

/// Move `current` toward `target` by `rate` of the remaining distance.
///
/// For `rate` in [0, 1] the result never passes the target.
pub fn approach(current: f32, target: f32, rate: f32) -> f32 {
    current + (target - current) * rate.clamp(0.0, 1.0)
}
