//! Time and distance helpers for gesture animations

use std::time::{Duration, Instant};

/// Animation progress clamped to [0.0, 1.0]
#[inline]
pub fn progress(start: Instant, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = start.elapsed();
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

#[inline]
pub fn is_complete(start: Instant, duration: Duration) -> bool {
    start.elapsed() >= duration
}

#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Resistance applied to a pull past the content edge
///
/// Maps the distance the finger travelled to the distance the content moves.
/// The result approaches `dimension` asymptotically, so a long pull never
/// uncovers more than one viewport of empty space.
#[inline]
pub fn rubber_band(distance: f64, dimension: f64) -> f64 {
    const COEFFICIENT: f64 = 0.55;
    if distance <= 0.0 || dimension <= 0.0 {
        return 0.0;
    }
    (1.0 - 1.0 / (distance * COEFFICIENT / dimension + 1.0)) * dimension
}
