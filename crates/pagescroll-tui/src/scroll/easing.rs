//! Easing curves mapping [0, 1] progress to [0, 1] output

pub use pagescroll_core::EasingType;

pub trait EasingTypeExt {
    /// Apply the easing function to a progress value in [0, 1]
    fn apply(&self, t: f64) -> f64;
}

impl EasingTypeExt for EasingType {
    #[inline]
    fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingType::None => if t < 1.0 { 0.0 } else { 1.0 },
            EasingType::Linear => t,
            EasingType::Cubic => cubic_ease_out(t),
            EasingType::Quintic => quintic_ease_out(t),
            EasingType::EaseOut => exponential_ease_out(t),
        }
    }
}

/// f(t) = 1 - (1-t)³
#[inline]
fn cubic_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// f(t) = 1 - (1-t)⁵
#[inline]
fn quintic_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv * inv * inv
}

/// f(t) = 1 - 2^(-10t)
#[inline]
fn exponential_ease_out(t: f64) -> f64 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2.0_f64.powf(-10.0 * t)
    }
}

/// Critically damped spring, normalized so that f(1) = 1
///
/// Used for the bounce back from overscroll; starts fast and settles
/// without overshooting past the resting edge.
#[inline]
pub fn spring_settle(t: f64) -> f64 {
    const STIFFNESS: f64 = 8.0;
    let t = t.clamp(0.0, 1.0);
    let raw = |t: f64| 1.0 - (1.0 + STIFFNESS * t) * (-STIFFNESS * t).exp();
    raw(t) / raw(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [EasingType; 5] = [
        EasingType::None,
        EasingType::Linear,
        EasingType::Cubic,
        EasingType::Quintic,
        EasingType::EaseOut,
    ];

    #[test]
    fn test_easing_boundaries() {
        for easing in ALL {
            if easing != EasingType::None {
                assert!(easing.apply(0.0).abs() < 0.001, "{:?} at t=0", easing);
            }
            assert!((easing.apply(1.0) - 1.0).abs() < 0.001, "{:?} at t=1", easing);
        }
    }

    #[test]
    fn test_easing_monotonic() {
        for easing in ALL {
            let mut prev = 0.0;
            for i in 0..=10 {
                let t = i as f64 / 10.0;
                let v = easing.apply(t);
                assert!(v >= prev, "{:?} not monotonic at t={}", easing, t);
                prev = v;
            }
        }
    }

    #[test]
    fn test_spring_settle_never_overshoots() {
        assert!(spring_settle(0.0).abs() < 1e-9);
        assert!((spring_settle(1.0) - 1.0).abs() < 1e-9);
        let mut prev = 0.0;
        for i in 0..=20 {
            let v = spring_settle(i as f64 / 20.0);
            assert!(v >= prev && v <= 1.0 + 1e-9);
            prev = v;
        }
    }
}
