//! Overlay offset animator
//!
//! Produces the overlay offsets a touch gesture would: eased steps for
//! keyboard scrolling, a rubber-banded pull past the top edge, and a spring
//! back to rest once the pull is released.

use std::time::{Duration, Instant};

use super::config::{ScrollConfig, ScrollConfigExt};
use super::easing::{spring_settle, EasingType, EasingTypeExt};
use super::timing::{is_complete, lerp, progress, rubber_band};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Motion {
    Scroll,
    Pull,
    Bounce,
}

/// What the simulated finger is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    /// Keyboard scroll step in flight
    Scrolling,
    /// Finger dragging past the top edge
    Pulling,
    /// Released; springing back to the edge
    Bouncing,
}

impl GesturePhase {
    /// A finger is on the surface
    pub fn is_dragging(self) -> bool {
        self == GesturePhase::Pulling
    }

    /// Content is moving on its own after release
    pub fn is_decelerating(self) -> bool {
        self == GesturePhase::Bouncing
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveAnimation {
    start: Instant,
    from: f64,
    to: f64,
    duration: Duration,
    easing: EasingType,
    motion: Motion,
}

impl ActiveAnimation {
    fn sample(&self) -> f64 {
        let t = progress(self.start, self.duration);
        let eased = match self.motion {
            Motion::Bounce => spring_settle(t),
            Motion::Scroll | Motion::Pull => self.easing.apply(t),
        };
        lerp(self.from, self.to, eased)
    }
}

/// Offset animator driving the overlay surface
///
/// Call a gesture method (`scroll_by`, `scroll_to`, `pull`) in response to
/// input, then `update()` every frame and feed the returned offset to the
/// coordinator.
#[derive(Debug, Clone)]
pub struct OffsetAnimator {
    animation: Option<ActiveAnimation>,
    config: ScrollConfig,
    current: f64,
    /// Scroll delta batched until the next frame
    pending_delta: f64,
    /// Distance pulled past the top edge in the current gesture
    pull_distance: f64,
}

impl Default for OffsetAnimator {
    fn default() -> Self {
        Self::new(ScrollConfig::default())
    }
}

impl OffsetAnimator {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            animation: None,
            config,
            current: 0.0,
            pending_delta: 0.0,
            pull_distance: 0.0,
        }
    }

    pub fn with_defaults() -> Self {
        Self::default()
    }

    pub fn set_config(&mut self, config: ScrollConfig) {
        self.config = config;
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Pending work that needs the fast frame rate
    #[inline]
    pub fn needs_update(&self) -> bool {
        self.animation.is_some() || self.pending_delta != 0.0
    }

    pub fn phase(&self) -> GesturePhase {
        match self.animation.map(|a| a.motion) {
            None => GesturePhase::Idle,
            Some(Motion::Scroll) => GesturePhase::Scrolling,
            Some(Motion::Pull) => GesturePhase::Pulling,
            Some(Motion::Bounce) => GesturePhase::Bouncing,
        }
    }

    /// Offset the current animation ends at
    pub fn target(&self) -> f64 {
        self.animation.map(|a| a.to).unwrap_or(self.current)
    }

    #[inline]
    pub fn offset(&self) -> f64 {
        self.current
    }

    /// Jump to `offset` without animating
    ///
    /// Used when the coordinator moved the overlay itself, e.g. restoring a
    /// page's remembered position.
    pub fn set_offset(&mut self, offset: f64) {
        self.animation = None;
        self.current = offset;
        self.pending_delta = 0.0;
        self.pull_distance = 0.0;
    }

    pub fn scroll_to(&mut self, target: f64, max_offset: f64) {
        let target = target.clamp(0.0, max_offset.max(0.0));
        self.pending_delta = 0.0;
        self.pull_distance = 0.0;

        if !self.config.is_smooth() {
            self.current = target;
            self.animation = None;
            return;
        }

        if self.current == target {
            self.animation = None;
            return;
        }
        self.animation = Some(self.animate(target, self.config.animation_duration(), Motion::Scroll));
    }

    /// Scroll by `delta` rows (positive = down)
    ///
    /// Calls made before the next `update()` are batched into one step.
    pub fn scroll_by(&mut self, delta: f64, max_offset: f64) {
        if !self.config.is_smooth() {
            self.current = (self.current.max(0.0) + delta).clamp(0.0, max_offset.max(0.0));
            self.animation = None;
            self.pull_distance = 0.0;
            return;
        }
        self.pending_delta += delta;
    }

    pub fn scroll_down(&mut self, max_offset: f64) {
        self.scroll_by(self.line_step(), max_offset);
    }

    pub fn scroll_up(&mut self, max_offset: f64) {
        self.scroll_by(-self.line_step(), max_offset);
    }

    pub fn scroll_half_page_down(&mut self, viewport_height: f64, max_offset: f64) {
        self.scroll_by((viewport_height / 2.0).floor().max(1.0), max_offset);
    }

    pub fn scroll_half_page_up(&mut self, viewport_height: f64, max_offset: f64) {
        self.scroll_by(-(viewport_height / 2.0).floor().max(1.0), max_offset);
    }

    pub fn scroll_full_page_down(&mut self, viewport_height: f64, max_offset: f64) {
        self.scroll_by(viewport_height, max_offset);
    }

    pub fn scroll_full_page_up(&mut self, viewport_height: f64, max_offset: f64) {
        self.scroll_by(-viewport_height, max_offset);
    }

    /// Drag `distance` rows further past the top edge
    ///
    /// The content follows with rubber-band resistance relative to
    /// `dimension`, then springs back once the pull animation ends. Away from
    /// the top this scrolls back to the top instead.
    pub fn pull(&mut self, distance: f64, dimension: f64) {
        if self.target() > 0.0 {
            self.scroll_to(0.0, f64::MAX);
            return;
        }

        self.pending_delta = 0.0;
        self.pull_distance += distance;
        let target = -rubber_band(self.pull_distance, dimension);

        if !self.config.is_smooth() {
            self.current = target;
            self.start_bounce();
            return;
        }
        self.animation = Some(self.animate(target, self.config.animation_duration(), Motion::Pull));
    }

    /// Advance the animation and return the current offset
    pub fn update(&mut self, max_offset: f64) -> f64 {
        let max_offset = max_offset.max(0.0);

        if self.pending_delta != 0.0 {
            let new_target = (self.target().max(0.0) + self.pending_delta).clamp(0.0, max_offset);
            self.pending_delta = 0.0;
            self.pull_distance = 0.0;

            if new_target != self.current {
                self.animation =
                    Some(self.animate(new_target, self.config.animation_duration(), Motion::Scroll));
            }
        }

        if let Some(anim) = self.animation {
            if is_complete(anim.start, anim.duration) {
                self.current = anim.to;
                self.animation = None;
                match anim.motion {
                    Motion::Pull => self.start_bounce(),
                    Motion::Bounce => self.pull_distance = 0.0,
                    Motion::Scroll => {}
                }
            } else {
                self.current = anim.sample();
            }
            if anim.motion == Motion::Scroll {
                self.current = self.current.min(max_offset);
            }
        }

        // Content shrank under a resting offset
        if self.animation.is_none() && self.current > max_offset {
            self.current = max_offset;
        }

        self.current
    }

    /// Cancel any active animation and stop at the current offset
    pub fn cancel(&mut self) {
        self.animation = None;
        self.pending_delta = 0.0;
    }

    fn line_step(&self) -> f64 {
        f64::from(self.config.scroll_lines.max(1))
    }

    fn animate(&self, to: f64, duration: Duration, motion: Motion) -> ActiveAnimation {
        ActiveAnimation {
            start: Instant::now(),
            from: self.current,
            to,
            duration,
            easing: self.config.easing,
            motion,
        }
    }

    fn start_bounce(&mut self) {
        if self.current >= 0.0 {
            self.animation = None;
            self.pull_distance = 0.0;
            return;
        }
        self.animation = Some(self.animate(0.0, self.config.bounce_duration(), Motion::Bounce));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(bounce_duration_ms: u64) -> OffsetAnimator {
        OffsetAnimator::new(ScrollConfig {
            smooth_enabled: false,
            bounce_duration_ms,
            ..Default::default()
        })
    }

    #[test]
    fn test_instant_scroll_when_disabled() {
        let mut animator = instant(0);
        animator.scroll_to(100.0, 200.0);
        assert_eq!(animator.offset(), 100.0);
        assert!(!animator.is_animating());

        animator.scroll_by(150.0, 200.0);
        assert_eq!(animator.offset(), 200.0);
    }

    #[test]
    fn test_animation_starts() {
        let mut animator = OffsetAnimator::new(ScrollConfig {
            smooth_enabled: true,
            animation_duration_ms: 100,
            ..Default::default()
        });

        animator.scroll_to(100.0, 200.0);
        assert!(animator.is_animating());
        assert_eq!(animator.phase(), GesturePhase::Scrolling);
        assert_eq!(animator.target(), 100.0);
    }

    #[test]
    fn test_scroll_by_batching() {
        let mut animator = OffsetAnimator::new(ScrollConfig {
            smooth_enabled: true,
            animation_duration_ms: 100,
            ..Default::default()
        });

        animator.scroll_by(10.0, 200.0);
        animator.scroll_by(10.0, 200.0);
        animator.scroll_by(10.0, 200.0);
        assert!(animator.needs_update());

        animator.update(200.0);
        assert_eq!(animator.target(), 30.0);
    }

    #[test]
    fn test_scroll_clamp_max() {
        let mut animator = OffsetAnimator::with_defaults();
        animator.set_offset(50.0);
        animator.scroll_to(300.0, 100.0);
        animator.update(100.0);
        assert!(animator.target() <= 100.0);
    }

    #[test]
    fn test_pull_then_bounce_back() {
        let mut animator = instant(0);
        animator.pull(10.0, 40.0);
        assert!(animator.offset() < 0.0);
        assert!(animator.offset() > -10.0);
        assert_eq!(animator.phase(), GesturePhase::Bouncing);
        assert!(animator.phase().is_decelerating());

        assert_eq!(animator.update(100.0), 0.0);
        assert_eq!(animator.phase(), GesturePhase::Idle);
    }

    #[test]
    fn test_repeated_pulls_accumulate_with_resistance() {
        let mut animator = instant(60_000);
        animator.pull(10.0, 40.0);
        let first = animator.offset();
        animator.pull(10.0, 40.0);
        let second = animator.offset();

        assert!(second < first);
        assert!(second > -20.0);
    }

    #[test]
    fn test_pull_away_from_top_returns_to_top() {
        let mut animator = instant(0);
        animator.set_offset(30.0);
        animator.pull(10.0, 40.0);
        assert_eq!(animator.offset(), 0.0);
        assert_eq!(animator.phase(), GesturePhase::Idle);
    }

    #[test]
    fn test_resting_offset_follows_shrinking_content() {
        let mut animator = instant(0);
        animator.set_offset(80.0);
        assert_eq!(animator.update(50.0), 50.0);
    }
}
