//! Offset synchronizer
//!
//! Splits the overlay's offset between the container (header collapse) and the
//! active page's own surface so the two read as one continuous scroll.
//!
//! The collapse boundary (`top_height`) divides two regimes:
//!
//! - **Expanding**: `delta < -epsilon`. The container follows the overlay and
//!   every tracked page surface sits at its top.
//! - **Collapsed**: `delta >= -epsilon`. The container is pinned at
//!   `top_height` and the active page surface scrolls by `delta`.

use std::rc::Rc;

use tracing::trace;

use crate::config::SyncConfig;
use crate::geometry::{Metrics, Viewport};
use crate::pages::{PageId, PageStore};
use crate::surface::{PanSurface, ScrollView, Size};

/// Which surface absorbs the scroll delta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    /// Header still collapsing or expanding; the container moves
    Expanding,
    /// Header fully collapsed; the active page moves
    Collapsed,
}

/// Classify a delta relative to the collapse boundary
///
/// A delta of exactly `-epsilon` is already [`Regime::Collapsed`].
#[inline]
pub fn classify(delta: f64, epsilon: f64) -> Regime {
    if delta < -epsilon {
        Regime::Expanding
    } else {
        Regime::Collapsed
    }
}

/// Fraction of the header collapse, or `None` when it is undefined
#[inline]
pub fn collapse_progress(container_offset_y: f64, top_height: f64) -> Option<f64> {
    if top_height <= 0.0 {
        return None;
    }
    let progress = container_offset_y / top_height;
    progress.is_finite().then_some(progress)
}

/// Overlay content size needed to scroll through header, tabs and `surface`
pub fn overlay_content_size(
    metrics: &Metrics,
    viewport: &Viewport,
    surface: &dyn PanSurface,
) -> Size {
    let available = viewport.height
        - metrics.min_header_height
        - metrics.tab_height
        - viewport.bottom_inset;

    let (width, intrinsic_height) = if surface.is_scrollable() {
        let content = surface.content_size();
        (content.width, content.height)
    } else {
        (viewport.width, 0.0)
    };

    let bottom_height = intrinsic_height.max(available);
    Size::new(
        width,
        bottom_height + metrics.header_height + metrics.tab_height + viewport.bottom_inset,
    )
}

/// What a single synchronization pass did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncOutcome {
    pub regime: Regime,
    pub top_height: f64,
    pub delta: f64,
    pub progress: f64,
}

/// What a content-size recomputation did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resize {
    /// Overlay already had this size
    Unchanged,
    /// Size applied to the overlay
    Applied(Size),
    /// Overlay is overscrolled; size parked until the next scroll at offset >= 0
    Deferred(Size),
}

pub struct OffsetSynchronizer {
    container: Rc<ScrollView>,
    overlay: Rc<ScrollView>,
    config: SyncConfig,
    viewport: Viewport,
    last_progress: f64,
}

impl OffsetSynchronizer {
    pub fn new(config: SyncConfig, viewport: Viewport) -> Self {
        let frame = Size::new(viewport.width, viewport.height);
        Self {
            container: Rc::new(ScrollView::new(frame)),
            overlay: Rc::new(ScrollView::new(frame)),
            config,
            viewport,
            last_progress: 0.0,
        }
    }

    /// Surface holding header and pager
    pub fn container(&self) -> &Rc<ScrollView> {
        &self.container
    }

    /// Invisible gesture-owning surface on top
    pub fn overlay(&self) -> &Rc<ScrollView> {
        &self.overlay
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Update the viewport. Returns `true` when it changed.
    pub fn set_viewport(&mut self, viewport: Viewport) -> bool {
        if self.viewport == viewport {
            return false;
        }
        self.viewport = viewport;
        let frame = Size::new(viewport.width, viewport.height);
        self.container.set_frame(frame);
        self.overlay.set_frame(frame);
        true
    }

    /// Last well-defined collapse progress
    pub fn progress(&self) -> f64 {
        self.last_progress
    }

    /// Distribute `raw_offset_y` between container and the active page
    pub fn split(
        &mut self,
        raw_offset_y: f64,
        metrics: &Metrics,
        pages: &mut PageStore,
        active: PageId,
    ) -> SyncOutcome {
        let top_height = metrics.top_height();
        let delta = raw_offset_y - top_height;
        let regime = classify(delta, self.config.collapse_epsilon);

        match regime {
            Regime::Expanding => {
                self.container.set_content_offset_y(raw_offset_y);
                for (_, surface) in pages.tracked_surfaces() {
                    if surface.is_scrollable() {
                        surface.set_content_offset_y(-surface.content_inset_top());
                    }
                }
                pages.clear_remembered_offsets();
            }
            Regime::Collapsed => {
                self.container.set_content_offset_y(top_height);
                if let Some(surface) = pages.surface(active) {
                    if surface.is_scrollable() {
                        surface.set_content_offset_y(delta - surface.content_inset_top());
                    }
                }
            }
        }

        if let Some(progress) =
            collapse_progress(self.container.content_offset_y(), top_height)
        {
            self.last_progress = progress;
        }

        trace!(
            raw_offset_y,
            top_height,
            delta,
            ?regime,
            progress = self.last_progress,
            "Synchronized offsets"
        );

        SyncOutcome {
            regime,
            top_height,
            delta,
            progress: self.last_progress,
        }
    }

    /// Recompute the overlay content size for `page` showing `surface`
    pub fn resize(
        &mut self,
        page: PageId,
        surface: &dyn PanSurface,
        metrics: &Metrics,
        pages: &mut PageStore,
    ) -> Resize {
        let new_size = overlay_content_size(metrics, &self.viewport, surface);
        pages.set_observed_size(page, new_size);

        if new_size == self.overlay.content_size() {
            // A parked size would now undo this one
            pages.take_pending(page);
            return Resize::Unchanged;
        }

        if self.config.defer_resize_on_overscroll && self.overlay.content_offset_y() < 0.0 {
            pages.set_pending(page, new_size);
            return Resize::Deferred(new_size);
        }

        pages.take_pending(page);
        self.overlay.set_content_size(new_size);
        Resize::Applied(new_size)
    }

    /// Apply a parked content size once the overlay is back at offset >= 0
    pub fn apply_pending(&mut self, pages: &mut PageStore, active: PageId) -> Option<Size> {
        if self.overlay.content_offset_y() < 0.0 {
            return None;
        }
        let size = pages.take_pending(active)?;
        self.overlay.set_content_size(size);
        Some(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> Metrics {
        Metrics {
            min_header_height: 60.0,
            header_height: 200.0,
            page_content_top: 200.0,
            tab_height: 40.0,
            sticky_tab: true,
        }
    }

    fn synchronizer() -> OffsetSynchronizer {
        OffsetSynchronizer::new(SyncConfig::default(), Viewport::new(400.0, 800.0))
    }

    fn tracked_page(pages: &mut PageStore, page: PageId, inset: f64) -> Rc<ScrollView> {
        let view = Rc::new(
            ScrollView::new(Size::new(400.0, 600.0))
                .with_content_size(Size::new(400.0, 2000.0))
                .with_inset_top(inset),
        );
        let surface: Rc<dyn PanSurface> = view.clone();
        pages.track_surface(page, surface);
        view
    }

    #[test]
    fn test_classify_boundary_tie_break() {
        assert_eq!(classify(-1.0, 1.0), Regime::Collapsed);
        assert_eq!(classify(-1.0001, 1.0), Regime::Expanding);
        assert_eq!(classify(0.0, 1.0), Regime::Collapsed);
        assert_eq!(classify(-50.0, 1.0), Regime::Expanding);
    }

    #[test]
    fn test_progress_guard() {
        assert_eq!(collapse_progress(70.0, 140.0), Some(0.5));
        assert_eq!(collapse_progress(10.0, 0.0), None);
        assert_eq!(collapse_progress(10.0, -5.0), None);
    }

    #[test]
    fn test_expanding_moves_container_and_resets_pages() {
        let mut sync = synchronizer();
        let mut pages = PageStore::new();
        let active = tracked_page(&mut pages, 0, 0.0);
        let other = tracked_page(&mut pages, 1, 8.0);
        active.set_content_offset_y(300.0);
        other.set_content_offset_y(50.0);
        pages.remember_offset(1, 500.0);

        let outcome = sync.split(70.0, &metrics(), &mut pages, 0);
        assert_eq!(outcome.regime, Regime::Expanding);
        assert_eq!(sync.container().content_offset_y(), 70.0);
        assert_eq!(active.content_offset_y(), 0.0);
        assert_eq!(other.content_offset_y(), -8.0);
        assert_eq!(pages.remembered_offset(1), None);
        assert!((outcome.progress - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_collapsed_pins_container_and_scrolls_page() {
        let mut sync = synchronizer();
        let mut pages = PageStore::new();
        let active = tracked_page(&mut pages, 0, 4.0);
        let other = tracked_page(&mut pages, 1, 0.0);
        other.set_content_offset_y(33.0);

        let outcome = sync.split(240.0, &metrics(), &mut pages, 0);
        assert_eq!(outcome.regime, Regime::Collapsed);
        assert_eq!(sync.container().content_offset_y(), 140.0);
        assert_eq!(active.content_offset_y(), 96.0);
        // Inactive pages keep their own position
        assert_eq!(other.content_offset_y(), 33.0);
        assert_eq!(outcome.progress, 1.0);
    }

    #[test]
    fn test_overscroll_progress_is_negative() {
        let mut sync = synchronizer();
        let mut pages = PageStore::new();
        let outcome = sync.split(-28.0, &metrics(), &mut pages, 0);
        assert_eq!(outcome.regime, Regime::Expanding);
        assert!((outcome.progress + 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_zero_top_height_keeps_last_progress() {
        let mut sync = synchronizer();
        let mut pages = PageStore::new();
        sync.split(70.0, &metrics(), &mut pages, 0);

        let flat = Metrics {
            page_content_top: 60.0,
            ..metrics()
        };
        let outcome = sync.split(10.0, &flat, &mut pages, 0);
        assert_eq!(outcome.top_height, 0.0);
        assert!((outcome.progress - 0.5).abs() < 1e-9);
        assert!(outcome.progress.is_finite());
    }

    #[test]
    fn test_content_size_for_scrollable_page() {
        let view = ScrollView::new(Size::new(400.0, 600.0))
            .with_content_size(Size::new(390.0, 2000.0));
        let viewport = Viewport::new(400.0, 800.0).with_bottom_inset(20.0);
        let size = overlay_content_size(&metrics(), &viewport, &view);
        assert_eq!(size, Size::new(390.0, 2000.0 + 200.0 + 40.0 + 20.0));
    }

    #[test]
    fn test_content_size_short_page_fills_viewport() {
        let view = ScrollView::new(Size::new(400.0, 600.0))
            .with_content_size(Size::new(400.0, 100.0));
        let viewport = Viewport::new(400.0, 800.0).with_bottom_inset(20.0);
        let size = overlay_content_size(&metrics(), &viewport, &view);
        // available = 800 - 60 - 40 - 20 = 680
        assert_eq!(size.height, 680.0 + 200.0 + 40.0 + 20.0);
    }

    #[test]
    fn test_content_size_plain_page_uses_viewport_width() {
        let view = ScrollView::plain(Size::new(123.0, 5000.0));
        let size = overlay_content_size(&metrics(), &Viewport::new(400.0, 800.0), &view);
        assert_eq!(size, Size::new(400.0, 700.0 + 200.0 + 40.0));
    }

    #[test]
    fn test_resize_deferred_during_overscroll() {
        let mut sync = synchronizer();
        let mut pages = PageStore::new();
        let view = tracked_page(&mut pages, 0, 0.0);
        sync.overlay().set_content_offset_y(-30.0);

        let outcome = sync.resize(0, &*view, &metrics(), &mut pages);
        let expected = Size::new(400.0, 2240.0);
        assert_eq!(outcome, Resize::Deferred(expected));
        assert_eq!(sync.overlay().content_size(), Size::ZERO);
        assert_eq!(pages.get(0).unwrap().pending_content_size, Some(expected));

        assert_eq!(sync.apply_pending(&mut pages, 0), None);
        sync.overlay().set_content_offset_y(0.0);
        assert_eq!(sync.apply_pending(&mut pages, 0), Some(expected));
        assert_eq!(sync.overlay().content_size(), expected);
        assert_eq!(sync.apply_pending(&mut pages, 0), None);
    }

    #[test]
    fn test_resize_applies_immediately_when_disabled() {
        let config = SyncConfig {
            defer_resize_on_overscroll: false,
            ..SyncConfig::default()
        };
        let mut sync = OffsetSynchronizer::new(config, Viewport::new(400.0, 800.0));
        let mut pages = PageStore::new();
        let view = tracked_page(&mut pages, 0, 0.0);
        sync.overlay().set_content_offset_y(-30.0);

        let outcome = sync.resize(0, &*view, &metrics(), &mut pages);
        assert!(matches!(outcome, Resize::Applied(_)));
    }

    #[test]
    fn test_resize_unchanged_drops_stale_pending() {
        let mut sync = synchronizer();
        let mut pages = PageStore::new();
        let view = tracked_page(&mut pages, 0, 0.0);
        sync.resize(0, &*view, &metrics(), &mut pages);

        sync.overlay().set_content_offset_y(-10.0);
        view.set_content_size(Size::new(400.0, 3000.0));
        sync.resize(0, &*view, &metrics(), &mut pages);
        assert!(pages.get(0).unwrap().pending_content_size.is_some());

        view.set_content_size(Size::new(400.0, 2000.0));
        assert_eq!(
            sync.resize(0, &*view, &metrics(), &mut pages),
            Resize::Unchanged
        );
        assert!(pages.get(0).unwrap().pending_content_size.is_none());
    }
}
