//! Page coordinator
//!
//! Owns the [`OffsetSynchronizer`] and the per-page [`PageStore`], reacts to
//! pager events and header re-measurement, and reports progress to the host.
//!
//! Everything runs on the caller's thread. Content-size notifications raised by
//! surfaces are queued and drained at the end of every public operation, so a
//! notification fired while the coordinator is mid-update is handled after
//! that update completes, in delivery order.

use std::rc::Rc;

use tracing::debug;

use crate::config::SyncConfig;
use crate::geometry::{GeometryProvider, Metrics, PageContent, Viewport};
use crate::pages::{PageId, PageState, PageStore, SurfaceNotification, Tracking};
use crate::surface::{PanSurface, ScrollView};
use crate::sync::{OffsetSynchronizer, Resize};

/// Payload of [`ProgressDelegate::on_scroll_update`]
pub struct ScrollUpdate<'a> {
    pub container: &'a ScrollView,
    /// Header collapse fraction; 0 expanded, 1 collapsed, outside [0, 1] on overscroll
    pub progress: f64,
    pub overlay: &'a ScrollView,
    pub active_pan_surface: Option<&'a dyn PanSurface>,
    pub page_index: PageId,
}

/// Host callbacks
pub trait ProgressDelegate {
    /// Called after every processed scroll
    fn on_scroll_update(&mut self, update: &ScrollUpdate<'_>);

    /// Called once when the coordinator has been attached
    fn on_ready(&mut self, _overlay: &ScrollView) {}
}

/// Events delivered by the paging widget
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PagerEvent {
    PageSelected { index: PageId },
    ContentOffsetChanged { offset_y: f64, index: PageId },
}

/// Snapshot of the coordinator's scalar state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncState {
    pub active_page: PageId,
    pub container_offset_y: f64,
    pub overlay_offset_y: f64,
    pub header_measured_height: Option<f64>,
    pub progress: f64,
}

pub struct PageCoordinator {
    geometry: Rc<dyn GeometryProvider>,
    sync: OffsetSynchronizer,
    pages: PageStore,
    active_page: PageId,
    header_measured_height: Option<f64>,
    delegate: Option<Box<dyn ProgressDelegate>>,
    attached: bool,
}

impl PageCoordinator {
    pub fn new(geometry: Rc<dyn GeometryProvider>, config: SyncConfig, viewport: Viewport) -> Self {
        Self {
            geometry,
            sync: OffsetSynchronizer::new(config, viewport),
            pages: PageStore::new(),
            active_page: 0,
            header_measured_height: None,
            delegate: None,
            attached: false,
        }
    }

    pub fn set_delegate(&mut self, delegate: Box<dyn ProgressDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn take_delegate(&mut self) -> Option<Box<dyn ProgressDelegate>> {
        self.delegate.take()
    }

    /// Track the pager's current page and announce readiness
    ///
    /// Calling it again while attached does nothing.
    pub fn attach(&mut self) {
        if self.attached {
            return;
        }

        let current = self.geometry.pager().current_page();
        self.observe_pan_view(current.as_deref(), self.active_page);
        self.resize_active();
        self.attached = true;

        debug!(page = self.active_page, "Coordinator attached");
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.on_ready(self.sync.overlay());
        }
        self.process_notifications();
    }

    /// Release every surface subscription
    pub fn detach(&mut self) {
        self.pages.release_all();
        self.attached = false;
        debug!("Coordinator detached");
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// The overlay reported a new offset
    pub fn on_user_scroll(&mut self, raw_offset_y: f64) {
        self.sync.overlay().set_content_offset_y(raw_offset_y);
        self.did_scroll();
        self.process_notifications();
    }

    /// A different page became visible
    pub fn on_page_selected(&mut self, controller: Option<&dyn PageContent>, page: PageId) {
        if page != self.active_page {
            debug!(from = self.active_page, to = page, "Page selected");
        }
        self.active_page = page;

        let target = self
            .pages
            .remembered_offset(page)
            .unwrap_or_else(|| self.sync.container().content_offset_y());
        self.scroll_overlay_to(target);

        self.observe_pan_view(controller, page);
        self.resize_active();
        self.process_notifications();
    }

    /// A page scrolled its own surface
    pub fn on_page_content_offset_changed(
        &mut self,
        controller: Option<&dyn PageContent>,
        offset_y: f64,
        page: PageId,
    ) {
        if page != self.active_page {
            self.pages.remember_offset(page, offset_y);
            return;
        }

        self.observe_pan_view(controller, page);

        let scrollable = self
            .pages
            .surface(page)
            .is_some_and(|surface| surface.is_scrollable());
        if scrollable {
            if offset_y < self.sync.config().collapse_epsilon {
                // Header not collapsed yet; page-internal scroll is ignored
                let container_y = self.sync.container().content_offset_y();
                self.scroll_overlay_to(container_y);
            } else {
                let top_height = self.metrics().top_height();
                self.sync.container().set_content_offset_y(top_height);
                self.scroll_overlay_to(offset_y + top_height);
            }
        }
        self.process_notifications();
    }

    /// Route a pager event to its handler
    pub fn handle_pager_event(&mut self, controller: Option<&dyn PageContent>, event: PagerEvent) {
        match event {
            PagerEvent::PageSelected { index } => self.on_page_selected(controller, index),
            PagerEvent::ContentOffsetChanged { offset_y, index } => {
                self.on_page_content_offset_changed(controller, offset_y, index)
            }
        }
    }

    /// The header was laid out with a new height
    ///
    /// Ignored while a gesture is in flight; the next layout pass after the
    /// gesture picks it up.
    pub fn on_header_bounds_changed(&mut self, height: f64) {
        let overlay = self.sync.overlay();
        if overlay.is_dragging() || overlay.is_decelerating() {
            return;
        }
        if self.header_measured_height == Some(height) {
            return;
        }
        self.header_measured_height = Some(height);

        let scrollable = self
            .pages
            .surface(self.active_page)
            .is_some_and(|surface| surface.is_scrollable());
        if scrollable {
            self.resize_active();
        }
        self.process_notifications();
    }

    /// The coordinating view was laid out with a new frame
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.sync.set_viewport(viewport) {
            self.resize_active();
            self.process_notifications();
        }
    }

    /// Handle queued surface notifications
    pub fn process_notifications(&mut self) {
        while let Some(notification) = self.pages.next_notification() {
            match notification {
                SurfaceNotification::ContentSizeChanged { page, .. } => {
                    if page == self.active_page {
                        self.resize_active();
                    }
                }
            }
        }
    }

    pub fn container(&self) -> &Rc<ScrollView> {
        self.sync.container()
    }

    pub fn overlay(&self) -> &Rc<ScrollView> {
        self.sync.overlay()
    }

    pub fn active_page(&self) -> PageId {
        self.active_page
    }

    pub fn page_state(&self, page: PageId) -> Option<&PageState> {
        self.pages.get(page)
    }

    pub fn active_surface(&self) -> Option<Rc<dyn PanSurface>> {
        self.pages.surface(self.active_page)
    }

    pub fn sync_config(&self) -> &SyncConfig {
        self.sync.config()
    }

    pub fn top_height(&self) -> f64 {
        self.metrics().top_height()
    }

    pub fn progress(&self) -> f64 {
        self.sync.progress()
    }

    pub fn state(&self) -> SyncState {
        SyncState {
            active_page: self.active_page,
            container_offset_y: self.sync.container().content_offset_y(),
            overlay_offset_y: self.sync.overlay().content_offset_y(),
            header_measured_height: self.header_measured_height,
            progress: self.sync.progress(),
        }
    }

    fn metrics(&self) -> Metrics {
        Metrics::resolve(&*self.geometry, self.sync.config().default_tab_height)
    }

    /// Move the overlay, running the scroll pass only if the offset changed
    fn scroll_overlay_to(&mut self, offset_y: f64) {
        if self.sync.overlay().content_offset_y() == offset_y {
            return;
        }
        self.sync.overlay().set_content_offset_y(offset_y);
        self.did_scroll();
    }

    fn did_scroll(&mut self) {
        let raw_offset_y = self.sync.overlay().content_offset_y();
        let active = self.active_page;

        if let Some(size) = self.sync.apply_pending(&mut self.pages, active) {
            debug!(page = active, height = size.height, "Applied deferred content size");
        }
        self.pages.remember_offset(active, raw_offset_y);

        let metrics = self.metrics();
        let outcome = self.sync.split(raw_offset_y, &metrics, &mut self.pages, active);
        self.emit_scroll_update(outcome.progress);
    }

    fn emit_scroll_update(&mut self, progress: f64) {
        let Some(delegate) = self.delegate.as_mut() else {
            return;
        };
        let surface = self.pages.surface(self.active_page);
        let update = ScrollUpdate {
            container: self.sync.container(),
            progress,
            overlay: self.sync.overlay(),
            active_pan_surface: surface.as_deref(),
            page_index: self.active_page,
        };
        delegate.on_scroll_update(&update);
    }

    fn observe_pan_view(&mut self, controller: Option<&dyn PageContent>, page: PageId) {
        let Some(surface) = controller.and_then(|c| c.pan_view()) else {
            return;
        };
        match self.pages.track_surface(page, surface) {
            Tracking::Unchanged => {}
            Tracking::Tracked => debug!(page, "Tracking page surface"),
            Tracking::Replaced => debug!(page, "Page surface replaced"),
        }
    }

    fn resize_active(&mut self) {
        let page = self.active_page;
        let Some(surface) = self.pages.surface(page) else {
            return;
        };
        let metrics = self.metrics();
        if let Resize::Deferred(size) =
            self.sync.resize(page, &*surface, &metrics, &mut self.pages)
        {
            debug!(page, height = size.height, "Content size deferred during overscroll");
        }
    }
}

impl Drop for PageCoordinator {
    fn drop(&mut self) {
        self.pages.release_all();
    }
}
