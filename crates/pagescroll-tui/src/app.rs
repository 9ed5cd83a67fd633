use std::cell::RefCell;
use std::rc::Rc;

use pagescroll_core::geometry::{GeometryProvider, Metrics, PageContent};
use pagescroll_core::{
    AppConfig, PageCoordinator, PageId, PagerEvent, PanSurface, ProgressDelegate, ScrollUpdate,
    ScrollView, Size, Viewport,
};
use tracing::debug;

use crate::input::Action;
use crate::layout::Bands;
use crate::profile::{DemoPage, ProfileScreen};
use crate::scroll::{GesturePhase, OffsetAnimator};
use crate::theme::Theme;

/// Rows added or removed per grow / shrink keypress
const CONTENT_STEP: usize = 10;

/// Rows dragged past the top per pull keypress
const PULL_STEP: f64 = 4.0;

/// Last values reported through [`ProgressDelegate`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProgressSnapshot {
    pub progress: f64,
    pub page: PageId,
    pub page_offset_y: Option<f64>,
    pub ready: bool,
    pub updates: u64,
}

struct ProgressRecorder {
    snapshot: Rc<RefCell<ProgressSnapshot>>,
}

impl ProgressDelegate for ProgressRecorder {
    fn on_scroll_update(&mut self, update: &ScrollUpdate<'_>) {
        let mut snapshot = self.snapshot.borrow_mut();
        snapshot.progress = update.progress;
        snapshot.page = update.page_index;
        snapshot.page_offset_y = update.active_pan_surface.map(|s| s.content_offset_y());
        snapshot.updates += 1;
    }

    fn on_ready(&mut self, overlay: &ScrollView) {
        self.snapshot.borrow_mut().ready = true;
        debug!(height = overlay.content_size().height, "Profile screen ready");
    }
}

pub struct App {
    pub config: AppConfig,
    pub theme: Theme,
    pub screen: Rc<ProfileScreen>,
    pub coordinator: PageCoordinator,
    pub animator: OffsetAnimator,
    pub pending_key: Option<char>,
    pub status_message: Option<String>,
    pub should_quit: bool,
    progress: Rc<RefCell<ProgressSnapshot>>,
    viewport: Viewport,
    /// Page offset last reported back to the coordinator
    echoed_page_offset: Option<f64>,
}

impl App {
    pub fn new(config: AppConfig, theme: Theme) -> Self {
        let screen = Rc::new(ProfileScreen::demo(&config.layout, config.ui.page_count));
        let viewport = Viewport::new(80.0, 24.0).with_bottom_inset(config.layout.bottom_inset);

        let mut coordinator = PageCoordinator::new(
            Rc::clone(&screen) as Rc<dyn GeometryProvider>,
            config.sync,
            viewport,
        );
        let progress = Rc::new(RefCell::new(ProgressSnapshot::default()));
        coordinator.set_delegate(Box::new(ProgressRecorder {
            snapshot: Rc::clone(&progress),
        }));

        let mut app = Self {
            animator: OffsetAnimator::new(config.scroll.clone()),
            config,
            theme,
            screen,
            coordinator,
            pending_key: None,
            status_message: None,
            should_quit: false,
            progress,
            viewport,
            echoed_page_offset: None,
        };
        app.layout_pages();
        app.coordinator
            .on_header_bounds_changed(app.screen.header_height());
        app.coordinator.attach();
        app
    }

    /// The terminal was resized; the bottom row is kept for the status bar
    pub fn resize(&mut self, width: u16, height: u16) {
        self.viewport = Viewport::new(f64::from(width), f64::from(height.saturating_sub(1)))
            .with_bottom_inset(self.config.layout.bottom_inset);
        self.coordinator.set_viewport(self.viewport);
        self.layout_pages();
    }

    /// Advance one frame: header layout, gesture animation, page echo
    pub fn tick(&mut self) {
        let phase = self.animator.phase();
        {
            let overlay = self.coordinator.overlay();
            overlay.set_dragging(phase.is_dragging());
            overlay.set_decelerating(phase.is_decelerating());
        }

        // Layout pass; the coordinator ignores it mid-gesture
        self.coordinator
            .on_header_bounds_changed(self.screen.header_height());

        let max_offset = self.max_offset();
        let y = self.animator.update(max_offset);
        if y != self.coordinator.overlay().content_offset_y() {
            self.coordinator.on_user_scroll(y);
        }
        self.echo_page_offset();
    }

    pub fn handle_action(&mut self, action: Action) {
        if action != Action::PendingG {
            self.pending_key = None;
        }

        let max_offset = self.max_offset();
        let page_rows = self.page_area_rows();
        match action {
            Action::Quit => self.should_quit = true,
            Action::ScrollDown => self.animator.scroll_down(max_offset),
            Action::ScrollUp => self.animator.scroll_up(max_offset),
            Action::ScrollHalfPageDown => {
                self.animator.scroll_half_page_down(page_rows, max_offset)
            }
            Action::ScrollHalfPageUp => self.animator.scroll_half_page_up(page_rows, max_offset),
            Action::ScrollPageDown => self.animator.scroll_full_page_down(page_rows, max_offset),
            Action::ScrollPageUp => self.animator.scroll_full_page_up(page_rows, max_offset),
            Action::JumpToTop => self.animator.scroll_to(0.0, max_offset),
            Action::JumpToBottom => self.animator.scroll_to(max_offset, max_offset),
            Action::PendingG => self.pending_key = Some('g'),
            Action::PrevPage => {
                let current = self.screen.current_index();
                if current > 0 {
                    self.select_page(current - 1);
                }
            }
            Action::NextPage => self.select_page(self.screen.current_index() + 1),
            Action::SelectPage(index) => self.select_page(index),
            Action::Pull => self.animator.pull(PULL_STEP, self.viewport.height),
            Action::GrowContent => self.resize_current_page(|page| page.grow(CONTENT_STEP)),
            Action::ShrinkContent => self.resize_current_page(|page| page.shrink(CONTENT_STEP)),
            Action::ToggleBio => {
                self.screen.toggle_bio();
                let state = if self.screen.is_bio_expanded() {
                    "expanded"
                } else {
                    "folded"
                };
                self.status_message = Some(format!(" Bio {}", state));
            }
            Action::None => {}
        }
    }

    /// Show page `index`, restoring its remembered position
    pub fn select_page(&mut self, index: PageId) {
        let Some(page) = self.screen.select(index) else {
            return;
        };
        self.animator.cancel();
        self.coordinator.handle_pager_event(
            Some(&*page as &dyn PageContent),
            PagerEvent::PageSelected { index },
        );

        let overlay_y = self.coordinator.overlay().content_offset_y();
        self.animator.set_offset(overlay_y);
        if overlay_y < 0.0 {
            self.animator.scroll_to(0.0, self.max_offset());
        }
        self.echoed_page_offset = None;
        self.status_message = None;
    }

    pub fn progress(&self) -> ProgressSnapshot {
        *self.progress.borrow()
    }

    pub fn phase(&self) -> GesturePhase {
        self.animator.phase()
    }

    pub fn needs_fast_update(&self) -> bool {
        self.animator.needs_update()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn metrics(&self) -> Metrics {
        Metrics::resolve(
            &*self.screen,
            self.coordinator.sync_config().default_tab_height,
        )
    }

    /// Row split of a screen `height` rows tall at the current container offset
    pub fn bands(&self, height: u16) -> Bands {
        Bands::compute(
            height,
            &self.metrics(),
            self.coordinator.container().content_offset_y(),
        )
    }

    /// Index of the first page row visible below the tab bar
    pub fn page_first_row(&self) -> usize {
        let Some(page) = self.screen.current() else {
            return 0;
        };
        if !page.is_scrollable() {
            return 0;
        }
        page.surface()
            .map(|surface| {
                (surface.content_offset_y() + surface.content_inset_top())
                    .max(0.0)
                    .floor() as usize
            })
            .unwrap_or(0)
    }

    fn max_offset(&self) -> f64 {
        self.coordinator.overlay().max_offset_y()
    }

    /// Rows left for a page once the header is collapsed
    fn page_area_rows(&self) -> f64 {
        let metrics = self.metrics();
        (self.viewport.height - metrics.min_header_height - metrics.tab_height).max(1.0)
    }

    fn layout_pages(&mut self) {
        let frame = Size::new(self.viewport.width, self.page_area_rows());
        for page in self.screen.pages() {
            page.set_frame(frame);
        }
        self.coordinator.process_notifications();
    }

    fn resize_current_page(&mut self, change: impl FnOnce(&DemoPage)) {
        let Some(page) = self.screen.current().cloned() else {
            return;
        };
        change(&page);
        self.coordinator.process_notifications();
        self.status_message = Some(format!(" {}: {} rows", page.title(), page.row_count()));
    }

    /// Report the active page's own offset the way a pager delegate would
    fn echo_page_offset(&mut self) {
        let Some(surface) = self.coordinator.active_surface() else {
            self.echoed_page_offset = None;
            return;
        };
        let offset_y = surface.content_offset_y();
        if self.echoed_page_offset == Some(offset_y) {
            return;
        }
        self.echoed_page_offset = Some(offset_y);

        let index = self.screen.current_index();
        let page = self.screen.page(index).cloned();
        self.coordinator.handle_pager_event(
            page.as_deref().map(|p| p as &dyn PageContent),
            PagerEvent::ContentOffsetChanged { offset_y, index },
        );

        // The echo can settle the overlay onto the container while at rest
        let overlay_y = self.coordinator.overlay().content_offset_y();
        if !self.animator.is_animating() && self.animator.offset() != overlay_y {
            self.animator.set_offset(overlay_y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagescroll_core::ScrollConfig;

    fn instant_config(bounce_duration_ms: u64) -> AppConfig {
        AppConfig {
            scroll: ScrollConfig {
                smooth_enabled: false,
                bounce_duration_ms,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn app(bounce_duration_ms: u64) -> App {
        App::new(instant_config(bounce_duration_ms), Theme::default())
    }

    #[test]
    fn test_new_attaches_and_sizes_overlay() {
        let app = app(0);
        assert!(app.progress().ready);
        assert!(app.coordinator.is_attached());
        // 120 rows + 10 header + 1 tab bar
        assert_eq!(app.coordinator.overlay().content_size().height, 131.0);
    }

    #[test]
    fn test_jump_to_bottom_collapses_header() {
        let mut app = app(0);
        app.handle_action(Action::JumpToBottom);
        app.tick();

        assert_eq!(app.coordinator.overlay().content_offset_y(), 107.0);
        assert_eq!(app.coordinator.container().content_offset_y(), 7.0);
        assert_eq!(app.page_first_row(), 100);
        assert_eq!(app.progress().progress, 1.0);
        assert_eq!(app.bands(24).header, 3);
    }

    #[test]
    fn test_page_switch_restores_position() {
        let mut app = app(0);
        app.handle_action(Action::JumpToBottom);
        app.tick();

        app.handle_action(Action::NextPage);
        assert_eq!(app.screen.current_index(), 1);
        assert_eq!(app.coordinator.overlay().content_offset_y(), 7.0);
        assert_eq!(app.page_first_row(), 0);

        app.handle_action(Action::PrevPage);
        app.tick();
        assert_eq!(app.coordinator.overlay().content_offset_y(), 107.0);
        assert_eq!(app.page_first_row(), 100);
        assert_eq!(app.animator.offset(), 107.0);
    }

    #[test]
    fn test_pull_overscrolls_and_defers_resize() {
        let mut app = app(60_000);
        app.handle_action(Action::Pull);
        app.tick();

        let overlay = app.coordinator.overlay();
        assert!(overlay.content_offset_y() < 0.0);
        assert!(overlay.is_decelerating());
        assert!(app.bands(24).header > 10);

        app.handle_action(Action::GrowContent);
        let state = app.coordinator.page_state(0).unwrap();
        assert_eq!(
            state.pending_content_size.map(|s| s.height),
            Some(130.0 + 11.0)
        );
        assert_eq!(app.coordinator.overlay().content_size().height, 131.0);
    }

    #[test]
    fn test_bio_toggle_resizes_on_next_frame() {
        let mut app = app(0);
        app.handle_action(Action::ToggleBio);
        app.tick();
        assert_eq!(app.coordinator.overlay().content_size().height, 134.0);
        assert_eq!(app.coordinator.top_height(), 10.0);
    }

    #[test]
    fn test_gg_and_quit() {
        let mut app = app(0);
        app.handle_action(Action::PendingG);
        assert_eq!(app.pending_key, Some('g'));
        app.handle_action(Action::JumpToTop);
        assert_eq!(app.pending_key, None);

        app.handle_action(Action::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn test_resize_updates_page_frames() {
        let mut app = app(0);
        app.resize(100, 41);
        assert_eq!(app.viewport().height, 40.0);
        let surface = app.screen.pages()[0].surface().unwrap();
        assert_eq!(surface.frame().height, 36.0);
        assert_eq!(app.coordinator.overlay().content_size().width, 100.0);
    }
}
