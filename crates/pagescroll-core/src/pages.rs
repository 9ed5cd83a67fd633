//! Per-page scroll memory
//!
//! Every page the coordinator has seen gets a [`PageState`]: its remembered
//! overlay offset, the last content size computed for it, a content size held
//! back during overscroll, and the surface being tracked for it.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::{Rc, Weak};

use crate::surface::{PanSurface, Size, SizeListener, Subscription};

/// Index of a page inside the pager
pub type PageId = usize;

/// Event raised by a tracked surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceNotification {
    ContentSizeChanged { page: PageId, size: Size },
}

type Inbox = Rc<RefCell<VecDeque<SurfaceNotification>>>;

#[derive(Debug, Default)]
pub struct PageState {
    /// Overlay offset to restore when the page becomes active again
    pub last_offset_y: Option<f64>,
    /// Overlay content size last computed for this page
    pub observed_content_size: Option<Size>,
    /// Content size waiting for the overlay to leave overscroll
    pub pending_content_size: Option<Size>,
    surface: Option<Weak<dyn PanSurface>>,
    subscription: Option<Subscription>,
}

impl PageState {
    /// The tracked surface, if it is still alive
    pub fn surface(&self) -> Option<Rc<dyn PanSurface>> {
        self.surface.as_ref().and_then(Weak::upgrade)
    }

    pub fn is_tracked(&self) -> bool {
        self.subscription.is_some()
    }

    fn release(&mut self) {
        self.subscription = None;
        self.surface = None;
    }
}

/// Result of handing a surface to [`PageStore::track_surface`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tracking {
    /// Same surface as before; nothing changed
    Unchanged,
    /// First surface for the page
    Tracked,
    /// A different surface replaced the previous one
    Replaced,
}

#[derive(Debug, Default)]
pub struct PageStore {
    pages: BTreeMap<PageId, PageState>,
    inbox: Inbox,
}

impl PageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, page: PageId) -> Option<&PageState> {
        self.pages.get(&page)
    }

    fn entry(&mut self, page: PageId) -> &mut PageState {
        self.pages.entry(page).or_default()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn remembered_offset(&self, page: PageId) -> Option<f64> {
        self.pages.get(&page).and_then(|state| state.last_offset_y)
    }

    pub fn remember_offset(&mut self, page: PageId, offset_y: f64) {
        self.entry(page).last_offset_y = Some(offset_y);
    }

    /// Forget every remembered offset. Tracked surfaces and sizes stay.
    pub fn clear_remembered_offsets(&mut self) {
        for state in self.pages.values_mut() {
            state.last_offset_y = None;
        }
    }

    pub fn surface(&self, page: PageId) -> Option<Rc<dyn PanSurface>> {
        self.pages.get(&page).and_then(PageState::surface)
    }

    /// Snapshot of all live tracked surfaces
    ///
    /// Callers mutate surfaces through the snapshot so notifications raised
    /// meanwhile cannot invalidate the walk.
    pub fn tracked_surfaces(&self) -> Vec<(PageId, Rc<dyn PanSurface>)> {
        self.pages
            .iter()
            .filter_map(|(page, state)| state.surface().map(|surface| (*page, surface)))
            .collect()
    }

    /// Track `surface` for `page`, replacing and unsubscribing any other one
    pub fn track_surface(&mut self, page: PageId, surface: Rc<dyn PanSurface>) -> Tracking {
        let listener = self.listener_for(page);
        let state = self.entry(page);

        if let Some(current) = state.surface() {
            if Rc::ptr_eq(&current, &surface) {
                return Tracking::Unchanged;
            }
        }

        let outcome = if state.surface.is_some() {
            Tracking::Replaced
        } else {
            Tracking::Tracked
        };

        // Old listener goes first so it can't fire for the new surface's page
        state.subscription = None;
        state.subscription = Some(Subscription::observe(&surface, listener));
        state.surface = Some(Rc::downgrade(&surface));
        outcome
    }

    pub fn set_observed_size(&mut self, page: PageId, size: Size) {
        self.entry(page).observed_content_size = Some(size);
    }

    pub fn set_pending(&mut self, page: PageId, size: Size) {
        self.entry(page).pending_content_size = Some(size);
    }

    pub fn take_pending(&mut self, page: PageId) -> Option<Size> {
        self.pages
            .get_mut(&page)
            .and_then(|state| state.pending_content_size.take())
    }

    /// Drop every subscription and surface reference
    pub fn release_all(&mut self) {
        for state in self.pages.values_mut() {
            state.release();
        }
        self.inbox.borrow_mut().clear();
    }

    /// Pop the oldest queued surface notification
    pub fn next_notification(&self) -> Option<SurfaceNotification> {
        self.inbox.borrow_mut().pop_front()
    }

    fn listener_for(&self, page: PageId) -> SizeListener {
        let inbox = Rc::downgrade(&self.inbox);
        Rc::new(move |size| {
            if let Some(inbox) = inbox.upgrade() {
                inbox
                    .borrow_mut()
                    .push_back(SurfaceNotification::ContentSizeChanged { page, size });
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::ScrollView;

    fn scroll_view() -> (Rc<ScrollView>, Rc<dyn PanSurface>) {
        let view = Rc::new(ScrollView::new(Size::new(100.0, 300.0)));
        let surface: Rc<dyn PanSurface> = view.clone();
        (view, surface)
    }

    #[test]
    fn test_track_then_same_surface_is_unchanged() {
        let mut store = PageStore::new();
        let (view, surface) = scroll_view();

        assert_eq!(store.track_surface(0, Rc::clone(&surface)), Tracking::Tracked);
        assert_eq!(store.track_surface(0, Rc::clone(&surface)), Tracking::Unchanged);
        assert_eq!(view.observer_count(), 1);
        assert!(store.get(0).unwrap().is_tracked());
    }

    #[test]
    fn test_replacing_surface_moves_subscription() {
        let mut store = PageStore::new();
        let (old_view, old_surface) = scroll_view();
        let (new_view, new_surface) = scroll_view();

        store.track_surface(2, old_surface);
        assert_eq!(store.track_surface(2, new_surface), Tracking::Replaced);
        assert_eq!(old_view.observer_count(), 0);
        assert_eq!(new_view.observer_count(), 1);

        old_view.set_content_size(Size::new(100.0, 999.0));
        assert!(store.next_notification().is_none());
    }

    #[test]
    fn test_size_change_queues_notification() {
        let mut store = PageStore::new();
        let (view, surface) = scroll_view();
        store.track_surface(1, surface);

        view.set_content_size(Size::new(100.0, 800.0));
        assert_eq!(
            store.next_notification(),
            Some(SurfaceNotification::ContentSizeChanged {
                page: 1,
                size: Size::new(100.0, 800.0),
            })
        );
        assert!(store.next_notification().is_none());
    }

    #[test]
    fn test_clear_offsets_keeps_surfaces() {
        let mut store = PageStore::new();
        let (_view, surface) = scroll_view();
        store.track_surface(0, surface);
        store.remember_offset(0, 120.0);
        store.remember_offset(1, 40.0);

        store.clear_remembered_offsets();
        assert_eq!(store.remembered_offset(0), None);
        assert_eq!(store.remembered_offset(1), None);
        assert_eq!(store.tracked_surfaces().len(), 1);
    }

    #[test]
    fn test_pending_taken_once() {
        let mut store = PageStore::new();
        store.set_pending(0, Size::new(1.0, 2.0));
        assert_eq!(store.take_pending(0), Some(Size::new(1.0, 2.0)));
        assert_eq!(store.take_pending(0), None);
        assert_eq!(store.take_pending(7), None);
    }

    #[test]
    fn test_release_all_unsubscribes() {
        let mut store = PageStore::new();
        let (view, surface) = scroll_view();
        store.track_surface(0, surface);
        store.remember_offset(0, 10.0);

        store.release_all();
        assert_eq!(view.observer_count(), 0);
        assert!(store.surface(0).is_none());
        assert_eq!(store.remembered_offset(0), Some(10.0));
    }

    #[test]
    fn test_dropped_surface_reads_as_absent() {
        let mut store = PageStore::new();
        let (view, surface) = scroll_view();
        store.track_surface(0, surface);
        drop(view);
        assert!(store.surface(0).is_none());
        assert!(store.tracked_surfaces().is_empty());
    }
}
