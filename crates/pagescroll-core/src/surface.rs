//! Scrollable surfaces and their content-size subscriptions
//!
//! A surface is anything a page hands over for tracking: a list that scrolls on
//! its own, or a plain view that does not. The coordinator never owns page
//! surfaces. It keeps a `Weak` handle plus a [`Subscription`] that is released
//! when the surface is replaced or the coordinator goes away.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

/// Width/height pair in layout units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Callback invoked with the new content size of an observed surface
pub type SizeListener = Rc<dyn Fn(Size)>;

/// Handle returned by [`PanSurface::add_size_observer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverToken(u64);

/// A page view whose scrolling has to follow the container
pub trait PanSurface {
    /// Whether the surface scrolls its own content
    fn is_scrollable(&self) -> bool;

    /// Size of the surface's frame
    fn frame_size(&self) -> Size;

    /// Size of the scrollable content (frame size for plain views)
    fn content_size(&self) -> Size;

    fn content_inset_top(&self) -> f64;

    fn content_offset_y(&self) -> f64;

    fn set_content_offset_y(&self, y: f64);

    /// Register a content-size listener
    fn add_size_observer(&self, listener: SizeListener) -> ObserverToken;

    /// Remove a listener. Unknown tokens are ignored.
    fn remove_size_observer(&self, token: ObserverToken);
}

/// RAII registration of a size listener on a surface
///
/// Dropping the subscription removes the listener if the surface is still alive.
#[derive(Debug)]
pub struct Subscription {
    surface: Weak<dyn PanSurface>,
    token: ObserverToken,
}

impl Subscription {
    pub fn observe(surface: &Rc<dyn PanSurface>, listener: SizeListener) -> Self {
        let token = surface.add_size_observer(listener);
        Self {
            surface: Rc::downgrade(surface),
            token,
        }
    }

    /// Check whether this subscription belongs to `surface`
    pub fn is_for(&self, surface: &Rc<dyn PanSurface>) -> bool {
        Weak::ptr_eq(&self.surface, &Rc::downgrade(surface))
    }

    pub fn token(&self) -> ObserverToken {
        self.token
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(surface) = self.surface.upgrade() {
            surface.remove_size_observer(self.token);
        }
    }
}

/// In-memory scroll view
///
/// Used for the container and overlay surfaces the coordinator creates, and by
/// hosts that model their page content without a platform view.
pub struct ScrollView {
    scrollable: bool,
    frame: Cell<Size>,
    content_size: Cell<Size>,
    content_inset_top: Cell<f64>,
    content_offset_y: Cell<f64>,
    dragging: Cell<bool>,
    decelerating: Cell<bool>,
    observers: RefCell<Vec<(ObserverToken, SizeListener)>>,
    next_token: Cell<u64>,
}

impl std::fmt::Debug for ScrollView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollView")
            .field("scrollable", &self.scrollable)
            .field("frame", &self.frame.get())
            .field("content_size", &self.content_size.get())
            .field("content_inset_top", &self.content_inset_top.get())
            .field("content_offset_y", &self.content_offset_y.get())
            .field("observers", &self.observers.borrow().len())
            .finish()
    }
}

impl ScrollView {
    /// Create a scrollable view with the given frame
    pub fn new(frame: Size) -> Self {
        Self::with_kind(frame, true)
    }

    /// Create a view that does not scroll its own content
    pub fn plain(frame: Size) -> Self {
        Self::with_kind(frame, false)
    }

    fn with_kind(frame: Size, scrollable: bool) -> Self {
        Self {
            scrollable,
            frame: Cell::new(frame),
            content_size: Cell::new(if scrollable { Size::ZERO } else { frame }),
            content_inset_top: Cell::new(0.0),
            content_offset_y: Cell::new(0.0),
            dragging: Cell::new(false),
            decelerating: Cell::new(false),
            observers: RefCell::new(Vec::new()),
            next_token: Cell::new(0),
        }
    }

    /// Builder-style content size
    pub fn with_content_size(self, size: Size) -> Self {
        self.content_size.set(size);
        self
    }

    /// Builder-style top inset
    pub fn with_inset_top(self, inset: f64) -> Self {
        self.content_inset_top.set(inset);
        self
    }

    /// Update the content size and notify observers when it changed
    pub fn set_content_size(&self, size: Size) {
        if self.content_size.get() == size {
            return;
        }
        self.content_size.set(size);

        // Listeners may add or remove observers while being called
        let listeners: Vec<SizeListener> = self
            .observers
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(size);
        }
    }

    pub fn set_frame(&self, frame: Size) {
        self.frame.set(frame);
        if !self.scrollable {
            self.set_content_size(frame);
        }
    }

    pub fn set_content_inset_top(&self, inset: f64) {
        self.content_inset_top.set(inset);
    }

    pub fn frame(&self) -> Size {
        self.frame.get()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.get()
    }

    pub fn set_dragging(&self, dragging: bool) {
        self.dragging.set(dragging);
    }

    pub fn is_decelerating(&self) -> bool {
        self.decelerating.get()
    }

    pub fn set_decelerating(&self, decelerating: bool) {
        self.decelerating.set(decelerating);
    }

    /// Number of registered size observers
    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    /// Largest offset that keeps the bottom edge of the content inside the frame
    pub fn max_offset_y(&self) -> f64 {
        (self.content_size.get().height - self.frame.get().height).max(0.0)
    }
}

impl PanSurface for ScrollView {
    fn is_scrollable(&self) -> bool {
        self.scrollable
    }

    fn frame_size(&self) -> Size {
        self.frame.get()
    }

    fn content_size(&self) -> Size {
        self.content_size.get()
    }

    fn content_inset_top(&self) -> f64 {
        self.content_inset_top.get()
    }

    fn content_offset_y(&self) -> f64 {
        self.content_offset_y.get()
    }

    fn set_content_offset_y(&self, y: f64) {
        self.content_offset_y.set(y);
    }

    fn add_size_observer(&self, listener: SizeListener) -> ObserverToken {
        let token = ObserverToken(self.next_token.get());
        self.next_token.set(self.next_token.get() + 1);
        self.observers.borrow_mut().push((token, listener));
        token
    }

    fn remove_size_observer(&self, token: ObserverToken) {
        self.observers.borrow_mut().retain(|(t, _)| *t != token);
    }
}
