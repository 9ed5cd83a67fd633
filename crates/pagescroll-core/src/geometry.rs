//! Geometry provider interface
//!
//! The coordinator reads header and pager measurements through these traits.
//! Hosts implement them on top of whatever layout system they render with;
//! [`StaticGeometry`] is a ready-made implementation driven by [`LayoutConfig`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::pages::PageId;
use crate::surface::PanSurface;

/// A page controller inside the pager
pub trait PageContent {
    /// The view whose scrolling follows the container, if it exists yet
    fn pan_view(&self) -> Option<Rc<dyn PanSurface>>;
}

/// The paging widget below the header
pub trait PagedContent {
    /// Height of the tab bar. `None` means "use the default".
    fn pager_tab_height(&self) -> Option<f64>;

    /// Whether the tab bar stays pinned under the collapsed header
    fn sticky_pager_tab(&self) -> bool;

    /// The page currently shown
    fn current_page(&self) -> Option<Rc<dyn PageContent>>;
}

/// Supplies header and pager geometry to the coordinator
pub trait GeometryProvider {
    /// Height the header collapses down to
    fn min_header_height(&self) -> f64;

    /// Current laid-out header height
    fn header_height(&self) -> f64;

    /// Y position of the pager inside the container
    fn page_content_top(&self) -> f64 {
        self.header_height()
    }

    fn pager(&self) -> &dyn PagedContent;
}

/// Frame of the coordinating view
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    /// Bottom safe-area inset
    #[serde(default)]
    pub bottom_inset: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            bottom_inset: 0.0,
        }
    }

    pub fn with_bottom_inset(mut self, bottom_inset: f64) -> Self {
        self.bottom_inset = bottom_inset;
        self
    }
}

/// Geometry values resolved once per computation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub min_header_height: f64,
    pub header_height: f64,
    pub page_content_top: f64,
    pub tab_height: f64,
    pub sticky_tab: bool,
}

impl Metrics {
    pub fn resolve(provider: &dyn GeometryProvider, default_tab_height: f64) -> Self {
        let pager = provider.pager();
        Self {
            min_header_height: provider.min_header_height(),
            header_height: provider.header_height(),
            page_content_top: provider.page_content_top(),
            tab_height: pager.pager_tab_height().unwrap_or(default_tab_height),
            sticky_tab: pager.sticky_pager_tab(),
        }
    }

    /// Extra collapse distance when the tab bar scrolls away with the header
    pub fn sticky_tab_offset(&self) -> f64 {
        if self.sticky_tab {
            0.0
        } else {
            self.tab_height
        }
    }

    /// Container offset at which the header is fully collapsed
    pub fn top_height(&self) -> f64 {
        self.page_content_top - self.min_header_height + self.sticky_tab_offset()
    }
}

/// Page whose surface can be attached after construction
#[derive(Default)]
pub struct StaticPage {
    surface: RefCell<Option<Rc<dyn PanSurface>>>,
}

impl StaticPage {
    pub fn new(surface: Option<Rc<dyn PanSurface>>) -> Self {
        Self {
            surface: RefCell::new(surface),
        }
    }

    /// Attach or replace the page's surface
    pub fn set_surface(&self, surface: Option<Rc<dyn PanSurface>>) {
        *self.surface.borrow_mut() = surface;
    }
}

impl PageContent for StaticPage {
    fn pan_view(&self) -> Option<Rc<dyn PanSurface>> {
        self.surface.borrow().clone()
    }
}

/// Pager over a fixed list of pages
pub struct StaticPager {
    pages: Vec<Rc<StaticPage>>,
    current: Cell<PageId>,
    tab_height: Option<f64>,
    sticky: bool,
}

impl StaticPager {
    pub fn new(pages: Vec<Rc<StaticPage>>, tab_height: Option<f64>, sticky: bool) -> Self {
        Self {
            pages,
            current: Cell::new(0),
            tab_height,
            sticky,
        }
    }

    pub fn page(&self, index: PageId) -> Option<&Rc<StaticPage>> {
        self.pages.get(index)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn current_index(&self) -> PageId {
        self.current.get()
    }

    /// Switch the visible page. Out-of-range indices are ignored.
    pub fn select(&self, index: PageId) -> Option<Rc<StaticPage>> {
        let page = self.pages.get(index)?;
        self.current.set(index);
        Some(Rc::clone(page))
    }
}

impl PagedContent for StaticPager {
    fn pager_tab_height(&self) -> Option<f64> {
        self.tab_height
    }

    fn sticky_pager_tab(&self) -> bool {
        self.sticky
    }

    fn current_page(&self) -> Option<Rc<dyn PageContent>> {
        self.pages
            .get(self.current.get())
            .map(|page| Rc::clone(page) as Rc<dyn PageContent>)
    }
}

/// Geometry driven by configuration, with a header that can be re-measured
pub struct StaticGeometry {
    header_height: Cell<f64>,
    min_header_height: f64,
    pager: StaticPager,
}

impl StaticGeometry {
    pub fn new(layout: &LayoutConfig, pages: Vec<Rc<StaticPage>>) -> Self {
        Self {
            header_height: Cell::new(layout.header_height),
            min_header_height: layout.min_header_height,
            pager: StaticPager::new(pages, layout.pager_tab_height, layout.sticky_pager_tab),
        }
    }

    pub fn set_header_height(&self, height: f64) {
        self.header_height.set(height);
    }

    pub fn static_pager(&self) -> &StaticPager {
        &self.pager
    }
}

impl GeometryProvider for StaticGeometry {
    fn min_header_height(&self) -> f64 {
        self.min_header_height
    }

    fn header_height(&self) -> f64 {
        self.header_height.get()
    }

    fn pager(&self) -> &dyn PagedContent {
        &self.pager
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{ScrollView, Size};

    fn layout(sticky: bool) -> LayoutConfig {
        LayoutConfig {
            header_height: 200.0,
            min_header_height: 60.0,
            pager_tab_height: Some(40.0),
            sticky_pager_tab: sticky,
            bottom_inset: 0.0,
        }
    }

    #[test]
    fn test_top_height_sticky() {
        let geometry = StaticGeometry::new(&layout(true), vec![]);
        let metrics = Metrics::resolve(&geometry, 44.0);
        assert_eq!(metrics.top_height(), 140.0);
    }

    #[test]
    fn test_top_height_non_sticky_adds_tab() {
        let geometry = StaticGeometry::new(&layout(false), vec![]);
        let metrics = Metrics::resolve(&geometry, 44.0);
        assert_eq!(metrics.top_height(), 180.0);
    }

    #[test]
    fn test_default_tab_height_fallback() {
        let mut config = layout(false);
        config.pager_tab_height = None;
        let geometry = StaticGeometry::new(&config, vec![]);
        let metrics = Metrics::resolve(&geometry, 44.0);
        assert_eq!(metrics.tab_height, 44.0);
        assert_eq!(metrics.top_height(), 184.0);
    }

    #[test]
    fn test_pager_select_and_late_surface() {
        let page = Rc::new(StaticPage::default());
        let geometry = StaticGeometry::new(&layout(true), vec![Rc::clone(&page)]);
        let pager = geometry.static_pager();

        assert!(pager.select(3).is_none());
        assert_eq!(pager.current_index(), 0);

        let current = geometry.pager().current_page().unwrap();
        assert!(current.pan_view().is_none());

        let surface: Rc<dyn PanSurface> = Rc::new(ScrollView::new(Size::new(1.0, 1.0)));
        page.set_surface(Some(surface));
        assert!(current.pan_view().is_some());
    }
}
