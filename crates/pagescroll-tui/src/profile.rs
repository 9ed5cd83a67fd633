//! Demo profile screen
//!
//! A header with an expandable bio, a tab bar and a set of pages. Pages
//! create their scroll surface the first time the coordinator asks for it,
//! the way a pager instantiates page controllers lazily.

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use pagescroll_core::geometry::{GeometryProvider, PageContent, PagedContent};
use pagescroll_core::{LayoutConfig, PageId, PanSurface, ScrollView, Size};

/// Height of the tab bar in rows when the layout leaves it unset
pub const TAB_BAR_ROWS: f64 = 1.0;

/// Extra header rows shown while the bio is expanded
pub const BIO_ROWS: f64 = 3.0;

/// Tab title, initial row count, scrollable
const DEMO_TABS: [(&str, usize, bool); 4] = [
    ("Posts", 120, true),
    ("Replies", 45, true),
    ("Media", 12, true),
    ("About", 6, false),
];

pub struct DemoPage {
    title: String,
    scrollable: bool,
    rows: RefCell<Vec<String>>,
    frame: Cell<Size>,
    surface: RefCell<Option<Rc<ScrollView>>>,
}

impl DemoPage {
    pub fn new(title: impl Into<String>, rows: Vec<String>, scrollable: bool) -> Self {
        Self {
            title: title.into(),
            scrollable,
            rows: RefCell::new(rows),
            frame: Cell::new(Size::ZERO),
            surface: RefCell::new(None),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_scrollable(&self) -> bool {
        self.scrollable
    }

    pub fn rows(&self) -> Ref<'_, Vec<String>> {
        self.rows.borrow()
    }

    pub fn row_count(&self) -> usize {
        self.rows.borrow().len()
    }

    /// The scroll surface, if the page has been shown yet
    pub fn surface(&self) -> Option<Rc<ScrollView>> {
        self.surface.borrow().clone()
    }

    /// Append `count` generated rows
    pub fn grow(&self, count: usize) {
        {
            let mut rows = self.rows.borrow_mut();
            let start = rows.len();
            rows.extend((start..start + count).map(|i| demo_row(&self.title, i)));
        }
        self.sync_surface();
    }

    /// Remove up to `count` rows from the end, keeping at least one
    pub fn shrink(&self, count: usize) {
        {
            let mut rows = self.rows.borrow_mut();
            let keep = rows.len().saturating_sub(count).max(1);
            rows.truncate(keep);
        }
        self.sync_surface();
    }

    /// Size of the area the page is shown in
    pub fn set_frame(&self, frame: Size) {
        self.frame.set(frame);
        if let Some(surface) = self.surface() {
            surface.set_frame(frame);
        }
        self.sync_surface();
    }

    fn content_size(&self) -> Size {
        Size::new(self.frame.get().width, self.row_count() as f64)
    }

    /// Push the row count to the surface; observers hear about the change
    fn sync_surface(&self) {
        let Some(surface) = self.surface() else {
            return;
        };
        if self.scrollable {
            surface.set_content_size(self.content_size());
        } else {
            surface.set_frame(self.content_size());
        }
    }

    fn ensure_surface(&self) -> Rc<ScrollView> {
        if let Some(surface) = self.surface() {
            return surface;
        }
        let surface = Rc::new(if self.scrollable {
            ScrollView::new(self.frame.get()).with_content_size(self.content_size())
        } else {
            ScrollView::plain(self.content_size())
        });
        *self.surface.borrow_mut() = Some(Rc::clone(&surface));
        surface
    }
}

impl PageContent for DemoPage {
    fn pan_view(&self) -> Option<Rc<dyn PanSurface>> {
        Some(self.ensure_surface() as Rc<dyn PanSurface>)
    }
}

fn demo_row(title: &str, index: usize) -> String {
    const SNIPPETS: [&str; 6] = [
        "shipped a new build, release notes below",
        "anyone else seeing the header snap on fast flicks?",
        "coffee first, then the pager refactor",
        "thread: what we learned moving scroll sync off the main loop",
        "photo dump from the weekend",
        "reminder that overscroll is a feature",
    ];
    format!(
        "{} #{:<4} {}",
        title,
        index + 1,
        SNIPPETS[index % SNIPPETS.len()]
    )
}

/// Header, tab bar and pages of the demo profile
pub struct ProfileScreen {
    pages: Vec<Rc<DemoPage>>,
    current: Cell<PageId>,
    base_header_height: f64,
    min_header_height: f64,
    tab_height: f64,
    sticky_tab: bool,
    bio_expanded: Cell<bool>,
}

impl ProfileScreen {
    pub fn new(layout: &LayoutConfig, pages: Vec<Rc<DemoPage>>) -> Self {
        Self {
            pages,
            current: Cell::new(0),
            base_header_height: layout.header_height,
            min_header_height: layout.min_header_height,
            tab_height: layout.pager_tab_height.unwrap_or(TAB_BAR_ROWS),
            sticky_tab: layout.sticky_pager_tab,
            bio_expanded: Cell::new(false),
        }
    }

    /// Screen with `page_count` generated pages
    pub fn demo(layout: &LayoutConfig, page_count: usize) -> Self {
        let pages = (0..page_count.max(1))
            .map(|i| {
                let (name, rows, scrollable) = DEMO_TABS[i % DEMO_TABS.len()];
                let title = if i < DEMO_TABS.len() {
                    name.to_string()
                } else {
                    format!("{} {}", name, i / DEMO_TABS.len() + 1)
                };
                let content = (0..rows).map(|r| demo_row(&title, r)).collect();
                Rc::new(DemoPage::new(title, content, scrollable))
            })
            .collect();
        Self::new(layout, pages)
    }

    pub fn pages(&self) -> &[Rc<DemoPage>] {
        &self.pages
    }

    pub fn page(&self, index: PageId) -> Option<&Rc<DemoPage>> {
        self.pages.get(index)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn current_index(&self) -> PageId {
        self.current.get()
    }

    pub fn current(&self) -> Option<&Rc<DemoPage>> {
        self.pages.get(self.current.get())
    }

    /// Switch the visible page. Out-of-range indices are ignored.
    pub fn select(&self, index: PageId) -> Option<Rc<DemoPage>> {
        let page = self.pages.get(index)?;
        self.current.set(index);
        Some(Rc::clone(page))
    }

    pub fn tab_height(&self) -> f64 {
        self.tab_height
    }

    pub fn is_bio_expanded(&self) -> bool {
        self.bio_expanded.get()
    }

    pub fn toggle_bio(&self) {
        self.bio_expanded.set(!self.bio_expanded.get());
    }
}

impl PagedContent for ProfileScreen {
    fn pager_tab_height(&self) -> Option<f64> {
        Some(self.tab_height)
    }

    fn sticky_pager_tab(&self) -> bool {
        self.sticky_tab
    }

    fn current_page(&self) -> Option<Rc<dyn PageContent>> {
        self.current()
            .map(|page| Rc::clone(page) as Rc<dyn PageContent>)
    }
}

impl GeometryProvider for ProfileScreen {
    fn min_header_height(&self) -> f64 {
        self.min_header_height
    }

    fn header_height(&self) -> f64 {
        if self.bio_expanded.get() {
            self.base_header_height + BIO_ROWS
        } else {
            self.base_header_height
        }
    }

    fn pager(&self) -> &dyn PagedContent {
        self
    }
}
