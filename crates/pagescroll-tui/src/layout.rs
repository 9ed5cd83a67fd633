//! Screen bands for a container offset
//!
//! Maps the container's scroll position to how many terminal rows the
//! header, the tab bar and the page each get.

use pagescroll_core::geometry::Metrics;
use ratatui::layout::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bands {
    pub header: u16,
    pub tabs: u16,
    pub page: u16,
}

impl Bands {
    pub fn compute(height: u16, metrics: &Metrics, container_y: f64) -> Self {
        // Where the header would end if nothing were pinned
        let header_bottom = metrics.header_height - container_y;
        let header = header_bottom.max(metrics.min_header_height);
        let tabs = if metrics.sticky_tab {
            metrics.tab_height
        } else {
            // Slides under the pinned header
            (header_bottom + metrics.tab_height - header).clamp(0.0, metrics.tab_height)
        };

        let header = to_rows(header).min(height);
        let tabs = to_rows(tabs).min(height - header);
        Self {
            header,
            tabs,
            page: height - header - tabs,
        }
    }

    /// Split `area` top to bottom into header, tab bar and page rects
    pub fn split(&self, area: Rect) -> (Rect, Rect, Rect) {
        let header = Rect { height: self.header, ..area };
        let tabs = Rect {
            y: area.y + self.header,
            height: self.tabs,
            ..area
        };
        let page = Rect {
            y: tabs.y + self.tabs,
            height: self.page,
            ..area
        };
        (header, tabs, page)
    }
}

fn to_rows(value: f64) -> u16 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, f64::from(u16::MAX)) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(sticky: bool) -> Metrics {
        Metrics {
            min_header_height: 3.0,
            header_height: 10.0,
            page_content_top: 10.0,
            tab_height: 1.0,
            sticky_tab: sticky,
        }
    }

    #[test]
    fn test_expanded_and_collapsed() {
        let expanded = Bands::compute(30, &metrics(true), 0.0);
        assert_eq!(expanded, Bands { header: 10, tabs: 1, page: 19 });

        let collapsed = Bands::compute(30, &metrics(true), 7.0);
        assert_eq!(collapsed, Bands { header: 3, tabs: 1, page: 26 });
    }

    #[test]
    fn test_overscroll_stretches_header() {
        let bands = Bands::compute(30, &metrics(true), -4.0);
        assert_eq!(bands.header, 14);
        assert_eq!(bands.page, 15);
    }

    #[test]
    fn test_non_sticky_tab_slides_away() {
        let bands = Bands::compute(30, &metrics(false), 8.0);
        assert_eq!(bands, Bands { header: 3, tabs: 0, page: 27 });
    }

    #[test]
    fn test_tiny_terminal_never_underflows() {
        let bands = Bands::compute(5, &metrics(true), -20.0);
        assert_eq!(bands, Bands { header: 5, tabs: 0, page: 0 });
    }

    #[test]
    fn test_split_stacks_rects() {
        let bands = Bands { header: 4, tabs: 1, page: 5 };
        let (header, tabs, page) = bands.split(Rect::new(0, 2, 40, 10));
        assert_eq!((header.y, header.height), (2, 4));
        assert_eq!((tabs.y, tabs.height), (6, 1));
        assert_eq!((page.y, page.height), (7, 5));
    }
}
