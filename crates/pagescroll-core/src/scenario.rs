//! Scripted scroll scenarios
//!
//! A scenario describes a screen (layout, viewport, pages) and a list of steps
//! a host would deliver: overlay scrolls, page switches, nested page scrolls,
//! content and header size changes. [`replay`] feeds them through a
//! [`PageCoordinator`] and records the resulting offsets after every step.
//!
//! Scenarios are read from JSON or TOML depending on the file extension.

use std::fmt;
use std::path::Path;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::config::{LayoutConfig, SyncConfig};
use crate::coordinator::PageCoordinator;
use crate::geometry::{GeometryProvider, PageContent, StaticGeometry, StaticPage, Viewport};
use crate::pages::PageId;
use crate::surface::{PanSurface, ScrollView, Size};
use crate::sync::{classify, Regime};
use crate::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    pub viewport: Viewport,
    pub pages: Vec<PageSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One page of the pager
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSpec {
    /// Height of the page's own content
    pub content_height: f64,
    #[serde(default)]
    pub inset_top: f64,
    #[serde(default = "default_true")]
    pub scrollable: bool,
    /// Surface is only attached by an `attach_surface` step
    #[serde(default)]
    pub lazy: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// User moved the overlay to `y`
    Scroll { y: f64 },
    /// Pager switched to `index`
    SelectPage { index: PageId },
    /// Page `index` scrolled its own surface to `y`
    PageOffset { index: PageId, y: f64 },
    /// Page `index` content grew or shrank
    ContentHeight { index: PageId, height: f64 },
    /// Header was re-measured
    HeaderHeight { height: f64 },
    /// Gesture started or ended on the overlay
    Drag { active: bool },
    /// Lazy page `index` created its surface
    AttachSurface { index: PageId },
}

impl Step {
    fn page_index(&self) -> Option<PageId> {
        match self {
            Step::SelectPage { index }
            | Step::PageOffset { index, .. }
            | Step::ContentHeight { index, .. }
            | Step::AttachSurface { index } => Some(*index),
            _ => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Scroll { y } => write!(f, "scroll {y}"),
            Step::SelectPage { index } => write!(f, "select page {index}"),
            Step::PageOffset { index, y } => write!(f, "page {index} offset {y}"),
            Step::ContentHeight { index, height } => write!(f, "page {index} height {height}"),
            Step::HeaderHeight { height } => write!(f, "header height {height}"),
            Step::Drag { active: true } => write!(f, "drag begin"),
            Step::Drag { active: false } => write!(f, "drag end"),
            Step::AttachSurface { index } => write!(f, "attach page {index}"),
        }
    }
}

/// State observed after one step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub step: usize,
    pub label: String,
    pub active_page: PageId,
    pub container_y: f64,
    pub overlay_y: f64,
    /// Offset of the active page's surface, if it has one
    pub page_y: Option<f64>,
    pub progress: f64,
    pub overlay_content_height: f64,
    pub collapsed: bool,
}

impl Scenario {
    pub fn from_json_str(content: &str) -> Result<Self> {
        let scenario: Self = serde_json::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let scenario: Self = toml::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Load a scenario, picking the format from the extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("toml") => Self::from_toml_str(&content),
            other => Err(Error::Scenario(format!(
                "unsupported scenario format: {}",
                other.unwrap_or("<none>")
            ))),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.pages.is_empty() {
            return Err(Error::Scenario("scenario needs at least one page".to_string()));
        }
        for (i, step) in self.steps.iter().enumerate() {
            if let Some(index) = step.page_index() {
                if index >= self.pages.len() {
                    return Err(Error::Scenario(format!(
                        "step {} ({}) refers to page {} but only {} pages exist",
                        i + 1,
                        step,
                        index,
                        self.pages.len()
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Page controllers and views built for a replay
struct ReplayPage {
    content: Rc<StaticPage>,
    view: Rc<ScrollView>,
}

impl ReplayPage {
    fn build(spec: &PageSpec, viewport: &Viewport) -> Self {
        let frame = Size::new(viewport.width, viewport.height);
        let view = if spec.scrollable {
            ScrollView::new(frame)
                .with_content_size(Size::new(viewport.width, spec.content_height))
                .with_inset_top(spec.inset_top)
        } else {
            ScrollView::plain(Size::new(viewport.width, spec.content_height))
        };
        // A scroll view at rest shows its first row below the inset
        view.set_content_offset_y(-spec.inset_top);
        let view = Rc::new(view);
        let content = Rc::new(StaticPage::default());
        if !spec.lazy {
            content.set_surface(Some(Rc::clone(&view) as Rc<dyn PanSurface>));
        }
        Self { content, view }
    }
}

/// Run every step of `scenario` and record a frame after each
pub fn replay(scenario: &Scenario) -> Result<Vec<Frame>> {
    scenario.validate()?;

    let pages: Vec<ReplayPage> = scenario
        .pages
        .iter()
        .map(|spec| ReplayPage::build(spec, &scenario.viewport))
        .collect();

    let geometry = Rc::new(StaticGeometry::new(
        &scenario.layout,
        pages.iter().map(|page| Rc::clone(&page.content)).collect(),
    ));
    let mut coordinator = PageCoordinator::new(
        Rc::clone(&geometry) as Rc<dyn GeometryProvider>,
        scenario.sync,
        scenario.viewport,
    );
    coordinator.on_header_bounds_changed(scenario.layout.header_height);
    coordinator.attach();

    let mut frames = Vec::with_capacity(scenario.steps.len());
    for (i, step) in scenario.steps.iter().enumerate() {
        match *step {
            Step::Scroll { y } => coordinator.on_user_scroll(y),
            Step::SelectPage { index } => {
                let content = geometry.static_pager().select(index);
                coordinator.on_page_selected(
                    content.as_deref().map(|page| page as &dyn PageContent),
                    index,
                );
            }
            Step::PageOffset { index, y } => {
                let page = &pages[index];
                page.view.set_content_offset_y(y);
                coordinator.on_page_content_offset_changed(
                    Some(&*page.content as &dyn PageContent),
                    y,
                    index,
                );
            }
            Step::ContentHeight { index, height } => {
                let page = &pages[index];
                let width = page.view.content_size().width;
                if page.view.is_scrollable() {
                    page.view.set_content_size(Size::new(width, height));
                } else {
                    page.view.set_frame(Size::new(width, height));
                }
                coordinator.process_notifications();
            }
            Step::HeaderHeight { height } => {
                geometry.set_header_height(height);
                coordinator.on_header_bounds_changed(height);
            }
            Step::Drag { active } => {
                coordinator.overlay().set_dragging(active);
                if !active {
                    // Re-measure deferred while the gesture was in flight
                    coordinator.on_header_bounds_changed(geometry.header_height());
                }
            }
            Step::AttachSurface { index } => {
                let page = &pages[index];
                page.content
                    .set_surface(Some(Rc::clone(&page.view) as Rc<dyn PanSurface>));
            }
        }
        frames.push(capture(&coordinator, i + 1, step));
    }

    Ok(frames)
}

fn capture(coordinator: &PageCoordinator, step: usize, action: &Step) -> Frame {
    let state = coordinator.state();
    let delta = state.overlay_offset_y - coordinator.top_height();
    Frame {
        step,
        label: action.to_string(),
        active_page: state.active_page,
        container_y: state.container_offset_y,
        overlay_y: state.overlay_offset_y,
        page_y: coordinator
            .active_surface()
            .map(|surface| surface.content_offset_y()),
        progress: state.progress,
        overlay_content_height: coordinator.overlay().content_size().height,
        collapsed: classify(delta, coordinator.sync_config().collapse_epsilon)
            == Regime::Collapsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"
    {
        "layout": {
            "header_height": 200.0,
            "min_header_height": 60.0,
            "pager_tab_height": 40.0,
            "sticky_pager_tab": true
        },
        "viewport": { "width": 400.0, "height": 800.0 },
        "pages": [
            { "content_height": 2000.0 },
            { "content_height": 1500.0, "inset_top": 10.0 }
        ],
        "steps": [
            { "action": "scroll", "y": 70.0 },
            { "action": "scroll", "y": 240.0 },
            { "action": "select_page", "index": 1 },
            { "action": "select_page", "index": 0 }
        ]
    }
    "#;

    #[test]
    fn test_replay_json() {
        let scenario = Scenario::from_json_str(SCENARIO).unwrap();
        let frames = replay(&scenario).unwrap();
        assert_eq!(frames.len(), 4);

        assert_eq!(frames[0].container_y, 70.0);
        assert!(!frames[0].collapsed);

        assert_eq!(frames[1].container_y, 140.0);
        assert_eq!(frames[1].page_y, Some(100.0));
        assert!(frames[1].collapsed);

        // No memory for page 1: overlay falls back to the container offset
        assert_eq!(frames[2].active_page, 1);
        assert_eq!(frames[2].overlay_y, 140.0);
        assert_eq!(frames[2].page_y, Some(-10.0));

        // Page 0 comes back where it was
        assert_eq!(frames[3].overlay_y, 240.0);
        assert_eq!(frames[3].page_y, Some(100.0));
    }

    #[test]
    fn test_toml_scenario() {
        let scenario = Scenario::from_toml_str(
            r#"
            viewport = { width = 100.0, height = 50.0 }

            [[pages]]
            content_height = 300.0

            [[steps]]
            action = "scroll"
            y = 3.0

            [[steps]]
            action = "drag"
            active = true
            "#,
        )
        .unwrap();
        assert_eq!(scenario.steps[1], Step::Drag { active: true });
        let frames = replay(&scenario).unwrap();
        assert_eq!(frames[1].label, "drag begin");
    }

    #[test]
    fn test_out_of_range_page_rejected() {
        let result = Scenario::from_json_str(
            r#"{
                "viewport": { "width": 1.0, "height": 1.0 },
                "pages": [ { "content_height": 1.0 } ],
                "steps": [ { "action": "select_page", "index": 4 } ]
            }"#,
        );
        assert!(matches!(result, Err(Error::Scenario(_))));
    }

    #[test]
    fn test_empty_pages_rejected() {
        let result = Scenario::from_json_str(
            r#"{ "viewport": { "width": 1.0, "height": 1.0 }, "pages": [] }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_lazy_surface_is_tracked_after_attach() {
        let scenario = Scenario::from_json_str(
            r#"{
                "layout": { "header_height": 100.0, "min_header_height": 20.0, "pager_tab_height": 10.0 },
                "viewport": { "width": 100.0, "height": 300.0 },
                "pages": [ { "content_height": 900.0, "lazy": true } ],
                "steps": [
                    { "action": "scroll", "y": 120.0 },
                    { "action": "attach_surface", "index": 0 },
                    { "action": "page_offset", "index": 0, "y": 50.0 }
                ]
            }"#,
        )
        .unwrap();
        let frames = replay(&scenario).unwrap();
        assert_eq!(frames[0].page_y, None);
        assert_eq!(frames[1].page_y, None);
        // top_height = 80, so the page scroll lands the overlay at 130
        assert_eq!(frames[2].overlay_y, 130.0);
        assert_eq!(frames[2].page_y, Some(50.0));
    }
}
