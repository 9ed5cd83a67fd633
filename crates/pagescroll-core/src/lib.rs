pub mod config;
pub mod coordinator;
pub mod error;
pub mod geometry;
pub mod pages;
pub mod scenario;
pub mod surface;
pub mod sync;

pub use config::{AppConfig, EasingType, LayoutConfig, ScrollConfig, SyncConfig};
pub use coordinator::{PageCoordinator, PagerEvent, ProgressDelegate, ScrollUpdate, SyncState};
pub use error::{Error, Result};
pub use geometry::{GeometryProvider, PageContent, PagedContent, Viewport};
pub use pages::{PageId, PageState};
pub use surface::{PanSurface, ScrollView, Size};
pub use sync::Regime;
