mod header;
mod page_view;
mod status_bar;
mod tab_bar;

pub use header::HeaderWidget;
pub use page_view::PageViewWidget;
pub use status_bar::StatusBarWidget;
pub use tab_bar::TabBarWidget;
