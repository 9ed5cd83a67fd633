use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log files live here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Tuning for the offset synchronizer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Tolerance around the collapse boundary. A delta below `-collapse_epsilon`
    /// means the header is still expanding.
    #[serde(default = "default_collapse_epsilon")]
    pub collapse_epsilon: f64,
    /// Tab bar height used when the pager does not report one
    #[serde(default = "default_tab_height")]
    pub default_tab_height: f64,
    /// Hold back overlay content-size changes while the overlay is overscrolled
    #[serde(default = "default_true")]
    pub defer_resize_on_overscroll: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            collapse_epsilon: default_collapse_epsilon(),
            default_tab_height: default_tab_height(),
            defer_resize_on_overscroll: default_true(),
        }
    }
}

/// Static geometry for hosts that do not measure their own header
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Fully expanded header height
    #[serde(default = "default_header_height")]
    pub header_height: f64,
    /// Height the header collapses down to
    #[serde(default = "default_min_header_height")]
    pub min_header_height: f64,
    /// Pager tab bar height (`None` falls back to `sync.default_tab_height`)
    #[serde(default)]
    pub pager_tab_height: Option<f64>,
    /// Keep the tab bar pinned under the collapsed header
    #[serde(default = "default_true")]
    pub sticky_pager_tab: bool,
    /// Bottom safe-area inset
    #[serde(default)]
    pub bottom_inset: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            header_height: default_header_height(),
            min_header_height: default_min_header_height(),
            pager_tab_height: None,
            sticky_pager_tab: default_true(),
            bottom_inset: 0.0,
        }
    }
}

/// Easing curve for simulated scroll animations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    None,
    Linear,
    #[default]
    Cubic,
    Quintic,
    EaseOut,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Animate scroll steps instead of jumping
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    /// Duration of one scroll animation
    #[serde(default = "default_animation_duration")]
    pub animation_duration_ms: u64,
    #[serde(default)]
    pub easing: EasingType,
    /// Rows moved per line scroll
    #[serde(default = "default_scroll_lines")]
    pub scroll_lines: u16,
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Time taken to spring back from overscroll
    #[serde(default = "default_bounce_duration")]
    pub bounce_duration_ms: u64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_animation_duration(),
            easing: EasingType::default(),
            scroll_lines: default_scroll_lines(),
            animation_fps: default_animation_fps(),
            bounce_duration_ms: default_bounce_duration(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Theme name (e.g., "gruvbox-dark", "nord")
    #[serde(default = "default_theme_name")]
    pub theme: String,
    /// Number of demo pages shown in the pager
    #[serde(default = "default_page_count")]
    pub page_count: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            theme: default_theme_name(),
            page_count: default_page_count(),
        }
    }
}

/// Keymap configuration using Vim-style notation
/// Format: "j", "k", "<C-d>" (Ctrl+d), "G" (Shift+g), "<Esc>", "<Tab>"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    #[serde(default = "default_key_quit")]
    pub quit: String,
    #[serde(default = "default_key_scroll_down")]
    pub scroll_down: String,
    #[serde(default = "default_key_scroll_up")]
    pub scroll_up: String,
    #[serde(default = "default_key_scroll_half_down")]
    pub scroll_half_down: String,
    #[serde(default = "default_key_scroll_half_up")]
    pub scroll_half_up: String,
    #[serde(default = "default_key_scroll_page_down")]
    pub scroll_page_down: String,
    #[serde(default = "default_key_scroll_page_up")]
    pub scroll_page_up: String,
    #[serde(default = "default_key_jump_to_top")]
    pub jump_to_top: String,
    #[serde(default = "default_key_jump_to_bottom")]
    pub jump_to_bottom: String,
    /// Select the previous page
    #[serde(default = "default_key_prev_page")]
    pub prev_page: String,
    /// Select the next page
    #[serde(default = "default_key_next_page")]
    pub next_page: String,
    /// Pull past the top edge (overscroll)
    #[serde(default = "default_key_pull")]
    pub pull: String,
    /// Add rows to the active page
    #[serde(default = "default_key_grow_content")]
    pub grow_content: String,
    /// Remove rows from the active page
    #[serde(default = "default_key_shrink_content")]
    pub shrink_content: String,
    /// Expand or fold the header bio, changing the header height
    #[serde(default = "default_key_toggle_bio")]
    pub toggle_bio: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            quit: default_key_quit(),
            scroll_down: default_key_scroll_down(),
            scroll_up: default_key_scroll_up(),
            scroll_half_down: default_key_scroll_half_down(),
            scroll_half_up: default_key_scroll_half_up(),
            scroll_page_down: default_key_scroll_page_down(),
            scroll_page_up: default_key_scroll_page_up(),
            jump_to_top: default_key_jump_to_top(),
            jump_to_bottom: default_key_jump_to_bottom(),
            prev_page: default_key_prev_page(),
            next_page: default_key_next_page(),
            pull: default_key_pull(),
            grow_content: default_key_grow_content(),
            shrink_content: default_key_shrink_content(),
            toggle_bio: default_key_toggle_bio(),
        }
    }
}

fn default_key_quit() -> String { "q".to_string() }
fn default_key_scroll_down() -> String { "j".to_string() }
fn default_key_scroll_up() -> String { "k".to_string() }
fn default_key_scroll_half_down() -> String { "<C-d>".to_string() }
fn default_key_scroll_half_up() -> String { "<C-u>".to_string() }
fn default_key_scroll_page_down() -> String { "<C-f>".to_string() }
fn default_key_scroll_page_up() -> String { "<C-b>".to_string() }
fn default_key_jump_to_top() -> String { "gg".to_string() }
fn default_key_jump_to_bottom() -> String { "G".to_string() }
fn default_key_prev_page() -> String { "h".to_string() }
fn default_key_next_page() -> String { "l".to_string() }
fn default_key_pull() -> String { "K".to_string() }
fn default_key_grow_content() -> String { "+".to_string() }
fn default_key_shrink_content() -> String { "-".to_string() }
fn default_key_toggle_bio() -> String { "b".to_string() }

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pagescroll")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_collapse_epsilon() -> f64 {
    1.0
}

fn default_tab_height() -> f64 {
    44.0
}

fn default_header_height() -> f64 {
    10.0
}

fn default_min_header_height() -> f64 {
    3.0
}

fn default_animation_duration() -> u64 {
    150
}

fn default_scroll_lines() -> u16 {
    1
}

fn default_animation_fps() -> u32 {
    60
}

fn default_bounce_duration() -> u64 {
    250
}

fn default_tick_rate() -> u64 {
    16
}

fn default_theme_name() -> String {
    "gruvbox-dark".to_string()
}

fn default_page_count() -> usize {
    3
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, falling back to defaults
    /// when the file does not exist
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    /// Reject geometry that cannot describe a collapsing header
    pub fn validate(&self) -> crate::Result<()> {
        let layout = &self.layout;
        if layout.min_header_height < 0.0 || layout.header_height < 0.0 {
            return Err(crate::Error::Config(
                "header heights must not be negative".to_string(),
            ));
        }
        if layout.min_header_height > layout.header_height {
            return Err(crate::Error::Config(format!(
                "min_header_height ({}) exceeds header_height ({})",
                layout.min_header_height, layout.header_height
            )));
        }
        let epsilon = self.sync.collapse_epsilon;
        if epsilon.is_nan() || epsilon < 0.0 {
            return Err(crate::Error::Config(
                "collapse_epsilon must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/pagescroll/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("pagescroll")
            .join("config.toml")
    }

    /// Get the log file path used by the terminal host
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("pagescroll.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}
