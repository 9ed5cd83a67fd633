//! Theme registry and loader

mod dracula;
mod monokai;
mod nord;
mod one_dark;

use ratatui::style::Color;
use tracing::warn;

use crate::theme::Theme;

/// Parse a hex color string into a ratatui Color
/// Accepts formats: "#RRGGBB", "RRGGBB", "#RGB", "RGB"
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }

    match hex.len() {
        // Short form: RGB -> RRGGBB
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

/// Load a theme by name
///
/// The name may be followed by `:#RRGGBB` to override the accent color,
/// e.g. `"nord:#ff8800"`. Unknown names fall back to gruvbox-dark.
pub fn load_theme(spec: &str) -> Theme {
    let (name, accent) = match spec.split_once(':') {
        Some((name, accent)) => (name, Some(accent)),
        None => (spec, None),
    };

    let mut theme = match name.trim().to_lowercase().as_str() {
        "gruvbox-dark" | "gruvbox" => Theme::default(),
        "dracula" => dracula::default(),
        "nord" => nord::default(),
        "one-dark" | "onedark" => one_dark::default(),
        "monokai" => monokai::default(),
        other => {
            warn!("Unknown theme '{}', using gruvbox-dark", other);
            Theme::default()
        }
    };

    if let Some(hex) = accent {
        match parse_hex_color(hex) {
            Some(color) => {
                theme.accent = color;
                theme.tab_active = color;
            }
            None => warn!("Invalid accent color '{}', ignoring", hex),
        }
    }

    theme
}

/// Get list of available theme names
pub fn available_themes() -> Vec<&'static str> {
    vec!["gruvbox-dark", "dracula", "nord", "one-dark", "monokai"]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color_6digit() {
        let color = parse_hex_color("#ff5500").unwrap();
        assert!(matches!(color, Color::Rgb(255, 85, 0)));
    }

    #[test]
    fn test_parse_hex_color_3digit() {
        let color = parse_hex_color("#f50").unwrap();
        assert!(matches!(color, Color::Rgb(255, 85, 0)));
    }

    #[test]
    fn test_parse_hex_color_invalid() {
        assert!(parse_hex_color("invalid").is_none());
        assert!(parse_hex_color("#gg0000").is_none());
    }

    #[test]
    fn test_load_theme_default() {
        let theme = load_theme("gruvbox-dark");
        assert!(matches!(theme.bg0, Color::Rgb(0x28, 0x28, 0x28)));

        let fallback = load_theme("no-such-theme");
        assert!(matches!(fallback.bg0, Color::Rgb(0x28, 0x28, 0x28)));
    }

    #[test]
    fn test_load_theme_with_accent() {
        let theme = load_theme("nord:#ff0000");
        assert!(matches!(theme.bg0, Color::Rgb(0x2e, 0x34, 0x40)));
        assert!(matches!(theme.accent, Color::Rgb(255, 0, 0)));
        assert!(matches!(theme.tab_active, Color::Rgb(255, 0, 0)));
    }

    #[test]
    fn test_every_listed_theme_loads() {
        for name in available_themes() {
            let theme = load_theme(name);
            assert!(matches!(theme.bg0, Color::Rgb(..)), "{}", name);
        }
    }
}
