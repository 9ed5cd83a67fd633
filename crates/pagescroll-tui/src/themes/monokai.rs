//! Monokai theme

use ratatui::style::Color;
use crate::theme::Theme;

pub fn default() -> Theme {
    Theme {
        bg0: Color::Rgb(0x27, 0x28, 0x22), // background
        bg1: Color::Rgb(0x3e, 0x3d, 0x32), // selection
        bg2: Color::Rgb(0x49, 0x48, 0x3e), // line
        fg0: Color::Rgb(0xf8, 0xf8, 0xf2), // foreground
        fg1: Color::Rgb(0xd0, 0xd0, 0xc0),
        grey0: Color::Rgb(0x75, 0x71, 0x5e), // comment
        grey2: Color::Rgb(0x90, 0x8c, 0x77),
        red: Color::Rgb(0xf9, 0x26, 0x72),
        orange: Color::Rgb(0xfd, 0x97, 0x1f),
        yellow: Color::Rgb(0xe6, 0xdb, 0x74),
        green: Color::Rgb(0xa6, 0xe2, 0x2e),
        aqua: Color::Rgb(0x66, 0xd9, 0xef),
        blue: Color::Rgb(0x66, 0xd9, 0xef), // monokai uses cyan for blue
        purple: Color::Rgb(0xae, 0x81, 0xff),
        banner: Color::Rgb(0x75, 0x71, 0x5e),
        tab_active: Color::Rgb(0xa6, 0xe2, 0x2e),
        stripe: Color::Rgb(0x2d, 0x2e, 0x27),
        overscroll: Color::Rgb(0x1e, 0x1f, 0x1a),
        accent: Color::Rgb(0xae, 0x81, 0xff),
    }
}
