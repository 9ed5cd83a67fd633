use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::app::App;

pub struct PageViewWidget;

impl PageViewWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        if area.height == 0 {
            return;
        }
        let theme = &app.theme;
        let Some(page) = app.screen.current() else {
            return;
        };

        let first = app.page_first_row();
        let width = area.width as usize;
        let rows = page.rows();

        let lines: Vec<Line> = rows
            .iter()
            .enumerate()
            .skip(first)
            .take(area.height as usize)
            .map(|(i, row)| {
                let bg = if i % 2 == 0 { theme.bg0 } else { theme.stripe };
                Line::from(Span::styled(
                    truncate_to_width(&format!(" {}", row), width),
                    Style::default().fg(theme.fg0),
                ))
                .style(Style::default().bg(bg))
            })
            .collect();

        let paragraph = Paragraph::new(lines).style(Style::default().bg(theme.bg0));
        frame.render_widget(paragraph, area);
    }
}

/// Cut `text` to at most `max_width` columns (CJK = 2 columns)
fn truncate_to_width(text: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(1);
        if width + ch_width > max_width {
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}
