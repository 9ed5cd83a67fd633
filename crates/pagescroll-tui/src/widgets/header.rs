use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use pagescroll_core::geometry::GeometryProvider;

use crate::app::App;
use crate::theme::Theme;

const DISPLAY_NAME: &str = "Pager Demo";
const HANDLE: &str = "@pagescroll";

const BIO: [&str; 3] = [
    "Header collapses as you scroll, tabs stay pinned.",
    "Every tab remembers where you left it.",
    "Pull down at the top to stretch the banner.",
];

pub struct HeaderWidget;

impl HeaderWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        if area.height == 0 {
            return;
        }
        let theme = &app.theme;
        let full = header_lines(app, theme);
        let rows = area.height as usize;

        // Overscroll exposes rows above the banner; collapsing scrolls content off the top
        let mut lines: Vec<Line> = if rows >= full.len() {
            let exposed = Line::from("").style(Style::default().bg(theme.overscroll));
            let mut lines = vec![exposed; rows - full.len()];
            lines.extend(full);
            lines
        } else {
            let skip = full.len() - rows;
            full.into_iter().skip(skip).collect()
        };

        if app.progress().progress >= 1.0 {
            if let Some(first) = lines.first_mut() {
                *first = compact_line(app, theme);
            }
        }

        let paragraph = Paragraph::new(lines).style(Style::default().bg(theme.bg0));
        frame.render_widget(paragraph, area);
    }
}

fn header_lines(app: &App, theme: &Theme) -> Vec<Line<'static>> {
    let mut info = vec![
        Line::from(Span::styled(
            format!(" {}", DISPLAY_NAME),
            Style::default().fg(theme.fg1).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(" {}", HANDLE),
            Style::default().fg(theme.grey2),
        )),
    ];
    if app.screen.is_bio_expanded() {
        info.extend(BIO.iter().map(|text| {
            Line::from(Span::styled(format!(" {}", text), Style::default().fg(theme.fg0)))
        }));
    } else {
        info.push(Line::from(Span::styled(
            " (b) show bio",
            Style::default().fg(theme.grey0),
        )));
    }
    info.push(Line::from(vec![
        Span::styled(" 1,204", Style::default().fg(theme.fg1).add_modifier(Modifier::BOLD)),
        Span::styled(" following  ", Style::default().fg(theme.grey2)),
        Span::styled("5,328", Style::default().fg(theme.fg1).add_modifier(Modifier::BOLD)),
        Span::styled(" followers", Style::default().fg(theme.grey2)),
    ]));

    let total = app.screen.header_height().round().max(0.0) as usize;
    let banner_rows = total.saturating_sub(info.len());
    let mut lines = vec![banner_line(theme); banner_rows];
    lines.extend(info);
    lines.truncate(total.max(1));
    lines
}

fn banner_line(theme: &Theme) -> Line<'static> {
    Line::from("").style(Style::default().bg(theme.banner))
}

/// Single-row title shown once the header is fully collapsed
fn compact_line(app: &App, theme: &Theme) -> Line<'static> {
    let count = app
        .screen
        .current()
        .map(|page| format!("  {} {}", page.row_count(), page.title()))
        .unwrap_or_default();
    Line::from(vec![
        Span::styled(
            format!(" {}", DISPLAY_NAME),
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(count, Style::default().fg(theme.grey2)),
    ])
    .style(Style::default().bg(theme.banner))
}
