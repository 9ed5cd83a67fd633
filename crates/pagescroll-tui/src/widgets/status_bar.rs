use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use pagescroll_core::PanSurface;

use crate::app::App;
use crate::scroll::GesturePhase;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;

        let phase_str = match app.phase() {
            GesturePhase::Idle => "IDLE",
            GesturePhase::Scrolling => "SCROLL",
            GesturePhase::Pulling => "PULL",
            GesturePhase::Bouncing => "BOUNCE",
        };

        let page_title = app
            .screen
            .current()
            .map(|page| page.title().to_string())
            .unwrap_or_default();

        let status_text = if let Some(msg) = &app.status_message {
            msg.clone()
        } else {
            let overlay = app.coordinator.overlay();
            format!(
                " {} | {} | {:>3.0}% | overlay {:.0}/{:.0}",
                phase_str,
                page_title,
                app.progress().progress * 100.0,
                overlay.content_offset_y(),
                overlay.max_offset_y(),
            )
        };

        let help_hint = " q:quit j/k:scroll h/l:tabs K:pull +/-:rows b:bio ";
        let padding_len = (area.width as usize)
            .saturating_sub(status_text.width() + help_hint.width());

        let line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(theme.fg0).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey2).bg(theme.bg2)),
        ]);

        let paragraph = Paragraph::new(line);
        frame.render_widget(paragraph, area);
    }
}
