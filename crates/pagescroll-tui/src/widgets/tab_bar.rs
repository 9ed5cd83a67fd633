use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::Tabs,
    Frame,
};

use crate::app::App;

pub struct TabBarWidget;

impl TabBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        if area.height == 0 {
            return;
        }
        let theme = &app.theme;

        let titles: Vec<Line> = app
            .screen
            .pages()
            .iter()
            .enumerate()
            .map(|(i, page)| Line::from(format!("{} {}", i + 1, page.title())))
            .collect();

        let tabs = Tabs::new(titles)
            .select(app.screen.current_index())
            .style(Style::default().fg(theme.grey2).bg(theme.bg1))
            .highlight_style(
                Style::default()
                    .fg(theme.tab_active)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )
            .divider("│");
        frame.render_widget(tabs, area);
    }
}
