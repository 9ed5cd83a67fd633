use std::io;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tracing::info;

use pagescroll_core::AppConfig;
use pagescroll_tui::{
    event::{AppEvent, EventHandler},
    input::handle_key_event,
    keymap::Keymap,
    load_theme,
    widgets::{HeaderWidget, PageViewWidget, StatusBarWidget, TabBarWidget},
    App,
};

pub fn run(config: AppConfig) -> Result<()> {
    // Create keymap from config
    let keymap = Keymap::from_config(&config.keymap);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle("pagescroll"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, config, &keymap);

    // Restore terminal even if the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, config: AppConfig, keymap: &Keymap) -> Result<()> {
    // Load theme from config
    let theme = load_theme(&config.ui.theme);

    let event_handler =
        EventHandler::with_animation_fps(config.ui.tick_rate_ms, config.scroll.animation_fps);

    let mut app = App::new(config, theme);
    let size = terminal.size()?;
    app.resize(size.width, size.height);
    info!(width = size.width, height = size.height, "Profile screen started");

    // Checked at the end of each iteration to pick the next poll interval
    let mut needs_fast_update = false;

    loop {
        app.tick();

        terminal.draw(|frame| {
            let area = frame.area();

            // Main layout: profile + status bar
            let main_layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(area);

            let bands = app.bands(main_layout[0].height);
            let (header, tabs, page) = bands.split(main_layout[0]);

            HeaderWidget::render(frame, header, &app);
            TabBarWidget::render(frame, tabs, &app);
            PageViewWidget::render(frame, page, &app);
            StatusBarWidget::render(frame, main_layout[1], &app);
        })?;

        // Faster polling while a gesture animates
        let event = if needs_fast_update {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };
        if let Some(event) = event {
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, app.pending_key, keymap);
                    app.handle_action(action);
                }
                AppEvent::Resize(width, height) => app.resize(width, height),
                AppEvent::Tick => {}
            }
        }

        needs_fast_update = app.needs_fast_update();

        if app.should_quit {
            break;
        }
    }

    info!("Profile screen closed");
    Ok(())
}
