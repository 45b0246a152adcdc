pub mod app;
pub mod ui;

use std::io;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use weekplot_core::Config;

use crate::tui::app::{App, FormField, InputMode};

/// Runs the TUI until the user quits. `status` is shown in the footer first.
pub fn run(config: &Config, status: Option<String>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);
    app.status = status;
    log::info!("tui started");
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        log::error!("tui stopped: {:?}", err);
    }
    res
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .map_err(|e| io::Error::other(e.to_string()))?;

        if !event::poll(std::time::Duration::from_millis(250))? {
            continue;
        }
        let Event::Key(key) = event::read()? else { continue; };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.input_mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => app.next_field(),
                KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => app.previous_field(),
                KeyCode::Right | KeyCode::Char('l') => app.next_graph(),
                KeyCode::Left | KeyCode::Char('h') => app.previous_graph(),
                KeyCode::Char('a') => app.add_graph(),
                KeyCode::Char('d') | KeyCode::Delete => app.delete_graph(),
                KeyCode::Enter | KeyCode::Char('i') => app.enter_edit_mode(),
                _ => {}
            },
            InputMode::Editing if app.field == FormField::Week => match key.code {
                KeyCode::Enter | KeyCode::Esc => app.exit_input_mode(),
                KeyCode::Right | KeyCode::Down | KeyCode::Char('j') => app.cycle_week(true),
                KeyCode::Left | KeyCode::Up | KeyCode::Char('k') => app.cycle_week(false),
                _ => {}
            },
            InputMode::Editing => match key.code {
                KeyCode::Enter | KeyCode::Esc => app.exit_input_mode(),
                KeyCode::Char(c) => app.input_char(c),
                KeyCode::Backspace => app.delete_char(),
                _ => {}
            },
        }
    }
}
