pub mod app;
pub mod ui;

use std::io;
use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::error;
use dietlog_core::DietStore;

use crate::tui::app::{App, InputMode};

pub fn run(store: DietStore, today: NaiveDate) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store, today);
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.store.flush();

    if let Err(err) = res {
        error!(error = %err, "terminal UI stopped");
        println!("{:?}", err);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .map_err(|e| io::Error::other(e.to_string()))?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if app.input_mode == InputMode::Normal {
            app.clear_notice();
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Left | KeyCode::Char('h') => app.change_day(-1),
                KeyCode::Right | KeyCode::Char('l') => app.change_day(1),
                KeyCode::Char('t') => app.go_today(),
                KeyCode::Tab => app.cycle_focus(),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Char(' ') | KeyCode::Enter => app.select_highlighted_option(),
                KeyCode::Char('d') | KeyCode::Delete => app.delete_selection(),
                KeyCode::Char('a') => app.enter_input_mode(InputMode::CatalogMeal),
                KeyCode::Char('A') => app.enter_input_mode(InputMode::DayMeal),
                KeyCode::Char('w') => app.enter_input_mode(InputMode::Weight),
                KeyCode::Char('p') => app.cycle_period(),
                KeyCode::Char('r') => app.enter_input_mode(InputMode::Range),
                KeyCode::Char('g') => app.toggle_chart_style(),
                _ => {}
            }
        } else {
            match key.code {
                KeyCode::Enter => app.submit_input(),
                KeyCode::Esc => {
                    app.clear_notice();
                    app.exit_input_mode();
                }
                KeyCode::Char(c) => app.input_char(c),
                KeyCode::Backspace => app.delete_char(),
                KeyCode::Left => app.move_cursor_left(),
                KeyCode::Right => app.move_cursor_right(),
                _ => {}
            }
        }
    }
}
