//! Interactive terminal loop

use super::{TableView, Theme};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend, widgets::TableState};
use std::io;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

enum Action {
    Quit,
    Continue,
}

/// Draw `view` until the user quits
pub async fn run(mut view: TableView, theme: Theme) -> Result<()> {
    tracing::debug!("Initializing terminal");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = event_loop(&mut terminal, &mut view, &theme).await;

    // Restore the terminal even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    view: &mut TableView,
    theme: &Theme,
) -> Result<()> {
    loop {
        view.drain();
        let now = chrono::Utc::now();
        let mut state = TableState::default().with_selected(Some(view.selected()));
        terminal.draw(|f| {
            f.render_stateful_widget(view.widget(theme, now), f.area(), &mut state);
        })?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Action::Quit = handle_key(view, key) {
                        tracing::debug!("Quit requested");
                        return Ok(());
                    }
                }
            }
        }

        tokio::task::yield_now().await;
    }
}

fn handle_key(view: &mut TableView, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Down | KeyCode::Char('j') => {
            view.select_next();
            Action::Continue
        }
        KeyCode::Up | KeyCode::Char('k') => {
            view.select_prev();
            Action::Continue
        }
        KeyCode::Char('w') => {
            view.toggle_wide();
            Action::Continue
        }
        KeyCode::Char('N') => {
            view.toggle_sort("NAME");
            Action::Continue
        }
        KeyCode::Char('A') => {
            view.toggle_sort("AGE");
            Action::Continue
        }
        _ => Action::Continue,
    }
}
