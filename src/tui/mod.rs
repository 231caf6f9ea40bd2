pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::{resolve_theme, Theme, ThemeColors};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};
use ratatui::backend::Backend;
use ratatui::Terminal;

pub async fn run_tui(mut app: App) -> anyhow::Result<()> {
    // Buffer stderr while TUI is active to prevent output corrupting the display
    crate::stderr_buffer::activate();

    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();
    let mut events = EventHandler::new(250);

    let outcome = run_loop(&mut terminal, &mut events, &mut app).await;

    // Restore terminal
    ratatui::restore();

    // Flush buffered stderr messages now that the terminal is restored
    for msg in crate::stderr_buffer::drain() {
        eprintln!("{}", msg);
    }

    outcome
}

async fn run_loop<B>(
    terminal: &mut Terminal<B>,
    events: &mut EventHandler,
    app: &mut App,
) -> anyhow::Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        match events.next().await {
            Some(Event::Key(key)) => handle_key_event(app, key),
            Some(Event::Tick) => app.update_flash(),
            None => anyhow::bail!("terminal event stream closed"),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    // Ctrl-C quits from any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        app::InputMode::Normal => {
            match key.code {
                // Quit
                KeyCode::Char('q') => app.should_quit = true,

                // Tab switching
                KeyCode::Tab => app.toggle_view(),

                // Help
                KeyCode::Char('?') => app.show_help(),

                // Form keys only apply to the estimate tab
                _ if app.current_view == app::View::Sample => {}

                // Navigation
                KeyCode::Char('j') | KeyCode::Down => app.next_row(),
                KeyCode::Char('k') | KeyCode::Up => app.previous_row(),

                // Change value
                KeyCode::Char('l') | KeyCode::Right => app.cycle_selected(true),
                KeyCode::Char('h') | KeyCode::Left => app.cycle_selected(false),
                KeyCode::Enter => app.activate_selected(),

                // Predict
                KeyCode::Char('p') | KeyCode::Char(' ') => app.predict(),

                // Breakdown details
                KeyCode::Char('b') => app.show_breakdown(),

                // Reset form
                KeyCode::Char('r') => app.reset(),

                _ => {}
            }
        }
        app::InputMode::Editing => {
            match key.code {
                KeyCode::Enter => app.confirm_edit(),
                KeyCode::Esc => app.cancel_edit(),
                KeyCode::Backspace => {
                    app.edit_buffer.pop();
                }

                // Numeric input only
                KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
                    app.edit_buffer.push(c);
                }

                // Ignore all other keys (don't propagate to Normal mode)
                _ => {}
            }
        }
        app::InputMode::Breakdown => match key.code {
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Char('q') => app.dismiss_breakdown(),
            _ => {}
        },
        app::InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::InputSpec;
    use ratatui::backend::TestBackend;

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn app() -> App {
        App::new(InputSpec::default(), ThemeColors::dark())
    }

    #[test]
    fn test_predict_key() {
        let mut app = app();
        press(&mut app, KeyCode::Char('p'));
        assert!(app.result.is_some());
    }

    #[test]
    fn test_typing_into_distance() {
        let mut app = app();
        for _ in 0..7 {
            press(&mut app, KeyCode::Char('j'));
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, app::InputMode::Editing);

        for _ in 0..3 {
            press(&mut app, KeyCode::Backspace);
        }
        for c in "750".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        // Letters are ignored while editing
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, app::InputMode::Normal);
        assert_eq!(app.input.distance.km(), 750);
    }

    #[test]
    fn test_help_closes_on_any_key() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.input_mode, app::InputMode::Help);
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.input_mode, app::InputMode::Normal);
    }

    #[test]
    fn test_form_keys_ignored_on_sample_tab() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('p'));
        assert!(app.result.is_none());
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_loop_stops_when_events_end() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        tx.send(Event::Tick).unwrap();
        drop(tx);

        let mut events = EventHandler::from_receiver(rx);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut app = app();

        let err = run_loop(&mut terminal, &mut events, &mut app)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "terminal event stream closed");
    }

    #[tokio::test]
    async fn test_loop_returns_on_quit() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        tx.send(Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)))
            .unwrap();

        let mut events = EventHandler::from_receiver(rx);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut app = app();

        run_loop(&mut terminal, &mut events, &mut app).await.unwrap();
        assert!(app.should_quit);
        drop(tx);
    }

    #[test]
    fn test_ctrl_c_quits_while_editing() {
        let mut app = app();
        app.table_state.select(Some(5));
        app.start_editing();
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }
}
