//! Library entry point for the Registro TUI.
//!
//! Provides a reusable [`run`] function that launches the Ratatui terminal UI
//! against any [`RecordsApi`] implementation, plus the one-shot [`cli`]
//! commands used by the `registro` binary.

mod actions;
mod app;
pub mod cli;
mod display;
mod event;
mod outcome;
mod requests;
#[cfg(test)]
mod test_support;
mod ui;

use actions::Dispatcher;
use anyhow::anyhow;
use app::{App, Focus};
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyCode, KeyEvent,
    KeyEventKind, KeyModifiers, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use event::{AppEvent, Request};
use log::{debug, info};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use registro_client::{ExportSink, RecordsApi};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const PAGE_LINES: u16 = 5;

/// Configuration for the Registro TUI session.
#[derive(Debug, Clone, Default)]
pub struct TuiConfig {
    /// Backend base URL (shown in header).
    pub backend: String,
}

/// What the event loop should do after a key press.
#[derive(Debug, PartialEq, Eq)]
enum KeyAction {
    Continue,
    Quit,
    Issue(Request),
}

impl From<Option<Request>> for KeyAction {
    fn from(request: Option<Request>) -> Self {
        request.map_or(KeyAction::Continue, KeyAction::Issue)
    }
}

/// Launch the Registro TUI against a records backend.
///
/// The caller is responsible for initializing logging (e.g. `env_logger`)
/// before calling `run`. The full list is requested as soon as the view opens.
///
/// # Errors
/// Returns an error if terminal setup or the event loop fails. Backend
/// failures never end the session; they are shown as outcomes instead.
pub async fn run(
    api: Arc<dyn RecordsApi>,
    sink: Arc<dyn ExportSink>,
    config: TuiConfig,
) -> anyhow::Result<()> {
    let mut app = App::new();
    app.backend = config.backend;

    let mut terminal = setup_terminal()?;
    let (tx, mut rx) = mpsc::channel(256);
    spawn_input_handler(tx.clone());
    spawn_tick(tx.clone());

    let dispatcher = Dispatcher::new(api, sink, tx);
    dispatcher.dispatch(app.request_load());

    let result = loop {
        if let Err(err) = terminal.draw(|frame| ui::draw(frame, &mut app)) {
            break Err(err.into());
        }
        let Some(event) = rx.recv().await else {
            break Err(anyhow!("event channel closed unexpectedly"));
        };
        if handle_app_event(event, &dispatcher, &mut app) {
            break Ok(());
        }
    };

    restore_terminal(&mut terminal)?;
    info!("registro tui closed");
    result
}

/// Dispatch a UI event and return true when the app should exit.
fn handle_app_event(event: AppEvent, dispatcher: &Dispatcher, app: &mut App) -> bool {
    match event {
        AppEvent::Input(key) => match handle_input(key, app) {
            KeyAction::Quit => return true,
            KeyAction::Issue(request) => dispatcher.dispatch(request),
            KeyAction::Continue => {}
        },
        AppEvent::Completed(completion) => {
            if let Some(followup) = app.apply(completion) {
                dispatcher.dispatch(followup);
            }
        }
        AppEvent::Scroll(delta) => {
            if delta < 0 {
                app.scroll_up(delta.unsigned_abs());
            } else {
                app.scroll_down(delta as u16);
            }
        }
        AppEvent::Tick => {}
    }
    false
}

/// Translate a key press into a state change and, maybe, a request.
fn handle_input(key: KeyEvent, app: &mut App) -> KeyAction {
    if key.kind == KeyEventKind::Release {
        return KeyAction::Continue;
    }
    let control = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if control => KeyAction::Quit,
        KeyCode::Esc => {
            if app.show_form {
                app.toggle_form();
                KeyAction::Continue
            } else {
                KeyAction::Quit
            }
        }
        KeyCode::Char('r') if control => KeyAction::Issue(app.request_load()),
        KeyCode::Char('e') if control => app.request_export().into(),
        KeyCode::Char('n') if control => {
            app.toggle_form();
            KeyAction::Continue
        }
        KeyCode::Char('s') if control => {
            if app.show_form {
                app.request_create().into()
            } else {
                KeyAction::Continue
            }
        }
        KeyCode::Enter => match app.focus {
            Focus::SearchNombre | Focus::SearchCiudad => KeyAction::Issue(app.request_search()),
            Focus::Form(_) => app.request_create().into(),
            Focus::Records => KeyAction::Continue,
        },
        KeyCode::Tab => {
            app.focus_next();
            KeyAction::Continue
        }
        KeyCode::BackTab => {
            app.focus_prev();
            KeyAction::Continue
        }
        KeyCode::Up => {
            app.scroll_up(1);
            KeyAction::Continue
        }
        KeyCode::Down => {
            app.scroll_down(1);
            KeyAction::Continue
        }
        KeyCode::PageUp => {
            app.scroll_up(PAGE_LINES);
            KeyAction::Continue
        }
        KeyCode::PageDown => {
            app.scroll_down(PAGE_LINES);
            KeyAction::Continue
        }
        KeyCode::Home => {
            app.scroll_up(u16::MAX);
            KeyAction::Continue
        }
        KeyCode::End => {
            app.scroll_down(u16::MAX);
            KeyAction::Continue
        }
        KeyCode::Backspace => {
            app.backspace();
            KeyAction::Continue
        }
        KeyCode::Char(ch) if !control => {
            app.input_char(ch);
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

/// Spawn a task to poll for input events.
fn spawn_input_handler(sender: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        const MOUSE_SCROLL_LINES: i16 = 3;
        loop {
            if matches!(crossterm::event::poll(Duration::from_millis(30)), Ok(true)) {
                while matches!(crossterm::event::poll(Duration::from_millis(0)), Ok(true)) {
                    let event = match crossterm::event::read() {
                        Ok(event) => event,
                        Err(_) => break,
                    };
                    let sent = match event {
                        CrosstermEvent::Key(key) => sender.send(AppEvent::Input(key)).await,
                        CrosstermEvent::Mouse(mouse) => match mouse.kind {
                            MouseEventKind::ScrollUp => {
                                sender.send(AppEvent::Scroll(-MOUSE_SCROLL_LINES)).await
                            }
                            MouseEventKind::ScrollDown => {
                                sender.send(AppEvent::Scroll(MOUSE_SCROLL_LINES)).await
                            }
                            _ => Ok(()),
                        },
                        _ => Ok(()),
                    };
                    if sent.is_err() {
                        debug!("input handler stopped: event loop closed");
                        return;
                    }
                }
            }
        }
    });
}

/// Spawn a periodic tick event generator.
fn spawn_tick(sender: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(250));
        loop {
            interval.tick().await;
            if sender.send(AppEvent::Tick).await.is_err() {
                break;
            }
        }
    });
}

/// Configure terminal in raw mode with alternate screen.
fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    debug!("setting up terminal");
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal state on exit.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    debug!("restoring terminal");
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}
