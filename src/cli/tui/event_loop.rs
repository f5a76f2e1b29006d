//! Main TUI event loop

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;

use crate::cli::tui::app::App;
use crate::cli::tui::ui::ui;
use crate::models::AppEvent;

pub async fn run_tui_event_loop(mut app: App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();

    // Periodic pump: every tick the interactive thread drains whatever
    // the flash task pushed into the relay since the previous tick.
    let tick_tx = tx.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(100));
        loop {
            interval.tick().await;
            if tick_tx.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });

    let result = loop {
        if let Err(e) = terminal.draw(|f| ui(f, &mut app)) {
            break Err(e.into());
        }

        tokio::select! {
            // The blocking task only polls for readiness; the read
            // happens on the loop thread afterwards. An abandoned poll
            // task therefore never owns a consumed keystroke.
            _ = tokio::task::spawn_blocking(|| event::poll(Duration::from_millis(50))) => {
                match read_pending_key() {
                    Ok(Some(key)) => {
                        if handle_key(&mut app, key.code, key.modifiers, &tx) {
                            break Ok(());
                        }
                    }
                    Ok(None) => {}
                    Err(e) => break Err(e),
                }
            }
            maybe_event = rx.recv() => {
                match maybe_event {
                    Some(AppEvent::Tick) => app.drain_relay(),
                    Some(AppEvent::FlashFinished(outcome)) => app.finish_flash(outcome),
                    None => break Ok(()),
                }
            }
        }
    };

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Non-blocking read of one pending key press, if any.
fn read_pending_key() -> Result<Option<event::KeyEvent>> {
    if event::poll(Duration::from_millis(0))? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(Some(key));
            }
        }
    }
    Ok(None)
}

/// Returns true when the operator asked to quit.
fn handle_key(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    tx: &mpsc::UnboundedSender<AppEvent>,
) -> bool {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Tab => app.toggle_focused_pane(),
        KeyCode::Up | KeyCode::Char('k') => app.previous_item(),
        KeyCode::Down | KeyCode::Char('j') => app.next_item(),
        KeyCode::PageUp => app.scroll_log_up(10),
        KeyCode::PageDown => app.scroll_log_down(10),
        KeyCode::Home => app.scroll_log_to_top(),
        KeyCode::End => app.scroll_log_to_bottom(),
        // the guard inside start_flash refuses a second attempt
        KeyCode::Enter | KeyCode::Char('w') => app.start_flash(tx.clone()),
        KeyCode::Char('r') => {
            if app.controls_enabled {
                app.refresh_ports();
                app.refresh_firmware_files();
            }
        }
        KeyCode::Char('c') => {
            if app.controls_enabled {
                app.clear_log();
            }
        }
        _ => {}
    }
    false
}
