//! TUI Runner
//!
//! Main event loop and terminal setup for the TUI.

use super::app::App;
use super::events::{EventHandler, TuiEvent};
use super::onboarding_render;
use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::io;

/// Calls `restore` when dropped
struct RestoreGuard<F: FnMut()> {
    restore: F,
}

impl<F: FnMut()> Drop for RestoreGuard<F> {
    fn drop(&mut self) {
        (self.restore)();
    }
}

/// Leave raw mode and the alternate screen
fn restore_terminal() {
    if let Err(e) = disable_raw_mode() {
        tracing::warn!("Failed to disable raw mode: {}", e);
    }
    if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen, DisableBracketedPaste, Show) {
        tracing::warn!("Failed to restore terminal: {}", e);
    }
}

/// Run the TUI application. Returns whether the wizard was completed.
pub async fn run(mut app: App) -> Result<bool> {
    // Setup terminal. From here on the guard restores it on every exit path.
    enable_raw_mode().context("Failed to enable raw mode")?;
    let _restore = RestoreGuard {
        restore: restore_terminal,
    };
    execute!(io::stdout(), EnterAlternateScreen, EnableBracketedPaste)
        .context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
    terminal.clear().context("Failed to clear terminal")?;

    // Start terminal event listener
    EventHandler::start_terminal_listener(app.event_sender());
    tracing::info!("Onboarding started (chat provider: {})", app.provider_name());

    run_loop(&mut terminal, &mut app).await?;
    Ok(app.wizard.is_complete())
}

/// Main event loop
async fn run_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        // Render
        terminal.draw(|f| onboarding_render::render(f, app))?;

        // Check for quit
        if app.should_quit {
            break;
        }

        // Wait for at least one event (with timeout for animation refresh)
        let event =
            tokio::time::timeout(tokio::time::Duration::from_millis(100), app.next_event()).await;

        if let Ok(Some(event)) = event {
            app.handle_event(event);

            // Drain all remaining queued events before re-rendering.
            // Coalesce Ticks to avoid redundant re-renders.
            let mut ticked = false;
            loop {
                match app.try_next_event() {
                    Some(TuiEvent::Tick) => ticked = true,
                    Some(event) => app.handle_event(event),
                    None => break,
                }
            }
            if ticked {
                app.handle_event(TuiEvent::Tick);
            }
        }
    }

    Ok(())
}
