//! Session view runtime - owns terminal, runs event loop, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here. The
//! reducer stays pure and produces effects; this module executes them,
//! spawning gateway requests as tokio tasks and feeding their results back
//! in as events.

use std::io::Stdout;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::event;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::api::{ApiError, ApiErrorKind, ConsoleClient};
use crate::config::Config;
use crate::tui::effects::UiEffect;
use crate::tui::events::UiEvent;
use crate::tui::state::AppState;
use crate::tui::{clipboard, render, terminal, update};

/// Poll duration while a gateway call is in flight (spinner cadence).
pub const FRAME_DURATION: std::time::Duration = std::time::Duration::from_millis(16);

/// Poll duration when idle. Longer timeout reduces CPU usage when nothing
/// is happening.
pub const IDLE_POLL_DURATION: std::time::Duration = std::time::Duration::from_millis(100);

/// Full-screen session view runtime.
///
/// Owns the terminal and state. Runs the event loop and executes effects.
/// Terminal state is restored on drop, panic, or Ctrl+C.
pub struct TuiRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    client: Arc<ConsoleClient>,
    pub state: AppState,
}

impl TuiRuntime {
    /// Creates a new runtime: panic hook, raw mode, alternate screen.
    pub fn new(config: Config) -> Result<Self> {
        terminal::install_panic_hook();

        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;
        let client = Arc::new(ConsoleClient::new(config.effective_base_url()));
        let state = AppState::new(config);

        Ok(Self {
            terminal,
            client,
            state,
        })
    }

    /// Runs the main event loop.
    pub fn run(&mut self) -> Result<()> {
        // The identity fetch goes out before the first frame.
        self.execute_effect(UiEffect::FetchUser);

        let mut dirty = true; // start dirty to ensure initial render

        while !self.state.should_quit {
            let events = self.collect_events()?;

            for event in events {
                // Ticks only redraw while something animates; everything
                // else marks the view dirty.
                let marks_dirty = match &event {
                    UiEvent::Tick => self.state.is_busy() || self.state.notice.is_some(),
                    _ => true,
                };
                let effects = update::update(&mut self.state, event);
                if marks_dirty || !effects.is_empty() {
                    dirty = true;
                }
                self.execute_effects(effects);
            }

            if dirty {
                self.terminal.draw(|frame| {
                    render::render(&self.state, frame);
                })?;
                dirty = false;
            }
        }

        Ok(())
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    /// Collects events from all sources (terminal, pending gateway calls).
    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        // Always emit a tick for animation and notice expiry.
        events.push(UiEvent::Tick);

        self.collect_user_result(&mut events);
        self.collect_logout_result(&mut events);

        let poll_duration = if self.state.is_busy() {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        // Batch all available terminal events to avoid one-event-per-frame lag.
        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(std::time::Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        Ok(events)
    }

    /// Collects the identity fetch result if available.
    fn collect_user_result(&mut self, events: &mut Vec<UiEvent>) {
        let Some(rx) = &mut self.state.user_rx else {
            return;
        };
        match rx.try_recv() {
            Ok(result) => events.push(UiEvent::UserLoaded(result)),
            Err(oneshot::error::TryRecvError::Empty) => {}
            Err(oneshot::error::TryRecvError::Closed) => {
                events.push(UiEvent::UserLoaded(Err(ApiError::new(
                    ApiErrorKind::Connect,
                    "identity fetch task failed",
                ))));
            }
        }
    }

    /// Collects the logout result if available.
    fn collect_logout_result(&mut self, events: &mut Vec<UiEvent>) {
        let Some(rx) = &mut self.state.logout_rx else {
            return;
        };
        match rx.try_recv() {
            Ok(result) => events.push(UiEvent::LogoutFinished(result)),
            Err(oneshot::error::TryRecvError::Empty) => {}
            Err(oneshot::error::TryRecvError::Closed) => {
                events.push(UiEvent::LogoutFinished(Err(ApiError::new(
                    ApiErrorKind::Connect,
                    "logout task failed",
                ))));
            }
        }
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    fn dispatch_event(&mut self, event: UiEvent) {
        let effects = update::update(&mut self.state, event);
        if !effects.is_empty() {
            self.execute_effects(effects);
        }
    }

    /// Executes a single effect.
    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }

            UiEffect::OpenBrowser { url } => {
                info!(%url, "opening login page");
                let result = open::that(&url).map_err(|e| e.to_string());
                if let Err(ref e) = result {
                    warn!(error = %e, "browser launch failed");
                }
                self.dispatch_event(UiEvent::BrowserOpenFinished(result));
            }

            UiEffect::FetchUser => {
                if self.state.user_rx.is_none() {
                    let event = spawn_user_fetch(Arc::clone(&self.client));
                    self.dispatch_event(event);
                }
            }

            UiEffect::Logout => {
                if self.state.logout_rx.is_none() {
                    let event = spawn_logout(Arc::clone(&self.client));
                    self.dispatch_event(event);
                }
            }

            UiEffect::CopyToClipboard { text } => {
                let result = clipboard::Clipboard::copy(&text).map_err(|e| e.to_string());
                if let Err(ref e) = result {
                    warn!(error = %e, "clipboard write failed");
                }
                self.dispatch_event(UiEvent::CopyFinished(result));
            }
        }
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}

/// Spawns the identity fetch as a tokio task.
fn spawn_user_fetch(client: Arc<ConsoleClient>) -> UiEvent {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let result = client.fetch_user().await;
        let _ = tx.send(result);
    });
    UiEvent::UserFetchStarted { rx }
}

/// Spawns the logout call as a tokio task.
fn spawn_logout(client: Arc<ConsoleClient>) -> UiEvent {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let result = client.logout().await;
        let _ = tx.send(result);
    });
    UiEvent::LogoutStarted { rx }
}
