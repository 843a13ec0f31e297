//! Full-screen session view.
//!
//! Uses the alternate screen buffer for a persistent interface.
//!
//! Architecture (Elm-like):
//! - `TuiRuntime` (runtime.rs): owns terminal + state, runs event loop,
//!   executes effects
//! - `AppState` (state.rs): all view state, no terminal
//! - `update()` (update.rs): the reducer - all state mutations happen here
//! - `render()` (render.rs): pure render, no mutations

pub mod clipboard;
pub mod effects;
pub mod events;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stderr};

use anyhow::Result;
pub use runtime::TuiRuntime;

use crate::config::Config;

/// Runs the interactive session view.
///
/// Must be called from within a tokio runtime context; gateway calls are
/// spawned onto it.
pub fn run(config: &Config) -> Result<()> {
    // The session view requires a terminal to render.
    if !stderr().is_terminal() {
        anyhow::bail!(
            "The session view requires a terminal.\n\
             Use `dj-console user` for scripted access."
        );
    }

    let mut runtime = TuiRuntime::new(config.clone())?;
    runtime.run()
}
