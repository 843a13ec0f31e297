//! UI event types.
//!
//! All external inputs (terminal, async results) are converted to `UiEvent`
//! before being processed by the reducer.

use crossterm::event::Event as CrosstermEvent;
use tokio::sync::oneshot;

use crate::api::{ApiError, LogoutResponse, UserDocument};

/// Unified event enum for the session view.
#[derive(Debug)]
pub enum UiEvent {
    /// Timer tick (spinner, notice expiry).
    Tick,

    /// Terminal input event (key, resize).
    Terminal(CrosstermEvent),

    /// Identity fetch spawned; the reducer stores the receiver.
    UserFetchStarted {
        rx: oneshot::Receiver<Result<UserDocument, ApiError>>,
    },

    /// Identity fetch finished.
    UserLoaded(Result<UserDocument, ApiError>),

    /// Logout spawned; the reducer stores the receiver.
    LogoutStarted {
        rx: oneshot::Receiver<Result<LogoutResponse, ApiError>>,
    },

    /// Logout finished.
    LogoutFinished(Result<LogoutResponse, ApiError>),

    /// Clipboard write finished.
    CopyFinished(Result<(), String>),

    /// Browser launch for the login page finished.
    BrowserOpenFinished(Result<(), String>),
}
