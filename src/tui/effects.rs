//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only (no direct UI mutations).
//!
//! This keeps the reducer pure: it only mutates state and returns effects,
//! never performs I/O or spawns tasks directly.

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Issue `GET /user` off the UI thread.
    FetchUser,

    /// Issue `GET /logout` off the UI thread.
    Logout,

    /// Open a URL in the system browser (the login redirect).
    OpenBrowser { url: String },

    /// Write text to the system clipboard.
    CopyToClipboard { text: String },
}
