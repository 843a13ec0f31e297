//! Session view state.
//!
//! The state object is owned by the runtime and handed to the reducer and
//! the view; nothing here is global or mutable from the outside.

use tokio::sync::oneshot;

use crate::api::{ApiError, LogoutResponse, UserDocument};
use crate::config::Config;

/// How the last identity fetch ended, for the logged-out presentation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchStatus {
    /// No fetch in flight and nothing to report.
    #[default]
    Idle,
    /// Identity fetch in flight.
    Loading,
    /// Fetch failed in transport or decode; rendered distinctly from a
    /// plain "not logged in".
    Failed(String),
}

/// The session: anonymous, or carrying a profile.
///
/// The profile is reachable only through `LoggedIn`, so the view can never
/// observe a half-authenticated state.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    LoggedOut { fetch: FetchStatus },
    LoggedIn {
        profile: UserDocument,
        logout_pending: bool,
    },
}

impl SessionState {
    pub fn is_logged_in(&self) -> bool {
        matches!(self, SessionState::LoggedIn { .. })
    }

    /// Profile of the logged-in user, if any.
    pub fn profile(&self) -> Option<&UserDocument> {
        match self {
            SessionState::LoggedIn { profile, .. } => Some(profile),
            SessionState::LoggedOut { .. } => None,
        }
    }
}

/// Transient status line notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Kubeconfig landed on the clipboard.
    Copied,
    CopyFailed(String),
    LogoutFailed(String),
    /// Profile refresh failed while logged in; the session is kept.
    RefreshFailed(String),
    /// Browser opened at the login page.
    BrowserOpened,
    BrowserFailed(String),
}

/// All session view state.
pub struct AppState {
    /// Effective configuration (CLI overrides already applied).
    pub config: Config,

    /// Current session.
    pub session: SessionState,

    /// Transient notice for the status line.
    pub notice: Option<Notice>,

    /// Ticks since the notice was set; drives expiry.
    pub notice_age: usize,

    /// Frame counter for the spinner.
    pub spinner_frame: usize,

    /// Set by the Quit effect; the event loop exits when true.
    pub should_quit: bool,

    /// Pending identity fetch, if any.
    pub user_rx: Option<oneshot::Receiver<Result<UserDocument, ApiError>>>,

    /// Pending logout, if any.
    pub logout_rx: Option<oneshot::Receiver<Result<LogoutResponse, ApiError>>>,
}

impl AppState {
    /// Creates the initial state: logged out, nothing in flight.
    ///
    /// The runtime issues the first identity fetch before the first frame.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            session: SessionState::LoggedOut {
                fetch: FetchStatus::Idle,
            },
            notice: None,
            notice_age: 0,
            spinner_frame: 0,
            should_quit: false,
            user_rx: None,
            logout_rx: None,
        }
    }

    /// True while any async operation is in flight (drives poll cadence).
    pub fn is_busy(&self) -> bool {
        self.user_rx.is_some() || self.logout_rx.is_some()
    }

    /// Sets a fresh notice, restarting the expiry clock.
    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
        self.notice_age = 0;
    }
}
