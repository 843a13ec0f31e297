//! Session view reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(state, event)`
//! and executes the returned effects.
//!
//! This is the single source of truth for how events modify the session.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::api::login_url;
use crate::tui::effects::UiEffect;
use crate::tui::events::UiEvent;
use crate::tui::state::{AppState, FetchStatus, Notice, SessionState};

/// Ticks a notice stays on the status line before it expires.
pub const NOTICE_TICKS: usize = 40;

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(state: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            state.spinner_frame = state.spinner_frame.wrapping_add(1);
            if state.notice.is_some() {
                state.notice_age += 1;
                if state.notice_age > NOTICE_TICKS {
                    state.notice = None;
                    state.notice_age = 0;
                }
            }
            vec![]
        }

        UiEvent::Terminal(term_event) => handle_terminal_event(state, &term_event),

        UiEvent::UserFetchStarted { rx } => {
            state.user_rx = Some(rx);
            if let SessionState::LoggedOut { fetch } = &mut state.session {
                *fetch = FetchStatus::Loading;
            }
            vec![]
        }

        UiEvent::UserLoaded(result) => {
            handle_user_loaded(state, result);
            vec![]
        }

        UiEvent::LogoutStarted { rx } => {
            state.logout_rx = Some(rx);
            if let SessionState::LoggedIn { logout_pending, .. } = &mut state.session {
                *logout_pending = true;
            }
            vec![]
        }

        UiEvent::LogoutFinished(result) => {
            handle_logout_finished(state, result);
            vec![]
        }

        UiEvent::CopyFinished(result) => {
            match result {
                Ok(()) => state.set_notice(Notice::Copied),
                Err(msg) => state.set_notice(Notice::CopyFailed(msg)),
            }
            vec![]
        }

        UiEvent::BrowserOpenFinished(result) => {
            match result {
                Ok(()) => state.set_notice(Notice::BrowserOpened),
                Err(msg) => state.set_notice(Notice::BrowserFailed(msg)),
            }
            vec![]
        }
    }
}

/// Applies the `/user` decision rule: `error == false` plus a `name` field
/// means logged in, anything else means logged out. Transport failures never
/// fabricate a login and never clear one.
fn handle_user_loaded(
    state: &mut AppState,
    result: Result<crate::api::UserDocument, crate::api::ApiError>,
) {
    state.user_rx = None;
    match result {
        Ok(doc) if doc.is_logged_in() => {
            state.session = SessionState::LoggedIn {
                profile: doc,
                logout_pending: false,
            };
        }
        Ok(_) => {
            state.session = SessionState::LoggedOut {
                fetch: FetchStatus::Idle,
            };
        }
        Err(e) => match &mut state.session {
            SessionState::LoggedOut { fetch } => {
                *fetch = FetchStatus::Failed(e.to_string());
            }
            SessionState::LoggedIn { .. } => {
                state.set_notice(Notice::RefreshFailed(e.to_string()));
            }
        },
    }
}

/// Applies the `/logout` decision rule: only `ok == true` clears the local
/// session; everything else leaves it unchanged and reports the failure.
fn handle_logout_finished(
    state: &mut AppState,
    result: Result<crate::api::LogoutResponse, crate::api::ApiError>,
) {
    state.logout_rx = None;
    if let SessionState::LoggedIn { logout_pending, .. } = &mut state.session {
        *logout_pending = false;
    }
    match result {
        Ok(resp) if resp.ok => {
            state.session = SessionState::LoggedOut {
                fetch: FetchStatus::Idle,
            };
        }
        Ok(_) => {
            state.set_notice(Notice::LogoutFailed(
                "the gateway refused the logout".to_string(),
            ));
        }
        Err(e) => {
            state.set_notice(Notice::LogoutFailed(e.to_string()));
        }
    }
}

fn handle_terminal_event(state: &mut AppState, event: &Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(state, key),
        // Resize is handled implicitly: the next frame reads the new size.
        _ => vec![],
    }
}

fn handle_key(state: &mut AppState, key: &KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c') if ctrl => vec![UiEffect::Quit],
        KeyCode::Char('q') => vec![UiEffect::Quit],

        // Re-fetch the profile (also how a finished browser login lands).
        KeyCode::Char('r') if state.user_rx.is_none() => vec![UiEffect::FetchUser],

        // Hand control to the external login page.
        KeyCode::Char('l') if !state.session.is_logged_in() => {
            let url = login_url(state.config.effective_base_url(), &state.config.provider);
            vec![UiEffect::OpenBrowser { url }]
        }

        // Logout is accepted whenever none is in flight; if it races the
        // identity fetch, whichever completion lands last wins.
        KeyCode::Char('o') if state.logout_rx.is_none() => vec![UiEffect::Logout],

        KeyCode::Char('c') => copy_kubeconfig(state),

        _ => vec![],
    }
}

/// Copies the kubeconfig from the in-memory profile, never from rendered
/// text. Does nothing while logged out.
fn copy_kubeconfig(state: &mut AppState) -> Vec<UiEffect> {
    let Some(profile) = state.session.profile() else {
        return vec![];
    };
    match &profile.kubeconfig {
        Some(text) => {
            let text = text.clone();
            vec![UiEffect::CopyToClipboard { text }]
        }
        None => {
            state.set_notice(Notice::CopyFailed("profile has no kubeconfig".to_string()));
            vec![]
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
    use tokio::sync::oneshot;

    use super::*;
    use crate::api::{ApiError, ApiErrorKind, LogoutResponse, UserDocument};
    use crate::config::Config;

    fn test_state() -> AppState {
        AppState::new(Config {
            base_url: "https://gw.example.com".to_string(),
            provider: "spotify".to_string(),
        })
    }

    fn profile(name: &str, kubeconfig: Option<&str>) -> UserDocument {
        serde_json::from_value(serde_json::json!({
            "error": false,
            "name": name,
            "kubeconfig": kubeconfig,
        }))
        .unwrap()
    }

    fn key(code: KeyCode) -> UiEvent {
        UiEvent::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    /// `/user` with `error: false` and a name logs the session in, profile
    /// stored verbatim.
    #[test]
    fn test_user_loaded_with_name_logs_in() {
        let mut state = test_state();
        let doc: UserDocument = serde_json::from_value(serde_json::json!({
            "error": false,
            "name": "Alice",
            "kubeconfig": "apiVersion: v1...",
            "playlist": "warmup",
        }))
        .unwrap();

        update(&mut state, UiEvent::UserLoaded(Ok(doc.clone())));

        assert!(state.session.is_logged_in());
        assert_eq!(state.session.profile(), Some(&doc));
    }

    /// `/user` with the error flag set stays logged out.
    #[test]
    fn test_user_loaded_error_flag_stays_logged_out() {
        let mut state = test_state();
        let doc: UserDocument = serde_json::from_value(serde_json::json!({"error": true})).unwrap();

        update(&mut state, UiEvent::UserLoaded(Ok(doc)));

        assert!(!state.session.is_logged_in());
    }

    /// `/user` without a name stays logged out.
    #[test]
    fn test_user_loaded_missing_name_stays_logged_out() {
        let mut state = test_state();
        let doc: UserDocument =
            serde_json::from_value(serde_json::json!({"error": false})).unwrap();

        update(&mut state, UiEvent::UserLoaded(Ok(doc)));

        assert!(!state.session.is_logged_in());
    }

    /// A transport failure keeps the session logged out and records the
    /// reason for the distinguished failure presentation.
    #[test]
    fn test_user_fetch_error_marks_failed() {
        let mut state = test_state();

        update(
            &mut state,
            UiEvent::UserLoaded(Err(ApiError::new(ApiErrorKind::Connect, "refused"))),
        );

        assert!(!state.session.is_logged_in());
        assert_eq!(
            state.session,
            SessionState::LoggedOut {
                fetch: FetchStatus::Failed("refused".to_string())
            }
        );
    }

    /// A failed refresh never clears an existing login.
    #[test]
    fn test_refresh_error_keeps_login() {
        let mut state = test_state();
        update(
            &mut state,
            UiEvent::UserLoaded(Ok(profile("Alice", Some("apiVersion: v1...")))),
        );

        update(
            &mut state,
            UiEvent::UserLoaded(Err(ApiError::new(ApiErrorKind::Timeout, "timed out"))),
        );

        assert!(state.session.is_logged_in());
        assert_eq!(
            state.notice,
            Some(Notice::RefreshFailed("timed out".to_string()))
        );
    }

    /// A refresh that comes back anonymous logs the session out.
    #[test]
    fn test_refresh_anonymous_logs_out() {
        let mut state = test_state();
        update(&mut state, UiEvent::UserLoaded(Ok(profile("Alice", None))));
        assert!(state.session.is_logged_in());

        let doc: UserDocument = serde_json::from_value(serde_json::json!({"error": true})).unwrap();
        update(&mut state, UiEvent::UserLoaded(Ok(doc)));

        assert!(!state.session.is_logged_in());
    }

    /// `/logout` with `ok: true` clears the session.
    #[test]
    fn test_logout_ok_clears_session() {
        let mut state = test_state();
        update(&mut state, UiEvent::UserLoaded(Ok(profile("Alice", None))));

        update(
            &mut state,
            UiEvent::LogoutFinished(Ok(LogoutResponse { ok: true })),
        );

        assert!(!state.session.is_logged_in());
        assert_eq!(state.session.profile(), None);
    }

    /// `/logout` with `ok: false` leaves the session unchanged.
    #[test]
    fn test_logout_not_ok_keeps_session() {
        let mut state = test_state();
        update(&mut state, UiEvent::UserLoaded(Ok(profile("Alice", None))));

        update(
            &mut state,
            UiEvent::LogoutFinished(Ok(LogoutResponse { ok: false })),
        );

        assert!(state.session.is_logged_in());
        assert!(matches!(state.notice, Some(Notice::LogoutFailed(_))));
    }

    /// A logout transport failure leaves the session unchanged.
    #[test]
    fn test_logout_error_keeps_session() {
        let mut state = test_state();
        update(&mut state, UiEvent::UserLoaded(Ok(profile("Alice", None))));

        update(
            &mut state,
            UiEvent::LogoutFinished(Err(ApiError::new(ApiErrorKind::Connect, "refused"))),
        );

        assert!(state.session.is_logged_in());
        assert!(matches!(state.notice, Some(Notice::LogoutFailed(_))));
    }

    /// The copy action emits the kubeconfig from the in-memory profile.
    #[test]
    fn test_copy_emits_kubeconfig() {
        let mut state = test_state();
        update(
            &mut state,
            UiEvent::UserLoaded(Ok(profile("Alice", Some("apiVersion: v1...")))),
        );

        let effects = update(&mut state, key(KeyCode::Char('c')));

        assert_eq!(
            effects,
            vec![UiEffect::CopyToClipboard {
                text: "apiVersion: v1...".to_string()
            }]
        );
    }

    /// Copying while logged out does nothing.
    #[test]
    fn test_copy_requires_profile() {
        let mut state = test_state();

        let effects = update(&mut state, key(KeyCode::Char('c')));

        assert!(effects.is_empty());
        assert!(state.notice.is_none());
    }

    /// Copying without a kubeconfig in the profile reports a notice.
    #[test]
    fn test_copy_without_kubeconfig_reports_failure() {
        let mut state = test_state();
        update(&mut state, UiEvent::UserLoaded(Ok(profile("Alice", None))));

        let effects = update(&mut state, key(KeyCode::Char('c')));

        assert!(effects.is_empty());
        assert!(matches!(state.notice, Some(Notice::CopyFailed(_))));
    }

    /// The login key opens the browser at the provider login path.
    #[test]
    fn test_login_key_opens_browser() {
        let mut state = test_state();

        let effects = update(&mut state, key(KeyCode::Char('l')));

        assert_eq!(
            effects,
            vec![UiEffect::OpenBrowser {
                url: "https://gw.example.com/login/spotify".to_string()
            }]
        );
    }

    /// The login key is a no-op while logged in.
    #[test]
    fn test_login_key_ignored_when_logged_in() {
        let mut state = test_state();
        update(&mut state, UiEvent::UserLoaded(Ok(profile("Alice", None))));

        let effects = update(&mut state, key(KeyCode::Char('l')));

        assert!(effects.is_empty());
    }

    /// q and Ctrl+C both quit.
    #[test]
    fn test_quit_keys() {
        let mut state = test_state();
        assert_eq!(update(&mut state, key(KeyCode::Char('q'))), vec![
            UiEffect::Quit
        ]);

        let ctrl_c = UiEvent::Terminal(Event::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        assert_eq!(update(&mut state, ctrl_c), vec![UiEffect::Quit]);
    }

    /// The refresh key is swallowed while a fetch is already in flight.
    #[test]
    fn test_refresh_not_reissued_while_pending() {
        let mut state = test_state();
        let (_tx, rx) = oneshot::channel();
        update(&mut state, UiEvent::UserFetchStarted { rx });

        let effects = update(&mut state, key(KeyCode::Char('r')));

        assert!(effects.is_empty());
    }

    /// Logout racing the identity fetch: whichever completion lands last
    /// decides the final state.
    #[test]
    fn test_race_last_completion_wins() {
        let mut state = test_state();
        let (_tx, rx) = oneshot::channel();
        update(&mut state, UiEvent::LogoutStarted { rx });

        // Identity fetch resolves first.
        update(&mut state, UiEvent::UserLoaded(Ok(profile("Alice", None))));
        assert!(state.session.is_logged_in());

        // Logout lands last and wins.
        update(
            &mut state,
            UiEvent::LogoutFinished(Ok(LogoutResponse { ok: true })),
        );
        assert!(!state.session.is_logged_in());
    }

    /// Notices expire after NOTICE_TICKS ticks.
    #[test]
    fn test_notice_expires() {
        let mut state = test_state();
        state.set_notice(Notice::Copied);

        for _ in 0..=NOTICE_TICKS {
            update(&mut state, UiEvent::Tick);
        }

        assert!(state.notice.is_none());
    }

    /// Starting a fetch while logged out shows the loading presentation.
    #[test]
    fn test_fetch_started_marks_loading() {
        let mut state = test_state();
        let (_tx, rx) = oneshot::channel();

        update(&mut state, UiEvent::UserFetchStarted { rx });

        assert_eq!(
            state.session,
            SessionState::LoggedOut {
                fetch: FetchStatus::Loading
            }
        );
        assert!(state.is_busy());
    }
}
