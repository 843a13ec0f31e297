//! Pure view functions for the session view.
//!
//! Functions here take `&AppState` by immutable reference, draw to a ratatui
//! Frame, and never mutate state or return effects. Server-supplied strings
//! are rendered as span data, never interpreted as markup.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::api::UserDocument;
use crate::tui::state::{AppState, FetchStatus, Notice, SessionState};

/// Height of the title line.
const TITLE_HEIGHT: u16 = 1;

/// Height of the status line at the bottom.
const STATUS_HEIGHT: u16 = 1;

/// Spinner frames for status line animation.
const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// Spinner speed divisor (render frames per spinner frame).
const SPINNER_SPEED_DIVISOR: usize = 6;

/// Renders the entire session view to the frame.
pub fn render(state: &AppState, frame: &mut Frame) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(TITLE_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(area);

    render_title(state, frame, chunks[0]);
    render_body(state, frame, chunks[1]);
    render_status_line(state, frame, chunks[2]);
}

fn render_title(state: &AppState, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled("dj-console", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(
            state.config.effective_base_url().to_string(),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

fn render_body(state: &AppState, frame: &mut Frame, area: Rect) {
    match &state.session {
        SessionState::LoggedOut { fetch } => {
            let lines = logged_out_lines(fetch, &state.config.provider);
            frame.render_widget(Paragraph::new(lines), inset(area));
        }
        SessionState::LoggedIn { profile, .. } => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(1)])
                .split(area);

            let greeting = logged_in_lines(profile);
            frame.render_widget(Paragraph::new(greeting), inset(rows[0]));

            let kubeconfig = profile.kubeconfig.as_deref().unwrap_or("(no kubeconfig)");
            let pane = Paragraph::new(kubeconfig).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" kubeconfig ")
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
            frame.render_widget(pane, rows[1]);
        }
    }
}

/// Body text for the logged-out presentation.
pub(crate) fn logged_out_lines(fetch: &FetchStatus, provider: &str) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from("Hello there. This is dj-kubelet."),
        Line::from(""),
    ];
    match fetch {
        FetchStatus::Loading => {
            lines.push(Line::from(Span::styled(
                "Checking session...",
                Style::default().fg(Color::Yellow),
            )));
        }
        FetchStatus::Idle => {
            lines.push(Line::from(Span::styled(
                "Not logged in.",
                Style::default().fg(Color::DarkGray),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("l", key_style()),
                Span::raw(format!("  log in with {}", provider)),
            ]));
        }
        FetchStatus::Failed(reason) => {
            lines.push(Line::from(Span::styled(
                "Could not reach the gateway.",
                Style::default().fg(Color::Red),
            )));
            lines.push(Line::from(Span::styled(
                reason.clone(),
                Style::default().fg(Color::DarkGray),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("r", key_style()),
                Span::raw("  retry"),
            ]));
        }
    }
    lines
}

/// Greeting lines for the logged-in presentation.
pub(crate) fn logged_in_lines(profile: &UserDocument) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![
            Span::raw("Nice to have you here "),
            Span::styled(
                profile.display_name().to_string(),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("! Let's rock and roll!"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("c", key_style()),
            Span::raw("  copy kubeconfig   "),
            Span::styled("o", key_style()),
            Span::raw("  log out   "),
            Span::styled("r", key_style()),
            Span::raw("  refresh"),
        ]),
    ]
}

/// Renders the status line below the body.
fn render_status_line(state: &AppState, frame: &mut Frame, area: Rect) {
    let spans: Vec<Span> = if let Some(notice) = &state.notice {
        notice_spans(notice)
    } else if state.is_busy() {
        let spinner_idx = (state.spinner_frame / SPINNER_SPEED_DIVISOR) % SPINNER_FRAMES.len();
        vec![
            Span::styled(
                SPINNER_FRAMES[spinner_idx],
                Style::default().fg(Color::Yellow),
            ),
            Span::raw(" "),
            Span::styled("Talking to the gateway...", Style::default().fg(Color::Yellow)),
        ]
    } else {
        vec![
            Span::styled("q", key_style()),
            Span::raw(" quit  "),
            Span::styled("r", key_style()),
            Span::raw(" refresh"),
        ]
    };

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub(crate) fn notice_spans(notice: &Notice) -> Vec<Span<'static>> {
    match notice {
        Notice::Copied => vec![Span::styled(
            "Kubeconfig copied to clipboard.",
            Style::default().fg(Color::Green),
        )],
        Notice::CopyFailed(msg) => vec![Span::styled(
            format!("Copy failed: {}", msg),
            Style::default().fg(Color::Red),
        )],
        Notice::LogoutFailed(msg) => vec![Span::styled(
            format!("Logout failed: {}", msg),
            Style::default().fg(Color::Red),
        )],
        Notice::RefreshFailed(msg) => vec![Span::styled(
            format!("Refresh failed: {}", msg),
            Style::default().fg(Color::Yellow),
        )],
        Notice::BrowserOpened => vec![
            Span::styled(
                "Browser opened for login.",
                Style::default().fg(Color::Green),
            ),
            Span::raw("  Press "),
            Span::styled("r", key_style()),
            Span::raw(" when done."),
        ],
        Notice::BrowserFailed(msg) => vec![Span::styled(
            format!("Could not open browser: {}", msg),
            Style::default().fg(Color::Red),
        )],
    }
}

fn key_style() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

/// One-cell horizontal inset so body text doesn't touch the border.
fn inset(area: Rect) -> Rect {
    Rect {
        x: area.x + 1,
        y: area.y,
        width: area.width.saturating_sub(2),
        height: area.height,
    }
}
