//! Text rendering for the terminal client.

use super::{ClientError, ClientNote, SessionState};

const UNTITLED: &str = "(untitled)";
const SAVING: &str = "(saving)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Warning,
    Error,
}

/// A one-line notification, e.g. `✓ Login Successful!`.
pub fn render_notice(kind: NoticeKind, message: &str) -> String {
    let symbol = match kind {
        NoticeKind::Success => '✓',
        NoticeKind::Info => '•',
        NoticeKind::Warning => '!',
        NoticeKind::Error => '✗',
    };
    format!("{} {}", symbol, message)
}

/// Notification for a failed account or note action.
pub fn render_error(error: &ClientError) -> String {
    let kind = match error {
        ClientError::MissingFields | ClientError::NotLoggedIn => NoticeKind::Warning,
        _ => NoticeKind::Error,
    };
    let mut line = render_notice(kind, &error.to_string());
    if error.is_auth_failure() || matches!(error, ClientError::NotLoggedIn) {
        line.push_str("\n  Run `lumina login` to start a session.");
    }
    line
}

/// Title bar: the app name, plus the account when known.
pub fn render_header(state: SessionState, email: Option<&str>) -> String {
    match (state, email) {
        (SessionState::LoggedIn, Some(email)) => format!("Lumina · {}", email),
        (SessionState::LoggedIn, None) => "Lumina · logged in".to_string(),
        (SessionState::LoggedOut, _) => "Lumina".to_string(),
    }
}

/// Render the note list.
///
/// Example output:
/// ```text
/// #1  Groceries
///     eggs, milk
///
/// #…  Call Sam (saving)
/// ```
pub fn render_notes(notes: &[ClientNote]) -> String {
    if notes.is_empty() {
        return "No notes yet. Add one with `lumina add`.\n".to_string();
    }

    let blocks: Vec<String> = notes.iter().map(render_note).collect();
    blocks.join("\n")
}

fn render_note(note: &ClientNote) -> String {
    let label = match note.id {
        Some(id) => format!("#{}", id),
        None => "#…".to_string(),
    };
    let title = note
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(UNTITLED);

    let width = (label.chars().count() + 2).max(4);
    let mut output = format!("{:<width$}{}", label, title, width = width);
    if note.is_provisional() {
        output.push(' ');
        output.push_str(SAVING);
    }
    output.push('\n');

    let indent = " ".repeat(width);
    if let Some(content) = note.content.as_deref() {
        for line in content.lines() {
            output.push_str(&indent);
            output.push_str(line);
            output.push('\n');
        }
    }
    output
}
