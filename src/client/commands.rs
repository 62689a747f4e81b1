//! Client subcommands of the `lumina` binary.
//!
//! Every invocation resumes the saved session, refreshes the note list, performs
//! one action and prints the resulting list. Account actions print a
//! notification instead.

use clap::Subcommand;

use super::render::{render_error, render_header, render_notes, render_notice, NoticeKind};
use super::{ClientError, NotesClient, NotesController, SessionState, TokenStore};
use crate::config::ClientConfig;
use crate::models::NoteInput;

#[derive(Debug, Subcommand)]
pub enum ClientCommand {
    /// Create an account
    Register {
        #[arg(short, long, default_value = "")]
        email: String,
        #[arg(short, long, default_value = "", env = "LUMINA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Log in and remember the session
    Login {
        #[arg(short, long, default_value = "")]
        email: String,
        #[arg(short, long, default_value = "", env = "LUMINA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the saved session
    Logout,
    /// List your notes
    Notes,
    /// Add a note
    Add {
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        content: Option<String>,
    },
    /// Change the title and/or content of a note
    Edit {
        id: i64,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        content: Option<String>,
    },
    /// Delete a note
    Delete { id: i64 },
}

/// Run one client command. Returns whether it succeeded.
pub async fn run(command: ClientCommand, config: &ClientConfig) -> anyhow::Result<bool> {
    let backend = NotesClient::new(&config.url);
    let store = TokenStore::new(config.token_path()?);
    let mut controller = NotesController::open(backend, store)?;

    match command {
        ClientCommand::Register { email, password } => {
            match controller.register(&email, &password).await {
                Ok(_) => {
                    println!(
                        "{}",
                        render_notice(
                            NoticeKind::Success,
                            "Registration successful! Please log in."
                        )
                    );
                    Ok(true)
                }
                Err(e) => fail(&e),
            }
        }
        ClientCommand::Login { email, password } => {
            match controller.login(&email, &password).await {
                Ok(()) => {
                    println!("{}", render_notice(NoticeKind::Success, "Login Successful!"));
                    print_notes(&controller);
                    Ok(true)
                }
                Err(e) => fail(&e),
            }
        }
        ClientCommand::Logout => {
            controller.logout()?;
            println!("{}", render_notice(NoticeKind::Info, "Logged out."));
            Ok(true)
        }
        ClientCommand::Notes => note_action(&mut controller, NoteAction::List).await,
        ClientCommand::Add { title, content } => {
            note_action(&mut controller, NoteAction::Add(NoteInput { title, content })).await
        }
        ClientCommand::Edit { id, title, content } => {
            if title.is_none() && content.is_none() {
                println!("{}", render_notice(NoticeKind::Warning, "Nothing to change."));
                return Ok(false);
            }
            let input = NoteInput { title, content };
            note_action(&mut controller, NoteAction::Edit { id, input }).await
        }
        ClientCommand::Delete { id } => note_action(&mut controller, NoteAction::Delete(id)).await,
    }
}

enum NoteAction {
    List,
    Add(NoteInput),
    Edit { id: i64, input: NoteInput },
    Delete(i64),
}

/// Refresh, apply `action`, print the list.
///
/// Note failures are reconciled and logged by the controller; the printed list
/// shows where things ended up.
async fn note_action(
    controller: &mut NotesController<NotesClient>,
    action: NoteAction,
) -> anyhow::Result<bool> {
    if controller.state() == SessionState::LoggedOut {
        return fail(&ClientError::NotLoggedIn);
    }
    if let Err(e) = controller.refresh().await {
        tracing::warn!("Error fetching notes: {}", e);
        if e.is_auth_failure() {
            return fail(&e);
        }
    }

    let ok = match action {
        NoteAction::List => true,
        NoteAction::Add(input) => controller.add(input).await.is_ok(),
        NoteAction::Edit { id, input } => {
            controller.edit(id, input.title, input.content).await.is_ok()
        }
        NoteAction::Delete(id) => controller.delete(id).await.is_ok(),
    };

    print_notes(controller);
    Ok(ok)
}

fn print_notes(controller: &NotesController<NotesClient>) {
    println!("{}", render_header(controller.state(), controller.email()));
    println!();
    print!("{}", render_notes(controller.notes()));
}

fn fail(error: &ClientError) -> anyhow::Result<bool> {
    eprintln!("{}", render_error(error));
    Ok(false)
}
