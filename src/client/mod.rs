//! Terminal client for the Lumina API.
//!
//! - [`NotesClient`]: HTTP transport (reqwest), one method per endpoint.
//! - [`TokenStore`]: durable storage for the session token, the only thing the
//!   client persists between runs.
//! - [`NotesController`]: session state and the local note list, kept in step with
//!   the server through optimistic updates.
//! - [`render`]: text output for the CLI, driven by [`commands`].

pub mod commands;
mod http;
pub mod render;
mod state;
mod storage;

use std::future::Future;

use thiserror::Error;

use crate::models::*;

pub use http::NotesClient;
pub use state::{ClientKey, ClientNote, NotesController, PendingDelete, SessionState};
pub use storage::TokenStore;

/// Client-side failures.
///
/// Display strings are written to be shown to the user as-is.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Wrong email or password")]
    InvalidCredentials,

    /// The server answered with an error status; `message` is its `error` field.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Connection Failed. Is Server Running?")]
    Transport(#[from] reqwest::Error),

    #[error("Could not access token storage: {0}")]
    Storage(#[from] std::io::Error),
}

impl ClientError {
    /// Whether the server refused the session token.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Rejected { status: 401 | 403, .. })
    }
}

/// The server operations the controller needs.
///
/// [`NotesClient`] implements this over HTTP; tests substitute an in-process fake.
pub trait NotesBackend {
    fn register(
        &self,
        input: &CredentialsInput,
    ) -> impl Future<Output = Result<User, ClientError>> + Send;

    /// Fails with [`ClientError::InvalidCredentials`] on a password mismatch.
    fn login(
        &self,
        input: &CredentialsInput,
    ) -> impl Future<Output = Result<LoginResponse, ClientError>> + Send;

    fn list_notes(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Vec<Note>, ClientError>> + Send;

    fn create_note(
        &self,
        token: &str,
        input: &NoteInput,
    ) -> impl Future<Output = Result<Note, ClientError>> + Send;

    fn delete_note(
        &self,
        token: &str,
        id: i64,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    fn edit_note(
        &self,
        token: &str,
        id: i64,
        input: &NoteInput,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;
}
