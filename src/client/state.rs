//! Session state and the optimistic local note list.
//!
//! The controller owns the session token and an in-memory mirror of the user's
//! notes. Mutations follow one round trip each:
//!
//! - **Add** shows a provisional record at once, tagged with a fresh [`ClientKey`],
//!   and swaps in the server's record when the create call returns. Reconciliation
//!   goes by that key, so two notes with identical text never get confused.
//! - **Delete** removes the record by its server id immediately and puts it back
//!   in place if the server call fails.
//! - **Edit** waits for the server and only then changes the displayed values.
//!
//! Each operation is split into `begin_*`/`finish_*` halves so an event-driven
//! front end can keep several calls in flight; the plain async methods run both
//! halves around a single request.

use uuid::Uuid;

use super::{ClientError, NotesBackend, TokenStore};
use crate::models::*;

/// Client-only identity of a displayed note.
///
/// Assigned when the record first appears locally and kept after the server id
/// is known, so render keys stay stable across reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientKey(Uuid);

impl ClientKey {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientKey {
    fn default() -> Self {
        Self::new()
    }
}

/// A note as displayed by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientNote {
    pub key: ClientKey,
    /// Server-assigned id; `None` while the create call is outstanding.
    pub id: Option<i64>,
    pub title: Option<String>,
    pub content: Option<String>,
}

impl ClientNote {
    fn provisional(key: ClientKey, input: &NoteInput) -> Self {
        Self {
            key,
            id: None,
            title: input.title.clone(),
            content: input.content.clone(),
        }
    }

    fn confirmed(key: ClientKey, note: Note) -> Self {
        Self {
            key,
            id: Some(note.id),
            title: note.title,
            content: note.content,
        }
    }

    pub fn is_provisional(&self) -> bool {
        self.id.is_none()
    }
}

impl From<Note> for ClientNote {
    fn from(note: Note) -> Self {
        Self::confirmed(ClientKey::new(), note)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    LoggedIn,
}

/// A record taken off the list by [`NotesController::begin_delete`], kept so it
/// can be restored if the server refuses the delete.
#[derive(Debug, Clone)]
pub struct PendingDelete {
    index: usize,
    note: ClientNote,
}

pub struct NotesController<B> {
    backend: B,
    store: TokenStore,
    token: Option<String>,
    email: Option<String>,
    notes: Vec<ClientNote>,
}

impl<B: NotesBackend> NotesController<B> {
    /// Create a controller, resuming any session saved in `store`.
    ///
    /// Notes are not fetched here; call [`refresh`](Self::refresh).
    pub fn open(backend: B, store: TokenStore) -> Result<Self, ClientError> {
        let token = store.load()?;
        Ok(Self {
            backend,
            store,
            token,
            email: None,
            notes: Vec::new(),
        })
    }

    pub fn state(&self) -> SessionState {
        if self.token.is_some() {
            SessionState::LoggedIn
        } else {
            SessionState::LoggedOut
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Email of the account logged in during this run, if any.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn notes(&self) -> &[ClientNote] {
        &self.notes
    }

    fn require_token(&self) -> Result<String, ClientError> {
        self.token.clone().ok_or(ClientError::NotLoggedIn)
    }

    // ============================================================
    // Session
    // ============================================================

    /// Create an account. Does not log in.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, ClientError> {
        let input = CredentialsInput::new(email, password);
        if !input.is_complete() {
            return Err(ClientError::MissingFields);
        }
        self.backend.register(&input).await
    }

    /// Log in, persist the token and load the account's notes.
    ///
    /// A failed note fetch does not fail the login; it is logged and the list
    /// stays empty.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), ClientError> {
        let input = CredentialsInput::new(email, password);
        if !input.is_complete() {
            return Err(ClientError::MissingFields);
        }

        let response = self.backend.login(&input).await?;
        let token = response
            .token
            .filter(|_| response.auth)
            .ok_or(ClientError::InvalidCredentials)?;

        self.store.save(&token)?;
        self.token = Some(token);
        self.email = response.email;
        self.notes.clear();

        if let Err(e) = self.refresh().await {
            tracing::warn!("Error fetching notes: {}", e);
        }
        Ok(())
    }

    /// Drop the session locally. The token itself stays valid on the server
    /// until it expires.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.token = None;
        self.email = None;
        self.notes.clear();
        self.store.clear()?;
        Ok(())
    }

    /// Replace the local list with the server's. No-op when logged out.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let Some(token) = self.token.clone() else {
            self.notes.clear();
            return Ok(());
        };

        let notes = self.backend.list_notes(&token).await?;
        self.notes = notes.into_iter().map(ClientNote::from).collect();
        Ok(())
    }

    // ============================================================
    // Add
    // ============================================================

    /// Show `input` as a provisional note and return its key.
    pub fn begin_add(&mut self, input: &NoteInput) -> ClientKey {
        let key = ClientKey::new();
        self.notes.push(ClientNote::provisional(key, input));
        key
    }

    /// Reconcile the provisional note `key` with the outcome of its create call.
    pub fn finish_add(
        &mut self,
        key: ClientKey,
        result: Result<Note, ClientError>,
    ) -> Result<(), ClientError> {
        match result {
            Ok(note) => {
                if let Some(slot) = self.notes.iter_mut().find(|n| n.key == key) {
                    *slot = ClientNote::confirmed(key, note);
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Error saving note: {}", e);
                self.notes.retain(|n| n.key != key);
                Err(e)
            }
        }
    }

    pub async fn add(&mut self, input: NoteInput) -> Result<ClientKey, ClientError> {
        let token = self.require_token()?;
        let key = self.begin_add(&input);
        let result = self.backend.create_note(&token, &input).await;
        self.finish_add(key, result).map(|()| key)
    }

    // ============================================================
    // Delete
    // ============================================================

    /// Take note `id` off the list. `None` if it was not displayed.
    pub fn begin_delete(&mut self, id: i64) -> Option<PendingDelete> {
        let index = self.notes.iter().position(|n| n.id == Some(id))?;
        let note = self.notes.remove(index);
        Some(PendingDelete { index, note })
    }

    /// Settle a delete; a failed call puts the record back where it was.
    pub fn finish_delete(
        &mut self,
        pending: Option<PendingDelete>,
        result: Result<(), ClientError>,
    ) -> Result<(), ClientError> {
        let Err(e) = result else {
            return Ok(());
        };

        tracing::warn!("Error deleting note: {}", e);
        if let Some(PendingDelete { index, note }) = pending {
            let index = index.min(self.notes.len());
            self.notes.insert(index, note);
        }
        Err(e)
    }

    pub async fn delete(&mut self, id: i64) -> Result<(), ClientError> {
        let token = self.require_token()?;
        let pending = self.begin_delete(id);
        let result = self.backend.delete_note(&token, id).await;
        self.finish_delete(pending, result)
    }

    // ============================================================
    // Edit
    // ============================================================

    /// Update note `id` on the server, then locally. `None` fields are left as is.
    ///
    /// On failure the displayed values do not change.
    pub async fn edit(
        &mut self,
        id: i64,
        title: Option<String>,
        content: Option<String>,
    ) -> Result<(), ClientError> {
        let token = self.require_token()?;
        let input = NoteInput { title, content };

        if let Err(e) = self.backend.edit_note(&token, id, &input).await {
            tracing::warn!("Error updating note: {}", e);
            return Err(e);
        }

        if let Some(note) = self.notes.iter_mut().find(|n| n.id == Some(id)) {
            if input.title.is_some() {
                note.title = input.title;
            }
            if input.content.is_some() {
                note.content = input.content;
            }
        }
        Ok(())
    }
}
