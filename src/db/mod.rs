mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row};

use crate::models::*;

/// Handle to the note store.
///
/// Cloning is cheap: every clone shares the same connection. Statements are
/// serialized by the mutex; isolation between users comes from every note query
/// filtering on `user_id`.
///
/// A handle built with [`Database::unavailable`] has no connection; every
/// operation on it fails with the recorded open error.
pub struct Database {
    conn: Result<Arc<Mutex<Connection>>, Arc<str>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self::from_connection(conn))
    }

    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self::from_connection(conn))
    }

    /// A handle whose every operation fails with `error`.
    pub fn unavailable(error: &anyhow::Error) -> Self {
        Self {
            conn: Err(format!("{:#}", error).into()),
        }
    }

    pub fn is_available(&self) -> bool {
        self.conn.is_ok()
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Ok(Arc::new(Mutex::new(conn))),
        }
    }

    /// Per-user data location, e.g. `~/.local/share/lumina/lumina.db`.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "lumina")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(dirs.data_dir().join("lumina.db"))
    }

    /// Ensure the `users` and `notes` tables exist.
    pub fn migrate(&self) -> Result<()> {
        let conn = self.lock()?;
        schema::init_schema(&conn)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        let conn = self
            .conn
            .as_ref()
            .map_err(|reason| anyhow::anyhow!("Database unavailable: {}", reason))?;
        conn.lock()
            .map_err(|_| anyhow::anyhow!("database lock poisoned"))
    }

    // ============================================================
    // User operations
    // ============================================================

    pub fn find_user_by_email(&self, email: &str) -> Result<Option<UserCredentials>> {
        let conn = self.lock()?;
        let user = conn
            .query_row(
                "SELECT id, email, password FROM users WHERE email = ?",
                [email],
                |row| {
                    Ok(UserCredentials {
                        id: row.get(0)?,
                        email: row.get(1)?,
                        password_hash: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    /// Insert a user with an already hashed password.
    ///
    /// Returns `None` when the email is taken.
    pub fn create_user(&self, email: &str, password_hash: &str) -> Result<Option<User>> {
        let conn = self.lock()?;
        let inserted = conn.execute(
            "INSERT INTO users (email, password) VALUES (?, ?)",
            (email, password_hash),
        );

        match inserted {
            Ok(_) => Ok(Some(User {
                id: conn.last_insert_rowid(),
                email: email.to_string(),
            })),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn count_users_with_email(&self, email: &str) -> Result<i64> {
        let conn = self.lock()?;
        let count = conn.query_row("SELECT COUNT(*) FROM users WHERE email = ?", [email], |row| {
            row.get(0)
        })?;
        Ok(count)
    }

    // ============================================================
    // Note operations
    // ============================================================

    /// All notes owned by `user_id`, oldest first.
    pub fn get_notes_by_user(&self, user_id: i64) -> Result<Vec<Note>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, content, user_id
             FROM notes WHERE user_id = ? ORDER BY id ASC",
        )?;

        let notes = stmt
            .query_map([user_id], note_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(notes)
    }

    pub fn create_note(&self, user_id: i64, input: NoteInput) -> Result<Note> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO notes (title, content, user_id) VALUES (?, ?, ?)",
            (&input.title, &input.content, user_id),
        )?;

        Ok(Note {
            id: conn.last_insert_rowid(),
            title: input.title,
            content: input.content,
            user_id,
        })
    }

    /// Delete a note if `user_id` owns it. Returns whether a row was removed.
    pub fn delete_note(&self, user_id: i64, id: i64) -> Result<bool> {
        let conn = self.lock()?;
        let rows = conn.execute(
            "DELETE FROM notes WHERE id = ? AND user_id = ?",
            (id, user_id),
        )?;
        Ok(rows > 0)
    }

    /// Update a note if `user_id` owns it. Fields left as `None` keep their value.
    ///
    /// Returns the stored row, or `None` if no owned note has that id.
    pub fn update_note(&self, user_id: i64, id: i64, input: NoteInput) -> Result<Option<Note>> {
        let conn = self.lock()?;
        let note = conn
            .query_row(
                "UPDATE notes
                 SET title = COALESCE(?, title), content = COALESCE(?, content)
                 WHERE id = ? AND user_id = ?
                 RETURNING id, title, content, user_id",
                (&input.title, &input.content, id, user_id),
                note_from_row,
            )
            .optional()?;
        Ok(note)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        user_id: row.get(3)?,
    })
}
