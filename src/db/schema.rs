use anyhow::{Context, Result};
use rusqlite::Connection;

struct Table {
    name: &'static str,
    sql: &'static str,
}

/// Tables in creation order. `notes` references `users`, so users come first.
const TABLES: &[Table] = &[
    Table {
        name: "users",
        sql: "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL
        )",
    },
    Table {
        name: "notes",
        sql: "CREATE TABLE IF NOT EXISTS notes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT,
            content TEXT,
            user_id INTEGER NOT NULL REFERENCES users(id)
        );
        CREATE INDEX IF NOT EXISTS idx_notes_user ON notes(user_id)",
    },
];

/// Create any missing table. Safe to run on every boot.
pub fn init_schema(conn: &Connection) -> Result<()> {
    for table in TABLES {
        conn.execute_batch(table.sql)
            .with_context(|| format!("Failed to create {} table", table.name))?;
        tracing::debug!("Ensured table {}", table.name);
    }

    tracing::info!("Database schema initialized");
    Ok(())
}
