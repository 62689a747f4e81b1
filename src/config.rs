//! Runtime configuration, read from command-line flags with environment fallbacks.
//!
//! A `.env` file in the working directory is loaded before parsing, so every
//! variable below can live there during development.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::db::Database;

/// Default base URL the terminal client talks to.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

/// Settings for `lumina serve`.
#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Interface to bind.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port for the HTTP API.
    #[arg(short, long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// SQLite database file, or `:memory:`. Defaults to the per-user data directory.
    #[arg(long, env = "DATABASE_URL")]
    pub database: Option<String>,

    /// Secret used to sign session tokens.
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Open the configured database and ensure its tables exist.
    ///
    /// Never fails: an open or schema error is logged and the server runs
    /// degraded, answering storage-backed requests with a generic 500.
    pub fn connect_database(&self) -> Database {
        let db = self.open_database().unwrap_or_else(|e| {
            tracing::error!("Error opening database: {:#}", e);
            Database::unavailable(&e)
        });

        if db.is_available() {
            if let Err(e) = db.migrate() {
                tracing::error!("Error initializing database: {:#}", e);
            }
        }
        db
    }

    /// Open the configured database. Does not create tables.
    pub fn open_database(&self) -> Result<Database> {
        match self.database.as_deref() {
            Some(":memory:") => Database::open_memory(),
            Some(url) => Database::open(PathBuf::from(strip_sqlite_scheme(url))),
            None => Database::open_default(),
        }
    }
}

/// Accept both `notes.db` and `sqlite://notes.db`.
fn strip_sqlite_scheme(url: &str) -> &str {
    url.strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url)
}

/// Settings shared by the client subcommands.
#[derive(Debug, Clone, Args)]
pub struct ClientConfig {
    /// Base URL of the Lumina server.
    #[arg(long, global = true, env = "LUMINA_URL", default_value = DEFAULT_SERVER_URL)]
    pub url: String,

    /// File holding the session token between runs.
    #[arg(long, global = true, env = "LUMINA_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,
}

impl ClientConfig {
    pub fn token_path(&self) -> Result<PathBuf> {
        match &self.token_file {
            Some(path) => Ok(path.clone()),
            None => crate::client::TokenStore::default_path(),
        }
    }
}
