//! Credential primitives: password hashing and session tokens.
//!
//! Neither piece touches the database. Handlers combine them with
//! [`Database`](crate::db::Database) lookups.

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenError, TokenKeys, TOKEN_TTL_HOURS};
