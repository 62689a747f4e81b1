//! Domain models for Lumina.
//!
//! - [`User`]: an account, identified by an auto-incrementing id and a unique email.
//!   The password hash never leaves the database layer.
//! - [`Note`]: a titled text note owned by exactly one user. Every read and write is
//!   scoped to the owning user.
//!
//! The request and response payloads of the HTTP API live next to the entity they
//! carry, so the server and the terminal client share one set of wire types.

mod note;
mod user;

pub use note::*;
pub use user::*;
