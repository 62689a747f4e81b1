use serde::{Deserialize, Serialize};

/// A registered account as exposed over the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
}

/// A user row including the stored password hash.
///
/// Only used inside the server to check credentials; never serialized.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub id: i64,
    pub email: String,
    /// PHC-format Argon2id hash.
    pub password_hash: String,
}

impl From<UserCredentials> for User {
    fn from(credentials: UserCredentials) -> Self {
        Self {
            id: credentials.id,
            email: credentials.email,
        }
    }
}

/// Email and password, the body of both `/register` and `/login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl CredentialsInput {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Whether both fields carry something. The server does not enforce this.
    pub fn is_complete(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }
}

/// Response of `/login`.
///
/// A successful login carries `auth: true`, the token and the email. A password
/// mismatch is reported as `{"auth": false, "token": null}` with no email field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub auth: bool,
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl LoginResponse {
    pub fn granted(token: String, email: String) -> Self {
        Self {
            auth: true,
            token: Some(token),
            email: Some(email),
        }
    }

    pub fn denied() -> Self {
        Self {
            auth: false,
            token: None,
            email: None,
        }
    }
}
