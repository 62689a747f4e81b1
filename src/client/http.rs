//! HTTP transport for the Lumina API.

use reqwest::{header::AUTHORIZATION, Client, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};

use super::{ClientError, NotesBackend};
use crate::models::*;

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the Lumina API.
#[derive(Debug, Clone)]
pub struct NotesClient {
    base_url: String,
    client: Client,
}

impl NotesClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request, attaching the raw token when given.
    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let req = self.client.request(method, &url);
        match token {
            Some(token) => req.header(AUTHORIZATION, token),
            None => req,
        }
    }

    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(Self::rejection(response).await)
        }
    }

    async fn handle_empty_response(response: reqwest::Response) -> Result<(), ClientError> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::rejection(response).await)
        }
    }

    /// Turn an error response into [`ClientError::Rejected`], preferring the
    /// server's `error` field over the bare status text.
    async fn rejection(response: reqwest::Response) -> ClientError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });
        ClientError::Rejected {
            status: status.as_u16(),
            message,
        }
    }
}

impl NotesBackend for NotesClient {
    async fn register(&self, input: &CredentialsInput) -> Result<User, ClientError> {
        let response = self
            .request(Method::POST, "/register", None)
            .json(input)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn login(&self, input: &CredentialsInput) -> Result<LoginResponse, ClientError> {
        let response = self
            .request(Method::POST, "/login", None)
            .json(input)
            .send()
            .await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ClientError::InvalidCredentials);
        }
        Self::handle_response(response).await
    }

    async fn list_notes(&self, token: &str) -> Result<Vec<Note>, ClientError> {
        let response = self
            .request(Method::GET, "/notes", Some(token))
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn create_note(&self, token: &str, input: &NoteInput) -> Result<Note, ClientError> {
        let response = self
            .request(Method::POST, "/notes", Some(token))
            .json(input)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn delete_note(&self, token: &str, id: i64) -> Result<(), ClientError> {
        let response = self
            .request(Method::DELETE, &format!("/notes/{}", id), Some(token))
            .send()
            .await?;
        Self::handle_empty_response(response).await
    }

    async fn edit_note(&self, token: &str, id: i64, input: &NoteInput) -> Result<(), ClientError> {
        let response = self
            .request(Method::PUT, &format!("/edit/{}", id), Some(token))
            .json(input)
            .send()
            .await?;
        Self::handle_empty_response(response).await
    }
}
