//! Typed client for the sets/exercises REST API.
//!
//! Every operation issues exactly one request and never retries. Failures
//! come back as [`ClientError`] values and are also logged with
//! `tracing::warn!`; nothing panics past this boundary.

use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::ClientConfig;
use crate::models::{Exercise, NewSet, Set};

/// Coarse failure category, for callers that only need to branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unavailable,
    Timeout,
    NotFound,
    Rejected,
    Server,
    Decode,
    Transport,
    Config,
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Backend unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Request failed: {0}")]
    Request(reqwest::Error),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Unavailable => ErrorKind::Unavailable,
            ClientError::Timeout => ErrorKind::Timeout,
            ClientError::NotFound { .. } => ErrorKind::NotFound,
            ClientError::Rejected { .. } => ErrorKind::Rejected,
            ClientError::Server { .. } => ErrorKind::Server,
            ClientError::Decode(_) => ErrorKind::Decode,
            ClientError::Request(_) => ErrorKind::Transport,
            ClientError::InvalidBaseUrl(_) => ErrorKind::Config,
        }
    }

    fn from_status(status: StatusCode, message: String) -> Self {
        if status == StatusCode::NOT_FOUND {
            ClientError::NotFound { message }
        } else if status.is_client_error() {
            ClientError::Rejected {
                status: status.as_u16(),
                message,
            }
        } else {
            ClientError::Server {
                status: status.as_u16(),
                message,
            }
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else if e.is_connect() {
            ClientError::Unavailable
        } else {
            ClientError::Request(e)
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Client for the backend API. Cheap to clone.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidBaseUrl(config.base_url.clone()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::Request)?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /api/sets`. Returns the persisted set with its assigned id.
    pub async fn create_set(&self, set: &NewSet) -> Result<Set> {
        let request = self.request(Method::POST, "/api/sets").json(set);
        self.fetch_json("create_set", request).await
    }

    /// `GET /api/exercises`.
    pub async fn read_exercises(&self) -> Result<Vec<Exercise>> {
        let request = self.request(Method::GET, "/api/exercises");
        self.fetch_json("read_exercises", request).await
    }

    /// `GET /api/sets/exercise/{id}`. Ordering is whatever the backend returns.
    pub async fn read_sets_by_exercise(&self, exercise_id: i64) -> Result<Vec<Set>> {
        let path = format!("/api/sets/exercise/{}", exercise_id);
        let request = self.request(Method::GET, &path);
        self.fetch_json("read_sets_by_exercise", request).await
    }

    /// `PUT /api/sets/{setID}` with the full set. The response body is not read.
    pub async fn update_set(&self, set: &Set) -> Result<()> {
        let path = format!("/api/sets/{}", set.set_id);
        let request = self.request(Method::PUT, &path).json(set);
        self.send_checked("update_set", request).await.map(|_| ())
    }

    /// `DELETE /api/sets/{id}`. The response body is not read.
    pub async fn delete_set(&self, id: i64) -> Result<()> {
        let path = format!("/api/sets/{}", id);
        let request = self.request(Method::DELETE, &path);
        self.send_checked("delete_set", request).await.map(|_| ())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mutating = method != Method::GET;
        let builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .header(header::ACCEPT, "application/json");

        if mutating {
            builder.header(header::CONTENT_TYPE, "application/json")
        } else {
            builder
        }
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T> {
        let response = self.send_checked(operation, request).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| log_failure(operation, ClientError::from(e)))?;

        serde_json::from_slice(&body).map_err(|e| log_failure(operation, ClientError::Decode(e)))
    }

    /// Send once and turn non-2xx statuses into errors.
    async fn send_checked(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<Response> {
        tracing::debug!(operation, "Sending request");

        let response = request
            .send()
            .await
            .map_err(|e| log_failure(operation, ClientError::from(e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = error_message(response).await;
        Err(log_failure(
            operation,
            ClientError::from_status(status, message),
        ))
    }
}

fn log_failure(operation: &'static str, error: ClientError) -> ClientError {
    tracing::warn!(operation, kind = ?error.kind(), "Request failed: {}", error);
    error
}

/// Pull `error` out of a JSON error body, or fall back to the raw text.
async fn error_message(response: Response) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        error: String,
    }

    let text = response.text().await.unwrap_or_default();
    serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text)
}
