//! Request gateway.
//! -----------------
//! One client owning the service base URL, the HTTP connection pool and a
//! read-only handle on the credential store. Every remote call in the crate
//! funnels through [`ApiClient::request`], which injects the bearer token,
//! places the payload (query string, JSON body or multipart form) and
//! normalizes every failure into an [`ApiError`] carrying a user-facing
//! message. The gateway never writes the store; that is the session
//! manager's job.

use std::sync::Arc;

use reqwest::multipart;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{extract_error_message, ApiError, ApiResult};
use crate::models::DocumentFile;
use crate::token_store::TokenStore;

/// Payload placement for a call. GET payloads travel as query parameters,
/// JSON bodies ride every other verb, multipart is used only for document
/// upload.
pub enum Payload {
    Empty,
    Json(Value),
    Multipart(Vec<DocumentFile>),
}

/// Whether a call must carry the stored credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    Required,
    Public,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new<S: Into<String>>(base_url: S, store: Arc<dyn TokenStore>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http: reqwest::Client::new(), base_url, store }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform one round trip against the service.
    ///
    /// Protected calls fail locally with [`ApiError::MissingToken`] when the
    /// store holds no credential; no connection is attempted. On success the
    /// response body decodes as JSON and is returned unchanged (an empty
    /// body decodes as `null`).
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        payload: Payload,
        auth: Auth,
    ) -> ApiResult<T> {
        let token = match auth {
            Auth::Required => match self.store.get() {
                Some(token) => Some(token),
                None => {
                    warn!("{} {} rejected: no stored credential", method, path);
                    return Err(ApiError::MissingToken);
                }
            },
            Auth::Public => None,
        };

        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.request(method.clone(), &url);
        if let Some(token) = &token {
            req = req.bearer_auth(token);
        }
        req = match payload {
            Payload::Empty => req,
            Payload::Json(body) if method == Method::GET => req.query(&body),
            Payload::Json(body) => req.json(&body),
            Payload::Multipart(files) => req.multipart(multipart_form(files)?),
        };

        let resp = req.send().await.map_err(|e| {
            warn!("{} {} failed: {}", method, path, e);
            ApiError::transport(format!("Network error: {}", e))
        })?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ApiError::transport(format!("Network error: {}", e)))?;

        if !status.is_success() {
            let message = extract_error_message(status, &body);
            warn!("{} {} -> {}: {}", method, path, status.as_u16(), message);
            return Err(ApiError::server(status.as_u16(), message));
        }

        debug!("{} {} -> {}", method, path, status.as_u16());
        let body = if body.trim().is_empty() { "null".to_string() } else { body };
        serde_json::from_str(&body).map_err(|e| ApiError::transport(format!("Parse error: {}", e)))
    }
}

/// Build the upload form: every file under the field name `files`, with the
/// original filename and its MIME type (`application/octet-stream` when the
/// picker reported none).
fn multipart_form(files: Vec<DocumentFile>) -> ApiResult<multipart::Form> {
    let mut form = multipart::Form::new();
    for file in files {
        let mime = file.mime_type.as_deref().unwrap_or("application/octet-stream").to_string();
        let part = multipart::Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&mime)
            .map_err(|e| ApiError::transport(format!("Invalid document type: {}", e)))?;
        form = form.part("files", part);
    }
    Ok(form)
}
