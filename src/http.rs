//! # HTTP Request Augmenter Module
//!
//! ## Purpose
//! Shared transport for every REST client. Attaches the bearer token to
//! protected API requests and performs the cross-cutting failure handling
//! (forced logout on 401, generic toasts on 403/5xx) before re-raising the
//! original failure to the caller.
//!
//! ## Input/Output Specification
//! - **Input**: Request method + path (or absolute URL), shared session and
//!   notification state
//! - **Output**: Successful responses, or a taxonomy error carrying the
//!   originating status
//! - **Guarantee**: failures are never swallowed; callers always receive
//!   the original error for context-specific rendering
//!
//! ## Attachment Rules
//! `Authorization: Bearer <token>` is attached iff the resolved URL is
//! prefixed by the configured API base, the endpoint is not an
//! authentication endpoint (`/auth/login`, `/auth/register`), and a token
//! is currently persisted.

use crate::config::ApiConfig;
use crate::errors::{ClientError, Result};
use crate::notify::NotificationChannel;
use crate::session::SessionState;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Transport shared by the typed API clients.
pub struct ApiTransport {
    client: Client,
    base_url: String,
    session: Arc<SessionState>,
    notifications: Arc<NotificationChannel>,
}

impl ApiTransport {
    pub fn new(
        config: &ApiConfig,
        session: Arc<SessionState>,
        notifications: Arc<NotificationChannel>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ClientError::Network {
                details: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            session,
            notifications,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request for a path relative to the API base, or for an
    /// absolute URL, with the bearer token attached where the rules allow.
    pub fn request(&self, method: Method, path_or_url: &str) -> RequestBuilder {
        let url = self.resolve(path_or_url);
        let mut builder = self.client.request(method, &url);

        if self.should_attach(&url) {
            if let Some(token) = self.session.token() {
                builder = builder.bearer_auth(token);
            }
        }

        builder
    }

    /// Send a request, run the cross-cutting failure side effects, and
    /// re-raise the original failure.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await.map_err(|e| ClientError::Network {
            details: e.to_string(),
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), "request failed");
        self.handle_failure(status.as_u16());

        Err(ClientError::from_status(status, body))
    }

    /// GET a JSON body from an API path.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let builder = self.request(Method::GET, path).query(query);
        let response = self.send(builder).await?;
        Self::decode_json(path, response).await
    }

    /// Decode a JSON response body, labeling failures with the endpoint.
    pub async fn decode_json<T: DeserializeOwned>(
        endpoint: &str,
        response: Response,
    ) -> Result<T> {
        response.json().await.map_err(|e| ClientError::Decode {
            endpoint: endpoint.to_string(),
            details: e.to_string(),
        })
    }

    fn resolve(&self, path_or_url: &str) -> String {
        if path_or_url.starts_with("http://") || path_or_url.starts_with("https://") {
            path_or_url.to_string()
        } else {
            format!("{}{}", self.base_url, path_or_url)
        }
    }

    fn should_attach(&self, url: &str) -> bool {
        let Some(path) = url.strip_prefix(&self.base_url) else {
            return false;
        };
        !(path.starts_with("/auth/login") || path.starts_with("/auth/register"))
    }

    /// Cross-cutting side effects for failure statuses. State changes are
    /// limited to the 401 forced logout; everything else is toast-only.
    fn handle_failure(&self, status: u16) {
        match status {
            401 => match self.session.clear_if_logged_in() {
                Ok(true) => {
                    self.notifications
                        .error("Session expired. Please login again.");
                }
                Ok(false) => {
                    // already logged out; a second concurrent 401 must not
                    // re-emit the toast
                }
                Err(e) => {
                    tracing::warn!("failed to clear token after 401: {}", e);
                }
            },
            403 => {
                self.notifications.error("Access denied.");
            }
            s if s >= 500 => {
                self.notifications
                    .error("Server error. Please try again later.");
            }
            _ => {}
        }
    }
}
