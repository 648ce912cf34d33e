//! # Authentication Client Module
//!
//! ## Purpose
//! Login and registration against the auth endpoints, plus the
//! register-then-auto-login flow. The token store is only touched on a
//! successful login; every failure leaves session state exactly as it was.
//!
//! ## Flow
//! Login: `Anonymous -> Authenticating -> Authenticated`.
//! Register: `Registering -> AutoLoggingIn -> Authenticated`; when the
//! auto-login fails the user stays anonymous and gets an explicit
//! "login manually" outcome instead of a retry.

use crate::errors::{ClientError, Result};
use crate::http::ApiTransport;
use crate::session::SessionState;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
}

/// Terminal outcome of the register flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// Registered and auto-logged in.
    Authenticated,
    /// Registered, but the auto-login failed; the user must log in
    /// manually. No retry is attempted.
    ManualLoginRequired,
}

/// Client for `/auth/login` and `/auth/register`.
pub struct AuthClient {
    transport: Arc<ApiTransport>,
    session: Arc<SessionState>,
}

impl AuthClient {
    pub fn new(transport: Arc<ApiTransport>, session: Arc<SessionState>) -> Self {
        Self { transport, session }
    }

    /// POST `/auth/login`; persists the returned token on success only.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let request = self
            .transport
            .request(Method::POST, "/auth/login")
            .json(&Credentials { username, password });
        let response = self.transport.send(request).await?;
        let AuthResponse { token } = ApiTransport::decode_json("/auth/login", response).await?;
        self.session.save_token(&token)?;
        Ok(())
    }

    /// POST `/auth/register`. The response body is implementation-defined
    /// and ignored; any 2xx counts as success.
    pub async fn register(&self, username: &str, password: &str) -> Result<()> {
        let request = self
            .transport
            .request(Method::POST, "/auth/register")
            .json(&Credentials { username, password });
        self.transport.send(request).await?;
        Ok(())
    }

    /// Register, then immediately attempt a login with the same
    /// credentials.
    pub async fn register_and_login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<RegisterOutcome> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(ClientError::ValidationFailed {
                field: "credentials".to_string(),
                reason: "Username and password are required".to_string(),
            });
        }

        self.register(username, password).await?;

        match self.login(username, password).await {
            Ok(()) => Ok(RegisterOutcome::Authenticated),
            Err(e) => {
                tracing::warn!(category = e.category(), "auto-login after register failed");
                Ok(RegisterOutcome::ManualLoginRequired)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, SessionConfig};
    use crate::notify::NotificationChannel;
    use crate::session::TokenStore;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use tempfile::TempDir;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_token(sub: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"{sub}"}}"#));
        format!("{header}.{payload}.sig")
    }

    fn client(server: &MockServer, dir: &TempDir) -> (AuthClient, Arc<SessionState>) {
        let session = Arc::new(SessionState::new(TokenStore::new(&SessionConfig {
            token_path: dir.path().join("auth_token"),
        })));
        let transport = Arc::new(
            ApiTransport::new(
                &ApiConfig {
                    base_url: server.uri(),
                    timeout_seconds: 5,
                    user_agent: "searchaword-client/test".to_string(),
                },
                session.clone(),
                NotificationChannel::new(3000),
            )
            .unwrap(),
        );
        (AuthClient::new(transport, session.clone()), session)
    }

    #[tokio::test]
    async fn login_persists_token_and_derives_username() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let (auth, session) = client(&server, &dir);
        let token = make_token("alice");

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(serde_json::json!({
                "username": "alice",
                "password": "pw"
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "token": token })),
            )
            .mount(&server)
            .await;

        auth.login("alice", "pw").await.unwrap();
        assert!(session.is_logged_in());
        assert_eq!(session.username(), Some("alice".to_string()));
    }

    #[tokio::test]
    async fn failed_login_leaves_store_untouched() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let (auth, session) = client(&server, &dir);

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let result = auth.login("alice", "wrong").await;
        assert!(matches!(result, Err(ClientError::Unauthorized { .. })));
        assert!(!session.is_logged_in());
        assert_eq!(session.username(), None);
    }

    #[tokio::test]
    async fn register_auto_logs_in() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let (auth, session) = client(&server, &dir);

        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token": make_token("bob")
            })))
            .mount(&server)
            .await;

        let outcome = auth.register_and_login("bob", "pw").await.unwrap();
        assert_eq!(outcome, RegisterOutcome::Authenticated);
        assert_eq!(session.username(), Some("bob".to_string()));
    }

    #[tokio::test]
    async fn failed_auto_login_requires_manual_login() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let (auth, session) = client(&server, &dir);

        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let outcome = auth.register_and_login("bob", "pw").await.unwrap();
        assert_eq!(outcome, RegisterOutcome::ManualLoginRequired);
        assert!(!session.is_logged_in());
    }

    #[tokio::test]
    async fn register_failure_propagates() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let (auth, session) = client(&server, &dir);

        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .respond_with(ResponseTemplate::new(409))
            .mount(&server)
            .await;

        let result = auth.register_and_login("bob", "pw").await;
        assert!(matches!(result, Err(ClientError::Conflict { .. })));
        assert!(!session.is_logged_in());
    }

    #[tokio::test]
    async fn empty_credentials_rejected_before_network() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let (auth, _) = client(&server, &dir);

        let result = auth.register_and_login("", "pw").await;
        assert!(matches!(result, Err(ClientError::ValidationFailed { .. })));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
