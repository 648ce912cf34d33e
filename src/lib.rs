//! # Search-A-Word Client
//!
//! ## Overview
//! Typed client library and CLI for the Search-A-Word document service:
//! authenticated document upload, in-document word/letter search with
//! highlighting, and a search-analytics view, backed by a REST API.
//!
//! ## Architecture
//! The crate is composed of several key modules:
//! - `config`: Configuration management and settings
//! - `errors`: Centralized error handling and types
//! - `session`: Token persistence and derived session state
//! - `notify`: Single-slot toast notifications with auto-clear
//! - `http`: Shared transport with bearer attachment and failure handling
//! - `api`: Typed clients for the auth, document and analytics endpoints
//! - `matcher`: Word matching, highlighting and match navigation
//! - `workspace`: Open-document state with stale-completion protection
//!
//! ## Usage
//! ```rust,no_run
//! use searchaword_client::{Config, SearchAWordClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SearchAWordClient::new(Config::load()?)?;
//!     client.auth.login("alice", "secret").await?;
//!     let documents = client.documents.list().await?;
//!     println!("{} documents", documents.len());
//!     Ok(())
//! }
//! ```

// Core modules
pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod matcher;
pub mod notify;
pub mod session;
pub mod workspace;

// Re-exports for convenience
pub use config::Config;
pub use errors::{ClientError, Result};
pub use matcher::MatchSet;
pub use notify::{NotificationChannel, Toast, ToastKind};
pub use session::SessionState;
pub use workspace::Workspace;

use crate::api::analytics::AnalyticsClient;
use crate::api::auth::AuthClient;
use crate::api::documents::DocumentClient;
use crate::http::ApiTransport;
use crate::session::TokenStore;
use std::sync::Arc;

/// Application-level bundle wiring the shared state and typed clients.
pub struct SearchAWordClient {
    pub config: Arc<Config>,
    pub session: Arc<SessionState>,
    pub notifications: Arc<NotificationChannel>,
    pub auth: AuthClient,
    pub documents: DocumentClient,
    pub analytics: AnalyticsClient,
}

impl SearchAWordClient {
    pub fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);
        let session = Arc::new(SessionState::new(TokenStore::new(&config.session)));
        let notifications = NotificationChannel::new(config.notifications.dismiss_after_ms);
        let transport = Arc::new(ApiTransport::new(
            &config.api,
            session.clone(),
            notifications.clone(),
        )?);

        Ok(Self {
            auth: AuthClient::new(transport.clone(), session.clone()),
            documents: DocumentClient::new(transport.clone(), config.upload.clone()),
            analytics: AnalyticsClient::new(transport),
            config,
            session,
            notifications,
        })
    }
}
