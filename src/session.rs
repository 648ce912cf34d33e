//! # Token Store & Session State Module
//!
//! ## Purpose
//! Persists the bearer token in a single well-known location and derives
//! the session username from the token's JWT payload. The session is never
//! stored independently: `username` is always `decode(token).sub` or none,
//! recomputed on every token mutation.
//!
//! ## Input/Output Specification
//! - **Input**: Bearer tokens from `/auth/login`, mutation calls
//! - **Output**: Current username broadcast to all subscribers
//! - **Invariant**: no token implies `is_logged_in() == false` and
//!   `username() == None`
//!
//! ## Key Features
//! - File-backed token persistence (survives process restarts)
//! - JWT payload decoding without signature validation (server-owned)
//! - Decode failures are fully recovered locally and never surfaced
//! - Last-value broadcast: subscribers see the current username
//!   immediately and on every change

use crate::config::SessionConfig;
use crate::errors::Result;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;

/// Listener invoked with the current username on subscribe and on every
/// token mutation.
pub type UsernameListener = Arc<dyn Fn(Option<&str>) + Send + Sync>;

/// File-backed persistence for the bearer token.
///
/// Exactly zero or one token exists at a time; `get` never fails, an
/// unreadable or missing file is treated as "no token".
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            path: config.token_path.clone(),
        }
    }

    /// Persist the token, replacing any previous one.
    pub fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, token)?;
        Ok(())
    }

    /// Read the persisted token, if any.
    pub fn get(&self) -> Option<String> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        let token = raw.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    /// Remove the persisted token. Idempotent.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Extract the `sub` claim from a JWT without validating the signature.
///
/// Returns `None` on any structural or decode failure; a malformed token
/// is treated as "no session", never as an error.
pub fn decode_subject(token: &str) -> Option<String> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    claims.get("sub")?.as_str().map(str::to_owned)
}

/// Reactive session state derived from the persisted token.
pub struct SessionState {
    store: TokenStore,
    inner: Mutex<SessionInner>,
}

struct SessionInner {
    username: Option<String>,
    listeners: Vec<UsernameListener>,
}

impl SessionState {
    /// Initialize from whatever token is currently persisted.
    pub fn new(store: TokenStore) -> Self {
        let username = store.get().as_deref().and_then(decode_subject);
        Self {
            store,
            inner: Mutex::new(SessionInner {
                username,
                listeners: Vec::new(),
            }),
        }
    }

    /// Persist a new token and broadcast the recomputed username.
    pub fn save_token(&self, token: &str) -> Result<()> {
        self.store.save(token)?;
        self.recompute_and_notify();
        Ok(())
    }

    /// Clear the persisted token and broadcast the change.
    pub fn clear(&self) -> Result<()> {
        self.store.clear()?;
        self.recompute_and_notify();
        Ok(())
    }

    /// Clear the token only if a session is live. Returns whether a logout
    /// actually happened, so concurrent 401 handlers cannot double-logout.
    pub fn clear_if_logged_in(&self) -> Result<bool> {
        // Hold the state lock across check-and-clear so two failure
        // handlers racing on the same 401 observe a single logout.
        let snapshot = {
            let mut inner = self.inner.lock();
            if self.store.get().is_none() {
                return Ok(false);
            }
            self.store.clear()?;
            inner.username = None;
            inner.listeners.clone()
        };
        for listener in &snapshot {
            listener(None);
        }
        Ok(true)
    }

    pub fn token(&self) -> Option<String> {
        self.store.get()
    }

    pub fn is_logged_in(&self) -> bool {
        self.store.get().is_some()
    }

    pub fn username(&self) -> Option<String> {
        self.inner.lock().username.clone()
    }

    /// Register a listener; it is invoked synchronously with the current
    /// username, then again on every mutation.
    pub fn subscribe(&self, listener: UsernameListener) {
        let current = {
            let mut inner = self.inner.lock();
            inner.listeners.push(listener.clone());
            inner.username.clone()
        };
        listener(current.as_deref());
    }

    fn recompute_and_notify(&self) {
        let username = self.store.get().as_deref().and_then(decode_subject);
        let (value, listeners) = {
            let mut inner = self.inner.lock();
            inner.username = username;
            (inner.username.clone(), inner.listeners.clone())
        };
        for listener in &listeners {
            listener(value.as_deref());
        }
    }
}
