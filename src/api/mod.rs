//! Typed clients for the Search-A-Word REST endpoints, all sharing one
//! [`ApiTransport`](crate::http::ApiTransport).

pub mod analytics;
pub mod auth;
pub mod documents;
