//! # Document Client Module
//!
//! ## Purpose
//! Typed wrappers around the document endpoints: multipart upload, list,
//! fetch-by-id, letter-based word search and result download.
//!
//! ## Input/Output Specification
//! - **Input**: Local file paths, document ids, letter sets
//! - **Output**: Server DTOs (camelCase JSON), raw download bytes
//! - **Pre-flight**: file type and size are checked locally; a violation
//!   blocks the request and no network call is made

use crate::config::UploadConfig;
use crate::errors::{ClientError, Result};
use crate::http::ApiTransport;
use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// One row of the document list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub id: i64,
    pub file_name: String,
    pub file_size: u64,
    pub uploaded_at: DateTime<Utc>,
}

/// Full document as returned by upload and fetch-by-id, including the
/// server-extracted text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUpload {
    pub document_id: i64,
    pub file_name: String,
    pub sha256: String,
    pub cached: bool,
    pub text: String,
}

/// Downloaded letter-search result, ready to be saved client-side.
#[derive(Debug, Clone)]
pub struct LetterSearchDownload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Client for the `/documents` endpoints.
pub struct DocumentClient {
    transport: Arc<ApiTransport>,
    upload_config: UploadConfig,
}

impl DocumentClient {
    pub fn new(transport: Arc<ApiTransport>, upload_config: UploadConfig) -> Self {
        Self {
            transport,
            upload_config,
        }
    }

    /// Upload a document. Pre-flight checks (extension, size) run before
    /// any network call; violations surface as `UploadRejected`.
    pub async fn upload(&self, file: &Path) -> Result<DocumentUpload> {
        self.preflight(file).await?;

        let bytes = tokio::fs::read(file).await?;
        let file_name = file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();

        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name));
        let request = self
            .transport
            .request(Method::POST, "/documents/upload")
            .multipart(form);
        let response = self.transport.send(request).await?;
        ApiTransport::decode_json("/documents/upload", response).await
    }

    /// GET `/documents`.
    pub async fn list(&self) -> Result<Vec<DocumentSummary>> {
        self.transport.get_json("/documents", &[]).await
    }

    /// GET `/documents/{id}`, including the full extracted text.
    pub async fn get(&self, id: i64) -> Result<DocumentUpload> {
        self.transport
            .get_json(&format!("/documents/{id}"), &[])
            .await
    }

    /// GET `/documents/{id}/letter-search?letters=`: words in the document
    /// matching the letter set.
    pub async fn letter_search(&self, id: i64, letters: &str) -> Result<Vec<String>> {
        self.transport
            .get_json(
                &format!("/documents/{id}/letter-search"),
                &[("letters", letters.to_string())],
            )
            .await
    }

    /// GET `/documents/{id}/letter-search/download?letters=&type=`: the
    /// result as a binary blob for a client-side file save.
    pub async fn download_letter_search(
        &self,
        id: i64,
        letters: &str,
        format: &str,
    ) -> Result<LetterSearchDownload> {
        let request = self
            .transport
            .request(
                Method::GET,
                &format!("/documents/{id}/letter-search/download"),
            )
            .query(&[("letters", letters), ("type", format)]);
        let response = self.transport.send(request).await?;
        let bytes = response.bytes().await.map_err(|e| ClientError::Network {
            details: e.to_string(),
        })?;

        Ok(LetterSearchDownload {
            file_name: format!("letter-search-result.{format}"),
            bytes: bytes.to_vec(),
        })
    }

    /// Client-side upload constraints: accepted extension, size limit.
    async fn preflight(&self, file: &Path) -> Result<()> {
        let extension = file
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        if !self
            .upload_config
            .allowed_extensions
            .iter()
            .any(|allowed| *allowed == extension)
        {
            return Err(ClientError::UploadRejected {
                reason: format!(
                    "unsupported file type '{}'; accepted: {}",
                    extension,
                    self.upload_config.allowed_extensions.join(", ")
                ),
            });
        }

        let metadata = tokio::fs::metadata(file).await?;
        let limit = self.upload_config.max_file_size_mb * 1024 * 1024;
        if metadata.len() > limit {
            return Err(ClientError::UploadRejected {
                reason: format!(
                    "file is {} bytes; the limit is {} MB",
                    metadata.len(),
                    self.upload_config.max_file_size_mb
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, SessionConfig};
    use crate::notify::NotificationChannel;
    use crate::session::{SessionState, TokenStore};
    use tempfile::TempDir;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer, dir: &TempDir) -> DocumentClient {
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
                session,
                NotificationChannel::new(3000),
            )
            .unwrap(),
        );
        DocumentClient::new(
            transport,
            UploadConfig {
                max_file_size_mb: 3,
                allowed_extensions: vec!["pdf".into(), "docx".into(), "txt".into()],
            },
        )
    }

    #[tokio::test]
    async fn oversized_file_rejected_before_any_network_call() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let docs = client(&server, &dir);

        let big = dir.path().join("big.txt");
        tokio::fs::write(&big, vec![b'x'; 4 * 1024 * 1024])
            .await
            .unwrap();

        let result = docs.upload(&big).await;
        assert!(matches!(result, Err(ClientError::UploadRejected { .. })));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unsupported_extension_rejected_before_any_network_call() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let docs = client(&server, &dir);

        let exe = dir.path().join("tool.exe");
        tokio::fs::write(&exe, b"MZ").await.unwrap();

        let result = docs.upload(&exe).await;
        assert!(matches!(result, Err(ClientError::UploadRejected { .. })));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn upload_sends_multipart_and_decodes_response() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let docs = client(&server, &dir);

        let file = dir.path().join("notes.txt");
        tokio::fs::write(&file, b"the cat sat").await.unwrap();

        Mock::given(method("POST"))
            .and(path("/documents/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "documentId": 7,
                "fileName": "notes.txt",
                "sha256": "ab".repeat(32),
                "cached": false,
                "text": "the cat sat"
            })))
            .mount(&server)
            .await;

        let uploaded = docs.upload(&file).await.unwrap();
        assert_eq!(uploaded.document_id, 7);
        assert_eq!(uploaded.text, "the cat sat");
    }

    #[tokio::test]
    async fn list_and_get_decode_server_dtos() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let docs = client(&server, &dir);

        Mock::given(method("GET"))
            .and(path("/documents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "id": 1,
                "fileName": "a.pdf",
                "fileSize": 2048,
                "uploadedAt": "2026-08-01T10:00:00Z"
            }])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/documents/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "documentId": 1,
                "fileName": "a.pdf",
                "sha256": "cd".repeat(32),
                "cached": true,
                "text": "hello"
            })))
            .mount(&server)
            .await;

        let listed = docs.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].file_name, "a.pdf");

        let fetched = docs.get(1).await.unwrap();
        assert!(fetched.cached);
        assert_eq!(fetched.text, "hello");
    }

    #[tokio::test]
    async fn letter_search_passes_letters_and_maps_errors() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let docs = client(&server, &dir);

        Mock::given(method("GET"))
            .and(path("/documents/1/letter-search"))
            .and(query_param("letters", "cat"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!(["cat", "act"])),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/documents/2/letter-search"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let words = docs.letter_search(1, "cat").await.unwrap();
        assert_eq!(words, vec!["cat".to_string(), "act".to_string()]);

        let missing = docs.letter_search(2, "cat").await;
        assert!(matches!(missing, Err(ClientError::NotFound { .. })));
    }

    #[tokio::test]
    async fn download_names_the_result_after_the_format() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let docs = client(&server, &dir);

        Mock::given(method("GET"))
            .and(path("/documents/1/letter-search/download"))
            .and(query_param("letters", "cat"))
            .and(query_param("type", "txt"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"cat\nact\n".to_vec()))
            .mount(&server)
            .await;

        let download = docs.download_letter_search(1, "cat", "txt").await.unwrap();
        assert_eq!(download.file_name, "letter-search-result.txt");
        assert_eq!(download.bytes, b"cat\nact\n");
    }
}
