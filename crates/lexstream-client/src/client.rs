//! HTTP client for the document-analysis backend.

use std::path::Path;

use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;
use thiserror::Error;
use tracing::info;

/// Upload size cap, matching the backend's own limit.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "docx", "txt"];

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported file type {extension:?}: expected pdf, docx, or txt")]
    UnsupportedFileType { extension: String },
    #[error("file is {size} bytes, above the {limit} byte limit")]
    FileTooLarge { size: u64, limit: u64 },
    #[error("stream read failed: {0}")]
    Stream(String),
    #[error("stream ended without a terminal result")]
    NoTerminalResult,
}

/// One analysis response: the session id from the `X-Session-ID` header (when
/// the backend sets it) and the raw SSE byte stream.
pub struct AnalyzeResponse {
    pub session_id: Option<String>,
    pub bytes: BoxStream<'static, Result<Bytes, reqwest::Error>>,
}

/// Client for the analysis backend's streaming upload endpoint.
pub struct AnalyzeClient {
    client: reqwest::Client,
    base_url: String,
}

impl AnalyzeClient {
    /// Create a new client for the given backend base URL.
    ///
    /// `base_url` should be like `http://127.0.0.1:8000` (no trailing slash).
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Check extension and size limits before any bytes leave the machine.
    pub fn validate_upload(path: &Path, size: u64) -> Result<(), ClientError> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ClientError::UnsupportedFileType { extension });
        }
        if size > MAX_UPLOAD_BYTES {
            return Err(ClientError::FileTooLarge {
                size,
                limit: MAX_UPLOAD_BYTES,
            });
        }
        Ok(())
    }

    /// Upload a document for analysis and return the SSE response stream.
    pub async fn analyze_file(&self, path: &Path) -> Result<AnalyzeResponse, ClientError> {
        let metadata = tokio::fs::metadata(path).await?;
        Self::validate_upload(path, metadata.len())?;

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        let contents = tokio::fs::read(path).await?;
        let form = reqwest::multipart::Form::new()
            .part("file", reqwest::multipart::Part::bytes(contents).file_name(filename.clone()));

        let url = format!("{}/analyze/", self.base_url);
        info!(url = %url, file = %filename, "uploading document for analysis");
        let resp = self
            .client
            .post(&url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .multipart(form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let session_id = resp
            .headers()
            .get("X-Session-ID")
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        Ok(AnalyzeResponse {
            session_id,
            bytes: resp.bytes_stream().boxed(),
        })
    }
}
