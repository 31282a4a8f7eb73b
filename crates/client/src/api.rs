//! Streaming HTTP client for the build and refine endpoints.
//!
//! Both endpoints answer a POSTed JSON body with a chunked
//! `text/event-stream` response. This module opens the request, checks
//! the status before any streaming starts, and hands the response body
//! to the controller as a boxed byte stream with transport errors
//! already mapped into [`ClientError`].

use std::pin::Pin;

use futures::{Stream, StreamExt};
use serde::Serialize;
use tracing::debug;
use vb_protocol::{BuildRequest, RefineRequest};

use crate::error::ClientError;

/// Chunked response body with transport errors mapped at the boundary.
pub type ByteStream =
    Pin<Box<dyn Stream<Item = Result<bytes::Bytes, ClientError>> + Send + 'static>>;

/// HTTP client for the VibeBuilder backend.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the given backend base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ClientError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /api/build` — start a fresh build from an idea.
    pub async fn build(&self, idea: &str) -> Result<ByteStream, ClientError> {
        let body = BuildRequest {
            idea: idea.to_string(),
        };
        self.stream_post("/api/build", &body).await
    }

    /// `POST /api/refine` — refine the current artifact with feedback.
    pub async fn refine(&self, code: &str, feedback: &str) -> Result<ByteStream, ClientError> {
        let body = RefineRequest {
            code: code.to_string(),
            feedback: feedback.to_string(),
        };
        self.stream_post("/api/refine", &body).await
    }

    async fn stream_post<T: Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<ByteStream, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "opening event stream");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| ClientError::Transport(format!("stream read failed: {e}"))));
        Ok(Box::pin(stream))
    }
}
