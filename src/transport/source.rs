use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::errors::ReviewError;

pub const DEFAULT_REPLAY_CHUNK_SIZE: usize = 8 * 1024;

/// Incremental body of a streaming analysis response.
///
/// Implementations deliver raw bytes in whatever segmentation the
/// underlying transport produces. Errors are transport failures and end the
/// session; they are never retried here.
#[async_trait]
pub trait ChunkSource: Send {
    /// Establishes the connection. Called once before the first chunk.
    async fn connect(&mut self) -> Result<(), ReviewError> {
        Ok(())
    }

    /// Next chunk, or `None` on clean end-of-stream.
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, ReviewError>;

    /// Short label for logging.
    fn describe(&self) -> String;
}

/// Lazily-sent HTTP request whose response body is read chunk by chunk.
pub struct HttpChunkSource {
    request: Option<reqwest::RequestBuilder>,
    response: Option<reqwest::Response>,
    label: String,
}

impl HttpChunkSource {
    pub fn new(request: reqwest::RequestBuilder, label: &str) -> Self {
        Self {
            request: Some(request),
            response: None,
            label: label.to_string(),
        }
    }
}

#[async_trait]
impl ChunkSource for HttpChunkSource {
    async fn connect(&mut self) -> Result<(), ReviewError> {
        let Some(request) = self.request.take() else {
            return Ok(());
        };

        let resp = request
            .send()
            .await
            .map_err(|e| ReviewError::Transport(format!("request to {} failed: {}", self.label, e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ReviewError::Transport(format!(
                "{} returned HTTP {}: {}",
                self.label,
                status,
                crate::utils::truncation::truncate_error(&body)
            )));
        }

        debug!(source = %self.label, %status, "Streaming response opened");
        self.response = Some(resp);
        Ok(())
    }

    async fn next_chunk(&mut self) -> Result<Option<Bytes>, ReviewError> {
        let resp = self
            .response
            .as_mut()
            .ok_or_else(|| ReviewError::Transport(format!("{} has no response body", self.label)))?;

        resp.chunk()
            .await
            .map_err(|e| ReviewError::Transport(format!("response body from {} aborted: {}", self.label, e)))
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

/// Adapts any byte stream, e.g. a scripted sequence in tests.
pub struct ByteStreamSource<S> {
    inner: S,
    label: String,
}

impl<S> ByteStreamSource<S> {
    pub fn new(inner: S, label: &str) -> Self {
        Self {
            inner,
            label: label.to_string(),
        }
    }
}

#[async_trait]
impl<S, E> ChunkSource for ByteStreamSource<S>
where
    S: Stream<Item = Result<Bytes, E>> + Send + Unpin,
    E: std::fmt::Display + Send,
{
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, ReviewError> {
        match self.inner.next().await {
            Some(Ok(chunk)) => Ok(Some(chunk)),
            Some(Err(e)) => Err(ReviewError::Transport(e.to_string())),
            None => Ok(None),
        }
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

/// Replays a saved NDJSON stream from disk in fixed-size chunks.
pub struct FileChunkSource {
    file: tokio::fs::File,
    chunk_size: usize,
    label: String,
}

impl FileChunkSource {
    pub async fn open(path: &Path, chunk_size: usize) -> Result<Self, ReviewError> {
        if chunk_size == 0 {
            return Err(ReviewError::InvalidInput("chunk size must be at least 1 byte".into()));
        }
        let file = tokio::fs::File::open(path).await?;
        Ok(Self {
            file,
            chunk_size,
            label: path.display().to_string(),
        })
    }
}

#[async_trait]
impl ChunkSource for FileChunkSource {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, ReviewError> {
        let mut buf = vec![0u8; self.chunk_size];
        let n = self
            .file
            .read(&mut buf)
            .await
            .map_err(|e| ReviewError::Transport(format!("reading {} failed: {}", self.label, e)))?;
        if n == 0 {
            return Ok(None);
        }
        buf.truncate(n);
        Ok(Some(Bytes::from(buf)))
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}
