//! Storage abstraction trait
//!
//! The transfer handlers only talk to `Storage`; the local filesystem backend lives in
//! [`crate::local`].

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Chunked byte stream flowing into or out of storage.
pub type ByteStream<'a> = BoxStream<'a, io::Result<Bytes>>;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// The filename sanitized to nothing usable.
    #[error("Invalid filename: {0:?}")]
    InvalidKey(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Failed to create upload directory: {0}")]
    DirectoryFailed(String),

    #[error("Failed to create file: {0}")]
    CreateFailed(String),

    #[error("Failed to write file: {0}")]
    WriteFailed(String),

    /// The incoming byte stream failed before it was fully written.
    #[error("Failed to read upload body: {0}")]
    SourceFailed(#[source] io::Error),

    #[error("Failed to open file: {0}")]
    OpenFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Outcome of a completed upload.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Sanitized name the file is stored under.
    pub name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// An opened file ready to be streamed to a client.
pub struct FileDownload {
    pub name: String,
    /// Size taken from the open handle, used for `Content-Length`.
    pub size_bytes: u64,
    pub stream: ByteStream<'static>,
}

#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `stream` under the sanitized form of `filename`, replacing any existing file.
    ///
    /// The stream is consumed chunk by chunk; nothing is buffered in full.
    async fn put_stream(
        &self,
        filename: &str,
        stream: ByteStream<'_>,
    ) -> StorageResult<StoredFile>;

    /// Open the sanitized form of `filename` for streaming.
    async fn open(&self, filename: &str) -> StorageResult<FileDownload>;

    /// Remove uploads left incomplete by an earlier process. Returns how many were removed.
    ///
    /// Only safe before any upload is in flight.
    async fn discard_incomplete(&self) -> StorageResult<usize> {
        Ok(0)
    }

    /// Directory the files are stored in.
    fn root(&self) -> &Path;
}
