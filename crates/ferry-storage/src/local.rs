use crate::sanitize::sanitize_filename;
use crate::traits::{ByteStream, FileDownload, Storage, StorageError, StorageResult, StoredFile};
use async_trait::async_trait;
use futures::StreamExt;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Subdirectory of the upload directory holding in-flight uploads.
pub const STAGING_DIR: &str = ".ferry-staging";

/// Local filesystem storage over a single flat directory.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// The directory is not touched here; it is created on first upload.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Map a client filename to `(sanitized_name, path)` inside the base directory.
    fn resolve(&self, filename: &str) -> StorageResult<(String, PathBuf)> {
        let name = sanitize_filename(filename);
        if name.is_empty() || name == STAGING_DIR {
            return Err(StorageError::InvalidKey(filename.to_string()));
        }

        let path = self.base_path.join(&name);
        if path.parent() != Some(self.base_path.as_path()) {
            return Err(StorageError::InvalidKey(filename.to_string()));
        }

        Ok((name, path))
    }

    fn staging_dir(&self) -> PathBuf {
        self.base_path.join(STAGING_DIR)
    }

    fn staging_path(&self) -> PathBuf {
        let file = format!("{}.part", Uuid::new_v4().simple());
        self.staging_dir().join(file)
    }

    /// Creates the upload directory and its staging subdirectory.
    async fn ensure_base_dir(&self) -> StorageResult<()> {
        let staging = self.staging_dir();
        fs::create_dir_all(&staging)
            .await
            .map_err(|e| StorageError::DirectoryFailed(format!("{}: {}", staging.display(), e)))
    }

    async fn write_staged(
        &self,
        staging: &Path,
        mut stream: ByteStream<'_>,
    ) -> StorageResult<u64> {
        let mut file = fs::File::create(staging).await.map_err(|e| {
            StorageError::CreateFailed(format!("{}: {}", staging.display(), e))
        })?;

        let mut written: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(StorageError::SourceFailed)?;
            file.write_all(&chunk).await.map_err(|e| {
                StorageError::WriteFailed(format!("{}: {}", staging.display(), e))
            })?;
            written += chunk.len() as u64;
        }

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("{}: {}", staging.display(), e))
        })?;

        Ok(written)
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put_stream(
        &self,
        filename: &str,
        stream: ByteStream<'_>,
    ) -> StorageResult<StoredFile> {
        let (name, path) = self.resolve(filename)?;
        self.ensure_base_dir().await?;

        let start = std::time::Instant::now();
        let staging = self.staging_path();

        let published = match self.write_staged(&staging, stream).await {
            Ok(size) => fs::rename(&staging, &path)
                .await
                .map(|_| size)
                .map_err(|e| StorageError::WriteFailed(format!("{}: {}", path.display(), e))),
            Err(e) => Err(e),
        };

        let size_bytes = match published {
            Ok(size) => size,
            Err(e) => {
                if let Err(cleanup) = fs::remove_file(&staging).await {
                    if cleanup.kind() != io::ErrorKind::NotFound {
                        tracing::warn!(
                            path = %staging.display(),
                            error = %cleanup,
                            "Failed to remove staging file"
                        );
                    }
                }
                return Err(e);
            }
        };

        tracing::debug!(
            path = %path.display(),
            size_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage stream upload successful"
        );

        Ok(StoredFile {
            name,
            path,
            size_bytes,
        })
    }

    async fn open(&self, filename: &str) -> StorageResult<FileDownload> {
        let (name, path) = self.resolve(filename)?;

        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(StorageError::NotFound(name)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(name))
            }
            Err(e) => {
                return Err(StorageError::OpenFailed(format!("{}: {}", path.display(), e)))
            }
        }

        let file = fs::File::open(&path)
            .await
            .map_err(|e| StorageError::OpenFailed(format!("{}: {}", path.display(), e)))?;

        let size_bytes = file
            .metadata()
            .await
            .map_err(|e| StorageError::OpenFailed(format!("{}: {}", path.display(), e)))?
            .len();

        let stream = tokio_util::io::ReaderStream::new(file).boxed();

        Ok(FileDownload {
            name,
            size_bytes,
            stream,
        })
    }

    async fn discard_incomplete(&self) -> StorageResult<usize> {
        let staging = self.staging_dir();
        let mut entries = match fs::read_dir(&staging).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                fs::remove_file(entry.path()).await?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn root(&self) -> &Path {
        &self.base_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use futures::stream;
    use tempfile::tempdir;

    fn chunks(parts: &[&'static [u8]]) -> ByteStream<'static> {
        let items: Vec<io::Result<Bytes>> =
            parts.iter().map(|p| Ok(Bytes::from_static(p))).collect();
        stream::iter(items).boxed()
    }

    async fn collect(download: FileDownload) -> Vec<u8> {
        let mut out = Vec::new();
        let mut stream = download.stream;
        while let Some(chunk) = stream.next().await {
            out.extend_from_slice(&chunk.unwrap());
        }
        out
    }

    #[tokio::test]
    async fn test_upload_then_open_round_trip() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("nested/uploads"));

        let stored = storage
            .put_stream("hello.txt", chunks(&[b"hel", b"lo"]))
            .await
            .unwrap();
        assert_eq!(stored.name, "hello.txt");
        assert_eq!(stored.size_bytes, 5);
        assert!(stored.path.starts_with(storage.root()));

        let download = storage.open("hello.txt").await.unwrap();
        assert_eq!(download.size_bytes, 5);
        assert_eq!(collect(download).await, b"hello");
    }

    #[tokio::test]
    async fn test_reupload_replaces_content() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage
            .put_stream("a.bin", chunks(&[b"first version"]))
            .await
            .unwrap();
        storage.put_stream("a.bin", chunks(&[b"v2"])).await.unwrap();

        let download = storage.open("a.bin").await.unwrap();
        assert_eq!(download.size_bytes, 2);
        assert_eq!(collect(download).await, b"v2");
    }

    #[tokio::test]
    async fn test_traversal_names_stay_inside_base() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("uploads");
        let storage = LocalStorage::new(&base);

        let stored = storage
            .put_stream("../../escape.txt", chunks(&[b"x"]))
            .await
            .unwrap();
        assert_eq!(stored.path, base.join("escape.txt"));
        assert!(!dir.path().join("escape.txt").exists());
    }

    #[tokio::test]
    async fn test_degenerate_names_rejected() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        for name in ["", "..", "/", "a/.."] {
            let result = storage.put_stream(name, chunks(&[b"x"])).await;
            assert!(matches!(result, Err(StorageError::InvalidKey(_))), "{name:?}");
        }
        assert!(matches!(
            storage.open("..").await,
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        assert!(matches!(
            storage.open("nope.txt").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_directory_is_not_a_file() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let storage = LocalStorage::new(dir.path());

        assert!(matches!(
            storage.open("sub").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_stream_leaves_no_file() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        let items: Vec<io::Result<Bytes>> = vec![
            Ok(Bytes::from_static(b"partial")),
            Err(io::Error::other("connection reset")),
        ];
        let result = storage
            .put_stream("broken.txt", stream::iter(items).boxed())
            .await;

        assert!(matches!(result, Err(StorageError::SourceFailed(_))));
        assert!(!dir.path().join("broken.txt").exists());
        // Staging file cleaned up as well
        let staged = std::fs::read_dir(dir.path().join(STAGING_DIR)).unwrap();
        assert_eq!(staged.count(), 0);
    }

    #[tokio::test]
    async fn test_staging_area_is_not_downloadable() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        storage.put_stream("a.txt", chunks(&[b"a"])).await.unwrap();

        assert!(matches!(
            storage.open(STAGING_DIR).await,
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            storage.put_stream(STAGING_DIR, chunks(&[b"x"])).await,
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn test_discard_incomplete_removes_leftovers() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        storage.put_stream("kept.txt", chunks(&[b"kept"])).await.unwrap();

        let staging = dir.path().join(STAGING_DIR);
        std::fs::write(staging.join("dead.part"), b"orphan").unwrap();
        std::fs::write(staging.join("dead2.part"), b"orphan").unwrap();

        assert_eq!(storage.discard_incomplete().await.unwrap(), 2);
        assert_eq!(std::fs::read_dir(&staging).unwrap().count(), 0);
        assert!(dir.path().join("kept.txt").exists());
    }

    #[tokio::test]
    async fn test_discard_incomplete_without_directory() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("never-created"));
        assert_eq!(storage.discard_incomplete().await.unwrap(), 0);
    }
}
