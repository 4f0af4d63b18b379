//! Ferry Storage Library
//!
//! Filesystem side of the transfer service: the filename sanitizer and the `Storage`
//! trait with its local, flat-directory implementation.
//!
//! # Layout
//!
//! Files live directly under the upload directory, named by their sanitized
//! client-supplied filename. Uploads are written into the hidden `.ferry-staging`
//! subdirectory and renamed into place once complete; that name can never be uploaded
//! or downloaded.

pub mod local;
pub mod sanitize;
pub mod traits;

// Re-export commonly used types
pub use local::{LocalStorage, STAGING_DIR};
pub use sanitize::sanitize_filename;
pub use traits::{ByteStream, FileDownload, Storage, StorageError, StorageResult, StoredFile};
