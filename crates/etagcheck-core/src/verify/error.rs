//! Failure kinds for one verification run. Every kind is terminal.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::etag::EtagError;
use crate::location::ObjectLocation;
use crate::remote::RemoteError;

/// Exit code for a run stopped by Ctrl+C (128 + SIGINT).
pub const EXIT_INTERRUPTED: i32 = 130;

#[derive(Debug, Error)]
pub enum VerifyError {
    /// Path missing or not a regular file. No remote call is made.
    #[error("Local file not found: '{}'", path.display())]
    LocalNotFound { path: PathBuf },

    #[error("S3 object not found: '{location}'")]
    RemoteNotFound { location: ObjectLocation },

    /// Any other metadata failure (auth, network, malformed response).
    #[error("Error fetching S3 object metadata: {0}")]
    Remote(#[source] RemoteError),

    /// Sizes differ; the checksum is never computed in this case.
    #[error("Size mismatch: Local file size {local} bytes, S3 object size {remote} bytes.")]
    SizeMismatch { local: u64, remote: u64 },

    #[error("ETag mismatch: Local file ETag: {local}, S3 object ETag: {remote}")]
    ChecksumMismatch {
        local: String,
        remote: String,
        /// Parts the local file split into at the remote part size.
        local_parts: u64,
        /// Parts the store reports for the object.
        remote_parts: u64,
    },

    #[error("interrupted")]
    Interrupted,

    /// Local file could not be stat'ed or read to the end.
    #[error("read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl VerifyError {
    pub(crate) fn from_remote(err: RemoteError, location: &ObjectLocation) -> Self {
        if err.is_not_found() {
            VerifyError::RemoteNotFound {
                location: location.clone(),
            }
        } else {
            VerifyError::Remote(err)
        }
    }

    pub(crate) fn from_etag(err: EtagError, path: PathBuf) -> Self {
        match err {
            EtagError::Interrupted => VerifyError::Interrupted,
            EtagError::InvalidArgument(msg) => VerifyError::InvalidArgument(msg),
            EtagError::Io(source) => VerifyError::Io { path, source },
        }
    }

    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            VerifyError::Interrupted => EXIT_INTERRUPTED,
            _ => 1,
        }
    }

    /// Extra detail worth showing after the main message, if any.
    pub fn hint(&self) -> Option<String> {
        match self {
            VerifyError::ChecksumMismatch {
                local_parts,
                remote_parts,
                ..
            } if local_parts != remote_parts => Some(format!(
                "local file splits into {} part(s) at the remote part size, but the object reports {}; \
                 the object was probably uploaded with varying part sizes",
                local_parts, remote_parts
            )),
            VerifyError::ChecksumMismatch { .. } => {
                Some("part layout matches; the contents differ".to_string())
            }
            _ => None,
        }
    }
}
