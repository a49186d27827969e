//! Verification driver: compare a local file with an S3 object.
//!
//! One run goes `Start -> SizesCompared -> ChecksumComputed -> Done`, or
//! stops in `Failed` at the first error. The size check comes before the
//! (expensive) ETag rebuild; nothing is retried.

mod error;

pub use error::{VerifyError, EXIT_INTERRUPTED};

use std::fs;
use std::io;
use std::path::Path;

use crate::control::AbortToken;
use crate::etag::{self, CompositeEtag, DigestOptions};
use crate::location::ObjectLocation;
use crate::progress::DigestProgress;
use crate::remote::{MetadataSource, RemoteError, RemoteObjectMetadata};

/// Part whose metadata carries the upload's part size.
const FIRST_PART: u32 = 1;

/// Where a run got to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyState {
    Start,
    SizesCompared,
    ChecksumComputed,
    Done,
    Failed,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyReport {
    pub local_size: u64,
    pub local_etag: String,
    pub remote: RemoteObjectMetadata,
}

/// Hooks for presenting a run while it happens. All methods default to no-ops.
pub trait VerifyObserver {
    fn local_file(&mut self, _path: &Path, _size: u64) {}
    fn remote_object(&mut self, _location: &ObjectLocation, _metadata: &RemoteObjectMetadata) {}
    fn progress(&mut self, _progress: DigestProgress) {}
}

/// Observer that ignores everything.
pub struct Silent;

impl VerifyObserver for Silent {}

/// Runs verifications against an injected metadata source.
pub struct Verifier<'a> {
    source: &'a dyn MetadataSource,
    abort: Option<AbortToken>,
    state: VerifyState,
}

impl<'a> Verifier<'a> {
    pub fn new(source: &'a dyn MetadataSource) -> Self {
        Self {
            source,
            abort: None,
            state: VerifyState::Start,
        }
    }

    /// Stop digesting when `token` is aborted.
    pub fn with_abort(mut self, token: AbortToken) -> Self {
        self.abort = Some(token);
        self
    }

    pub fn state(&self) -> VerifyState {
        self.state
    }

    pub fn run(
        &mut self,
        local_path: &Path,
        location: &ObjectLocation,
        observer: &mut dyn VerifyObserver,
    ) -> Result<VerifyReport, VerifyError> {
        self.state = VerifyState::Start;
        let result = self.run_steps(local_path, location, observer);
        match &result {
            Ok(_) => tracing::info!(%location, path = %local_path.display(), "verified"),
            Err(e) => {
                self.state = VerifyState::Failed;
                tracing::info!(%location, path = %local_path.display(), error = %e, "verification failed");
            }
        }
        result
    }

    fn run_steps(
        &mut self,
        local_path: &Path,
        location: &ObjectLocation,
        observer: &mut dyn VerifyObserver,
    ) -> Result<VerifyReport, VerifyError> {
        let local_size = local_file_size(local_path)?;
        observer.local_file(local_path, local_size);

        let remote = self
            .source
            .head_part(location, FIRST_PART)
            .map_err(|e| VerifyError::from_remote(e, location))?;
        observer.remote_object(location, &remote);
        tracing::debug!(?remote, "part metadata");

        if local_size != remote.object_size {
            return Err(VerifyError::SizeMismatch {
                local: local_size,
                remote: remote.object_size,
            });
        }
        self.state = VerifyState::SizesCompared;

        let chunk_size = part_size_for_digest(&remote)?;
        let mut on_progress = |p: DigestProgress| observer.progress(p);
        let opts = DigestOptions {
            total_size: local_size,
            abort: self.abort.as_ref(),
            on_progress: Some(&mut on_progress),
        };
        let local = etag::etag_path(local_path, chunk_size, opts)
            .map_err(|e| VerifyError::from_etag(e, local_path.to_path_buf()))?;
        self.state = VerifyState::ChecksumComputed;

        let local_etag = comparable_form(&local, &remote.etag);
        if local_etag != remote.etag {
            return Err(VerifyError::ChecksumMismatch {
                local: local_etag,
                remote: remote.etag,
                local_parts: local.part_count(),
                remote_parts: remote.parts_count,
            });
        }
        self.state = VerifyState::Done;

        Ok(VerifyReport {
            local_size,
            local_etag,
            remote,
        })
    }
}

fn local_file_size(path: &Path) -> Result<u64, VerifyError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(meta.len()),
        Ok(_) => Err(VerifyError::LocalNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(VerifyError::LocalNotFound {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(VerifyError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Part size to split the local file at. An empty object reports a zero
/// part size, which still means "one empty part".
fn part_size_for_digest(remote: &RemoteObjectMetadata) -> Result<u64, VerifyError> {
    match (remote.part_size, remote.object_size) {
        (0, 0) => Ok(1),
        (0, _) => Err(VerifyError::Remote(RemoteError::MalformedResponse(
            "part size 0 for a non-empty object".to_string(),
        ))),
        (n, _) => Ok(n),
    }
}

/// String to compare against the reported ETag.
///
/// A single part uploaded through the multipart API is reported as
/// `md5(md5(data))-1`, so a one-part local result is converted to match.
fn comparable_form(local: &CompositeEtag, reported: &str) -> String {
    match reported.parse::<CompositeEtag>() {
        Ok(r) if r.is_multipart() && r.part_count() == 1 && !local.is_multipart() => {
            local.to_multipart_form().to_string()
        }
        Ok(_) => local.to_string(),
        Err(e) => {
            tracing::warn!("{}; comparison will fail unless it matches verbatim", e);
            local.to_string()
        }
    }
}
