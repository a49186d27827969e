//! Streaming reconstruction of a multipart ETag from a reader.

use md5::{Digest, Md5};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use super::composite::{CompositeEtag, DIGEST_LEN};
use super::error::EtagError;
use crate::control::AbortToken;
use crate::progress::DigestProgress;

const BUF_SIZE: usize = 64 * 1024;

/// Optional knobs for a digest run. `Default` gives a silent, uncancellable run.
#[derive(Default)]
pub struct DigestOptions<'a> {
    /// Expected total size, only used to fill in progress snapshots.
    pub total_size: u64,
    /// Checked between buffer reads; when set the run stops with `Interrupted`.
    pub abort: Option<&'a AbortToken>,
    /// Called once after every completed part.
    pub on_progress: Option<&'a mut dyn FnMut(DigestProgress)>,
}

/// Rebuild the composite ETag of everything `reader` yields, split into
/// `chunk_size`-byte parts.
///
/// Parts are hashed incrementally through a fixed buffer, so memory use does
/// not depend on the part size. Empty input is treated as one empty part.
pub fn compute_etag<R: Read>(
    mut reader: R,
    chunk_size: u64,
    mut opts: DigestOptions<'_>,
) -> Result<CompositeEtag, EtagError> {
    if chunk_size == 0 {
        return Err(EtagError::InvalidArgument(
            "part size must be greater than zero".to_string(),
        ));
    }

    let mut buf = vec![0u8; BUF_SIZE];
    let mut digests: Vec<[u8; DIGEST_LEN]> = Vec::new();
    let mut bytes_done = 0u64;

    loop {
        let mut hasher = Md5::new();
        let mut in_part = 0u64;

        while in_part < chunk_size {
            if opts.abort.is_some_and(AbortToken::is_aborted) {
                return Err(EtagError::Interrupted);
            }
            let want = (chunk_size - in_part).min(BUF_SIZE as u64) as usize;
            let n = match reader.read(&mut buf[..want]) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(EtagError::Io(e)),
            };
            hasher.update(&buf[..n]);
            in_part += n as u64;
        }

        // EOF exactly on a part boundary: nothing left to add.
        if in_part == 0 && !digests.is_empty() {
            break;
        }

        digests.push(hasher.finalize().into());
        bytes_done += in_part;

        if let Some(cb) = opts.on_progress.as_mut() {
            cb(DigestProgress {
                bytes_done,
                total_bytes: opts.total_size,
                parts_done: digests.len() as u64,
            });
        }

        if in_part < chunk_size {
            break;
        }
    }

    tracing::debug!(
        parts = digests.len(),
        bytes = bytes_done,
        chunk_size,
        "part digests complete"
    );
    Ok(CompositeEtag::from_part_digests(&digests))
}

/// Open `path` and rebuild its composite ETag. The file is read once, front to back.
pub fn etag_path(
    path: &Path,
    chunk_size: u64,
    opts: DigestOptions<'_>,
) -> Result<CompositeEtag, EtagError> {
    let f = File::open(path)?;
    compute_etag(f, chunk_size, opts)
}
