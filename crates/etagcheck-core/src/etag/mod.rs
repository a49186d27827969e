//! Local reconstruction of S3 multipart-upload ETags.
//!
//! The file is split into parts of the size the object was uploaded with;
//! each part is MD5-hashed, and when there is more than one part the binary
//! digests are concatenated and hashed again, with `-<part count>` appended.
//! A single part yields its plain MD5.

mod composite;
mod compute;
mod error;

pub use composite::{CompositeEtag, DIGEST_LEN};
pub use compute::{compute_etag, etag_path, DigestOptions};
pub use error::{EtagError, ParseEtagError};
