//! Remote object metadata: what the store says about part 1 of an object.
//!
//! `MetadataSource` is the seam the verifier talks to. `CurlMetadataSource`
//! implements it with a SigV4-signed `HEAD ?partNumber=1` over libcurl and
//! reads size, part size, part count and ETag from the response headers.
//! `AwsEnvironment` supplies its credentials and region.

mod aws_chain;
mod curl_source;
mod error;
mod parse;

pub use aws_chain::AwsEnvironment;
pub use curl_source::{Credentials, CurlMetadataSource, RemoteSettings};
pub use error::RemoteError;

use crate::location::ObjectLocation;

/// Metadata reported by the store for one part of an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteObjectMetadata {
    /// ETag as reported, with surrounding quotes removed.
    pub etag: String,
    /// Total object size in bytes.
    pub object_size: u64,
    /// Size of the requested part in bytes (the upload's part size for part 1).
    pub part_size: u64,
    /// Number of parts the object was uploaded in (1 for non-multipart objects).
    pub parts_count: u64,
}

/// Anything that can answer a part metadata query.
pub trait MetadataSource {
    fn head_part(
        &self,
        location: &ObjectLocation,
        part_number: u32,
    ) -> Result<RemoteObjectMetadata, RemoteError>;
}
