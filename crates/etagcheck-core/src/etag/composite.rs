//! The composite (multipart) ETag value and its string form.

use md5::{Digest, Md5};
use std::fmt;
use std::str::FromStr;

use super::error::ParseEtagError;

/// MD5 digest length in bytes.
pub const DIGEST_LEN: usize = 16;

/// An S3-style ETag: either the plain MD5 of a single part, or
/// `md5(concat(part digests))` with a `-<part count>` suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeEtag {
    digest: [u8; DIGEST_LEN],
    part_count: u64,
    suffixed: bool,
}

impl CompositeEtag {
    /// Combine per-part digests (in part order) into the composite value.
    ///
    /// One digest yields that digest unchanged; an empty slice is treated as
    /// a single empty part.
    pub fn from_part_digests(digests: &[[u8; DIGEST_LEN]]) -> Self {
        match digests {
            [] => Self::single(Md5::digest(b"").into()),
            [only] => Self::single(*only),
            many => {
                let mut hasher = Md5::new();
                for d in many {
                    hasher.update(d);
                }
                Self {
                    digest: hasher.finalize().into(),
                    part_count: many.len() as u64,
                    suffixed: true,
                }
            }
        }
    }

    fn single(digest: [u8; DIGEST_LEN]) -> Self {
        Self {
            digest,
            part_count: 1,
            suffixed: false,
        }
    }

    /// The form S3 reports when a single part was uploaded through the
    /// multipart API: `md5(digest)-1`. Already-suffixed values are returned as is.
    pub fn to_multipart_form(&self) -> Self {
        if self.suffixed {
            return self.clone();
        }
        Self {
            digest: Md5::digest(self.digest).into(),
            part_count: 1,
            suffixed: true,
        }
    }

    /// Lowercase hex of the top-level digest, without any suffix.
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }

    pub fn part_count(&self) -> u64 {
        self.part_count
    }

    /// True when the value carries a `-<count>` suffix.
    pub fn is_multipart(&self) -> bool {
        self.suffixed
    }
}

impl fmt::Display for CompositeEtag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.digest_hex())?;
        if self.suffixed {
            write!(f, "-{}", self.part_count)?;
        }
        Ok(())
    }
}

impl FromStr for CompositeEtag {
    type Err = ParseEtagError;

    /// Accepts `hex` or `hex-N`, optionally wrapped in double quotes as the
    /// `ETag` header sends it.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseEtagError(s.to_string());
        let trimmed = s.trim().trim_matches('"');
        let (hex_part, count) = match trimmed.split_once('-') {
            Some((h, n)) => {
                let n: u64 = n.parse().map_err(|_| err())?;
                if n == 0 {
                    return Err(err());
                }
                (h, Some(n))
            }
            None => (trimmed, None),
        };
        let mut digest = [0u8; DIGEST_LEN];
        hex::decode_to_slice(hex_part, &mut digest).map_err(|_| err())?;
        Ok(match count {
            Some(n) => Self {
                digest,
                part_count: n,
                suffixed: true,
            },
            None => Self::single(digest),
        })
    }
}
