//! Bucket/key addressing and request URL building.

use std::fmt;
use url::Url;

/// An object in a bucket, e.g. `s3://photos/2024/raw.tar`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

impl ObjectLocation {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Path-style URL for this object under `endpoint`, with `?partNumber=N`.
    ///
    /// Key segments are percent-encoded individually so `/` keeps its meaning
    /// as a separator.
    pub fn part_url(&self, endpoint: &str, part_number: u32) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(endpoint)?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?;
            segments.pop_if_empty();
            segments.push(&self.bucket);
            segments.extend(self.key.split('/'));
        }
        url.query_pairs_mut()
            .clear()
            .append_pair("partNumber", &part_number.to_string());
        Ok(url)
    }
}

impl fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_as_s3_uri() {
        let loc = ObjectLocation::new("bucket", "dir/file.bin");
        assert_eq!(loc.to_string(), "s3://bucket/dir/file.bin");
    }

    #[test]
    fn part_url_path_style() {
        let loc = ObjectLocation::new("bucket", "dir/file.bin");
        let url = loc
            .part_url("https://s3.eu-west-1.amazonaws.com", 1)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://s3.eu-west-1.amazonaws.com/bucket/dir/file.bin?partNumber=1"
        );
    }

    #[test]
    fn part_url_escapes_key_segments() {
        let loc = ObjectLocation::new("bucket", "my dir/a#b?.txt");
        let url = loc.part_url("http://127.0.0.1:9000/", 1).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9000/bucket/my%20dir/a%23b%3F.txt?partNumber=1"
        );
    }

    #[test]
    fn part_url_keeps_endpoint_prefix() {
        let loc = ObjectLocation::new("b", "k");
        let url = loc.part_url("http://gateway.local/s3/", 3).unwrap();
        assert_eq!(url.as_str(), "http://gateway.local/s3/b/k?partNumber=3");
    }

    #[test]
    fn part_url_rejects_bad_endpoint() {
        let loc = ObjectLocation::new("b", "k");
        assert!(loc.part_url("not a url", 1).is_err());
        assert!(loc.part_url("mailto:someone@example.com", 1).is_err());
    }
}
