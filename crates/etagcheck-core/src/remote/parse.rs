//! Parse HEAD response header lines into RemoteObjectMetadata.

use super::{RemoteError, RemoteObjectMetadata};

const PARTS_COUNT_HEADER: &str = "x-amz-mp-parts-count";
const BUCKET_REGION_HEADER: &str = "x-amz-bucket-region";

/// Parse collected header lines into RemoteObjectMetadata.
///
/// Only the last response block counts when curl saw several (e.g. an
/// interim `100 Continue`). `Content-Range` carries the total size for a
/// part request; without it the object was not multipart and
/// `Content-Length` is the whole object.
pub(crate) fn parse_headers(lines: &[String]) -> Result<RemoteObjectMetadata, RemoteError> {
    let mut content_length = None;
    let mut range_total = None;
    let mut etag = None;
    let mut parts_count = None;

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            content_length = None;
            range_total = None;
            etag = None;
            parts_count = None;
            continue;
        }
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim();
        let value = value.trim();
        if name.eq_ignore_ascii_case("content-length") {
            content_length = Some(parse_u64(name, value)?);
        } else if name.eq_ignore_ascii_case("content-range") {
            range_total = Some(parse_range_total(value)?);
        } else if name.eq_ignore_ascii_case("etag") {
            etag = Some(value.trim_matches('"').to_string());
        } else if name.eq_ignore_ascii_case(PARTS_COUNT_HEADER) {
            parts_count = Some(parse_u64(name, value)?);
        }
    }

    let etag = etag.ok_or_else(|| RemoteError::MalformedResponse("missing ETag".to_string()))?;
    let part_size = content_length
        .ok_or_else(|| RemoteError::MalformedResponse("missing Content-Length".to_string()))?;

    Ok(RemoteObjectMetadata {
        etag,
        object_size: range_total.unwrap_or(part_size),
        part_size,
        parts_count: parts_count.unwrap_or(1),
    })
}

/// `x-amz-bucket-region` from the last response block, if sent.
pub(crate) fn bucket_region(lines: &[String]) -> Option<String> {
    let mut region = None;
    for line in lines {
        let line = line.trim();
        if line.starts_with("HTTP/") {
            region = None;
        } else if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case(BUCKET_REGION_HEADER) {
                region = Some(value.trim().to_string()).filter(|v| !v.is_empty());
            }
        }
    }
    region
}

fn parse_u64(name: &str, value: &str) -> Result<u64, RemoteError> {
    value
        .parse()
        .map_err(|_| RemoteError::MalformedResponse(format!("bad {name}: {value:?}")))
}

/// `bytes 0-8388607/52428800` -> 52428800.
fn parse_range_total(value: &str) -> Result<u64, RemoteError> {
    value
        .rsplit_once('/')
        .and_then(|(_, total)| total.trim().parse().ok())
        .ok_or_else(|| RemoteError::MalformedResponse(format!("bad Content-Range: {value:?}")))
}
