//! libcurl-backed MetadataSource: signed `HEAD` for one part of an object.

use std::fmt;
use std::str;
use std::time::Duration;

use super::error::{self, RemoteError};
use super::parse;
use super::{MetadataSource, RemoteObjectMetadata};
use crate::location::ObjectLocation;

/// Static AWS credentials used to sign requests, as resolved by
/// [`AwsEnvironment::load`](super::AwsEnvironment::load).
#[derive(Clone)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Where and how to send the metadata request.
#[derive(Debug, Clone)]
pub struct RemoteSettings {
    pub region: String,
    /// Base URL; bucket and key are appended path-style.
    pub endpoint: String,
    /// Endpoint template with a `{region}` placeholder. When set, a reply
    /// naming another bucket region is retried once against that region.
    pub regional_endpoint: Option<String>,
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl RemoteSettings {
    fn endpoint_for_region(&self, region: &str) -> Option<String> {
        self.regional_endpoint
            .as_ref()
            .map(|template| template.replace("{region}", region))
    }
}

/// Result of one HEAD round trip.
enum Reply {
    Metadata(RemoteObjectMetadata),
    /// The bucket lives in this other region.
    WrongRegion(String),
}

/// Issues `HEAD {endpoint}/{bucket}/{key}?partNumber=N`, signed with SigV4
/// when credentials are given and anonymous otherwise (public buckets).
#[derive(Debug, Clone)]
pub struct CurlMetadataSource {
    settings: RemoteSettings,
    credentials: Option<Credentials>,
}

impl CurlMetadataSource {
    pub fn new(settings: RemoteSettings, credentials: Option<Credentials>) -> Self {
        Self {
            settings,
            credentials,
        }
    }

    pub fn settings(&self) -> &RemoteSettings {
        &self.settings
    }
}

impl CurlMetadataSource {
    fn head_once(
        &self,
        location: &ObjectLocation,
        part_number: u32,
        region: &str,
        endpoint: &str,
    ) -> Result<Reply, RemoteError> {
        let url = location.part_url(endpoint, part_number).map_err(|e| {
            RemoteError::InvalidRequest(format!("endpoint {:?}: {}", endpoint, e))
        })?;
        tracing::debug!(url = %url, region, "HEAD part");

        let mut headers: Vec<String> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url.as_str())?;
        easy.nobody(true)?; // HEAD request
        easy.connect_timeout(self.settings.connect_timeout)?;
        easy.timeout(self.settings.timeout)?;

        if let Some(creds) = &self.credentials {
            easy.username(&creds.access_key_id)?;
            easy.password(&creds.secret_access_key)?;
            easy.aws_sigv4(&format!("aws:amz:{}:s3", region))?;

            if let Some(token) = &creds.session_token {
                let mut list = curl::easy::List::new();
                list.append(&format!("x-amz-security-token: {}", token))?;
                easy.http_headers(list)?;
            }
        }

        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    headers.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            tracing::debug!(status = code, "HEAD part rejected");
            if matches!(code, 301 | 307 | 400) {
                if let Some(other) = parse::bucket_region(&headers).filter(|r| r != region) {
                    return Ok(Reply::WrongRegion(other));
                }
            }
            return Err(error::from_status(code));
        }

        parse::parse_headers(&headers).map(Reply::Metadata)
    }
}

impl MetadataSource for CurlMetadataSource {
    /// Runs in the current thread. Follows at most one region redirect.
    fn head_part(
        &self,
        location: &ObjectLocation,
        part_number: u32,
    ) -> Result<RemoteObjectMetadata, RemoteError> {
        let region = match self.head_once(
            location,
            part_number,
            &self.settings.region,
            &self.settings.endpoint,
        )? {
            Reply::Metadata(m) => return Ok(m),
            Reply::WrongRegion(region) => region,
        };
        let Some(endpoint) = self.settings.endpoint_for_region(&region) else {
            return Err(RemoteError::WrongRegion { region });
        };
        tracing::info!(%region, bucket = %location.bucket, "bucket is in another region, retrying there");
        match self.head_once(location, part_number, &region, &endpoint)? {
            Reply::Metadata(m) => Ok(m),
            Reply::WrongRegion(region) => Err(RemoteError::WrongRegion { region }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_secrets() {
        let creds = Credentials {
            access_key_id: "AKIDEXAMPLE".to_string(),
            secret_access_key: "wJalrXUtnFEMI".to_string(),
            session_token: Some("FQoGZXIvYXdzE".to_string()),
        };
        let shown = format!("{:?}", creds);
        assert!(shown.contains("AKIDEXAMPLE"));
        assert!(!shown.contains("wJalrXUtnFEMI"));
        assert!(!shown.contains("FQoGZXIvYXdzE"));
    }

    #[test]
    fn invalid_endpoint_is_reported_before_any_request() {
        let source = CurlMetadataSource::new(
            RemoteSettings {
                region: "us-east-1".to_string(),
                endpoint: "not a url".to_string(),
                regional_endpoint: None,
                connect_timeout: Duration::from_secs(1),
                timeout: Duration::from_secs(1),
            },
            None,
        );
        let err = source
            .head_part(&ObjectLocation::new("bucket", "key"), 1)
            .unwrap_err();
        assert!(matches!(err, RemoteError::InvalidRequest(_)));
    }

    #[test]
    fn regional_endpoint_fills_in_region() {
        let mut settings = RemoteSettings {
            region: "us-east-1".to_string(),
            endpoint: "https://s3.us-east-1.amazonaws.com".to_string(),
            regional_endpoint: Some("https://s3.{region}.amazonaws.com".to_string()),
            connect_timeout: Duration::from_secs(1),
            timeout: Duration::from_secs(1),
        };
        assert_eq!(
            settings.endpoint_for_region("eu-west-2").as_deref(),
            Some("https://s3.eu-west-2.amazonaws.com")
        );
        settings.regional_endpoint = None;
        assert!(settings.endpoint_for_region("eu-west-2").is_none());
    }
}
