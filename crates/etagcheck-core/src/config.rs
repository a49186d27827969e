//! Optional configuration from `~/.config/etagcheck/config.toml`.
//!
//! The file is never created by the tool; a missing file means defaults.
//! CLI flags and the AWS default chain (environment, `~/.aws/config`)
//! override file values.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::remote::{AwsEnvironment, RemoteSettings};

pub const DEFAULT_REGION: &str = "us-east-1";

/// AWS regional S3 endpoint; `{region}` is substituted.
pub const AWS_ENDPOINT_TEMPLATE: &str = "https://s3.{region}.amazonaws.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("locate config dir: {0}")]
    Xdg(#[from] xdg::BaseDirectoriesError),
    #[error("read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Settings loaded from `config.toml`. Every field is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EtagcheckConfig {
    /// Signing region (e.g. "eu-west-1").
    pub region: Option<String>,
    /// Endpoint base URL for S3-compatible stores. None = AWS regional endpoint.
    pub endpoint: Option<String>,
    /// Connect timeout for the metadata request, in seconds.
    pub connect_timeout_secs: u64,
    /// Total timeout for the metadata request, in seconds.
    pub timeout_secs: u64,
    /// Minimum interval between progress line redraws, in milliseconds.
    pub progress_interval_ms: u64,
}

impl Default for EtagcheckConfig {
    fn default() -> Self {
        Self {
            region: None,
            endpoint: None,
            connect_timeout_secs: 15,
            timeout_secs: 30,
            progress_interval_ms: 200,
        }
    }
}

/// Values that win over the config file (CLI flags, then the AWS chain).
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub region: Option<String>,
    pub endpoint: Option<String>,
}

impl From<&AwsEnvironment> for Overrides {
    fn from(aws: &AwsEnvironment) -> Self {
        Self {
            region: aws.region.clone(),
            endpoint: aws.endpoint_url.clone(),
        }
    }
}

impl Overrides {
    /// Fill unset fields from `fallback`.
    pub fn or(self, fallback: Overrides) -> Self {
        Self {
            region: self.region.or(fallback.region),
            endpoint: self.endpoint.or(fallback.endpoint),
        }
    }
}

impl EtagcheckConfig {
    /// Resolve the remote request settings, applying `overrides` first.
    ///
    /// Only the derived AWS endpoint follows region redirects; an explicit
    /// endpoint is used as given.
    pub fn remote_settings(&self, overrides: &Overrides) -> RemoteSettings {
        let region = overrides
            .region
            .clone()
            .or_else(|| self.region.clone())
            .unwrap_or_else(|| DEFAULT_REGION.to_string());
        let explicit = overrides
            .endpoint
            .clone()
            .or_else(|| self.endpoint.clone());
        let (endpoint, regional_endpoint) = match explicit {
            Some(e) => (e, None),
            None => (
                AWS_ENDPOINT_TEMPLATE.replace("{region}", &region),
                Some(AWS_ENDPOINT_TEMPLATE.to_string()),
            ),
        };
        RemoteSettings {
            region,
            endpoint,
            regional_endpoint,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }
}

/// Existing config file, if any. Nothing is created.
pub fn config_path() -> Result<Option<PathBuf>, ConfigError> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("etagcheck")?;
    Ok(xdg_dirs.find_config_file("config.toml"))
}

/// Load the config file if present; defaults otherwise.
pub fn load() -> Result<EtagcheckConfig, ConfigError> {
    match config_path()? {
        Some(path) => load_from(&path),
        None => Ok(EtagcheckConfig::default()),
    }
}

pub fn load_from(path: &Path) -> Result<EtagcheckConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("no config at {}, using defaults", path.display());
        return Ok(EtagcheckConfig::default());
    }
    let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&data).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = EtagcheckConfig::default();
        assert!(cfg.region.is_none());
        assert!(cfg.endpoint.is_none());
        assert_eq!(cfg.connect_timeout_secs, 15);
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.progress_interval(), Duration::from_millis(200));
    }

    #[test]
    fn config_toml_partial_values() {
        let toml = r#"
            region = "eu-central-1"
            timeout_secs = 5
        "#;
        let cfg: EtagcheckConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.region.as_deref(), Some("eu-central-1"));
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.connect_timeout_secs, 15);
        assert!(cfg.endpoint.is_none());
    }

    #[test]
    fn remote_settings_defaults_to_regional_endpoint() {
        let cfg = EtagcheckConfig::default();
        let s = cfg.remote_settings(&Overrides::default());
        assert_eq!(s.region, "us-east-1");
        assert_eq!(s.endpoint, "https://s3.us-east-1.amazonaws.com");
        assert_eq!(s.regional_endpoint.as_deref(), Some(AWS_ENDPOINT_TEMPLATE));
        assert_eq!(s.timeout, Duration::from_secs(30));
    }

    #[test]
    fn overrides_beat_file_values() {
        let cfg = EtagcheckConfig {
            region: Some("eu-west-1".to_string()),
            endpoint: Some("http://minio.local:9000".to_string()),
            ..Default::default()
        };
        let from_file = cfg.remote_settings(&Overrides::default());
        assert_eq!(from_file.region, "eu-west-1");
        assert_eq!(from_file.endpoint, "http://minio.local:9000");
        assert!(from_file.regional_endpoint.is_none());

        let flags = Overrides {
            region: Some("ap-south-1".to_string()),
            endpoint: None,
        };
        let env = Overrides {
            region: Some("us-west-2".to_string()),
            endpoint: Some("http://env.local".to_string()),
        };
        let s = cfg.remote_settings(&flags.or(env));
        assert_eq!(s.region, "ap-south-1");
        assert_eq!(s.endpoint, "http://env.local");
    }

    #[test]
    fn aws_chain_values_sit_below_flags() {
        let aws = AwsEnvironment {
            region: Some("eu-west-3".to_string()),
            endpoint_url: None,
            credentials: None,
        };
        let cfg = EtagcheckConfig {
            region: Some("us-west-1".to_string()),
            ..Default::default()
        };
        let s = cfg.remote_settings(&Overrides::default().or(Overrides::from(&aws)));
        assert_eq!(s.region, "eu-west-3");

        let flags = Overrides {
            region: Some("sa-east-1".to_string()),
            endpoint: None,
        };
        let s = cfg.remote_settings(&flags.or(Overrides::from(&aws)));
        assert_eq!(s.region, "sa-east-1");
        assert_eq!(s.endpoint, "https://s3.sa-east-1.amazonaws.com");
    }

    #[test]
    fn region_override_moves_default_endpoint() {
        let cfg = EtagcheckConfig::default();
        let s = cfg.remote_settings(&Overrides {
            region: Some("eu-north-1".to_string()),
            endpoint: None,
        });
        assert_eq!(s.endpoint, "https://s3.eu-north-1.amazonaws.com");
    }

    #[test]
    fn load_from_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg.timeout_secs, 30);
    }

    #[test]
    fn load_from_invalid_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timeout_secs = \"soon\"").unwrap();
        assert!(matches!(load_from(&path), Err(ConfigError::Parse { .. })));
    }
}
