//! Region, endpoint and credentials from the AWS default provider chain.
//!
//! Resolution follows the AWS CLI and SDKs: environment variables, the shared
//! `config`/`credentials` files (`AWS_PROFILE`, SSO, `credential_process`),
//! web identity, then container and instance roles.

use std::error::Error as StdError;

use aws_config::{BehaviorVersion, Region};
use aws_credential_types::provider::error::CredentialsError;
use aws_credential_types::provider::ProvideCredentials;

use super::curl_source::Credentials;
use super::error::RemoteError;

/// What the default chain resolved. Every part may be missing.
#[derive(Debug, Clone, Default)]
pub struct AwsEnvironment {
    pub region: Option<String>,
    /// `AWS_ENDPOINT_URL` or the profile's `endpoint_url`.
    pub endpoint_url: Option<String>,
    /// None when no provider in the chain had credentials.
    pub credentials: Option<Credentials>,
}

impl AwsEnvironment {
    /// Walk the chain once. `region` pins the region used for SSO/STS calls
    /// and is reported back unchanged.
    ///
    /// Finding no credentials at all is not an error (requests go out
    /// unsigned); a provider that is configured but fails is.
    pub async fn load(region: Option<&str>) -> Result<Self, RemoteError> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(r) = region {
            loader = loader.region(Region::new(r.to_string()));
        }
        let sdk = loader.load().await;

        let credentials = match sdk.credentials_provider() {
            Some(provider) => match provider.provide_credentials().await {
                Ok(c) => Some(Credentials {
                    access_key_id: c.access_key_id().to_string(),
                    secret_access_key: c.secret_access_key().to_string(),
                    session_token: c.session_token().map(str::to_string),
                }),
                Err(CredentialsError::CredentialsNotLoaded(_)) => None,
                Err(e) => return Err(RemoteError::Credentials(error_chain(&e))),
            },
            None => None,
        };
        if credentials.is_none() {
            tracing::warn!("no AWS credentials found; sending unsigned requests");
        }

        let env = Self {
            region: sdk.region().map(|r| r.to_string()),
            endpoint_url: sdk.endpoint_url().map(str::to_string),
            credentials,
        };
        tracing::debug!(region = ?env.region, endpoint = ?env.endpoint_url, signed = env.credentials.is_some(), "AWS chain resolved");
        Ok(env)
    }
}

/// `outer: inner: root` for an error and its sources.
fn error_chain(err: &dyn StdError) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(e) = source {
        msg.push_str(": ");
        msg.push_str(&e.to_string());
        source = e.source();
    }
    msg
}
