//! Amazon Route 53 hosted-zone provider

mod error;
mod http;
mod provider;
mod sign;
/// Route 53 REST-XML request/response types.
pub(crate) mod types;

use reqwest::Client;

use crate::credentials::AwsCredentials;
use crate::error::Result;
use crate::providers::common::create_http_client;

/// Route 53 API host (global partition).
pub(crate) const ROUTE53_HOST: &str = "route53.amazonaws.com";
/// Route 53 API version path prefix.
pub(crate) const API_VERSION: &str = "2013-04-01";
/// XML namespace of every request body.
pub(crate) const XML_NAMESPACE: &str = "https://route53.amazonaws.com/doc/2013-04-01/";
/// Signing region of the global partition.
pub(crate) const DEFAULT_SIGNING_REGION: &str = "us-east-1";
/// `SigV4` service name.
pub(crate) const SIGNING_SERVICE: &str = "route53";

/// Route 53 provider implementation.
///
/// Authenticates with `SigV4` (`AWS4-HMAC-SHA256`) request signing.
///
/// # Construction
///
/// ```rust,no_run
/// use axfr2route53_provider::{AwsCredentials, Route53Provider};
///
/// # fn main() -> axfr2route53_provider::Result<()> {
/// let provider = Route53Provider::new(AwsCredentials::from_env()?)?;
/// # Ok(())
/// # }
/// ```
pub struct Route53Provider {
    pub(crate) client: Client,
    pub(crate) credentials: AwsCredentials,
    pub(crate) host: String,
    pub(crate) region: String,
}

/// Builder for [`Route53Provider`] with a configurable endpoint.
pub struct Route53ProviderBuilder {
    credentials: AwsCredentials,
    host: String,
    region: String,
}

impl Route53ProviderBuilder {
    fn new(credentials: AwsCredentials) -> Self {
        Self {
            credentials,
            host: ROUTE53_HOST.to_string(),
            region: DEFAULT_SIGNING_REGION.to_string(),
        }
    }

    /// Override the API host, e.g. `route53.amazonaws.com.cn` (default: global endpoint).
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Override the signing region (default: `us-east-1`).
    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Build the [`Route53Provider`] instance.
    pub fn build(self) -> Result<Route53Provider> {
        Ok(Route53Provider {
            client: create_http_client("route53")?,
            credentials: self.credentials,
            host: self.host,
            region: self.region,
        })
    }
}

impl Route53Provider {
    /// Creates a provider for the global Route 53 endpoint.
    pub fn new(credentials: AwsCredentials) -> Result<Self> {
        Self::builder(credentials).build()
    }

    /// Returns a builder for customizing the provider configuration.
    pub fn builder(credentials: AwsCredentials) -> Route53ProviderBuilder {
        Route53ProviderBuilder::new(credentials)
    }
}
