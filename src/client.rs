//! S3 client construction.

use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client;
use tracing::debug;

pub const DEFAULT_REGION: &str = "us-west-2";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub region: Option<String>,
    /// Custom endpoint, e.g. a local S3-compatible server.
    pub endpoint: Option<String>,
    /// Send requests without credentials or signatures. Works for public buckets.
    pub unsigned: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            region: None,
            endpoint: None,
            unsigned: true,
        }
    }
}

impl ClientConfig {
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_unsigned(mut self, unsigned: bool) -> Self {
        self.unsigned = unsigned;
        self
    }
}

pub async fn build_client(config: &ClientConfig) -> Client {
    let region_provider = RegionProviderChain::first_try(config.region.clone().map(Region::new))
        .or_default_provider()
        .or_else(DEFAULT_REGION);

    let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);

    if config.unsigned {
        loader = loader.no_credentials();
    }

    if let Some(endpoint) = &config.endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    let shared_config = loader.load().await;
    debug!(
        region = ?shared_config.region(),
        endpoint = ?config.endpoint,
        unsigned = config.unsigned,
        "built S3 client"
    );

    // Custom endpoints rarely resolve virtual-hosted bucket names.
    let s3_config = aws_sdk_s3::config::Builder::from(&shared_config)
        .force_path_style(config.endpoint.is_some())
        .build();

    Client::from_conf(s3_config)
}
