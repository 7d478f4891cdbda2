//! Shared AWS configuration context
//!
//! Loads the SDK configuration once and hands out service clients built from
//! it, so a warm Lambda container reuses credentials and connection pools.

use aws_config::{BehaviorVersion, SdkConfig};
use std::sync::Arc;

/// Shared AWS configuration context for creating service clients
///
/// # Example
/// ```ignore
/// let aws = AwsContext::from_env().await;
///
/// let directory = EcsTaskDirectory::from_context(&aws);
/// let ip_source = Ec2IpSource::from_context(&aws);
/// let provider = Route53Provider::from_context(&aws, false);
/// ```
#[derive(Clone)]
pub struct AwsContext {
    config: Arc<SdkConfig>,
}

impl AwsContext {
    /// Load configuration from the environment
    ///
    /// Credentials and region come from the standard provider chain
    /// (environment variables, profile files, the Lambda execution role).
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self::from_sdk_config(config)
    }

    pub fn from_sdk_config(config: SdkConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Get the underlying SDK config for direct client construction
    pub fn sdk_config(&self) -> &SdkConfig {
        &self.config
    }

    /// Configured region, if any
    pub fn region(&self) -> Option<&str> {
        self.config.region().map(|r| r.as_ref())
    }

    pub fn ecs_client(&self) -> aws_sdk_ecs::Client {
        aws_sdk_ecs::Client::new(self.sdk_config())
    }

    pub fn ec2_client(&self) -> aws_sdk_ec2::Client {
        aws_sdk_ec2::Client::new(self.sdk_config())
    }

    pub fn route53_client(&self) -> aws_sdk_route53::Client {
        aws_sdk_route53::Client::new(self.sdk_config())
    }
}

impl std::fmt::Debug for AwsContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsContext")
            .field("region", &self.region())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_config::Region;

    fn offline_config(region: &'static str) -> SdkConfig {
        SdkConfig::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::from_static(region))
            .build()
    }

    #[test]
    fn region_comes_from_config() {
        let ctx = AwsContext::from_sdk_config(offline_config("eu-west-1"));
        assert_eq!(ctx.region(), Some("eu-west-1"));
    }

    #[test]
    fn clones_share_config() {
        let ctx1 = AwsContext::from_sdk_config(offline_config("us-east-2"));
        let ctx2 = ctx1.clone();

        assert!(Arc::ptr_eq(&ctx1.config, &ctx2.config));
    }

    #[test]
    fn debug_shows_region() {
        let ctx = AwsContext::from_sdk_config(offline_config("us-east-2"));
        let debug = format!("{:?}", ctx);
        assert!(debug.contains("AwsContext"));
        assert!(debug.contains("us-east-2"));
    }
}
