// # Task Directory Trait
//
// Defines the orchestrator lookups the engine needs.
//
// ## Implementations
//
// - Amazon ECS: `taskdns-aws` crate (`EcsTaskDirectory`)
//
// ## Usage
//
// ```rust,ignore
// use taskdns_core::TaskDirectory;
//
// let tags = directory.list_tags(&task.cluster_arn).await?;
// let host = directory
//     .container_instance_ec2_id(&task.cluster_arn, container_instance_arn)
//     .await?;
// ```

use crate::tags::TagMap;
use async_trait::async_trait;

/// Trait for container-orchestration directory implementations
///
/// Implementations perform exactly one remote call per method and return
/// the result as-is. They do not retry, cache, or decide anything; an absent
/// value is reported as `Ok(None)` and left to the engine.
#[async_trait]
pub trait TaskDirectory: Send + Sync {
    /// Fetch the tags attached to a resource (cluster, service or task ARN)
    ///
    /// # Returns
    ///
    /// - `Ok(TagMap)`: All tags, possibly empty
    /// - `Err(Error)`: The lookup failed
    async fn list_tags(&self, resource_arn: &str) -> Result<TagMap, crate::Error>;

    /// Resolve the EC2 instance id backing a container instance
    ///
    /// # Returns
    ///
    /// - `Ok(Some(id))`: The instance id
    /// - `Ok(None)`: The container instance is unknown or reports no instance
    /// - `Err(Error)`: The lookup failed
    async fn container_instance_ec2_id(
        &self,
        cluster_arn: &str,
        container_instance_arn: &str,
    ) -> Result<Option<String>, crate::Error>;

    /// Directory name (for logging)
    fn directory_name(&self) -> &'static str;
}
