//! Amazon ECS task directory
//!
//! Reads cluster tags and resolves container instances to the EC2 instances
//! backing them.

use crate::context::AwsContext;
use crate::error::sdk_error;
use async_trait::async_trait;
use aws_sdk_ecs::types::Tag;
use taskdns_core::traits::TaskDirectory;
use taskdns_core::{Result, TagMap};
use tracing::{debug, warn};

const SERVICE: &str = "ecs";

/// ECS-backed [`TaskDirectory`]
#[derive(Debug, Clone)]
pub struct EcsTaskDirectory {
    client: aws_sdk_ecs::Client,
}

impl EcsTaskDirectory {
    pub fn new(client: aws_sdk_ecs::Client) -> Self {
        Self { client }
    }

    pub fn from_context(ctx: &AwsContext) -> Self {
        Self::new(ctx.ecs_client())
    }
}

#[async_trait]
impl TaskDirectory for EcsTaskDirectory {
    /// `ListTagsForResource` on the given ARN
    async fn list_tags(&self, resource_arn: &str) -> Result<TagMap> {
        let output = self
            .client
            .list_tags_for_resource()
            .resource_arn(resource_arn)
            .send()
            .await
            .map_err(|e| sdk_error(SERVICE, "ListTagsForResource", e))?;

        Ok(tag_map(output.tags()))
    }

    /// `DescribeContainerInstances` for one container instance
    ///
    /// ECS reports unknown container instances as `failures`, not as an
    /// error; those resolve to `None`.
    async fn container_instance_ec2_id(
        &self,
        cluster_arn: &str,
        container_instance_arn: &str,
    ) -> Result<Option<String>> {
        let output = self
            .client
            .describe_container_instances()
            .cluster(cluster_arn)
            .container_instances(container_instance_arn)
            .send()
            .await
            .map_err(|e| sdk_error(SERVICE, "DescribeContainerInstances", e))?;

        for failure in output.failures() {
            warn!(
                arn = ?failure.arn(),
                reason = ?failure.reason(),
                "Container instance lookup reported a failure"
            );
        }

        let instance_id = output
            .container_instances()
            .iter()
            .find_map(|ci| ci.ec2_instance_id())
            .map(str::to_string);

        debug!(
            container_instance_arn,
            instance_id = ?instance_id,
            "Resolved container instance"
        );
        Ok(instance_id)
    }

    fn directory_name(&self) -> &'static str {
        "ecs"
    }
}

/// Collect SDK tags; tags without a key or value are dropped
fn tag_map(tags: &[Tag]) -> TagMap {
    let mut map = TagMap::new();
    for tag in tags {
        if let (Some(key), Some(value)) = (tag.key(), tag.value()) {
            map.insert(key, value);
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_map_keeps_complete_tags() {
        let tags = vec![
            Tag::builder().key("domain").value("play.example.com").build(),
            Tag::builder().key("hostedZoneId").value("Z0123").build(),
            Tag::builder().key("orphan").build(),
        ];

        let map = tag_map(&tags);

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("domain"), Some("play.example.com"));
        assert_eq!(map.get("hostedZoneId"), Some("Z0123"));
        assert_eq!(map.get("orphan"), None);
    }

    #[test]
    fn empty_tag_list_is_empty_map() {
        assert!(tag_map(&[]).is_empty());
    }

    #[test]
    fn directory_name_is_ecs() {
        let config = aws_sdk_ecs::Config::builder()
            .behavior_version(aws_sdk_ecs::config::BehaviorVersion::latest())
            .region(aws_sdk_ecs::config::Region::from_static("eu-west-1"))
            .build();
        let directory = EcsTaskDirectory::new(aws_sdk_ecs::Client::from_conf(config));

        assert_eq!(directory.directory_name(), "ecs");
    }
}
