//! ECS task-state-change event model
//!
//! EventBridge delivers task state changes as a CloudWatch event envelope whose
//! `detail` is the ECS task description. Only the fields the handler reads are
//! modelled; everything else in the payload is ignored.

use aws_lambda_events::event::cloudwatch_events::CloudWatchEvent;
use serde::{Deserialize, Serialize};

/// Envelope as delivered to the Lambda function
pub type TaskStateChangeEvent = CloudWatchEvent<TaskStateChange>;

/// Status value ECS reports for a task that is up
pub const STATUS_RUNNING: &str = "RUNNING";

/// Attachment types that carry a task ENI
const ENI_ATTACHMENT_TYPES: &[&str] = &["eni", "ElasticNetworkInterface"];

/// Attachment detail holding the ENI id
const NETWORK_INTERFACE_ID_DETAIL: &str = "networkInterfaceId";

/// The `detail` of an "ECS Task State Change" event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStateChange {
    /// Cluster the task runs in
    pub cluster_arn: String,

    /// The task itself
    pub task_arn: String,

    /// Container instance hosting the task (EC2 launch type only)
    #[serde(default)]
    pub container_instance_arn: Option<String>,

    /// Network attachments (ENIs for awsvpc tasks)
    #[serde(default)]
    pub attachments: Vec<Attachment>,

    /// Task group, e.g. `service:web` or `family:batch`
    #[serde(default)]
    pub group: Option<String>,

    /// `FARGATE`, `EC2`, `EXTERNAL`
    #[serde(default)]
    pub launch_type: Option<String>,

    #[serde(default)]
    pub last_status: Option<String>,

    #[serde(default)]
    pub desired_status: Option<String>,
}

/// A task attachment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default, rename = "type")]
    pub attachment_type: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub details: Vec<KeyValuePair>,
}

/// Name/value pair used by attachment details
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValuePair {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub value: Option<String>,
}

/// How the task is hosted, which decides the address lookup path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchKind {
    /// Task owns an ENI; the address comes from the interface
    Fargate,
    /// Task runs on a container instance; the address comes from the host
    Ec2,
    /// Anything else (EXTERNAL, unknown)
    Other(String),
}

impl TaskStateChange {
    /// Classify the launch type
    ///
    /// Falls back to the shape of the task when `launchType` is absent:
    /// an ENI attachment means Fargate, a container instance means EC2.
    pub fn launch_kind(&self) -> LaunchKind {
        match self.launch_type.as_deref() {
            Some(t) if t.eq_ignore_ascii_case("FARGATE") => LaunchKind::Fargate,
            Some(t) if t.eq_ignore_ascii_case("EC2") => LaunchKind::Ec2,
            Some(other) => LaunchKind::Other(other.to_string()),
            None if self.network_interface_id().is_some() => LaunchKind::Fargate,
            None if self.container_instance_arn.is_some() => LaunchKind::Ec2,
            None => LaunchKind::Other("unknown".to_string()),
        }
    }

    /// ENI id from the first ENI attachment that lists one
    pub fn network_interface_id(&self) -> Option<&str> {
        self.attachments
            .iter()
            .filter(|a| {
                a.attachment_type
                    .as_deref()
                    .is_some_and(|t| ENI_ATTACHMENT_TYPES.contains(&t))
            })
            .flat_map(|a| a.details.iter())
            .find(|d| d.name.as_deref() == Some(NETWORK_INTERFACE_ID_DETAIL))
            .and_then(|d| d.value.as_deref())
            .filter(|v| !v.is_empty())
    }

    /// Whether ECS last reported the task as RUNNING
    pub fn is_running(&self) -> bool {
        self.last_status.as_deref() == Some(STATUS_RUNNING)
    }
}

/// Parse a raw event body (used by tools that replay events from disk)
pub fn parse_event(body: &str) -> crate::Result<TaskStateChangeEvent> {
    Ok(serde_json::from_str(body)?)
}
