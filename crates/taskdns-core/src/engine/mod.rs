//! Task DNS engine
//!
//! The TaskDnsEngine turns one task-state-change event into at most one
//! DNS upsert:
//! - Reading the DNS target from the cluster tags
//! - Resolving the task's public address
//! - Upserting `{service}.{domain}` in the tagged hosted zone
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ TaskStateChange  │
//! └──────────────────┘
//!          │
//!          ▼
//! ┌──────────────────┐     ┌───────────────┐     ┌─────────────┐
//! │  TaskDnsEngine   │────▶│ TaskDirectory │────▶│  IpSource   │
//! └──────────────────┘     │ (tags, host)  │     │ (public IP) │
//!          │               └───────────────┘     └─────────────┘
//!          ▼
//! ┌──────────────────┐
//! │   DnsProvider    │
//! │    (upsert)      │
//! └──────────────────┘
//! ```
//!
//! ## Event Flow
//!
//! 1. Skip tasks that are not RUNNING (configurable)
//! 2. Fetch cluster tags, skip if the domain or hosted zone tag is missing
//! 3. Derive the record name from the task group, skip names the provider refuses
//! 4. Resolve the public IP (ENI for Fargate, host instance for EC2)
//! 5. Upsert the record and report the outcome
//!
//! Every step awaits the previous one. Skips are logged and returned as
//! [`HandlerOutcome::Skipped`]; remote failures propagate as errors.

use crate::config::HandlerConfig;
use crate::error::{Error, Result};
use crate::event::{LaunchKind, TaskStateChange, TaskStateChangeEvent};
use crate::record::{self, RecordChange};
use crate::tags::{DnsTarget, MissingTag};
use crate::traits::{DnsProvider, IpSource, TaskDirectory, UpdateResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use tracing::{debug, error, info, warn};

/// What the handler did with an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum HandlerOutcome {
    /// A record was upserted (or logged, in dry-run mode)
    Upserted {
        task_arn: String,
        hosted_zone_id: String,
        record: RecordChange,
        result: UpdateResult,
    },

    /// The event was ignored; nothing was written
    Skipped { task_arn: String, reason: SkipReason },
}

impl HandlerOutcome {
    pub fn is_upserted(&self) -> bool {
        matches!(self, HandlerOutcome::Upserted { .. })
    }

    /// The skip reason, if the event was skipped
    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            HandlerOutcome::Skipped { reason, .. } => Some(reason),
            HandlerOutcome::Upserted { .. } => None,
        }
    }
}

/// Why an event produced no DNS change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// Task is not RUNNING
    NotRunning { last_status: Option<String> },

    /// A required tag is absent on the cluster
    MissingTag { key: String },

    /// The task group yields no service name
    NoServiceName,

    /// Launch type with no known address lookup
    UnsupportedLaunchType { launch_type: String },

    /// Fargate task without an ENI attachment
    NoNetworkInterface,

    /// EC2 task without a container instance reference
    NoContainerInstance,

    /// Container instance did not resolve to an EC2 instance
    NoEc2Instance { container_instance_arn: String },

    /// The resolved resource has no public address
    NoPublicIp { resource_id: String },

    /// Provider refuses the record name
    UnsupportedRecord { name: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotRunning { last_status } => write!(
                f,
                "task is not running (last status: {})",
                last_status.as_deref().unwrap_or("unknown")
            ),
            SkipReason::MissingTag { key } => write!(f, "cluster has no '{}' tag", key),
            SkipReason::NoServiceName => f.write_str("task group has no service name"),
            SkipReason::UnsupportedLaunchType { launch_type } => {
                write!(f, "launch type {} is not supported", launch_type)
            }
            SkipReason::NoNetworkInterface => f.write_str("task has no network interface"),
            SkipReason::NoContainerInstance => f.write_str("task has no container instance"),
            SkipReason::NoEc2Instance {
                container_instance_arn,
            } => write!(f, "no EC2 instance behind {}", container_instance_arn),
            SkipReason::NoPublicIp { resource_id } => {
                write!(f, "{} has no public IP address", resource_id)
            }
            SkipReason::UnsupportedRecord { name } => {
                write!(f, "record {} is not supported by the provider", name)
            }
        }
    }
}

/// Address lookup result: an address, or the reason there is none
type Resolution = std::result::Result<IpAddr, SkipReason>;

/// Task DNS engine
///
/// Holds the three remote seams and the handler configuration. The engine is
/// built once per process and shared read-only across invocations.
pub struct TaskDnsEngine {
    /// Orchestrator lookups
    directory: Box<dyn TaskDirectory>,

    /// Public address lookups
    ip_source: Box<dyn IpSource>,

    /// DNS provider for the upsert
    provider: Box<dyn DnsProvider>,

    config: HandlerConfig,
}

impl TaskDnsEngine {
    /// Create a new engine
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration does not validate.
    pub fn new(
        directory: Box<dyn TaskDirectory>,
        ip_source: Box<dyn IpSource>,
        provider: Box<dyn DnsProvider>,
        config: HandlerConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            directory,
            ip_source,
            provider,
            config,
        })
    }

    /// Handle one EventBridge envelope
    ///
    /// # Errors
    ///
    /// - `Error::InvalidInput` if the envelope carries no task detail
    /// - Any error from the directory, IP source or provider
    pub async fn handle(&self, event: &TaskStateChangeEvent) -> Result<HandlerOutcome> {
        let task = event
            .detail
            .as_ref()
            .ok_or_else(|| Error::invalid_input("event has no task detail"))?;

        debug!(
            event_id = ?event.id,
            detail_type = ?event.detail_type,
            time = %event.time,
            "Received event"
        );

        self.handle_task(task).await
    }

    /// Handle one task description
    pub async fn handle_task(&self, task: &TaskStateChange) -> Result<HandlerOutcome> {
        info!(
            task_arn = %task.task_arn,
            cluster_arn = %task.cluster_arn,
            last_status = ?task.last_status,
            group = ?task.group,
            "Handling task state change"
        );

        if self.config.require_running && !task.is_running() {
            return Ok(self.skip(
                task,
                SkipReason::NotRunning {
                    last_status: task.last_status.clone(),
                },
            ));
        }

        let tags = self
            .directory
            .list_tags(&task.cluster_arn)
            .await
            .inspect_err(|e| {
                error!(
                    directory = self.directory.directory_name(),
                    cluster_arn = %task.cluster_arn,
                    "Failed to fetch cluster tags: {}", e
                )
            })?;
        debug!(count = tags.len(), "Fetched cluster tags");

        let target = match DnsTarget::from_tags(&tags, &self.config.tags) {
            Ok(target) => target,
            Err(MissingTag(key)) => return Ok(self.skip(task, SkipReason::MissingTag { key })),
        };

        let Some(service) = task.group.as_deref().and_then(record::service_name) else {
            return Ok(self.skip(task, SkipReason::NoServiceName));
        };
        let name = record::record_name(service, &target.domain);
        if !self.provider.supports_record(&name) {
            return Ok(self.skip(task, SkipReason::UnsupportedRecord { name }));
        }

        let ip = match self.resolve_public_ip(task).await? {
            Ok(ip) => ip,
            Err(reason) => return Ok(self.skip(task, reason)),
        };

        let change = RecordChange::upsert(name, ip, self.config.record_ttl);
        info!(
            provider = self.provider.provider_name(),
            hosted_zone_id = %target.hosted_zone_id,
            record = %change.name,
            record_type = %change.record_type,
            value = %change.value,
            ttl = change.ttl,
            "Upserting DNS record"
        );

        let result = self
            .provider
            .upsert_record(&target.hosted_zone_id, &change)
            .await
            .inspect_err(|e| error!(record = %change.name, "Failed to upsert DNS record: {}", e))?;

        match &result {
            UpdateResult::Submitted { change_id } => {
                info!(record = %change.name, change_id = ?change_id, "DNS record upserted: {} -> {}", change.name, change.value);
            }
            UpdateResult::DryRun => {
                info!(record = %change.name, "[DRY-RUN] DNS record not changed: {} -> {}", change.name, change.value);
            }
        }

        Ok(HandlerOutcome::Upserted {
            task_arn: task.task_arn.clone(),
            hosted_zone_id: target.hosted_zone_id,
            record: change,
            result,
        })
    }

    /// Resolve the task's public address along the launch-type path
    async fn resolve_public_ip(&self, task: &TaskStateChange) -> Result<Resolution> {
        match task.launch_kind() {
            LaunchKind::Fargate => {
                let Some(eni_id) = task.network_interface_id() else {
                    return Ok(Err(SkipReason::NoNetworkInterface));
                };
                debug!(network_interface_id = eni_id, "Resolving address from ENI");

                let ip = self
                    .ip_source
                    .network_interface_public_ip(eni_id)
                    .await
                    .inspect_err(|e| {
                        error!(
                            source = self.ip_source.source_name(),
                            network_interface_id = eni_id,
                            "Failed to look up network interface: {}", e
                        )
                    })?;
                Ok(ip.ok_or_else(|| SkipReason::NoPublicIp {
                    resource_id: eni_id.to_string(),
                }))
            }
            LaunchKind::Ec2 => {
                let Some(container_instance_arn) = task.container_instance_arn.as_deref() else {
                    return Ok(Err(SkipReason::NoContainerInstance));
                };

                let instance_id = self
                    .directory
                    .container_instance_ec2_id(&task.cluster_arn, container_instance_arn)
                    .await
                    .inspect_err(|e| {
                        error!(
                            directory = self.directory.directory_name(),
                            container_instance_arn,
                            "Failed to look up container instance: {}", e
                        )
                    })?;
                let Some(instance_id) = instance_id else {
                    return Ok(Err(SkipReason::NoEc2Instance {
                        container_instance_arn: container_instance_arn.to_string(),
                    }));
                };
                debug!(instance_id = %instance_id, "Resolving address from host instance");

                let ip = self
                    .ip_source
                    .instance_public_ip(&instance_id)
                    .await
                    .inspect_err(|e| {
                        error!(
                            source = self.ip_source.source_name(),
                            instance_id = %instance_id,
                            "Failed to look up instance: {}", e
                        )
                    })?;
                Ok(ip.ok_or(SkipReason::NoPublicIp {
                    resource_id: instance_id,
                }))
            }
            LaunchKind::Other(launch_type) => {
                Ok(Err(SkipReason::UnsupportedLaunchType { launch_type }))
            }
        }
    }

    /// Log a skip and build the outcome
    fn skip(&self, task: &TaskStateChange, reason: SkipReason) -> HandlerOutcome {
        match reason {
            SkipReason::NotRunning { .. } => {
                debug!(task_arn = %task.task_arn, "Skipping task: {}", reason)
            }
            _ => warn!(task_arn = %task.task_arn, "Skipping task: {}", reason),
        }

        HandlerOutcome::Skipped {
            task_arn: task.task_arn.clone(),
            reason,
        }
    }
}
