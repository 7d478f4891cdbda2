//! Test doubles and common utilities for handler contract tests
//!
//! The doubles record every call so tests can assert which remote lookups
//! happened, in what order, and that nothing ran after an early return.

#![allow(dead_code)]

use serde_json::json;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use taskdns_core::error::{Error, Result};
use taskdns_core::traits::{DnsProvider, IpSource, TaskDirectory, UpdateResult};
use taskdns_core::{HandlerConfig, RecordChange, TagMap, TaskDnsEngine, TaskStateChangeEvent};

pub const CLUSTER_ARN: &str = "arn:aws:ecs:eu-west-1:111122223333:cluster/games";
pub const TASK_ARN: &str = "arn:aws:ecs:eu-west-1:111122223333:task/games/0f1e2d3c";
pub const CONTAINER_INSTANCE_ARN: &str =
    "arn:aws:ecs:eu-west-1:111122223333:container-instance/games/ci-42";
pub const ENI_ID: &str = "eni-0abc1234";
pub const INSTANCE_ID: &str = "i-0123456789abcdef0";
pub const ZONE_ID: &str = "Z0123456789ABC";
pub const DOMAIN: &str = "play.example.com";

/// Ordered log of remote calls shared by all doubles
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn record(&self, call: impl Into<String>) {
        self.0.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// A TaskDirectory backed by fixed tags and container instances
pub struct MockTaskDirectory {
    log: CallLog,
    tags: HashMap<String, TagMap>,
    container_instances: HashMap<String, String>,
    fail_with: Option<fn() -> Error>,
}

impl MockTaskDirectory {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            tags: HashMap::new(),
            container_instances: HashMap::new(),
            fail_with: None,
        }
    }

    /// Cluster tagged with the standard domain and zone
    pub fn tagged(log: CallLog) -> Self {
        Self::new(log).with_tags(
            CLUSTER_ARN,
            TagMap::from_pairs([("domain", DOMAIN), ("hostedZoneId", ZONE_ID)]),
        )
    }

    pub fn with_tags(mut self, arn: &str, tags: TagMap) -> Self {
        self.tags.insert(arn.to_string(), tags);
        self
    }

    pub fn with_container_instance(mut self, arn: &str, instance_id: &str) -> Self {
        self.container_instances
            .insert(arn.to_string(), instance_id.to_string());
        self
    }

    pub fn failing(mut self, error: fn() -> Error) -> Self {
        self.fail_with = Some(error);
        self
    }
}

#[async_trait::async_trait]
impl TaskDirectory for MockTaskDirectory {
    async fn list_tags(&self, resource_arn: &str) -> Result<TagMap> {
        self.log.record(format!("list_tags:{}", resource_arn));
        if let Some(error) = self.fail_with {
            return Err(error());
        }
        Ok(self.tags.get(resource_arn).cloned().unwrap_or_default())
    }

    async fn container_instance_ec2_id(
        &self,
        cluster_arn: &str,
        container_instance_arn: &str,
    ) -> Result<Option<String>> {
        self.log.record(format!(
            "container_instance:{}:{}",
            cluster_arn, container_instance_arn
        ));
        Ok(self.container_instances.get(container_instance_arn).cloned())
    }

    fn directory_name(&self) -> &'static str {
        "mock-directory"
    }
}

/// An IpSource with fixed ENI and instance addresses
pub struct MockIpSource {
    log: CallLog,
    interfaces: HashMap<String, IpAddr>,
    instances: HashMap<String, IpAddr>,
    fail_with: Option<fn() -> Error>,
}

impl MockIpSource {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            interfaces: HashMap::new(),
            instances: HashMap::new(),
            fail_with: None,
        }
    }

    pub fn with_interface(mut self, eni_id: &str, ip: IpAddr) -> Self {
        self.interfaces.insert(eni_id.to_string(), ip);
        self
    }

    pub fn with_instance(mut self, instance_id: &str, ip: IpAddr) -> Self {
        self.instances.insert(instance_id.to_string(), ip);
        self
    }

    pub fn failing(mut self, error: fn() -> Error) -> Self {
        self.fail_with = Some(error);
        self
    }
}

#[async_trait::async_trait]
impl IpSource for MockIpSource {
    async fn network_interface_public_ip(&self, network_interface_id: &str) -> Result<Option<IpAddr>> {
        self.log.record(format!("eni:{}", network_interface_id));
        if let Some(error) = self.fail_with {
            return Err(error());
        }
        Ok(self.interfaces.get(network_interface_id).copied())
    }

    async fn instance_public_ip(&self, instance_id: &str) -> Result<Option<IpAddr>> {
        self.log.record(format!("instance:{}", instance_id));
        if let Some(error) = self.fail_with {
            return Err(error());
        }
        Ok(self.instances.get(instance_id).copied())
    }

    fn source_name(&self) -> &'static str {
        "mock-ip"
    }
}

/// A DnsProvider that records submitted changes
pub struct MockDnsProvider {
    log: CallLog,
    changes: Arc<Mutex<Vec<(String, RecordChange)>>>,
    fail_with: Option<fn() -> Error>,
    dry_run: bool,
}

impl MockDnsProvider {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            changes: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
            dry_run: false,
        }
    }

    /// A provider sharing the change list with `other`
    pub fn sharing_changes_with(other: &Self) -> Self {
        Self {
            log: other.log.clone(),
            changes: Arc::clone(&other.changes),
            fail_with: other.fail_with,
            dry_run: other.dry_run,
        }
    }

    pub fn failing(mut self, error: fn() -> Error) -> Self {
        self.fail_with = Some(error);
        self
    }

    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Submitted (zone, change) pairs
    pub fn changes(&self) -> Vec<(String, RecordChange)> {
        self.changes.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn upsert_record(&self, hosted_zone_id: &str, change: &RecordChange) -> Result<UpdateResult> {
        self.log.record(format!("upsert:{}:{}", hosted_zone_id, change.name));
        if let Some(error) = self.fail_with {
            return Err(error());
        }
        if self.dry_run {
            return Ok(UpdateResult::DryRun);
        }
        self.changes
            .lock()
            .unwrap()
            .push((hosted_zone_id.to_string(), change.clone()));
        Ok(UpdateResult::Submitted {
            change_id: Some("/change/C0001".to_string()),
        })
    }

    fn supports_record(&self, record_name: &str) -> bool {
        record_name.len() <= 253
    }

    fn provider_name(&self) -> &'static str {
        "mock-dns"
    }
}

/// Wire the doubles into an engine with default configuration
pub fn engine(
    directory: MockTaskDirectory,
    ip_source: MockIpSource,
    provider: &MockDnsProvider,
) -> TaskDnsEngine {
    engine_with_config(directory, ip_source, provider, HandlerConfig::default())
}

pub fn engine_with_config(
    directory: MockTaskDirectory,
    ip_source: MockIpSource,
    provider: &MockDnsProvider,
    config: HandlerConfig,
) -> TaskDnsEngine {
    TaskDnsEngine::new(
        Box::new(directory),
        Box::new(ip_source),
        Box::new(MockDnsProvider::sharing_changes_with(provider)),
        config,
    )
    .expect("engine construction succeeds")
}

/// EventBridge envelope around a task detail
pub fn envelope(detail: serde_json::Value) -> TaskStateChangeEvent {
    serde_json::from_value(json!({
        "version": "0",
        "id": "6a7e8feb-b491-4cf7-a9f1-bf3703467718",
        "detail-type": "ECS Task State Change",
        "source": "aws.ecs",
        "account": "111122223333",
        "time": "2024-05-01T12:00:00Z",
        "region": "eu-west-1",
        "resources": [TASK_ARN],
        "detail": detail
    }))
    .expect("valid envelope")
}

/// Running Fargate task in `service:minecraft` with one ENI
pub fn fargate_task() -> serde_json::Value {
    json!({
        "clusterArn": CLUSTER_ARN,
        "taskArn": TASK_ARN,
        "group": "service:minecraft",
        "launchType": "FARGATE",
        "lastStatus": "RUNNING",
        "desiredStatus": "RUNNING",
        "attachments": [{
            "id": "a1b2",
            "type": "eni",
            "status": "ATTACHED",
            "details": [
                { "name": "subnetId", "value": "subnet-0aa" },
                { "name": "networkInterfaceId", "value": ENI_ID },
                { "name": "privateIPv4Address", "value": "10.0.1.7" }
            ]
        }]
    })
}

/// Running EC2 task in `service:web` on a container instance
pub fn ec2_task() -> serde_json::Value {
    json!({
        "clusterArn": CLUSTER_ARN,
        "taskArn": TASK_ARN,
        "containerInstanceArn": CONTAINER_INSTANCE_ARN,
        "group": "service:web",
        "launchType": "EC2",
        "lastStatus": "RUNNING",
        "desiredStatus": "RUNNING",
        "attachments": []
    })
}
