//! Contract Test: EC2 task → container instance → host address → DNS upsert
//!
//! Constraints verified:
//! - The container instance is resolved to its EC2 instance
//! - The host instance's public address is published
//! - ENI lookups are not used on this path

mod common;

use common::*;
use std::net::IpAddr;
use taskdns_core::{HandlerOutcome, SkipReason};
use tokio_test::assert_ok;

#[tokio::test]
async fn ec2_task_upserts_host_address() {
    let log = CallLog::default();
    let host_ip = IpAddr::from([198, 51, 100, 77]);

    let provider = MockDnsProvider::new(log.clone());
    let engine = engine(
        MockTaskDirectory::tagged(log.clone())
            .with_container_instance(CONTAINER_INSTANCE_ARN, INSTANCE_ID),
        MockIpSource::new(log.clone()).with_instance(INSTANCE_ID, host_ip),
        &provider,
    );

    let outcome = assert_ok!(engine.handle(&envelope(ec2_task())).await);
    assert!(outcome.is_upserted());

    let changes = provider.changes();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].0, ZONE_ID);
    assert_eq!(changes[0].1.name, "web.play.example.com");
    assert_eq!(changes[0].1.value, host_ip);

    assert_eq!(
        log.calls(),
        vec![
            format!("list_tags:{}", CLUSTER_ARN),
            format!("container_instance:{}:{}", CLUSTER_ARN, CONTAINER_INSTANCE_ARN),
            format!("instance:{}", INSTANCE_ID),
            format!("upsert:{}:web.play.example.com", ZONE_ID),
        ]
    );
}

#[tokio::test]
async fn unknown_container_instance_is_skipped() {
    let log = CallLog::default();
    let provider = MockDnsProvider::new(log.clone());
    let engine = engine(
        MockTaskDirectory::tagged(log.clone()),
        MockIpSource::new(log.clone()),
        &provider,
    );

    let outcome = assert_ok!(engine.handle(&envelope(ec2_task())).await);

    assert_eq!(
        outcome.skip_reason(),
        Some(&SkipReason::NoEc2Instance {
            container_instance_arn: CONTAINER_INSTANCE_ARN.to_string()
        })
    );
    assert!(provider.changes().is_empty());
    assert!(!log.calls().iter().any(|c| c.starts_with("instance:")));
}

#[tokio::test]
async fn host_without_public_address_is_skipped() {
    let log = CallLog::default();
    let provider = MockDnsProvider::new(log.clone());
    let engine = engine(
        MockTaskDirectory::tagged(log.clone())
            .with_container_instance(CONTAINER_INSTANCE_ARN, INSTANCE_ID),
        MockIpSource::new(log.clone()),
        &provider,
    );

    let outcome = assert_ok!(engine.handle(&envelope(ec2_task())).await);

    match outcome {
        HandlerOutcome::Skipped { reason, .. } => assert_eq!(
            reason,
            SkipReason::NoPublicIp {
                resource_id: INSTANCE_ID.to_string()
            }
        ),
        other => panic!("Expected skip, got {:?}", other),
    }
    assert!(provider.changes().is_empty());
}

#[tokio::test]
async fn ec2_task_without_container_instance_is_skipped() {
    let log = CallLog::default();
    let provider = MockDnsProvider::new(log.clone());
    let engine = engine(
        MockTaskDirectory::tagged(log.clone()),
        MockIpSource::new(log.clone()),
        &provider,
    );

    let mut task = ec2_task();
    task.as_object_mut().unwrap().remove("containerInstanceArn");

    let outcome = assert_ok!(engine.handle(&envelope(task)).await);

    assert_eq!(outcome.skip_reason(), Some(&SkipReason::NoContainerInstance));
    assert_eq!(log.calls(), vec![format!("list_tags:{}", CLUSTER_ARN)]);
}
