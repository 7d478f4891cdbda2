// # Task State Change Replay Tool
//
// Runs the handler against real AWS APIs using an event stored on disk.
// Useful for checking cluster tags, IAM permissions and record naming
// before wiring the function to EventBridge.
//
// ## Usage
//
// ```bash
// # Dry-run mode (default - safe): lookups are real, the upsert is logged
// cargo run -p taskdns-demos --bin replay_event -- demos/events/fargate-task-running.json
//
// # Live mode (makes actual changes!)
// TASKDNS_MODE=live \
// cargo run -p taskdns-demos --bin replay_event -- demos/events/fargate-task-running.json
// ```
//
// The file may hold a full EventBridge envelope or only its `detail`
// object; a bare detail is wrapped in an envelope stamped with the current
// time.
//
// ## Environment Variables
//
// Optional:
// - `TASKDNS_MODE`: "dry-run" or "live" (default: dry-run)
// - `TASKDNS_DOMAIN_TAG`: Cluster tag holding the domain (default: domain)
// - `TASKDNS_HOSTED_ZONE_TAG`: Cluster tag holding the zone id (default: hostedZoneId)
// - `TASKDNS_RECORD_TTL`: Record TTL (default: 180)
// - `TASKDNS_REQUIRE_RUNNING`: Only publish RUNNING tasks (default: true)
// - `AWS_REGION` / `AWS_PROFILE`: Standard SDK settings

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde_json::{Value, json};
use std::env;
use taskdns_aws::{AwsContext, Ec2IpSource, EcsTaskDirectory, Route53Provider};
use taskdns_core::event::parse_event;
use taskdns_core::{HandlerConfig, HandlerOutcome, TaskDnsEngine, TaskStateChangeEvent};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("=== taskdns: Task State Change Replay ===");

    let path = env::args()
        .nth(1)
        .context("usage: replay_event <event.json>")?;

    let mode = env::var("TASKDNS_MODE").unwrap_or_else(|_| "dry-run".to_string());
    let dry_run = !mode.eq_ignore_ascii_case("live");

    if dry_run {
        tracing::warn!("Running in DRY-RUN mode - no changes will be made");
    } else {
        tracing::warn!("Running in LIVE mode - will make actual DNS changes!");
    }

    let config = HandlerConfig::from_env()?;
    tracing::info!(
        "  Tags: {} / {}, ttl {}, require running: {}",
        config.tags.domain,
        config.tags.hosted_zone_id,
        config.record_ttl,
        config.require_running
    );

    tracing::info!("\n--- Step 1: Loading Event ---");
    let body = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;
    let event = load_event(&body)?;

    let Some(task) = event.detail.as_ref() else {
        anyhow::bail!("{} has no task detail", path);
    };
    tracing::info!("  Task: {}", task.task_arn);
    tracing::info!("  Cluster: {}", task.cluster_arn);
    tracing::info!("  Group: {}", task.group.as_deref().unwrap_or("(none)"));
    tracing::info!("  Launch type: {:?}", task.launch_kind());
    tracing::info!("  Last status: {}", task.last_status.as_deref().unwrap_or("(none)"));

    tracing::info!("\n--- Step 2: Building Engine ---");
    let aws = AwsContext::from_env().await;
    tracing::info!("  Region: {}", aws.region().unwrap_or("(unset)"));

    let engine = TaskDnsEngine::new(
        Box::new(EcsTaskDirectory::from_context(&aws)),
        Box::new(Ec2IpSource::from_context(&aws)),
        Box::new(Route53Provider::from_context(&aws, dry_run)),
        config,
    )?;

    tracing::info!("\n--- Step 3: Handling Event ---");
    match engine.handle(&event).await {
        Ok(outcome) => {
            match &outcome {
                HandlerOutcome::Upserted {
                    hosted_zone_id,
                    record,
                    ..
                } => {
                    tracing::info!("✓ Record upserted in zone {}", hosted_zone_id);
                    tracing::info!("  {} {} {} (ttl {})", record.name, record.record_type, record.value, record.ttl);
                }
                HandlerOutcome::Skipped { reason, .. } => {
                    tracing::info!("⚠ Event skipped: {}", reason);
                }
            }
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Err(e) => {
            tracing::error!("✗ Handler failed: {}", e);
            tracing::error!("Error details: {:?}", e);
            std::process::exit(1);
        }
    }

    if dry_run {
        tracing::info!("\n=== DRY-RUN COMPLETE ===");
        tracing::info!("No changes were made to DNS records.");
        tracing::info!("To make actual changes, set TASKDNS_MODE=live");
    }

    Ok(())
}

/// Parse an envelope, or wrap a bare task detail in one
fn load_event(body: &str) -> Result<TaskStateChangeEvent> {
    let value: Value = serde_json::from_str(body).context("event file is not JSON")?;

    if value.get("detail").is_some() {
        return Ok(parse_event(body)?);
    }

    let resources: Vec<Value> = value.get("taskArn").cloned().into_iter().collect();
    let envelope = json!({
        "version": "0",
        "detail-type": "ECS Task State Change",
        "source": "aws.ecs",
        "time": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        "resources": resources,
        "detail": value,
    });
    Ok(serde_json::from_value(envelope)?)
}
