// # Route 53 DNS Provider
//
// Upserts one A/AAAA record per call with `ChangeResourceRecordSets`.
//
// ## Trust Level: Untrusted (DNS Provider)
//
// - ✅ Makes exactly one API call per upsert
// - ✅ Full error propagation (a failed upsert fails the invocation)
// - ✅ Dry-run mode logs the change batch instead of sending it
// - ❌ NO retry or backoff
// - ❌ NO read-before-write; UPSERT is already idempotent
// - ❌ NO zone discovery; the zone id comes from the cluster tags
//
// ## API Reference
//
// ```http
// POST /2013-04-01/hostedzone/{Id}/rrset
// <ChangeBatch>
//   <Changes><Change>
//     <Action>UPSERT</Action>
//     <ResourceRecordSet>
//       <Name>web.example.com</Name><Type>A</Type><TTL>180</TTL>
//       <ResourceRecords><ResourceRecord><Value>203.0.113.7</Value></ResourceRecord></ResourceRecords>
//     </ResourceRecordSet>
//   </Change></Changes>
// </ChangeBatch>
// ```

use crate::context::AwsContext;
use crate::error::sdk_error;
use async_trait::async_trait;
use aws_sdk_route53::types::{
    Change, ChangeAction, ChangeBatch, ResourceRecord, ResourceRecordSet, RrType,
};
use taskdns_core::traits::{DnsProvider, UpdateResult};
use taskdns_core::{Error, RecordChange, RecordType, Result};

const SERVICE: &str = "route53";

/// Longest DNS name Route 53 accepts, without the trailing dot
const MAX_NAME_LEN: usize = 253;

/// Longest single label
const MAX_LABEL_LEN: usize = 63;

/// Route 53 DNS provider
///
/// # Dry-Run Mode
///
/// When `dry_run` is true the provider builds the full change batch, logs
/// it, and returns [`UpdateResult::DryRun`] without calling Route 53.
pub struct Route53Provider {
    client: aws_sdk_route53::Client,

    /// Dry-run mode: if true, log the change instead of submitting it
    dry_run: bool,
}

impl std::fmt::Debug for Route53Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route53Provider")
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

impl Route53Provider {
    /// Provider over `client`; with `dry_run` set, changes are only logged
    pub fn new(client: aws_sdk_route53::Client, dry_run: bool) -> Self {
        Self { client, dry_run }
    }

    pub fn from_context(ctx: &AwsContext, dry_run: bool) -> Self {
        Self::new(ctx.route53_client(), dry_run)
    }
}

#[async_trait]
impl DnsProvider for Route53Provider {
    async fn upsert_record(
        &self,
        hosted_zone_id: &str,
        change: &RecordChange,
    ) -> Result<UpdateResult> {
        let batch = change_batch(change)?;

        tracing::info!(
            "Upserting Route 53 record: {} -> {} ({}) [mode: {}]",
            change.name,
            change.value,
            change.record_type,
            if self.dry_run { "DRY-RUN" } else { "LIVE" }
        );

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send ChangeResourceRecordSets to zone {} with payload: {}",
                hosted_zone_id,
                serde_json::json!({
                    "Action": "UPSERT",
                    "Name": change.name,
                    "Type": change.record_type.as_str(),
                    "TTL": change.ttl,
                    "Value": change.value.to_string(),
                })
            );
            return Ok(UpdateResult::DryRun);
        }

        let output = self
            .client
            .change_resource_record_sets()
            .hosted_zone_id(hosted_zone_id)
            .change_batch(batch)
            .send()
            .await
            .map_err(|e| sdk_error(SERVICE, "ChangeResourceRecordSets", e))?;

        let change_id = output.change_info().map(|info| info.id().to_string());
        tracing::info!(
            change_id = ?change_id,
            "Route 53 change submitted: {} -> {}",
            change.name,
            change.value
        );

        Ok(UpdateResult::Submitted { change_id })
    }

    fn supports_record(&self, record_name: &str) -> bool {
        valid_record_name(record_name)
    }

    fn provider_name(&self) -> &'static str {
        "route53"
    }
}

fn rr_type(record_type: RecordType) -> RrType {
    match record_type {
        RecordType::A => RrType::A,
        RecordType::Aaaa => RrType::Aaaa,
    }
}

/// A single-UPSERT change batch for `change`
fn change_batch(change: &RecordChange) -> Result<ChangeBatch> {
    let record = ResourceRecord::builder()
        .value(change.value.to_string())
        .build()
        .map_err(build_error)?;

    let record_set = ResourceRecordSet::builder()
        .name(change.name.as_str())
        .r#type(rr_type(change.record_type))
        .ttl(i64::from(change.ttl))
        .resource_records(record)
        .build()
        .map_err(build_error)?;

    let upsert = Change::builder()
        .action(ChangeAction::Upsert)
        .resource_record_set(record_set)
        .build()
        .map_err(build_error)?;

    ChangeBatch::builder()
        .comment(format!("taskdns: {} {}", change.record_type, change.name))
        .changes(upsert)
        .build()
        .map_err(build_error)
}

fn build_error(e: aws_sdk_route53::error::BuildError) -> Error {
    Error::invalid_input(format!("Invalid Route 53 change: {}", e))
}

/// Name length and label checks Route 53 enforces
fn valid_record_name(name: &str) -> bool {
    let name = name.trim_end_matches('.');
    !name.is_empty()
        && name.contains('.')
        && name.len() <= MAX_NAME_LEN
        && name
            .split('.')
            .all(|label| !label.is_empty() && label.len() <= MAX_LABEL_LEN)
}
