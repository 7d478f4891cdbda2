// # DNS Provider Trait
//
// Defines the interface for upserting DNS records via provider APIs.
//
// ## Implementations
//
// - Route 53: `taskdns-aws` crate (`Route53Provider`)
//
// ## Usage
//
// ```rust,ignore
// use taskdns_core::{DnsProvider, RecordChange};
//
// let change = RecordChange::upsert("web.example.com", ip, 180);
// provider.upsert_record("Z0123456789ABC", &change).await?;
// ```

use crate::record::RecordChange;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result of an upsert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UpdateResult {
    /// The change was accepted by the provider
    Submitted {
        /// Provider change id, when the provider returns one
        change_id: Option<String>,
    },
    /// Dry-run mode: the change was logged, not sent
    DryRun,
}

/// Trait for DNS provider implementations
///
/// # Trust Level: Untrusted
///
/// ## Allowed Capabilities
/// - ✅ Perform API calls to their endpoints only
/// - ✅ Parse provider-specific responses
/// - ✅ Return success or failure
///
/// ## Forbidden Capabilities
/// - ❌ Retry or back off (a failed upsert fails the invocation)
/// - ❌ Look up addresses or tags (owned by the engine)
/// - ❌ Decide whether an update is needed (owned by the engine)
/// - ❌ Spawn tasks
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Create or replace a record in a hosted zone
    ///
    /// # Idempotency
    ///
    /// UPSERT semantics: submitting the same change twice leaves the zone
    /// in the same state as submitting it once.
    ///
    /// # Parameters
    ///
    /// - `hosted_zone_id`: Zone holding the record
    /// - `change`: The record to write
    async fn upsert_record(
        &self,
        hosted_zone_id: &str,
        change: &RecordChange,
    ) -> Result<UpdateResult, crate::Error>;

    /// Check if this provider can hold the given record name
    fn supports_record(&self, record_name: &str) -> bool;

    /// Provider name (for logging)
    fn provider_name(&self) -> &'static str;
}
