//! Core traits for taskdns
//!
//! This module defines the lookup and update seams the engine drives.
//!
//! - [`TaskDirectory`]: Orchestrator lookups (resource tags, container instances)
//! - [`IpSource`]: Public address lookups (network interfaces, instances)
//! - [`DnsProvider`]: Upsert DNS records via provider APIs

pub mod task_directory;
pub mod ip_source;
pub mod dns_provider;

pub use task_directory::TaskDirectory;
pub use ip_source::IpSource;
pub use dns_provider::{DnsProvider, UpdateResult};
