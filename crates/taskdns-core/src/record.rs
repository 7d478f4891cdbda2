//! DNS record naming and the upsert directive

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// DNS record type, chosen from the address family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4
    A,
    /// IPv6
    Aaaa,
}

impl RecordType {
    pub fn for_ip(ip: &IpAddr) -> Self {
        match ip {
            IpAddr::V4(_) => RecordType::A,
            IpAddr::V6(_) => RecordType::Aaaa,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single UPSERT directive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordChange {
    pub name: String,
    pub record_type: RecordType,
    pub ttl: u32,
    pub value: IpAddr,
}

impl RecordChange {
    /// Upsert `name` to point at `ip`
    pub fn upsert(name: impl Into<String>, ip: IpAddr, ttl: u32) -> Self {
        Self {
            name: name.into(),
            record_type: RecordType::for_ip(&ip),
            ttl,
            value: ip,
        }
    }
}

/// Service name from a task group
///
/// `service:web` → `web`, `family:batch` → `batch`. A group without a prefix
/// is used as-is.
pub fn service_name(group: &str) -> Option<&str> {
    let name = match group.split_once(':') {
        Some((_, rest)) => rest,
        None => group,
    };
    let name = name.trim();
    (!name.is_empty()).then_some(name)
}

/// `{service}.{domain}`, lowercased, without a trailing dot
pub fn record_name(service: &str, domain: &str) -> String {
    format!(
        "{}.{}",
        service.trim_end_matches('.'),
        domain.trim().trim_end_matches('.')
    )
    .to_ascii_lowercase()
}
