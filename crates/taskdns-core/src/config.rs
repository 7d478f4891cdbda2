//! Configuration types for the handler
//!
//! [`HandlerConfig::from_env`] reads the same variables for every entry
//! point:
//!
//! - `TASKDNS_DOMAIN_TAG`: Cluster tag holding the domain (default: domain)
//! - `TASKDNS_HOSTED_ZONE_TAG`: Cluster tag holding the zone id (default: hostedZoneId)
//! - `TASKDNS_RECORD_TTL`: Record TTL in seconds (default: 180)
//! - `TASKDNS_REQUIRE_RUNNING`: Only publish RUNNING tasks (default: true)

use crate::error::{Error, Result};
use crate::tags::TagKeys;
use serde::{Deserialize, Serialize};
use std::env;

/// Upper bound for the record TTL (one day)
pub const MAX_RECORD_TTL: u32 = 86_400;

/// Handler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerConfig {
    /// Tag keys holding the DNS target
    #[serde(default)]
    pub tags: TagKeys,

    /// TTL of the upserted record, in seconds
    #[serde(default = "default_record_ttl")]
    pub record_ttl: u32,

    /// Only publish tasks ECS reports as RUNNING
    #[serde(default = "default_require_running")]
    pub require_running: bool,
}

impl HandlerConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            tags: TagKeys::default(),
            record_ttl: default_record_ttl(),
            require_running: default_require_running(),
        }
    }

    pub fn with_record_ttl(mut self, ttl: u32) -> Self {
        self.record_ttl = ttl;
        self
    }

    pub fn with_tag_keys(mut self, tags: TagKeys) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_require_running(mut self, require_running: bool) -> Self {
        self.require_running = require_running;
        self
    }

    /// Load and validate the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load and validate the configuration from any variable source
    ///
    /// Unset variables keep their defaults; set ones must parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::new();

        if let Some(domain) = lookup("TASKDNS_DOMAIN_TAG") {
            config.tags.domain = domain.trim().to_string();
        }
        if let Some(zone) = lookup("TASKDNS_HOSTED_ZONE_TAG") {
            config.tags.hosted_zone_id = zone.trim().to_string();
        }
        if let Some(ttl) = lookup("TASKDNS_RECORD_TTL") {
            config.record_ttl = ttl.trim().parse().map_err(|_| {
                Error::config(format!(
                    "TASKDNS_RECORD_TTL must be a whole number of seconds. Got: {}",
                    ttl
                ))
            })?;
        }
        if let Some(value) = lookup("TASKDNS_REQUIRE_RUNNING") {
            config.require_running = match value.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(Error::config(format!(
                        "TASKDNS_REQUIRE_RUNNING must be true or false. Got: {}",
                        value
                    )));
                }
            };
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.tags.domain.trim().is_empty() {
            return Err(Error::config("Domain tag key cannot be empty"));
        }
        if self.tags.hosted_zone_id.trim().is_empty() {
            return Err(Error::config("Hosted zone tag key cannot be empty"));
        }
        if self.tags.domain == self.tags.hosted_zone_id {
            return Err(Error::config(
                "Domain and hosted zone tag keys must differ",
            ));
        }
        if self.record_ttl == 0 || self.record_ttl > MAX_RECORD_TTL {
            return Err(Error::config(format!(
                "Record TTL must be between 1 and {} seconds. Got: {}",
                MAX_RECORD_TTL, self.record_ttl
            )));
        }
        Ok(())
    }
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn default_record_ttl() -> u32 {
    180
}

fn default_require_running() -> bool {
    true
}
