//! Resource tags and the DNS target they describe
//!
//! The cluster carries two tags: the domain records are published under, and
//! the hosted zone holding that domain.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default tag key for the domain
pub const DEFAULT_DOMAIN_TAG: &str = "domain";

/// Default tag key for the hosted zone id
pub const DEFAULT_HOSTED_ZONE_TAG: &str = "hostedZoneId";

/// Tags fetched for one resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMap(HashMap<String, String>);

impl TagMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from key/value pairs; later duplicates win
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Tag value, `None` when absent or blank
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Which tag keys hold the DNS target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagKeys {
    #[serde(default = "default_domain_tag")]
    pub domain: String,

    #[serde(default = "default_hosted_zone_tag")]
    pub hosted_zone_id: String,
}

impl Default for TagKeys {
    fn default() -> Self {
        Self {
            domain: default_domain_tag(),
            hosted_zone_id: default_hosted_zone_tag(),
        }
    }
}

fn default_domain_tag() -> String {
    DEFAULT_DOMAIN_TAG.to_string()
}

fn default_hosted_zone_tag() -> String {
    DEFAULT_HOSTED_ZONE_TAG.to_string()
}

/// Domain and hosted zone extracted from tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsTarget {
    pub domain: String,
    pub hosted_zone_id: String,
}

impl DnsTarget {
    /// Extract the target, reporting the first missing tag key
    pub fn from_tags(tags: &TagMap, keys: &TagKeys) -> Result<Self, MissingTag> {
        let domain = tags
            .get(&keys.domain)
            .ok_or_else(|| MissingTag(keys.domain.clone()))?;
        let hosted_zone_id = tags
            .get(&keys.hosted_zone_id)
            .ok_or_else(|| MissingTag(keys.hosted_zone_id.clone()))?;

        Ok(Self {
            domain: domain.to_string(),
            hosted_zone_id: normalize_zone_id(hosted_zone_id),
        })
    }
}

/// A required tag key that was absent or blank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingTag(pub String);

/// Accept both `Z123` and the `/hostedzone/Z123` form Route 53 returns
fn normalize_zone_id(raw: &str) -> String {
    raw.trim_start_matches("/hostedzone/").to_string()
}
