//! Amazon EC2 address lookups

use crate::context::AwsContext;
use crate::error::sdk_error;
use async_trait::async_trait;
use std::net::IpAddr;
use taskdns_core::traits::IpSource;
use taskdns_core::{Error, Result};
use tracing::debug;

const SERVICE: &str = "ec2";

/// EC2-backed [`IpSource`]
#[derive(Debug, Clone)]
pub struct Ec2IpSource {
    client: aws_sdk_ec2::Client,
}

impl Ec2IpSource {
    pub fn new(client: aws_sdk_ec2::Client) -> Self {
        Self { client }
    }

    pub fn from_context(ctx: &AwsContext) -> Self {
        Self::new(ctx.ec2_client())
    }
}

#[async_trait]
impl IpSource for Ec2IpSource {
    /// Public IPv4 from the ENI's association
    async fn network_interface_public_ip(
        &self,
        network_interface_id: &str,
    ) -> Result<Option<IpAddr>> {
        let output = self
            .client
            .describe_network_interfaces()
            .network_interface_ids(network_interface_id)
            .send()
            .await
            .map_err(|e| sdk_error(SERVICE, "DescribeNetworkInterfaces", e))?;

        let public_ip = output
            .network_interfaces()
            .iter()
            .filter_map(|eni| eni.association())
            .find_map(|assoc| assoc.public_ip());

        debug!(network_interface_id, public_ip = ?public_ip, "Described network interface");
        public_ip.map(parse_ip).transpose()
    }

    /// Public IPv4 of the instance
    async fn instance_public_ip(&self, instance_id: &str) -> Result<Option<IpAddr>> {
        let output = self
            .client
            .describe_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .map_err(|e| sdk_error(SERVICE, "DescribeInstances", e))?;

        let public_ip = output
            .reservations()
            .iter()
            .flat_map(|r| r.instances())
            .find_map(|i| i.public_ip_address());

        debug!(instance_id, public_ip = ?public_ip, "Described instance");
        public_ip.map(parse_ip).transpose()
    }

    fn source_name(&self) -> &'static str {
        "ec2"
    }
}

fn parse_ip(value: &str) -> Result<IpAddr> {
    value
        .parse()
        .map_err(|e| Error::provider(SERVICE, format!("Invalid IP in response '{}': {}", value, e)))
}
