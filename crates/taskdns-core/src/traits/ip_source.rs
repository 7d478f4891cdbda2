// # IP Source Trait
//
// Defines the interface for resolving the public address of a task.
//
// ## Implementations
//
// - Amazon EC2: `taskdns-aws` crate (`Ec2IpSource`)
//
// Two lookups exist because the address lives in different places depending
// on the launch type: Fargate tasks own their ENI, EC2 tasks share the
// address of their host instance.

use async_trait::async_trait;
use std::net::IpAddr;

/// Trait for public address lookups
///
/// Implementations must be thread-safe and make a single remote call per
/// method. A resource without a public address is `Ok(None)`, not an error.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Public address associated with a network interface
    ///
    /// # Parameters
    ///
    /// - `network_interface_id`: ENI id, e.g. `eni-0abc`
    async fn network_interface_public_ip(
        &self,
        network_interface_id: &str,
    ) -> Result<Option<IpAddr>, crate::Error>;

    /// Public address of a compute instance
    ///
    /// # Parameters
    ///
    /// - `instance_id`: Instance id, e.g. `i-0123`
    async fn instance_public_ip(&self, instance_id: &str) -> Result<Option<IpAddr>, crate::Error>;

    /// Source name (for logging)
    fn source_name(&self) -> &'static str;
}
