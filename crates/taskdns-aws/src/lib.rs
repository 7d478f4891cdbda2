// # AWS adapters for taskdns
//
// This crate implements the taskdns seams against AWS:
//
// - `EcsTaskDirectory`: cluster tags and container instances (Amazon ECS)
// - `Ec2IpSource`: public addresses of ENIs and instances (Amazon EC2)
// - `Route53Provider`: record upserts (Amazon Route 53)
//
// All three are built from one `AwsContext`, loaded once per process.
// Every method makes exactly one SDK call. Nothing here retries, caches or
// spawns tasks; a failed call is classified and returned to the engine.
//
// ## Required IAM permissions
//
// - `ecs:ListTagsForResource`
// - `ecs:DescribeContainerInstances`
// - `ec2:DescribeNetworkInterfaces`
// - `ec2:DescribeInstances`
// - `route53:ChangeResourceRecordSets`

pub mod context;
pub mod ec2;
pub mod ecs;
pub mod error;
pub mod route53;

pub use context::AwsContext;
pub use ec2::Ec2IpSource;
pub use ecs::EcsTaskDirectory;
pub use route53::Route53Provider;
