// # taskdns-core
//
// Core library for publishing ECS task addresses to DNS.
//
// ## Architecture Overview
//
// One task-state-change event produces at most one DNS upsert:
// - **TaskDirectory**: Trait for container-orchestration lookups (tags, container instances)
// - **IpSource**: Trait for resolving public addresses of network interfaces and instances
// - **DnsProvider**: Trait for upserting DNS records via provider APIs
// - **TaskDnsEngine**: The linear handler that composes the three
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Decision logic lives here, SDK calls live in adapters
// 2. **Single-shot**: Every lookup is awaited in order, nothing runs in the background
// 3. **Early return**: Missing tags or addresses end the invocation with a logged skip
// 4. **Library-First**: The engine can be driven by Lambda, a CLI, or tests

pub mod traits;
pub mod engine;
pub mod config;
pub mod error;
pub mod event;
pub mod record;
pub mod tags;

// Re-export core types for convenience
pub use traits::{DnsProvider, IpSource, TaskDirectory};
pub use engine::{HandlerOutcome, SkipReason, TaskDnsEngine};
pub use config::HandlerConfig;
pub use error::{Error, Result};
pub use event::{TaskStateChange, TaskStateChangeEvent};
pub use record::{RecordChange, RecordType};
pub use tags::{DnsTarget, TagKeys, TagMap};
