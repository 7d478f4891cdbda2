// # taskdns Lambda function
//
// Thin integration layer: all DNS logic lives in taskdns-core.
//
// The function is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging
// 3. Building the AWS clients and the engine once per cold start
// 4. Handing each "ECS Task State Change" event to the engine
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Tags
// - `TASKDNS_DOMAIN_TAG`: Cluster tag holding the domain (default: domain)
// - `TASKDNS_HOSTED_ZONE_TAG`: Cluster tag holding the zone id (default: hostedZoneId)
//
// ### Records
// - `TASKDNS_RECORD_TTL`: Record TTL in seconds (default: 180)
// - `TASKDNS_REQUIRE_RUNNING`: Only publish RUNNING tasks (default: true)
// - `TASKDNS_MODE`: `live` or `dry-run` (default: live)
//
// ### Logging
// - `TASKDNS_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
// - `TASKDNS_LOG_FORMAT`: text or json (default: text)
//
// AWS credentials and region come from the Lambda execution environment.
//
// ## Example
//
// ```bash
// export TASKDNS_RECORD_TTL=60
// export TASKDNS_MODE=dry-run
// cargo lambda watch
// ```

use anyhow::Result;
use lambda_runtime::{LambdaEvent, service_fn};
use std::env;
use std::process::ExitCode;
use taskdns_aws::{AwsContext, Ec2IpSource, EcsTaskDirectory, Route53Provider};
use taskdns_core::{HandlerConfig, HandlerOutcome, TaskDnsEngine, TaskStateChangeEvent};
use tracing::{Instrument, Level, error, info, info_span, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for cold-start failures
#[derive(Debug, Clone, Copy)]
enum TaskDnsExitCode {
    /// Runtime loop ended normally
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected)
    RuntimeError = 2,
}

impl From<TaskDnsExitCode> for ExitCode {
    fn from(code: TaskDnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

/// Application configuration
#[derive(Debug)]
struct Config {
    handler: HandlerConfig,
    dry_run: bool,
    level: Level,
    format: LogFormat,
}

impl Config {
    /// Load and validate configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let handler = HandlerConfig::from_lookup(&lookup)?;

        let mode = lookup("TASKDNS_MODE").unwrap_or_else(|| "live".to_string());
        let dry_run = match mode.to_lowercase().as_str() {
            "live" => false,
            "dry-run" => true,
            _ => anyhow::bail!(
                "TASKDNS_MODE '{}' is not valid. \
                Valid modes: live, dry-run",
                mode
            ),
        };

        let log_level = lookup("TASKDNS_LOG_LEVEL").unwrap_or_else(|| "info".to_string());
        let level = match log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => anyhow::bail!(
                "TASKDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                log_level
            ),
        };

        let log_format = lookup("TASKDNS_LOG_FORMAT").unwrap_or_else(|| "text".to_string());
        let format = match log_format.to_lowercase().as_str() {
            "text" => LogFormat::Text,
            "json" => LogFormat::Json,
            _ => anyhow::bail!(
                "TASKDNS_LOG_FORMAT '{}' is not valid. \
                Valid formats: text, json",
                log_format
            ),
        };

        Ok(Self {
            handler,
            dry_run,
            level,
            format,
        })
    }
}

/// Install the global subscriber
///
/// CloudWatch stamps every line on ingestion, so timestamps and ANSI colours
/// are left out.
fn init_tracing(level: Level, format: LogFormat) -> Result<()> {
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_ansi(false)
        .without_time();

    match format {
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish())?,
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish())?,
    }
    Ok(())
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration validation error: {}", e);
            return TaskDnsExitCode::ConfigError.into();
        }
    };

    if let Err(e) = init_tracing(config.level, config.format) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return TaskDnsExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return TaskDnsExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async move {
        if let Err(e) = run_function(config.handler, config.dry_run).await {
            error!("Function error: {}", e);
            TaskDnsExitCode::RuntimeError
        } else {
            TaskDnsExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Build the engine and serve events until the runtime stops
async fn run_function(handler_config: HandlerConfig, dry_run: bool) -> Result<()> {
    let aws = AwsContext::from_env().await;
    info!(region = ?aws.region(), "Loaded AWS configuration");

    if dry_run {
        warn!("Route 53 provider running in DRY-RUN mode - no changes will be made");
    }

    info!(
        domain_tag = %handler_config.tags.domain,
        hosted_zone_tag = %handler_config.tags.hosted_zone_id,
        record_ttl = handler_config.record_ttl,
        require_running = handler_config.require_running,
        "Configuration loaded"
    );

    let engine = TaskDnsEngine::new(
        Box::new(EcsTaskDirectory::from_context(&aws)),
        Box::new(Ec2IpSource::from_context(&aws)),
        Box::new(Route53Provider::from_context(&aws, dry_run)),
        handler_config,
    )?;

    info!("Starting taskdns function");

    let engine = &engine;
    lambda_runtime::run(service_fn(move |event| async move {
        handle_event(engine, event).await
    }))
    .await
    .map_err(|e| anyhow::anyhow!("Lambda runtime error: {}", e))
}

/// Handle one invocation
async fn handle_event(
    engine: &TaskDnsEngine,
    event: LambdaEvent<TaskStateChangeEvent>,
) -> Result<HandlerOutcome, lambda_runtime::Error> {
    let span = info_span!("invocation", request_id = %event.context.request_id);

    async move {
        match engine.handle(&event.payload).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                if e.is_transient() {
                    warn!("Invocation failed with a transient error: {}", e);
                } else {
                    error!("Invocation failed: {}", e);
                }
                Err(e.into())
            }
        }
    }
    .instrument(span)
    .await
}
