//! AWS error classification
//!
//! Maps SDK failures onto [`taskdns_core::Error`] using the service error
//! code from `ProvideErrorMetadata`, never the Debug text.

use aws_sdk_ecs::error::{DisplayErrorContext, ProvideErrorMetadata};
use taskdns_core::Error;

/// Known AWS error codes for throttling
const THROTTLING_CODES: &[&str] = &[
    "Throttling",
    "ThrottlingException",
    "RequestLimitExceeded",
    "TooManyRequestsException",
    "PriorRequestNotComplete",
];

/// Known AWS error codes for missing or rejected credentials
const AUTH_CODES: &[&str] = &[
    "AccessDenied",
    "AccessDeniedException",
    "UnauthorizedOperation",
    "UnrecognizedClientException",
    "InvalidClientTokenId",
    "ExpiredToken",
    "ExpiredTokenException",
];

/// Known AWS error codes for "not found" conditions
const NOT_FOUND_CODES: &[&str] = &[
    "ClusterNotFoundException",
    "InvalidNetworkInterfaceID.NotFound",
    "InvalidInstanceID.NotFound",
    "NoSuchHostedZone",
];

/// Known AWS error codes for requests the service rejects as malformed
const INVALID_INPUT_CODES: &[&str] = &[
    "InvalidChangeBatch",
    "InvalidInput",
    "InvalidParameterException",
    "InvalidNetworkInterfaceID.Malformed",
    "InvalidInstanceID.Malformed",
];

/// Classify an AWS error from its code and message
pub fn classify(service: &str, code: Option<&str>, message: Option<&str>) -> Error {
    let message = message.unwrap_or("Unknown error");

    match code {
        Some(c) if THROTTLING_CODES.contains(&c) => {
            Error::rate_limited(format!("{}: {} ({})", service, message, c))
        }
        Some(c) if AUTH_CODES.contains(&c) => {
            Error::auth(format!("{}: {} ({})", service, message, c))
        }
        Some(c) if NOT_FOUND_CODES.contains(&c) => {
            Error::not_found(format!("{}: {} ({})", service, message, c))
        }
        Some(c) if INVALID_INPUT_CODES.contains(&c) => {
            Error::invalid_input(format!("{}: {} ({})", service, message, c))
        }
        Some(c) => Error::provider(service, format!("{} ({})", message, c)),
        None => Error::provider(service, message),
    }
}

/// Classify a failed SDK call
///
/// Errors without a service code (timeouts, dispatch failures) become
/// `Error::Provider` carrying the full error chain.
pub fn sdk_error<E>(service: &str, operation: &str, err: E) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    match err.code() {
        Some(code) => {
            let message = format!(
                "{} failed: {}",
                operation,
                err.message().unwrap_or("no message")
            );
            classify(service, Some(code), Some(&message))
        }
        None => Error::provider(
            service,
            format!("{} failed: {}", operation, DisplayErrorContext(&err)),
        ),
    }
}
