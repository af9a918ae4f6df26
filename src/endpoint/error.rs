//! Startup configuration errors
//!
//! Everything in here is fatal: a `ConfigError` means the process prints the
//! message and exits before serving a single request. Request-time failures
//! are mapped to HTTP responses instead and never appear in this enum.

use thiserror::Error;

/// Errors raised while parsing endpoint specifications and building handlers
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Endpoint string has no `:` separating mount point from destination
    #[error("endpoint '{0}' is missing ':' between mount point and destination")]
    MissingColon(String),

    /// Destination has no `=` separating kind from argument
    #[error("endpoint '{0}' is missing '=' between destination kind and argument")]
    MissingEquals(String),

    /// Destination kind is not one of `proxy`, `file`, `404`
    #[error("unknown destination kind '{0}'")]
    UnknownDestinationKind(String),

    /// Proxy argument does not parse as an absolute URL with scheme and host
    #[error("invalid upstream URL '{url}': {reason}")]
    InvalidUpstreamUrl { url: String, reason: String },

    /// Static root could not be canonicalized (missing, permissions, ...)
    #[error("static root '{path}' is not usable: {source}")]
    StaticRootUnavailable {
        path: String,
        source: std::io::Error,
    },

    /// More than one `404` endpoint was supplied
    #[error("more than one 404 endpoint configured; exactly one fallback is allowed")]
    DuplicateFallback,
}
