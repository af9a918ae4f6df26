//! Endpoint specification parsing
//!
//! An endpoint is configured on the command line as one string:
//!
//! ```text
//! <mountPoint>:<kind>=<argument>
//! ```
//!
//! e.g. `/api:proxy=http://127.0.0.1:8080`, `/:file=./dist/`,
//! `404:404=./dist/index.html`. Parsing splits on the *first* `:` and the
//! *first* `=` only, so arguments may freely contain both characters (URLs
//! usually do).

mod error;

pub use error::ConfigError;

/// Which handler variant an endpoint resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationKind {
    /// Reverse proxy to an upstream origin (`proxy`)
    Proxy,
    /// Static files served from a directory (`file`)
    StaticFile,
    /// Process-wide custom not-found page (`404`)
    NotFoundFile,
}

/// A parsed, not yet resolved endpoint. Immutable after parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSpec {
    /// URL path prefix, or the literal `404` for the fallback sentinel
    pub mount_point: String,
    pub kind: DestinationKind,
    /// Destination argument: URL for proxy, directory for file, file for 404
    pub argument: String,
}

/// Parse a single raw endpoint string.
///
/// Pure and total over the grammar above; any deviation is a `ConfigError`.
pub fn parse(raw: &str) -> Result<EndpointSpec, ConfigError> {
    let (mount_point, rest) = raw
        .split_once(':')
        .ok_or_else(|| ConfigError::MissingColon(raw.to_string()))?;

    let (kind, argument) = rest
        .split_once('=')
        .ok_or_else(|| ConfigError::MissingEquals(raw.to_string()))?;

    let kind = match kind {
        "proxy" => DestinationKind::Proxy,
        "file" => DestinationKind::StaticFile,
        "404" => DestinationKind::NotFoundFile,
        other => return Err(ConfigError::UnknownDestinationKind(other.to_string())),
    };

    Ok(EndpointSpec {
        mount_point: mount_point.to_string(),
        kind,
        argument: argument.to_string(),
    })
}
