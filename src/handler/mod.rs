//! Request handler variants
//!
//! One tagged type over the three destination kinds an endpoint can resolve
//! to. Dispatch is an explicit match on the variant; nothing inspects
//! runtime types.

pub mod not_found;
pub mod proxy;
pub mod static_files;

pub use not_found::NotFoundFileHandler;
pub use proxy::ProxyHandler;
pub use static_files::StaticFileHandler;

use crate::endpoint::{ConfigError, DestinationKind, EndpointSpec};

/// A resolved endpoint destination
#[derive(Debug, Clone)]
pub enum Handler {
    Proxy(ProxyHandler),
    StaticFile(StaticFileHandler),
    NotFoundFile(NotFoundFileHandler),
}

impl Handler {
    /// Build the handler for a parsed endpoint spec. Proxy URLs and static
    /// roots are validated here, at startup.
    pub fn from_spec(spec: &EndpointSpec) -> Result<Self, ConfigError> {
        match spec.kind {
            DestinationKind::Proxy => Ok(Self::Proxy(ProxyHandler::new(&spec.argument)?)),
            DestinationKind::StaticFile => {
                Ok(Self::StaticFile(StaticFileHandler::new(&spec.argument)?))
            }
            DestinationKind::NotFoundFile => {
                Ok(Self::NotFoundFile(NotFoundFileHandler::new(&spec.argument)))
            }
        }
    }

    /// Destination description for the startup registration line
    pub fn describe(&self) -> String {
        match self {
            Self::Proxy(p) => format!("proxy {}", p.upstream()),
            Self::StaticFile(s) => format!("file {}", s.root().display()),
            Self::NotFoundFile(n) => format!("404 page {}", n.file_path().display()),
        }
    }
}
