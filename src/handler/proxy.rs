//! Reverse proxy handler
//!
//! Forwards requests to an upstream origin. The rewrite rule swaps scheme
//! and host for the upstream's and concatenates the upstream URL's path in
//! front of the request path (concatenation, not joining, so a proxy can be
//! mounted under a sub-path of the upstream). Method, headers, body, and
//! query string pass through unchanged; the upstream's status, headers, and
//! body are relayed back. An unreachable upstream answers 502.

use crate::endpoint::ConfigError;
use crate::http::response;
use crate::logger;
use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::{Request, Response, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

/// Forwards requests to a single upstream origin
#[derive(Clone)]
pub struct ProxyHandler {
    scheme: String,
    authority: String,
    /// Upstream URL path, prepended to every forwarded request path.
    /// Empty when the upstream URL has no path component.
    path_prefix: String,
    client: Client<HttpConnector, Full<Bytes>>,
}

impl std::fmt::Debug for ProxyHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyHandler")
            .field("scheme", &self.scheme)
            .field("authority", &self.authority)
            .field("path_prefix", &self.path_prefix)
            .finish_non_exhaustive()
    }
}

impl ProxyHandler {
    /// The upstream must be an absolute URL: scheme and host are required.
    pub fn new(upstream: &str) -> Result<Self, ConfigError> {
        let uri: Uri = upstream
            .parse()
            .map_err(|e: hyper::http::uri::InvalidUri| ConfigError::InvalidUpstreamUrl {
                url: upstream.to_string(),
                reason: e.to_string(),
            })?;

        let scheme = uri
            .scheme_str()
            .ok_or_else(|| ConfigError::InvalidUpstreamUrl {
                url: upstream.to_string(),
                reason: "missing scheme".to_string(),
            })?
            .to_string();
        let authority = uri
            .authority()
            .ok_or_else(|| ConfigError::InvalidUpstreamUrl {
                url: upstream.to_string(),
                reason: "missing host".to_string(),
            })?
            .to_string();

        // Uri::path() reports "/" for a path-less URL; that must not become
        // a prefix or every forwarded path would gain a double slash.
        let path_prefix = match uri.path() {
            "/" => String::new(),
            path => path.to_string(),
        };

        Ok(Self {
            scheme,
            authority,
            path_prefix,
            client: Client::builder(TokioExecutor::new()).build_http(),
        })
    }

    /// Upstream origin as configured, for the startup registration line
    pub fn upstream(&self) -> String {
        format!("{}://{}{}", self.scheme, self.authority, self.path_prefix)
    }

    /// Build the outbound URI for a request path and query. The matched
    /// mount point is stripped from the path before the prefix is
    /// concatenated, so `/api/foo` mounted at `/api` reaches the upstream
    /// as `/foo`.
    fn outbound_uri(&self, path: &str, query: Option<&str>, mount_point: &str) -> String {
        let suffix = path.strip_prefix(mount_point).unwrap_or(path);
        let mut rewritten = format!("{}{suffix}", self.path_prefix);
        if !rewritten.starts_with('/') {
            rewritten.insert(0, '/');
        }
        let query = query.map(|q| format!("?{q}")).unwrap_or_default();
        format!("{}://{}{rewritten}{query}", self.scheme, self.authority)
    }

    /// Forward a request to the upstream and relay its response.
    pub async fn forward<B>(&self, req: Request<B>, mount_point: &str) -> Response<Full<Bytes>>
    where
        B: Body,
        B::Error: std::fmt::Display,
    {
        let (parts, body) = req.into_parts();

        let uri_string = self.outbound_uri(parts.uri.path(), parts.uri.query(), mount_point);
        let uri: Uri = match uri_string.parse() {
            Ok(u) => u,
            Err(e) => {
                logger::log_error(&format!("rewritten URI '{uri_string}' is invalid: {e}"));
                return response::build_500_response();
            }
        };

        let body_bytes = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                logger::log_error(&format!("unable to read request body: {e}"));
                return response::build_500_response();
            }
        };

        let mut builder = Request::builder().method(parts.method).uri(uri);
        for (name, value) in &parts.headers {
            // Host belongs to the upstream now
            if name != "host" {
                builder = builder.header(name, value);
            }
        }
        builder = builder.header("host", self.authority.clone());

        let outbound = match builder.body(Full::new(body_bytes)) {
            Ok(r) => r,
            Err(e) => {
                logger::log_error(&format!("unable to build proxied request: {e}"));
                return response::build_500_response();
            }
        };

        match self.client.request(outbound).await {
            Ok(upstream_resp) => relay(upstream_resp).await,
            Err(e) => {
                logger::log_warning(&format!("upstream {} unreachable: {e}", self.upstream()));
                response::build_502_response()
            }
        }
    }
}

/// Relay the upstream response verbatim: status, headers, and body bytes.
/// The body is collected into one buffer, so the upstream's
/// `Transfer-Encoding` no longer applies and is dropped.
async fn relay(upstream_resp: Response<hyper::body::Incoming>) -> Response<Full<Bytes>> {
    let (parts, body) = upstream_resp.into_parts();

    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            logger::log_warning(&format!("upstream response body failed: {e}"));
            return response::build_502_response();
        }
    };

    let mut builder = Response::builder().status(parts.status);
    for (name, value) in &parts.headers {
        if name != "transfer-encoding" {
            builder = builder.header(name, value);
        }
    }
    builder.body(Full::new(bytes)).unwrap_or_else(|e| {
        logger::log_error(&format!("unable to relay upstream response: {e}"));
        response::build_502_response()
    })
}
