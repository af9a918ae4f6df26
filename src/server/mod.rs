//! Server assembly and request dispatch
//!
//! Construction is two-phase. Phase one parses every endpoint string and
//! builds its handler, failing fast on any configuration error. Phase two
//! resolves the process-wide not-found fallback (at most one `404` endpoint
//! is allowed) and produces the final, immutable endpoint list with that
//! fallback wired into every static file handler. Nothing is mutated after
//! assembly, so requests can be dispatched concurrently without locking.

use crate::endpoint::{self, ConfigError};
use crate::handler::{Handler, NotFoundFileHandler};
use crate::http::response;
use crate::logger;
use crate::routing::{self, Endpoint};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Request, Response};
use std::sync::Arc;

/// Owns the wired endpoint list and the resolved fallback
#[derive(Debug)]
pub struct Server {
    /// Routable endpoints in declaration order; the `404` sentinel is not here
    endpoints: Vec<Endpoint>,
    /// Custom not-found page, shared by the router level and every static handler
    fallback: Option<Arc<NotFoundFileHandler>>,
}

impl Server {
    /// Assemble a server from raw endpoint strings. Any malformed endpoint,
    /// unknown kind, invalid upstream URL, unusable static root, or second
    /// `404` endpoint fails the whole construction.
    pub fn new(raw_endpoints: &[String]) -> Result<Self, ConfigError> {
        let specs = raw_endpoints
            .iter()
            .map(|raw| endpoint::parse(raw))
            .collect::<Result<Vec<_>, _>>()?;

        // Phase one: build every handler
        let mut built = Vec::with_capacity(specs.len());
        for spec in &specs {
            built.push((spec.mount_point.clone(), Handler::from_spec(spec)?));
        }

        // Resolve the single process-wide fallback
        let mut fallback: Option<Arc<NotFoundFileHandler>> = None;
        for (_, handler) in &built {
            if let Handler::NotFoundFile(not_found) = handler {
                if fallback.replace(Arc::new(not_found.clone())).is_some() {
                    return Err(ConfigError::DuplicateFallback);
                }
            }
        }

        // Phase two: wire the fallback and keep only routable endpoints,
        // preserving declaration order
        let mut endpoints = Vec::new();
        for (mount_point, handler) in built {
            let handler = match handler {
                // The 404 sentinel never participates in path routing
                Handler::NotFoundFile(_) => continue,
                Handler::StaticFile(static_files) => match &fallback {
                    Some(page) => Handler::StaticFile(static_files.with_fallback(Arc::clone(page))),
                    None => Handler::StaticFile(static_files),
                },
                proxy => proxy,
            };
            logger::log_endpoint_registered(&mount_point, &handler.describe());
            endpoints.push(Endpoint {
                mount_point,
                handler,
            });
        }

        Ok(Self {
            endpoints,
            fallback,
        })
    }

    /// Dispatch one request. Logs it first, then routes by first matching
    /// mount point; an unmatched path goes to the fallback. Always produces
    /// a response.
    pub async fn handle_request<B>(&self, req: Request<B>) -> Response<Full<Bytes>>
    where
        B: Body,
        B::Error: std::fmt::Display,
    {
        logger::log_request(req.method(), req.uri());

        let path = req.uri().path().to_string();
        let Some(matched) = routing::match_endpoint(&path, &self.endpoints) else {
            return self.not_found().await;
        };

        match &matched.handler {
            Handler::Proxy(proxy) => proxy.forward(req, &matched.mount_point).await,
            Handler::StaticFile(static_files) => static_files.serve(&path).await,
            Handler::NotFoundFile(not_found) => not_found.serve().await,
        }
    }

    /// Router-level not-found: the custom page if configured, else generic 404
    async fn not_found(&self) -> Response<Full<Bytes>> {
        match &self.fallback {
            Some(page) => page.serve().await,
            None => response::build_404_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    fn request(path: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .uri(path)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    async fn body_bytes(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    /// `dist/` with an index page and one asset, plus a 404 endpoint
    /// pointing at the index (SPA-style setup).
    fn dist_fixture() -> (tempfile::TempDir, Vec<String>) {
        let dir = tempfile::tempdir().unwrap();
        let dist = dir.path().join("dist");
        std::fs::create_dir(&dist).unwrap();
        std::fs::write(dist.join("index.html"), "<p>spa</p>").unwrap();
        std::fs::write(dist.join("app.js"), "boot()").unwrap();

        let endpoints = vec![
            format!("/:file={}", dist.display()),
            format!("404:404={}", dist.join("index.html").display()),
        ];
        (dir, endpoints)
    }

    #[test]
    fn test_malformed_endpoint_fails_construction() {
        assert!(matches!(
            Server::new(&["nocolon=x".to_string()]),
            Err(ConfigError::MissingColon(_))
        ));
        assert!(matches!(
            Server::new(&["/x:proxy=not a url".to_string()]),
            Err(ConfigError::InvalidUpstreamUrl { .. })
        ));
        assert!(matches!(
            Server::new(&["/x:file=/nonexistent".to_string()]),
            Err(ConfigError::StaticRootUnavailable { .. })
        ));
    }

    #[test]
    fn test_duplicate_fallback_is_rejected() {
        let err = Server::new(&[
            "404:404=./a.html".to_string(),
            "404:404=./b.html".to_string(),
        ]);
        assert!(matches!(err, Err(ConfigError::DuplicateFallback)));
    }

    #[test]
    fn test_sentinel_is_not_routable() {
        let server = Server::new(&["404:404=./missing.html".to_string()]).unwrap();
        assert!(server.endpoints.is_empty());
        assert!(server.fallback.is_some());
    }

    #[tokio::test]
    async fn test_spa_round_trip() {
        let (_dir, endpoints) = dist_fixture();
        let server = Server::new(&endpoints).unwrap();

        // directory root serves the index directly
        let resp = server.handle_request(request("/")).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(body_bytes(resp).await, "<p>spa</p>");

        // a real asset is served with its own content
        let resp = server.handle_request(request("/app.js")).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(body_bytes(resp).await, "boot()");

        // a missing asset gets the custom page, with a success status
        let resp = server.handle_request(request("/missing.js")).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(body_bytes(resp).await, "<p>spa</p>");
    }

    #[tokio::test]
    async fn test_unmatched_path_without_fallback_is_generic_404() {
        let dir = tempfile::tempdir().unwrap();
        let assets = dir.path().join("assets");
        std::fs::create_dir(&assets).unwrap();

        let server = Server::new(&[format!("/assets:file={}", assets.display())]).unwrap();
        let resp = server.handle_request(request("/elsewhere")).await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn test_unmatched_path_with_fallback_gets_page() {
        let (_dir, mut endpoints) = dist_fixture();
        // narrow the static mount so some paths match nothing
        let dist_endpoint = endpoints.remove(0);
        let server = Server::new(&[
            dist_endpoint.replace("/:file", "/app:file"),
            endpoints.remove(0),
        ])
        .unwrap();

        let resp = server.handle_request(request("/unrelated")).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(body_bytes(resp).await, "<p>spa</p>");
    }

    #[tokio::test]
    async fn test_declaration_order_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        std::fs::create_dir_all(first.join("shared")).unwrap();
        std::fs::create_dir_all(second.join("shared")).unwrap();
        std::fs::write(first.join("shared/x.txt"), "from first").unwrap();
        std::fs::write(second.join("shared/x.txt"), "from second").unwrap();

        let server = Server::new(&[
            format!("/shared:file={}", first.display()),
            format!("/shared:file={}", second.display()),
        ])
        .unwrap();

        let resp = server.handle_request(request("/shared/x.txt")).await;
        assert_eq!(body_bytes(resp).await, "from first");
    }
}
