//! Custom not-found page handler
//!
//! Serves a single fallback file (typically the SPA's `index.html`). The
//! file is read fresh on every invocation so edits show up without a server
//! restart, and it is deliberately not validated at construction: a page
//! that appears later (e.g. after the first bundler build) starts working
//! immediately.
//!
//! This handler is the last resort in the fallback chain. If the page
//! itself cannot be read it answers 200 with a plain-text diagnostic rather
//! than escalating, so the original not-found condition is never masked by
//! a fresh 500.

use crate::http::{mime, response};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Serves the configured fallback page on every invocation
#[derive(Debug, Clone)]
pub struct NotFoundFileHandler {
    file_path: PathBuf,
}

impl NotFoundFileHandler {
    /// Path is taken as-is; existence is checked per request, not here.
    pub fn new(file_path: &str) -> Self {
        Self {
            file_path: PathBuf::from(file_path),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Serve the fallback page. Always answers 200, even on failure.
    pub async fn serve(&self) -> Response<Full<Bytes>> {
        let mut file = match File::open(&self.file_path).await {
            Ok(f) => f,
            Err(e) => {
                logger::log_error(&format!(
                    "unable to open 404 page {}: {e}",
                    self.file_path.display()
                ));
                return response::build_200_response(
                    Bytes::from("unable to get 404 page"),
                    "text/plain; charset=utf-8",
                );
            }
        };

        let mut content = Vec::new();
        if let Err(e) = file.read_to_end(&mut content).await {
            logger::log_error(&format!(
                "unable to read 404 page {}: {e}",
                self.file_path.display()
            ));
            return response::build_200_response(
                Bytes::from("unable to send 404 page"),
                "text/plain; charset=utf-8",
            );
        }

        let content_type =
            mime::content_type_for(self.file_path.extension().and_then(|e| e.to_str()));
        response::build_200_response(Bytes::from(content), content_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_bytes(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_serves_page_with_200() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("index.html");
        std::fs::write(&page, "<h1>custom 404</h1>").unwrap();

        let handler = NotFoundFileHandler::new(page.to_str().unwrap());
        let resp = handler.serve().await;
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "text/html; charset=utf-8"
        );
        assert_eq!(body_bytes(resp).await, "<h1>custom 404</h1>");
    }

    #[tokio::test]
    async fn test_page_is_read_fresh_each_time() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("404.html");
        std::fs::write(&page, "before").unwrap();

        let handler = NotFoundFileHandler::new(page.to_str().unwrap());
        assert_eq!(body_bytes(handler.serve().await).await, "before");

        std::fs::write(&page, "after").unwrap();
        assert_eq!(body_bytes(handler.serve().await).await, "after");
    }

    #[tokio::test]
    async fn test_missing_page_yields_diagnostic_200() {
        let handler = NotFoundFileHandler::new("/nonexistent/404.html");
        let resp = handler.serve().await;
        assert_eq!(resp.status(), 200);
        assert_eq!(body_bytes(resp).await, "unable to get 404 page");
    }
}
