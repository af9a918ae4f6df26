//! Static file serving module
//!
//! Serves files out of a root directory that is canonicalized once at
//! construction. Every request walks the same sequence: strip the leading
//! separator, join onto the root, lexically normalize, verify the result is
//! still under the root, stat, redirect directories to their `index.html`,
//! then open and read. Missing files go to the injected not-found fallback
//! (or a generic 404 when none is configured); only a read failure after a
//! successful open becomes a 500.
//!
//! The normalize-then-prefix-check is the sole safety boundary against path
//! traversal and runs on every request rather than being cached, since the
//! filesystem under the root can change between requests.

use crate::endpoint::ConfigError;
use crate::handler::not_found::NotFoundFileHandler;
use crate::http::{mime, response};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Serves files under a canonical root directory
#[derive(Debug, Clone)]
pub struct StaticFileHandler {
    /// Canonical absolute root; the traversal guard compares against this
    root: PathBuf,
    /// Injected after construction by server assembly
    fallback: Option<Arc<NotFoundFileHandler>>,
}

impl StaticFileHandler {
    /// Canonicalize the root now; a missing or unreadable directory is a
    /// startup error, not a per-request one.
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let root =
            std::fs::canonicalize(path).map_err(|source| ConfigError::StaticRootUnavailable {
                path: path.to_string(),
                source,
            })?;
        logger::log_serving_root(&root);
        Ok(Self {
            root,
            fallback: None,
        })
    }

    /// Second construction phase: attach the resolved not-found fallback.
    #[must_use]
    pub fn with_fallback(mut self, fallback: Arc<NotFoundFileHandler>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Serve the file addressed by `request_path` (the full URI path).
    pub async fn serve(&self, request_path: &str) -> Response<Full<Bytes>> {
        let relative = request_path.strip_prefix('/').unwrap_or(request_path);
        // Further leading separators are redundant and collapse here; left
        // in place they would make join() treat the remainder as absolute
        // and discard the root
        let relative = relative.trim_start_matches('/');

        // Empty path is the directory-root marker
        let joined = if relative.is_empty() {
            self.root.clone()
        } else {
            self.root.join(relative)
        };
        let mut resolved = normalize(&joined);

        if !resolved.starts_with(&self.root) {
            logger::log_traversal_attempt(&resolved);
            return response::build_404_response();
        }

        match fs::metadata(&resolved).await {
            Ok(meta) => {
                if meta.is_dir() {
                    // A missing index.html surfaces as an open failure below
                    resolved.push("index.html");
                }
            }
            Err(e) => {
                logger::log_warning(&format!("unable to stat {request_path}: {e}"));
                return self.not_found().await;
            }
        }

        let mut file = match File::open(&resolved).await {
            Ok(f) => f,
            Err(e) => {
                logger::log_warning(&format!("unable to open {}: {e}", resolved.display()));
                return self.not_found().await;
            }
        };

        let mut content = Vec::new();
        if let Err(e) = file.read_to_end(&mut content).await {
            logger::log_error(&format!("unable to read {}: {e}", resolved.display()));
            return response::build_500_response();
        }

        let content_type = mime::content_type_for(resolved.extension().and_then(|e| e.to_str()));
        response::build_200_response(Bytes::from(content), content_type)
    }

    /// Missing-file policy: delegate to the fallback page if one was wired,
    /// otherwise a generic 404.
    async fn not_found(&self) -> Response<Full<Bytes>> {
        match &self.fallback {
            Some(fallback) => fallback.serve().await,
            None => response::build_404_response(),
        }
    }
}

/// Lexically normalize a path: resolve `.` and `..` segments and collapse
/// repeated separators without touching the filesystem. Popping past the
/// filesystem root is a no-op, so `/a/../../b` normalizes to `/b`.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::RootDir | Component::Prefix(_) => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}
