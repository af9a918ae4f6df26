//! HTTP response building module
//!
//! Builders for the handful of response shapes the server produces. Every
//! builder falls back to a bare response if header assembly fails, so
//! request handling never panics on a malformed header value.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Build a 200 response carrying file or page content
pub fn build_200_response(body: Bytes, content_type: &str) -> Response<Full<Bytes>> {
    let content_length = body.len();
    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build the generic 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("404 - Not found")))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from("404 - Not found")))
        })
}

/// Build a 500 Internal Server Error response
pub fn build_500_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(500)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("Internal server error")))
        .unwrap_or_else(|e| {
            log_build_error("500", &e);
            Response::new(Full::new(Bytes::from("Internal server error")))
        })
}

/// Build a 502 Bad Gateway response (upstream unreachable)
pub fn build_502_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(502)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("502 Bad Gateway")))
        .unwrap_or_else(|e| {
            log_build_error("502", &e);
            Response::new(Full::new(Bytes::from("502 Bad Gateway")))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_200_carries_content_type_and_length() {
        let resp = build_200_response(Bytes::from("hello"), "text/plain; charset=utf-8");
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "text/plain; charset=utf-8"
        );
        assert_eq!(resp.headers().get("Content-Length").unwrap(), "5");
    }

    #[test]
    fn test_error_statuses() {
        assert_eq!(build_404_response().status(), 404);
        assert_eq!(build_500_response().status(), 500);
        assert_eq!(build_502_response().status(), 502);
    }
}
