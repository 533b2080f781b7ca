//! HTTP response building module
//!
//! Provides builders for the response shapes the server emits, decoupled
//! from path resolution.

use chrono::{DateTime, Utc};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::time::SystemTime;

/// Build 200 response for a regular file.
///
/// HEAD requests get the full header set with an empty body; Content-Length
/// always reflects the real file size.
pub fn build_file_response(
    data: Vec<u8>,
    content_type: &str,
    modified: Option<SystemTime>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(data)
    };

    let mut builder = Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length);

    if let Some(mtime) = modified {
        builder = builder.header("Last-Modified", format_http_date(mtime));
    }

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build generated directory-listing response
pub fn build_listing_response(html: String, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = html.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(html)
    };

    Response::builder()
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("listing", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 301 redirect response (directory paths without a trailing slash)
pub fn build_redirect_response(target: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(301)
        .header("Location", target)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("Moved Permanently")))
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            Response::new(Full::new(Bytes::from("Moved Permanently")))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("404 Not Found")))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from("404 Not Found")))
        })
}

/// RFC 7231 HTTP-date, e.g. `Tue, 25 Aug 2026 10:00:00 GMT`
fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_response() {
        let resp = build_file_response(b"hello".to_vec(), "text/plain", None, false);
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "text/plain");
        assert_eq!(resp.headers()["Content-Length"], "5");
        assert!(resp.headers().get("Last-Modified").is_none());
    }

    #[test]
    fn test_head_keeps_content_length() {
        let resp = build_file_response(b"hello".to_vec(), "text/plain", None, true);
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Length"], "5");
    }

    #[test]
    fn test_file_response_last_modified() {
        let resp = build_file_response(
            b"x".to_vec(),
            "text/plain",
            Some(SystemTime::UNIX_EPOCH),
            false,
        );
        assert_eq!(
            resp.headers()["Last-Modified"],
            "Thu, 01 Jan 1970 00:00:00 GMT"
        );
    }

    #[test]
    fn test_redirect_response() {
        let resp = build_redirect_response("/snow-cicero/");
        assert_eq!(resp.status(), 301);
        assert_eq!(resp.headers()["Location"], "/snow-cicero/");
    }

    #[test]
    fn test_404_response() {
        let resp = build_404_response();
        assert_eq!(resp.status(), 404);
        assert_eq!(resp.headers()["Content-Type"], "text/plain");
    }
}
