//! Request dispatch module
//!
//! Entry point for HTTP request processing. Every method receives the same
//! static-file treatment: POST and OPTIONS are advertised in the CORS
//! allow-methods for local tooling but have no dedicated handler branch.

use crate::config::AppState;
use crate::handler::static_files::{self, Resolved};
use crate::http::{self, cors};
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let is_head = method == Method::HEAD;

    let user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    let resolved = static_files::resolve(
        &state.root,
        uri.path(),
        &state.config.site.index_files,
    )
    .await;

    let mut response = response_for(resolved, is_head);
    cors::apply(&mut response);

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            method.to_string(),
            uri.path().to_string(),
        );
        entry.query = uri.query().map(ToString::to_string);
        entry.http_version = version_label(req.version()).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .unwrap_or(0)
            .try_into()
            .unwrap_or(usize::MAX);
        entry.user_agent = user_agent;
        entry.request_time_us = started.elapsed().as_micros().try_into().unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Map a resolution outcome to its response
fn response_for(resolved: Resolved, is_head: bool) -> Response<Full<Bytes>> {
    match resolved {
        Resolved::File {
            content,
            content_type,
            modified,
        } => http::build_file_response(content, content_type, modified, is_head),
        Resolved::Redirect { location } => http::build_redirect_response(&location),
        Resolved::Listing { html } => http::build_listing_response(html, is_head),
        Resolved::NotFound => http::build_404_response(),
    }
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
}
