//! Edge Brand Interceptor
//!
//! Runs before any page handler. Resolves the brand from the request hostname
//! and, when it differs from the `current-brand-id` cookie the client sent,
//! attaches a refreshed cookie to the response. The current request is never
//! rewritten, so handlers only observe the new cookie on the next request.
//!
//! Brand detection fails open: a detection error is logged and the request
//! proceeds without a cookie. Failures in the surrounding edge plumbing
//! (an unusable request URL) redirect to the configured error route.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use brandmux_shared::{BrandCookie, CookieError, HostnameMap};
use url::Url;

use super::host_resolver::brand_from_cookies;
use crate::state::AppState;

/// Path prefixes the interceptor never touches
pub const SKIPPED_PREFIXES: &[&str] = &["/_next", "/monitoring", "/health"];

/// Static asset extensions (matched case-insensitively); `.json` is not static
pub const STATIC_EXTENSIONS: &[&str] = &[
    "html", "htm", "css", "js", "jpg", "jpeg", "webp", "png", "gif", "svg", "ttf", "woff",
    "woff2", "ico", "csv", "doc", "docx", "xls", "xlsx", "zip", "webmanifest",
];

/// Errors raised while intercepting a request
#[derive(Debug, thiserror::Error)]
pub enum EdgeError {
    #[error("Host header is not valid UTF-8")]
    NonUtf8Host,

    #[error("Cannot build request URL for host {host:?}: {source}")]
    InvalidRequestUrl {
        host: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Cannot encode brand cookie: {0}")]
    Cookie(#[from] CookieError),

    #[error("Brand cookie is not a valid header value")]
    InvalidHeaderValue(#[from] axum::http::header::InvalidHeaderValue),
}

/// Whether the interceptor should run for this path
pub fn should_intercept(path: &str, error_route: &str) -> bool {
    if path == error_route || path.starts_with(&format!("{}/", error_route)) {
        return false;
    }
    if SKIPPED_PREFIXES
        .iter()
        .any(|prefix| path == *prefix || path.starts_with(&format!("{}/", prefix)))
    {
        return false;
    }

    let last_segment = path.rsplit('/').next().unwrap_or(path);
    match last_segment.rsplit_once('.') {
        Some((_, ext)) => !STATIC_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext)),
        None => true,
    }
}

/// Middleware that keeps the brand cookie in sync with the request hostname
pub async fn brand_edge_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !should_intercept(request.uri().path(), &state.config.error_route) {
        return next.run(request).await;
    }

    let hostname = match request_hostname(&request) {
        Ok(hostname) => hostname,
        Err(err) => {
            tracing::error!(error = %err, path = %request.uri().path(), "Edge processing failed");
            return Redirect::temporary(&state.config.error_route).into_response();
        }
    };

    let set_cookie = hostname.as_deref().and_then(|hostname| {
        match brand_cookie_for(
            state.registry.hostnames(),
            hostname,
            &request,
            state.config.secure_cookies(),
        ) {
            Ok(cookie) => cookie,
            Err(err) => {
                tracing::warn!(error = %err, hostname, "Brand detection failed, continuing without cookie");
                None
            }
        }
    });

    let mut response = next.run(request).await;
    if let Some(cookie) = set_cookie {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    response
}

/// Decide whether the response must carry a refreshed brand cookie
fn brand_cookie_for(
    hostnames: &HostnameMap,
    hostname: &str,
    request: &Request<Body>,
    secure: bool,
) -> Result<Option<HeaderValue>, EdgeError> {
    let Some(detected) = hostnames.resolve_detailed(hostname) else {
        return Ok(None);
    };

    let existing = brand_from_cookies(request.headers());
    if existing.as_ref() == Some(&detected.brand_id) {
        return Ok(None);
    }

    let value = BrandCookie::new(detected.brand_id.clone(), secure).to_header_value()?;
    let value = HeaderValue::from_str(&value)?;

    tracing::debug!(
        hostname,
        brand_id = %detected.brand_id,
        resolution = detected.resolution.as_str(),
        previous = ?existing,
        "Refreshing brand cookie"
    );

    Ok(Some(value))
}

/// Hostname of the request, from the URI authority or the `Host` header.
///
/// `Ok(None)` when the request carries no host at all.
fn request_hostname(request: &Request<Body>) -> Result<Option<String>, EdgeError> {
    let host = match request.uri().authority() {
        Some(authority) => authority.as_str().to_string(),
        None => match request.headers().get(header::HOST) {
            Some(value) => value.to_str().map_err(|_| EdgeError::NonUtf8Host)?.to_string(),
            None => return Ok(None),
        },
    };

    let host = host.trim();
    if host.is_empty() {
        return Ok(None);
    }

    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let url = Url::parse(&format!("http://{}{}", host, path_and_query)).map_err(|source| {
        EdgeError::InvalidRequestUrl {
            host: host.to_string(),
            source,
        }
    })?;

    Ok(url.host_str().map(str::to_string))
}
