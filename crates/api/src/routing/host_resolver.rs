//! Server-Side Brand Resolution
//!
//! Computes the initial brand hint handed to the render boundary. Precedence:
//! - The `current-brand-id` cookie written by the edge layer on an earlier request
//! - Host-style headers: host, x-forwarded-host, x-host
//! - The hostname of the referer (or x-forwarded-referer)
//!
//! The hint is provisional. Client reconciliation may still override it.

use axum::http::{header, HeaderMap};
use brandmux_shared::{brand_from_cookie_header, normalize_host, BrandId, HostnameMap};
use serde::Serialize;
use url::Url;

/// Host-style headers, tried in order
pub const HOST_HEADERS: &[&str] = &["host", "x-forwarded-host", "x-host"];

/// Referer-style headers, tried in order after every host header
pub const REFERER_HEADERS: &[&str] = &["referer", "x-forwarded-referer"];

/// Where the initial hint came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "name")]
pub enum HintSource {
    /// Persisted brand cookie
    Cookie,
    /// A host-style header
    Host(&'static str),
    /// A referer-style header's hostname
    Referer(&'static str),
}

/// Result of server-side resolution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InitialBrand {
    /// Unvalidated hint; `None` means "use the default brand"
    pub brand_id: Option<BrandId>,
    pub source: Option<HintSource>,
}

impl InitialBrand {
    fn found(brand_id: BrandId, source: HintSource) -> Self {
        Self {
            brand_id: Some(brand_id),
            source: Some(source),
        }
    }
}

/// Resolve the initial brand hint for a request
pub fn resolve_initial_brand(headers: &HeaderMap, hostnames: &HostnameMap) -> InitialBrand {
    if let Some(brand_id) = brand_from_cookies(headers) {
        return InitialBrand::found(brand_id, HintSource::Cookie);
    }

    for &name in HOST_HEADERS {
        if let Some(brand_id) = header_str(headers, name)
            .map(first_hop)
            .map(normalize_host)
            .and_then(|host| hostnames.resolve(&host))
        {
            return InitialBrand::found(brand_id, HintSource::Host(name));
        }
    }

    for &name in REFERER_HEADERS {
        if let Some(brand_id) = header_str(headers, name)
            .and_then(referer_hostname)
            .and_then(|host| hostnames.resolve(&host))
        {
            return InitialBrand::found(brand_id, HintSource::Referer(name));
        }
    }

    InitialBrand::default()
}

/// Brand cookie from any `Cookie` header on the request
pub fn brand_from_cookies(headers: &HeaderMap) -> Option<BrandId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(brand_from_cookie_header)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Client-facing entry of a proxy-chained value like `a.example, proxy.internal`
fn first_hop(value: &str) -> &str {
    value.split(',').next().unwrap_or(value).trim()
}

/// Hostname of a referer URL; unparseable referers are skipped
fn referer_hostname(referer: &str) -> Option<String> {
    let url = Url::parse(referer).ok()?;
    url.host_str().map(str::to_lowercase)
}
