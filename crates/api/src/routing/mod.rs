//! Host-based brand routing
//!
//! This module turns request signals into brand identifiers:
//! - Edge interception: keeps the `current-brand-id` cookie in sync with the hostname
//! - Server resolution: cookie first, then host-style headers, then the referer

mod edge;
mod host_resolver;

pub use edge::{brand_edge_middleware, should_intercept, EdgeError};
pub use host_resolver::{
    brand_from_cookies, resolve_initial_brand, HintSource, InitialBrand, HOST_HEADERS,
    REFERER_HEADERS,
};
