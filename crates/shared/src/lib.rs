//! Brandmux Shared Types and Utilities
//!
//! Brand registry, hostname resolution, cookie wire format and theme
//! variables shared by the edge/server layer and the client runtime.

pub mod cookie;
pub mod error;
pub mod registry;
pub mod resolver;
pub mod theme;
pub mod types;

pub use cookie::{
    brand_from_cookie_header, read_cookie, BrandCookie, BRAND_COOKIE_MAX_AGE, BRAND_COOKIE_NAME,
    BRAND_QUERY_PARAM, BRAND_STORAGE_KEY,
};
pub use error::*;
pub use registry::BrandRegistry;
pub use resolver::{
    normalize_host, resolve_from_hostname, HostnameMap, Resolution, ResolvedBrand,
};
pub use theme::{generate_theme_variables, hex_to_rgb, render_root_style};
pub use types::*;
