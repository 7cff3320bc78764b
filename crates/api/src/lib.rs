//! Brandmux API Library
//!
//! HTTP surface for brand resolution: the edge interceptor that keeps the
//! brand cookie in sync with the hostname, server-side initial brand
//! resolution, and brand lookup endpoints.

pub mod config;
pub mod error;
pub mod routes;
pub mod routing;
pub mod state;

pub use config::{Config, ConfigError, Environment};
pub use error::{ApiError, ApiResult};
pub use routing::{resolve_initial_brand, HintSource, InitialBrand};
pub use state::AppState;
