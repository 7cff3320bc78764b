//! Error types for Brandmux

use thiserror::Error;

/// Errors raised while loading a brand catalogue.
///
/// Resolution misses are never errors; these only describe a catalogue that
/// cannot be trusted at startup.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Brand catalogue is empty")]
    Empty,

    #[error("Duplicate brand id: {0}")]
    DuplicateId(String),

    #[error("Hostname {hostname} is claimed by both {first} and {second}")]
    DuplicateDomain {
        hostname: String,
        first: String,
        second: String,
    },

    #[error("Invalid color for brand {brand} at {field}: {value}")]
    InvalidColor {
        brand: String,
        field: &'static str,
        value: String,
    },

    #[error("Brand with an empty id")]
    EmptyId,

    #[error("Failed to parse brand catalogue: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read brand catalogue {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors raised while encoding the brand cookie
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CookieError {
    #[error("Brand id is empty")]
    EmptyValue,
}
