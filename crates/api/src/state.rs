//! Shared application state

use std::sync::Arc;

use brandmux_shared::{BrandRegistry, RegistryError};

use crate::config::{Config, Environment};

/// State handed to every handler and middleware.
///
/// Holds no per-request brand: each request resolves its own brand from its
/// own signals, and the registry is read-only.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Arc<BrandRegistry>,
}

impl AppState {
    pub fn new(config: Config, registry: BrandRegistry) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
        }
    }

    /// Load the catalogue named by the config, or the built-in one
    pub fn from_config(config: Config) -> Result<Self, RegistryError> {
        let registry = match &config.brands_file {
            Some(path) => BrandRegistry::from_file(path)?,
            None => BrandRegistry::builtin()?,
        };

        tracing::info!(
            brands = registry.len(),
            default_brand = %registry.default_brand().id,
            source = %config
                .brands_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "builtin".to_string()),
            "Brand catalogue loaded"
        );

        Ok(Self::new(config, registry))
    }

    /// Default config with the built-in catalogue (tests and local tooling)
    pub fn with_builtin_brands() -> Result<Self, RegistryError> {
        Ok(Self::new(Config::default(), BrandRegistry::builtin()?))
    }

    /// Same state with a different deployment environment
    pub fn with_environment(self, environment: Environment) -> Self {
        let config = Config {
            environment,
            ..(*self.config).clone()
        };
        Self {
            config: Arc::new(config),
            registry: self.registry,
        }
    }
}
