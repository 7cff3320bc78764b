//! Application configuration

use std::env;
use std::path::PathBuf;

/// Deployment environment; only `Production` sets the cookie `Secure` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" | "test" => Some(Self::Development),
            "staging" => Some(Self::Staging),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub bind_address: String,
    pub environment: Environment,

    // Brands
    pub brands_file: Option<PathBuf>,

    // Edge
    pub error_route: String,

    // CORS
    pub cors_allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            environment: Environment::Development,
            brands_file: None,
            error_route: "/error".to_string(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV") {
            Ok(value) => {
                Environment::parse(&value).ok_or(ConfigError::Invalid("APP_ENV", value))?
            }
            Err(_) => Environment::Development,
        };

        let error_route = env::var("ERROR_ROUTE").unwrap_or_else(|_| "/error".to_string());
        if !error_route.starts_with('/') || error_route == "/" {
            return Err(ConfigError::Invalid("ERROR_ROUTE", error_route));
        }

        Ok(Self {
            // Server
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            environment,

            // Brands
            brands_file: env::var("BRANDS_FILE")
                .ok()
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),

            // Edge
            error_route,

            // CORS
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        })
    }

    /// Whether the brand cookie carries the `Secure` attribute
    pub fn secure_cookies(&self) -> bool {
        self.environment.is_production()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    const VARS: &[&str] = &[
        "BIND_ADDRESS",
        "APP_ENV",
        "BRANDS_FILE",
        "ERROR_ROUTE",
        "CORS_ALLOWED_ORIGINS",
    ];

    /// Helper to clear env vars before and after tests
    fn cleanup_config() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        cleanup_config();

        let config = Config::from_env().unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:3000");
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.error_route, "/error");
        assert!(config.brands_file.is_none());
        assert!(config.cors_allowed_origins.is_empty());
        assert!(!config.secure_cookies());
    }

    #[test]
    #[serial]
    fn test_production_enables_secure_cookies() {
        cleanup_config();
        env::set_var("APP_ENV", "Production");

        let config = Config::from_env().unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert!(config.secure_cookies());

        env::set_var("APP_ENV", "staging");
        assert!(!Config::from_env().unwrap().secure_cookies());

        cleanup_config();
    }

    #[test]
    #[serial]
    fn test_invalid_values_are_rejected() {
        cleanup_config();

        env::set_var("APP_ENV", "moon");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("APP_ENV", value)) if value == "moon"
        ));
        env::remove_var("APP_ENV");

        env::set_var("ERROR_ROUTE", "error");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("ERROR_ROUTE", _))
        ));

        // The root page owns "/"
        env::set_var("ERROR_ROUTE", "/");
        assert!(Config::from_env().is_err());

        cleanup_config();
    }

    #[test]
    #[serial]
    fn test_lists_and_paths() {
        cleanup_config();
        env::set_var("CORS_ALLOWED_ORIGINS", "https://zumar.local, ,https://mybrand.local");
        env::set_var("BRANDS_FILE", "/etc/brandmux/brands.json");

        let config = Config::from_env().unwrap();
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://zumar.local", "https://mybrand.local"]
        );
        assert_eq!(
            config.brands_file,
            Some(PathBuf::from("/etc/brandmux/brands.json"))
        );

        cleanup_config();
    }
}
