//! Brand Registry
//!
//! Process-wide, read-only table of brand definitions plus the hostname map
//! derived from them. Loaded once at startup; safe for any number of
//! concurrent readers.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{RegistryError, RegistryResult};
use crate::resolver::HostnameMap;
use crate::theme::parse_hex_rgb;
use crate::types::{BrandDefinition, BrandId};

/// Catalogue compiled into every binary
pub const BUILTIN_CATALOG: &str = include_str!("../catalog/brands.json");

/// Immutable brand table. The first registered brand is the default.
#[derive(Debug, Clone)]
pub struct BrandRegistry {
    brands: Vec<BrandDefinition>,
    by_id: HashMap<BrandId, usize>,
    hostnames: HostnameMap,
}

impl BrandRegistry {
    /// Build a registry from definitions in registration order
    pub fn new(brands: Vec<BrandDefinition>) -> RegistryResult<Self> {
        if brands.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut by_id = HashMap::with_capacity(brands.len());
        let mut hostnames = HostnameMap::new();

        for (position, brand) in brands.iter().enumerate() {
            if brand.id.is_empty() {
                return Err(RegistryError::EmptyId);
            }
            if by_id.insert(brand.id.clone(), position).is_some() {
                return Err(RegistryError::DuplicateId(brand.id.to_string()));
            }

            for (field, value) in brand.color_scheme.entries() {
                if parse_hex_rgb(value).is_none() || !value.starts_with('#') {
                    return Err(RegistryError::InvalidColor {
                        brand: brand.id.to_string(),
                        field,
                        value: value.to_string(),
                    });
                }
            }

            for domain in &brand.domains {
                if let Some(owner) = hostnames.insert(domain.clone(), brand.id.clone()) {
                    return Err(RegistryError::DuplicateDomain {
                        hostname: domain.clone(),
                        first: owner.to_string(),
                        second: brand.id.to_string(),
                    });
                }
            }
        }

        tracing::debug!(
            brands = brands.len(),
            hostnames = hostnames.len(),
            default_brand = %brands[0].id,
            "Brand registry loaded"
        );

        Ok(Self {
            brands,
            by_id,
            hostnames,
        })
    }

    /// The catalogue shipped with the binary
    pub fn builtin() -> RegistryResult<Self> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    /// Parse a JSON array of brand definitions
    pub fn from_json_str(json: &str) -> RegistryResult<Self> {
        let brands: Vec<BrandDefinition> = serde_json::from_str(json)?;
        Self::new(brands)
    }

    /// Load a JSON catalogue from disk
    pub fn from_file(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Look up a brand; unknown ids are `None`, never an error
    pub fn lookup(&self, id: &str) -> Option<&BrandDefinition> {
        self.by_id.get(id).and_then(|&i| self.brands.get(i))
    }

    /// Whether `id` names a registered brand
    pub fn is_known(&self, id: &str) -> bool {
        self.lookup(id).is_some()
    }

    /// All brands in registration order
    pub fn all(&self) -> &[BrandDefinition] {
        &self.brands
    }

    /// First registered brand; fixed at load time
    pub fn default_brand(&self) -> &BrandDefinition {
        // `new` rejects empty catalogues
        &self.brands[0]
    }

    /// Look up `id`, substituting the default brand for misses and `None`
    pub fn lookup_or_default(&self, id: Option<&str>) -> &BrandDefinition {
        id.and_then(|id| self.lookup(id))
            .unwrap_or_else(|| self.default_brand())
    }

    pub fn hostnames(&self) -> &HostnameMap {
        &self.hostnames
    }

    /// Brand registered for this exact hostname
    pub fn brand_by_domain(&self, hostname: &str) -> Option<&BrandDefinition> {
        self.hostnames
            .get(hostname)
            .and_then(|id| self.lookup(id.as_str()))
    }

    /// Case-insensitive match on `name` or `display_name`
    pub fn brand_id_by_name(&self, name: &str) -> Option<&BrandId> {
        self.brands
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(name) || b.display_name.eq_ignore_ascii_case(name))
            .map(|b| &b.id)
    }

    pub fn display_name(&self, id: &str) -> Option<&str> {
        self.lookup(id).map(|b| b.display_name.as_str())
    }

    pub fn len(&self) -> usize {
        self.brands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brands.is_empty()
    }
}
