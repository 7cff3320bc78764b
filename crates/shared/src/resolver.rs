//! Hostname-to-Brand Resolution
//!
//! Derives a brand identifier from a hostname. Supports:
//! - Exact hostnames: zumar.local -> zumar
//! - Subdomain labels: acme.example.com -> acme (unvalidated candidate)
//! - Embedded brand stems: www.zumar.local -> zumar

use std::collections::HashMap;

use crate::types::BrandId;

/// Labels that never self-identify as a brand
pub const NON_BRAND_LABELS: &[&str] = &["www", "localhost"];

/// Result of resolving a hostname to a brand identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBrand {
    /// The brand identifier (not necessarily registered, see [`Resolution::Subdomain`])
    pub brand_id: BrandId,
    /// Which rule produced the identifier
    pub resolution: Resolution,
}

/// How the hostname was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Hostname is registered verbatim (e.g., zumar.local)
    Exact,
    /// First hostname label taken as-is; callers must validate it
    Subdomain,
    /// Hostname contains a registered hostname minus its top-level suffix
    Substring,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Exact => "exact",
            Resolution::Subdomain => "subdomain",
            Resolution::Substring => "substring",
        }
    }
}

/// Exact hostname -> brand identifier table, kept in registration order
#[derive(Debug, Clone, Default)]
pub struct HostnameMap {
    entries: Vec<(String, BrandId)>,
    index: HashMap<String, usize>,
}

impl HostnameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hostname. Returns the brand that already owns it, if any,
    /// in which case the table is left unchanged.
    pub fn insert(&mut self, hostname: impl Into<String>, brand_id: BrandId) -> Option<&BrandId> {
        let hostname = hostname.into();
        if let Some(&existing) = self.index.get(&hostname) {
            return self.entries.get(existing).map(|(_, id)| id);
        }
        self.index.insert(hostname.clone(), self.entries.len());
        self.entries.push((hostname, brand_id));
        None
    }

    /// Exact lookup only
    pub fn get(&self, hostname: &str) -> Option<&BrandId> {
        self.index
            .get(hostname)
            .and_then(|&i| self.entries.get(i))
            .map(|(_, id)| id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BrandId)> {
        self.entries.iter().map(|(host, id)| (host.as_str(), id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a hostname to a brand identifier; first matching rule wins
    pub fn resolve(&self, hostname: &str) -> Option<BrandId> {
        self.resolve_detailed(hostname).map(|r| r.brand_id)
    }

    /// Like [`HostnameMap::resolve`], also reporting which rule matched
    pub fn resolve_detailed(&self, hostname: &str) -> Option<ResolvedBrand> {
        if let Some(id) = self.get(hostname) {
            return Some(ResolvedBrand {
                brand_id: id.clone(),
                resolution: Resolution::Exact,
            });
        }

        if let Some(label) = hostname.split('.').next() {
            if !label.is_empty() && !NON_BRAND_LABELS.contains(&label) {
                return Some(ResolvedBrand {
                    brand_id: BrandId::from(label),
                    resolution: Resolution::Subdomain,
                });
            }
        }

        self.iter().find_map(|(registered, id)| {
            let stem = strip_top_level_suffix(registered);
            (!stem.is_empty() && hostname.contains(stem)).then(|| ResolvedBrand {
                brand_id: id.clone(),
                resolution: Resolution::Substring,
            })
        })
    }
}

/// Resolve a hostname against the given table
pub fn resolve_from_hostname(map: &HostnameMap, hostname: &str) -> Option<BrandId> {
    map.resolve(hostname)
}

/// Normalize a host header value: drop the port and lowercase
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    // Bracketed IPv6 literal, e.g. [::1]:3000
    let host = if host.starts_with('[') {
        host.split_inclusive(']').next().unwrap_or(host)
    } else {
        host.split(':').next().unwrap_or(host)
    };
    host.to_lowercase()
}

/// "zumar.local" -> "zumar"; a dotless hostname is returned whole
fn strip_top_level_suffix(hostname: &str) -> &str {
    hostname
        .rsplit_once('.')
        .map_or(hostname, |(stem, _suffix)| stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_map() -> HostnameMap {
        let mut map = HostnameMap::new();
        map.insert("mybrand.local", BrandId::from("mybrand"));
        map.insert("zumar.local", BrandId::from("zumar"));
        map.insert("connectwise.com", BrandId::from("connectwise"));
        map
    }

    #[test]
    fn test_registered_hostnames_resolve_exactly() {
        let map = sample_map();
        for (host, id) in map.iter() {
            let resolved = map.resolve_detailed(host).unwrap();
            assert_eq!(&resolved.brand_id, id);
            assert_eq!(resolved.resolution, Resolution::Exact);
        }
    }

    #[test]
    fn test_subdomain_label_is_returned_verbatim() {
        let map = sample_map();
        let resolved = map.resolve_detailed("acme.example.com").unwrap();
        assert_eq!(resolved.brand_id.as_str(), "acme");
        assert_eq!(resolved.resolution, Resolution::Subdomain);

        // No registry validation at this stage
        assert_eq!(map.resolve("Not-A-Brand.example.org").unwrap().as_str(), "Not-A-Brand");
        assert_eq!(map.resolve("intranet").unwrap().as_str(), "intranet");
    }

    #[test]
    fn test_www_and_localhost_do_not_self_identify() {
        let map = sample_map();
        assert_eq!(map.resolve("www.example.com"), None);
        assert_eq!(map.resolve("localhost"), None);
        assert_eq!(map.resolve(""), None);
    }

    #[test]
    fn test_substring_heuristic_after_www() {
        let map = sample_map();
        let resolved = map.resolve_detailed("www.zumar.local").unwrap();
        assert_eq!(resolved.brand_id.as_str(), "zumar");
        assert_eq!(resolved.resolution, Resolution::Substring);

        assert_eq!(map.resolve("www.connectwise.io").unwrap().as_str(), "connectwise");
        assert_eq!(map.resolve("localhost.mybrand.test").unwrap().as_str(), "mybrand");
    }

    #[test]
    fn test_substring_follows_registration_order() {
        let mut map = HostnameMap::new();
        map.insert("shop.local", BrandId::from("first"));
        map.insert("shopfront.local", BrandId::from("second"));
        assert_eq!(map.resolve("www.shopfront.local").unwrap().as_str(), "first");
    }

    #[test]
    fn test_duplicate_hostname_keeps_first_owner() {
        let mut map = sample_map();
        let existing = map.insert("zumar.local", BrandId::from("other")).cloned();
        assert_eq!(existing, Some(BrandId::from("zumar")));
        assert_eq!(map.get("zumar.local").unwrap().as_str(), "zumar");
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_normalize_host() {
        assert_eq!(normalize_host("Zumar.LOCAL"), "zumar.local");
        assert_eq!(normalize_host("zumar.local:3000"), "zumar.local");
        assert_eq!(normalize_host(" MYBRAND.local:443 "), "mybrand.local");
        assert_eq!(normalize_host("[::1]:8080"), "[::1]");
    }

    #[test]
    fn test_strip_top_level_suffix() {
        assert_eq!(strip_top_level_suffix("zumar.local"), "zumar");
        assert_eq!(strip_top_level_suffix("shop.zumar.co"), "shop.zumar");
        assert_eq!(strip_top_level_suffix("intranet"), "intranet");
    }
}
