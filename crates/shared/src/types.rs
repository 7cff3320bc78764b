//! Common types used across Brandmux

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// ID Wrappers
// =============================================================================

/// Brand identifier wrapper
///
/// Opaque and stable across sessions. A `BrandId` is not guaranteed to name a
/// registered brand: hostname heuristics and explicit overrides can produce
/// candidates that only the registry can confirm.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrandId(pub String);

impl BrandId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the empty string, which every signal treats as "absent"
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for BrandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BrandId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for BrandId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// Lets `HashMap<BrandId, _>` be queried with `&str`
impl Borrow<str> for BrandId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for BrandId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Brand Definition
// =============================================================================

/// Immutable record describing one brand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandDefinition {
    pub id: BrandId,
    /// Machine-friendly name (usually equal to the id)
    pub name: String,
    pub display_name: String,
    /// Hostnames that map exactly to this brand
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(default)]
    pub description: String,
    pub color_scheme: ColorScheme,
    pub assets: BrandAssets,
    /// Feature toggles; a missing key reads as disabled
    #[serde(default)]
    pub features: BTreeMap<String, bool>,
    /// Free-form settings; a missing key falls back to the default brand
    #[serde(default)]
    pub settings: BTreeMap<String, serde_json::Value>,
}

impl BrandDefinition {
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.get(feature).copied().unwrap_or(false)
    }

    pub fn setting(&self, name: &str) -> Option<&serde_json::Value> {
        self.settings.get(name)
    }

    pub fn logo(&self, variant: LogoVariant) -> &str {
        match variant {
            LogoVariant::Light => &self.assets.logo.light,
            LogoVariant::Dark => &self.assets.logo.dark,
        }
    }
}

/// Brand color palette. Every value is a `#rrggbb` hex string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub surface: String,
    pub text: TextColors,
    pub border: String,
    pub success: String,
    pub warning: String,
    pub error: String,
    pub info: String,
}

impl ColorScheme {
    /// All colors paired with their field path, in declaration order
    pub fn entries(&self) -> [(&'static str, &str); 13] {
        [
            ("primary", self.primary.as_str()),
            ("secondary", self.secondary.as_str()),
            ("accent", self.accent.as_str()),
            ("background", self.background.as_str()),
            ("surface", self.surface.as_str()),
            ("text.primary", self.text.primary.as_str()),
            ("text.secondary", self.text.secondary.as_str()),
            ("text.disabled", self.text.disabled.as_str()),
            ("border", self.border.as_str()),
            ("success", self.success.as_str()),
            ("warning", self.warning.as_str()),
            ("error", self.error.as_str()),
            ("info", self.info.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextColors {
    pub primary: String,
    pub secondary: String,
    pub disabled: String,
}

/// Logos, favicon and auxiliary imagery for a brand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandAssets {
    pub logo: LogoSet,
    /// Named auxiliary images (hero, background, placeholder, ...)
    #[serde(default)]
    pub images: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoSet {
    pub light: String,
    pub dark: String,
    pub favicon: String,
}

/// Which logo to use for the active color theme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoVariant {
    #[default]
    Light,
    Dark,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brand_id_serializes_as_plain_string() {
        let id = BrandId::from("zumar");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"zumar\"");

        let parsed: BrandId = serde_json::from_str("\"mybrand\"").unwrap();
        assert_eq!(parsed.as_str(), "mybrand");
    }

    #[test]
    fn test_optional_maps_default_to_empty() {
        let json = serde_json::json!({
            "id": "bare",
            "name": "bare",
            "display_name": "Bare",
            "color_scheme": {
                "primary": "#000000", "secondary": "#000000", "accent": "#000000",
                "background": "#ffffff", "surface": "#ffffff",
                "text": { "primary": "#000000", "secondary": "#000000", "disabled": "#000000" },
                "border": "#000000", "success": "#000000", "warning": "#000000",
                "error": "#000000", "info": "#000000"
            },
            "assets": { "logo": { "light": "/l.svg", "dark": "/d.svg", "favicon": "/f.ico" } }
        });

        let brand: BrandDefinition = serde_json::from_value(json).unwrap();
        assert!(brand.domains.is_empty());
        assert!(brand.features.is_empty());
        assert!(brand.settings.is_empty());
        assert!(!brand.has_feature("anything"));
        assert_eq!(brand.logo(LogoVariant::Dark), "/d.svg");
    }
}
