//! Theme application targets

use std::collections::BTreeMap;

use brandmux_shared::render_root_style;

/// Something theme variables and a favicon can be written onto
pub trait ThemeTarget {
    /// Set one CSS custom property on the document root
    fn set_variable(&mut self, name: &str, value: &str);

    /// Point the document's icon link at `href`, creating it if missing
    fn set_favicon(&mut self, href: &str);
}

/// In-memory document root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentTheme {
    variables: BTreeMap<String, String>,
    favicon: Option<String>,
}

impl DocumentTheme {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    pub fn variables(&self) -> &BTreeMap<String, String> {
        &self.variables
    }

    pub fn favicon(&self) -> Option<&str> {
        self.favicon.as_deref()
    }

    /// `:root { ... }` block with every variable set so far
    pub fn root_style(&self) -> String {
        render_root_style(&self.variables)
    }
}

impl ThemeTarget for DocumentTheme {
    fn set_variable(&mut self, name: &str, value: &str) {
        self.variables.insert(name.to_string(), value.to_string());
    }

    fn set_favicon(&mut self, href: &str) {
        self.favicon = Some(href.to_string());
    }
}
