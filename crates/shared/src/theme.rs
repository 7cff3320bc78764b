//! Theme variables derived from a brand color scheme

use std::collections::BTreeMap;

use crate::types::ColorScheme;

/// Returned for colors that are not `#rrggbb`
pub const FALLBACK_RGB: &str = "0, 0, 0";

/// Parse `#rrggbb` (leading `#` optional, case-insensitive) into its channels
pub fn parse_hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
    };
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// "#1e293b" -> "30, 41, 59"
pub fn hex_to_rgb(hex: &str) -> String {
    match parse_hex_rgb(hex) {
        Some((r, g, b)) => format!("{}, {}, {}", r, g, b),
        None => FALLBACK_RGB.to_string(),
    }
}

/// Flat map of theme variable names to color values.
///
/// Includes `-rgb` triplets for primary, secondary and accent so consumers can
/// build translucent variants (`rgba(var(--brand-primary-rgb), 0.5)`).
pub fn generate_theme_variables(colors: &ColorScheme) -> BTreeMap<String, String> {
    let mut vars: BTreeMap<String, String> = colors
        .entries()
        .into_iter()
        .map(|(field, value)| (variable_name(field), value.to_string()))
        .collect();

    for (field, value) in [
        ("primary", &colors.primary),
        ("secondary", &colors.secondary),
        ("accent", &colors.accent),
    ] {
        vars.insert(format!("--brand-{}-rgb", field), hex_to_rgb(value));
    }

    vars
}

/// Render theme variables as a `:root` rule for server-rendered pages
pub fn render_root_style(vars: &BTreeMap<String, String>) -> String {
    let mut css = String::from(":root {");
    for (name, value) in vars {
        css.push_str(&format!(" {}: {};", name, value));
    }
    css.push_str(" }");
    css
}

/// "text.primary" -> "--brand-text-primary"
fn variable_name(field: &str) -> String {
    format!("--brand-{}", field.replace('.', "-"))
}
