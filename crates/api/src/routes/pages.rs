//! Server-rendered pages
//!
//! The root page is the render boundary: it embeds the initial brand hint and
//! the theme variables for first paint. The error page is the target of edge
//! redirects and never depends on brand state.

use axum::{extract::State, http::HeaderMap, response::Html};
use brandmux_shared::{generate_theme_variables, render_root_style, BrandId};

use crate::{routing::resolve_initial_brand, state::AppState};

/// Root document shell with the brand hint and theme applied
pub async fn root_page(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let initial = resolve_initial_brand(&headers, state.registry.hostnames());
    let brand = state
        .registry
        .lookup_or_default(initial.brand_id.as_ref().map(BrandId::as_str));
    let style = render_root_style(&generate_theme_variables(&brand.color_scheme));
    let hint = initial
        .brand_id
        .as_ref()
        .map(|id| escape_html(id.as_str()))
        .unwrap_or_default();

    Html(format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html lang=\"en\" data-brand=\"{brand_id}\">\n",
            "<head>\n",
            "<meta charset=\"utf-8\">\n",
            "<meta name=\"brand-hint\" content=\"{hint}\">\n",
            "<title>{title}</title>\n",
            "<link rel=\"icon\" href=\"{favicon}\">\n",
            "<style>{style}</style>\n",
            "</head>\n",
            "<body></body>\n",
            "</html>\n"
        ),
        brand_id = escape_html(brand.id.as_str()),
        hint = hint,
        title = escape_html(&brand.display_name),
        favicon = escape_html(&brand.assets.logo.favicon),
        style = style,
    ))
}

/// Generic error page
pub async fn error_page() -> Html<&'static str> {
    Html(concat!(
        "<!DOCTYPE html>\n",
        "<html lang=\"en\">\n",
        "<head><meta charset=\"utf-8\"><title>Something went wrong</title></head>\n",
        "<body><h1>Something went wrong</h1><p>Please try again later.</p></body>\n",
        "</html>\n"
    ))
}

/// Escape text for use in HTML attribute values and text nodes
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
