//! Brand cookie and client-storage wire format
//!
//! The edge layer writes the cookie; the server entry point and the client
//! runtime read it back. Both sides share these helpers so the format cannot
//! drift.

use cookie::{Cookie, SameSite};
use time::Duration;

use crate::error::CookieError;
use crate::types::BrandId;

/// Cookie carrying the detected brand id
pub const BRAND_COOKIE_NAME: &str = "current-brand-id";

/// Key under which the client persists its brand choice
pub const BRAND_STORAGE_KEY: &str = "currentBrandId";

/// One-shot query-string override read at client startup
pub const BRAND_QUERY_PARAM: &str = "brand";

/// Cookie lifetime (30 days)
pub const BRAND_COOKIE_MAX_AGE: Duration = Duration::days(30);

/// A `Set-Cookie` value for the brand cookie.
///
/// Never HTTP-only: client script reads the same cookie during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandCookie {
    pub brand_id: BrandId,
    /// Set the `Secure` attribute (production deployments only)
    pub secure: bool,
}

impl BrandCookie {
    pub fn new(brand_id: BrandId, secure: bool) -> Self {
        Self { brand_id, secure }
    }

    pub fn to_cookie(&self) -> Result<Cookie<'static>, CookieError> {
        if self.brand_id.is_empty() {
            return Err(CookieError::EmptyValue);
        }

        Ok(Cookie::build((BRAND_COOKIE_NAME, self.brand_id.to_string()))
            .path("/")
            .max_age(BRAND_COOKIE_MAX_AGE)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .http_only(false)
            .build())
    }

    /// Encode as a `Set-Cookie` header value; the id is percent-encoded
    pub fn to_header_value(&self) -> Result<String, CookieError> {
        Ok(self.to_cookie()?.encoded().to_string())
    }
}

/// Find a cookie by name in a `Cookie` header (or `document.cookie`) string.
///
/// Values are percent-decoded and stripped of surrounding quotes; malformed
/// pairs are skipped.
pub fn read_cookie(cookie_header: &str, name: &str) -> Option<String> {
    Cookie::split_parse_encoded(cookie_header)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value_trimmed().to_string())
}

/// The brand cookie's value, if present and non-empty
pub fn brand_from_cookie_header(cookie_header: &str) -> Option<BrandId> {
    read_cookie(cookie_header, BRAND_COOKIE_NAME)
        .filter(|value| !value.is_empty())
        .map(BrandId::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_header_value() {
        let cookie = BrandCookie::new(BrandId::from("zumar"), false);
        assert_eq!(
            cookie.to_header_value().unwrap(),
            "current-brand-id=zumar; SameSite=Lax; Path=/; Max-Age=2592000"
        );

        let secure = BrandCookie::new(BrandId::from("zumar"), true);
        assert_eq!(
            secure.to_header_value().unwrap(),
            "current-brand-id=zumar; SameSite=Lax; Secure; Path=/; Max-Age=2592000"
        );
    }

    #[test]
    fn test_cookie_attributes() {
        let cookie = BrandCookie::new(BrandId::from("mybrand"), true)
            .to_cookie()
            .unwrap();
        assert_eq!(cookie.name(), BRAND_COOKIE_NAME);
        assert_eq!(cookie.value(), "mybrand");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::seconds(2_592_000)));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.secure(), Some(true));
        assert_ne!(cookie.http_only(), Some(true));
    }

    #[test]
    fn test_cookie_is_never_http_only() {
        let header = BrandCookie::new(BrandId::from("mybrand"), true)
            .to_header_value()
            .unwrap();
        assert!(!header.to_ascii_lowercase().contains("httponly"));
    }

    #[test]
    fn test_cookie_encodes_unusual_ids() {
        assert_eq!(
            BrandCookie::new(BrandId::from(""), false).to_header_value(),
            Err(CookieError::EmptyValue)
        );

        let header = BrandCookie::new(BrandId::from("a b;c"), false)
            .to_header_value()
            .unwrap();
        let pair = header.split("; ").next().unwrap();
        assert!(!pair.contains(' '));
        assert_eq!(brand_from_cookie_header(pair), Some(BrandId::from("a b;c")));
    }

    #[test]
    fn test_read_cookie() {
        let header = "theme=dark; current-brand-id=zumar ; other=1";
        assert_eq!(read_cookie(header, "current-brand-id").as_deref(), Some("zumar"));
        assert_eq!(read_cookie(header, "theme").as_deref(), Some("dark"));
        assert_eq!(read_cookie(header, "missing"), None);
        assert_eq!(read_cookie("", "theme"), None);
        assert_eq!(read_cookie("a=\"quoted\"; junk", "a").as_deref(), Some("quoted"));
    }

    #[test]
    fn test_brand_from_cookie_header_ignores_empty_values() {
        assert_eq!(
            brand_from_cookie_header("current-brand-id=mybrand"),
            Some(BrandId::from("mybrand"))
        );
        assert_eq!(brand_from_cookie_header("current-brand-id="), None);
        assert_eq!(brand_from_cookie_header("x-current-brand-id=zumar"), None);
    }
}
