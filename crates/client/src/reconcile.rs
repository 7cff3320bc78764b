//! Client Reconciliation
//!
//! Runs once at application bootstrap, before first paint, after the server
//! hint is known. Precedence, highest first:
//! - `?brand=<id>` query override, accepted unvalidated
//! - the already established value (server hint or persisted choice)
//! - domain detection: the brand cookie, then the page hostname
//!
//! The outcome is persisted (known ids only) and broadcast to listeners.

use std::sync::atomic::{AtomicBool, Ordering};

use brandmux_shared::{brand_from_cookie_header, normalize_host, BrandId, BRAND_QUERY_PARAM};
use url::Url;

use crate::state::{BrandPhase, BrandState};

/// Signals available to the client at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientContext {
    /// Value of the `brand` query parameter
    pub query_override: Option<BrandId>,
    /// Raw `document.cookie` string
    pub cookies: Option<String>,
    /// Hostname of the page
    pub hostname: Option<String>,
    /// Initial hint from server-side resolution
    pub server_hint: Option<BrandId>,
}

impl ClientContext {
    /// Query override and hostname from the page URL
    pub fn from_url(url: &Url) -> Self {
        let query_override = url
            .query_pairs()
            .find(|(name, _)| name == BRAND_QUERY_PARAM)
            .map(|(_, value)| BrandId::new(value.into_owned()))
            .filter(|id| !id.is_empty());

        Self {
            query_override,
            hostname: url.host_str().map(normalize_host),
            ..Self::default()
        }
    }

    pub fn with_cookies(mut self, cookies: impl Into<String>) -> Self {
        self.cookies = Some(cookies.into());
        self
    }

    pub fn with_server_hint(mut self, hint: Option<BrandId>) -> Self {
        self.server_hint = hint.filter(|id| !id.is_empty());
        self
    }
}

/// Which signal decided the brand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileSource {
    QueryOverride,
    /// Server hint or restored persisted value
    Established,
    Cookie,
    Hostname,
    /// Nothing matched; reads use the default brand
    Default,
    /// `initialize` already ran
    AlreadyInitialized,
}

/// Outcome of reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Identifier reported by `BrandState::get` afterwards
    pub brand_id: BrandId,
    pub source: ReconcileSource,
}

/// One-shot startup reconciliation over a `BrandState`
#[derive(Debug)]
pub struct BrandReconciler {
    state: BrandState,
    initialized: AtomicBool,
}

impl BrandReconciler {
    pub fn new(state: BrandState) -> Self {
        Self {
            state,
            initialized: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> &BrandState {
        &self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Reconcile the brand. Only the first call has any effect.
    pub fn initialize(&self, context: ClientContext) -> Reconciliation {
        if self.initialized.swap(true, Ordering::SeqCst) {
            tracing::debug!("Brand reconciliation already ran");
            return Reconciliation {
                brand_id: self.state.get(),
                source: ReconcileSource::AlreadyInitialized,
            };
        }

        if let Some(hint) = context.server_hint.clone() {
            self.state.apply_provisional(hint);
        }

        let (chosen, source) = self.choose(&context);
        match chosen {
            Some(brand_id) if source == ReconcileSource::QueryOverride => {
                self.state.commit(brand_id, BrandPhase::Overridden)
            }
            Some(brand_id) => self.state.commit(brand_id, BrandPhase::Reconciled),
            None => self.state.advance(BrandPhase::Reconciled),
        }

        let brand_id = self.state.get();
        tracing::info!(
            brand_id = %brand_id,
            source = ?source,
            phase = ?self.state.phase(),
            "Brand reconciled"
        );

        Reconciliation { brand_id, source }
    }

    fn choose(&self, context: &ClientContext) -> (Option<BrandId>, ReconcileSource) {
        if let Some(brand_id) = &context.query_override {
            return (Some(brand_id.clone()), ReconcileSource::QueryOverride);
        }

        if let Some(brand_id) = self.state.raw() {
            return (Some(brand_id), ReconcileSource::Established);
        }

        if let Some(brand_id) = context.cookies.as_deref().and_then(brand_from_cookie_header) {
            return (Some(brand_id), ReconcileSource::Cookie);
        }

        if let Some(brand_id) = context
            .hostname
            .as_deref()
            .and_then(|host| self.state.registry().hostnames().resolve(host))
        {
            return (Some(brand_id), ReconcileSource::Hostname);
        }

        (None, ReconcileSource::Default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use brandmux_shared::BrandRegistry;
    use std::sync::Arc;

    fn reconciler() -> (BrandReconciler, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let state = BrandState::new(Arc::new(BrandRegistry::builtin().unwrap()), storage.clone());
        (BrandReconciler::new(state), storage)
    }

    #[test]
    fn test_context_from_url() {
        let url = Url::parse("https://Zumar.Local:8443/plans?brand=mybrand&x=1").unwrap();
        let context = ClientContext::from_url(&url);
        assert_eq!(context.query_override, Some(BrandId::from("mybrand")));
        assert_eq!(context.hostname.as_deref(), Some("zumar.local"));

        let url = Url::parse("https://zumar.local/?brand=").unwrap();
        assert_eq!(ClientContext::from_url(&url).query_override, None);
    }

    #[test]
    fn test_hostname_detection() {
        let (reconciler, storage) = reconciler();
        let url = Url::parse("https://connectwise.com/").unwrap();

        let outcome = reconciler.initialize(ClientContext::from_url(&url));
        assert_eq!(outcome.brand_id, BrandId::from("connectwise"));
        assert_eq!(outcome.source, ReconcileSource::Hostname);
        assert_eq!(storage.value(), Some(BrandId::from("connectwise")));
        assert_eq!(reconciler.state().phase(), BrandPhase::Reconciled);
    }

    #[test]
    fn test_server_hint_is_kept() {
        let (reconciler, storage) = reconciler();
        let url = Url::parse("https://connectwise.com/").unwrap();
        let context = ClientContext::from_url(&url)
            .with_cookies("current-brand-id=mybrand")
            .with_server_hint(Some(BrandId::from("zumar")));

        let outcome = reconciler.initialize(context);
        assert_eq!(outcome.brand_id, BrandId::from("zumar"));
        assert_eq!(outcome.source, ReconcileSource::Established);
        assert_eq!(storage.value(), Some(BrandId::from("zumar")));
    }

    #[test]
    fn test_nothing_matches() {
        let (reconciler, storage) = reconciler();
        let url = Url::parse("http://localhost:3000/").unwrap();

        let outcome = reconciler.initialize(ClientContext::from_url(&url));
        assert_eq!(outcome.brand_id, BrandId::from("mybrand"));
        assert_eq!(outcome.source, ReconcileSource::Default);
        assert_eq!(reconciler.state().raw(), None);
        assert_eq!(storage.value(), None);
        assert_eq!(reconciler.state().phase(), BrandPhase::Reconciled);
    }

    #[test]
    fn test_second_initialize_is_noop() {
        let (reconciler, _) = reconciler();
        let first = Url::parse("https://zumar.local/").unwrap();
        let second = Url::parse("https://zumar.local/?brand=connectwise").unwrap();

        assert!(!reconciler.is_initialized());
        reconciler.initialize(ClientContext::from_url(&first));
        assert!(reconciler.is_initialized());

        let outcome = reconciler.initialize(ClientContext::from_url(&second));
        assert_eq!(outcome.source, ReconcileSource::AlreadyInitialized);
        assert_eq!(outcome.brand_id, BrandId::from("zumar"));
    }
}
