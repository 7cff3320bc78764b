//! Shared Brand State
//!
//! One explicit, constructor-injected cell holding the chosen brand for a
//! client session. Reads go through the registry's fallback logic, so an
//! unset or unknown identifier reads as the default brand; the raw cell keeps
//! "nothing chosen yet" apart from "explicitly chosen".
//!
//! Cloning a `BrandState` yields another handle onto the same cell.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    sync::{Arc, Mutex, PoisonError, RwLock, Weak},
};

use brandmux_shared::{
    generate_theme_variables, BrandAssets, BrandDefinition, BrandId, BrandRegistry, ColorScheme,
    LogoVariant,
};
use uuid::Uuid;

use crate::{storage::BrandStorage, theme::ThemeTarget};

/// Callback invoked with the new raw identifier after every change
pub type BrandListener = Arc<dyn Fn(&BrandId) + Send + Sync>;

/// Lifecycle of the brand cell. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BrandPhase {
    /// Nothing applied this session (a persisted value may still be loaded)
    Unresolved,
    /// Server hint applied, awaiting client reconciliation
    Provisional,
    /// Client reconciliation finished
    Reconciled,
    /// Explicitly set by a query override or a caller
    Overridden,
}

#[derive(Debug)]
struct Cell {
    brand_id: Option<BrandId>,
    phase: BrandPhase,
}

struct Inner {
    registry: Arc<BrandRegistry>,
    storage: Arc<dyn BrandStorage>,
    // Held for a whole write: cell update, persistence and notification
    writer: Mutex<()>,
    cell: RwLock<Cell>,
    listeners: Mutex<HashMap<Uuid, BrandListener>>,
}

/// Handle onto the session's brand cell
#[derive(Clone)]
pub struct BrandState {
    inner: Arc<Inner>,
}

impl fmt::Debug for BrandState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cell = self.read_cell();
        f.debug_struct("BrandState")
            .field("brand_id", &cell.brand_id)
            .field("phase", &cell.phase)
            .finish()
    }
}

impl BrandState {
    /// Create the state, restoring the persisted identifier when it names a
    /// registered brand
    pub fn new(registry: Arc<BrandRegistry>, storage: Arc<dyn BrandStorage>) -> Self {
        let restored = match storage.load() {
            Ok(Some(brand_id)) if registry.is_known(brand_id.as_str()) => Some(brand_id),
            Ok(Some(brand_id)) => {
                tracing::debug!(brand_id = %brand_id, "Ignoring unknown persisted brand");
                None
            }
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to read persisted brand");
                None
            }
        };

        Self {
            inner: Arc::new(Inner {
                registry,
                storage,
                writer: Mutex::new(()),
                cell: RwLock::new(Cell {
                    brand_id: restored,
                    phase: BrandPhase::Unresolved,
                }),
                listeners: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn registry(&self) -> &BrandRegistry {
        &self.inner.registry
    }

    // ========================================================================
    // Cell contract
    // ========================================================================

    /// Current identifier; the default brand's id when nothing is set
    pub fn get(&self) -> BrandId {
        self.raw()
            .unwrap_or_else(|| self.inner.registry.default_brand().id.clone())
    }

    /// Raw cell contents, which may be unset or name an unknown brand
    pub fn raw(&self) -> Option<BrandId> {
        self.read_cell().brand_id.clone()
    }

    /// Whether a brand has been chosen (restored, hinted or set)
    pub fn is_established(&self) -> bool {
        self.read_cell().brand_id.is_some()
    }

    pub fn phase(&self) -> BrandPhase {
        self.read_cell().phase
    }

    /// Explicitly choose a brand.
    ///
    /// The raw value is accepted as-is; an unknown id reads as the default
    /// brand. Only known ids are persisted.
    pub fn set(&self, brand_id: impl Into<BrandId>) {
        self.commit(brand_id.into(), BrandPhase::Overridden);
    }

    /// Forget the chosen brand: clears persisted storage and unsets the cell.
    ///
    /// Listeners receive the default brand's id, which is what reads return
    /// afterwards. The phase is left as is.
    pub fn clear(&self) {
        let _writer = self.lock_writer();

        self.write_cell().brand_id = None;
        if let Err(err) = self.inner.storage.clear() {
            tracing::warn!(error = %err, "Failed to clear persisted brand");
        }

        let default_id = self.inner.registry.default_brand().id.clone();
        self.notify(&default_id);
    }

    /// Register a listener; it stays attached until the handle is dropped.
    ///
    /// Listeners run while the state's write lock is held: they may read the
    /// state but must not write to it.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&BrandId) + Send + Sync + 'static,
    {
        let id = Uuid::new_v4();
        self.lock_listeners().insert(id, Arc::new(listener));
        Subscription {
            id,
            state: Arc::downgrade(&self.inner),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.lock_listeners().len()
    }

    /// Apply the server hint without persisting it
    pub(crate) fn apply_provisional(&self, brand_id: BrandId) {
        let _writer = self.lock_writer();
        {
            let mut cell = self.write_cell();
            cell.brand_id = Some(brand_id.clone());
            cell.phase = cell.phase.max(BrandPhase::Provisional);
        }
        self.notify(&brand_id);
    }

    /// Store, persist and broadcast a value at the given phase
    pub(crate) fn commit(&self, brand_id: BrandId, phase: BrandPhase) {
        let _writer = self.lock_writer();
        {
            let mut cell = self.write_cell();
            cell.brand_id = Some(brand_id.clone());
            cell.phase = cell.phase.max(phase);
        }

        if self.inner.registry.is_known(brand_id.as_str()) {
            if let Err(err) = self.inner.storage.store(&brand_id) {
                tracing::warn!(brand_id = %brand_id, error = %err, "Failed to persist brand");
            }
        } else {
            tracing::debug!(brand_id = %brand_id, "Not persisting unknown brand");
        }

        self.notify(&brand_id);
    }

    /// Move the phase forward without changing the value
    pub(crate) fn advance(&self, phase: BrandPhase) {
        let _writer = self.lock_writer();
        let mut cell = self.write_cell();
        cell.phase = cell.phase.max(phase);
    }

    fn notify(&self, brand_id: &BrandId) {
        // Snapshot so listeners may subscribe or unsubscribe
        let listeners: Vec<BrandListener> = self.lock_listeners().values().cloned().collect();
        for listener in listeners {
            listener(brand_id);
        }
    }

    fn lock_writer(&self) -> std::sync::MutexGuard<'_, ()> {
        self.inner.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_cell(&self) -> std::sync::RwLockReadGuard<'_, Cell> {
        self.inner.cell.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_cell(&self) -> std::sync::RwLockWriteGuard<'_, Cell> {
        self.inner.cell.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_listeners(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, BrandListener>> {
        self.inner.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ========================================================================
    // Collaborator helpers
    // ========================================================================

    /// Definition for the current brand, falling back to the default
    pub fn current_brand(&self) -> &BrandDefinition {
        let brand_id = self.raw();
        self.inner
            .registry
            .lookup_or_default(brand_id.as_ref().map(BrandId::as_str))
    }

    pub fn all_brands(&self) -> &[BrandDefinition] {
        self.inner.registry.all()
    }

    pub fn set_current_brand(&self, brand_id: impl Into<BrandId>) {
        self.set(brand_id);
    }

    pub fn brand_colors(&self, brand_id: &str) -> Option<&ColorScheme> {
        self.inner
            .registry
            .lookup(brand_id)
            .map(|brand| &brand.color_scheme)
    }

    pub fn brand_assets(&self, brand_id: &str) -> Option<&BrandAssets> {
        self.inner.registry.lookup(brand_id).map(|brand| &brand.assets)
    }

    pub fn current_colors(&self) -> &ColorScheme {
        &self.current_brand().color_scheme
    }

    pub fn current_assets(&self) -> &BrandAssets {
        &self.current_brand().assets
    }

    /// Feature flag of the current brand; missing flags are off
    pub fn has_feature(&self, feature: &str) -> bool {
        self.current_brand().has_feature(feature)
    }

    /// Setting of the current brand, else the default brand's
    pub fn get_setting(&self, name: &str) -> Option<&serde_json::Value> {
        self.current_brand()
            .setting(name)
            .or_else(|| self.inner.registry.default_brand().setting(name))
    }

    pub fn logo(&self, variant: LogoVariant) -> &str {
        self.current_brand().logo(variant)
    }

    pub fn favicon(&self) -> &str {
        &self.current_assets().logo.favicon
    }

    /// Theme variables for the current brand
    pub fn generate_theme_variables(&self) -> BTreeMap<String, String> {
        generate_theme_variables(self.current_colors())
    }

    /// Write the current theme variables and favicon onto a document
    pub fn apply_theme(&self, target: &mut dyn ThemeTarget) {
        let brand = self.current_brand();
        let variables = generate_theme_variables(&brand.color_scheme);
        for (name, value) in &variables {
            target.set_variable(name, value);
        }
        target.set_favicon(&brand.assets.logo.favicon);

        tracing::debug!(
            brand_id = %brand.id,
            variables = variables.len(),
            "Applied brand theme"
        );
    }
}

/// Listener registration; detaches on drop
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: Uuid,
    state: Weak<Inner>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.state.upgrade() {
            inner
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
