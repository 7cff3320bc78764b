//! Brandmux Client Runtime
//!
//! Session-side brand state for a rendered application: the shared brand
//! cell with persistence and change notifications, the one-shot startup
//! reconciliation, and theme application.

pub mod error;
pub mod reconcile;
pub mod state;
pub mod storage;
pub mod theme;

pub use error::StorageError;
pub use reconcile::{BrandReconciler, ClientContext, ReconcileSource, Reconciliation};
pub use state::{BrandListener, BrandPhase, BrandState, Subscription};
pub use storage::{BrandStorage, FileStorage, MemoryStorage};
pub use theme::{DocumentTheme, ThemeTarget};
