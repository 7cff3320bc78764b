//! Brand lookup and bootstrap endpoints

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use brandmux_shared::{generate_theme_variables, BrandDefinition, BrandId};
use serde::Serialize;

use crate::{
    error::{ApiError, ApiResult},
    routing::{resolve_initial_brand, HintSource},
    state::AppState,
};

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct BrandListResponse {
    pub default_brand_id: BrandId,
    pub brands: Vec<BrandDefinition>,
}

/// Everything the render boundary needs for first paint
#[derive(Debug, Serialize)]
pub struct BootstrapResponse {
    /// Provisional hint for the client; `null` means no signal matched
    pub initial_brand_id: Option<BrandId>,
    pub source: Option<HintSource>,
    /// Definition for the hint, or the default brand when the hint is unknown
    pub brand: BrandDefinition,
    pub theme: BTreeMap<String, String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// All brands in registration order
pub async fn list_brands(State(state): State<AppState>) -> Json<BrandListResponse> {
    Json(BrandListResponse {
        default_brand_id: state.registry.default_brand().id.clone(),
        brands: state.registry.all().to_vec(),
    })
}

/// One brand by id
pub async fn get_brand(
    State(state): State<AppState>,
    Path(brand_id): Path<String>,
) -> ApiResult<Json<BrandDefinition>> {
    state
        .registry
        .lookup(&brand_id)
        .cloned()
        .map(Json)
        .ok_or(ApiError::BrandNotFound(brand_id))
}

/// Theme variables for one brand
pub async fn get_brand_theme(
    State(state): State<AppState>,
    Path(brand_id): Path<String>,
) -> ApiResult<Json<BTreeMap<String, String>>> {
    let brand = state
        .registry
        .lookup(&brand_id)
        .ok_or_else(|| ApiError::BrandNotFound(brand_id.clone()))?;
    Ok(Json(generate_theme_variables(&brand.color_scheme)))
}

/// Server-side resolution for the render boundary
pub async fn bootstrap(State(state): State<AppState>, headers: HeaderMap) -> Json<BootstrapResponse> {
    let initial = resolve_initial_brand(&headers, state.registry.hostnames());
    let brand = state
        .registry
        .lookup_or_default(initial.brand_id.as_ref().map(BrandId::as_str))
        .clone();

    tracing::debug!(
        initial_brand_id = ?initial.brand_id,
        source = ?initial.source,
        brand_id = %brand.id,
        "Resolved initial brand"
    );

    Json(BootstrapResponse {
        initial_brand_id: initial.brand_id,
        source: initial.source,
        theme: generate_theme_variables(&brand.color_scheme),
        brand,
    })
}
