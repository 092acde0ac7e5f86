//! Catalog read endpoint.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use showreel_catalog::application::query_handlers::{CatalogView, catalog_view};

use crate::state::AppState;

/// GET /
async fn get_catalog(State(state): State<AppState>) -> Json<CatalogView> {
    Json(catalog_view(&state.catalog))
}

/// Returns the router for the catalog.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_catalog))
}
