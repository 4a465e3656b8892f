//! Axum router: maps all URL paths to handlers.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{
    dashboard::dashboard,
    manage::{add_observation, delete_range, latest_year, reload, update_observation, update_years},
    query::{country_series, name_search, region_max, sub_region_ranking},
    system::health,
};
use crate::state::{AppState, SharedState};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        // Pages
        .route("/", get(dashboard))

        // Queries (HTML fragments)
        .route("/query/country",   get(country_series))
        .route("/query/subregion", get(sub_region_ranking))
        .route("/query/region",    get(region_max))
        .route("/query/search",    get(name_search))

        // Mutations (JSON notices)
        .route("/manage/add",         post(add_observation))
        .route("/manage/update",      post(update_observation))
        .route("/manage/delete",      post(delete_range))
        .route("/manage/reload",      post(reload))
        .route("/manage/latest-year", get(latest_year))
        .route("/manage/years",       get(update_years))

        .route("/health", get(health))

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
