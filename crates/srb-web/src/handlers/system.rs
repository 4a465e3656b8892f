//! Health endpoint.

use axum::{extract::State, Json};
use serde::Serialize;
use srb_engine::DatasetCounts;

use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(flatten)]
    pub counts: DatasetCounts,
}

/// GET /health
pub async fn health(State(state): State<SharedState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        counts: state.console.counts().await,
    })
}
