//! Canned query endpoints. Each returns the result table as an HTML fragment.

use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;
use srb_engine::input::{parse_id, parse_year};
use srb_engine::present::{escape_html, headers, rows, to_html, to_text};
use srb_engine::query::QueryRequest;

use crate::handlers::ApiError;
use crate::state::SharedState;

#[derive(Debug, Deserialize, Default)]
pub struct CountryParams {
    pub country_id: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct SubRegionParams {
    pub sub_region_id: Option<String>,
    pub year: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RegionParams {
    pub region_id: Option<String>,
    pub year: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
    pub keyword: Option<String>,
}

/// GET /query/country
pub async fn country_series(
    State(state): State<SharedState>,
    Query(params): Query<CountryParams>,
) -> Result<Html<String>, ApiError> {
    run(&state, QueryRequest::CountrySeries { country_id: parse_id(params.country_id.as_deref()) }).await
}

/// GET /query/subregion
pub async fn sub_region_ranking(
    State(state): State<SharedState>,
    Query(params): Query<SubRegionParams>,
) -> Result<Html<String>, ApiError> {
    let request = QueryRequest::SubRegionRanking {
        sub_region_id: parse_id(params.sub_region_id.as_deref()),
        year: parse_year(params.year.as_deref()),
    };
    run(&state, request).await
}

/// GET /query/region
pub async fn region_max(
    State(state): State<SharedState>,
    Query(params): Query<RegionParams>,
) -> Result<Html<String>, ApiError> {
    let request = QueryRequest::RegionMax {
        region_id: parse_id(params.region_id.as_deref()),
        year: parse_year(params.year.as_deref()),
    };
    run(&state, request).await
}

/// GET /query/search
pub async fn name_search(
    State(state): State<SharedState>,
    Query(params): Query<SearchParams>,
) -> Result<Html<String>, ApiError> {
    run(&state, QueryRequest::NameSearch { keyword: params.keyword }).await
}

async fn run(state: &SharedState, request: QueryRequest) -> Result<Html<String>, ApiError> {
    let output = state.console.query(request).await?;
    let display_rows = rows(&output);
    tracing::debug!(rows = output.len(), table = %to_text(&display_rows), "Query answered");

    let head: String = headers(&output)
        .iter()
        .map(|h| format!("<th>{}</th>", escape_html(h)))
        .collect();
    Ok(Html(format!(
        r#"<table class="table result-table"><thead><tr>{}</tr></thead><tbody>{}</tbody></table>"#,
        head,
        to_html(&display_rows)
    )))
}
