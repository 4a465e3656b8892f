//! Manage forms: add the next year, update one year, delete a year range.
//!
//! Every mutation answers with a single JSON notice.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Form, Json,
};
use serde::{Deserialize, Serialize};
use srb_engine::input::{parse_id, parse_value, parse_year};
use srb_engine::mutation::{AddObservation, DeleteRange, UpdateObservation};
use srb_engine::present::Notice;
use srb_engine::selectors::SelectOption;

use crate::handlers::{status_for, ApiError};
use crate::state::SharedState;

#[derive(Debug, Deserialize, Default)]
pub struct AddForm {
    pub country_id: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateForm {
    pub country_id: Option<String>,
    pub year: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct DeleteForm {
    pub country_id: Option<String>,
    pub start_year: Option<String>,
    pub end_year: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct CountryParams {
    pub country_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LatestYear {
    pub country_id: i64,
    pub latest_year: Option<i32>,
    /// What the add form shows next to the country: the year or `--`.
    pub label: String,
}

type NoticeResponse = (StatusCode, Json<Notice>);

fn respond<T>(result: &srb_common::Result<T>, notice: Notice) -> NoticeResponse {
    let status = match result {
        Ok(_) => StatusCode::OK,
        Err(e) => status_for(e),
    };
    (status, Json(notice))
}

/// POST /manage/add
pub async fn add_observation(State(state): State<SharedState>, Form(form): Form<AddForm>) -> NoticeResponse {
    let request = AddObservation {
        country_id: parse_id(form.country_id.as_deref()),
        value: parse_value(form.value.as_deref()),
    };
    let result = state.console.add(request).await;
    respond(&result, Notice::added(&result))
}

/// POST /manage/update
pub async fn update_observation(
    State(state): State<SharedState>,
    Form(form): Form<UpdateForm>,
) -> NoticeResponse {
    let request = UpdateObservation {
        country_id: parse_id(form.country_id.as_deref()),
        year: parse_year(form.year.as_deref()),
        value: parse_value(form.value.as_deref()),
    };
    let result = state.console.update(request).await;
    respond(&result, Notice::updated(&result))
}

/// POST /manage/delete
pub async fn delete_range(State(state): State<SharedState>, Form(form): Form<DeleteForm>) -> NoticeResponse {
    let request = DeleteRange {
        country_id: parse_id(form.country_id.as_deref()),
        start_year: parse_year(form.start_year.as_deref()),
        end_year: parse_year(form.end_year.as_deref()),
    };
    let result = state.console.delete_range(request).await;
    respond(&result, Notice::deleted(&result))
}

/// POST /manage/reload
pub async fn reload(State(state): State<SharedState>) -> NoticeResponse {
    let result = state.console.reload().await;
    let notice = match &result {
        Ok(()) => Notice::success("Data reloaded."),
        Err(e) => Notice::from_error(e),
    };
    respond(&result, notice)
}

/// GET /manage/latest-year
pub async fn latest_year(
    State(state): State<SharedState>,
    Query(params): Query<CountryParams>,
) -> Result<Json<LatestYear>, ApiError> {
    let country_id = parse_id(params.country_id.as_deref())
        .ok_or_else(|| srb_common::SrbError::validation("Please select a country."))?;
    let latest_year = state.console.latest_year(country_id).await;
    Ok(Json(LatestYear {
        country_id,
        latest_year,
        label: latest_year.map_or_else(|| "--".to_string(), |y| y.to_string()),
    }))
}

/// GET /manage/years: year options of the update form.
pub async fn update_years(
    State(state): State<SharedState>,
    Query(params): Query<CountryParams>,
) -> Result<Json<Vec<SelectOption>>, ApiError> {
    let country_id = parse_id(params.country_id.as_deref())
        .ok_or_else(|| srb_common::SrbError::validation("Please select a country."))?;
    Ok(Json(state.console.update_year_options(country_id).await))
}
