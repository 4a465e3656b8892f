//! Request and response bodies of the `/api/srb-data` endpoints.

use serde::{Deserialize, Deserializer, Serialize};

use crate::model::CountryId;

/// Body of `POST` and `PUT /api/srb-data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationPayload {
    pub country_id: CountryId,
    pub year: i32,
    pub srb_value: f64,
}

/// Body of `DELETE /api/srb-data`. Both bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteRangePayload {
    pub country_id: CountryId,
    pub start_year: i32,
    pub end_year: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuccessResponse {
    #[serde(default)]
    pub success: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteRangeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(rename = "affectedRows", default)]
    pub affected_rows: Option<u64>,
}

/// MySQL DECIMAL columns arrive as JSON strings; accept either form.
/// NaN and infinities are rejected.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    let value = match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => n,
        NumberOrString::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid number {:?}: {}", s, e)))?,
    };
    if !value.is_finite() {
        return Err(serde::de::Error::custom(format!("non-finite number {}", value)));
    }
    Ok(value)
}
