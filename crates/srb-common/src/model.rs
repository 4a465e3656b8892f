//! Reference tables and SRB observations as served by the data API.
//!
//! The geographic hierarchy is a strict tree: every country has exactly one
//! sub-region, every sub-region exactly one region.

use serde::{Deserialize, Serialize};

use crate::wire::lenient_f64;

pub type RegionId = i64;
pub type SubRegionId = i64;
pub type CountryId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub region_id: RegionId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubRegion {
    pub sub_region_id: SubRegionId,
    pub region_id: RegionId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub country_id: CountryId,
    pub sub_region_id: SubRegionId,
    pub name: String,
}

/// One `(country, year, value)` data point.
///
/// Rows created by this client carry a locally generated id, not the row id
/// the remote store assigned. Anything that needs stable ids must refetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    #[serde(rename = "srb_id")]
    pub observation_id: i64,
    pub country_id: CountryId,
    pub year: i32,
    #[serde(rename = "srb_value", deserialize_with = "lenient_f64")]
    pub value: f64,
}

impl Observation {
    pub fn new(observation_id: i64, country_id: CountryId, year: i32, value: f64) -> Self {
        Self { observation_id, country_id, year, value }
    }
}
