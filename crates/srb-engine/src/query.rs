//! Query engine: the four canned read-only queries over the in-memory dataset.
//!
//! A `QueryRequest` carries the raw (optional) selections of a form. It must
//! be turned into a `ValidQuery` first; only a `ValidQuery` can be run, so a
//! request with a missing selection never reaches the dataset.
//!
//! All sorts are stable, so rows with equal keys keep dataset order and
//! repeated runs over the same state give identical output.

use serde::Serialize;
use srb_common::{CountryId, RegionId, Result, SrbError, SubRegionId};

use crate::dataset::Dataset;

/// Country name shown when a join finds no country row.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

// ── Requests ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum QueryRequest {
    /// Q1: all observations of one country, oldest first.
    CountrySeries { country_id: Option<CountryId> },
    /// Q2: countries of a sub-region ranked by value, optionally for one year.
    SubRegionRanking { sub_region_id: Option<SubRegionId>, year: Option<i32> },
    /// Q3: per sub-region maximum within a region for one year.
    RegionMax { region_id: Option<RegionId>, year: Option<i32> },
    /// Q4: latest value of every country whose name contains a keyword.
    NameSearch { keyword: Option<String> },
}

/// Case-insensitive, non-empty search keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword(String);

impl Keyword {
    pub fn new(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw.to_lowercase()))
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        name.to_lowercase().contains(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidQuery {
    CountrySeries { country_id: CountryId },
    SubRegionRanking { sub_region_id: SubRegionId, year: Option<i32> },
    RegionMax { region_id: RegionId, year: i32 },
    NameSearch { keyword: Keyword },
}

impl QueryRequest {
    pub fn validate(self) -> Result<ValidQuery> {
        match self {
            QueryRequest::CountrySeries { country_id } => {
                let country_id = country_id.ok_or_else(|| SrbError::validation("Please select a country."))?;
                Ok(ValidQuery::CountrySeries { country_id })
            }
            QueryRequest::SubRegionRanking { sub_region_id, year } => {
                let sub_region_id =
                    sub_region_id.ok_or_else(|| SrbError::validation("Please select a sub-region."))?;
                Ok(ValidQuery::SubRegionRanking { sub_region_id, year })
            }
            QueryRequest::RegionMax { region_id, year } => {
                let region_id = region_id.ok_or_else(|| SrbError::validation("Please select a region."))?;
                let year = year.ok_or_else(|| SrbError::validation("Please select a year."))?;
                Ok(ValidQuery::RegionMax { region_id, year })
            }
            QueryRequest::NameSearch { keyword } => {
                let keyword = keyword
                    .as_deref()
                    .and_then(Keyword::new)
                    .ok_or_else(|| SrbError::validation("Please enter a keyword."))?;
                Ok(ValidQuery::NameSearch { keyword })
            }
        }
    }
}

// ── Result rows ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesRow {
    pub year: i32,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRow {
    /// 1-based position after sorting.
    pub rank: usize,
    pub country: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionMaxRow {
    pub sub_region: String,
    pub max_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestValueRow {
    pub name: String,
    pub year: i32,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "query", content = "rows", rename_all = "snake_case")]
pub enum QueryOutput {
    CountrySeries(Vec<SeriesRow>),
    SubRegionRanking(Vec<RankedRow>),
    RegionMax(Vec<RegionMaxRow>),
    NameSearch(Vec<LatestValueRow>),
}

impl QueryOutput {
    pub fn len(&self) -> usize {
        match self {
            QueryOutput::CountrySeries(rows) => rows.len(),
            QueryOutput::SubRegionRanking(rows) => rows.len(),
            QueryOutput::RegionMax(rows) => rows.len(),
            QueryOutput::NameSearch(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── Engine ───────────────────────────────────────────────────────────────────

/// Read-only view used to answer queries. Never suspends.
pub struct QueryEngine<'a> {
    dataset: &'a Dataset,
}

impl<'a> QueryEngine<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    pub fn run(&self, query: &ValidQuery) -> QueryOutput {
        match query {
            ValidQuery::CountrySeries { country_id } => {
                QueryOutput::CountrySeries(self.country_series(*country_id))
            }
            ValidQuery::SubRegionRanking { sub_region_id, year } => {
                QueryOutput::SubRegionRanking(self.sub_region_ranking(*sub_region_id, *year))
            }
            ValidQuery::RegionMax { region_id, year } => {
                QueryOutput::RegionMax(self.region_max(*region_id, *year))
            }
            ValidQuery::NameSearch { keyword } => QueryOutput::NameSearch(self.latest_by_name(keyword)),
        }
    }

    /// Q1: every observation of the country, ascending by year.
    pub fn country_series(&self, country_id: CountryId) -> Vec<SeriesRow> {
        let mut rows: Vec<SeriesRow> = self
            .dataset
            .observations_for(country_id)
            .map(|o| SeriesRow { year: o.year, value: o.value })
            .collect();
        rows.sort_by_key(|r| r.year);
        rows
    }

    /// Q2: observations of the sub-region's countries (for `year` if given),
    /// descending by value, ranked from 1.
    pub fn sub_region_ranking(&self, sub_region_id: SubRegionId, year: Option<i32>) -> Vec<RankedRow> {
        let members = self.dataset.member_countries(sub_region_id);
        if members.is_empty() {
            return Vec::new();
        }

        let mut matched: Vec<_> = self
            .dataset
            .observations()
            .iter()
            .filter(|o| members.contains(&o.country_id))
            .filter(|o| year.map_or(true, |y| o.year == y))
            .collect();
        matched.sort_by(|a, b| b.value.total_cmp(&a.value));

        matched
            .into_iter()
            .enumerate()
            .map(|(idx, o)| RankedRow {
                rank: idx + 1,
                country: self
                    .dataset
                    .country(o.country_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string()),
                value: o.value,
            })
            .collect()
    }

    /// Q3: for each sub-region of the region (dataset order), the maximum
    /// value among its countries' observations in `year`. Sub-regions with
    /// no observation that year are left out.
    pub fn region_max(&self, region_id: RegionId, year: i32) -> Vec<RegionMaxRow> {
        self.dataset
            .sub_regions()
            .iter()
            .filter(|s| s.region_id == region_id)
            .filter_map(|sub| {
                let members = self.dataset.member_countries(sub.sub_region_id);
                self.dataset
                    .observations()
                    .iter()
                    .filter(|o| o.year == year && members.contains(&o.country_id))
                    .map(|o| o.value)
                    .reduce(f64::max)
                    .map(|max_value| RegionMaxRow { sub_region: sub.name.clone(), max_value })
            })
            .collect()
    }

    /// Q4: for every country whose name contains the keyword, its observation
    /// with the greatest year; descending by value.
    ///
    /// Among several rows sharing the greatest year, the one appearing last in
    /// the dataset wins.
    pub fn latest_by_name(&self, keyword: &Keyword) -> Vec<LatestValueRow> {
        let mut rows: Vec<LatestValueRow> = self
            .dataset
            .countries()
            .iter()
            .filter(|c| keyword.matches(&c.name))
            .filter_map(|c| {
                let latest = self
                    .dataset
                    .observations_for(c.country_id)
                    .fold(None, |best: Option<&srb_common::Observation>, o| match best {
                        Some(b) if b.year > o.year => Some(b),
                        _ => Some(o),
                    })?;
                Some(LatestValueRow { name: c.name.clone(), year: latest.year, value: latest.value })
            })
            .collect();
        rows.sort_by(|a, b| b.value.total_cmp(&a.value));
        rows
    }
}
