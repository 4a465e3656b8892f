//! In-memory `DataApi` for tests.
//!
//! Behaves like the real endpoints against its own copy of the tables:
//! server-side ids, 404 on updates of missing rows, affected row counts on
//! range deletes. Individual calls can be made to fail once with a 500.

use std::sync::Mutex;

use async_trait::async_trait;
use srb_common::wire::{DeleteRangePayload, DeleteRangeResponse, ObservationPayload, SuccessResponse};
use srb_common::{Country, Observation, Region, Result, SrbError, SubRegion};

use crate::api::{DataApi, COUNTRIES_PATH, REGIONS_PATH, SRB_DATA_PATH, SUB_REGIONS_PATH};
use crate::dataset::Dataset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    ListRegions,
    ListSubRegions,
    ListCountries,
    ListObservations,
    Add,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub list: usize,
    pub add: usize,
    pub update: usize,
    pub delete: usize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.list + self.add + self.update + self.delete
    }
}

#[derive(Debug, Default)]
struct FakeState {
    regions: Vec<Region>,
    sub_regions: Vec<SubRegion>,
    countries: Vec<Country>,
    observations: Vec<Observation>,
    next_id: i64,
    pending_failures: Vec<Failure>,
    calls: CallCounts,
}

#[derive(Debug, Default)]
pub struct FakeDataApi {
    state: Mutex<FakeState>,
}

impl FakeDataApi {
    pub fn new(dataset: Dataset) -> Self {
        let next_id = dataset.observations().iter().map(|o| o.observation_id).max().unwrap_or(0) + 1;
        Self {
            state: Mutex::new(FakeState {
                regions: dataset.regions().to_vec(),
                sub_regions: dataset.sub_regions().to_vec(),
                countries: dataset.countries().to_vec(),
                observations: dataset.observations().to_vec(),
                next_id,
                ..FakeState::default()
            }),
        }
    }

    /// Makes the next call of `kind` answer with status 500.
    pub fn fail_next(&self, kind: Failure) {
        self.lock().pending_failures.push(kind);
    }

    pub fn calls(&self) -> CallCounts {
        self.lock().calls
    }

    /// Rows as the remote store currently holds them.
    pub fn remote_observations(&self) -> Vec<Observation> {
        self.lock().observations.clone()
    }

    /// Adds a row on the remote side only, leaving any loaded mirror behind.
    pub fn insert_remote(&self, country_id: i64, year: i32, value: f64) {
        let mut state = self.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.observations.push(Observation::new(id, country_id, year, value));
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake data api state poisoned")
    }

    fn take_failure(state: &mut FakeState, kind: Failure, method: &str, path: &str) -> Result<()> {
        match state.pending_failures.iter().position(|f| *f == kind) {
            Some(idx) => {
                state.pending_failures.remove(idx);
                Err(SrbError::Status { method: method.into(), path: path.into(), status: 500 })
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DataApi for FakeDataApi {
    async fn list_regions(&self) -> Result<Vec<Region>> {
        let mut state = self.lock();
        state.calls.list += 1;
        Self::take_failure(&mut state, Failure::ListRegions, "GET", REGIONS_PATH)?;
        Ok(state.regions.clone())
    }

    async fn list_sub_regions(&self) -> Result<Vec<SubRegion>> {
        let mut state = self.lock();
        state.calls.list += 1;
        Self::take_failure(&mut state, Failure::ListSubRegions, "GET", SUB_REGIONS_PATH)?;
        Ok(state.sub_regions.clone())
    }

    async fn list_countries(&self) -> Result<Vec<Country>> {
        let mut state = self.lock();
        state.calls.list += 1;
        Self::take_failure(&mut state, Failure::ListCountries, "GET", COUNTRIES_PATH)?;
        Ok(state.countries.clone())
    }

    async fn list_observations(&self) -> Result<Vec<Observation>> {
        let mut state = self.lock();
        state.calls.list += 1;
        Self::take_failure(&mut state, Failure::ListObservations, "GET", SRB_DATA_PATH)?;
        Ok(state.observations.clone())
    }

    async fn add_observation(&self, payload: &ObservationPayload) -> Result<SuccessResponse> {
        let mut state = self.lock();
        state.calls.add += 1;
        Self::take_failure(&mut state, Failure::Add, "POST", SRB_DATA_PATH)?;
        let id = state.next_id;
        state.next_id += 1;
        state
            .observations
            .push(Observation::new(id, payload.country_id, payload.year, payload.srb_value));
        Ok(SuccessResponse { success: true })
    }

    async fn update_observation(&self, payload: &ObservationPayload) -> Result<SuccessResponse> {
        let mut state = self.lock();
        state.calls.update += 1;
        Self::take_failure(&mut state, Failure::Update, "PUT", SRB_DATA_PATH)?;
        let mut affected = 0;
        for obs in state
            .observations
            .iter_mut()
            .filter(|o| o.country_id == payload.country_id && o.year == payload.year)
        {
            obs.value = payload.srb_value;
            affected += 1;
        }
        if affected == 0 {
            return Err(SrbError::NotFound { country_id: payload.country_id, year: payload.year });
        }
        Ok(SuccessResponse { success: true })
    }

    async fn delete_observation_range(&self, payload: &DeleteRangePayload) -> Result<DeleteRangeResponse> {
        let mut state = self.lock();
        state.calls.delete += 1;
        Self::take_failure(&mut state, Failure::Delete, "DELETE", SRB_DATA_PATH)?;
        let before = state.observations.len();
        state.observations.retain(|o| {
            !(o.country_id == payload.country_id && o.year >= payload.start_year && o.year <= payload.end_year)
        });
        let affected = (before - state.observations.len()) as u64;
        Ok(DeleteRangeResponse { success: true, affected_rows: Some(affected) })
    }
}

/// Small world used across the engine and web tests.
///
/// - country 3 (Southia) has `(2019, 1.02)`
/// - country 5 (Eastland) has every year 2018..=2022
/// - country 7 (Westmark) ends at 2021
/// - country 9 (Nowhere) has no observations
pub fn sample_dataset() -> Dataset {
    Dataset::new(
        vec![
            Region { region_id: 1, name: "Asia".into() },
            Region { region_id: 2, name: "Europe".into() },
        ],
        vec![
            SubRegion { sub_region_id: 10, region_id: 1, name: "Eastern Asia".into() },
            SubRegion { sub_region_id: 11, region_id: 1, name: "Southern Asia".into() },
            SubRegion { sub_region_id: 20, region_id: 2, name: "Western Europe".into() },
        ],
        vec![
            Country { country_id: 3, sub_region_id: 11, name: "Southia".into() },
            Country { country_id: 5, sub_region_id: 10, name: "Eastland".into() },
            Country { country_id: 7, sub_region_id: 20, name: "Westmark".into() },
            Country { country_id: 9, sub_region_id: 20, name: "Nowhere".into() },
        ],
        vec![
            Observation::new(1, 3, 2018, 1.03),
            Observation::new(2, 3, 2019, 1.02),
            Observation::new(3, 5, 2018, 1.10),
            Observation::new(4, 5, 2019, 1.11),
            Observation::new(5, 5, 2020, 1.12),
            Observation::new(6, 5, 2021, 1.13),
            Observation::new(7, 5, 2022, 1.14),
            Observation::new(8, 7, 2020, 1.06),
            Observation::new(9, 7, 2021, 1.07),
        ],
    )
}
