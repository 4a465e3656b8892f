//! Mutation engine: remote write first, then the same change patched into
//! the local mirror so later queries see it without a refetch.
//!
//! The dataset lock is never held across the remote call: a read guard is
//! taken to plan the write, dropped, and the write guard is taken only for
//! the patch. A failed remote call leaves the mirror untouched. No retries.
//!
//! The engine does not serialize mutations itself; `Console` runs each one
//! under its mutation gate.

use chrono::Utc;
use serde::Serialize;
use srb_common::wire::{DeleteRangePayload, ObservationPayload};
use srb_common::{CountryId, Observation, Result, SrbError};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::api::DataApi;
use crate::dataset::Dataset;
use crate::query::UNKNOWN_COUNTRY;

/// Year the first observation of a country without data is stored one after.
pub const DEFAULT_BASE_YEAR: i32 = 2020;

// ── Requests ─────────────────────────────────────────────────────────────────

/// Add the next year's value for a country. The year is always derived.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddObservation {
    pub country_id: Option<CountryId>,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateObservation {
    pub country_id: Option<CountryId>,
    pub year: Option<i32>,
    pub value: Option<f64>,
}

/// Delete `start_year..=end_year` for a country. The order of the bounds is not checked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteRange {
    pub country_id: Option<CountryId>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
}

fn missing_fields() -> SrbError {
    SrbError::validation("Please fill in all fields.")
}

// ── Outcomes ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Added {
    pub observation: Observation,
    pub country_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Updated {
    pub country_id: CountryId,
    pub year: i32,
    pub value: f64,
    /// False when the mirror had no `(country_id, year)` row; it is stale until reloaded.
    pub mirror_patched: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deleted {
    pub country_id: CountryId,
    pub start_year: i32,
    pub end_year: i32,
    /// Count reported by the remote store.
    pub affected_rows: Option<u64>,
    /// Rows dropped from the mirror by the same predicate.
    pub removed_locally: usize,
}

// ── Engine ───────────────────────────────────────────────────────────────────

pub struct MutationEngine<'a> {
    api: &'a dyn DataApi,
    dataset: &'a RwLock<Dataset>,
    base_year: i32,
}

impl<'a> MutationEngine<'a> {
    pub fn new(api: &'a dyn DataApi, dataset: &'a RwLock<Dataset>) -> Self {
        Self { api, dataset, base_year: DEFAULT_BASE_YEAR }
    }

    pub fn with_base_year(mut self, base_year: i32) -> Self {
        self.base_year = base_year;
        self
    }

    pub async fn add(&self, request: AddObservation) -> Result<Added> {
        let (country_id, value) = match (request.country_id, request.value) {
            (Some(c), Some(v)) => (c, v),
            _ => return Err(missing_fields()),
        };

        let (year, country_name) = {
            let dataset = self.dataset.read().await;
            let name = dataset
                .country(country_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string());
            (dataset.next_year(country_id, self.base_year), name)
        };

        let payload = ObservationPayload { country_id, year, srb_value: value };
        self.api
            .add_observation(&payload)
            .await
            .map_err(|e| remote_failure("add", "Failed to add record.", e))?;

        let observation = {
            let mut dataset = self.dataset.write().await;
            let id = dataset.next_local_id(Utc::now().timestamp_millis());
            let observation = Observation::new(id, country_id, year, value);
            dataset.push_observation(observation.clone());
            observation
        };

        info!(country_id, year, value, "Observation added");
        Ok(Added { observation, country_name })
    }

    pub async fn update(&self, request: UpdateObservation) -> Result<Updated> {
        let (country_id, year, value) = match (request.country_id, request.year, request.value) {
            (Some(c), Some(y), Some(v)) => (c, y, v),
            _ => return Err(missing_fields()),
        };

        let payload = ObservationPayload { country_id, year, srb_value: value };
        self.api.update_observation(&payload).await.map_err(|e| match e {
            SrbError::NotFound { .. } => {
                warn!(country_id, year, "Update target not found remotely");
                e
            }
            other => remote_failure("update", "Failed to update record.", other),
        })?;

        let mirror_patched = self.dataset.write().await.set_value(country_id, year, value);
        if mirror_patched {
            info!(country_id, year, value, "Observation updated");
        } else {
            warn!(country_id, year, "Observation updated remotely but missing from local mirror");
        }

        Ok(Updated { country_id, year, value, mirror_patched })
    }

    pub async fn delete_range(&self, request: DeleteRange) -> Result<Deleted> {
        let (country_id, start_year, end_year) = match (request.country_id, request.start_year, request.end_year) {
            (Some(c), Some(s), Some(e)) => (c, s, e),
            _ => return Err(missing_fields()),
        };

        let payload = DeleteRangePayload { country_id, start_year, end_year };
        let resp = self
            .api
            .delete_observation_range(&payload)
            .await
            .map_err(|e| remote_failure("delete", "Failed to delete records.", e))?;

        let removed_locally = self.dataset.write().await.remove_range(country_id, start_year, end_year);
        info!(
            country_id,
            start_year,
            end_year,
            affected_rows = ?resp.affected_rows,
            removed_locally,
            "Observation range deleted"
        );

        Ok(Deleted {
            country_id,
            start_year,
            end_year,
            affected_rows: resp.affected_rows,
            removed_locally,
        })
    }
}

/// Collapses a remote error into the single message shown to the user.
fn remote_failure(action: &str, rejected: &str, err: SrbError) -> SrbError {
    warn!(action, error = %err, "Remote call failed");
    if err.is_transport() {
        SrbError::RemoteCall("Error connecting to server.".to_string())
    } else {
        SrbError::RemoteCall(rejected.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{QueryEngine, SeriesRow};
    use crate::testing::{sample_dataset, FakeDataApi, Failure};

    fn series(dataset: &Dataset, country_id: CountryId) -> Vec<SeriesRow> {
        QueryEngine::new(dataset).country_series(country_id)
    }

    #[tokio::test]
    async fn test_add_uses_next_year_and_patches_mirror() {
        let api = FakeDataApi::new(sample_dataset());
        let dataset = RwLock::new(sample_dataset());
        let engine = MutationEngine::new(&api, &dataset);

        let added = engine
            .add(AddObservation { country_id: Some(7), value: Some(1.05) })
            .await
            .unwrap();
        assert_eq!(added.observation.year, 2022);
        assert_eq!(added.country_name, "Westmark");

        let ds = dataset.read().await;
        assert_eq!(series(&ds, 7).last(), Some(&SeriesRow { year: 2022, value: 1.05 }));
        assert_eq!(ds.years()[0], 2022);
        assert!(api.remote_observations().iter().any(|o| o.country_id == 7 && o.year == 2022));
    }

    #[tokio::test]
    async fn test_add_for_country_without_data_starts_after_base_year() {
        let api = FakeDataApi::new(sample_dataset());
        let dataset = RwLock::new(sample_dataset());
        let added = MutationEngine::new(&api, &dataset)
            .add(AddObservation { country_id: Some(9), value: Some(1.0) })
            .await
            .unwrap();
        assert_eq!(added.observation.year, 2021);

        let added = MutationEngine::new(&api, &dataset)
            .with_base_year(1999)
            .add(AddObservation { country_id: Some(9), value: Some(1.0) })
            .await
            .unwrap();
        assert_eq!(added.observation.year, 2022);
    }

    #[tokio::test]
    async fn test_add_ids_are_unique() {
        let api = FakeDataApi::new(sample_dataset());
        let dataset = RwLock::new(sample_dataset());
        let engine = MutationEngine::new(&api, &dataset);
        let a = engine.add(AddObservation { country_id: Some(3), value: Some(1.0) }).await.unwrap();
        let b = engine.add(AddObservation { country_id: Some(3), value: Some(1.0) }).await.unwrap();
        assert_ne!(a.observation.observation_id, b.observation.observation_id);
        assert_eq!(b.observation.year, a.observation.year + 1);
    }

    #[tokio::test]
    async fn test_failed_add_leaves_mirror_untouched() {
        let api = FakeDataApi::new(sample_dataset());
        api.fail_next(Failure::Add);
        let dataset = RwLock::new(sample_dataset());

        let err = MutationEngine::new(&api, &dataset)
            .add(AddObservation { country_id: Some(7), value: Some(1.05) })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to add record.");
        assert_eq!(*dataset.read().await, sample_dataset());
    }

    #[tokio::test]
    async fn test_missing_fields_never_reach_remote() {
        let api = FakeDataApi::new(sample_dataset());
        let dataset = RwLock::new(sample_dataset());
        let engine = MutationEngine::new(&api, &dataset);

        assert!(engine.add(AddObservation { country_id: Some(7), value: None }).await.unwrap_err().is_validation());
        assert!(engine
            .update(UpdateObservation { country_id: Some(3), year: None, value: Some(1.1) })
            .await
            .unwrap_err()
            .is_validation());
        assert!(engine
            .delete_range(DeleteRange { country_id: None, start_year: Some(2019), end_year: Some(2020) })
            .await
            .unwrap_err()
            .is_validation());
        assert_eq!(api.calls().total(), 0);
    }

    #[tokio::test]
    async fn test_update_overwrites_value_in_place() {
        let api = FakeDataApi::new(sample_dataset());
        let dataset = RwLock::new(sample_dataset());

        let updated = MutationEngine::new(&api, &dataset)
            .update(UpdateObservation { country_id: Some(3), year: Some(2019), value: Some(1.10) })
            .await
            .unwrap();
        assert!(updated.mirror_patched);

        let ds = dataset.read().await;
        assert_eq!(
            series(&ds, 3),
            vec![SeriesRow { year: 2018, value: 1.03 }, SeriesRow { year: 2019, value: 1.10 }]
        );
    }

    #[tokio::test]
    async fn test_update_of_missing_row_is_not_found() {
        let api = FakeDataApi::new(sample_dataset());
        let dataset = RwLock::new(sample_dataset());

        let err = MutationEngine::new(&api, &dataset)
            .update(UpdateObservation { country_id: Some(3), year: Some(1990), value: Some(1.0) })
            .await
            .unwrap_err();
        assert!(matches!(err, SrbError::NotFound { country_id: 3, year: 1990 }));
        assert_eq!(*dataset.read().await, sample_dataset());
    }

    #[tokio::test]
    async fn test_update_with_stale_mirror_is_reported() {
        let api = FakeDataApi::new(sample_dataset());
        api.insert_remote(9, 2020, 1.01);
        let dataset = RwLock::new(sample_dataset());

        let updated = MutationEngine::new(&api, &dataset)
            .update(UpdateObservation { country_id: Some(9), year: Some(2020), value: Some(1.02) })
            .await
            .unwrap();
        assert!(!updated.mirror_patched);
        assert!(series(&*dataset.read().await, 9).is_empty());
    }

    #[tokio::test]
    async fn test_delete_range_removes_inclusive_years() {
        let api = FakeDataApi::new(sample_dataset());
        let dataset = RwLock::new(sample_dataset());

        let deleted = MutationEngine::new(&api, &dataset)
            .delete_range(DeleteRange { country_id: Some(5), start_year: Some(2019), end_year: Some(2020) })
            .await
            .unwrap();
        assert_eq!(deleted.affected_rows, Some(2));
        assert_eq!(deleted.removed_locally, 2);

        let years: Vec<_> = series(&*dataset.read().await, 5).iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2018, 2021, 2022]);
    }

    #[tokio::test]
    async fn test_failed_delete_leaves_mirror_untouched() {
        let api = FakeDataApi::new(sample_dataset());
        api.fail_next(Failure::Delete);
        let dataset = RwLock::new(sample_dataset());

        let err = MutationEngine::new(&api, &dataset)
            .delete_range(DeleteRange { country_id: Some(5), start_year: Some(2018), end_year: Some(2022) })
            .await
            .unwrap_err();
        assert!(matches!(err, SrbError::RemoteCall(_)));
        assert_eq!(series(&*dataset.read().await, 5).len(), 5);
    }
}
