//! Console: owns the dataset and routes every user action through the
//! query and mutation engines.

use std::sync::Arc;

use serde::Serialize;
use srb_common::{CountryId, Result};
use tokio::sync::{Mutex, RwLock};

use crate::api::DataApi;
use crate::dataset::Dataset;
use crate::loader::load_dataset;
use crate::mutation::{
    AddObservation, Added, DeleteRange, Deleted, MutationEngine, UpdateObservation, Updated, DEFAULT_BASE_YEAR,
};
use crate::query::{QueryEngine, QueryOutput, QueryRequest};
use crate::selectors::{update_year_options, SelectOption, Selectors};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleSettings {
    pub base_year: i32,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self { base_year: DEFAULT_BASE_YEAR }
    }
}

/// Collection sizes of the loaded dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DatasetCounts {
    pub regions: usize,
    pub sub_regions: usize,
    pub countries: usize,
    pub observations: usize,
}

pub struct Console {
    api: Arc<dyn DataApi>,
    dataset: RwLock<Dataset>,
    /// Held for the whole plan, remote call and patch of one mutation, so
    /// concurrent adds never derive the same next year.
    mutation_gate: Mutex<()>,
    settings: ConsoleSettings,
}

impl Console {
    /// Loads the full dataset. Fails with `SrbError::Load` if any collection cannot be fetched.
    pub async fn load(api: Arc<dyn DataApi>, settings: ConsoleSettings) -> Result<Self> {
        let dataset = load_dataset(api.as_ref()).await?;
        Ok(Self {
            api,
            dataset: RwLock::new(dataset),
            mutation_gate: Mutex::new(()),
            settings,
        })
    }

    /// Refetches everything and replaces the dataset. On failure the current dataset is kept.
    pub async fn reload(&self) -> Result<()> {
        let _gate = self.mutation_gate.lock().await;
        let fresh = load_dataset(self.api.as_ref()).await?;
        *self.dataset.write().await = fresh;
        Ok(())
    }

    /// Validates first; the dataset is only read for a valid request.
    pub async fn query(&self, request: QueryRequest) -> Result<QueryOutput> {
        let query = request.validate()?;
        let dataset = self.dataset.read().await;
        Ok(QueryEngine::new(&dataset).run(&query))
    }

    pub async fn add(&self, request: AddObservation) -> Result<Added> {
        let _gate = self.mutation_gate.lock().await;
        self.mutations().add(request).await
    }

    pub async fn update(&self, request: UpdateObservation) -> Result<Updated> {
        let _gate = self.mutation_gate.lock().await;
        self.mutations().update(request).await
    }

    pub async fn delete_range(&self, request: DeleteRange) -> Result<Deleted> {
        let _gate = self.mutation_gate.lock().await;
        self.mutations().delete_range(request).await
    }

    pub async fn selectors(&self) -> Selectors {
        Selectors::build(&*self.dataset.read().await)
    }

    pub async fn latest_year(&self, country_id: CountryId) -> Option<i32> {
        self.dataset.read().await.latest_year(country_id)
    }

    pub async fn update_year_options(&self, country_id: CountryId) -> Vec<SelectOption> {
        update_year_options(&*self.dataset.read().await, country_id)
    }

    pub async fn counts(&self) -> DatasetCounts {
        let dataset = self.dataset.read().await;
        DatasetCounts {
            regions: dataset.regions().len(),
            sub_regions: dataset.sub_regions().len(),
            countries: dataset.countries().len(),
            observations: dataset.observations().len(),
        }
    }

    fn mutations(&self) -> MutationEngine<'_> {
        MutationEngine::new(self.api.as_ref(), &self.dataset).with_base_year(self.settings.base_year)
    }
}
