//! Reference data loader.
//!
//! The four collections are fetched concurrently; `try_join!` is the barrier.
//! The first failure aborts the whole load and nothing is published.

use srb_common::{Result, SrbError};
use tracing::{info, warn};

use crate::api::DataApi;
use crate::dataset::Dataset;

pub async fn load_dataset(api: &dyn DataApi) -> Result<Dataset> {
    let (regions, sub_regions, countries, observations) = tokio::try_join!(
        async { api.list_regions().await.map_err(|e| load_error("regions", e)) },
        async { api.list_sub_regions().await.map_err(|e| load_error("subregions", e)) },
        async { api.list_countries().await.map_err(|e| load_error("countries", e)) },
        async { api.list_observations().await.map_err(|e| load_error("srb-data", e)) },
    )?;

    info!(
        regions = regions.len(),
        sub_regions = sub_regions.len(),
        countries = countries.len(),
        observations = observations.len(),
        "Data loaded"
    );

    Ok(Dataset::new(regions, sub_regions, countries, observations))
}

fn load_error(resource: &str, err: SrbError) -> SrbError {
    warn!(resource, error = %err, "Failed to load reference data");
    SrbError::Load(format!("{}: {}", resource, err))
}
