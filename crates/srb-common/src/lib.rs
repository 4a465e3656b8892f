//! srb-common: Shared model types, wire payloads and errors for the SRB console crates.

pub mod error;
pub mod model;
pub mod wire;

// Re-export commonly used types
pub use error::{Result, SrbError};
pub use model::{Country, CountryId, Observation, Region, RegionId, SubRegion, SubRegionId};
