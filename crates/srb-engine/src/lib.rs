//! srb-engine: In-memory SRB dataset with canned queries and mirrored mutations.
//!
//! - Reference data loading (four parallel fetches behind one join barrier)
//! - Selector lists and year derivation
//! - Query engine (country series, sub-region ranking, region maximum, name search)
//! - Mutation engine (add / update / delete range, patched into the local mirror)
//! - Presentation of query output as table rows

pub mod api;
pub mod console;
pub mod dataset;
pub mod input;
pub mod loader;
pub mod mutation;
pub mod present;
pub mod query;
pub mod selectors;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use api::{ApiSettings, DataApi, HttpDataApi};
pub use console::{Console, ConsoleSettings, DatasetCounts};
pub use dataset::Dataset;
pub use query::{QueryEngine, QueryOutput, QueryRequest};
