//! srb-web: Administrative console for SRB data.
//! Serves:
//!   - Query pages (country series, sub-region ranking, region maximum, name search)
//!   - Manage forms (add next year, update a year, delete a year range)
//!   - Health endpoint with dataset counts

pub mod config;
pub mod handlers;
pub mod router;
pub mod state;
