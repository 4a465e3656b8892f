//! Selection lists for the console forms.

use serde::Serialize;
use srb_common::{Country, CountryId, Region, SubRegion};

use crate::dataset::Dataset;

/// Label of the leading "no selection" entry of every list.
pub const PLACEHOLDER_LABEL: &str = "-- Select --";

/// One `<option>`: `value` is `None` for the placeholder entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub value: Option<i64>,
    pub label: String,
}

impl SelectOption {
    pub fn placeholder(label: &str) -> Self {
        Self { value: None, label: label.to_string() }
    }
}

/// A row that can appear in a selection list.
pub trait Selectable {
    fn selector_id(&self) -> i64;
    fn display_name(&self) -> &str;
}

impl Selectable for Region {
    fn selector_id(&self) -> i64 { self.region_id }
    fn display_name(&self) -> &str { &self.name }
}

impl Selectable for SubRegion {
    fn selector_id(&self) -> i64 { self.sub_region_id }
    fn display_name(&self) -> &str { &self.name }
}

impl Selectable for Country {
    fn selector_id(&self) -> i64 { self.country_id }
    fn display_name(&self) -> &str { &self.name }
}

/// `(id, name)` options in collection order, prefixed by the placeholder.
pub fn populate<T: Selectable>(items: &[T]) -> Vec<SelectOption> {
    std::iter::once(SelectOption::placeholder(PLACEHOLDER_LABEL))
        .chain(items.iter().map(|item| SelectOption {
            value: Some(item.selector_id()),
            label: item.display_name().to_string(),
        }))
        .collect()
}

pub fn year_options(years: &[i32]) -> Vec<SelectOption> {
    std::iter::once(SelectOption::placeholder(PLACEHOLDER_LABEL))
        .chain(years.iter().map(|&y| SelectOption {
            value: Some(i64::from(y)),
            label: y.to_string(),
        }))
        .collect()
}

/// Year choices of the update form: the country's rows, newest first,
/// labelled with their current value.
pub fn update_year_options(dataset: &Dataset, country_id: CountryId) -> Vec<SelectOption> {
    let mut records: Vec<_> = dataset.observations_for(country_id).collect();
    records.sort_by(|a, b| b.year.cmp(&a.year));

    std::iter::once(SelectOption::placeholder("Select"))
        .chain(records.into_iter().map(|o| SelectOption {
            value: Some(i64::from(o.year)),
            label: format!("{} (Val: {})", o.year, o.value),
        }))
        .collect()
}

/// Every list the console page needs, derived from one dataset snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selectors {
    pub countries: Vec<SelectOption>,
    pub sub_regions: Vec<SelectOption>,
    pub regions: Vec<SelectOption>,
    pub years: Vec<SelectOption>,
}

impl Selectors {
    pub fn build(dataset: &Dataset) -> Self {
        Self {
            countries: populate(dataset.countries()),
            sub_regions: populate(dataset.sub_regions()),
            regions: populate(dataset.regions()),
            years: year_options(dataset.years()),
        }
    }
}
