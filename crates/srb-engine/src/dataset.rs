//! The owned in-memory dataset: four collections loaded once per session.
//!
//! Regions, sub-regions and countries are read-only after load. Observations
//! are the mirror of the remote `SRB_Data` table and change only through the
//! `pub(crate)` patch methods below, which the mutation engine calls after
//! its remote call succeeded.

use std::collections::BTreeSet;

use srb_common::{Country, CountryId, Observation, Region, SubRegion, SubRegionId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    regions: Vec<Region>,
    sub_regions: Vec<SubRegion>,
    countries: Vec<Country>,
    observations: Vec<Observation>,
    /// Distinct observation years, most recent first.
    years: Vec<i32>,
}

impl Dataset {
    pub fn new(
        regions: Vec<Region>,
        sub_regions: Vec<SubRegion>,
        countries: Vec<Country>,
        observations: Vec<Observation>,
    ) -> Self {
        let mut dataset = Self {
            regions,
            sub_regions,
            countries,
            observations,
            years: Vec::new(),
        };
        dataset.refresh_years();
        dataset
    }

    // ── Collections ──────────────────────────────────────────────────────────

    pub fn regions(&self) -> &[Region] { &self.regions }

    pub fn sub_regions(&self) -> &[SubRegion] { &self.sub_regions }

    pub fn countries(&self) -> &[Country] { &self.countries }

    pub fn observations(&self) -> &[Observation] { &self.observations }

    // ── Lookups ──────────────────────────────────────────────────────────────

    pub fn country(&self, country_id: CountryId) -> Option<&Country> {
        self.countries.iter().find(|c| c.country_id == country_id)
    }

    /// Ids of the countries belonging to `sub_region_id`, in dataset order.
    pub fn member_countries(&self, sub_region_id: SubRegionId) -> Vec<CountryId> {
        self.countries
            .iter()
            .filter(|c| c.sub_region_id == sub_region_id)
            .map(|c| c.country_id)
            .collect()
    }

    pub fn observations_for(&self, country_id: CountryId) -> impl Iterator<Item = &Observation> {
        self.observations.iter().filter(move |o| o.country_id == country_id)
    }

    /// Distinct observation years, sorted descending.
    pub fn years(&self) -> &[i32] { &self.years }

    /// Most recent year recorded for a country, `None` if it has no observations.
    pub fn latest_year(&self, country_id: CountryId) -> Option<i32> {
        self.observations_for(country_id).map(|o| o.year).max()
    }

    /// Year the next added observation for `country_id` gets.
    pub fn next_year(&self, country_id: CountryId, base_year: i32) -> i32 {
        self.latest_year(country_id).unwrap_or(base_year) + 1
    }

    /// A millisecond timestamp id that no current observation uses.
    pub fn next_local_id(&self, now_millis: i64) -> i64 {
        let highest = self.observations.iter().map(|o| o.observation_id).max();
        match highest {
            Some(id) if id >= now_millis => id + 1,
            _ => now_millis,
        }
    }

    // ── Mirror patches ───────────────────────────────────────────────────────

    pub(crate) fn push_observation(&mut self, observation: Observation) {
        self.observations.push(observation);
        self.refresh_years();
    }

    /// Overwrites the value of the first `(country_id, year)` row.
    /// Returns false when the mirror has no such row.
    pub(crate) fn set_value(&mut self, country_id: CountryId, year: i32, value: f64) -> bool {
        match self
            .observations
            .iter_mut()
            .find(|o| o.country_id == country_id && o.year == year)
        {
            Some(obs) => {
                obs.value = value;
                true
            }
            None => false,
        }
    }

    /// Removes every row of `country_id` with `start_year <= year <= end_year`.
    pub(crate) fn remove_range(&mut self, country_id: CountryId, start_year: i32, end_year: i32) -> usize {
        let before = self.observations.len();
        self.observations
            .retain(|o| !(o.country_id == country_id && o.year >= start_year && o.year <= end_year));
        let removed = before - self.observations.len();
        if removed > 0 {
            self.refresh_years();
        }
        removed
    }

    fn refresh_years(&mut self) {
        let distinct: BTreeSet<i32> = self.observations.iter().map(|o| o.year).collect();
        self.years = distinct.into_iter().rev().collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::new(
            vec![],
            vec![],
            vec![
                Country { country_id: 1, sub_region_id: 10, name: "Alpha".into() },
                Country { country_id: 2, sub_region_id: 10, name: "Beta".into() },
                Country { country_id: 3, sub_region_id: 20, name: "Gamma".into() },
            ],
            vec![
                Observation::new(100, 1, 2019, 1.05),
                Observation::new(101, 1, 2021, 1.06),
                Observation::new(102, 2, 2019, 1.04),
                Observation::new(103, 3, 2015, 1.10),
            ],
        )
    }

    #[test]
    fn test_years_are_distinct_and_descending() {
        assert_eq!(sample().years(), &[2021, 2019, 2015]);
    }

    #[test]
    fn test_latest_and_next_year() {
        let ds = sample();
        assert_eq!(ds.latest_year(1), Some(2021));
        assert_eq!(ds.latest_year(99), None);
        assert_eq!(ds.next_year(1, 2020), 2022);
        assert_eq!(ds.next_year(99, 2020), 2021);
    }

    #[test]
    fn test_member_countries_keep_dataset_order() {
        let ds = sample();
        assert_eq!(ds.member_countries(10), vec![1, 2]);
        assert!(ds.member_countries(30).is_empty());
    }

    #[test]
    fn test_push_refreshes_years() {
        let mut ds = sample();
        ds.push_observation(Observation::new(200, 3, 2023, 1.01));
        assert_eq!(ds.years(), &[2023, 2021, 2019, 2015]);
    }

    #[test]
    fn test_remove_range_is_inclusive_and_refreshes_years() {
        let mut ds = sample();
        let removed = ds.remove_range(1, 2019, 2021);
        assert_eq!(removed, 2);
        assert_eq!(ds.years(), &[2019, 2015]);
        assert_eq!(ds.observations_for(1).count(), 0);
    }

    #[test]
    fn test_set_value_reports_missing_row() {
        let mut ds = sample();
        assert!(ds.set_value(2, 2019, 1.2));
        assert!(!ds.set_value(2, 2030, 1.2));
        assert_eq!(ds.observations_for(2).next().map(|o| o.value), Some(1.2));
    }

    #[test]
    fn test_next_local_id_stays_unique() {
        let ds = sample();
        assert_eq!(ds.next_local_id(5_000), 5_000);
        assert_eq!(ds.next_local_id(50), 104);
    }
}
