// Group locations by country for display

use serde::Serialize;
use std::collections::BTreeMap;

use crate::store::Location;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Country {
    pub name: String,
    pub code: String,
    pub locations: Vec<Location>,
}

/// Countries sorted by name, cities sorted within each country.
pub fn to_countries(locations: &[Location]) -> Vec<Country> {
    let mut by_code: BTreeMap<&str, Country> = BTreeMap::new();
    for l in locations {
        by_code
            .entry(l.country_code.as_str())
            .or_insert_with(|| Country {
                name: l.country.clone(),
                code: l.country_code.clone(),
                locations: Vec::new(),
            })
            .locations
            .push(l.clone());
    }

    let mut countries: Vec<Country> = by_code.into_values().collect();
    for c in &mut countries {
        c.locations
            .sort_by(|a, b| a.city.cmp(&b.city).then_with(|| a.code.cmp(&b.code)));
    }
    countries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.code.cmp(&b.code)));
    countries
}
