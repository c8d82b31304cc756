use serde::{Deserialize, Serialize};

use super::filter::Bounds;
use super::vehicle::{BodyType, FuelType, Transmission, Vehicle};
use crate::types::Money;

/// Options and slider limits for the filter sidebar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogFacets {
    pub total: usize,
    pub available: usize,
    pub certified: usize,
    pub makes: Vec<String>,
    pub body_types: Vec<BodyType>,
    pub fuel_types: Vec<FuelType>,
    pub transmissions: Vec<Transmission>,
    pub year: Option<Bounds<i32>>,
    pub price: Option<Bounds<Money>>,
    pub mileage: Option<Bounds<u32>>,
}

/// Distinct values in first-occurrence order plus observed min/max ranges.
pub fn catalog_facets(vehicles: &[Vehicle]) -> CatalogFacets {
    let mut facets = CatalogFacets {
        total: vehicles.len(),
        ..Default::default()
    };

    for v in vehicles {
        if v.is_available() {
            facets.available += 1;
        }
        if v.certified {
            facets.certified += 1;
        }
        push_distinct(&mut facets.makes, &v.make);
        push_distinct(&mut facets.body_types, &v.body_type);
        push_distinct(&mut facets.fuel_types, &v.fuel_type);
        push_distinct(&mut facets.transmissions, &v.transmission);
        widen(&mut facets.year, v.year);
        widen(&mut facets.price, v.price);
        widen(&mut facets.mileage, v.mileage);
    }

    facets
}

fn push_distinct<T: PartialEq + Clone>(values: &mut Vec<T>, value: &T) {
    if !values.contains(value) {
        values.push(value.clone());
    }
}

fn widen<T: PartialOrd + Copy>(range: &mut Option<Bounds<T>>, value: T) {
    match range {
        Some(b) => {
            if b.min.map_or(true, |m| value < m) {
                b.min = Some(value);
            }
            if b.max.map_or(true, |m| value > m) {
                b.max = Some(value);
            }
        }
        None => *range = Some(Bounds::between(value, value)),
    }
}
