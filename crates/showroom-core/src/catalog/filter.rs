use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use tracing::debug;

use super::vehicle::{BodyType, FuelType, Transmission, UnknownVariant, Vehicle};
use crate::types::Money;

// ---------------------------------------------------------------------------
// Criteria
// ---------------------------------------------------------------------------

/// Inclusive range; a missing end is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<T>,
}

impl<T: PartialOrd + Copy> Bounds<T> {
    pub fn new(min: Option<T>, max: Option<T>) -> Self {
        Self { min, max }
    }

    pub fn between(min: T, max: T) -> Self {
        Self::new(Some(min), Some(max))
    }

    pub fn contains(&self, value: T) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Sparse set of constraints; every populated field must hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub makes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_types: Option<Vec<BodyType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_types: Option<Vec<FuelType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transmissions: Option<Vec<Transmission>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<Bounds<i32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Bounds<Money>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mileage: Option<Bounds<u32>>,
    #[serde(default)]
    pub certified_only: bool,
}

impl FilterCriteria {
    /// True when the criteria cannot exclude anything.
    pub fn is_empty(&self) -> bool {
        !is_constrained(&self.makes)
            && !is_constrained(&self.body_types)
            && !is_constrained(&self.fuel_types)
            && !is_constrained(&self.transmissions)
            && self.year.map_or(true, |b| b.is_unbounded())
            && self.price.map_or(true, |b| b.is_unbounded())
            && self.mileage.map_or(true, |b| b.is_unbounded())
            && !self.certified_only
    }

    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        is_member(&self.makes, &vehicle.make)
            && is_member(&self.body_types, &vehicle.body_type)
            && is_member(&self.fuel_types, &vehicle.fuel_type)
            && is_member(&self.transmissions, &vehicle.transmission)
            && self.year.map_or(true, |b| b.contains(vehicle.year))
            && self.price.map_or(true, |b| b.contains(vehicle.price))
            && self.mileage.map_or(true, |b| b.contains(vehicle.mileage))
            && (!self.certified_only || vehicle.certified)
    }
}

fn is_constrained<T>(set: &Option<Vec<T>>) -> bool {
    set.as_ref().is_some_and(|s| !s.is_empty())
}

fn is_member<T: PartialEq>(set: &Option<Vec<T>>, value: &T) -> bool {
    match set {
        Some(allowed) if !allowed.is_empty() => allowed.contains(value),
        _ => true,
    }
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Keep the inventory's own order.
    #[default]
    Featured,
    PriceLowHigh,
    PriceHighLow,
    YearNewest,
    MileageLowest,
    /// Most recently listed first; undated listings last.
    Newest,
}

impl FromStr for SortOrder {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "featured" => Ok(Self::Featured),
            "price_low_high" | "price_asc" => Ok(Self::PriceLowHigh),
            "price_high_low" | "price_desc" => Ok(Self::PriceHighLow),
            "year_newest" | "year_desc" => Ok(Self::YearNewest),
            "mileage_lowest" | "mileage_asc" => Ok(Self::MileageLowest),
            "newest" => Ok(Self::Newest),
            _ => Err(UnknownVariant {
                kind: "sort order",
                value: s.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Order-preserving subsequence of `vehicles` satisfying every criterion.
pub fn filter_vehicles(vehicles: &[Vehicle], criteria: &FilterCriteria) -> Vec<Vehicle> {
    let matched: Vec<Vehicle> = vehicles
        .iter()
        .filter(|v| criteria.matches(v))
        .cloned()
        .collect();

    debug!(
        input = vehicles.len(),
        matched = matched.len(),
        "catalog filter applied"
    );
    matched
}

/// Stable in-place sort; ties keep their inventory order.
pub fn sort_vehicles(vehicles: &mut [Vehicle], order: SortOrder) {
    match order {
        SortOrder::Featured => {}
        SortOrder::PriceLowHigh => vehicles.sort_by(|a, b| a.price.cmp(&b.price)),
        SortOrder::PriceHighLow => vehicles.sort_by(|a, b| b.price.cmp(&a.price)),
        SortOrder::YearNewest => vehicles.sort_by(|a, b| b.year.cmp(&a.year)),
        SortOrder::MileageLowest => vehicles.sort_by(|a, b| a.mileage.cmp(&b.mileage)),
        SortOrder::Newest => vehicles.sort_by(|a, b| match (a.listed_on, b.listed_on) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
