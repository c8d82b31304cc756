//! Raw form values from the filter sidebar.
//!
//! Everything arrives as text. Parsing happens here, once: a value that is
//! malformed, negative, or non-numeric becomes "no constraint" and is never
//! handed to the filter as a bogus number.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::filter::{Bounds, FilterCriteria};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    /// Comma-separated list, e.g. "Toyota,Lexus".
    pub make: Option<String>,
    pub body_type: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub min_year: Option<String>,
    pub max_year: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_mileage: Option<String>,
    pub max_mileage: Option<String>,
    pub certified: Option<String>,
}

impl FilterParams {
    pub fn into_criteria(self) -> FilterCriteria {
        FilterCriteria {
            makes: parse_words(self.make.as_deref()),
            body_types: parse_variants(self.body_type.as_deref()),
            fuel_types: parse_variants(self.fuel_type.as_deref()),
            transmissions: parse_variants(self.transmission.as_deref()),
            year: bounds(
                parse_year(self.min_year.as_deref()),
                parse_year(self.max_year.as_deref()),
            ),
            price: bounds(
                parse_amount(self.min_price.as_deref()),
                parse_amount(self.max_price.as_deref()),
            ),
            mileage: bounds(
                parse_mileage(self.min_mileage.as_deref()),
                parse_mileage(self.max_mileage.as_deref()),
            ),
            certified_only: parse_flag(self.certified.as_deref()),
        }
    }
}

fn split(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn parse_words(raw: Option<&str>) -> Option<Vec<String>> {
    let words: Vec<String> = split(raw).map(String::from).collect();
    (!words.is_empty()).then_some(words)
}

/// Unknown tokens are dropped rather than rejecting the whole list.
fn parse_variants<T: FromStr + PartialEq>(raw: Option<&str>) -> Option<Vec<T>> {
    let mut out: Vec<T> = Vec::new();
    for token in split(raw) {
        if let Ok(v) = token.parse::<T>() {
            if !out.contains(&v) {
                out.push(v);
            }
        }
    }
    (!out.is_empty()).then_some(out)
}

/// Model years are positive; thousands separators are tolerated throughout.
fn parse_year(raw: Option<&str>) -> Option<i32> {
    strip_separators(raw?)
        .parse::<i32>()
        .ok()
        .filter(|y| *y > 0)
}

/// Zero is a real bound (brand-new stock); negatives fail to parse as `u32`.
fn parse_mileage(raw: Option<&str>) -> Option<u32> {
    strip_separators(raw?).parse::<u32>().ok()
}

fn parse_amount(raw: Option<&str>) -> Option<Decimal> {
    let cleaned = strip_separators(raw?);
    Decimal::from_str(&cleaned)
        .ok()
        .filter(|v| !v.is_sign_negative())
}

fn strip_separators(raw: &str) -> String {
    raw.trim().replace([',', '_', ' '], "")
}

fn parse_flag(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|s| s.trim().to_ascii_lowercase()).as_deref(),
        Some("true" | "1" | "yes" | "on")
    )
}

fn bounds<T: PartialOrd + Copy>(min: Option<T>, max: Option<T>) -> Option<Bounds<T>> {
    let b = Bounds::new(min, max);
    (!b.is_unbounded()).then_some(b)
}
