use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::aggregate::{popular_models, ModelAggregate};
use super::filter::{filter_vehicles, sort_vehicles, FilterCriteria, SortOrder};
use super::vehicle::Vehicle;
use crate::{types::*, ShowroomError, ShowroomResult};

const MAX_PER_PAGE: usize = 100;

fn default_page() -> usize {
    1
}

fn default_per_page() -> usize {
    12
}

fn default_popular_limit() -> usize {
    6
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchInput {
    pub vehicles: Vec<Vehicle>,
    #[serde(default)]
    pub criteria: FilterCriteria,
    #[serde(default)]
    pub sort: SortOrder,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_per_page")]
    pub per_page: usize,
    #[serde(default = "default_popular_limit")]
    pub popular_limit: usize,
}

impl SearchInput {
    pub fn new(vehicles: Vec<Vehicle>, criteria: FilterCriteria) -> Self {
        Self {
            vehicles,
            criteria,
            sort: SortOrder::default(),
            page: default_page(),
            per_page: default_per_page(),
            popular_limit: default_popular_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutput {
    pub total_matches: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub vehicles: Vec<Vehicle>,
    /// Ranked over every match, not just the current page.
    pub popular_models: Vec<ModelAggregate>,
}

/// Filter, sort and paginate an inventory snapshot.
pub fn search_inventory(input: &SearchInput) -> ShowroomResult<ComputationOutput<SearchOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let mut matched = filter_vehicles(&input.vehicles, &input.criteria);
    sort_vehicles(&mut matched, input.sort);

    let total_matches = matched.len();
    let total_pages = total_matches.div_ceil(input.per_page);
    let popular = popular_models(&matched, input.popular_limit);

    if total_matches == 0 {
        warnings.push("No vehicles match the selected filters.".into());
    } else if input.page > total_pages {
        warnings.push(format!(
            "Page {} is past the last page ({}).",
            input.page, total_pages
        ));
    }

    let page_vehicles: Vec<Vehicle> = matched
        .into_iter()
        .skip((input.page - 1).saturating_mul(input.per_page))
        .take(input.per_page)
        .collect();

    debug!(
        inventory = input.vehicles.len(),
        total_matches,
        page = input.page,
        returned = page_vehicles.len(),
        "inventory search complete"
    );

    let output = SearchOutput {
        total_matches,
        page: input.page,
        per_page: input.per_page,
        total_pages,
        vehicles: page_vehicles,
        popular_models: popular,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "criteria_combine": "logical AND",
        "ranges": "inclusive, open ends unbounded",
        "sort": input.sort,
    });

    Ok(with_metadata(
        "Conjunctive attribute filter with stable sort",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

fn validate_input(input: &SearchInput) -> ShowroomResult<()> {
    if input.page == 0 {
        return Err(ShowroomError::InvalidArgument {
            field: "page".into(),
            reason: "Pages are numbered from 1.".into(),
        });
    }
    if input.per_page == 0 || input.per_page > MAX_PER_PAGE {
        return Err(ShowroomError::InvalidArgument {
            field: "per_page".into(),
            reason: format!("Page size must be between 1 and {MAX_PER_PAGE}."),
        });
    }
    Ok(())
}
