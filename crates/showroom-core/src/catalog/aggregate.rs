use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use super::vehicle::Vehicle;
use crate::types::Money;

/// Per-model summary used by the "popular models" strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelAggregate {
    pub make: String,
    pub model: String,
    pub count: usize,
    pub min_price: Money,
    pub max_price: Money,
    /// First image of the first vehicle seen for this model.
    pub image: Option<String>,
    /// Vehicles in `Available` status.
    pub available: usize,
}

/// Group by exact (make, model) and rank by descending count.
///
/// Groups start in first-occurrence order and the sort is stable, so equal
/// counts keep that order and repeated runs are identical.
pub fn aggregate_by_model(vehicles: &[Vehicle]) -> Vec<ModelAggregate> {
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();
    let mut groups: Vec<ModelAggregate> = Vec::new();

    for v in vehicles {
        let key = (v.make.as_str(), v.model.as_str());
        match index.get(&key) {
            Some(&i) => {
                let group = &mut groups[i];
                group.count += 1;
                group.min_price = group.min_price.min(v.price);
                group.max_price = group.max_price.max(v.price);
                if v.is_available() {
                    group.available += 1;
                }
            }
            None => {
                index.insert(key, groups.len());
                groups.push(ModelAggregate {
                    make: v.make.clone(),
                    model: v.model.clone(),
                    count: 1,
                    min_price: v.price,
                    max_price: v.price,
                    image: v.images.first().cloned(),
                    available: usize::from(v.is_available()),
                });
            }
        }
    }

    groups.sort_by(|a, b| b.count.cmp(&a.count));

    debug!(
        vehicles = vehicles.len(),
        models = groups.len(),
        "model aggregation complete"
    );
    groups
}

/// The `limit` most-stocked models.
pub fn popular_models(vehicles: &[Vehicle], limit: usize) -> Vec<ModelAggregate> {
    let mut models = aggregate_by_model(vehicles);
    models.truncate(limit);
    models
}
