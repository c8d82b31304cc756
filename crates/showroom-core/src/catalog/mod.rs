pub mod aggregate;
pub mod facets;
pub mod filter;
pub mod params;
pub mod search;
pub mod vehicle;

pub use aggregate::{aggregate_by_model, popular_models, ModelAggregate};
pub use filter::{filter_vehicles, sort_vehicles, Bounds, FilterCriteria, SortOrder};
pub use vehicle::{BodyType, FuelType, Transmission, Vehicle, VehicleStatus};
