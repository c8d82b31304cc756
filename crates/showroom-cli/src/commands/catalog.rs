use clap::Args;
use serde_json::Value;

use showroom_core::catalog::facets::catalog_facets;
use showroom_core::catalog::params::FilterParams;
use showroom_core::catalog::search::{search_inventory, SearchInput};
use showroom_core::catalog::{popular_models, SortOrder, Vehicle};

use crate::config::ShowroomConfig;
use crate::input;

/// Inventory source shared by every catalog command
#[derive(Args)]
pub struct InventoryArgs {
    /// Path to a JSON/YAML inventory (array of vehicles or {"vehicles": [...]})
    #[arg(long)]
    pub inventory: Option<String>,
}

/// Arguments for an inventory search
#[derive(Args)]
pub struct SearchArgs {
    #[command(flatten)]
    pub source: InventoryArgs,

    /// Comma-separated makes (e.g. "Toyota,Lexus")
    #[arg(long)]
    pub make: Option<String>,

    /// Comma-separated body types (sedan, suv, hatchback, ...)
    #[arg(long)]
    pub body_type: Option<String>,

    /// Comma-separated fuel types (petrol, diesel, hybrid, electric)
    #[arg(long)]
    pub fuel_type: Option<String>,

    /// Comma-separated transmissions (automatic, manual)
    #[arg(long)]
    pub transmission: Option<String>,

    #[arg(long)]
    pub min_year: Option<String>,

    #[arg(long)]
    pub max_year: Option<String>,

    #[arg(long)]
    pub min_price: Option<String>,

    #[arg(long)]
    pub max_price: Option<String>,

    #[arg(long)]
    pub min_mileage: Option<String>,

    #[arg(long)]
    pub max_mileage: Option<String>,

    /// Only certified pre-owned vehicles
    #[arg(long)]
    pub certified: bool,

    /// featured, price-low-high, price-high-low, year-newest, mileage-lowest, newest
    #[arg(long, default_value = "featured")]
    pub sort: SortOrder,

    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Page size (defaults to the configured value)
    #[arg(long)]
    pub per_page: Option<usize>,
}

/// Arguments for the popular-models ranking
#[derive(Args)]
pub struct ModelsArgs {
    #[command(flatten)]
    pub source: InventoryArgs,

    /// Number of models to return (defaults to the configured value)
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Arguments for filter facets
#[derive(Args)]
pub struct FacetsArgs {
    #[command(flatten)]
    pub source: InventoryArgs,
}

fn load_inventory(source: &InventoryArgs) -> Result<Vec<Vehicle>, Box<dyn std::error::Error>> {
    let data: Value = if let Some(ref path) = source.inventory {
        input::file::read_structured(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("Provide --inventory or pipe JSON via stdin".into());
    };

    let vehicles: Vec<Vehicle> = match data {
        Value::Array(_) => serde_json::from_value(data)?,
        Value::Object(mut obj) => match obj.remove("vehicles") {
            Some(arr) => serde_json::from_value(arr)?,
            None => return Err("JSON object must contain a 'vehicles' array".into()),
        },
        _ => return Err("Expected an array of vehicles or object with 'vehicles' key".into()),
    };

    tracing::info!(vehicles = vehicles.len(), "inventory loaded");
    Ok(vehicles)
}

pub fn run_search(args: SearchArgs, config: &ShowroomConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let vehicles = load_inventory(&args.source)?;

    let params = FilterParams {
        make: args.make,
        body_type: args.body_type,
        fuel_type: args.fuel_type,
        transmission: args.transmission,
        min_year: args.min_year,
        max_year: args.max_year,
        min_price: args.min_price,
        max_price: args.max_price,
        min_mileage: args.min_mileage,
        max_mileage: args.max_mileage,
        certified: args.certified.then(|| "true".to_string()),
    };
    let criteria = params.into_criteria();
    tracing::debug!(?criteria, "filter criteria parsed");

    let input = SearchInput {
        vehicles,
        criteria,
        sort: args.sort,
        page: args.page,
        per_page: args.per_page.unwrap_or(config.per_page),
        popular_limit: config.popular_limit,
    };

    let output = search_inventory(&input)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_models(args: ModelsArgs, config: &ShowroomConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let vehicles = load_inventory(&args.source)?;
    let limit = args.limit.unwrap_or(config.popular_limit);
    Ok(serde_json::to_value(popular_models(&vehicles, limit))?)
}

pub fn run_facets(args: FacetsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let vehicles = load_inventory(&args.source)?;
    Ok(serde_json::to_value(catalog_facets(&vehicles))?)
}
