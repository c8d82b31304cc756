use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use showroom_core::catalog::{self, facets, params::FilterParams, search, FilterCriteria, Vehicle};
use showroom_core::finance::loan;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Finance
// ---------------------------------------------------------------------------

#[napi]
pub fn quote_loan(input_json: String) -> NapiResult<String> {
    let input: loan::LoanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = loan::quote_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct PaymentRequest {
    principal: rust_decimal::Decimal,
    annual_rate_pct: rust_decimal::Decimal,
    term_months: u32,
}

#[napi]
pub fn monthly_payment(input_json: String) -> NapiResult<String> {
    let req: PaymentRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let payment = loan::monthly_payment(req.principal, req.annual_rate_pct, req.term_months)
        .map_err(to_napi_error)?;
    Ok(payment.to_string())
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[napi]
pub fn search_inventory(input_json: String) -> NapiResult<String> {
    let input: search::SearchInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = search::search_inventory(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Criteria may be typed (`criteria`) or raw sidebar values (`params`).
#[derive(Deserialize)]
struct FilterRequest {
    vehicles: Vec<Vehicle>,
    #[serde(default)]
    criteria: Option<FilterCriteria>,
    #[serde(default)]
    params: Option<FilterParams>,
}

#[napi]
pub fn filter_vehicles(input_json: String) -> NapiResult<String> {
    let req: FilterRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let criteria = match (req.criteria, req.params) {
        (Some(c), _) => c,
        (None, Some(p)) => p.into_criteria(),
        (None, None) => FilterCriteria::default(),
    };
    let matched = catalog::filter_vehicles(&req.vehicles, &criteria);
    serde_json::to_string(&matched).map_err(to_napi_error)
}

#[napi]
pub fn aggregate_models(vehicles_json: String) -> NapiResult<String> {
    let vehicles: Vec<Vehicle> = serde_json::from_str(&vehicles_json).map_err(to_napi_error)?;
    serde_json::to_string(&catalog::aggregate_by_model(&vehicles)).map_err(to_napi_error)
}

#[napi]
pub fn catalog_facets(vehicles_json: String) -> NapiResult<String> {
    let vehicles: Vec<Vehicle> = serde_json::from_str(&vehicles_json).map_err(to_napi_error)?;
    serde_json::to_string(&facets::catalog_facets(&vehicles)).map_err(to_napi_error)
}
