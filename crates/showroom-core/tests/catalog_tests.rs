#![cfg(feature = "catalog")]

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use showroom_core::catalog::facets::catalog_facets;
use showroom_core::catalog::params::FilterParams;
use showroom_core::catalog::search::{search_inventory, SearchInput};
use showroom_core::catalog::*;

fn inventory() -> Vec<Vehicle> {
    serde_json::from_str(include_str!("fixtures/inventory.json")).unwrap()
}

fn ids(vs: &[Vehicle]) -> Vec<&str> {
    vs.iter().map(|v| v.id.as_str()).collect()
}

// ===========================================================================
// Filter
// ===========================================================================

#[test]
fn test_fixture_loads() {
    let vs = inventory();
    assert_eq!(vs.len(), 12);
    assert_eq!(vs[3].status, VehicleStatus::Sold);
    assert_eq!(vs[4].listed_on, None);
}

#[test]
fn test_filter_identity_on_fixture() {
    let vs = inventory();
    assert_eq!(filter_vehicles(&vs, &FilterCriteria::default()), vs);
}

#[test]
fn test_filter_certified_suvs() {
    let criteria = FilterCriteria {
        body_types: Some(vec![BodyType::Suv]),
        certified_only: true,
        ..Default::default()
    };
    assert_eq!(
        ids(&filter_vehicles(&inventory(), &criteria)),
        vec!["v001", "v002", "v011"]
    );
}

#[test]
fn test_filter_price_edges() {
    let vs = inventory();
    let at_edges = FilterCriteria {
        price: Some(Bounds::between(dec!(52_000), dec!(89_000))),
        ..Default::default()
    };
    assert_eq!(
        ids(&filter_vehicles(&vs, &at_edges)),
        vec!["v003", "v005", "v007", "v009"]
    );

    let inside = FilterCriteria {
        price: Some(Bounds::between(dec!(52_001), dec!(88_999))),
        ..Default::default()
    };
    assert_eq!(ids(&filter_vehicles(&vs, &inside)), vec!["v007", "v009"]);
}

#[test]
fn test_filter_from_form_params() {
    let params = FilterParams {
        make: Some("Toyota".into()),
        fuel_type: Some("petrol".into()),
        max_mileage: Some("60,000".into()),
        min_price: Some("not a number".into()),
        ..Default::default()
    };
    let criteria = params.into_criteria();
    assert_eq!(criteria.price, None);
    assert_eq!(
        ids(&filter_vehicles(&inventory(), &criteria)),
        vec!["v001", "v007", "v011"]
    );
}

// ===========================================================================
// Aggregation
// ===========================================================================

#[test]
fn test_aggregate_fixture() {
    let aggs = aggregate_by_model(&inventory());
    let order: Vec<(&str, &str, usize)> = aggs
        .iter()
        .map(|a| (a.make.as_str(), a.model.as_str(), a.count))
        .collect();
    assert_eq!(
        order,
        vec![
            ("Toyota", "Land Cruiser", 3),
            ("Nissan", "Patrol", 2),
            ("Toyota", "Camry", 2),
            ("Hyundai", "Elantra", 1),
            ("Kia", "Picanto", 1),
            ("Tesla", "Model 3", 1),
            ("Ford", "Ranger", 1),
            ("Lexus", "ES", 1),
        ]
    );

    let lc = &aggs[0];
    assert_eq!(lc.min_price, dec!(210_000));
    assert_eq!(lc.max_price, dec!(289_000));
    assert_eq!(lc.available, 2);
    assert_eq!(lc.image.as_deref(), Some("/images/v001/front.jpg"));
}

#[test]
fn test_facets_fixture() {
    let f = catalog_facets(&inventory());
    assert_eq!(f.total, 12);
    assert_eq!(f.available, 10);
    assert_eq!(f.certified, 6);
    assert_eq!(
        f.makes,
        vec!["Toyota", "Nissan", "Hyundai", "Kia", "Tesla", "Ford", "Lexus"]
    );
    assert_eq!(f.year, Some(Bounds::between(2018, 2023)));
    assert_eq!(f.price, Some(Bounds::between(dec!(31_000), dec!(289_000))));
    assert_eq!(f.mileage, Some(Bounds::between(9_000, 110_000)));
}

#[test]
fn test_search_newest_first() {
    let mut input = SearchInput::new(inventory(), FilterCriteria::default());
    input.sort = SortOrder::Newest;
    input.per_page = 3;
    let out = search_inventory(&input).unwrap();
    assert_eq!(ids(&out.result.vehicles), vec!["v011", "v008", "v003"]);
    assert_eq!(out.result.total_pages, 4);
}

#[test]
fn test_search_input_from_json_uses_defaults() {
    let json = format!(
        r#"{{"vehicles": {}, "criteria": {{"makes": ["Nissan"]}}}}"#,
        include_str!("fixtures/inventory.json")
    );
    let input: SearchInput = serde_json::from_str(&json).unwrap();
    assert_eq!(input.page, 1);
    assert_eq!(input.per_page, 12);
    let out = search_inventory(&input).unwrap();
    assert_eq!(ids(&out.result.vehicles), vec!["v002", "v010"]);
    assert_eq!(out.result.popular_models.len(), 1);
}

// ===========================================================================
// Laws
// ===========================================================================

const MAKES: [&str; 4] = ["Toyota", "Nissan", "Kia", "Ford"];
const MODELS: [&str; 3] = ["A", "B", "C"];
const BODIES: [BodyType; 3] = [BodyType::Sedan, BodyType::Suv, BodyType::Hatchback];
const FUELS: [FuelType; 4] = [
    FuelType::Petrol,
    FuelType::Diesel,
    FuelType::Hybrid,
    FuelType::Electric,
];

fn arb_vehicle() -> impl Strategy<Value = Vehicle> {
    (
        0..MAKES.len(),
        0..MODELS.len(),
        2010i32..2025,
        0u32..300,
        0u32..200_000,
        0..BODIES.len(),
        0..FUELS.len(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(mk, md, year, price_k, mileage, body, fuel, manual, certified)| Vehicle {
            id: format!("{mk}-{md}-{year}-{price_k}-{mileage}"),
            make: MAKES[mk].to_string(),
            model: MODELS[md].to_string(),
            variant: String::new(),
            year,
            price: Decimal::from(price_k * 1_000),
            mileage,
            fuel_type: FUELS[fuel],
            transmission: if manual {
                Transmission::Manual
            } else {
                Transmission::Automatic
            },
            body_type: BODIES[body],
            status: if certified {
                VehicleStatus::Available
            } else {
                VehicleStatus::Reserved
            },
            certified,
            images: vec![],
            color: None,
            listed_on: None,
        })
}

fn arb_inventory() -> impl Strategy<Value = Vec<Vehicle>> {
    prop::collection::vec(arb_vehicle(), 0..40)
}

proptest! {
    #[test]
    fn prop_filter_identity(vs in arb_inventory()) {
        prop_assert_eq!(filter_vehicles(&vs, &FilterCriteria::default()), vs);
    }

    #[test]
    fn prop_filter_conjunction_of_disjoint_fields(
        vs in arb_inventory(),
        make in 0..MAKES.len(),
        lo in 0u32..150,
        span in 0u32..150,
    ) {
        let by_make = FilterCriteria {
            makes: Some(vec![MAKES[make].to_string()]),
            ..Default::default()
        };
        let by_price = FilterCriteria {
            price: Some(Bounds::between(
                Decimal::from(lo * 1_000),
                Decimal::from((lo + span) * 1_000),
            )),
            ..Default::default()
        };
        let merged = FilterCriteria {
            makes: by_make.makes.clone(),
            price: by_price.price,
            ..Default::default()
        };

        let left = filter_vehicles(&vs, &by_make);
        let right = filter_vehicles(&vs, &by_price);
        let both = filter_vehicles(&vs, &merged);

        // Intersection, keeping input order.
        let expected: Vec<Vehicle> = vs
            .iter()
            .filter(|v| left.contains(v) && right.contains(v))
            .cloned()
            .collect();
        prop_assert_eq!(both, expected);
    }

    #[test]
    fn prop_filter_is_subsequence(vs in arb_inventory(), min_year in 2010i32..2025) {
        let criteria = FilterCriteria {
            year: Some(Bounds::new(Some(min_year), None)),
            ..Default::default()
        };
        let out = filter_vehicles(&vs, &criteria);
        let mut cursor = vs.iter();
        for v in &out {
            prop_assert!(v.year >= min_year);
            prop_assert!(cursor.any(|x| x == v));
        }
    }

    #[test]
    fn prop_aggregate_counts_sum_to_len(vs in arb_inventory()) {
        let aggs = aggregate_by_model(&vs);
        let total: usize = aggs.iter().map(|a| a.count).sum();
        prop_assert_eq!(total, vs.len());
        for pair in aggs.windows(2) {
            prop_assert!(pair[0].count >= pair[1].count);
        }
        for a in &aggs {
            prop_assert!(a.min_price <= a.max_price);
            prop_assert!(a.available <= a.count);
        }
    }

    #[test]
    fn prop_deterministic(vs in arb_inventory()) {
        let criteria = FilterCriteria {
            fuel_types: Some(vec![FuelType::Hybrid, FuelType::Electric]),
            ..Default::default()
        };
        let first = serde_json::to_string(&filter_vehicles(&vs, &criteria)).unwrap();
        let second = serde_json::to_string(&filter_vehicles(&vs, &criteria)).unwrap();
        prop_assert_eq!(first, second);

        let a1 = serde_json::to_string(&aggregate_by_model(&vs)).unwrap();
        let a2 = serde_json::to_string(&aggregate_by_model(&vs)).unwrap();
        prop_assert_eq!(a1, a2);
    }
}
