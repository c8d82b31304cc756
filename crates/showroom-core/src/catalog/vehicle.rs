use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuelType {
    Petrol,
    Diesel,
    Hybrid,
    Electric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transmission {
    Automatic,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyType {
    Sedan,
    #[serde(rename = "SUV")]
    Suv,
    Hatchback,
    Coupe,
    Pickup,
    Van,
    Convertible,
    Wagon,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleStatus {
    #[default]
    Available,
    Reserved,
    Sold,
}

/// A single listing as supplied by the inventory data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub make: String,
    pub model: String,
    #[serde(default)]
    pub variant: String,
    pub year: i32,
    pub price: Money,
    /// Odometer reading in kilometres.
    pub mileage: u32,
    pub fuel_type: FuelType,
    pub transmission: Transmission,
    pub body_type: BodyType,
    #[serde(default)]
    pub status: VehicleStatus,
    #[serde(default)]
    pub certified: bool,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listed_on: Option<NaiveDate>,
}

impl Vehicle {
    pub fn is_available(&self) -> bool {
        self.status == VehicleStatus::Available
    }

    /// "2021 Toyota Camry SE"
    pub fn title(&self) -> String {
        if self.variant.is_empty() {
            format!("{} {} {}", self.year, self.make, self.model)
        } else {
            format!("{} {} {} {}", self.year, self.make, self.model, self.variant)
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing and display
// ---------------------------------------------------------------------------

/// Returned when a form or CLI token names no known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

fn unknown(kind: &'static str, value: &str) -> UnknownVariant {
    UnknownVariant {
        kind,
        value: value.to_string(),
    }
}

fn normalise(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "")
}

impl FromStr for FuelType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise(s).as_str() {
            "petrol" | "gasoline" | "gas" => Ok(Self::Petrol),
            "diesel" => Ok(Self::Diesel),
            "hybrid" => Ok(Self::Hybrid),
            "electric" | "ev" => Ok(Self::Electric),
            _ => Err(unknown("fuel type", s)),
        }
    }
}

impl FromStr for Transmission {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise(s).as_str() {
            "automatic" | "auto" => Ok(Self::Automatic),
            "manual" => Ok(Self::Manual),
            _ => Err(unknown("transmission", s)),
        }
    }
}

impl FromStr for BodyType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise(s).as_str() {
            "sedan" | "saloon" => Ok(Self::Sedan),
            "suv" => Ok(Self::Suv),
            "hatchback" | "hatch" => Ok(Self::Hatchback),
            "coupe" => Ok(Self::Coupe),
            "pickup" | "truck" => Ok(Self::Pickup),
            "van" => Ok(Self::Van),
            "convertible" | "cabriolet" => Ok(Self::Convertible),
            "wagon" | "estate" => Ok(Self::Wagon),
            _ => Err(unknown("body type", s)),
        }
    }
}

impl FromStr for VehicleStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise(s).as_str() {
            "available" => Ok(Self::Available),
            "reserved" => Ok(Self::Reserved),
            "sold" => Ok(Self::Sold),
            _ => Err(unknown("status", s)),
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Petrol => "Petrol",
            Self::Diesel => "Diesel",
            Self::Hybrid => "Hybrid",
            Self::Electric => "Electric",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for Transmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Automatic => "Automatic",
            Self::Manual => "Manual",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for BodyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Sedan => "Sedan",
            Self::Suv => "SUV",
            Self::Hatchback => "Hatchback",
            Self::Coupe => "Coupe",
            Self::Pickup => "Pickup",
            Self::Van => "Van",
            Self::Convertible => "Convertible",
            Self::Wagon => "Wagon",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Available => "Available",
            Self::Reserved => "Reserved",
            Self::Sold => "Sold",
        };
        write!(f, "{}", s)
    }
}
