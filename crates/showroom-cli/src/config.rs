use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use showroom_core::locale::Locale;
use showroom_core::Currency;

use crate::input;

/// Dealer-wide defaults, optionally loaded from a YAML or JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowroomConfig {
    pub locale: Locale,
    pub currency: Currency,
    pub default_annual_rate_pct: Decimal,
    pub default_term_months: u32,
    pub per_page: usize,
    pub popular_limit: usize,
}

impl Default for ShowroomConfig {
    fn default() -> Self {
        Self {
            locale: Locale::En,
            currency: Currency::AED,
            default_annual_rate_pct: dec!(3.99),
            default_term_months: 60,
            per_page: 12,
            popular_limit: 6,
        }
    }
}

impl ShowroomConfig {
    pub fn load(path: Option<&str>) -> Result<Self, Box<dyn std::error::Error>> {
        match path {
            Some(p) => {
                let config: Self = input::file::read_structured(p)?;
                tracing::info!(path = p, locale = config.locale.tag(), "loaded config");
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }
}
