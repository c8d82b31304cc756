use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use showroom_core::finance::loan::{self, LoanInput};
use showroom_core::locale::{format_money, ResourceBundle};

use crate::config::ShowroomConfig;
use crate::input;

/// Arguments for a financing quote
#[derive(Args)]
pub struct LoanArgs {
    /// Vehicle price (or principal when no down payment is given)
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Down payment deducted from the price
    #[arg(long, default_value = "0")]
    pub down_payment: Decimal,

    /// Annual interest rate in percent (e.g. 3.99)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub term: Option<u32>,

    /// Include the month-by-month amortization schedule
    #[arg(long)]
    pub schedule: bool,

    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the affordability calculation
#[derive(Args)]
pub struct AffordabilityArgs {
    /// Monthly amount the buyer can pay
    #[arg(long)]
    pub budget: Decimal,

    /// Cash available as down payment
    #[arg(long, default_value = "0")]
    pub down_payment: Decimal,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub term: Option<u32>,
}

#[derive(Debug, Serialize)]
struct AffordabilityOutput {
    max_principal: Decimal,
    max_vehicle_price: Decimal,
    monthly_budget: Decimal,
    down_payment: Decimal,
    annual_rate_pct: Decimal,
    term_months: u32,
}

pub fn run_loan(args: LoanArgs, config: &ShowroomConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input: LoanInput = if let Some(ref path) = args.input {
        input::file::read_structured(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        LoanInput {
            vehicle_price: args.price.ok_or("--price is required (or provide --input)")?,
            down_payment: args.down_payment,
            annual_rate_pct: args.rate.unwrap_or(config.default_annual_rate_pct),
            term_months: args.term.unwrap_or(config.default_term_months),
            include_schedule: args.schedule,
        }
    };

    let quote = loan::quote_loan(&loan_input)?;
    tracing::info!(
        payment = %quote.result.monthly_payment,
        months = quote.result.term_months,
        "loan quote ready"
    );

    let bundle = ResourceBundle::builtin();
    let locale = config.locale;
    let display = serde_json::json!({
        bundle.resolve(locale, "loan.monthly_payment"):
            format_money(quote.result.monthly_payment, &config.currency),
        bundle.resolve(locale, "loan.total_interest"):
            format_money(quote.result.total_interest, &config.currency),
        bundle.resolve(locale, "loan.total_amount"):
            format_money(quote.result.total_amount, &config.currency),
    });

    let mut value = serde_json::to_value(quote)?;
    if let Value::Object(ref mut map) = value {
        map.insert("display".into(), display);
    }
    Ok(value)
}

pub fn run_affordability(
    args: AffordabilityArgs,
    config: &ShowroomConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    if args.down_payment < Decimal::ZERO {
        return Err("--down-payment cannot be negative".into());
    }
    let rate = args.rate.unwrap_or(config.default_annual_rate_pct);
    let term = args.term.unwrap_or(config.default_term_months);

    let max_principal = loan::max_affordable_principal(args.budget, rate, term)?;

    let max_vehicle_price = max_principal
        .checked_add(args.down_payment)
        .ok_or("--down-payment is too large to add to the affordable principal")?;

    let output = AffordabilityOutput {
        max_principal,
        max_vehicle_price,
        monthly_budget: args.budget,
        down_payment: args.down_payment,
        annual_rate_pct: rate,
        term_months: term,
    };

    Ok(serde_json::to_value(output)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn affordability(budget: Decimal, down_payment: Decimal) -> AffordabilityArgs {
        AffordabilityArgs {
            budget,
            down_payment,
            rate: None,
            term: None,
        }
    }

    #[test]
    fn test_affordability_adds_down_payment() {
        let value =
            run_affordability(affordability(dec!(1841.21), dec!(20_000)), &ShowroomConfig::default())
                .unwrap();
        assert_eq!(value["max_principal"], "100000");
        assert_eq!(value["max_vehicle_price"], "120000");
    }

    #[test]
    fn test_affordability_huge_inputs_error_instead_of_panicking() {
        let config = ShowroomConfig::default();
        assert!(run_affordability(affordability(Decimal::MAX, dec!(0)), &config).is_err());
        let near_max = Decimal::MAX - dec!(1_000_000);
        let args = AffordabilityArgs {
            rate: Some(dec!(0)),
            term: Some(1),
            ..affordability(near_max, near_max)
        };
        assert!(run_affordability(args, &config).is_err());
    }
}
