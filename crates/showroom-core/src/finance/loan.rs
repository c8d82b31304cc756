use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::{types::*, ShowroomError, ShowroomResult};

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Down payments below this share of the price trigger a warning.
const LOW_DOWN_PAYMENT_SHARE: Decimal = dec!(0.10);

/// Terms above seven years trigger a warning.
const LONG_TERM_MONTHS: u32 = 84;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    pub vehicle_price: Money,
    #[serde(default)]
    pub down_payment: Money,
    /// Annual rate as a percentage (3.99 = 3.99%).
    pub annual_rate_pct: Percent,
    pub term_months: u32,
    #[serde(default)]
    pub include_schedule: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanQuote {
    pub financed_amount: Money,
    pub down_payment: Money,
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_amount: Money,
    /// Down payment plus every installment.
    pub total_cost: Money,
    pub term_months: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<AmortizationRow>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub period: u32,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub balance: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Equated monthly installment, rounded to the nearest whole currency unit.
///
/// Uses the standard annuity formula `P * r * (1+r)^n / ((1+r)^n - 1)` with
/// `r = annual_rate_pct / 100 / 12`. A zero rate degenerates to straight-line
/// repayment `P / n`. Halves round away from zero, so 12.5 becomes 13.
pub fn monthly_payment(
    principal: Money,
    annual_rate_pct: Percent,
    months: u32,
) -> ShowroomResult<Money> {
    validate_terms(principal, annual_rate_pct, months)?;
    let raw = unrounded_payment(principal, monthly_rate(annual_rate_pct), months)?;
    Ok(round_to_unit(raw))
}

/// Interest paid over the term: `monthly_payment * months - principal`.
pub fn total_interest(
    principal: Money,
    annual_rate_pct: Percent,
    months: u32,
) -> ShowroomResult<Money> {
    Ok(total_amount(principal, annual_rate_pct, months)? - principal)
}

/// Sum of every installment: `monthly_payment * months`.
pub fn total_amount(
    principal: Money,
    annual_rate_pct: Percent,
    months: u32,
) -> ShowroomResult<Money> {
    let payment = monthly_payment(principal, annual_rate_pct, months)?;
    payment
        .checked_mul(Decimal::from(months))
        .ok_or_else(|| overflow("total repayment"))
}

/// Month-by-month split of the rounded installment into interest and principal.
///
/// Interest is rounded to cents each period. The last row absorbs the
/// rounding residual so the closing balance is exactly zero; if rounding pays
/// the loan off early the schedule ends at that period.
pub fn amortization_schedule(
    principal: Money,
    annual_rate_pct: Percent,
    months: u32,
) -> ShowroomResult<Vec<AmortizationRow>> {
    let payment = monthly_payment(principal, annual_rate_pct, months)?;
    let r = monthly_rate(annual_rate_pct);

    let mut rows = Vec::with_capacity(months as usize);
    let mut balance = principal;

    for period in 1..=months {
        if balance <= Decimal::ZERO {
            break;
        }
        let interest = (balance * r).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let mut principal_part = (payment - interest).max(Decimal::ZERO).min(balance);
        if period == months {
            principal_part = balance;
        }
        balance -= principal_part;
        rows.push(AmortizationRow {
            period,
            payment: interest + principal_part,
            interest,
            principal: principal_part,
            balance,
        });
    }

    Ok(rows)
}

/// Largest principal whose installment fits within `monthly_budget`.
///
/// Inverse of the annuity formula, floored to whole units so the resulting
/// loan never exceeds the budget.
pub fn max_affordable_principal(
    monthly_budget: Money,
    annual_rate_pct: Percent,
    months: u32,
) -> ShowroomResult<Money> {
    if monthly_budget < Decimal::ZERO {
        return Err(ShowroomError::InvalidArgument {
            field: "monthly_budget".into(),
            reason: "Monthly budget cannot be negative.".into(),
        });
    }
    validate_terms(Decimal::ZERO, annual_rate_pct, months)?;

    let r = monthly_rate(annual_rate_pct);
    let n = Decimal::from(months);
    let growth = growth_factor(r, months);

    let pv = match growth {
        _ if r.is_zero() => monthly_budget.checked_mul(n),
        Some(g) if g == Decimal::ONE => monthly_budget.checked_mul(n),
        // budget * (1 - (1+r)^-n) / r
        Some(g) => monthly_budget
            .checked_mul((g - Decimal::ONE) / g)
            .and_then(|v| v.checked_div(r)),
        // (1+r)^-n is below Decimal's resolution: a perpetuity.
        None => monthly_budget.checked_div(r),
    }
    .ok_or_else(|| overflow("affordable principal"))?;

    Ok(pv.floor())
}

/// Full financing quote for a vehicle purchase.
pub fn quote_loan(input: &LoanInput) -> ShowroomResult<ComputationOutput<LoanQuote>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let financed = input.vehicle_price - input.down_payment;
    let payment = monthly_payment(financed, input.annual_rate_pct, input.term_months)?;
    let total = total_amount(financed, input.annual_rate_pct, input.term_months)?;
    let interest = total - financed;

    if input.annual_rate_pct.is_zero() {
        warnings.push("Zero interest rate; installments are straight-line.".into());
    }
    if input.vehicle_price > Decimal::ZERO
        && input.down_payment < input.vehicle_price * LOW_DOWN_PAYMENT_SHARE
    {
        warnings.push(format!(
            "Down payment below {}% of the vehicle price.",
            LOW_DOWN_PAYMENT_SHARE * dec!(100)
        ));
    }
    if input.term_months > LONG_TERM_MONTHS {
        warnings.push(format!(
            "Term of {} months exceeds {} months.",
            input.term_months, LONG_TERM_MONTHS
        ));
    }

    let schedule = if input.include_schedule {
        Some(amortization_schedule(
            financed,
            input.annual_rate_pct,
            input.term_months,
        )?)
    } else {
        None
    };

    debug!(
        financed = %financed,
        rate = %input.annual_rate_pct,
        months = input.term_months,
        payment = %payment,
        "loan quote computed"
    );

    let total_cost = total
        .checked_add(input.down_payment)
        .ok_or_else(|| overflow("total cost"))?;

    let output = LoanQuote {
        financed_amount: financed,
        down_payment: input.down_payment,
        monthly_payment: payment,
        total_interest: interest,
        total_amount: total,
        total_cost,
        term_months: input.term_months,
        schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "monthly_rate": "annual_rate_pct / 100 / 12",
        "rounding": "nearest whole unit, halves away from zero",
        "schedule_interest_rounding": "2 dp per period",
    });

    Ok(with_metadata(
        "Equated monthly installment (standard annuity)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_terms(principal: Money, annual_rate_pct: Percent, months: u32) -> ShowroomResult<()> {
    if months == 0 {
        return Err(ShowroomError::InvalidArgument {
            field: "months".into(),
            reason: "Term must be at least one month.".into(),
        });
    }
    if principal < Decimal::ZERO {
        return Err(ShowroomError::InvalidArgument {
            field: "principal".into(),
            reason: "Principal cannot be negative.".into(),
        });
    }
    if annual_rate_pct < Decimal::ZERO {
        return Err(ShowroomError::InvalidArgument {
            field: "annual_rate_pct".into(),
            reason: "Interest rate cannot be negative.".into(),
        });
    }
    Ok(())
}

fn validate_input(input: &LoanInput) -> ShowroomResult<()> {
    if input.vehicle_price < Decimal::ZERO {
        return Err(ShowroomError::InvalidArgument {
            field: "vehicle_price".into(),
            reason: "Vehicle price cannot be negative.".into(),
        });
    }
    if input.down_payment < Decimal::ZERO {
        return Err(ShowroomError::InvalidArgument {
            field: "down_payment".into(),
            reason: "Down payment cannot be negative.".into(),
        });
    }
    if input.down_payment > input.vehicle_price {
        return Err(ShowroomError::InvalidArgument {
            field: "down_payment".into(),
            reason: "Down payment cannot exceed the vehicle price.".into(),
        });
    }
    Ok(())
}

fn monthly_rate(annual_rate_pct: Percent) -> Decimal {
    annual_rate_pct / dec!(100) / MONTHS_PER_YEAR
}

/// `(1 + r)^n`, or `None` once it leaves Decimal's range.
fn growth_factor(r: Decimal, months: u32) -> Option<Decimal> {
    (Decimal::ONE + r).checked_powu(u64::from(months))
}

fn unrounded_payment(principal: Money, r: Decimal, months: u32) -> ShowroomResult<Money> {
    let n = Decimal::from(months);
    if r.is_zero() {
        return Ok(principal / n);
    }

    let interest = principal
        .checked_mul(r)
        .ok_or_else(|| overflow("periodic interest"))?;

    let growth = match growth_factor(r, months) {
        Some(g) => g,
        // (1+r)^n / ((1+r)^n - 1) is 1 to far below a currency unit.
        None => return Ok(interest),
    };
    let denominator = growth - Decimal::ONE;
    // (1 + r) collapses to 1 when r is below Decimal's resolution.
    if denominator.is_zero() {
        return Ok(principal / n);
    }

    // P * r * g / (g - 1), with the ratio taken first so large g cannot overflow.
    growth
        .checked_div(denominator)
        .and_then(|ratio| interest.checked_mul(ratio))
        .ok_or_else(|| overflow("annuity payment"))
}

fn round_to_unit(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

fn overflow(context: &str) -> ShowroomError {
    ShowroomError::ArithmeticOverflow {
        context: context.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_input() -> LoanInput {
        LoanInput {
            vehicle_price: dec!(120_000),
            down_payment: dec!(20_000),
            annual_rate_pct: dec!(3.99),
            term_months: 60,
            include_schedule: false,
        }
    }

    #[test]
    fn test_monthly_payment_standard_annuity() {
        // 100k at 3.99% over 60 months: 1841.2009... rounds to 1841
        let result = monthly_payment(dec!(100_000), dec!(3.99), 60).unwrap();
        assert_eq!(result, dec!(1841));
    }

    #[test]
    fn test_monthly_payment_other_terms() {
        assert_eq!(monthly_payment(dec!(250_000), dec!(5.5), 48).unwrap(), dec!(5814));
        assert_eq!(monthly_payment(dec!(75_000), dec!(7), 36).unwrap(), dec!(2316));
        assert_eq!(monthly_payment(dec!(180_000), dec!(4.5), 84).unwrap(), dec!(2502));
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        let result = monthly_payment(dec!(120_000), dec!(0), 12).unwrap();
        assert_eq!(result, dec!(10_000));
    }

    #[test]
    fn test_rounding_halves_go_up() {
        // 100 / 8 = 12.5, 10 / 4 = 2.5
        assert_eq!(monthly_payment(dec!(100), dec!(0), 8).unwrap(), dec!(13));
        assert_eq!(monthly_payment(dec!(10), dec!(0), 4).unwrap(), dec!(3));
        // 50000 / 7 = 7142.857...
        assert_eq!(monthly_payment(dec!(50_000), dec!(0), 7).unwrap(), dec!(7143));
    }

    #[test]
    fn test_zero_principal() {
        assert_eq!(monthly_payment(dec!(0), dec!(5), 24).unwrap(), dec!(0));
    }

    #[test]
    fn test_zero_months_rejected() {
        let err = monthly_payment(dec!(100_000), dec!(3.99), 0).unwrap_err();
        match err {
            ShowroomError::InvalidArgument { field, .. } => assert_eq!(field, "months"),
            other => panic!("Expected InvalidArgument, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_inputs_rejected() {
        assert!(matches!(
            monthly_payment(dec!(-1), dec!(3.99), 12),
            Err(ShowroomError::InvalidArgument { .. })
        ));
        assert!(matches!(
            monthly_payment(dec!(1000), dec!(-0.5), 12),
            Err(ShowroomError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_total_interest_identity() {
        let payment = monthly_payment(dec!(100_000), dec!(3.99), 60).unwrap();
        let interest = total_interest(dec!(100_000), dec!(3.99), 60).unwrap();
        assert_eq!(interest, payment * dec!(60) - dec!(100_000));
        // 1841 * 60 - 100000
        assert_eq!(interest, dec!(10_460));
        assert_eq!(total_amount(dec!(100_000), dec!(3.99), 60).unwrap(), dec!(110_460));
    }

    #[test]
    fn test_schedule_closes_at_zero() {
        let rows = amortization_schedule(dec!(100_000), dec!(3.99), 60).unwrap();
        assert_eq!(rows.len(), 60);
        assert_eq!(rows.last().unwrap().balance, Decimal::ZERO);
        let repaid: Decimal = rows.iter().map(|r| r.principal).sum();
        assert_eq!(repaid, dec!(100_000));
        // First month interest: 100000 * 0.003325
        assert_eq!(rows[0].interest, dec!(332.50));
        assert_eq!(rows[0].principal, dec!(1508.50));
    }

    #[test]
    fn test_schedule_ends_early_when_rounding_overpays() {
        // 2 / 4 = 0.5 rounds to 1, so two payments settle the loan
        let rows = amortization_schedule(dec!(2), dec!(0), 4).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].balance, Decimal::ZERO);
    }

    #[test]
    fn test_max_affordable_principal_inverts_payment() {
        let principal = max_affordable_principal(dec!(1841.21), dec!(3.99), 60).unwrap();
        assert_eq!(principal, dec!(100_000));

        let straight = max_affordable_principal(dec!(1000), dec!(0), 12).unwrap();
        assert_eq!(straight, dec!(12_000));
    }

    #[test]
    fn test_growth_beyond_range_pays_interest_only() {
        // (1 + 1/12)^1200 exceeds Decimal; the installment is P * r.
        assert_eq!(monthly_payment(dec!(100_000), dec!(100), 1200).unwrap(), dec!(8333));
        assert_eq!(monthly_payment(dec!(100_000), dec!(600), 2400).unwrap(), dec!(50_000));

        let principal = max_affordable_principal(dec!(8333.34), dec!(100), 1200).unwrap();
        assert_eq!(principal, dec!(100_000));
    }

    #[test]
    fn test_max_affordable_principal_overflow_is_an_error() {
        for rate in [dec!(0), dec!(5)] {
            let err = max_affordable_principal(Decimal::MAX, rate, 12).unwrap_err();
            assert!(matches!(err, ShowroomError::ArithmeticOverflow { .. }), "{err}");
        }
    }

    #[test]
    fn test_quote_loan_basic() {
        let out = quote_loan(&sample_input()).unwrap();
        let q = &out.result;
        assert_eq!(q.financed_amount, dec!(100_000));
        assert_eq!(q.monthly_payment, dec!(1841));
        assert_eq!(q.total_interest, dec!(10_460));
        assert_eq!(q.total_cost, dec!(130_460));
        assert!(q.schedule.is_none());
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_quote_loan_warnings() {
        let input = LoanInput {
            down_payment: dec!(0),
            annual_rate_pct: dec!(0),
            term_months: 96,
            ..sample_input()
        };
        let out = quote_loan(&input).unwrap();
        assert_eq!(out.warnings.len(), 3);
    }

    #[test]
    fn test_quote_loan_rejects_excess_down_payment() {
        let input = LoanInput {
            down_payment: dec!(130_000),
            ..sample_input()
        };
        assert!(matches!(
            quote_loan(&input),
            Err(ShowroomError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_quote_loan_with_schedule() {
        let input = LoanInput {
            include_schedule: true,
            ..sample_input()
        };
        let out = quote_loan(&input).unwrap();
        let schedule = out.result.schedule.unwrap();
        assert_eq!(schedule.len(), 60);
    }
}
