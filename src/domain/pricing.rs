//! Stay pricing
//!
//! `total = nightly_rate × nights`, where `nights = ceil(hours / 24)`:
//! any partial day is charged as a full night.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::{DomainError, DomainResult};

/// Decimal places of the smallest currency unit
pub const CURRENCY_SCALE: u32 = 2;

const MILLIS_PER_NIGHT: i64 = 24 * 60 * 60 * 1000;

/// Number of nights charged for a stay, partial days rounded up.
pub fn nights(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> i64 {
    let millis = (check_out - check_in).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    (millis + MILLIS_PER_NIGHT - 1) / MILLIS_PER_NIGHT
}

/// Total charge for a stay, rounded half-even to the smallest currency unit.
///
/// Callers have already validated the window, so a non-positive rate or
/// night count is reported as `Internal`.
pub fn price(
    nightly_rate: Decimal,
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
) -> DomainResult<Decimal> {
    if nightly_rate <= Decimal::ZERO {
        return Err(DomainError::Internal(format!(
            "non-positive nightly rate: {nightly_rate}"
        )));
    }
    let nights = nights(check_in, check_out);
    if nights <= 0 {
        return Err(DomainError::Internal("stay must last at least one night".into()));
    }

    nightly_rate
        .checked_mul(Decimal::from(nights))
        .map(|total| {
            total.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointNearestEven)
        })
        .ok_or_else(|| DomainError::Internal("total price overflow".into()))
}

/// Amount in minor units (cents), the persisted representation.
pub fn to_minor_units(amount: Decimal) -> DomainResult<i64> {
    let scaled = amount
        .round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointNearestEven)
        .checked_mul(Decimal::from(10_i64.pow(CURRENCY_SCALE)))
        .ok_or_else(|| DomainError::Internal("amount overflow".into()))?;
    i64::try_from(scaled.trunc())
        .map_err(|e| DomainError::Internal(format!("amount out of range: {e}")))
}

pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, CURRENCY_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::str::FromStr;

    fn d0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 15, 0, 0).unwrap()
    }

    fn rate(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn partial_day_is_one_night() {
        let total = price(rate("120.00"), d0(), d0() + Duration::hours(23)).unwrap();
        assert_eq!(total, rate("120.00"));
    }

    #[test]
    fn just_over_a_day_is_two_nights() {
        let total = price(rate("120.00"), d0(), d0() + Duration::hours(25)).unwrap();
        assert_eq!(total, rate("240.00"));
    }

    #[test]
    fn exact_days_are_not_rounded_up() {
        assert_eq!(nights(d0(), d0() + Duration::days(3)), 3);
        assert_eq!(nights(d0(), d0() + Duration::days(3) + Duration::seconds(1)), 4);
    }

    #[test]
    fn rejects_non_positive_rate_and_empty_stay() {
        let out = d0() + Duration::days(1);
        assert!(matches!(
            price(Decimal::ZERO, d0(), out),
            Err(DomainError::Internal(_))
        ));
        assert!(matches!(
            price(rate("-5"), d0(), out),
            Err(DomainError::Internal(_))
        ));
        assert!(matches!(
            price(rate("100"), d0(), d0()),
            Err(DomainError::Internal(_))
        ));
    }

    #[test]
    fn rounds_half_to_even_at_the_cent() {
        // 0.125 × 1 night → 0.12, 0.135 × 1 night → 0.14
        let out = d0() + Duration::hours(1);
        assert_eq!(price(rate("0.125"), d0(), out).unwrap(), rate("0.12"));
        assert_eq!(price(rate("0.135"), d0(), out).unwrap(), rate("0.14"));
    }

    #[test]
    fn minor_units_conversion() {
        assert_eq!(to_minor_units(rate("240.00")).unwrap(), 24_000);
        assert_eq!(to_minor_units(rate("99.995")).unwrap(), 10_000);
        assert_eq!(from_minor_units(24_050), rate("240.50"));
    }
}
