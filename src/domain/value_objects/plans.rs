use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::enums::plan_types::PlanType;

/// Absolute tolerance when comparing a submitted amount against the
/// canonical plan price.
pub const PRICE_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanModel {
    pub plan_type: PlanType,
    pub price: f64,
}

impl From<PlanType> for PlanModel {
    fn from(plan_type: PlanType) -> Self {
        Self {
            plan_type,
            price: canonical_price(plan_type),
        }
    }
}

/// Server-defined prices in BDT. The lifetime price is the source's
/// promotional one.
pub fn canonical_price(plan_type: PlanType) -> f64 {
    match plan_type {
        PlanType::Monthly => 199.00,
        PlanType::Quarterly => 499.00,
        PlanType::Yearly => 1599.00,
        PlanType::Lifetime => 30.00,
    }
}

pub fn amount_matches(amount: f64, plan_type: PlanType) -> bool {
    (amount - canonical_price(plan_type)).abs() <= PRICE_TOLERANCE
}

pub fn list_plans() -> Vec<PlanModel> {
    PlanType::ALL.into_iter().map(PlanModel::from).collect()
}

/// Subscription end date for a plan bought at `from`.
///
/// Calendar arithmetic uses `chrono::Months`, which clamps an overflowing
/// day-of-month to the end of the target month (Jan 31 + 1 month = Feb 28/29).
/// Lifetime is a far-future date, not a sentinel.
pub fn calculate_expiry(plan_type: PlanType, from: DateTime<Utc>) -> DateTime<Utc> {
    let months = match plan_type {
        PlanType::Monthly => 1,
        PlanType::Quarterly => 3,
        PlanType::Yearly => 12,
        PlanType::Lifetime => 1200,
    };

    from.checked_add_months(Months::new(months))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn prices_are_distinct_per_plan() {
        let mut prices: Vec<f64> = PlanType::ALL.into_iter().map(canonical_price).collect();
        prices.sort_by(|a, b| a.partial_cmp(b).unwrap());
        prices.dedup();
        assert_eq!(prices.len(), PlanType::ALL.len());
    }

    #[test]
    fn amount_within_tolerance_matches() {
        assert!(amount_matches(199.00, PlanType::Monthly));
        assert!(amount_matches(199.01, PlanType::Monthly));
        assert!(amount_matches(198.99, PlanType::Monthly));
        assert!(!amount_matches(198.98, PlanType::Monthly));
        assert!(!amount_matches(50.00, PlanType::Yearly));
    }

    #[test]
    fn monthly_expiry_is_one_calendar_month() {
        let from = Utc.with_ymd_and_hms(2025, 3, 15, 10, 30, 0).unwrap();
        let expected = Utc.with_ymd_and_hms(2025, 4, 15, 10, 30, 0).unwrap();
        assert_eq!(calculate_expiry(PlanType::Monthly, from), expected);
    }

    #[test]
    fn quarterly_expiry_is_three_months() {
        let from = Utc.with_ymd_and_hms(2025, 11, 1, 0, 0, 0).unwrap();
        let expected = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        assert_eq!(calculate_expiry(PlanType::Quarterly, from), expected);
    }

    #[test]
    fn yearly_expiry_is_one_calendar_year() {
        let from = Utc.with_ymd_and_hms(2025, 6, 30, 23, 59, 59).unwrap();
        let expected = Utc.with_ymd_and_hms(2026, 6, 30, 23, 59, 59).unwrap();
        assert_eq!(calculate_expiry(PlanType::Yearly, from), expected);
    }

    #[test]
    fn lifetime_expiry_is_at_least_ninety_nine_years_out() {
        let from = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let expiry = calculate_expiry(PlanType::Lifetime, from);
        let ninety_nine_years = from.checked_add_months(Months::new(99 * 12)).unwrap();
        assert!(expiry >= ninety_nine_years);
    }

    #[test]
    fn month_end_overflow_clamps_to_last_day() {
        let from = Utc.with_ymd_and_hms(2025, 1, 31, 8, 0, 0).unwrap();
        let expected = Utc.with_ymd_and_hms(2025, 2, 28, 8, 0, 0).unwrap();
        assert_eq!(calculate_expiry(PlanType::Monthly, from), expected);
    }
}
