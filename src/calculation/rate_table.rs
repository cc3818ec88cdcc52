//! Rate table construction.
//!
//! This module expands a section's [`RateRule`]s into the flat, ascending
//! table of wage bands printed in the Third Schedule, and checks that a rule
//! set is well formed before it is expanded.

use rust_decimal::Decimal;
use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::{CalculationMethod, Rate, RateRule, SMALLEST_UNIT};

/// Applies a calculation method to a wage base.
///
/// Percentages are rounded up to the next whole currency unit. Fixed and
/// exact amounts are returned unchanged.
///
/// # Examples
///
/// ```
/// use epf_engine::calculation::apply_method;
/// use epf_engine::models::CalculationMethod;
/// use rust_decimal::Decimal;
///
/// let base = Decimal::from(560);
/// let pct = Decimal::new(13, 2);
/// assert_eq!(apply_method(CalculationMethod::Percentage, base, pct), Decimal::from(73));
/// assert_eq!(apply_method(CalculationMethod::ExactAmount, base, Decimal::from(5)), Decimal::from(5));
/// ```
pub fn apply_method(method: CalculationMethod, base: Decimal, amount: Decimal) -> Decimal {
    match method {
        CalculationMethod::Fixed | CalculationMethod::ExactAmount => amount,
        CalculationMethod::Percentage => (base * amount).ceil(),
    }
}

/// Computes a rule's contributions for the range ending at `wages_to`.
pub(crate) fn band_rate(rule: &RateRule, wages_from: Decimal, wages_to: Decimal) -> Rate {
    Rate {
        wages_from,
        wages_to,
        contribution_employer: apply_method(rule.employer_method, wages_to, rule.employer_amount),
        contribution_employee: apply_method(rule.employee_method, wages_to, rule.employee_amount),
    }
}

/// Expands rules into the ordered table of wage bands.
///
/// Each rule contributes one band per `interval` step from `minimum` up to
/// `maximum`. A band's contributions are computed against its upper bound and
/// its lower bound is offset by [`SMALLEST_UNIT`].
///
/// The rules are assumed to have passed [`validate_rules`].
pub fn build_rates(rules: &[RateRule]) -> Vec<Rate> {
    let capacity = rules.iter().map(RateRule::band_count).sum();
    let mut rates = Vec::with_capacity(capacity);

    for rule in rules {
        if rule.interval <= Decimal::ZERO {
            continue;
        }
        let mut from = rule.minimum;
        while from < rule.maximum {
            let to = from + rule.interval;
            rates.push(band_rate(rule, from + SMALLEST_UNIT, to));
            from = to;
        }
    }

    rates
}

/// Checks that a section's rules can be expanded into a contiguous table.
///
/// # Errors
///
/// Returns [`EngineError::InvalidSchedule`] when the rule set is empty, a rule
/// has a non-positive interval or an empty span, a span is not a whole number
/// of intervals, a rule does not start where the previous one ended, the
/// first rule starts below zero, or any amount is negative.
pub fn validate_rules(section: &str, rules: &[RateRule]) -> EngineResult<()> {
    let invalid = |message: String| {
        warn!(section, %message, "Rejected schedule section");
        EngineError::InvalidSchedule {
            section: section.to_string(),
            message,
        }
    };

    let first = rules
        .first()
        .ok_or_else(|| invalid("section has no rate rules".to_string()))?;
    if first.minimum < Decimal::ZERO {
        return Err(invalid(format!(
            "first rule starts at negative wages {}",
            first.minimum
        )));
    }

    for (i, rule) in rules.iter().enumerate() {
        let number = i + 1;
        if rule.interval <= Decimal::ZERO {
            return Err(invalid(format!(
                "rule {} has non-positive interval {}",
                number, rule.interval
            )));
        }
        if rule.maximum <= rule.minimum {
            return Err(invalid(format!(
                "rule {} maximum {} is not above minimum {}",
                number, rule.maximum, rule.minimum
            )));
        }
        if !((rule.maximum - rule.minimum) % rule.interval).is_zero() {
            return Err(invalid(format!(
                "rule {} span {}..{} is not a multiple of interval {}",
                number, rule.minimum, rule.maximum, rule.interval
            )));
        }
        if rule.employer_amount < Decimal::ZERO || rule.employee_amount < Decimal::ZERO {
            return Err(invalid(format!("rule {} has a negative amount", number)));
        }
        if i > 0 && rules[i - 1].maximum != rule.minimum {
            return Err(invalid(format!(
                "rule {} starts at {} but previous rule ends at {}",
                number,
                rule.minimum,
                rules[i - 1].maximum
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn rule(
        minimum: &str,
        maximum: &str,
        interval: &str,
        employer: (CalculationMethod, &str),
        employee: (CalculationMethod, &str),
    ) -> RateRule {
        RateRule {
            minimum: dec(minimum),
            maximum: dec(maximum),
            interval: dec(interval),
            employer_method: employer.0,
            employer_amount: dec(employer.1),
            employee_method: employee.0,
            employee_amount: dec(employee.1),
        }
    }

    fn section_a_rules() -> Vec<RateRule> {
        use CalculationMethod::*;
        vec![
            rule("0", "10", "10", (Fixed, "0"), (Fixed, "0")),
            rule("10", "20", "10", (Percentage, "0.13"), (Percentage, "0.11")),
            rule("20", "5000", "20", (Percentage, "0.13"), (Percentage, "0.11")),
            rule("5000", "20000", "100", (Percentage, "0.12"), (Percentage, "0.11")),
        ]
    }

    #[test]
    fn test_apply_fixed_returns_amount_unchanged() {
        let result = apply_method(CalculationMethod::Fixed, dec("560"), dec("0"));
        assert_eq!(result, dec("0"));
    }

    #[test]
    fn test_apply_percentage_rounds_up() {
        assert_eq!(
            apply_method(CalculationMethod::Percentage, dec("560"), dec("0.13")),
            dec("73")
        );
        assert_eq!(
            apply_method(CalculationMethod::Percentage, dec("20"), dec("0.11")),
            dec("3")
        );
    }

    #[test]
    fn test_apply_percentage_exact_result_is_not_bumped() {
        let result = apply_method(CalculationMethod::Percentage, dec("1500"), dec("0.11"));
        assert_eq!(result, dec("165"));
    }

    #[test]
    fn test_apply_exact_amount_is_not_rounded() {
        let result = apply_method(CalculationMethod::ExactAmount, dec("720"), dec("5.50"));
        assert_eq!(result, dec("5.50"));
    }

    #[test]
    fn test_build_rates_band_count() {
        let rates = build_rates(&section_a_rules());
        assert_eq!(rates.len(), 1 + 1 + 249 + 150);
    }

    #[test]
    fn test_build_rates_first_band_is_not_applicable_row() {
        let rates = build_rates(&section_a_rules());
        assert_eq!(
            rates[0],
            Rate {
                wages_from: dec("0.01"),
                wages_to: dec("10"),
                contribution_employer: dec("0"),
                contribution_employee: dec("0"),
            }
        );
    }

    #[test]
    fn test_build_rates_band_uses_upper_bound_as_base() {
        let rates = build_rates(&section_a_rules());
        let band = rates
            .iter()
            .find(|r| r.wages_to == dec("560"))
            .unwrap();
        assert_eq!(band.wages_from, dec("540.01"));
        assert_eq!(band.contribution_employer, dec("73"));
        assert_eq!(band.contribution_employee, dec("62"));
    }

    #[test]
    fn test_build_rates_last_band_ends_at_maximum() {
        let rates = build_rates(&section_a_rules());
        let last = rates.last().unwrap();
        assert_eq!(last.wages_from, dec("19900.01"));
        assert_eq!(last.wages_to, dec("20000"));
        assert_eq!(last.contribution_employer, dec("2400"));
        assert_eq!(last.contribution_employee, dec("2200"));
    }

    #[test]
    fn test_build_rates_exact_amount_employer() {
        use CalculationMethod::*;
        let rules = vec![rule("10", "30", "10", (ExactAmount, "5"), (Percentage, "0.11"))];
        let rates = build_rates(&rules);
        assert_eq!(rates.len(), 2);
        assert!(rates.iter().all(|r| r.contribution_employer == dec("5")));
        assert_eq!(rates[1].contribution_employee, dec("4"));
    }

    #[test]
    fn test_build_rates_is_deterministic() {
        assert_eq!(build_rates(&section_a_rules()), build_rates(&section_a_rules()));
    }

    #[test]
    fn test_validate_accepts_third_schedule_rules() {
        assert!(validate_rules("A", &section_a_rules()).is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_rules() {
        let result = validate_rules("A", &[]);
        assert!(matches!(
            result,
            Err(EngineError::InvalidSchedule { ref section, .. }) if section == "A"
        ));
    }

    #[test]
    fn test_validate_rejects_gap_between_rules() {
        let mut rules = section_a_rules();
        rules[2].minimum = dec("40");
        match validate_rules("A", &rules) {
            Err(EngineError::InvalidSchedule { message, .. }) => {
                assert_eq!(message, "rule 3 starts at 40 but previous rule ends at 20");
            }
            other => panic!("Expected InvalidSchedule error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_overlapping_rules() {
        let mut rules = section_a_rules();
        rules[3].minimum = dec("4900");
        assert!(validate_rules("A", &rules).is_err());
    }

    #[test]
    fn test_validate_rejects_span_not_multiple_of_interval() {
        use CalculationMethod::*;
        let rules = vec![rule("0", "25", "10", (Fixed, "0"), (Fixed, "0"))];
        assert!(validate_rules("X", &rules).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        use CalculationMethod::*;
        let rules = vec![rule("0", "10", "0", (Fixed, "0"), (Fixed, "0"))];
        assert!(validate_rules("X", &rules).is_err());
    }

    #[test]
    fn test_validate_rejects_negative_start() {
        use CalculationMethod::*;
        let rules = vec![rule("-10", "10", "10", (Fixed, "0"), (Fixed, "0"))];
        assert!(validate_rules("X", &rules).is_err());
    }

    #[test]
    fn test_validate_rejects_negative_amount() {
        use CalculationMethod::*;
        let rules = vec![rule("0", "10", "10", (ExactAmount, "-5"), (Fixed, "0"))];
        assert!(validate_rules("X", &rules).is_err());
    }

    proptest! {
        #[test]
        fn prop_bands_are_contiguous(
            steps in proptest::collection::vec((1u32..20, 1u32..500), 1..5)
        ) {
            let mut rules = Vec::new();
            let mut minimum = Decimal::ZERO;
            for (count, interval) in steps {
                let interval = Decimal::from(interval);
                let maximum = minimum + interval * Decimal::from(count);
                rules.push(RateRule {
                    minimum,
                    maximum,
                    interval,
                    employer_method: CalculationMethod::Percentage,
                    employer_amount: dec("0.13"),
                    employee_method: CalculationMethod::Percentage,
                    employee_amount: dec("0.11"),
                });
                minimum = maximum;
            }
            prop_assert!(validate_rules("P", &rules).is_ok());

            let rates = build_rates(&rules);
            prop_assert_eq!(rates.len(), rules.iter().map(RateRule::band_count).sum::<usize>());
            for pair in rates.windows(2) {
                prop_assert!(pair[0].wages_to < pair[1].wages_to);
                prop_assert_eq!(pair[0].wages_to + SMALLEST_UNIT, pair[1].wages_from);
            }
            prop_assert_eq!(rates.last().unwrap().wages_to, minimum);
        }

        #[test]
        fn prop_percentage_is_ceiling_of_upper_bound(
            to_cents in 1i64..10_000_000,
            pct_basis_points in 0i64..10_000,
        ) {
            let to = Decimal::new(to_cents, 2);
            let pct = Decimal::new(pct_basis_points, 4);
            let amount = apply_method(CalculationMethod::Percentage, to, pct);
            prop_assert!(amount.fract().is_zero());
            prop_assert!(amount >= to * pct);
            prop_assert!(amount - to * pct < Decimal::ONE);
        }
    }
}
