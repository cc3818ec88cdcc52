//! Rate rule model and calculation methods.
//!
//! A [`RateRule`] is one row of the formula column in the Third Schedule. It
//! covers a half-open wage span and expands into fixed-width wage bands.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// How a contribution amount is derived from a band's wage boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMethod {
    /// The configured amount is returned unchanged. Used for the
    /// not-applicable zero row at the bottom of each section.
    Fixed,
    /// The amount is a fraction of the wage base, rounded up to the next
    /// whole currency unit.
    Percentage,
    /// The amount is used verbatim regardless of the wage base.
    ExactAmount,
}

/// A band-generating rule covering `[minimum, maximum)` in steps of `interval`.
///
/// # Example
///
/// ```
/// use epf_engine::models::{CalculationMethod, RateRule};
/// use rust_decimal::Decimal;
///
/// let rule = RateRule {
///     minimum: Decimal::from(20),
///     maximum: Decimal::from(5000),
///     interval: Decimal::from(20),
///     employer_method: CalculationMethod::Percentage,
///     employer_amount: Decimal::new(13, 2),
///     employee_method: CalculationMethod::Percentage,
///     employee_amount: Decimal::new(11, 2),
/// };
/// assert_eq!(rule.band_count(), 249);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRule {
    /// Inclusive lower wage of the span covered by this rule.
    pub minimum: Decimal,
    /// Exclusive upper wage of the span covered by this rule.
    pub maximum: Decimal,
    /// Width of each generated wage band.
    pub interval: Decimal,
    /// Method used for the employer's share.
    pub employer_method: CalculationMethod,
    /// Percentage or amount for the employer's share.
    pub employer_amount: Decimal,
    /// Method used for the employee's share.
    pub employee_method: CalculationMethod,
    /// Percentage or amount for the employee's share.
    pub employee_amount: Decimal,
}

impl RateRule {
    /// Number of bands this rule expands into.
    ///
    /// Returns zero for a rule with a non-positive interval or an empty span;
    /// such rules are rejected when a section is built.
    pub fn band_count(&self) -> usize {
        if self.interval <= Decimal::ZERO || self.maximum <= self.minimum {
            return 0;
        }
        let span = self.maximum - self.minimum;
        (span / self.interval).ceil().to_usize().unwrap_or(0)
    }
}
