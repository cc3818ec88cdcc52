//! Contribution rate model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The smallest currency unit (one sen).
///
/// Band lower bounds are offset by this amount so that consecutive bands
/// never share a boundary value.
pub const SMALLEST_UNIT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// A resolved contribution pair for a wage range.
///
/// For tabulated bands `wages_from` is the previous band's upper bound plus
/// [`SMALLEST_UNIT`] and `wages_to` is inclusive. Rates extrapolated above the
/// table have `wages_from == wages_to == wages`.
///
/// # Example
///
/// ```
/// use epf_engine::models::Rate;
/// use rust_decimal::Decimal;
///
/// let rate = Rate {
///     wages_from: Decimal::new(54001, 2),
///     wages_to: Decimal::from(560),
///     contribution_employer: Decimal::from(73),
///     contribution_employee: Decimal::from(62),
/// };
/// assert_eq!(rate.contribution_total(), Decimal::from(135));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    /// Lowest wage covered by this rate.
    pub wages_from: Decimal,
    /// Highest wage covered by this rate (inclusive).
    pub wages_to: Decimal,
    /// Monthly contribution payable by the employer.
    pub contribution_employer: Decimal,
    /// Monthly contribution payable by the employee.
    pub contribution_employee: Decimal,
}

impl Rate {
    /// Returns the total contribution from employer and employee.
    pub fn contribution_total(&self) -> Decimal {
        self.contribution_employer + self.contribution_employee
    }

    /// Returns true if `wages` falls inside this band.
    ///
    /// The lower boundary is exclusive at the previous band's upper bound,
    /// so sub-unit wages between two bands still land in exactly one band.
    pub fn covers(&self, wages: Decimal) -> bool {
        wages > self.wages_from - SMALLEST_UNIT && wages <= self.wages_to
    }
}
