//! A single Part of the contribution schedule.

use rust_decimal::Decimal;

use crate::calculation::{build_rates, resolve_rate, validate_rules};
use crate::error::EngineResult;
use crate::models::{Rate, RateRule};

/// One Part of the schedule with its rules and the band table built from them.
///
/// A `Section` can only be created through [`Section::new`], which validates
/// the rules and builds the table once. The table never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// The section name ("A" to "D" in the Third Schedule).
    pub name: String,
    /// Who the section applies to, as worded in the schedule.
    pub description: String,
    rules: Vec<RateRule>,
    rates: Vec<Rate>,
}

impl Section {
    /// Validates `rules` and builds the section's rate table.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidSchedule`](crate::error::EngineError::InvalidSchedule)
    /// if the rules are empty, overlap, leave gaps, or do not divide evenly
    /// into their intervals.
    ///
    /// # Examples
    ///
    /// ```
    /// use epf_engine::models::{CalculationMethod, RateRule};
    /// use epf_engine::schedule::Section;
    /// use rust_decimal::Decimal;
    ///
    /// let rules = vec![RateRule {
    ///     minimum: Decimal::ZERO,
    ///     maximum: Decimal::from(100),
    ///     interval: Decimal::from(20),
    ///     employer_method: CalculationMethod::Percentage,
    ///     employer_amount: Decimal::new(13, 2),
    ///     employee_method: CalculationMethod::Percentage,
    ///     employee_amount: Decimal::new(11, 2),
    /// }];
    /// let section = Section::new("X", "Example", rules).unwrap();
    /// assert_eq!(section.rates().len(), 5);
    /// ```
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        rules: Vec<RateRule>,
    ) -> EngineResult<Self> {
        let name = name.into();
        validate_rules(&name, &rules)?;
        let rates = build_rates(&rules);

        Ok(Self {
            name,
            description: description.into(),
            rules,
            rates,
        })
    }

    /// The rules the section's table was built from.
    pub fn rules(&self) -> &[RateRule] {
        &self.rules
    }

    /// The full band table, ascending by wages.
    pub fn rates(&self) -> &[Rate] {
        &self.rates
    }

    /// Highest wages covered by the table. Wages above this are extrapolated.
    pub fn highest_tabulated_wages(&self) -> Decimal {
        self.rates
            .last()
            .map(|rate| rate.wages_to)
            .unwrap_or(Decimal::ZERO)
    }

    /// Returns the rate for `wages` within this section.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidWages`](crate::error::EngineError::InvalidWages)
    /// for negative wages.
    pub fn rate_for_wages(&self, wages: Decimal) -> EngineResult<Rate> {
        resolve_rate(self, wages).map(|resolved| resolved.rate)
    }
}
