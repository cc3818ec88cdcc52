//! Rate resolution functionality.
//!
//! This module finds the contribution rate for a wage amount within a section,
//! either from the section's band table or, for wages above the last band, by
//! applying the section's final rule directly to the wages.

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, Rate, SMALLEST_UNIT};
use crate::schedule::Section;

use super::rate_table::band_rate;

/// Where a resolved rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    /// The rate is a band of the section's table.
    Table {
        /// Zero-based index of the band within the table.
        band: usize,
    },
    /// Wages exceed the table; the final rule was applied to the wages.
    Extrapolated,
}

/// A rate together with how it was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRate {
    /// The resolved rate.
    pub rate: Rate,
    /// Whether the rate was tabulated or extrapolated.
    pub source: RateSource,
}

impl ResolvedRate {
    /// Returns true if the rate was computed beyond the table.
    pub fn is_extrapolated(&self) -> bool {
        self.source == RateSource::Extrapolated
    }
}

/// The result of an audited rate lookup.
#[derive(Debug, Clone)]
pub struct RateLookupResult {
    /// The resolved rate and its source.
    pub resolved: ResolvedRate,
    /// The audit step recording this lookup.
    pub audit_step: AuditStep,
}

/// Resolves the contribution rate for `wages` within a section.
///
/// Bands are matched with an exclusive lower boundary at the previous band's
/// upper bound and an inclusive upper bound. Wages at or below the first
/// band's lower boundary, including zero, resolve to the first band. Wages
/// above the last band get a synthetic rate with `wages_from == wages_to ==
/// wages`, computed from the section's last rule.
///
/// # Errors
///
/// Returns [`EngineError::InvalidWages`] for negative wages.
///
/// # Examples
///
/// ```
/// use epf_engine::calculation::resolve_rate;
/// use epf_engine::schedule::Schedule;
/// use rust_decimal::Decimal;
///
/// let schedule = Schedule::third_schedule().unwrap();
/// let section = schedule.section_by_name("A").unwrap();
///
/// let resolved = resolve_rate(section, Decimal::from(550)).unwrap();
/// assert_eq!(resolved.rate.contribution_employer, Decimal::from(73));
///
/// let resolved = resolve_rate(section, Decimal::from(25000)).unwrap();
/// assert!(resolved.is_extrapolated());
/// assert_eq!(resolved.rate.contribution_employer, Decimal::from(3000));
/// ```
pub fn resolve_rate(section: &Section, wages: Decimal) -> EngineResult<ResolvedRate> {
    if wages < Decimal::ZERO {
        return Err(EngineError::InvalidWages { wages });
    }

    let rates = section.rates();
    let below_table = rates
        .first()
        .filter(|first| wages <= first.wages_from - SMALLEST_UNIT);
    if let Some(first) = below_table {
        debug!(section = %section.name, %wages, "Wages at or below first band");
        return Ok(ResolvedRate {
            rate: *first,
            source: RateSource::Table { band: 0 },
        });
    }

    if let Some(band) = rates.iter().position(|rate| rate.covers(wages)) {
        debug!(section = %section.name, %wages, band, "Resolved wages to tabulated band");
        return Ok(ResolvedRate {
            rate: rates[band],
            source: RateSource::Table { band },
        });
    }

    let rule = section
        .rules()
        .last()
        .ok_or_else(|| EngineError::InvalidSchedule {
            section: section.name.clone(),
            message: "section has no rate rules".to_string(),
        })?;
    debug!(section = %section.name, %wages, "Wages above table, extrapolating from last rule");

    Ok(ResolvedRate {
        rate: band_rate(rule, wages, wages),
        source: RateSource::Extrapolated,
    })
}

/// Resolves a rate and records an audit step describing the decision.
///
/// # Arguments
///
/// * `section` - The section whose table is searched
/// * `wages` - The monthly wages to resolve
/// * `step_number` - The step number for audit trail sequencing
pub fn lookup_rate(
    section: &Section,
    wages: Decimal,
    step_number: u32,
) -> EngineResult<RateLookupResult> {
    let resolved = resolve_rate(section, wages)?;
    let rate = resolved.rate;

    let (source, reasoning) = match resolved.source {
        RateSource::Table { band } => (
            serde_json::json!({ "type": "table", "band": band }),
            format!(
                "Wages {} fall in band {} to {} of section {}: employer {}, employee {}",
                wages,
                rate.wages_from,
                rate.wages_to,
                section.name,
                rate.contribution_employer,
                rate.contribution_employee
            ),
        ),
        RateSource::Extrapolated => (
            serde_json::json!({ "type": "extrapolated" }),
            format!(
                "Wages {} exceed the highest band of section {}; applied the final rule to the wages: employer {}, employee {}",
                wages, section.name, rate.contribution_employer, rate.contribution_employee
            ),
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "rate_lookup".to_string(),
        rule_name: "Rate Lookup".to_string(),
        schedule_ref: format!("Third Schedule, Part {}", section.name),
        input: serde_json::json!({
            "section": section.name,
            "wages": wages.to_string()
        }),
        output: serde_json::json!({
            "wages_from": rate.wages_from.to_string(),
            "wages_to": rate.wages_to.to_string(),
            "contribution_employer": rate.contribution_employer.to_string(),
            "contribution_employee": rate.contribution_employee.to_string(),
            "source": source
        }),
        reasoning,
    };

    Ok(RateLookupResult {
        resolved,
        audit_step,
    })
}
