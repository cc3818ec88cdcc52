//! The contribution schedule.
//!
//! A [`Schedule`] is the immutable, fully built form of a schedule
//! configuration: every section with its validated rules and band table, plus
//! a mapping from [`SectionId`] to section that the classifier relies on.
//!
//! The Third Schedule bundled with the crate is available through
//! [`Schedule::third_schedule`], which builds it once per process.

mod section;

pub use section::Section;

use std::sync::OnceLock;
use std::time::Instant;

use chrono::{NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

use crate::calculation::{
    SectionId, candidate_sections, classify_section, classify_section_audited, lookup_rate,
};
use crate::config::{ConfigLoader, ScheduleConfig, ScheduleMetadata};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditTrace, AuditWarning, ContributionResult, Employee, Rate};

static THIRD_SCHEDULE: OnceLock<EngineResult<Schedule>> = OnceLock::new();

/// A built contribution schedule.
///
/// # Example
///
/// ```
/// use epf_engine::schedule::Schedule;
/// use rust_decimal::Decimal;
///
/// let schedule = Schedule::third_schedule().unwrap();
/// let section = schedule.section_by_name("B").unwrap();
/// let rate = section.rate_for_wages(Decimal::from(720)).unwrap();
/// assert_eq!(rate.contribution_employee, Decimal::from(80));
/// ```
#[derive(Debug, Clone)]
pub struct Schedule {
    metadata: ScheduleMetadata,
    sections: Vec<Section>,
    by_id: [usize; 4],
}

impl Schedule {
    /// Creates a schedule from built sections.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidSchedule`] if two sections share a name
    /// or if any of the sections "A" to "D" is missing.
    pub fn new(metadata: ScheduleMetadata, sections: Vec<Section>) -> EngineResult<Self> {
        for (i, section) in sections.iter().enumerate() {
            if sections[..i].iter().any(|s| s.name == section.name) {
                return Err(EngineError::InvalidSchedule {
                    section: section.name.clone(),
                    message: "section is defined more than once".to_string(),
                });
            }
        }

        let mut by_id = [0; 4];
        for id in SectionId::ALL {
            by_id[id.index()] = sections
                .iter()
                .position(|s| s.name == id.as_str())
                .ok_or_else(|| EngineError::InvalidSchedule {
                    section: id.to_string(),
                    message: "schedule does not define this section".to_string(),
                })?;
        }

        info!(
            code = %metadata.code,
            version = %metadata.version,
            sections = sections.len(),
            bands = sections.iter().map(|s| s.rates().len()).sum::<usize>(),
            "Built contribution schedule"
        );

        Ok(Self {
            metadata,
            sections,
            by_id,
        })
    }

    /// Validates a configuration and builds every section's table.
    pub fn from_config(config: &ScheduleConfig) -> EngineResult<Self> {
        let sections = config
            .sections()
            .iter()
            .map(|s| Section::new(s.name.clone(), s.description.clone(), s.rules.clone()))
            .collect::<EngineResult<Vec<_>>>()?;

        Self::new(config.metadata().clone(), sections)
    }

    /// Returns the Third Schedule bundled with the crate.
    ///
    /// The schedule is built on first use and shared for the rest of the
    /// process.
    pub fn third_schedule() -> EngineResult<&'static Schedule> {
        THIRD_SCHEDULE
            .get_or_init(|| ConfigLoader::third_schedule()?.build_schedule())
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Returns the schedule metadata.
    pub fn metadata(&self) -> &ScheduleMetadata {
        &self.metadata
    }

    /// Returns every section in schedule order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Returns the section identified by `id`.
    pub fn section(&self, id: SectionId) -> &Section {
        &self.sections[self.by_id[id.index()]]
    }

    /// Looks up a section by its name.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SectionNotFound`] for an unrecognized name.
    pub fn section_by_name(&self, name: &str) -> EngineResult<&Section> {
        self.sections
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| EngineError::SectionNotFound {
                name: name.to_string(),
            })
    }

    /// Returns the single section that applies to `employee` on `as_of`.
    pub fn section_for(&self, employee: &Employee, as_of: NaiveDate) -> EngineResult<&Section> {
        classify_section(employee, as_of).map(|id| self.section(id))
    }

    /// Returns every section consistent with what is known about `employee`.
    pub fn sections_for(
        &self,
        employee: &Employee,
        as_of: NaiveDate,
    ) -> EngineResult<Vec<&Section>> {
        Ok(candidate_sections(employee, as_of)?
            .into_iter()
            .map(|id| self.section(id))
            .collect())
    }

    /// Returns the rate for the employee's wages in their section.
    pub fn rate_for(&self, employee: &Employee, as_of: NaiveDate) -> EngineResult<Rate> {
        self.section_for(employee, as_of)?.rate_for_wages(employee.wages)
    }

    /// Calculates an employee's contributions with a full audit trace.
    ///
    /// # Example
    ///
    /// ```
    /// use epf_engine::models::Employee;
    /// use epf_engine::schedule::Schedule;
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let schedule = Schedule::third_schedule().unwrap();
    /// let employee = Employee::malaysian(
    ///     NaiveDate::from_ymd_opt(1996, 4, 2).unwrap(),
    ///     Decimal::from(1500),
    /// );
    /// let as_of = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
    ///
    /// let result = schedule.calculate(&employee, as_of).unwrap();
    /// assert_eq!(result.section, "A");
    /// assert_eq!(result.rate.contribution_employee, Decimal::from(165));
    /// assert_eq!(result.audit_trace.steps.len(), 2);
    /// ```
    pub fn calculate(
        &self,
        employee: &Employee,
        as_of: NaiveDate,
    ) -> EngineResult<ContributionResult> {
        let started = Instant::now();

        let (id, classification_step) = classify_section_audited(employee, as_of, 1)?;
        let section = self.section(id);
        let lookup = lookup_rate(section, employee.wages, 2)?;
        let rate = lookup.resolved.rate;

        let mut warnings = Vec::new();
        if lookup.resolved.is_extrapolated() {
            warnings.push(AuditWarning {
                code: "WAGES_ABOVE_TABLE".to_string(),
                message: format!(
                    "Wages {} exceed the highest tabulated band ({}) of Part {}; contributions were computed from the final rule",
                    employee.wages,
                    section.highest_tabulated_wages(),
                    section.name
                ),
                severity: "low".to_string(),
            });
        }
        if rate.contribution_total().is_zero() {
            warnings.push(AuditWarning {
                code: "NO_CONTRIBUTION_DUE".to_string(),
                message: format!(
                    "No contribution is due for wages {} under Part {}",
                    employee.wages, section.name
                ),
                severity: "low".to_string(),
            });
        }

        Ok(ContributionResult {
            calculation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            schedule_version: self.metadata.version.clone(),
            as_of,
            employee: employee.clone(),
            section: section.name.clone(),
            rate,
            contribution_total: rate.contribution_total(),
            audit_trace: AuditTrace {
                steps: vec![classification_step, lookup.audit_step],
                warnings,
                duration_us: u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
            },
        })
    }
}
