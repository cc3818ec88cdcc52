//! Section classification functionality.
//!
//! This module decides which Part of the Third Schedule applies to an
//! employee from their citizenship, their pre-1998 election and whether they
//! are above the senior age.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, Citizenship, Employee};

/// The age above which an employee is treated as senior.
pub const SENIOR_AGE: u32 = 60;

/// Identifies one of the four Parts of the Third Schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SectionId {
    /// Citizen-rate contributors below the senior age.
    A,
    /// Foreign-rate contributors below the senior age.
    B,
    /// Citizen-rate contributors above the senior age.
    C,
    /// Foreign-rate contributors above the senior age.
    D,
}

impl SectionId {
    /// Every section, in schedule order.
    pub const ALL: [SectionId; 4] = [SectionId::A, SectionId::B, SectionId::C, SectionId::D];

    /// The section's name as printed in the schedule.
    pub fn as_str(self) -> &'static str {
        match self {
            SectionId::A => "A",
            SectionId::B => "B",
            SectionId::C => "C",
            SectionId::D => "D",
        }
    }

    /// Position of the section in schedule order.
    pub fn index(self) -> usize {
        self as usize
    }

    fn from_parts(group: ContributorGroup, bracket: AgeBracket) -> Self {
        match (group, bracket) {
            (ContributorGroup::CitizenRate, AgeBracket::BelowSenior) => SectionId::A,
            (ContributorGroup::ForeignRate, AgeBracket::BelowSenior) => SectionId::B,
            (ContributorGroup::CitizenRate, AgeBracket::Senior) => SectionId::C,
            (ContributorGroup::ForeignRate, AgeBracket::Senior) => SectionId::D,
        }
    }

    fn group(self) -> ContributorGroup {
        match self {
            SectionId::A | SectionId::C => ContributorGroup::CitizenRate,
            SectionId::B | SectionId::D => ContributorGroup::ForeignRate,
        }
    }

    fn bracket(self) -> AgeBracket {
        match self {
            SectionId::A | SectionId::B => AgeBracket::BelowSenior,
            SectionId::C | SectionId::D => AgeBracket::Senior,
        }
    }
}

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which rate family an employee contributes under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContributorGroup {
    /// Citizens, permanent residents and foreigners who elected before
    /// 1 August 1998.
    CitizenRate,
    /// Foreigners who elected on or after 1 August 1998.
    ForeignRate,
}

/// Whether an employee is above the senior age.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeBracket {
    /// Not older than [`SENIOR_AGE`].
    BelowSenior,
    /// Strictly older than [`SENIOR_AGE`].
    Senior,
}

/// Returns the contributor group, or `None` when citizenship is unknown.
pub fn contributor_group(employee: &Employee) -> Option<ContributorGroup> {
    match employee.citizenship {
        Citizenship::Unknown => None,
        Citizenship::Malaysian | Citizenship::PermanentResident => {
            Some(ContributorGroup::CitizenRate)
        }
        Citizenship::NonMalaysian if employee.elected_before_1_august_1998 => {
            Some(ContributorGroup::CitizenRate)
        }
        Citizenship::NonMalaysian => Some(ContributorGroup::ForeignRate),
    }
}

/// Returns the age bracket on `as_of`, or `None` when the date of birth is
/// unknown.
///
/// An employee is senior only once `as_of` is past their 60th birthday, so
/// the birthday itself still counts as below senior.
///
/// # Errors
///
/// Returns [`EngineError::InvalidEmployee`] if the date of birth is after
/// `as_of`.
pub fn age_bracket(employee: &Employee, as_of: NaiveDate) -> EngineResult<Option<AgeBracket>> {
    let Some(date_of_birth) = employee.date_of_birth else {
        return Ok(None);
    };
    if date_of_birth > as_of {
        return Err(EngineError::InvalidEmployee {
            field: "date_of_birth".to_string(),
            message: format!("{} is after the evaluation date {}", date_of_birth, as_of),
        });
    }

    let senior_from = date_of_birth
        .checked_add_months(Months::new(SENIOR_AGE * 12))
        .ok_or_else(|| EngineError::InvalidEmployee {
            field: "date_of_birth".to_string(),
            message: format!("{} is out of range", date_of_birth),
        })?;

    Ok(Some(if as_of > senior_from {
        AgeBracket::Senior
    } else {
        AgeBracket::BelowSenior
    }))
}

/// Selects the single section that applies to an employee on `as_of`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidEmployee`] if citizenship is unknown, the
/// date of birth is missing, or the date of birth is after `as_of`.
///
/// # Examples
///
/// ```
/// use epf_engine::calculation::{classify_section, SectionId};
/// use epf_engine::models::Employee;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let employee = Employee::non_malaysian(
///     false,
///     NaiveDate::from_ymd_opt(1950, 3, 1).unwrap(),
///     Decimal::from(1500),
/// );
/// let as_of = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
/// assert_eq!(classify_section(&employee, as_of).unwrap(), SectionId::D);
/// ```
pub fn classify_section(employee: &Employee, as_of: NaiveDate) -> EngineResult<SectionId> {
    let group = contributor_group(employee).ok_or_else(|| EngineError::InvalidEmployee {
        field: "citizenship".to_string(),
        message: "must be known to select a single section".to_string(),
    })?;
    let bracket = age_bracket(employee, as_of)?.ok_or_else(|| EngineError::InvalidEmployee {
        field: "date_of_birth".to_string(),
        message: "must be known to select a single section".to_string(),
    })?;

    Ok(SectionId::from_parts(group, bracket))
}

/// Lists every section consistent with what is known about an employee.
///
/// Sections are returned in schedule order. Knowing both citizenship and date
/// of birth yields one section; knowing only one of them yields two; knowing
/// neither yields all four.
///
/// # Errors
///
/// Returns [`EngineError::InvalidEmployee`] if the date of birth is after
/// `as_of`.
pub fn candidate_sections(employee: &Employee, as_of: NaiveDate) -> EngineResult<Vec<SectionId>> {
    let group = contributor_group(employee);
    let bracket = age_bracket(employee, as_of)?;

    Ok(SectionId::ALL
        .into_iter()
        .filter(|id| group.is_none_or(|g| id.group() == g))
        .filter(|id| bracket.is_none_or(|b| id.bracket() == b))
        .collect())
}

/// Classifies an employee and records an audit step describing the decision.
pub fn classify_section_audited(
    employee: &Employee,
    as_of: NaiveDate,
    step_number: u32,
) -> EngineResult<(SectionId, AuditStep)> {
    let section = classify_section(employee, as_of)?;
    let senior = section.bracket() == AgeBracket::Senior;
    let group = match section.group() {
        ContributorGroup::CitizenRate => "citizen rate",
        ContributorGroup::ForeignRate => "foreign rate",
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "section_classification".to_string(),
        rule_name: "Section Classification".to_string(),
        schedule_ref: format!("Third Schedule, Part {}", section),
        input: serde_json::json!({
            "citizenship": employee.citizenship,
            "elected_before_1_august_1998": employee.elected_before_1_august_1998,
            "date_of_birth": employee.date_of_birth,
            "as_of": as_of.to_string()
        }),
        output: serde_json::json!({
            "section": section.as_str(),
            "senior": senior
        }),
        reasoning: format!(
            "Employee contributes at the {} and is {} age {} on {}: Part {}",
            group,
            if senior { "above" } else { "not above" },
            SENIOR_AGE,
            as_of,
            section
        ),
    };

    Ok((section, audit_step))
}
