//! Employee model and related types.
//!
//! This module defines the Employee struct and Citizenship enum used to select
//! the Third Schedule section that applies to a worker.

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::Rate;
use crate::schedule::{Schedule, Section};

/// Citizenship classification of an employee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Citizenship {
    /// Citizenship has not been provided.
    #[default]
    Unknown,
    /// Malaysian citizen.
    Malaysian,
    /// Not a citizen, but a permanent resident of Malaysia.
    PermanentResident,
    /// Neither a citizen nor a permanent resident.
    NonMalaysian,
}

/// Represents an employee whose contributions are being determined.
///
/// `elected_before_1_august_1998` only matters for non-Malaysian employees.
/// An unset `date_of_birth` or `Unknown` citizenship is allowed when asking
/// for the candidate [`sections`](Employee::sections), but not when a single
/// section or rate is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// The employee's citizenship classification.
    #[serde(default)]
    pub citizenship: Citizenship,
    /// Whether the employee elected to contribute before 1 August 1998.
    #[serde(default)]
    pub elected_before_1_august_1998: bool,
    /// The employee's date of birth, if known.
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    /// Monthly wages.
    #[serde(default)]
    pub wages: Decimal,
}

impl Employee {
    /// Creates a Malaysian employee.
    ///
    /// # Examples
    ///
    /// ```
    /// use epf_engine::models::{Citizenship, Employee};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee::malaysian(
    ///     NaiveDate::from_ymd_opt(1990, 1, 15).unwrap(),
    ///     Decimal::from(1500),
    /// );
    /// assert_eq!(employee.citizenship, Citizenship::Malaysian);
    /// assert!(!employee.elected_before_1_august_1998);
    /// ```
    pub fn malaysian(date_of_birth: NaiveDate, wages: Decimal) -> Self {
        Self {
            citizenship: Citizenship::Malaysian,
            elected_before_1_august_1998: false,
            date_of_birth: Some(date_of_birth),
            wages,
        }
    }

    /// Creates a permanent resident employee.
    pub fn permanent_resident(date_of_birth: NaiveDate, wages: Decimal) -> Self {
        Self {
            citizenship: Citizenship::PermanentResident,
            elected_before_1_august_1998: false,
            date_of_birth: Some(date_of_birth),
            wages,
        }
    }

    /// Creates a non-Malaysian employee.
    pub fn non_malaysian(
        elected_before_1_august_1998: bool,
        date_of_birth: NaiveDate,
        wages: Decimal,
    ) -> Self {
        Self {
            citizenship: Citizenship::NonMalaysian,
            elected_before_1_august_1998,
            date_of_birth: Some(date_of_birth),
            wages,
        }
    }

    /// Returns the section of the default Third Schedule that applies today.
    pub fn section(&self) -> EngineResult<&'static Section> {
        Schedule::third_schedule()?.section_for(self, today())
    }

    /// Returns every section of the default Third Schedule consistent with
    /// what is known about the employee today.
    pub fn sections(&self) -> EngineResult<Vec<&'static Section>> {
        Schedule::third_schedule()?.sections_for(self, today())
    }

    /// Returns the rate applicable to the employee's wages today.
    pub fn rate(&self) -> EngineResult<Rate> {
        Schedule::third_schedule()?.rate_for(self, today())
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
