//! Core data models for the EPF contribution engine.
//!
//! This module contains the domain models used throughout the engine.

mod contribution_result;
mod employee;
mod rate;
mod rule;

pub use contribution_result::{AuditStep, AuditTrace, AuditWarning, ContributionResult};
pub use employee::{Citizenship, Employee};
pub use rate::{Rate, SMALLEST_UNIT};
pub use rule::{CalculationMethod, RateRule};
