//! EPF contribution engine
//!
//! This crate computes monthly Employees Provident Fund contributions under the
//! Third Schedule of the EPF Act 1991. It expands each section's compact rate
//! rules into wage-band tables, resolves wages to an employer/employee
//! contribution pair, and selects the section that applies to an employee from
//! their citizenship and age.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod schedule;
