//! Error types for the EPF contribution engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while building schedules and
//! resolving contribution rates.

use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the EPF contribution engine.
///
/// All fallible operations in the engine return this error type. Errors are
/// `Clone` so that the lazily built default schedule can hand out its
/// construction error to every caller.
///
/// # Example
///
/// ```
/// use epf_engine::error::EngineError;
///
/// let error = EngineError::SectionNotFound {
///     name: "Z".to_string(),
/// };
/// assert_eq!(error.to_string(), "Section not found: Z");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No section with the given name exists in the schedule.
    #[error("Section not found: {name}")]
    SectionNotFound {
        /// The section name that was requested.
        name: String,
    },

    /// A section's rate rules violate the schedule invariants.
    #[error("Invalid schedule section '{section}': {message}")]
    InvalidSchedule {
        /// The name of the offending section.
        section: String,
        /// A description of the violated invariant.
        message: String,
    },

    /// Wages outside the domain the schedule is defined for.
    #[error("Invalid wages {wages}: wages must not be negative")]
    InvalidWages {
        /// The rejected wage amount.
        wages: Decimal,
    },

    /// An employee record was missing data or contained inconsistent data.
    #[error("Invalid employee field '{field}': {message}")]
    InvalidEmployee {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
