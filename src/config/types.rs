//! Configuration types for contribution schedules.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use serde::Deserialize;

use crate::models::RateRule;

/// Metadata about the schedule.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleMetadata {
    /// Identifier of the schedule (e.g., "EPF-THIRD-SCHEDULE").
    pub code: String,
    /// The human-readable name of the schedule.
    pub name: String,
    /// The revision of the schedule.
    pub version: String,
    /// URL to the official schedule documentation.
    pub source_url: String,
}

/// A section definition as written in `sections/*.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionConfig {
    /// The section name (e.g., "A").
    pub name: String,
    /// Who the section applies to.
    pub description: String,
    /// Band-generating rules, ascending by minimum wages.
    pub rules: Vec<RateRule>,
}

/// The complete schedule configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    metadata: ScheduleMetadata,
    sections: Vec<SectionConfig>,
}

impl ScheduleConfig {
    /// Creates a new ScheduleConfig from its component parts.
    ///
    /// Sections are kept in the order given.
    pub fn new(metadata: ScheduleMetadata, sections: Vec<SectionConfig>) -> Self {
        Self { metadata, sections }
    }

    /// Returns the schedule metadata.
    pub fn metadata(&self) -> &ScheduleMetadata {
        &self.metadata
    }

    /// Returns all section definitions.
    pub fn sections(&self) -> &[SectionConfig] {
        &self.sections
    }
}
