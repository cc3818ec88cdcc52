//! Calculation logic for the EPF contribution engine.
//!
//! This module contains the rate table builder that expands a section's rules
//! into wage bands, the resolver that maps wages onto those bands (or
//! extrapolates beyond them), and the classifier that picks the section for an
//! employee.

mod rate_resolver;
mod rate_table;
mod section_classifier;

pub use rate_resolver::{RateLookupResult, RateSource, ResolvedRate, lookup_rate, resolve_rate};
pub use rate_table::{apply_method, build_rates, validate_rules};
pub use section_classifier::{
    AgeBracket, ContributorGroup, SENIOR_AGE, SectionId, age_bracket, candidate_sections,
    classify_section, classify_section_audited, contributor_group,
};
