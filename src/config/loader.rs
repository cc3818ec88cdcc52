//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading contribution
//! schedules from YAML files.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::schedule::Schedule;

use super::types::{ScheduleConfig, ScheduleMetadata, SectionConfig};

const THIRD_SCHEDULE_METADATA: &str = include_str!("../../config/third_schedule/schedule.yaml");
const THIRD_SCHEDULE_SECTIONS: [(&str, &str); 4] = [
    (
        "sections/a.yaml",
        include_str!("../../config/third_schedule/sections/a.yaml"),
    ),
    (
        "sections/b.yaml",
        include_str!("../../config/third_schedule/sections/b.yaml"),
    ),
    (
        "sections/c.yaml",
        include_str!("../../config/third_schedule/sections/c.yaml"),
    ),
    (
        "sections/d.yaml",
        include_str!("../../config/third_schedule/sections/d.yaml"),
    ),
];

/// Loads and provides access to a schedule configuration.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/third_schedule/
/// ├── schedule.yaml      # Schedule metadata
/// └── sections/
///     ├── a.yaml         # One file per section, loaded in file name order
///     └── b.yaml
/// ```
///
/// # Example
///
/// ```
/// use epf_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::third_schedule().unwrap();
/// let schedule = loader.build_schedule().unwrap();
/// assert_eq!(schedule.sections().len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: ScheduleConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/third_schedule")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `schedule.yaml` or the `sections` directory is missing
    /// - The `sections` directory holds no YAML files
    /// - Any file contains invalid YAML or misses a required field
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata_path = path.join("schedule.yaml");
        let metadata = Self::load_yaml::<ScheduleMetadata>(&metadata_path)?;

        let sections_dir = path.join("sections");
        let sections = Self::load_sections(&sections_dir)?;

        info!(
            path = %path.display(),
            code = %metadata.code,
            sections = sections.len(),
            "Loaded schedule configuration"
        );

        Ok(Self {
            config: ScheduleConfig::new(metadata, sections),
        })
    }

    /// Loads the Third Schedule embedded in the crate.
    pub fn third_schedule() -> EngineResult<Self> {
        let metadata =
            Self::parse_yaml::<ScheduleMetadata>("schedule.yaml", THIRD_SCHEDULE_METADATA)?;
        let sections = THIRD_SCHEDULE_SECTIONS
            .iter()
            .map(|(source, content)| Self::parse_yaml::<SectionConfig>(source, content))
            .collect::<EngineResult<Vec<_>>>()?;

        Ok(Self {
            config: ScheduleConfig::new(metadata, sections),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse_yaml(&path_str, &content)
    }

    /// Parses YAML content, attributing errors to `source`.
    fn parse_yaml<T: serde::de::DeserializeOwned>(source: &str, content: &str) -> EngineResult<T> {
        serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
            path: source.to_string(),
            message: e.to_string(),
        })
    }

    /// Loads all section files from the sections directory.
    fn load_sections(sections_dir: &Path) -> EngineResult<Vec<SectionConfig>> {
        let sections_dir_str = sections_dir.display().to_string();

        let entries = fs::read_dir(sections_dir).map_err(|_| EngineError::ConfigNotFound {
            path: sections_dir_str.clone(),
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: sections_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                paths.push(path);
            }
        }

        if paths.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no section files found)", sections_dir_str),
            });
        }

        paths.sort();
        paths
            .iter()
            .map(|path| Self::load_yaml::<SectionConfig>(path))
            .collect()
    }

    /// Returns the underlying schedule configuration.
    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Returns the schedule metadata.
    pub fn metadata(&self) -> &ScheduleMetadata {
        self.config.metadata()
    }

    /// Gets a section definition by its name.
    ///
    /// # Returns
    ///
    /// Returns the section definition if found, or `SectionNotFound` error.
    pub fn get_section(&self, name: &str) -> EngineResult<&SectionConfig> {
        self.config
            .sections()
            .iter()
            .find(|section| section.name == name)
            .ok_or_else(|| EngineError::SectionNotFound {
                name: name.to_string(),
            })
    }

    /// Validates the configuration and builds the schedule's rate tables.
    pub fn build_schedule(&self) -> EngineResult<Schedule> {
        Schedule::from_config(&self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CalculationMethod;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/third_schedule"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.metadata().code, "EPF-THIRD-SCHEDULE");
        assert_eq!(loader.config().sections().len(), 4);
    }

    #[test]
    fn test_sections_load_in_file_name_order() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let names: Vec<&str> = loader
            .config()
            .sections()
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_embedded_schedule_matches_directory() {
        let embedded = ConfigLoader::third_schedule().unwrap();
        let loaded = ConfigLoader::load(config_path()).unwrap();

        assert_eq!(embedded.metadata().version, loaded.metadata().version);
        for (a, b) in embedded
            .config()
            .sections()
            .iter()
            .zip(loaded.config().sections())
        {
            assert_eq!(a.name, b.name);
            assert_eq!(a.description, b.description);
            assert_eq!(a.rules, b.rules);
        }
    }

    #[test]
    fn test_get_section() {
        let loader = ConfigLoader::third_schedule().unwrap();

        let section = loader.get_section("B").unwrap();
        assert_eq!(section.rules.len(), 4);
        assert_eq!(
            section.rules[1].employer_method,
            CalculationMethod::ExactAmount
        );
        assert_eq!(section.rules[1].employer_amount, dec("5"));
        assert!(section.description.contains("on or after 1 August 1998"));
    }

    #[test]
    fn test_get_section_unknown_returns_error() {
        let loader = ConfigLoader::third_schedule().unwrap();

        match loader.get_section("Z") {
            Err(EngineError::SectionNotFound { name }) => assert_eq!(name, "Z"),
            other => panic!("Expected SectionNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_section_a_rules_loaded_correctly() {
        let loader = ConfigLoader::third_schedule().unwrap();
        let rules = &loader.get_section("A").unwrap().rules;

        assert_eq!(rules[0].employer_method, CalculationMethod::Fixed);
        assert_eq!(rules[2].minimum, dec("20"));
        assert_eq!(rules[2].maximum, dec("5000"));
        assert_eq!(rules[2].interval, dec("20"));
        assert_eq!(rules[2].employer_amount, dec("0.13"));
        assert_eq!(rules[3].employer_amount, dec("0.12"));
        assert_eq!(rules[3].employee_amount, dec("0.11"));
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("schedule.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_names_source() {
        let result = ConfigLoader::parse_yaml::<SectionConfig>("sections/x.yaml", "name: [");

        match result {
            Err(EngineError::ConfigParseError { path, .. }) => {
                assert_eq!(path, "sections/x.yaml");
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_build_schedule_from_loaded_directory() {
        let schedule = ConfigLoader::load(config_path())
            .unwrap()
            .build_schedule()
            .unwrap();
        assert_eq!(
            schedule.metadata().name,
            "Employees Provident Fund Act 1991, Third Schedule"
        );
        assert_eq!(schedule.sections().len(), 4);
    }
}
