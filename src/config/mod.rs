//! Configuration loading for the EPF contribution engine.
//!
//! This module loads contribution schedules from YAML files: schedule
//! metadata plus one file per section holding its rate rules. The Third
//! Schedule shipped with the crate is embedded at compile time.
//!
//! # Example
//!
//! ```no_run
//! use epf_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/third_schedule").unwrap();
//! println!("Loaded schedule: {}", loader.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{ScheduleConfig, ScheduleMetadata, SectionConfig};
