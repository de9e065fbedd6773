//! Engine configuration.
//!
//! Artifact locations and scoring calibration, loaded from YAML or JSON and
//! validated against an embedded JSON Schema.

mod parser;
mod schema;

pub use parser::{ArtifactsConfig, Calibration, ConfigError, EngineConfig};
pub use schema::validate_config_schema;
