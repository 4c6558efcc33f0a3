//! Analyzer configuration.
//!
//! Settings come from an optional TOML file layered over stock defaults.
//! The file is looked up in this order:
//!
//! 1. `--config <FILE>` on the command line (must exist)
//! 2. `image-checker.toml` in the working directory (optional)
//! 3. Stock defaults only
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [output]
//! results_file = "metadata_results.json"  # JSON record written by `analyze`
//! save_results = true                     # Set false to never write it
//!
//! [display]
//! coordinate_precision = 6                # Decimal places for lat/lon
//!
//! [maps]
//! base_url = "https://www.google.com/maps/search/?api=1&query="
//! ```
//!
//! Config files are sparse: override only the keys you need. Unknown keys are
//! rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "image-checker.toml";

const MAX_COORDINATE_PRECISION: usize = 15;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Result persistence.
    pub output: OutputConfig,
    /// Report formatting.
    pub display: DisplayConfig,
    /// Map link generation.
    pub maps: MapsConfig,
}

impl AnalyzerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.results_file.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output.results_file must not be empty".into(),
            ));
        }
        if self.display.coordinate_precision > MAX_COORDINATE_PRECISION {
            return Err(ConfigError::Validation(format!(
                "display.coordinate_precision must be 0-{MAX_COORDINATE_PRECISION}"
            )));
        }
        let url = &self.maps.base_url;
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::Validation(
                "maps.base_url must start with http:// or https://".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Path of the JSON record written after each `analyze` run.
    pub results_file: String,
    /// Whether `analyze` writes the record at all.
    pub save_results: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_file: "metadata_results.json".to_string(),
            save_results: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Decimal places used when printing coordinates and map queries.
    pub coordinate_precision: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            coordinate_precision: 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapsConfig {
    /// Prefix for map links; `<lat>,<lon>` is appended.
    pub base_url: String,
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.google.com/maps/search/?api=1&query=".to_string(),
        }
    }
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Parse one config file. Every section and key carries a serde default, so
/// a sparse file fills the rest from [`AnalyzerConfig::default`].
fn parse_config_file(path: &Path) -> Result<AnalyzerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load the effective configuration.
///
/// An explicit path must exist. Without one, [`DEFAULT_CONFIG_FILE`] in
/// `working_dir` is used when present, otherwise stock defaults.
pub fn load_config(
    explicit: Option<&Path>,
    working_dir: &Path,
) -> Result<AnalyzerConfig, ConfigError> {
    let config = match explicit {
        Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
        Some(path) => parse_config_file(path)?,
        None => {
            let candidate = working_dir.join(DEFAULT_CONFIG_FILE);
            if candidate.exists() {
                log::debug!("using config {}", candidate.display());
                parse_config_file(&candidate)?
            } else {
                AnalyzerConfig::default()
            }
        }
    };
    config.validate()?;
    Ok(config)
}

/// A fully-commented stock config file. Used by the `gen-config` command.
pub fn stock_config_toml() -> &'static str {
    r##"# image-checker configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Looked up as ./image-checker.toml unless --config <FILE> is given.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Result persistence
# ---------------------------------------------------------------------------
[output]
# JSON record written after each `analyze` run:
#   {"metadata": "...", "steganography": "..."}
results_file = "metadata_results.json"

# Set to false to never write the record (same as --no-save).
save_results = true

# ---------------------------------------------------------------------------
# Report formatting
# ---------------------------------------------------------------------------
[display]
# Decimal places for latitude/longitude in the report and map link (0-15).
coordinate_precision = 6

# ---------------------------------------------------------------------------
# Map links
# ---------------------------------------------------------------------------
[maps]
# "<lat>,<lon>" is appended to this prefix.
base_url = "https://www.google.com/maps/search/?api=1&query="
"##
}
