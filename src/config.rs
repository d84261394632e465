//! Configuration value object for a retrieval run.
//!
//! Loaded once from a JSON file at process start and passed into the client
//! by value; there is no ambient global configuration.

use crate::types::level::RetrievalLevel;
use crate::utils::default_data_dir;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_ARCHIVE_URL: &str = "https://cds.climate.copernicus.eu/api/v2";
const KEY_PLACEHOLDER: &str = "<uid>:<api-key>";

/// All configuration of a retrieval run.
///
/// Every field except `archive_key` has a default, so a minimal config file
/// only needs the credential. [`RetrievalConfig::write_template`] writes a
/// complete template with a placeholder credential for first-time setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Root directory the per-site output trees are written under.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Degrees of extent from each site's coordinates to the edge of its
    /// retrieval domain.
    #[serde(default = "default_half_width")]
    pub half_width_degrees: f64,

    /// Maximum archive requests in flight at once. The archive silently
    /// throttles beyond 2-3 concurrent requests, so this is a protocol
    /// limit rather than a tuning knob.
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// First year of the span to retrieve, inclusive.
    #[serde(default = "default_first_year")]
    pub first_year: i32,

    /// Last year of the span to retrieve, inclusive.
    #[serde(default = "default_last_year")]
    pub last_year: i32,

    /// Retrieval levels to process per site and year.
    #[serde(default = "default_levels")]
    pub levels: Vec<RetrievalLevel>,

    /// Log file for diagnostic output. Logs go to stderr when unset.
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Root URL of the CDS API.
    #[serde(default = "default_archive_url")]
    pub archive_url: String,

    /// CDS credential in `uid:key` form. The only field without a default.
    pub archive_key: String,

    /// Species analyzed by the surrounding pipeline. Carried in the config
    /// surface but never read by the retrieval itself.
    #[serde(default = "default_compounds")]
    pub compounds: Vec<String>,
}

fn default_half_width() -> f64 {
    11.0
}

fn default_concurrent_requests() -> usize {
    2
}

fn default_first_year() -> i32 {
    1978
}

fn default_last_year() -> i32 {
    2023
}

fn default_levels() -> Vec<RetrievalLevel> {
    vec![RetrievalLevel::Pressure, RetrievalLevel::Single]
}

fn default_archive_url() -> String {
    DEFAULT_ARCHIVE_URL.to_string()
}

fn default_compounds() -> Vec<String> {
    [
        "ch4", "cf4", "cfc-12", "ch2cl2", "ch3br", "hcfc-22", "hfc-125", "hfc-134a", "n2o", "sf6",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found at '{0}'; a template can be written with write_template()")]
    NotFound(PathBuf),

    #[error("failed to read config file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("failed to parse config file '{0}': {1}")]
    Parse(PathBuf, #[source] serde_json::Error),

    #[error("failed to encode config template")]
    TemplateEncode(#[source] serde_json::Error),

    #[error("failed to write config template '{0}'")]
    TemplateWrite(PathBuf, #[source] std::io::Error),
}

impl RetrievalConfig {
    /// Loads the configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(path.to_path_buf()))
            }
            Err(e) => return Err(ConfigError::Read(path.to_path_buf(), e)),
        };
        serde_json::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
    }

    /// Writes a default config template with a placeholder credential.
    pub fn write_template(path: &Path) -> Result<(), ConfigError> {
        let template = Self {
            data_dir: default_data_dir(),
            half_width_degrees: default_half_width(),
            concurrent_requests: default_concurrent_requests(),
            first_year: default_first_year(),
            last_year: default_last_year(),
            levels: default_levels(),
            log_file: None,
            archive_url: default_archive_url(),
            archive_key: KEY_PLACEHOLDER.to_string(),
            compounds: default_compounds(),
        };
        let json =
            serde_json::to_string_pretty(&template).map_err(ConfigError::TemplateEncode)?;
        std::fs::write(path, json).map_err(|e| ConfigError::TemplateWrite(path.to_path_buf(), e))
    }
}
