use crate::config::ConfigError;
use crate::types::level::InvalidLevel;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type of the crate.
///
/// Archive failures are deliberately absent here: a failing retrieval is an
/// outcome ([`crate::FetchOutcome::Failed`]), never an error, so one bad
/// request cannot abort its siblings. The variants below are construction
/// and setup mistakes that should fail their call loudly.
#[derive(Debug, Error)]
pub enum Era5Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    InvalidLevel(#[from] InvalidLevel),

    #[error("unknown site code '{0}'")]
    UnknownSite(String),

    #[error("month {0} is out of range, must be 1-12")]
    MonthOutOfRange(u32),

    #[error("failed to create data directory '{0}'")]
    DataDirCreation(PathBuf, #[source] std::io::Error),

    #[error("failed to create output directory '{0}'")]
    OutputDirCreation(PathBuf, #[source] std::io::Error),
}
