mod archive;
mod config;
mod domain;
mod era5;
mod error;
mod logging;
mod request;
mod sites;
mod types;
mod utils;

pub use error::Era5Error;
pub use era5::*;

pub use archive::cds_client::CdsClient;
pub use archive::error::ArchiveError;
pub use archive::ArchiveClient;

pub use config::{ConfigError, RetrievalConfig};
pub use domain::BoundingBox;
pub use logging::init_logging;
pub use request::Era5Request;
pub use sites::SiteRegistry;

pub use types::level::{InvalidLevel, RetrievalLevel};
pub use types::outcome::{BatchSummary, FetchOutcome};
pub use types::site::Site;
pub use types::task::RetrievalTask;
