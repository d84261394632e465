//! The seam to the remote reanalysis archive.

pub mod cds_client;
pub mod error;

use crate::request::Era5Request;
use async_trait::async_trait;
use error::ArchiveError;
use std::path::Path;

/// A client able to run one archive retrieval to completion.
///
/// The orchestration layer only ever issues single retrievals through this
/// trait; transport, authentication and polling are the implementation's
/// concern. [`cds_client::CdsClient`] is the production implementation,
/// tests substitute scripted ones.
#[async_trait]
pub trait ArchiveClient: Send + Sync {
    /// Retrieves `request` from `dataset` and writes the result to `target`.
    ///
    /// On success the file at `target` is complete; on error no file exists
    /// at `target` (partial downloads must not be left there).
    async fn retrieve(
        &self,
        dataset: &str,
        request: &Era5Request,
        target: &Path,
    ) -> Result<(), ArchiveError>;
}
