//! Terminal outcomes of retrieval tasks and the per-run tally of them.

use crate::archive::error::ArchiveError;
use std::fmt;

/// Terminal result of one retrieval task.
///
/// Every task ends in exactly one of these states; there are no retries at
/// this layer. `Failed` carries the archive error so callers can inspect or
/// re-log the reason without it ever propagating to sibling tasks.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The output file already existed; no archive call was made.
    Skipped,
    /// The archive call succeeded and the output file was written.
    Downloaded,
    /// The archive call failed; the rest of the batch is unaffected.
    Failed(ArchiveError),
}

impl FetchOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed(_))
    }
}

/// Counts accumulated over a whole batch run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Year batches that could not be started at all (construction mistakes
    /// such as an unknown site code), as opposed to per-task failures.
    pub aborted: usize,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: &FetchOutcome) {
        match outcome {
            FetchOutcome::Skipped => self.skipped += 1,
            FetchOutcome::Downloaded => self.downloaded += 1,
            FetchOutcome::Failed(_) => self.failed += 1,
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} downloaded, {} skipped, {} failed, {} year batches aborted",
            self.downloaded, self.skipped, self.failed, self.aborted
        )
    }
}
