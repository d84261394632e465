use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Failure shapes of a single archive retrieval.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("archive task failed: {0}")]
    TaskFailed(String),

    #[error("archive task still incomplete after {0} polls")]
    Timeout(u32),

    #[error("malformed archive reply: missing or invalid '{0}'")]
    MalformedReply(&'static str),

    #[error("I/O error writing '{0}'")]
    Io(PathBuf, #[source] std::io::Error),
}
