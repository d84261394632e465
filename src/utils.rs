use std::io;
use std::path::{Path, PathBuf};

const DATA_DIR_NAME: &str = "era5-retrieval";

/// Platform data directory fallback used when the config does not set one.
pub(crate) fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

/// Creates a directory if it does not exist yet.
///
/// Concurrent creation by sibling tasks is fine: an already existing
/// directory is success. A non-directory at the path is an error.
pub(crate) async fn ensure_dir_exists(path: &Path) -> io::Result<()> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("path exists but is not a directory: {}", path.display()),
                ));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tokio::fs::create_dir_all(path).await
        }
        Err(e) => Err(e),
    }
}
