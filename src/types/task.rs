//! One unit of retrieval work and the output layout derived from it.

use crate::types::level::RetrievalLevel;
use crate::types::site::Site;
use std::fmt;
use std::path::{Path, PathBuf};

/// One (site, level, year, month) unit of retrieval work.
///
/// The task fully determines both the archive query and the output path;
/// it carries no other state. Constructed per unit and discarded after the
/// corresponding request completes or fails.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalTask {
    pub site: Site,
    pub level: RetrievalLevel,
    pub year: i32,
    pub month: u32,
}

impl RetrievalTask {
    pub fn new(site: Site, level: RetrievalLevel, year: i32, month: u32) -> Self {
        Self {
            site,
            level,
            year,
            month,
        }
    }

    /// Directory the output file is written to: `{root}/{CODE}/{subdir}`.
    pub fn output_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.site.code).join(self.level.subdir())
    }

    /// Output filename, e.g. `MHD_3dwind_2020_06.nc`. The month is always
    /// zero-padded to two digits.
    pub fn filename(&self) -> String {
        format!(
            "{}_{}_{}_{:02}.nc",
            self.site.code,
            self.level.file_tag(),
            self.year,
            self.month
        )
    }

    /// Full output path. Existence of this file is the sole signal that the
    /// task has already completed.
    pub fn output_path(&self, root: &Path) -> PathBuf {
        self.output_dir(root).join(self.filename())
    }
}

/// Log/display form, e.g. `MHD pressure 2020-06`.
impl fmt::Display for RetrievalTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}-{:02}",
            self.site.code, self.level, self.year, self.month
        )
    }
}
