//! Log output for batch runs: a plain-text file at the configured path,
//! or stderr when none is configured.

use fern::Dispatch;
use humantime::format_rfc3339_seconds;
use log::LevelFilter;
use std::path::Path;
use std::time::SystemTime;

/// Installs the global logger.
///
/// With a `log_file`, all diagnostics go to that file so a long-running
/// batch can be inspected afterwards; without one they go to stderr.
/// May only be called once per process.
pub fn init_logging(log_file: Option<&Path>) -> Result<(), fern::InitError> {
    let dispatch = Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{date} {level} {target}] {message}",
                date = format_rfc3339_seconds(SystemTime::now()),
                level = record.level(),
                target = record.target(),
            ))
        })
        .level(LevelFilter::Info)
        .level_for("era5_retrieval", LevelFilter::Debug);

    let dispatch = match log_file {
        Some(path) => dispatch.chain(fern::log_file(path)?),
        None => dispatch.chain(std::io::stderr()),
    };

    dispatch.apply()?;
    Ok(())
}
