use crate::error::Result;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, Level};
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Install the global tracing subscriber.
///
/// Logs go to stderr unless `log_file` is given, in which case they are
/// appended to that file. Library code only emits events; this is the one
/// place a subscriber is configured.
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::WARN };

    let writer = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(writer)
        .with_ansi(log_file.is_none())
        .with_target(verbose)
        .with_thread_names(verbose)
        .init();

    debug!(verbose, log_file = ?log_file, "Logging initialised");
    Ok(())
}
