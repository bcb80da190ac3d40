//! Driver-level I/O and input-format failures.
//!
//! Everything past loading speaks structured diagnostics; this enum covers
//! only the steps before the pipeline has a description to work on, plus
//! writing the results back out.

use std::path::PathBuf;

use thiserror::Error;

/// A failure the driver cannot turn into a member-level diagnostic.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("cannot read `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{path}` is not a valid API description: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot write `{path}`: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
