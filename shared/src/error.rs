use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures while reading a results file. No partial table is ever produced.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The input could not be opened or read
    #[error("could not read results file {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A row does not match `name,threads,time_ms,prec,mse`
    #[error("malformed row at line {line} ({content:?}): {reason}")]
    Parse {
        line: u64,
        content: String,
        reason: String,
    },

    #[error("results file contains no data rows")]
    Empty,

    #[error("could not read results: {0}")]
    Csv(#[from] csv::Error),
}
