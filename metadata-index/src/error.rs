//! Error taxonomy for the metadata index pipeline.

use thiserror::Error;

/// Errors surfaced by the action reader, normalizer and index builders.
///
/// [`Error::TransientIo`] is the only variant that a builder is expected to
/// recover from locally (log it, emit no record, keep going); every other
/// variant aborts the index sync for the action that triggered it.
#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed action: {0}")]
    MalformedAction(String),

    #[error("instant {instant} is before the start of the metadata timeline")]
    ArchivedDependency { instant: String },

    #[error("filename {filename} appears in both the added and deleted set for partition {partition}")]
    InvariantViolation { partition: String, filename: String },

    #[error("{path} is not a supported columnar format for column statistics")]
    UnsupportedColumnStatsFormat { path: String },

    #[error("transient I/O failure reading {path}: {source}")]
    TransientIo {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

pub type Result<T> = std::result::Result<T, Error>;
