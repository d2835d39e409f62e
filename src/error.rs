// File: src/error.rs
//! Per-file failure taxonomy for the repair pipeline.
//!
//! Every variant is scoped to a single input file; the batch loop in
//! `repair` catches them, reports, and moves on to the next file.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepairError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Unbalanced or absent container markers. The whole file is skipped.
    #[error("malformed calendar input: {0}")]
    MalformedInput(String),

    /// The grammar collaborator rejected every container block of the file.
    /// Individual block rejections only degrade to warnings.
    #[error("calendar text rejected by parser: {0}")]
    Parse(String),

    /// Backup creation failed. Fatal for the file: the original is left
    /// untouched and the write step is never attempted.
    #[error("could not create backup {path}: {source}")]
    Backup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Overwriting the original failed. The backup already exists at this
    /// point, so no data is lost, but the repaired content is gone for
    /// this run.
    #[error("could not write repaired file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
