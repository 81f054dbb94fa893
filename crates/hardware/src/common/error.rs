//! Error types for the simulator's outer surfaces.
//!
//! The pipeline core itself never fails: structural hazards stall, and
//! mispredictions recover. Errors only arise at the edges — reading a
//! program or memory image from disk, or parsing a configuration file.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the loader, configuration and driver facade.
#[derive(Debug, Error)]
pub enum SimError {
    /// The assembly program file could not be read.
    #[error("cannot read program {path}: {source}")]
    ProgramRead {
        /// Path of the program file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A memory image file could not be read.
    #[error("cannot read memory image {path}: {source}")]
    MemoryImageRead {
        /// Path of the memory image file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A configuration file failed to deserialize.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
