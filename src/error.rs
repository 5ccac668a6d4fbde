//! Error types for mutnorm.
//!
//! Per-candidate conversion failures (unresolvable positions, reference
//! mismatches, malformed alleles) are not errors: they drop the candidate
//! and are logged at debug level. `MutNormError` covers the failures that
//! callers must handle — resource construction and malformed input records.

use thiserror::Error;

/// Main error type for mutnorm operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutNormError {
    /// IO error (genome file, offset index).
    #[error("IO error: {msg}")]
    Io { msg: String },

    /// Reference genome file or its offset index is malformed.
    #[error("Invalid genome data: {msg}")]
    InvalidGenome { msg: String },

    /// Chromosome/contig not present in the sequence store.
    #[error("Chromosome not found: {name}")]
    ChromosomeNotFound { name: String },

    /// Invalid coordinates provided.
    #[error("Invalid coordinates: {msg}")]
    InvalidCoordinates { msg: String },

    /// Mention record JSON could not be deserialized.
    #[error("JSON error: {msg}")]
    Json { msg: String },
}

impl From<std::io::Error> for MutNormError {
    fn from(err: std::io::Error) -> Self {
        MutNormError::Io {
            msg: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for MutNormError {
    fn from(err: serde_json::Error) -> Self {
        MutNormError::Json {
            msg: err.to_string(),
        }
    }
}
