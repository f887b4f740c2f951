//! Error types for fuzzy-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FuzzyError {
    #[error("Malformed duration: {0}")]
    MalformedDuration(String),

    #[error("Invalid unit: {0}")]
    InvalidUnit(String),

    #[error("Invalid magnitude: {0}")]
    InvalidMagnitude(String),

    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

pub type Result<T> = std::result::Result<T, FuzzyError>;
