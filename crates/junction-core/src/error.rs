//! Error types for the signal controller

use thiserror::Error;

use crate::Direction;

/// Controller errors
///
/// Every variant describes malformed session input. Once a session has
/// started, no operation on the controller can fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignalError {
    #[error("Wrong vector length: expected {expected}, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("Negative vehicle count for {direction}: {value}")]
    NegativeCount { direction: Direction, value: i64 },

    #[error("Negative green duration for {direction}: {value}s")]
    NegativeDuration { direction: Direction, value: f64 },

    #[error("Non-finite green duration for {direction}")]
    NonFiniteDuration { direction: Direction },

    #[error("All vehicle counts are zero: treated as an aborted acquisition")]
    DegenerateCounts,

    #[error("Invalid timing configuration: {0}")]
    InvalidTiming(String),
}

/// Result type for controller operations
pub type SignalResult<T> = Result<T, SignalError>;
