//! Runtime errors

use thiserror::Error;

use junction_core::{AbortReason, SignalError};

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Acquisition aborted: {0}")]
    AcquisitionAborted(AbortReason),

    #[error(transparent)]
    Signal(#[from] SignalError),

    #[error("Invalid session configuration: {0}")]
    InvalidConfig(String),

    #[error("Logging already initialized")]
    LoggingInitialized,
}

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;
