//! Junction Core - Fundamental types for the signal controller
//!
//! This crate defines the types shared by every other Junction crate:
//! - Approach directions and their fixed cyclic order
//! - Per-direction vehicle counts and green durations
//! - Acquisition results from the vehicle-counting collaborator
//! - The controller error taxonomy

pub mod direction;
pub mod counts;
pub mod acquisition;
pub mod error;

pub use direction::*;
pub use counts::*;
pub use acquisition::*;
pub use error::*;
