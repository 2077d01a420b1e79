//! Junction Timing - Green-time allocation and tick clocks
//!
//! This crate implements:
//! - The timing policy: vehicle count → bounded green seconds
//! - Timing configuration presets
//! - Injectable clocks that drive the scheduler one delta at a time

pub mod clock;
pub mod policy;

pub use clock::*;
pub use policy::*;
