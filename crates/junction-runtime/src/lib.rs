//! Junction Runtime - Session orchestration
//!
//! A session runs in three stages:
//! 1. Acquire counts from a [`CountSource`]
//! 2. Allocate green times and start the scheduler
//! 3. Tick: advance the scheduler, publish the snapshot, render the board
//!
//! The loop itself belongs to the caller; [`Session::tick`] is one iteration.

pub mod error;
pub mod logging;
pub mod presentation;
pub mod session;
pub mod source;

pub use error::*;
pub use logging::*;
pub use presentation::*;
pub use session::*;
pub use source::*;
