//! Junction Scheduler - The signal-timing state machine
//!
//! Four states, one per active direction. Each tick either counts the active
//! phase down or hands priority to the next direction in service order.
//!
//! - [`SignalState`]: the value the machine carries between ticks
//! - [`SignalScheduler`]: owns the durations and the current state
//! - [`SignalBoard`]: consistent snapshots for readers on other threads

pub mod board;
pub mod scheduler;
pub mod state;

pub use board::*;
pub use scheduler::*;
pub use state::*;
