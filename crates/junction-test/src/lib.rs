//! Junction Test Harness - Simulation and scenario validation
//!
//! This crate provides:
//! - Clock jitter models for imperfect render loops
//! - A deterministic intersection simulator with a phase log
//! - Predefined traffic scenarios
//! - Concurrent reader checks against the snapshot board

pub mod simulator;
pub mod scenarios;

pub use simulator::*;
