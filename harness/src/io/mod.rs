//! I/O helpers for harness commands.

pub mod config;
pub mod probe;
pub mod report;
pub mod suite;
