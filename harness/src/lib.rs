//! Single-solution execution harness.
//!
//! Runs one candidate against every case of a test suite and reports, per
//! case, the return value, captured console output, any failure, and resource
//! usage. Layout:
//!
//! - **[`core`]**: Pure logic (suite/report types, outcome, record assembly,
//!   procfs parsing, resource deltas). No I/O.
//! - **[`io`]**: Side effects (probe reads, suite and config loading, report
//!   writing).
//!
//! [`invoke`] wraps a single call; [`batch`] drives a whole suite.

pub mod batch;
pub mod candidate;
pub mod console;
pub mod core;
pub mod exit_codes;
pub mod invoke;
pub mod io;
pub mod logging;
pub mod registry;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
