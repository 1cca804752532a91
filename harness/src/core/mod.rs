//! Deterministic, pure logic shared by the harness.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data (suites, samples, outcomes) and return deterministic outputs suitable
//! for tests.

pub mod outcome;
pub mod procfs;
pub mod record;
pub mod resources;
pub mod types;
