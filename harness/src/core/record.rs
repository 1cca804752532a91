//! Assembly of the public per-test-case record.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::outcome::ExecutionOutcome;
use super::resources::ResourceDelta;

/// Description used for every case of a batch that never ran.
///
/// Graders match this text byte for byte, misspelling included.
pub const PLACEHOLDER_ERROR: &str = "(error occured)";

/// Per-test-case result, serialized with the public output keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub result: Option<Value>,
    pub utime: i64,
    pub stime: i64,
    /// Wall-clock seconds, rounded to microseconds.
    pub realtime: f64,
    /// Peak resident memory (kB) when the case finished.
    pub max_memory: i64,
    pub stdout: String,
    pub stderr: Option<String>,
}

impl ResultRecord {
    /// Record for a case that could not be executed; metrics are `-1`.
    pub fn placeholder() -> Self {
        Self {
            result: None,
            utime: -1,
            stime: -1,
            realtime: -1.0,
            max_memory: -1,
            stdout: String::new(),
            stderr: Some(PLACEHOLDER_ERROR.to_string()),
        }
    }
}

pub fn build_record(
    outcome: ExecutionOutcome,
    delta: ResourceDelta,
    elapsed: Duration,
) -> ResultRecord {
    let (result, captured, failure) = outcome.into_parts();
    ResultRecord {
        result,
        utime: delta.utime,
        stime: delta.stime,
        realtime: round_secs(elapsed),
        max_memory: delta.max_memory,
        stdout: captured.trim().to_string(),
        stderr: failure.map(|failure| failure.report_text()),
    }
}

/// Seconds rounded to 6 decimal places.
pub fn round_secs(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 1e6).round() / 1e6
}
