//! Result of a single candidate invocation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Why an invocation did not produce a return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    /// The candidate returned an error.
    RaisedError,
    /// The candidate panicked.
    Panicked,
    /// The argument count did not match the candidate's arity; the candidate was not called.
    ArityMismatch,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::RaisedError => "raised-error",
            FailureKind::Panicked => "panicked",
            FailureKind::ArityMismatch => "arity-mismatch",
        }
    }
}

/// Tagged failure captured from an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub description: String,
}

impl Failure {
    pub fn new(kind: FailureKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
        }
    }

    pub fn arity_mismatch(expected: usize, got: usize) -> Self {
        Self::new(
            FailureKind::ArityMismatch,
            format!("candidate expects {expected} argument(s) but the test case supplies {got}"),
        )
    }

    /// Trimmed description, never empty.
    pub fn report_text(&self) -> String {
        let trimmed = self.description.trim();
        if trimmed.is_empty() {
            self.kind.as_str().to_string()
        } else {
            trimmed.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Completion {
    Returned(Value),
    Failed(Failure),
}

/// What an invocation produced: a return value or a failure, plus captured output.
///
/// The return value and the failure are mutually exclusive by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionOutcome {
    completion: Completion,
    captured_output: String,
}

impl ExecutionOutcome {
    pub fn returned(value: Value, captured_output: String) -> Self {
        Self {
            completion: Completion::Returned(value),
            captured_output,
        }
    }

    pub fn failed(failure: Failure, captured_output: String) -> Self {
        Self {
            completion: Completion::Failed(failure),
            captured_output,
        }
    }

    pub fn return_value(&self) -> Option<&Value> {
        match &self.completion {
            Completion::Returned(value) => Some(value),
            Completion::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match &self.completion {
            Completion::Returned(_) => None,
            Completion::Failed(failure) => Some(failure),
        }
    }

    pub fn captured_output(&self) -> &str {
        &self.captured_output
    }

    pub fn into_parts(self) -> (Option<Value>, String, Option<Failure>) {
        match self.completion {
            Completion::Returned(value) => (Some(value), self.captured_output, None),
            Completion::Failed(failure) => (None, self.captured_output, Some(failure)),
        }
    }
}
