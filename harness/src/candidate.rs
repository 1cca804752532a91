//! The function under test.

use anyhow::Result;
use serde_json::Value;

use crate::console::Console;

/// A callable solution with a fixed number of positional parameters.
///
/// The harness calls the same value once per test case and never resets it,
/// so any state the candidate keeps carries over between cases. Output must go
/// through `console`; writing to the process streams directly bypasses capture.
pub trait Candidate {
    fn name(&self) -> &str;

    fn arity(&self) -> usize;

    /// Run once. `args.len()` equals `self.arity()`.
    fn call(&mut self, args: &[Value], console: &mut dyn Console) -> Result<Value>;
}

/// [`Candidate`] backed by a closure.
pub struct FnCandidate<F> {
    name: String,
    arity: usize,
    func: F,
}

impl<F> FnCandidate<F>
where
    F: FnMut(&[Value], &mut dyn Console) -> Result<Value>,
{
    pub fn new(name: impl Into<String>, arity: usize, func: F) -> Self {
        Self {
            name: name.into(),
            arity,
            func,
        }
    }
}

impl<F> Candidate for FnCandidate<F>
where
    F: FnMut(&[Value], &mut dyn Console) -> Result<Value>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn arity(&self) -> usize {
        self.arity
    }

    fn call(&mut self, args: &[Value], console: &mut dyn Console) -> Result<Value> {
        (self.func)(args, console)
    }
}
