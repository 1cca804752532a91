//! Built-in candidates addressable from the command line.
//!
//! A candidate argument is either a registered name (`sum`) or a path whose
//! file stem is one (`solutions/sum.rs`).

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use serde_json::{Number, Value, json};

use crate::candidate::{Candidate, FnCandidate};

type Factory = fn() -> Box<dyn Candidate>;

#[derive(Default)]
pub struct Registry {
    entries: BTreeMap<&'static str, Factory>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the reference solutions shipped in the binary.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("sum", sum);
        registry.register("concat", concat);
        registry.register("echo", echo);
        registry.register("fail", fail);
        registry.register("panic", panicking);
        registry.register("counter", counter);
        registry
    }

    pub fn register(&mut self, name: &'static str, factory: Factory) {
        self.entries.insert(name, factory);
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.entries.keys().copied()
    }

    /// Instantiate a fresh candidate from a name or path.
    pub fn resolve(&self, spec: &str) -> Result<Box<dyn Candidate>> {
        let name = candidate_name(spec)?;
        let factory = self.entries.get(name).ok_or_else(|| {
            anyhow!(
                "no callable entry point {name:?} (available: {})",
                self.names().collect::<Vec<_>>().join(", ")
            )
        })?;
        Ok(factory())
    }
}

fn candidate_name(spec: &str) -> Result<&str> {
    let stem = Path::new(spec)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.trim().is_empty())
        .with_context(|| format!("candidate {spec:?} has no usable name"))?;
    Ok(stem)
}

fn sum() -> Box<dyn Candidate> {
    Box::new(FnCandidate::new("sum", 2, |args, _| {
        let (a, b) = (&args[0], &args[1]);
        if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
            let total = x.checked_add(y).context("integer overflow")?;
            return Ok(json!(total));
        }
        match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => Number::from_f64(x + y)
                .map(Value::Number)
                .context("sum is not a finite number"),
            _ => bail!("sum expects two numbers, got {a} and {b}"),
        }
    }))
}

fn concat() -> Box<dyn Candidate> {
    Box::new(FnCandidate::new("concat", 2, |args, _| {
        match (&args[0], &args[1]) {
            (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{a}{b}"))),
            (Value::Array(a), Value::Array(b)) => {
                Ok(Value::Array(a.iter().chain(b).cloned().collect()))
            }
            (a, b) => bail!("concat expects two strings or two arrays, got {a} and {b}"),
        }
    }))
}

fn echo() -> Box<dyn Candidate> {
    Box::new(FnCandidate::new("echo", 1, |args, console| {
        console.log(args);
        Ok(args[0].clone())
    }))
}

fn fail() -> Box<dyn Candidate> {
    Box::new(FnCandidate::new("fail", 1, |args, console| {
        console.log(&[json!("received"), args[0].clone()]);
        bail!("bad input: {}", args[0])
    }))
}

fn panicking() -> Box<dyn Candidate> {
    Box::new(FnCandidate::new("panic", 1, |args, _| {
        panic!("candidate panicked on input {}", args[0])
    }))
}

fn counter() -> Box<dyn Candidate> {
    let mut calls: u64 = 0;
    Box::new(FnCandidate::new("counter", 0, move |_, _| {
        calls += 1;
        Ok(json!(calls))
    }))
}
