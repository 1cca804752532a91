//! Test-only helpers: deterministic probes and suite fixtures.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::core::resources::ResourceSample;
use crate::core::types::TestSuite;
use crate::io::probe::ResourceProbe;

/// Probe that always returns the same sample.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedProbe(pub ResourceSample);

impl ResourceProbe for FixedProbe {
    fn sample(&self) -> ResourceSample {
        self.0
    }
}

/// Probe that replays samples in order, then degrades to zero.
#[derive(Debug, Default)]
pub struct ScriptedProbe {
    samples: RefCell<VecDeque<ResourceSample>>,
}

impl ScriptedProbe {
    pub fn new(samples: impl IntoIterator<Item = ResourceSample>) -> Self {
        Self {
            samples: RefCell::new(samples.into_iter().collect()),
        }
    }

    pub fn remaining(&self) -> usize {
        self.samples.borrow().len()
    }
}

impl ResourceProbe for ScriptedProbe {
    fn sample(&self) -> ResourceSample {
        self.samples.borrow_mut().pop_front().unwrap_or_default()
    }
}

pub fn sample(user_ticks: i64, system_ticks: i64, peak_memory_kb: i64) -> ResourceSample {
    ResourceSample {
        user_ticks,
        system_ticks,
        peak_memory_kb,
    }
}

/// Decode a suite from JSON, panicking on malformed fixtures.
pub fn suite(json: &str) -> TestSuite {
    serde_json::from_str(json).expect("fixture suite parses")
}
