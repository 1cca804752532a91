//! Resource probe backed by procfs.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::procfs::{parse_cpu_ticks, parse_peak_memory_kb};
use crate::core::resources::ResourceSample;

pub const DEFAULT_PROC_DIR: &str = "/proc/self";

/// Source of point-in-time resource samples. Sampling never fails.
pub trait ResourceProbe {
    fn sample(&self) -> ResourceSample;
}

/// Reads `stat` and `status` from a process directory (normally `/proc/self`).
///
/// A missing directory or malformed file degrades to zero values.
#[derive(Debug, Clone)]
pub struct ProcProbe {
    dir: PathBuf,
}

impl Default for ProcProbe {
    fn default() -> Self {
        Self::new(DEFAULT_PROC_DIR)
    }
}

impl ProcProbe {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn cpu_ticks(&self) -> (i64, i64) {
        read_parsed(&self.dir.join("stat"), parse_cpu_ticks).unwrap_or((0, 0))
    }

    pub fn peak_memory_kb(&self) -> i64 {
        read_parsed(&self.dir.join("status"), parse_peak_memory_kb).unwrap_or(0)
    }
}

impl ResourceProbe for ProcProbe {
    fn sample(&self) -> ResourceSample {
        let (user_ticks, system_ticks) = self.cpu_ticks();
        ResourceSample {
            user_ticks,
            system_ticks,
            peak_memory_kb: self.peak_memory_kb(),
        }
    }
}

fn read_parsed<T>(path: &Path, parse: impl FnOnce(&str) -> Option<T>) -> Option<T> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            debug!(path = %path.display(), err = %err, "probe source unreadable");
            return None;
        }
    };
    let parsed = parse(&contents);
    if parsed.is_none() {
        debug!(path = %path.display(), "probe source malformed");
    }
    parsed
}
