//! Harness configuration loaded from `harness.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::resources::TickPolicy;
use crate::invoke::{CaptureSettings, DEFAULT_CAPTURE_LIMIT_BYTES};
use crate::io::probe::DEFAULT_PROC_DIR;

/// Harness configuration (TOML).
///
/// Missing fields take their defaults; a missing file is the default config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HarnessConfig {
    /// Directory holding the `stat` and `status` files sampled per case.
    pub proc_dir: PathBuf,

    /// Reporting of negative tick deltas.
    pub tick_policy: TickPolicy,

    /// Truncate captured candidate output beyond this many bytes.
    pub capture_limit_bytes: usize,

    /// Mirror candidate output to stderr while it is captured.
    pub echo_output: bool,

    /// Print a placeholder report when the candidate cannot be resolved.
    pub placeholder_on_fatal: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            proc_dir: PathBuf::from(DEFAULT_PROC_DIR),
            tick_policy: TickPolicy::default(),
            capture_limit_bytes: DEFAULT_CAPTURE_LIMIT_BYTES,
            echo_output: false,
            placeholder_on_fatal: false,
        }
    }
}

impl HarnessConfig {
    pub fn validate(&self) -> Result<()> {
        if self.proc_dir.as_os_str().is_empty() {
            return Err(anyhow!("proc_dir must be non-empty"));
        }
        if self.capture_limit_bytes == 0 {
            return Err(anyhow!("capture_limit_bytes must be > 0"));
        }
        Ok(())
    }

    pub fn capture_settings(&self) -> CaptureSettings {
        CaptureSettings {
            limit_bytes: self.capture_limit_bytes,
            echo_to_stderr: self.echo_output,
        }
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `HarnessConfig::default()`.
pub fn load_config(path: &Path) -> Result<HarnessConfig> {
    if !path.exists() {
        let cfg = HarnessConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: HarnessConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}
