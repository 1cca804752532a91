//! Test suite loading: JSON decode, schema check, typed parse.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use jsonschema::Draft;
use serde_json::Value;

use crate::core::types::TestSuite;

const V1_SCHEMA: &str = include_str!("../../schemas/test_suite/v1.schema.json");

/// Read and validate a suite file.
pub fn load_suite(path: &Path) -> Result<TestSuite> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read test suite {}", path.display()))?;
    parse_suite(&raw).with_context(|| format!("invalid test suite {}", path.display()))
}

/// Parse and validate suite JSON: schema conformance, then typed decode.
pub fn parse_suite(raw: &str) -> Result<TestSuite> {
    let instance: Value = serde_json::from_str(raw).context("parse suite json")?;
    let schema: Value = serde_json::from_str(V1_SCHEMA).context("parse suite schema")?;
    validate_schema(&instance, &schema)?;
    let suite: TestSuite = serde_json::from_str(raw).context("parse suite as v1 struct")?;
    Ok(suite)
}

/// Validate JSON instance against a JSON Schema (Draft 2020-12).
fn validate_schema(instance: &Value, schema: &Value) -> Result<()> {
    let compiled = jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(schema)
        .context("compile json schema")?;
    let messages: Vec<String> = compiled
        .iter_errors(instance)
        .map(|err| err.to_string())
        .collect();
    if !messages.is_empty() {
        bail!("schema validation failed:\n- {}", messages.join("\n- "));
    }
    Ok(())
}
