//! Report serialization to the harness's own stdout.

use std::io::Write;

use anyhow::{Context, Result};

use crate::core::types::BatchReport;

/// Serialize `report` as JSON with a trailing newline.
pub fn render_report(report: &BatchReport, compact: bool) -> Result<String> {
    let mut payload = if compact {
        serde_json::to_string(report)
    } else {
        serde_json::to_string_pretty(report)
    }
    .context("serialize report")?;
    payload.push('\n');
    Ok(payload)
}

pub fn write_report(mut out: impl Write, report: &BatchReport, compact: bool) -> Result<()> {
    let payload = render_report(report, compact)?;
    out.write_all(payload.as_bytes()).context("write report")?;
    out.flush().context("flush report")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::ResultRecord;

    #[test]
    fn pretty_report_is_indented_and_newline_terminated() {
        let mut report = BatchReport::new();
        report.push("t1", ResultRecord::placeholder());
        let rendered = render_report(&report, false).expect("render");
        assert!(rendered.starts_with("{\n  \"t1\": {\n"));
        assert!(rendered.ends_with("}\n"));
    }

    #[test]
    fn compact_report_is_single_line() {
        let mut report = BatchReport::new();
        report.push("t1", ResultRecord::placeholder());
        let rendered = render_report(&report, true).expect("render");
        assert_eq!(rendered.lines().count(), 1);
    }

    #[test]
    fn empty_report_renders_empty_object() {
        let mut out = Vec::new();
        write_report(&mut out, &BatchReport::new(), false).expect("write");
        assert_eq!(String::from_utf8(out).expect("utf8"), "{}\n");
    }
}
