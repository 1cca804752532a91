//! Harness controller: runs every case of a suite against one candidate.

use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use crate::candidate::Candidate;
use crate::core::record::{ResultRecord, build_record};
use crate::core::resources::{ResourceDelta, TickPolicy};
use crate::core::types::{BatchReport, TestCase, TestSuite};
use crate::invoke::{CaptureSettings, invoke};
use crate::io::probe::ResourceProbe;

/// Runs cases one at a time, sampling resources around each invocation.
#[derive(Debug, Clone)]
pub struct BatchRunner<P> {
    probe: P,
    capture: CaptureSettings,
    tick_policy: TickPolicy,
}

impl<P: ResourceProbe> BatchRunner<P> {
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            capture: CaptureSettings::default(),
            tick_policy: TickPolicy::default(),
        }
    }

    pub fn capture(mut self, settings: CaptureSettings) -> Self {
        self.capture = settings;
        self
    }

    pub fn tick_policy(mut self, policy: TickPolicy) -> Self {
        self.tick_policy = policy;
        self
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Run every case in suite order. The report has exactly the suite's keys.
    ///
    /// Case failures are recorded, never propagated; a candidate that does not
    /// return blocks the batch.
    #[instrument(skip_all, fields(candidate = candidate.name(), cases = suite.len()))]
    pub fn run(&self, suite: &TestSuite, candidate: &mut dyn Candidate) -> BatchReport {
        info!("batch started");
        let mut report = BatchReport::with_capacity(suite.len());
        let mut failed = 0usize;
        for (key, case) in suite.iter() {
            let record = self.run_case(key, case, candidate);
            if record.stderr.is_some() {
                failed += 1;
            }
            report.push(key, record);
        }
        info!(failed, "batch finished");
        report
    }

    pub fn run_case(
        &self,
        key: &str,
        case: &TestCase,
        candidate: &mut dyn Candidate,
    ) -> ResultRecord {
        let args = case.positional_args();

        let before = self.probe.sample();
        let start = Instant::now();
        let outcome = invoke(candidate, &args, &self.capture);
        let elapsed = start.elapsed();
        let after = self.probe.sample();

        let delta = ResourceDelta::between(before, after, self.tick_policy);
        if delta.has_negative_ticks() {
            warn!(
                case = key,
                utime = delta.utime,
                stime = delta.stime,
                "negative cpu tick delta, a resource sample degraded"
            );
        }
        debug!(
            case = key,
            failed = outcome.failure().is_some(),
            elapsed_us = elapsed.as_micros() as u64,
            "case finished"
        );
        build_record(outcome, delta, elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::FnCandidate;
    use crate::core::resources::ResourceSample;
    use crate::test_support::{FixedProbe, ScriptedProbe, sample, suite};
    use anyhow::bail;
    use serde_json::{Value, json};

    fn sum() -> impl Candidate {
        FnCandidate::new("sum", 2, |args, _| {
            match (args[0].as_i64(), args[1].as_i64()) {
                (Some(a), Some(b)) => Ok(json!(a + b)),
                _ => bail!("sum expects integers"),
            }
        })
    }

    #[test]
    fn scenario_sum_returns_five() {
        let suite = suite(r#"{"t1": {"input": {"a": 2, "b": 3}}}"#);
        let mut candidate = sum();
        let report = BatchRunner::new(FixedProbe::default()).run(&suite, &mut candidate);

        let record = report.get("t1").expect("t1 record");
        assert_eq!(record.result, Some(json!(5)));
        assert_eq!(record.stdout, "");
        assert_eq!(record.stderr, None);
    }

    #[test]
    fn scenario_logging_then_failing() {
        let suite = suite(r#"{"t1": {"input": {"x": 1}}}"#);
        let mut candidate = FnCandidate::new("f", 1, |_, console| {
            console.log(&[json!("hi")]);
            bail!("bad")
        });
        let report = BatchRunner::new(FixedProbe::default()).run(&suite, &mut candidate);

        let record = report.get("t1").expect("t1 record");
        assert_eq!(record.result, None);
        assert_eq!(record.stdout, "hi");
        assert!(record.stderr.as_deref().is_some_and(|s| s.contains("bad")));
    }

    #[test]
    fn failure_does_not_stop_later_cases() {
        let suite = suite(
            r#"{"first": {"input": {"a": "x", "b": 1}}, "second": {"input": {"a": 1, "b": 1}}}"#,
        );
        let mut candidate = sum();
        let report = BatchRunner::new(FixedProbe::default()).run(&suite, &mut candidate);

        assert_eq!(report.keys().collect::<Vec<_>>(), vec!["first", "second"]);
        let first = report.get("first").expect("first");
        assert!(first.result.is_none());
        assert!(first.stderr.as_deref().is_some_and(|s| !s.is_empty()));
        let second = report.get("second").expect("second");
        assert_eq!(second.result, Some(json!(2)));
        assert_eq!(second.stderr, None);
    }

    #[test]
    fn report_keys_match_suite_keys() {
        let suite = suite(
            r#"{"k3": {"input": {}}, "k1": {"input": {"x": 1}}, "k2": {"input": {"x": 1, "y": 2}}}"#,
        );
        let mut candidate = FnCandidate::new("unit", 0, |_, _| Ok(Value::Null));
        let report = BatchRunner::new(FixedProbe::default()).run(&suite, &mut candidate);

        assert_eq!(
            report.keys().collect::<Vec<_>>(),
            suite.keys().collect::<Vec<_>>()
        );
        assert_eq!(report.get("k3").and_then(|r| r.result.clone()), Some(Value::Null));
        assert!(report.get("k1").and_then(|r| r.stderr.as_ref()).is_some());
    }

    #[test]
    fn candidate_state_carries_across_cases() {
        let suite = suite(r#"{"a": {"input": {}}, "b": {"input": {}}, "c": {"input": {}}}"#);
        let mut count = 0;
        let mut candidate = FnCandidate::new("counter", 0, move |_, _| {
            count += 1;
            Ok(json!(count))
        });
        let report = BatchRunner::new(FixedProbe::default()).run(&suite, &mut candidate);
        let results: Vec<Value> = report.iter().filter_map(|(_, r)| r.result.clone()).collect();
        assert_eq!(results, vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn metrics_are_deltas_with_absolute_peak() {
        let suite = suite(r#"{"t1": {"input": {}}}"#);
        let probe = ScriptedProbe::new([sample(100, 20, 4000), sample(104, 21, 4096)]);
        let mut candidate = FnCandidate::new("unit", 0, |_, _| Ok(Value::Null));
        let report = BatchRunner::new(probe).run(&suite, &mut candidate);

        let record = report.get("t1").expect("t1");
        assert_eq!((record.utime, record.stime, record.max_memory), (4, 1, 4096));
        assert!(record.realtime >= 0.0 && record.realtime.is_finite());
    }

    #[test]
    fn degraded_after_sample_propagates_by_default() {
        let suite = suite(r#"{"t1": {"input": {}}}"#);
        let probe = ScriptedProbe::new([sample(100, 20, 4000), ResourceSample::default()]);
        let mut candidate = FnCandidate::new("unit", 0, |_, _| Ok(Value::Null));
        let report = BatchRunner::new(probe).run(&suite, &mut candidate);

        let record = report.get("t1").expect("t1");
        assert_eq!((record.utime, record.stime, record.max_memory), (-100, -20, 0));
    }

    #[test]
    fn degraded_after_sample_clamps_when_configured() {
        let suite = suite(r#"{"t1": {"input": {}}}"#);
        let probe = ScriptedProbe::new([sample(100, 20, 4000), ResourceSample::default()]);
        let mut candidate = FnCandidate::new("unit", 0, |_, _| Ok(Value::Null));
        let report = BatchRunner::new(probe)
            .tick_policy(TickPolicy::Clamp)
            .run(&suite, &mut candidate);

        let record = report.get("t1").expect("t1");
        assert_eq!((record.utime, record.stime), (0, 0));
    }

    #[test]
    fn unavailable_probe_reports_zero_metrics() {
        let temp = tempfile::tempdir().expect("tempdir");
        let probe = crate::io::probe::ProcProbe::new(temp.path().join("absent"));
        let suite = suite(r#"{"a": {"input": {"x": 1}}, "b": {"input": {"x": 2}}}"#);
        let mut candidate = FnCandidate::new("id", 1, |args, _| Ok(args[0].clone()));
        let report = BatchRunner::new(probe).run(&suite, &mut candidate);

        for (_, record) in report.iter() {
            assert_eq!((record.utime, record.stime, record.max_memory), (0, 0, 0));
        }
    }

    #[test]
    fn malformed_stat_file_degrades_instead_of_aborting() {
        let temp = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            temp.path().join("stat"),
            "1 (x) R 1 1 1 0 -1 0 0 0 0 0 -9223372036854775808 0 0 0\n",
        )
        .expect("stat");
        std::fs::write(temp.path().join("status"), "VmHWM:\t 128 kB\n").expect("status");
        let probe = crate::io::probe::ProcProbe::new(temp.path());
        let suite = suite(r#"{"a": {"input": {}}, "b": {"input": {}}}"#);
        let mut candidate = FnCandidate::new("unit", 0, |_, _| Ok(Value::Null));
        let report = BatchRunner::new(probe).run(&suite, &mut candidate);

        assert_eq!(report.len(), 2);
        for (_, record) in report.iter() {
            assert_eq!((record.utime, record.stime, record.max_memory), (0, 0, 128));
            assert_eq!(record.result, Some(Value::Null));
        }
    }

    #[test]
    fn probe_is_sampled_twice_per_case() {
        let suite = suite(r#"{"a": {"input": {}}, "b": {"input": {}}}"#);
        let probe = ScriptedProbe::new([
            sample(1, 1, 10),
            sample(2, 1, 10),
            sample(2, 1, 10),
            sample(5, 3, 20),
        ]);
        let mut candidate = FnCandidate::new("unit", 0, |_, _| Ok(Value::Null));
        let runner = BatchRunner::new(probe);
        let report = runner.run(&suite, &mut candidate);

        assert_eq!(runner.probe().remaining(), 0);
        let b = report.get("b").expect("b");
        assert_eq!((b.utime, b.stime, b.max_memory), (3, 2, 20));
    }
}
