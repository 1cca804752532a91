//! Suite and report types shared by the harness components.
//!
//! Both the suite and the report are ordered: cases run in file order and the
//! report lists them in the same order.

use std::collections::HashSet;
use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::record::ResultRecord;

/// One named input scenario.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TestCase {
    /// Parameter name to value, in declaration order.
    pub input: Map<String, Value>,
}

impl TestCase {
    pub fn new(input: Map<String, Value>) -> Self {
        Self { input }
    }

    /// Input values in declaration order. Parameter names are dropped.
    pub fn positional_args(&self) -> Vec<Value> {
        self.input.values().cloned().collect()
    }
}

/// Ordered collection of uniquely keyed test cases.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestSuite {
    cases: Vec<(String, TestCase)>,
    seen: HashSet<String>,
}

impl TestSuite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a case. Returns `false` (and keeps the existing case) if the key is taken.
    pub fn insert(&mut self, key: impl Into<String>, case: TestCase) -> bool {
        let key = key.into();
        if !self.seen.insert(key.clone()) {
            return false;
        }
        self.cases.push((key, case));
        true
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TestCase)> {
        self.cases.iter().map(|(key, case)| (key.as_str(), case))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cases.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

impl<'de> Deserialize<'de> for TestSuite {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SuiteVisitor;

        impl<'de> Visitor<'de> for SuiteVisitor {
            type Value = TestSuite;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map from test case key to test case")
            }

            fn visit_map<A>(self, mut access: A) -> Result<TestSuite, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut suite = TestSuite::new();
                while let Some((key, case)) = access.next_entry::<String, TestCase>()? {
                    if suite.contains_key(&key) {
                        return Err(de::Error::custom(format!(
                            "duplicate test case key {key:?}"
                        )));
                    }
                    suite.insert(key, case);
                }
                Ok(suite)
            }
        }

        deserializer.deserialize_map(SuiteVisitor)
    }
}

/// Per-case results keyed like the suite that produced them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    records: Vec<(String, ResultRecord)>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, key: impl Into<String>, record: ResultRecord) {
        self.records.push((key.into(), record));
    }

    pub fn get(&self, key: &str) -> Option<&ResultRecord> {
        self.records
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, record)| record)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResultRecord)> {
        self.records
            .iter()
            .map(|(key, record)| (key.as_str(), record))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Report used when the batch could not run at all: every suite key maps
    /// to [`ResultRecord::placeholder`].
    pub fn placeholder(suite: &TestSuite) -> Self {
        let mut report = Self::with_capacity(suite.len());
        for key in suite.keys() {
            report.push(key, ResultRecord::placeholder());
        }
        report
    }
}

impl Serialize for BatchReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for (key, record) in &self.records {
            map.serialize_entry(key, record)?;
        }
        map.end()
    }
}
