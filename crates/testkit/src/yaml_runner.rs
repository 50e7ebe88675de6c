use std::collections::BTreeMap;

use serde::Deserialize;

use schemadiff_core::diff::diff;
use schemadiff_core::emit::emit;
use schemadiff_core::DDLBackend;

use crate::fixture::FixtureSchemaSet;

/// A single named scenario: a source/target schema pair plus the
/// substrings the generated migration script (or summary) must contain.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TestCase {
    pub source: FixtureSchemaSet,
    pub target: FixtureSchemaSet,
    #[serde(default)]
    pub expect_up_contains: Vec<String>,
    #[serde(default)]
    pub expect_down_contains: Vec<String>,
    #[serde(default)]
    pub expect_summary: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestResult {
    Passed,
    Failed(String),
}

pub fn load_test_cases_from_str(yaml: &str) -> Result<BTreeMap<String, TestCase>, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

/// Runs one fixture to completion: diff the two literal schemas, emit DDL
/// through `backend`, and check the expected substrings/summary counts.
pub fn run_test_case(backend: &dyn DDLBackend, test: &TestCase) -> TestResult {
    let source = test.source.clone().into();
    let target = test.target.clone().into();
    let schema_diff = diff(&source, &target);

    for (key, expected) in &test.expect_summary {
        let actual = schema_diff.summary.get(key).copied().unwrap_or(0);
        if actual != *expected {
            return TestResult::Failed(format!(
                "summary[{key}] = {actual}, expected {expected}"
            ));
        }
    }

    let script = match emit(backend, &schema_diff) {
        Ok(script) => script,
        Err(error) => return TestResult::Failed(format!("emit failed: {error}")),
    };

    for needle in &test.expect_up_contains {
        if !script.up.contains(needle.as_str()) {
            return TestResult::Failed(format!("up script missing `{needle}`\n---\n{}", script.up));
        }
    }
    for needle in &test.expect_down_contains {
        if !script.down.contains(needle.as_str()) {
            return TestResult::Failed(format!(
                "down script missing `{needle}`\n---\n{}",
                script.down
            ));
        }
    }

    TestResult::Passed
}
