mod fixture;
mod yaml_runner;

pub use fixture::{FixtureColumn, FixtureForeignKey, FixtureIndex, FixtureSchema, FixtureSchemaSet, FixtureSequence, FixtureTable};
pub use yaml_runner::{TestCase, TestResult, load_test_cases_from_str, run_test_case};
