//! Golden test runner for executing corpus cases

use crate::{
    corpus::{CorpusManager, ExpectedError, TestCase},
    diff::{apply_ignores, DiffEngine},
    GoldenConfig, GoldenError, Result,
};
use colored::*;
use natbridge_core::{Error as TranslateError, Translator};
use serde_json::Value;
use std::time::Instant;

/// Result of running a golden test
#[derive(Debug)]
pub struct TestResult {
    /// `category/name` of the test
    pub name: String,

    /// Whether the test passed
    pub passed: bool,

    /// Whether the case was disabled and not run
    pub skipped: bool,

    /// Error message if failed
    pub error: Option<String>,

    /// Diff output if comparison failed
    pub diff: Option<String>,

    /// Execution time in milliseconds
    pub duration_ms: u64,

    /// Whether the expectation was rewritten
    pub updated: bool,
}

impl TestResult {
    /// Print the test result
    pub fn print(&self, verbose: bool) {
        let status = if self.skipped {
            "SKIP".yellow().bold()
        } else if self.passed {
            "PASS".green().bold()
        } else {
            "FAIL".red().bold()
        };

        println!("{} {} ({}ms)", status, self.name, self.duration_ms);

        if let Some(ref error) = self.error {
            println!("  {}: {}", "Error".red(), error);
        }

        if verbose || !self.passed {
            if let Some(ref diff) = self.diff {
                println!("{}", diff);
            }
        }

        if self.updated {
            println!("  {}", "Expectation updated".yellow());
        }
    }
}

/// What one translation attempt produced
#[derive(Debug, Clone, PartialEq)]
enum Outcome {
    Record(Value),
    Failed(ExpectedError),
}

/// Runner for golden tests
pub struct GoldenTestRunner {
    config: GoldenConfig,
    corpus_manager: CorpusManager,
    diff_engine: DiffEngine,
}

impl GoldenTestRunner {
    /// Create a new test runner
    pub fn new(config: GoldenConfig) -> Self {
        let corpus_manager = CorpusManager::new(&config.corpus_dir);
        let diff_engine = DiffEngine::new(config.diff_options.clone());

        Self {
            config,
            corpus_manager,
            diff_engine,
        }
    }

    pub fn corpus(&self) -> &CorpusManager {
        &self.corpus_manager
    }

    /// Run a single test by `category/name`
    pub fn run_test(&self, test_name: &str) -> Result<TestResult> {
        let test_case = self.corpus_manager.load_by_id(test_name)?;
        let result = self.run_case(&test_case);

        if self.config.verbose {
            result.print(true);
        }

        if result.passed {
            Ok(result)
        } else {
            Err(GoldenError::TestFailed(format!(
                "Test '{}' failed: {}{}",
                test_name,
                result.error.as_deref().unwrap_or("Unknown error"),
                result.diff.as_deref().map(|d| format!("\n{}", d)).unwrap_or_default()
            )))
        }
    }

    /// Run a batch of tests matching a pattern
    pub fn run_batch(&self, pattern: &str) -> Result<Vec<TestResult>> {
        let tests = self.corpus_manager.discover_tests()?;
        let filtered_tests = self.corpus_manager.filter_by_pattern(tests, pattern);

        if filtered_tests.is_empty() {
            return Err(GoldenError::CorpusError(format!(
                "No tests found matching pattern '{}' in {:?}",
                pattern, self.config.corpus_dir
            )));
        }

        println!("Running {} tests...\n", filtered_tests.len());

        let mut results = Vec::new();
        let mut failed = 0;

        for test_case in &filtered_tests {
            let result = self.run_case(test_case);
            if !result.passed {
                failed += 1;
            }
            result.print(self.config.verbose);
            results.push(result);
        }

        println!("\n{}", "=== Test Summary ===".bold());
        println!(
            "{}: {} passed, {} failed",
            "Results".bold(),
            (results.len() - failed).to_string().green(),
            failed.to_string().red()
        );

        if failed > 0 {
            Err(GoldenError::TestFailed(format!("{} test(s) failed", failed)))
        } else {
            Ok(results)
        }
    }

    /// Run one loaded case, folding every failure into the result
    pub fn run_case(&self, test_case: &TestCase) -> TestResult {
        let start = Instant::now();
        let mut result = TestResult {
            name: test_case.id(),
            passed: true,
            skipped: false,
            error: None,
            diff: None,
            duration_ms: 0,
            updated: false,
        };

        if !test_case.metadata.enabled {
            result.skipped = true;
            return result;
        }

        match self.execute_test(test_case) {
            Ok(Verdict::Pass) => {}
            Ok(Verdict::Updated(diff)) => {
                result.updated = true;
                result.diff = diff;
            }
            Ok(Verdict::Fail { error, diff }) => {
                result.passed = false;
                result.error = Some(error);
                result.diff = diff;
            }
            Err(e) => {
                result.passed = false;
                result.error = Some(e.to_string());
            }
        }

        result.duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        result
    }

    fn execute_test(&self, test_case: &TestCase) -> Result<Verdict> {
        let outcome = self.perform_translation(test_case)?;

        let verdict = match (&test_case.expected, test_case.expected_error, &outcome) {
            (Some(expected), None, Outcome::Record(actual)) => {
                let mut expected = expected.clone();
                let mut actual = actual.clone();
                apply_ignores(&mut expected, &test_case.ignore_fields);
                apply_ignores(&mut actual, &test_case.ignore_fields);

                let diff_result = self.diff_engine.compare(&expected, &actual);
                if diff_result.matches {
                    Verdict::Pass
                } else {
                    Verdict::Fail {
                        error: format!(
                            "Output differs at {}",
                            diff_result.summary.differing_paths.join(", ")
                        ),
                        diff: Some(diff_result.diff_output),
                    }
                }
            }
            (None, Some(expected), Outcome::Failed(actual)) if expected == *actual => Verdict::Pass,
            (None, None, _) => Verdict::Fail {
                error: "Case has no expectation".to_string(),
                diff: None,
            },
            (_, _, Outcome::Record(actual)) => Verdict::Fail {
                error: format!(
                    "Expected {} error, got a record",
                    test_case.expected_error.map(|e| e.to_string()).unwrap_or_default()
                ),
                diff: Some(crate::diff::pretty_string(actual)),
            },
            (_, expected_error, Outcome::Failed(actual)) => Verdict::Fail {
                error: match expected_error {
                    Some(expected) => format!("Expected {} error, got {} error", expected, actual),
                    None => format!("Expected a record, got {} error", actual),
                },
                diff: None,
            },
        };

        match verdict {
            Verdict::Fail { diff, .. } if self.config.update_expected => {
                self.update_expectation(test_case, outcome)?;
                Ok(Verdict::Updated(diff))
            }
            verdict => Ok(verdict),
        }
    }

    /// Run the translator for a case
    fn perform_translation(&self, test_case: &TestCase) -> Result<Outcome> {
        let input = test_case.input_bytes()?;
        let translator = Translator::with_options(test_case.options);

        match translator.translate(test_case.direction, &input) {
            Ok(translation) => Ok(Outcome::Record(translation.payload)),
            Err(TranslateError::Parse { .. }) => Ok(Outcome::Failed(ExpectedError::Parse)),
            Err(TranslateError::NoMatchingSchema { .. }) => {
                Ok(Outcome::Failed(ExpectedError::NoMatchingSchema))
            }
            Err(e) => Err(GoldenError::TestFailed(format!("Translation failed: {}", e))),
        }
    }

    fn update_expectation(&self, test_case: &TestCase, outcome: Outcome) -> Result<()> {
        let mut updated = test_case.clone();
        match outcome {
            Outcome::Record(value) => {
                updated.expected = Some(value);
                updated.expected_error = None;
            }
            Outcome::Failed(kind) => {
                updated.expected = None;
                updated.expected_error = Some(kind);
            }
        }
        self.corpus_manager.save_test_case(&updated)
    }

    /// List all available tests
    pub fn list_tests(&self) -> Result<Vec<String>> {
        let tests = self.corpus_manager.discover_tests()?;
        Ok(tests.iter().map(TestCase::id).collect())
    }

    /// Print corpus statistics
    pub fn get_statistics(&self) -> Result<()> {
        let stats = self.corpus_manager.get_statistics()?;
        stats.print();
        Ok(())
    }
}

enum Verdict {
    Pass,
    Updated(Option<String>),
    Fail { error: String, diff: Option<String> },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::TEST_FILE;
    use crate::DiffOptions;
    use serde_json::json;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn config(dir: &Path, update_expected: bool) -> GoldenConfig {
        GoldenConfig {
            corpus_dir: dir.to_path_buf(),
            update_expected,
            diff_options: DiffOptions {
                colored: false,
                ..Default::default()
            },
            verbose: false,
        }
    }

    fn write_case(root: &Path, id: &str, case: Value) {
        let dir = root.join(id);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(TEST_FILE), serde_json::to_string(&case).unwrap()).unwrap();
    }

    #[test]
    fn test_error_expectations() {
        let temp_dir = TempDir::new().unwrap();
        write_case(
            temp_dir.path(),
            "errors/unknown",
            json!({
                "direction": "builder_to_connector",
                "input": {"router_type": "azure"},
                "expected_error": "no_matching_schema"
            }),
        );
        write_case(
            temp_dir.path(),
            "errors/truncated",
            json!({
                "direction": "connector_to_builder",
                "input_raw": "{\"_type\": \"aws\"",
                "expected_error": "parse"
            }),
        );

        let runner = GoldenTestRunner::new(config(temp_dir.path(), false));
        let results = runner.run_batch("errors/*").unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.passed));
    }

    #[test]
    fn test_mismatch_fails_without_update() {
        let temp_dir = TempDir::new().unwrap();
        write_case(
            temp_dir.path(),
            "aws/wrong",
            json!({
                "direction": "builder_to_connector",
                "input": {"router_type": "aws"},
                "expected": {"_type": "aws"}
            }),
        );

        let runner = GoldenTestRunner::new(config(temp_dir.path(), false));
        let err = runner.run_test("aws/wrong").unwrap_err();
        assert!(err.to_string().contains("datacenter_vpc_id (extra in actual)"));
    }

    #[test]
    fn test_update_rewrites_expectation() {
        let temp_dir = TempDir::new().unwrap();
        write_case(
            temp_dir.path(),
            "aws/refresh",
            json!({
                "direction": "builder_to_connector",
                "input": {"router_type": "aws", "datacenter_name": "dc1"},
                "expected_error": "parse"
            }),
        );

        let runner = GoldenTestRunner::new(config(temp_dir.path(), true));
        let result = runner.run_test("aws/refresh").unwrap();
        assert!(result.updated);

        let reloaded = runner.corpus().load_by_id("aws/refresh").unwrap();
        assert_eq!(reloaded.expected_error, None);
        assert_eq!(reloaded.expected.unwrap()["datacenter_vpc_id"], "dc1");

        let runner = GoldenTestRunner::new(config(temp_dir.path(), false));
        assert!(runner.run_test("aws/refresh").is_ok());
    }

    #[test]
    fn test_disabled_cases_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        write_case(
            temp_dir.path(),
            "misc/off",
            json!({"direction": "builder_to_connector", "metadata": {"enabled": false}}),
        );

        let runner = GoldenTestRunner::new(config(temp_dir.path(), false));
        let result = runner.run_test("misc/off").unwrap();
        assert!(result.skipped);
        assert_eq!(runner.list_tests().unwrap(), vec!["misc/off".to_string()]);
    }
}
