//! Test corpus management for golden tests

use crate::{GoldenError, Result};
use natbridge_core::{Direction, TranslatorOptions};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File name every corpus case is stored under
pub const TEST_FILE: &str = "test.json";

/// A test case in the corpus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    /// Name of the test case, taken from its directory
    #[serde(skip)]
    pub name: String,

    /// Category/group of the test, taken from the parent directory
    #[serde(skip)]
    pub category: String,

    /// Location of the `test.json` this case was loaded from
    #[serde(skip)]
    pub path: PathBuf,

    pub direction: Direction,

    /// Input record
    #[serde(default)]
    pub input: Value,

    /// Raw input bytes, used instead of `input` for malformed-input cases
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_raw: Option<String>,

    /// Translator options for this case
    #[serde(default)]
    pub options: TranslatorOptions,

    /// Exact expected output record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Value>,

    /// Expected failure class when no output should be produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_error: Option<ExpectedError>,

    /// Dotted paths removed from both sides before comparison
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore_fields: Vec<String>,

    /// Test metadata
    #[serde(default)]
    pub metadata: TestMetadata,
}

impl TestCase {
    /// `category/name`, the identifier used by the runner
    pub fn id(&self) -> String {
        format!("{}/{}", self.category, self.name)
    }

    /// Bytes handed to the translator
    pub fn input_bytes(&self) -> Result<Vec<u8>> {
        match &self.input_raw {
            Some(raw) => Ok(raw.as_bytes().to_vec()),
            None => Ok(serde_json::to_vec(&self.input)?),
        }
    }
}

/// Failure classes a case may expect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedError {
    Parse,
    NoMatchingSchema,
}

impl std::fmt::Display for ExpectedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpectedError::Parse => write!(f, "parse"),
            ExpectedError::NoMatchingSchema => write!(f, "no_matching_schema"),
        }
    }
}

/// Metadata about a test case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestMetadata {
    /// Description of what this tests
    #[serde(default)]
    pub description: String,

    /// Tags for categorization
    #[serde(default)]
    pub tags: Vec<String>,

    /// Whether this test is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Priority level (lower = higher priority)
    #[serde(default = "default_priority")]
    pub priority: u32,
}

impl Default for TestMetadata {
    fn default() -> Self {
        Self {
            description: String::new(),
            tags: Vec::new(),
            enabled: true,
            priority: default_priority(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_priority() -> u32 {
    100
}

/// Manages the test corpus
pub struct CorpusManager {
    corpus_dir: PathBuf,
}

impl CorpusManager {
    /// Create a new corpus manager
    pub fn new(corpus_dir: impl AsRef<Path>) -> Self {
        Self {
            corpus_dir: corpus_dir.as_ref().to_path_buf(),
        }
    }

    pub fn corpus_dir(&self) -> &Path {
        &self.corpus_dir
    }

    /// Discover all test cases in the corpus
    pub fn discover_tests(&self) -> Result<Vec<TestCase>> {
        let mut tests = Vec::new();

        if !self.corpus_dir.exists() {
            return Ok(tests);
        }

        for entry in WalkDir::new(&self.corpus_dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if path.is_file() && path.file_name() == Some(std::ffi::OsStr::new(TEST_FILE)) {
                match self.load_test_case(path) {
                    Ok(test_case) => tests.push(test_case),
                    Err(e) => {
                        eprintln!("Warning: Failed to load test case {:?}: {}", path, e);
                    }
                }
            }
        }

        // Stable sort keeps directory order within a priority
        tests.sort_by_key(|t| t.metadata.priority);

        Ok(tests)
    }

    /// Load a case by its `category/name` identifier
    pub fn load_by_id(&self, id: &str) -> Result<TestCase> {
        self.load_test_case(&self.corpus_dir.join(id).join(TEST_FILE))
    }

    /// Load a specific test case
    pub fn load_test_case(&self, path: &Path) -> Result<TestCase> {
        let content = fs::read_to_string(path)?;
        let mut test_case: TestCase = serde_json::from_str(&content)?;

        let test_dir = path
            .parent()
            .ok_or_else(|| GoldenError::CorpusError(format!("{:?} has no parent directory", path)))?;
        test_case.name = file_name(test_dir);
        test_case.category = test_dir.parent().map(file_name).unwrap_or_default();
        test_case.path = path.to_path_buf();

        if test_case.expected.is_some() && test_case.expected_error.is_some() {
            return Err(GoldenError::CorpusError(format!(
                "{}: `expected` and `expected_error` are mutually exclusive",
                test_case.id()
            )));
        }

        Ok(test_case)
    }

    /// Write a test case back to the file it was loaded from
    pub fn save_test_case(&self, test_case: &TestCase) -> Result<()> {
        let path = if test_case.path.as_os_str().is_empty() {
            self.corpus_dir.join(test_case.id()).join(TEST_FILE)
        } else {
            test_case.path.clone()
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut content = serde_json::to_string_pretty(test_case)?;
        content.push('\n');
        fs::write(path, content)?;
        Ok(())
    }

    /// Filter tests by id prefix (`*` matches everything)
    pub fn filter_by_pattern(&self, tests: Vec<TestCase>, pattern: &str) -> Vec<TestCase> {
        let prefix = pattern.trim_end_matches('*').trim_end_matches('/');
        if prefix.is_empty() {
            return tests;
        }

        tests
            .into_iter()
            .filter(|t| t.category == prefix || t.id().starts_with(prefix))
            .collect()
    }

    /// Filter tests by tags
    pub fn filter_by_tags(&self, tests: Vec<TestCase>, tags: &[String]) -> Vec<TestCase> {
        if tags.is_empty() {
            return tests;
        }

        tests
            .into_iter()
            .filter(|t| tags.iter().any(|tag| t.metadata.tags.contains(tag)))
            .collect()
    }

    /// Get enabled tests only
    pub fn filter_enabled(&self, tests: Vec<TestCase>) -> Vec<TestCase> {
        tests.into_iter().filter(|t| t.metadata.enabled).collect()
    }

    /// List all test categories
    pub fn list_categories(&self) -> Result<Vec<String>> {
        let mut categories = Vec::new();

        if !self.corpus_dir.exists() {
            return Ok(categories);
        }

        for entry in fs::read_dir(&self.corpus_dir)? {
            let path = entry?.path();

            if path.is_dir() {
                categories.push(file_name(&path));
            }
        }

        categories.sort();
        Ok(categories)
    }

    /// Get statistics about the corpus
    pub fn get_statistics(&self) -> Result<CorpusStatistics> {
        let tests = self.discover_tests()?;

        let mut stats = CorpusStatistics {
            total_tests: tests.len(),
            ..Default::default()
        };

        for test in tests {
            if test.metadata.enabled {
                stats.enabled_tests += 1;
            } else {
                stats.disabled_tests += 1;
            }

            if test.expected_error.is_some() {
                stats.error_tests += 1;
            }

            *stats.tests_by_category.entry(test.category).or_insert(0) += 1;

            for tag in test.metadata.tags {
                *stats.tests_by_tag.entry(tag).or_insert(0) += 1;
            }
        }

        Ok(stats)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

/// Statistics about the test corpus
#[derive(Debug, Default)]
pub struct CorpusStatistics {
    pub total_tests: usize,
    pub enabled_tests: usize,
    pub disabled_tests: usize,
    /// Cases expecting a failure instead of a record
    pub error_tests: usize,
    pub tests_by_category: HashMap<String, usize>,
    pub tests_by_tag: HashMap<String, usize>,
}

impl CorpusStatistics {
    /// Print statistics to stdout
    pub fn print(&self) {
        println!("=== Corpus Statistics ===");
        println!("Total tests: {}", self.total_tests);
        println!("Enabled: {}", self.enabled_tests);
        println!("Disabled: {}", self.disabled_tests);
        println!("Expecting errors: {}", self.error_tests);

        if !self.tests_by_category.is_empty() {
            println!("\nTests by category:");
            let mut categories: Vec<_> = self.tests_by_category.iter().collect();
            categories.sort_by_key(|(k, _)| k.as_str());
            for (category, count) in categories {
                println!("  {}: {}", category, count);
            }
        }

        if !self.tests_by_tag.is_empty() {
            println!("\nTests by tag:");
            let mut tags: Vec<_> = self.tests_by_tag.iter().collect();
            tags.sort_by_key(|(k, _)| k.as_str());
            for (tag, count) in tags {
                println!("  {}: {}", tag, count);
            }
        }
    }
}
