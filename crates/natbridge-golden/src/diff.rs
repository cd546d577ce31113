//! Diff engine for comparing translated records with their expectations

use colored::*;
use serde_json::Value;
use similar::{ChangeTag, TextDiff};
use std::collections::BTreeSet;

/// Options for diff comparison
#[derive(Debug, Clone)]
pub struct DiffOptions {
    /// Whether to use colored output
    pub colored: bool,

    /// Context lines to show around changes
    pub context_lines: usize,

    /// Whether to show full diff or just changes with context
    pub full_diff: bool,

    /// Maximum diff lines to show (0 = unlimited)
    pub max_diff_lines: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            colored: true,
            context_lines: 3,
            full_diff: false,
            max_diff_lines: 100,
        }
    }
}

/// Result of a diff operation
#[derive(Debug)]
pub struct DiffResult {
    /// Whether the values match
    pub matches: bool,

    /// Human-readable diff output
    pub diff_output: String,

    /// Summary of changes
    pub summary: DiffSummary,
}

/// Summary of diff changes
#[derive(Debug, Default)]
pub struct DiffSummary {
    pub added: usize,
    pub removed: usize,

    /// Paths that differ
    pub differing_paths: Vec<String>,
}

/// Engine for comparing JSON values
///
/// Comparison is exact: every key must be present on both sides with an
/// identical value, and arrays must agree element by element in order.
pub struct DiffEngine {
    options: DiffOptions,
}

impl DiffEngine {
    pub fn new(options: DiffOptions) -> Self {
        Self { options }
    }

    /// Compare two JSON values
    pub fn compare(&self, expected: &Value, actual: &Value) -> DiffResult {
        if expected == actual {
            return DiffResult {
                matches: true,
                diff_output: String::new(),
                summary: DiffSummary::default(),
            };
        }

        let expected_str = pretty_string(expected);
        let actual_str = pretty_string(actual);
        let text_diff = TextDiff::from_lines(&expected_str, &actual_str);

        let mut summary = DiffSummary::default();
        collect_diff_paths(expected, actual, String::new(), &mut summary.differing_paths);
        for change in text_diff.iter_all_changes() {
            match change.tag() {
                ChangeTag::Delete => summary.removed += 1,
                ChangeTag::Insert => summary.added += 1,
                ChangeTag::Equal => {}
            }
        }

        DiffResult {
            matches: false,
            diff_output: self.render(&text_diff),
            summary,
        }
    }

    fn render(&self, text_diff: &TextDiff<'_, '_, '_, str>) -> String {
        let mut output = String::new();
        output.push_str(&self.paint("=== Diff (-expected +actual) ===\n", |s| s.bold()));

        let mut line_count = 0;

        for group in text_diff.grouped_ops(self.options.context_lines) {
            for op in group {
                for change in text_diff.iter_changes(&op) {
                    if self.options.max_diff_lines > 0 && line_count >= self.options.max_diff_lines {
                        output.push_str("... (diff truncated) ...\n");
                        return output;
                    }

                    let line = match change.tag() {
                        ChangeTag::Delete => self.paint(&format!("-{}", change), |s| s.red()),
                        ChangeTag::Insert => self.paint(&format!("+{}", change), |s| s.green()),
                        ChangeTag::Equal => format!(" {}", change),
                    };
                    output.push_str(&line);
                    line_count += 1;
                }
            }
        }

        if self.options.full_diff {
            output.push_str(&format!("\nExpected:\n{}\nActual:\n{}\n", text_diff.old_slices().concat(), text_diff.new_slices().concat()));
        }

        output
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> String {
        if self.options.colored {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

/// Pretty JSON with a trailing newline, as compared line by line
pub fn pretty_string(value: &Value) -> String {
    let mut text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    text.push('\n');
    text
}

/// Recursively collect paths that differ
fn collect_diff_paths(expected: &Value, actual: &Value, path: String, paths: &mut Vec<String>) {
    match (expected, actual) {
        (Value::Object(exp), Value::Object(act)) => {
            let all_keys: BTreeSet<_> = exp.keys().chain(act.keys()).collect();

            for key in all_keys {
                let new_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };

                match (exp.get(key), act.get(key)) {
                    (Some(exp_val), Some(act_val)) if exp_val != act_val => {
                        collect_diff_paths(exp_val, act_val, new_path, paths)
                    }
                    (Some(_), None) => paths.push(format!("{} (missing in actual)", new_path)),
                    (None, Some(_)) => paths.push(format!("{} (extra in actual)", new_path)),
                    _ => {}
                }
            }
        }
        (Value::Array(exp), Value::Array(act)) => {
            for (i, (exp_val, act_val)) in exp.iter().zip(act.iter()).enumerate() {
                if exp_val != act_val {
                    collect_diff_paths(exp_val, act_val, format!("{}[{}]", path, i), paths);
                }
            }

            if exp.len() != act.len() {
                paths.push(format!(
                    "{} (array length mismatch: {} vs {})",
                    path,
                    exp.len(),
                    act.len()
                ));
            }
        }
        _ => paths.push(path),
    }
}

/// Remove dotted paths from a value; arrays apply the rest of the path to
/// every element
pub fn apply_ignores(value: &mut Value, ignore_fields: &[String]) {
    for field_path in ignore_fields {
        let parts: Vec<&str> = field_path.split('.').filter(|s| !s.is_empty()).collect();
        remove_field_recursive(value, &parts);
    }
}

fn remove_field_recursive(value: &mut Value, path_parts: &[&str]) {
    let Some((first, rest)) = path_parts.split_first() else {
        return;
    };

    match value {
        Value::Object(map) => {
            if rest.is_empty() {
                map.remove(*first);
            } else if let Some(next_value) = map.get_mut(*first) {
                remove_field_recursive(next_value, rest);
            }
        }
        Value::Array(arr) => {
            for item in arr {
                remove_field_recursive(item, path_parts);
            }
        }
        _ => {}
    }
}
