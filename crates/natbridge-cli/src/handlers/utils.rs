//! Shared utilities for command handlers

use crate::error::{Error, ErrorContext, Result};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Where an event is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// `-` names standard input; anything else is a file path
    pub fn from_path(path: &Path) -> Self {
        if path == Path::new("-") {
            InputSource::Stdin
        } else {
            InputSource::File(path.to_path_buf())
        }
    }

    /// Resolve the positional inputs, defaulting to standard input
    pub fn from_args(paths: &[PathBuf]) -> Vec<Self> {
        if paths.is_empty() {
            vec![InputSource::Stdin]
        } else {
            paths.iter().map(|p| Self::from_path(p)).collect()
        }
    }

    /// Name used in messages and log fields
    pub fn label(&self) -> String {
        match self {
            InputSource::Stdin => "<stdin>".to_string(),
            InputSource::File(path) => path.display().to_string(),
        }
    }

    /// Read the raw event bytes
    pub fn read(&self) -> Result<Vec<u8>> {
        match self {
            InputSource::Stdin => {
                let mut buffer = Vec::new();
                io::stdin()
                    .read_to_end(&mut buffer)
                    .with_context(|| "Failed to read standard input".to_string())?;
                Ok(buffer)
            }
            InputSource::File(path) => {
                if !path.exists() {
                    return Err(Error::FileNotFound { path: path.clone() });
                }
                fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_args() {
        assert_eq!(InputSource::from_args(&[]), vec![InputSource::Stdin]);
        assert_eq!(
            InputSource::from_args(&[PathBuf::from("-"), PathBuf::from("a.json")]),
            vec![InputSource::Stdin, InputSource::File(PathBuf::from("a.json"))]
        );
        assert_eq!(InputSource::Stdin.label(), "<stdin>");
    }

    #[test]
    fn test_read_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("event.json");
        fs::write(&path, br#"{"_type":"aws"}"#).unwrap();

        let bytes = InputSource::File(path).read().unwrap();
        assert_eq!(bytes, br#"{"_type":"aws"}"#.to_vec());
    }

    #[test]
    fn test_missing_file() {
        let err = InputSource::File(PathBuf::from("/nonexistent/event.json"))
            .read()
            .unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }
}
