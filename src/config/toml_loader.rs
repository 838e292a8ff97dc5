//! TOML configuration file reading and parsing.
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Deserialize TOML text into `T`.
///
/// # Errors
///
/// Returns an error if the text is not valid TOML for `T`.
pub fn parse<T: DeserializeOwned>(content: &str) -> Result<T> {
    toml::from_str(content).context("Failed to parse TOML config")
}

/// Read a config file, returning `None` when it does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn read_optional(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    std::fs::read_to_string(path)
        .map(Some)
        .with_context(|| format!("Failed to read config file: {}", path.display()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn read_optional_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_optional(&dir.path().join("absent.toml")).unwrap().is_none());
    }

    #[test]
    fn parse_reports_malformed_toml() {
        let result: Result<HashMap<String, String>> = parse("not = [valid");
        assert!(result.is_err());
    }
}
