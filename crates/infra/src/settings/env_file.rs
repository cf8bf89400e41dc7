//! `.env` file writer
//!
//! Upserts `KEY=value` lines while leaving every other line, and the file's
//! line-ending convention, untouched.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use coresuite_core::ConfigStore;
use coresuite_domain::{IntegrationError, Result};
use regex::{NoExpand, Regex};
use tracing::debug;

use crate::errors::InfraError;

#[cfg(windows)]
const PLATFORM_EOL: &str = "\r\n";
#[cfg(not(windows))]
const PLATFORM_EOL: &str = "\n";

const QUOTE_TRIGGERS: [char; 7] = [' ', '\t', '#', '"', '\'', '\r', '\n'];

/// [`ConfigStore`] backed by a dotenv-style file.
#[derive(Debug, Clone)]
pub struct EnvFileStore {
    path: PathBuf,
}

impl EnvFileStore {
    /// Store backed by the `.env` file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

impl ConfigStore for EnvFileStore {
    fn is_writable(&self) -> bool {
        if self.path.is_file() {
            return OpenOptions::new().append(true).open(&self.path).is_ok();
        }

        fs::metadata(self.directory()).is_ok_and(|meta| meta.is_dir() && !meta.permissions().readonly())
    }

    fn set_values(&self, values: &[(&str, &str)]) -> Result<()> {
        if values.is_empty() {
            return Ok(());
        }

        let directory = self.directory();
        if !directory.is_dir() {
            return Err(IntegrationError::Storage(format!(
                "directory {} does not exist",
                directory.display()
            )));
        }

        let mut contents = if self.path.is_file() {
            fs::read_to_string(&self.path).map_err(|e| IntegrationError::from(InfraError::from(e)))?
        } else {
            String::new()
        };

        let eol = detect_line_ending(&contents);
        for (key, value) in values {
            contents = upsert_line(&contents, key, value, eol)?;
        }
        if !contents.ends_with(eol) {
            contents.push_str(eol);
        }

        fs::write(&self.path, contents).map_err(|e| IntegrationError::from(InfraError::from(e)))?;
        debug!(path = %self.path.display(), keys = values.len(), "env file updated");
        Ok(())
    }
}

fn upsert_line(contents: &str, key: &str, value: &str, eol: &str) -> Result<String> {
    let line = format!("{key}={}", quote_value(value));
    let pattern = Regex::new(&format!(r"(?mR)^{}[ \t]*=.*$", regex::escape(key)))
        .map_err(|e| IntegrationError::Internal(format!("invalid env key pattern: {e}")))?;

    if pattern.is_match(contents) {
        return Ok(pattern.replace_all(contents, NoExpand(&line)).into_owned());
    }

    let mut updated = contents.trim_end().to_string();
    if !updated.is_empty() {
        updated.push_str(eol);
    }
    updated.push_str(&line);
    updated.push_str(eol);
    Ok(updated)
}

fn quote_value(value: &str) -> String {
    if value.is_empty() {
        return "\"\"".to_string();
    }
    if !value.contains(QUOTE_TRIGGERS) {
        return value.to_string();
    }
    if !value.contains('"') {
        return format!("\"{value}\"");
    }
    if !value.contains('\'') {
        return format!("'{value}'");
    }

    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

fn detect_line_ending(contents: &str) -> &'static str {
    if contents.is_empty() {
        PLATFORM_EOL
    } else if contents.contains("\r\n") {
        "\r\n"
    } else if contents.contains('\r') {
        "\r"
    } else {
        "\n"
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn store_with(contents: &str) -> (TempDir, EnvFileStore) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, contents).unwrap();
        (dir, EnvFileStore::new(path))
    }

    fn read(store: &EnvFileStore) -> String {
        fs::read_to_string(store.path()).unwrap()
    }

    #[test]
    fn replaces_existing_key_and_keeps_other_lines() {
        let (_dir, store) = store_with("APP_ENV=prod\nCORESUITE_API_KEY = old\n# comment\n");

        store.set_values(&[("CORESUITE_API_KEY", "abc123")]).unwrap();

        assert_eq!(read(&store), "APP_ENV=prod\nCORESUITE_API_KEY=abc123\n# comment\n");
    }

    #[test]
    fn appends_missing_key_after_trimming_trailing_blank_lines() {
        let (_dir, store) = store_with("APP_ENV=prod\n\n\n");

        store.set_values(&[("NEW_KEY", "v")]).unwrap();

        assert_eq!(read(&store), "APP_ENV=prod\nNEW_KEY=v\n");
    }

    #[test]
    fn preserves_crlf_line_endings() {
        let (_dir, store) = store_with("A=1\r\nCORESUITE_API_KEY=old\r\nB=2");

        store.set_values(&[("CORESUITE_API_KEY", "new"), ("C", "3")]).unwrap();

        assert_eq!(read(&store), "A=1\r\nCORESUITE_API_KEY=new\r\nB=2\r\nC=3\r\n");
    }

    #[test]
    fn similar_key_prefix_is_not_replaced() {
        let (_dir, store) = store_with("CORESUITE_API_KEY_OLD=keep\n");

        store.set_values(&[("CORESUITE_API_KEY", "x")]).unwrap();

        assert_eq!(read(&store), "CORESUITE_API_KEY_OLD=keep\nCORESUITE_API_KEY=x\n");
    }

    #[test]
    fn replacement_value_is_literal() {
        let (_dir, store) = store_with("KEY=old\n");

        store.set_values(&[("KEY", "$1${0}")]).unwrap();

        assert_eq!(read(&store), "KEY=$1${0}\n");
    }

    #[test]
    fn creates_missing_file_in_existing_directory() {
        let dir = TempDir::new().unwrap();
        let store = EnvFileStore::new(dir.path().join(".env"));

        assert!(store.is_writable());
        store.set_values(&[("KEY", "value")]).unwrap();

        assert_eq!(read(&store), format!("KEY=value{PLATFORM_EOL}"));
    }

    #[test]
    fn missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let store = EnvFileStore::new(dir.path().join("missing/.env"));

        assert!(!store.is_writable());
        let err = store.set_values(&[("KEY", "value")]).unwrap_err();
        assert_eq!(err.code(), "storage");
    }

    #[test]
    fn quoting_rules() {
        assert_eq!(quote_value(""), "\"\"");
        assert_eq!(quote_value("plain"), "plain");
        assert_eq!(quote_value("two words"), "\"two words\"");
        assert_eq!(quote_value("say \"hi\""), "'say \"hi\"'");
        assert_eq!(quote_value("it's \"x\""), "\"it's \\\"x\\\"\"");
        assert_eq!(quote_value("a#b"), "\"a#b\"");
    }

    #[test]
    fn line_ending_detection() {
        assert_eq!(detect_line_ending("a\r\nb"), "\r\n");
        assert_eq!(detect_line_ending("a\rb"), "\r");
        assert_eq!(detect_line_ending("a\nb"), "\n");
        assert_eq!(detect_line_ending(""), PLATFORM_EOL);
    }
}
