use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, SecondsFormat};
use coresuite_core::IntegrationLog;
use coresuite_domain::{ErrorReport, IntegrationError, LogLevel, LogRecord, Result};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use crate::errors::InfraError;

/// Appends one JSON object per line to the integration log file.
///
/// Writes never fail from the caller's point of view: I/O and serialization
/// problems are reported through `tracing` and the record is dropped.
pub struct IntegrationLogger {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl IntegrationLogger {
    /// Logger appending to `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, level: LogLevel, message: &str, context: Map<String, Value>) {
        mirror(level, message, &context);

        let record = LogRecord {
            timestamp: Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
            level,
            message: message.to_string(),
            context,
        };

        if let Err(err) = self.append(&record) {
            warn!(path = %self.path.display(), error = %err, "integration log write failed");
        }
    }

    fn append(&self, record: &LogRecord) -> Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let _guard = self.write_lock.lock();
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| IntegrationError::from(InfraError::from(e)))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| IntegrationError::from(InfraError::from(e)))?;
        file.write_all(line.as_bytes()).map_err(|e| IntegrationError::from(InfraError::from(e)))
    }
}

impl IntegrationLog for IntegrationLogger {
    fn info(&self, message: &str, context: Map<String, Value>) {
        self.write(LogLevel::Info, message, context);
    }

    fn error(&self, message: &str, context: Map<String, Value>) {
        self.write(LogLevel::Error, message, context);
    }

    fn exception(&self, report: &ErrorReport, mut context: Map<String, Value>) {
        let exception = serde_json::to_value(report).unwrap_or(Value::Null);
        context.insert("exception".into(), exception);
        self.write(LogLevel::Error, &report.message, context);
    }
}

fn mirror(level: LogLevel, message: &str, context: &Map<String, Value>) {
    let context = Value::Object(context.clone());
    match level {
        LogLevel::Info => info!(target: "integrations", %context, "{message}"),
        LogLevel::Error => error!(target: "integrations", %context, "{message}"),
    }
}
