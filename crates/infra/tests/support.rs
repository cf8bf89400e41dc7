//! Shared helpers for `coresuite-infra` integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use coresuite_core::IntegrationLog;
use coresuite_domain::LogRecord;
use coresuite_infra::IntegrationLogger;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Integration log file living in a temporary directory.
pub struct TestLog {
    pub logger: Arc<IntegrationLogger>,
    path: PathBuf,
    _dir: TempDir,
}

impl TestLog {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("storage/logs/integrations.log");
        Self { logger: Arc::new(IntegrationLogger::new(&path)), path, _dir: dir }
    }

    pub fn sink(&self) -> Arc<dyn IntegrationLog> {
        self.logger.clone()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every record written so far; empty when the file does not exist.
    pub fn records(&self) -> Vec<LogRecord> {
        std::fs::read_to_string(&self.path)
            .unwrap_or_default()
            .lines()
            .map(|line| serde_json::from_str(line).expect("log line should be JSON"))
            .collect()
    }
}

/// TCP server that drops the first `failures` connections without answering
/// and replies `200 {"ok":true}` afterwards.
pub struct FlakyServer {
    pub url: String,
    connections: Arc<AtomicUsize>,
}

impl FlakyServer {
    pub async fn start(failures: usize) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        let connections = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&connections);

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let seen = counter.fetch_add(1, Ordering::SeqCst);
                let mut buf = vec![0u8; 8192];
                let _ = socket.read(&mut buf).await;
                if seen < failures {
                    drop(socket);
                    continue;
                }

                let body = r#"{"ok":true}"#;
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self { url: format!("http://{addr}"), connections }
    }

    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}
