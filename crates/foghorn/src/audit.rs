//! Prediction audit trail
//!
//! Append-only JSONL log of every prediction served by the ML stand-in.
//! One record per line; readers skip lines that fail to parse so a torn
//! write never poisons the whole file.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Environment variable overriding the default audit log location
pub const AUDIT_LOG_ENV: &str = "BLUECARB_AUDIT_LOG";

/// One served prediction: what was asked, what was answered, and when
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
  pub timestamp: DateTime<Utc>,
  pub endpoint: String,
  pub payload: serde_json::Value,
  pub response: serde_json::Value,
}

// Core API
// ========

struct AuditLogInner {
  path: PathBuf,
}

impl AuditLogInner {
  fn append(&mut self, record: &PredictionRecord) -> Result<()> {
    let line = serde_json::to_string(record).context("Failed to serialize prediction record")?;
    let mut file = OpenOptions::new()
      .create(true)
      .append(true)
      .open(&self.path)
      .with_context(|| format!("Failed to open audit log at {}", self.path.display()))?;
    writeln!(file, "{line}")?;
    file.flush()?;
    Ok(())
  }

  fn read_all(&self) -> Result<Vec<PredictionRecord>> {
    if !self.path.exists() {
      return Ok(Vec::new());
    }
    let file = File::open(&self.path)
      .with_context(|| format!("Failed to open audit log at {}", self.path.display()))?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();
    for line in reader.lines() {
      let line = line?;
      if line.trim().is_empty() {
        continue;
      }
      // Torn or hand-edited lines are skipped, not fatal
      if let Ok(record) = serde_json::from_str::<PredictionRecord>(&line) {
        records.push(record);
      }
    }
    Ok(records)
  }
}

/// Thread-safe handle to an append-only prediction log.
///
/// Cloning is cheap; clones share the same underlying file.
#[derive(Clone)]
pub struct AuditLog {
  inner: Arc<Mutex<AuditLogInner>>,
}

impl AuditLog {
  /// Open the audit log at `path`, creating parent directories as needed.
  /// The file itself is created lazily on the first append.
  pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    if let Some(parent) = path.parent() {
      if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)
          .with_context(|| format!("Failed to create audit log directory {}", parent.display()))?;
      }
    }
    Ok(Self { inner: Arc::new(Mutex::new(AuditLogInner { path })) })
  }

  /// Open the log at the default location, honoring `BLUECARB_AUDIT_LOG`
  pub fn open_default() -> Result<Self> {
    Self::open(default_audit_path())
  }

  /// Append one record. The timestamp is assigned here, at write time.
  pub async fn record(
    &self,
    endpoint: &str,
    payload: serde_json::Value,
    response: serde_json::Value,
  ) -> Result<()> {
    let record = PredictionRecord {
      timestamp: Utc::now(),
      endpoint: endpoint.to_string(),
      payload,
      response,
    };
    self.inner.lock().await.append(&record)
  }

  /// Read records in file order, optionally filtered by endpoint and
  /// truncated to the most recent `limit` entries.
  pub async fn tail(
    &self,
    limit: Option<usize>,
    endpoint: Option<&str>,
  ) -> Result<Vec<PredictionRecord>> {
    let inner = self.inner.lock().await;
    let mut records = inner.read_all()?;
    if let Some(endpoint) = endpoint {
      records.retain(|record| record.endpoint == endpoint);
    }
    if let Some(limit) = limit {
      if records.len() > limit {
        records.drain(..records.len() - limit);
      }
    }
    Ok(records)
  }

  /// Location of the underlying file
  pub async fn path(&self) -> PathBuf {
    self.inner.lock().await.path.clone()
  }
}

/// Default on-disk location: `~/.bluecarb/predictions.log.jsonl`, or
/// wherever `BLUECARB_AUDIT_LOG` points.
pub fn default_audit_path() -> PathBuf {
  if let Ok(path) = std::env::var(AUDIT_LOG_ENV) {
    return PathBuf::from(path);
  }
  dirs::home_dir()
    .unwrap_or_else(|| PathBuf::from("/tmp"))
    .join(".bluecarb")
    .join("predictions.log.jsonl")
}
