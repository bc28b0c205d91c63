// Outcome records and the result/artifact sinks
//
// Every observed check becomes exactly one Outcome handed to a
// ResultSink. Sinks own their sequence counters (no process globals);
// the engine holds them by mutable reference and never reads records
// back.

use crate::error::Result;
use chrono::Local;
use crudprobe_driver::PageDriver;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Verdict of one check.
///
/// INFO marks observations the engine declines to judge: absent
/// features, ambiguous post-save states, captured messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Pass,
    Fail,
    Info,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Pass => write!(f, "PASS"),
            Status::Fail => write!(f, "FAIL"),
            Status::Info => write!(f, "INFO"),
        }
    }
}

/// One row of the final report.
///
/// `step` and `timestamp` are assigned by the sink at record time.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub step: u64,
    pub timestamp: String,
    pub module: String,
    pub category: String,
    pub action: String,
    pub expected: String,
    pub actual: String,
    pub status: Status,
    pub detail: String,
    pub artifact: String,
}

impl Outcome {
    pub fn new(module: &str, category: &str, action: &str, status: Status, detail: &str) -> Self {
        Self {
            step: 0,
            timestamp: String::new(),
            module: module.to_string(),
            category: category.to_string(),
            action: action.to_string(),
            expected: String::new(),
            actual: String::new(),
            status,
            detail: detail.to_string(),
            artifact: String::new(),
        }
    }

    pub fn expected(mut self, text: &str) -> Self {
        self.expected = text.to_string();
        self
    }

    pub fn actual(mut self, text: &str) -> Self {
        self.actual = text.to_string();
        self
    }

    pub fn artifact(mut self, path: &str) -> Self {
        self.artifact = path.to_string();
        self
    }
}

/// Accumulates outcome records for the run.
pub trait ResultSink: Send {
    /// Takes ownership of one record, assigning its step number and
    /// timestamp, and narrates it.
    fn record(&mut self, outcome: Outcome);

    /// (passed, failed, info) counts so far.
    fn counts(&self) -> (usize, usize, usize);

    /// Writes the tabular report to `path`.
    fn export(&self, path: &Path) -> Result<()>;
}

/// Names screenshot artifacts for the run.
///
/// Failures on the capture path must never fail the calling check, so
/// the engine-facing API degrades to an empty path string.
pub trait ArtifactSink: Send {
    /// Reserves the next numbered artifact path for `label`.
    fn reserve(&mut self, label: &str) -> PathBuf;

    /// Number of artifacts reserved so far.
    fn count(&self) -> u64;
}

/// Captures a screenshot through the driver; returns the stored path,
/// or an empty string when the driver refuses.
pub async fn capture<D: PageDriver>(
    driver: &D,
    artifacts: &mut dyn ArtifactSink,
    label: &str,
) -> String {
    let path = artifacts.reserve(label);
    match driver.screenshot(&path).await {
        Ok(()) => path.to_string_lossy().into_owned(),
        Err(e) => {
            tracing::debug!("screenshot '{}' failed: {}", label, e);
            String::new()
        }
    }
}

/// Console-narrating, CSV-exporting result sink.
pub struct CsvReporter {
    rows: Vec<Outcome>,
    step: u64,
}

impl CsvReporter {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            step: 0,
        }
    }

    /// All recorded rows, in record order (used by tests and the run
    /// summary; target components never read these back).
    pub fn rows(&self) -> &[Outcome] {
        &self.rows
    }

    /// Machine-readable sibling of the CSV export.
    pub fn export_json(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(&self.rows)?;
        std::fs::write(path, raw)?;
        Ok(())
    }
}

impl Default for CsvReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultSink for CsvReporter {
    fn record(&mut self, mut outcome: Outcome) {
        self.step += 1;
        outcome.step = self.step;
        outcome.timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let icon = match outcome.status {
            Status::Pass => "\u{2713}",
            Status::Fail => "\u{2717}",
            Status::Info => "\u{2139}",
        };
        let clipped: String = outcome.detail.chars().take(80).collect();
        println!(
            "    {} [{}] ({}) {}: {}",
            icon, outcome.status, outcome.category, outcome.action, clipped
        );
        tracing::debug!(
            module = %outcome.module,
            status = %outcome.status,
            action = %outcome.action,
            "recorded outcome"
        );
        self.rows.push(outcome);
    }

    fn counts(&self) -> (usize, usize, usize) {
        let passed = self.rows.iter().filter(|r| r.status == Status::Pass).count();
        let failed = self.rows.iter().filter(|r| r.status == Status::Fail).count();
        let info = self.rows.iter().filter(|r| r.status == Status::Info).count();
        (passed, failed, info)
    }

    fn export(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record([
            "Step",
            "Timestamp",
            "Module",
            "Category",
            "Action",
            "Expected",
            "Actual",
            "Status",
            "Details",
            "Screenshot",
        ])?;
        for row in &self.rows {
            writer.write_record([
                row.step.to_string().as_str(),
                &row.timestamp,
                &row.module,
                &row.category,
                &row.action,
                &row.expected,
                &row.actual,
                &row.status.to_string(),
                &row.detail,
                &row.artifact,
            ])?;
        }
        writer.flush().map_err(crate::Error::from)?;
        Ok(())
    }
}

/// Numbered screenshot paths under a fixed directory.
pub struct ScreenshotStore {
    dir: PathBuf,
    shot: u64,
}

impl ScreenshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            shot: 0,
        }
    }
}

impl ArtifactSink for ScreenshotStore {
    fn reserve(&mut self, label: &str) -> PathBuf {
        self.shot += 1;
        let stamp = Local::now().format("%H%M%S");
        let safe: String = label
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        self.dir.join(format!("{:03}_{}_{}.png", self.shot, safe, stamp))
    }

    fn count(&self) -> u64 {
        self.shot
    }
}
