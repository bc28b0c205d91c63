// Run configuration: target coordinates, module table, timing knobs
//
// Configuration is data, not behavior. The module descriptor table
// drives the outer loop once per run; the engine never mutates it.

use crate::error::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One functional area of the target application and the ordered label
/// keywords the navigation resolver tries for it.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleSpec {
    pub name: String,
    pub keywords: Vec<String>,
}

impl ModuleSpec {
    pub fn new(name: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Timing knobs, in milliseconds on the wire, as `Duration`s in code.
///
/// Every wait in the engine is a bounded sleep or a bounded poll built
/// from these. Tests run with [`Timing::instant`] so nothing actually
/// sleeps.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// Short settle after clicks and submissions (default 2s).
    pub settle_short_ms: u64,
    /// Long settle after reloads and context switches (default 5s).
    pub settle_long_ms: u64,
    /// Cap on element-presence polls (default 10s).
    pub wait_timeout_ms: u64,
    /// Poll interval inside presence waits (default 250ms).
    pub poll_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            settle_short_ms: 2_000,
            settle_long_ms: 5_000,
            wait_timeout_ms: 10_000,
            poll_ms: 250,
        }
    }
}

impl Timing {
    /// All-zero timing for tests; polls still terminate because the
    /// deadline is checked before each sleep.
    pub fn instant() -> Self {
        Self {
            settle_short_ms: 0,
            settle_long_ms: 0,
            wait_timeout_ms: 0,
            poll_ms: 0,
        }
    }

    pub fn settle_short(&self) -> Duration {
        Duration::from_millis(self.settle_short_ms)
    }

    pub fn settle_long(&self) -> Duration {
        Duration::from_millis(self.settle_long_ms)
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }

    pub fn poll(&self) -> Duration {
        Duration::from_millis(self.poll_ms)
    }
}

/// Full run configuration, loadable from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Login page URL.
    pub login_url: String,
    /// Credential: account email.
    pub email: String,
    /// Credential: account password.
    pub password: String,
    /// Substring of the post-login URL that marks a successful login.
    #[serde(default = "default_success_hint")]
    pub success_url_hint: String,
    /// Where the CSV report is written at end of run.
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,
    /// Directory receiving numbered screenshots.
    #[serde(default = "default_screenshot_dir")]
    pub screenshot_dir: PathBuf,
    /// Modules to exercise, in order.
    #[serde(default = "default_modules")]
    pub modules: Vec<ModuleSpec>,
    #[serde(default)]
    pub timing: Timing,
}

fn default_success_hint() -> String {
    "dashboard".to_string()
}

fn default_report_path() -> PathBuf {
    PathBuf::from("crudprobe_report.csv")
}

fn default_screenshot_dir() -> PathBuf {
    PathBuf::from("screenshots")
}

/// The stock CRM module suite exercised when the config names none.
pub fn default_modules() -> Vec<ModuleSpec> {
    vec![
        ModuleSpec::new("Dashboard", &["Dashboard"]),
        ModuleSpec::new("Calendar", &["Calendar", "Calender"]),
        ModuleSpec::new("Tasks", &["Task", "Tasks"]),
        ModuleSpec::new("Matters", &["Matter", "Matters", "Case"]),
        ModuleSpec::new("Contacts", &["Contact", "Contacts", "Client"]),
        ModuleSpec::new("Activities", &["Activities", "Activity"]),
        ModuleSpec::new("Billing", &["Billing", "Bill", "Invoice"]),
        ModuleSpec::new("Litigation Funding", &["Litigation", "Funding"]),
        ModuleSpec::new("Documents", &["Document", "Documents", "File"]),
        ModuleSpec::new("Time Entries", &["Time", "Time Entry", "Timesheet"]),
        ModuleSpec::new(
            "Expenses",
            &["Expense", "Expenses", "Expense List", "New Expense"],
        ),
        ModuleSpec::new("Reports", &["Report", "Reports"]),
        ModuleSpec::new("Notes", &["Note", "Notes"]),
        ModuleSpec::new("Emails", &["Email", "Emails", "Mailbox", "Compose"]),
        ModuleSpec::new(
            "Settings",
            &["Settings", "Setting", "Configuration", "Profile"],
        ),
        ModuleSpec::new("Accounts", &["Accounts", "Account", "User", "Users"]),
        ModuleSpec::new(
            "Import Data",
            &["Import", "Import Data", "Data Import", "Upload", "CSV", "Excel"],
        ),
    ]
}

impl RunConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Reads and parses a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }
}
