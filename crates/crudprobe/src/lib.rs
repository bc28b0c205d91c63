//! Heuristic CRUD prober for server-rendered admin applications.
//!
//! `crudprobe` exercises create/read/update/delete flows in a web
//! application it has never seen, using weak textual signals (link
//! labels, button captions, input names) instead of application
//! knowledge. State changes are verified with synthetic markers:
//! unique strings injected through forms and then searched for in the
//! rendered page. Every observation becomes a row in a CSV report.
//!
//! The engine drives any [`crudprobe_driver::PageDriver`]
//! implementation; the bundled `fake` driver backs the test suite.
//!
//! # Example
//!
//! ```ignore
//! use crudprobe::{RunConfig, run_with_defaults};
//!
//! # async fn example(driver: &impl crudprobe_driver::PageDriver) -> crudprobe::Result<()> {
//! let config = RunConfig::load(std::path::Path::new("crudprobe.toml"))?;
//! let summary = run_with_defaults(driver, &config).await?;
//! println!("passed: {}, failed: {}", summary.passed, summary.failed);
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod config;
pub mod error;
pub mod filler;
pub mod marker;
pub mod nav;
pub mod orchestrator;
pub mod outcome;
pub mod resilience;
pub mod run;

pub use config::{ModuleSpec, RunConfig, Timing, default_modules};
pub use error::{Error, Result};
pub use orchestrator::{PassCtx, PassState, run_module_pass};
pub use outcome::{ArtifactSink, CsvReporter, Outcome, ResultSink, ScreenshotStore, Status};
pub use run::{RunSummary, login, run_suite, run_with_defaults};
