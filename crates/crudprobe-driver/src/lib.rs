//! crudprobe-driver: the abstract page-driver capability consumed by
//! the crudprobe engine.
//!
//! The engine probes unfamiliar admin UIs through [`PageDriver`], a
//! protocol-agnostic capability set (find, read, click, type, wait,
//! contexts, screenshots). This crate defines that trait, the
//! [`Locator`] element query language, and an in-memory
//! [`fake::FakeDriver`] used for hermetic tests.
//!
//! # Example
//!
//! ```ignore
//! use crudprobe_driver::{Locator, PageDriver};
//!
//! async fn first_link_text<D: PageDriver>(driver: &D) -> Option<String> {
//!     let links = driver.find(Locator::Links).await.ok()?;
//!     let first = links.first()?;
//!     driver.text(first).await.ok()
//! }
//! ```
//!
//! Real adapters wrap an automation client (Playwright, WebDriver,
//! CDP) and live outside this workspace; the engine never depends on a
//! specific protocol.

mod driver;
mod error;
mod locator;

pub mod fake;

pub use driver::{ElementRef, PageDriver};
pub use error::{DriverError, Result};
pub use locator::Locator;
