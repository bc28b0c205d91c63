// Marker generation and verification
//
// Markers are the system's only state-verification primitive: inject a
// collision-resistant string through a form, then look for it in the
// rendered page. Uniqueness, not unpredictability, is the requirement,
// so a plain thread RNG is fine.

use crate::config::Timing;
use crate::outcome::{Outcome, ResultSink, Status};
use crate::resilience::{DEFAULT_RELOAD_ATTEMPTS, ensure_page_usable, settle};
use crudprobe_driver::{ElementRef, Locator, PageDriver};
use rand::Rng;
use rand::distr::Alphanumeric;

/// Random-suffix length: 62^6 > 10^10 possible suffixes.
const SUFFIX_LEN: usize = 6;

/// Search inputs touched when clearing stale filters.
const SEARCH_FIELD_LIMIT: usize = 2;

pub(crate) fn random_string(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Produces a fresh marker for one module's CRUD pass.
pub fn generate_marker(module_name: &str) -> String {
    format!("{}_{}", module_name, random_string(SUFFIX_LEN))
}

/// The derived marker representing the post-update state of the record
/// created under `base`.
pub fn edit_marker(base: &str) -> String {
    format!("{base}_edit")
}

/// Clears any visible search/filter inputs so stale filters don't mask
/// a later scan. Per-field failures are skipped.
pub async fn clear_search_inputs<D: PageDriver>(driver: &D) {
    let Ok(fields) = driver.find(Locator::SearchInputs).await else {
        return;
    };
    for field in fields.iter().take(SEARCH_FIELD_LIMIT) {
        if let Err(e) = driver.clear(field).await {
            tracing::debug!("search field clear skipped: {}", e);
        }
    }
}

/// Verifies a marker's presence in the current page.
///
/// Types the marker into the first search/filter input when one
/// exists, settles, reconciles the page, then scans the full rendered
/// content case-insensitively. Emits exactly one outcome record tagged
/// with `context` and returns the verdict.
pub async fn locate_marker<D: PageDriver>(
    driver: &D,
    timing: &Timing,
    results: &mut dyn ResultSink,
    module_name: &str,
    marker: &str,
    context: &str,
) -> bool {
    if let Ok(fields) = driver.find(Locator::SearchInputs).await
        && let Some(field) = fields.first()
    {
        let submitted = async {
            driver.clear(field).await?;
            driver.type_text(field, marker).await?;
            driver.press_enter(field).await
        }
        .await;
        if let Err(e) = submitted {
            tracing::debug!("marker search submit skipped: {}", e);
        }
        settle(timing.settle_short()).await;
    }

    settle(timing.settle_short()).await;
    ensure_page_usable(driver, timing, DEFAULT_RELOAD_ATTEMPTS).await;

    let found = match driver.page_text().await {
        Ok(content) => content.to_lowercase().contains(&marker.to_lowercase()),
        Err(_) => false,
    };

    if found {
        results.record(Outcome::new(
            module_name,
            "General",
            &format!("Marker Found ({context})"),
            Status::Pass,
            &format!("Marker '{marker}' located"),
        ));
    } else {
        results.record(Outcome::new(
            module_name,
            "General",
            &format!("Marker Missing ({context})"),
            Status::Fail,
            &format!("Marker '{marker}' not present"),
        ));
    }
    found
}

/// Finds the first table row whose rendered text (own or descendant)
/// contains the marker, case-insensitively. First table wins, first
/// row wins.
pub async fn locate_row_with_marker<D: PageDriver>(
    driver: &D,
    marker: &str,
) -> Option<ElementRef> {
    let needle = marker.to_lowercase();
    let tables = driver.find(Locator::Tables).await.ok()?;
    for table in &tables {
        let Ok(rows) = driver.find_in(table, Locator::Rows).await else {
            continue;
        };
        for row in &rows {
            if row_text(driver, row).await.to_lowercase().contains(&needle) {
                return Some(*row);
            }
        }
    }
    None
}

async fn row_text<D: PageDriver>(driver: &D, row: &ElementRef) -> String {
    let mut parts = Vec::new();
    if let Ok(own) = driver.text(row).await {
        parts.push(own);
    }
    if let Ok(children) = driver.find_in(row, Locator::Any).await {
        for child in &children {
            if let Ok(t) = driver.text(child).await
                && !t.is_empty()
            {
                parts.push(t);
            }
        }
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn marker_carries_module_prefix_and_suffix() {
        let marker = generate_marker("Tasks");
        assert!(marker.starts_with("Tasks_"));
        let suffix = &marker["Tasks_".len()..];
        assert_eq!(suffix.len(), 6);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn edit_marker_derives_from_base() {
        assert_eq!(edit_marker("Tasks_ab12cd"), "Tasks_ab12cd_edit");
    }

    #[test]
    fn ten_thousand_markers_do_not_collide() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            assert!(seen.insert(generate_marker("Tasks")));
        }
    }
}
