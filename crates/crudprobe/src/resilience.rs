// Resilience layer - reload/retry recovery for flaky target pages
//
// Target pages are slow and occasionally transiently broken. Every
// component above this layer assumes the page is "usable" and never
// re-implements recovery. Nothing here propagates a driver error:
// failures degrade to a boolean.

use crate::config::Timing;
use crudprobe_driver::{ElementRef, Locator, PageDriver};
use std::time::Duration;
use tokio::time::{Instant, sleep};

/// Pages shorter than this are treated as failed loads.
pub const MIN_VIABLE_CONTENT_LEN: usize = 100;

/// Connectivity-failure phrase browsers render on unreachable hosts.
pub const CONNECTIVITY_ERROR_PHRASE: &str = "can't be reached";

/// An "error" this early in the content means an error page, not an
/// error-labeled widget further down.
pub const EARLY_ERROR_WINDOW: usize = 200;

/// Reload attempts before `ensure_page_usable` gives up.
pub const DEFAULT_RELOAD_ATTEMPTS: u32 = 3;

/// Bounded pause for asynchronous page updates to complete.
pub async fn settle(duration: Duration) {
    if !duration.is_zero() {
        sleep(duration).await;
    }
}

async fn page_looks_usable<D: PageDriver>(driver: &D) -> bool {
    let Ok(content) = driver.page_text().await else {
        return false;
    };
    if content.len() < MIN_VIABLE_CONTENT_LEN {
        return false;
    }
    let lowered = content.to_lowercase();
    if lowered.contains(CONNECTIVITY_ERROR_PHRASE) {
        return false;
    }
    let head: String = lowered.chars().take(EARLY_ERROR_WINDOW).collect();
    !head.contains("error")
}

/// Confirms the loaded page is usable, reloading until it is or
/// attempts run out.
///
/// A usable page returns `true` immediately with zero reloads. Driver
/// failures while inspecting count as failure signatures.
pub async fn ensure_page_usable<D: PageDriver>(
    driver: &D,
    timing: &Timing,
    max_attempts: u32,
) -> bool {
    for attempt in 1..=max_attempts {
        if page_looks_usable(driver).await {
            return true;
        }
        tracing::debug!(attempt, "page load issue, reloading");
        if let Err(e) = driver.reload().await {
            tracing::debug!(attempt, "reload failed: {}", e);
        }
        settle(timing.settle_long()).await;
    }
    page_looks_usable(driver).await
}

async fn poll_for<D: PageDriver>(
    driver: &D,
    locator: Locator,
    timeout: Duration,
    poll: Duration,
) -> Option<ElementRef> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Ok(found) = driver.find(locator).await
            && let Some(first) = found.first()
        {
            return Some(*first);
        }
        if Instant::now() >= deadline {
            return None;
        }
        settle(poll.max(Duration::from_millis(1))).await;
    }
}

/// Waits up to the configured timeout for an element matching
/// `locator` to exist.
///
/// On timeout, runs one recovery pass (`ensure_page_usable`) and waits
/// exactly once more. Returns `None` rather than raising when the
/// element never appears.
pub async fn wait_for_presence<D: PageDriver>(
    driver: &D,
    timing: &Timing,
    locator: Locator,
) -> Option<ElementRef> {
    if let Some(el) = poll_for(driver, locator, timing.wait_timeout(), timing.poll()).await {
        return Some(el);
    }
    tracing::debug!(?locator, "presence wait timed out, attempting recovery");
    ensure_page_usable(driver, timing, DEFAULT_RELOAD_ATTEMPTS).await;
    poll_for(driver, locator, timing.wait_timeout(), timing.poll()).await
}
