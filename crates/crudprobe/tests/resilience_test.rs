// Integration tests for the page-resilience layer
//
// Tests cover:
// - healthy pages pass without reloading
// - short/connectivity-error/early-error pages trigger reloads
// - recovery stops as soon as a queued healthy page loads
// - reload attempts are bounded
// - presence waits recover the page before retrying

mod fixtures;

use crudprobe::Timing;
use crudprobe::resilience::{DEFAULT_RELOAD_ATTEMPTS, ensure_page_usable, wait_for_presence};
use crudprobe_driver::Locator;
use crudprobe_driver::fake::{FakeDriver, FakeElement, PageBuilder};
use fixtures::FILLER;

#[tokio::test]
async fn test_healthy_page_needs_no_reload() {
    let driver = FakeDriver::new(fixtures::featureless_page("Listing"));
    let usable = ensure_page_usable(&driver, &Timing::instant(), DEFAULT_RELOAD_ATTEMPTS).await;
    assert!(usable);
    assert_eq!(driver.reload_count(), 0);
}

#[tokio::test]
async fn test_short_page_reloads_until_healthy() {
    let driver = FakeDriver::new(PageBuilder::new("").text("stub").build());
    driver.queue_reload(fixtures::featureless_page("Recovered"));
    let usable = ensure_page_usable(&driver, &Timing::instant(), DEFAULT_RELOAD_ATTEMPTS).await;
    assert!(usable);
    assert_eq!(driver.reload_count(), 1);
}

#[tokio::test]
async fn test_connectivity_error_page_is_unusable() {
    let broken = PageBuilder::new("Problem")
        .text("This site can't be reached. The connection was reset while loading the page, please try again in a moment.")
        .build();
    let driver = FakeDriver::new(broken);
    driver.queue_reload(fixtures::featureless_page("Recovered"));
    driver.queue_reload(fixtures::featureless_page("Recovered"));
    let usable = ensure_page_usable(&driver, &Timing::instant(), DEFAULT_RELOAD_ATTEMPTS).await;
    assert!(usable);
    assert_eq!(driver.reload_count(), 1);
}

#[tokio::test]
async fn test_early_error_text_is_unusable() {
    let broken = PageBuilder::new("Error 500")
        .text(FILLER)
        .build();
    let driver = FakeDriver::new(broken);
    driver.queue_reload(fixtures::featureless_page("Recovered"));
    assert!(ensure_page_usable(&driver, &Timing::instant(), DEFAULT_RELOAD_ATTEMPTS).await);
    assert_eq!(driver.reload_count(), 1);
}

#[tokio::test]
async fn test_late_error_text_is_still_usable() {
    // An "error" mention deep in the body is page content, not an
    // error page.
    let page = PageBuilder::new("Listing")
        .text(FILLER)
        .text("Older entries in the archive panel mention a billing error resolved last March.")
        .build();
    let driver = FakeDriver::new(page);
    assert!(ensure_page_usable(&driver, &Timing::instant(), DEFAULT_RELOAD_ATTEMPTS).await);
    assert_eq!(driver.reload_count(), 0);
}

#[tokio::test]
async fn test_reload_attempts_are_bounded() {
    let driver = FakeDriver::new(PageBuilder::new("").text("stub").build());
    let usable = ensure_page_usable(&driver, &Timing::instant(), DEFAULT_RELOAD_ATTEMPTS).await;
    assert!(!usable);
    assert_eq!(driver.reload_count(), u64::from(DEFAULT_RELOAD_ATTEMPTS));
}

#[tokio::test]
async fn test_presence_wait_finds_existing_element() {
    let mut p = PageBuilder::new("Listing").text(FILLER);
    let table = p.add(FakeElement::new("table"));
    let driver = FakeDriver::new(p.build());
    let found = wait_for_presence(&driver, &Timing::instant(), Locator::Tables).await;
    assert_eq!(found.map(|el| el.id()), Some(table));
}

#[tokio::test]
async fn test_presence_wait_recovers_page_then_retries() {
    let driver = FakeDriver::new(PageBuilder::new("").text("stub").build());
    let mut healthy = PageBuilder::new("Listing").text(FILLER);
    let table = healthy.add(FakeElement::new("table"));
    driver.queue_reload(healthy.build());

    let found = wait_for_presence(&driver, &Timing::instant(), Locator::Tables).await;
    assert_eq!(found.map(|el| el.id()), Some(table));
    assert!(driver.reload_count() >= 1);
}

#[tokio::test]
async fn test_presence_wait_gives_up_quietly() {
    let driver = FakeDriver::new(fixtures::featureless_page("Listing"));
    let found = wait_for_presence(&driver, &Timing::instant(), Locator::Tables).await;
    assert!(found.is_none());
}
