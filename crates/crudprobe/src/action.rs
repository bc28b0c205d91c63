// Action resolver
//
// Locates the best candidate control for a semantic intent among
// heterogeneous buttons and links. A control matches when any intent
// keyword appears in its case-normalized text, its href, or its class
// list; the first visible and enabled match in document order wins.

use crate::config::Timing;
use crate::resilience::{DEFAULT_RELOAD_ATTEMPTS, ensure_page_usable, settle};
use crudprobe_driver::{ElementRef, Locator, PageDriver};

/// Intent keyword sets.
pub mod intent {
    /// Open-a-create-form intent.
    pub const CREATE: &[&str] = &[
        "create",
        "add",
        "new",
        "add task",
        "add matter",
        "add contact",
        "add bill",
    ];
    /// Commit-a-form intent.
    pub const PERSIST: &[&str] = &["save", "submit", "create", "add"];
    /// Commit-an-edit intent (narrower than PERSIST: "add" on an edit
    /// form usually spawns a sibling record).
    pub const PERSIST_EDIT: &[&str] = &["save", "update"];
    /// Open-an-edit-form intent.
    pub const EDIT: &[&str] = &["edit", "update"];
    /// Remove-a-record intent.
    pub const DESTROY: &[&str] = &["delete", "remove"];
    /// Leave-the-form intent.
    pub const DISMISS: &[&str] = &["close", "cancel", "back", "x"];
    /// Submit-credentials intent.
    pub const LOGIN: &[&str] = &["login", "log in", "sign in", "submit"];
}

async fn matches_intent<D: PageDriver>(
    driver: &D,
    el: &ElementRef,
    keywords: &[&str],
) -> bool {
    let text = driver.text(el).await.unwrap_or_default().to_lowercase();
    let href = driver
        .attribute(el, "href")
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
        .to_lowercase();
    let class = driver
        .attribute(el, "class")
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
        .to_lowercase();
    keywords.iter().any(|k| {
        let k = k.to_lowercase();
        text.contains(&k) || href.contains(&k) || class.contains(&k)
    })
}

async fn candidates<D: PageDriver>(driver: &D, scope: Option<&ElementRef>) -> Vec<ElementRef> {
    let (buttons, links) = match scope {
        Some(row) => (
            driver.find_in(row, Locator::Buttons).await.unwrap_or_default(),
            driver.find_in(row, Locator::Links).await.unwrap_or_default(),
        ),
        None => (
            driver.find(Locator::Buttons).await.unwrap_or_default(),
            driver.find(Locator::Links).await.unwrap_or_default(),
        ),
    };
    let mut all = buttons;
    for link in links {
        if !all.contains(&link) {
            all.push(link);
        }
    }
    all
}

/// Finds the first visible, enabled control matching any keyword,
/// optionally restricted to descendants of `scope`. Does not click.
pub async fn find_best_match<D: PageDriver>(
    driver: &D,
    scope: Option<&ElementRef>,
    keywords: &[&str],
) -> Option<ElementRef> {
    for el in candidates(driver, scope).await {
        if !matches_intent(driver, &el, keywords).await {
            continue;
        }
        let visible = matches!(driver.is_visible(&el).await, Ok(true));
        let enabled = matches!(driver.is_enabled(&el).await, Ok(true));
        if visible && enabled {
            return Some(el);
        }
    }
    None
}

/// Clicks the best page-level match for the intent, settles, and
/// reconciles the page. Returns the clicked handle for downstream
/// label reporting, or `None` when nothing matched.
pub async fn click_best_match<D: PageDriver>(
    driver: &D,
    timing: &Timing,
    keywords: &[&str],
) -> Option<ElementRef> {
    let el = find_best_match(driver, None, keywords).await?;
    click_resolved(driver, timing, &el).await.then_some(el)
}

/// Row-scoped variant: same matching, restricted to `row`'s
/// descendants, so update/delete act on the record that carries the
/// marker rather than an arbitrary row.
pub async fn click_best_match_within<D: PageDriver>(
    driver: &D,
    timing: &Timing,
    row: &ElementRef,
    keywords: &[&str],
) -> Option<ElementRef> {
    let el = find_best_match(driver, Some(row), keywords).await?;
    click_resolved(driver, timing, &el).await.then_some(el)
}

/// Clicks an already-resolved control with the standard settle and
/// reconcile steps.
pub async fn click_resolved<D: PageDriver>(
    driver: &D,
    timing: &Timing,
    el: &ElementRef,
) -> bool {
    if let Err(e) = driver.click(el).await {
        tracing::debug!("resolved control click failed: {}", e);
        return false;
    }
    settle(timing.settle_short()).await;
    ensure_page_usable(driver, timing, DEFAULT_RELOAD_ATTEMPTS).await;
    true
}
