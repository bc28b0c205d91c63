// Navigation resolver
//
// Target navigation structures are unknown and inconsistently labeled:
// synonyms, abbreviations, icon-only collapsed menus. One selector
// can't cover that, so module entry points are resolved by a cascade
// of matching stages, attempted in declared order, first hit wins.
// Matching happens engine-side over link text and hrefs; the driver
// only enumerates.

use crate::config::Timing;
use crate::resilience::{DEFAULT_RELOAD_ATTEMPTS, ensure_page_usable, settle};
use crudprobe_driver::{ElementRef, Locator, PageDriver};

/// Modules tucked under an overflow ("More") menu in typical layouts.
const OVERFLOW_MODULES: [&str; 4] = ["settings", "accounts", "import data", "import"];

const TOGGLE_LIMIT: usize = 3;

/// One stage of the resolution cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NavStage {
    /// Expand nav toggles (and the overflow menu for overflow-area
    /// modules), then case-insensitive keyword match on link text.
    TextMatch,
    /// Keyword match against each link's underlying target address.
    HrefMatch,
    /// Re-expand toggles, then looser containment match including
    /// text found on a link's descendants.
    LooseText,
}

const CASCADE: [NavStage; 3] = [NavStage::TextMatch, NavStage::HrefMatch, NavStage::LooseText];

/// Locates `module_name`'s entry point and opens it in a new browsing
/// context, focused, settled, and reconciled.
///
/// Returns `false` only when every stage fails for every keyword.
pub async fn open_module<D: PageDriver>(
    driver: &D,
    timing: &Timing,
    module_name: &str,
    keywords: &[String],
) -> bool {
    for stage in CASCADE {
        let href = match stage {
            NavStage::TextMatch => {
                expand_nav_toggles(driver, timing).await;
                if OVERFLOW_MODULES.contains(&module_name.to_lowercase().as_str()) {
                    expand_overflow_menu(driver, timing).await;
                }
                match_link_text(driver, keywords).await
            }
            NavStage::HrefMatch => match_link_href(driver, keywords).await,
            NavStage::LooseText => {
                expand_nav_toggles(driver, timing).await;
                match_loose_text(driver, keywords).await
            }
        };
        if let Some(href) = href {
            tracing::debug!(module = module_name, ?stage, href, "navigation target resolved");
            if driver.open_context(&href).await.is_err() {
                continue;
            }
            settle(timing.settle_long()).await;
            ensure_page_usable(driver, timing, DEFAULT_RELOAD_ATTEMPTS).await;
            return true;
        }
    }
    tracing::debug!(module = module_name, "no navigation target matched any stage");
    false
}

/// Expands collapsible navigation containers so their links render.
async fn expand_nav_toggles<D: PageDriver>(driver: &D, timing: &Timing) {
    let Ok(toggles) = driver.find(Locator::NavToggles).await else {
        return;
    };
    for toggle in toggles.iter().take(TOGGLE_LIMIT) {
        match driver.is_visible(toggle).await {
            Ok(true) => {
                if driver.click(toggle).await.is_ok() {
                    settle(timing.settle_short()).await;
                }
            }
            _ => continue,
        }
    }
}

async fn expand_overflow_menu<D: PageDriver>(driver: &D, timing: &Timing) {
    let Ok(menus) = driver.find(Locator::OverflowMenus).await else {
        return;
    };
    for menu in menus.iter().take(TOGGLE_LIMIT) {
        if let Ok(true) = driver.is_visible(menu).await
            && driver.click(menu).await.is_ok()
        {
            settle(timing.settle_short()).await;
        }
    }
}

async fn visible_href<D: PageDriver>(driver: &D, link: &ElementRef) -> Option<String> {
    match driver.is_visible(link).await {
        Ok(true) => driver.attribute(link, "href").await.ok().flatten(),
        _ => None,
    }
}

async fn match_link_text<D: PageDriver>(driver: &D, keywords: &[String]) -> Option<String> {
    let links = driver.find(Locator::Links).await.ok()?;
    for keyword in keywords {
        let needle = keyword.to_lowercase();
        for link in &links {
            let Ok(text) = driver.text(link).await else {
                continue;
            };
            if text.to_lowercase().contains(&needle)
                && let Some(href) = visible_href(driver, link).await
            {
                return Some(href);
            }
        }
    }
    None
}

async fn match_link_href<D: PageDriver>(driver: &D, keywords: &[String]) -> Option<String> {
    let links = driver.find(Locator::Links).await.ok()?;
    for link in &links {
        let Ok(Some(href)) = driver.attribute(link, "href").await else {
            continue;
        };
        let lowered = href.to_lowercase();
        if keywords.iter().any(|k| lowered.contains(&k.to_lowercase()))
            && matches!(driver.is_visible(link).await, Ok(true))
        {
            return Some(href);
        }
    }
    None
}

/// Loose containment: the raw keyword anywhere in the link's own text
/// or in a descendant's text (icon-plus-span layouts).
async fn match_loose_text<D: PageDriver>(driver: &D, keywords: &[String]) -> Option<String> {
    let links = driver.find(Locator::Links).await.ok()?;
    for keyword in keywords {
        for link in &links {
            let mut blob = driver.text(link).await.unwrap_or_default();
            if let Ok(children) = driver.find_in(link, Locator::Any).await {
                for child in &children {
                    if let Ok(t) = driver.text(child).await {
                        blob.push(' ');
                        blob.push_str(&t);
                    }
                }
            }
            if blob.contains(keyword.as_str())
                && let Some(href) = visible_href(driver, link).await
            {
                return Some(href);
            }
        }
    }
    None
}
