// PageDriver - abstract browser capability set
//
// The engine is written against this trait only. Adapters wrap a real
// automation protocol (Playwright, WebDriver, CDP); the `fake` module
// provides an in-memory implementation for hermetic tests.
//
// Design rules:
// - Methods take `&self`: a driver is a handle onto a remote session,
//   mutation happens on the other side of the protocol.
// - `find`/`find_in` return all matches in document order; zero
//   matches is `Ok(vec![])`, never an error.
// - Handles go stale when the page reloads; adapters report that as
//   `DriverError::StaleElement` and callers re-query.

use crate::Locator;
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Opaque handle to one element within the active browsing context.
///
/// Valid only until the page it was resolved against reloads or
/// re-renders. The engine never inspects the id; it is an adapter-side
/// token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementRef(u64);

impl ElementRef {
    /// Creates a handle from an adapter-side element id.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// The adapter-side id backing this handle.
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Abstract page-driver capability set.
///
/// One instance owns one browser session and its browsing contexts.
/// Context indices are stable: index 0 is the primary context opened
/// at session start; `open_context` appends and focuses a new one.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigates the active context to `url`.
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Reloads the active context's page.
    async fn reload(&self) -> Result<()>;

    /// Navigates one step back in the active context's history.
    async fn go_back(&self) -> Result<()>;

    /// Full rendered text content of the active page.
    async fn page_text(&self) -> Result<String>;

    /// Document title of the active page.
    async fn title(&self) -> Result<String>;

    /// Current URL of the active context.
    async fn current_url(&self) -> Result<String>;

    /// All elements matching `locator`, in document order.
    async fn find(&self, locator: Locator) -> Result<Vec<ElementRef>>;

    /// All elements matching `locator` that are descendants of `scope`.
    async fn find_in(&self, scope: &ElementRef, locator: Locator) -> Result<Vec<ElementRef>>;

    /// Lowercased tag name of the element.
    async fn tag_name(&self, el: &ElementRef) -> Result<String>;

    /// Rendered text of the element (own text, not descendants).
    async fn text(&self, el: &ElementRef) -> Result<String>;

    /// Attribute value, `None` when the attribute is absent.
    async fn attribute(&self, el: &ElementRef, name: &str) -> Result<Option<String>>;

    /// Whether the element is rendered visible.
    async fn is_visible(&self, el: &ElementRef) -> Result<bool>;

    /// Whether the element is enabled for interaction.
    async fn is_enabled(&self, el: &ElementRef) -> Result<bool>;

    /// Whether a checkbox/radio control is currently checked.
    async fn is_checked(&self, el: &ElementRef) -> Result<bool>;

    /// Clicks the element.
    async fn click(&self, el: &ElementRef) -> Result<()>;

    /// Clears the element's current value.
    async fn clear(&self, el: &ElementRef) -> Result<()>;

    /// Types `text` into the element.
    async fn type_text(&self, el: &ElementRef, text: &str) -> Result<()>;

    /// Presses Enter with the element focused (submits search fields).
    async fn press_enter(&self, el: &ElementRef) -> Result<()>;

    /// Visible labels of a selector's options, in option order.
    async fn option_labels(&self, el: &ElementRef) -> Result<Vec<String>>;

    /// Selects a selector's option by zero-based index.
    async fn select_index(&self, el: &ElementRef, index: usize) -> Result<()>;

    /// Opens a new browsing context at `url` and focuses it.
    async fn open_context(&self, url: &str) -> Result<()>;

    /// Focuses the browsing context at `index`.
    async fn switch_context(&self, index: usize) -> Result<()>;

    /// Closes the active context; focus returns to the primary context.
    ///
    /// # Errors
    ///
    /// `PrimaryContextClose` when the active context is index 0.
    async fn close_context(&self) -> Result<()>;

    /// Number of open browsing contexts (primary included).
    async fn context_count(&self) -> Result<usize>;

    /// Captures a screenshot of the active page to `path`.
    async fn screenshot(&self, path: &Path) -> Result<()>;

    /// Accepts a pending native confirmation prompt.
    ///
    /// Returns `true` when a prompt was present and accepted, `false`
    /// when no prompt was pending.
    async fn accept_native_prompt(&self) -> Result<bool>;
}
