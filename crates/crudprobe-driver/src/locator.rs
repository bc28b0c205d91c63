// Locator - the element query language the engine speaks
//
// The engine never issues raw CSS or XPath. It asks the driver for
// semantic element categories and does all keyword/heuristic matching
// itself, so the same probing logic runs against any automation
// protocol (and against the in-memory fake driver in tests).
//
// Each variant documents the selector a real adapter would typically
// map it to.

/// Element category understood by every [`PageDriver`](crate::PageDriver).
///
/// `find` with a `Locator` returns all matching elements in document
/// order; an empty result is a fact about the page, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locator {
    /// Every element. Used for descendant-text scans within a scope.
    Any,
    /// Anchor elements (`a`).
    Links,
    /// Clickable button-like controls: `button`, `a.btn`, `.btn`,
    /// `a[role='button']`.
    Buttons,
    /// Form controls: `input, select, textarea`.
    FormControls,
    /// Search/filter inputs: `input[type='search']`,
    /// `input[placeholder*='Search' i]`, `input[placeholder*='Filter']`.
    SearchInputs,
    /// Data grids (`table`).
    Tables,
    /// Table rows (`tr`); meaningful when scoped to a table.
    Rows,
    /// Header cells (`th`); meaningful when scoped to a table.
    HeaderCells,
    /// Data cells (`td`); meaningful when scoped to a row or table.
    DataCells,
    /// Collapsible navigation togglers: `.navbar-toggler`,
    /// `.sidebar-toggle`, menu buttons, hamburger icons.
    NavToggles,
    /// Overflow-menu affordances ("More" dropdowns).
    OverflowMenus,
    /// Validation/error regions: `.error`, `.validation`,
    /// `.invalid-feedback`, `.alert`, `[role='alert']`.
    ValidationRegions,
    /// Success toasts/banners: `.alert-success`, `.toast`,
    /// `.text-success`.
    SuccessRegions,
    /// Pagination affordances: `.pagination`, `[class*='paging']`,
    /// `.page-link`.
    PaginationControls,
    /// File upload controls: `input[type='file']`.
    FileInputs,
    /// Calendar widgets: `#calendar`, `.fc-view`, `[class*='calendar']`.
    CalendarWidgets,
    /// Elements whose rendered text contains a currency sign.
    CurrencyText,
}
