// FakeDriver - in-memory PageDriver for hermetic tests
//
// Models just enough of a rendered page for the engine's heuristics to
// be exercised without a browser: elements with tags/attributes/
// visibility, scripted click effects (reveal a form, commit a form
// into a table row, remove a row), multiple browsing contexts, and a
// reload queue for simulating transient page failures.
//
// Counters (reloads, screenshots, clicked labels) let tests assert on
// engine behavior, not just end state.

use crate::error::{DriverError, Result};
use crate::{ElementRef, Locator, PageDriver};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::path::Path;

/// Scripted consequence of clicking an element.
#[derive(Debug, Clone)]
pub enum ClickEffect {
    /// Nothing happens.
    None,
    /// The listed elements become visible.
    Reveal(Vec<u64>),
    /// The listed elements become hidden.
    Hide(Vec<u64>),
    /// The active context loads the routed page for `url`.
    Navigate(String),
    /// The page's free body text is replaced.
    SetBodyText(String),
    /// The current values of `fields` are committed as a new data row
    /// appended to `table`. The row carries an Edit button revealing
    /// `edit_reveals` (omitted when empty) and, when `deletable`, a
    /// Delete button that removes the row behind a native confirm.
    CommitForm {
        fields: Vec<u64>,
        table: u64,
        edit_reveals: Vec<u64>,
        deletable: bool,
    },
    /// Removes the nearest enclosing table row of the clicked element.
    RemoveRow,
}

/// One element in a fake page. Build with the chainable setters, then
/// register through [`PageBuilder::add`] to obtain its id.
#[derive(Debug, Clone)]
pub struct FakeElement {
    pub(crate) id: u64,
    tag: String,
    type_attr: Option<String>,
    name: Option<String>,
    dom_id: Option<String>,
    classes: Vec<String>,
    href: Option<String>,
    text: String,
    placeholder: Option<String>,
    role: Option<String>,
    visible: bool,
    enabled: bool,
    checked: bool,
    value: String,
    options: Vec<String>,
    selected: Option<usize>,
    parent: Option<u64>,
    effect: ClickEffect,
    confirm_guard: bool,
    refuse_input: bool,
}

impl FakeElement {
    pub fn new(tag: &str) -> Self {
        Self {
            id: 0,
            tag: tag.to_ascii_lowercase(),
            type_attr: None,
            name: None,
            dom_id: None,
            classes: Vec::new(),
            href: None,
            text: String::new(),
            placeholder: None,
            role: None,
            visible: true,
            enabled: true,
            checked: false,
            value: String::new(),
            options: Vec::new(),
            selected: None,
            parent: None,
            effect: ClickEffect::None,
            confirm_guard: false,
            refuse_input: false,
        }
    }

    pub fn with_type(mut self, t: &str) -> Self {
        self.type_attr = Some(t.to_string());
        self
    }

    pub fn with_name(mut self, n: &str) -> Self {
        self.name = Some(n.to_string());
        self
    }

    pub fn with_dom_id(mut self, id: &str) -> Self {
        self.dom_id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, c: &str) -> Self {
        self.classes.push(c.to_string());
        self
    }

    pub fn with_href(mut self, h: &str) -> Self {
        self.href = Some(h.to_string());
        self
    }

    pub fn with_text(mut self, t: &str) -> Self {
        self.text = t.to_string();
        self
    }

    pub fn with_placeholder(mut self, p: &str) -> Self {
        self.placeholder = Some(p.to_string());
        self
    }

    pub fn with_role(mut self, r: &str) -> Self {
        self.role = Some(r.to_string());
        self
    }

    pub fn with_value(mut self, v: &str) -> Self {
        self.value = v.to_string();
        self
    }

    pub fn with_options(mut self, opts: &[&str]) -> Self {
        self.options = opts.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn checked(mut self) -> Self {
        self.checked = true;
        self
    }

    pub fn child_of(mut self, parent: u64) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn effect(mut self, e: ClickEffect) -> Self {
        self.effect = e;
        self
    }

    /// Clicking this element raises a native confirm before its effect
    /// applies; the effect runs on `accept_native_prompt`.
    pub fn confirm_guarded(mut self) -> Self {
        self.confirm_guard = true;
        self
    }

    /// `clear`/`type_text` fail on this element (simulates a control
    /// that rejects input).
    pub fn refusing_input(mut self) -> Self {
        self.refuse_input = true;
        self
    }
}

/// One fake rendered page.
#[derive(Debug, Clone, Default)]
pub struct PageModel {
    title: String,
    body_text: String,
    elements: Vec<FakeElement>,
}

/// Builds a [`PageModel`], handing out element ids as elements are
/// registered so effects can reference them.
#[derive(Debug, Default)]
pub struct PageBuilder {
    page: PageModel,
    next_id: u64,
}

impl PageBuilder {
    pub fn new(title: &str) -> Self {
        Self {
            page: PageModel {
                title: title.to_string(),
                body_text: String::new(),
                elements: Vec::new(),
            },
            next_id: 1,
        }
    }

    /// Appends free body text (rendered prose outside any element).
    pub fn text(mut self, t: &str) -> Self {
        if !self.page.body_text.is_empty() {
            self.page.body_text.push(' ');
        }
        self.page.body_text.push_str(t);
        self
    }

    /// Registers an element, returning its id.
    pub fn add(&mut self, mut el: FakeElement) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        el.id = id;
        self.page.elements.push(el);
        id
    }

    /// Rewires the click effect of an already registered element.
    pub fn set_effect(&mut self, id: u64, effect: ClickEffect) {
        if let Some(el) = self.page.elements.iter_mut().find(|e| e.id == id) {
            el.effect = effect;
        }
    }

    pub fn build(self) -> PageModel {
        self.page
    }
}

struct FakeContext {
    url: String,
    page: PageModel,
    reload_queue: VecDeque<PageModel>,
    history: Vec<(String, PageModel)>,
}

struct Inner {
    contexts: Vec<FakeContext>,
    active: usize,
    routes: HashMap<String, PageModel>,
    reloads: u64,
    screenshots: u64,
    clicked: Vec<String>,
    pending_prompt: Option<(u64, ClickEffect)>,
    dynamic_id: u64,
}

/// In-memory [`PageDriver`] implementation.
pub struct FakeDriver {
    inner: Mutex<Inner>,
}

impl FakeDriver {
    /// Starts a session with `page` loaded in the primary context.
    pub fn new(page: PageModel) -> Self {
        Self::new_at("local://start", page)
    }

    /// Starts a session with `page` loaded at `url`.
    pub fn new_at(url: &str, page: PageModel) -> Self {
        Self {
            inner: Mutex::new(Inner {
                contexts: vec![FakeContext {
                    url: url.to_string(),
                    page,
                    reload_queue: VecDeque::new(),
                    history: Vec::new(),
                }],
                active: 0,
                routes: HashMap::new(),
                reloads: 0,
                screenshots: 0,
                clicked: Vec::new(),
                pending_prompt: None,
                dynamic_id: 1_000_000,
            }),
        }
    }

    /// Registers the page served when a context navigates to `url`.
    pub fn add_route(&self, url: &str, page: PageModel) {
        self.inner.lock().routes.insert(url.to_string(), page);
    }

    /// Queues a page the active context swaps in on its next reload.
    pub fn queue_reload(&self, page: PageModel) {
        let mut inner = self.inner.lock();
        let active = inner.active;
        inner.contexts[active].reload_queue.push_back(page);
    }

    pub fn reload_count(&self) -> u64 {
        self.inner.lock().reloads
    }

    pub fn screenshot_count(&self) -> u64 {
        self.inner.lock().screenshots
    }

    /// Labels of clicked elements, in click order.
    pub fn clicked_labels(&self) -> Vec<String> {
        self.inner.lock().clicked.clone()
    }

    /// Current value of an element in the active page (test assertions).
    pub fn value_of(&self, id: u64) -> Option<String> {
        let inner = self.inner.lock();
        inner.contexts[inner.active]
            .page
            .elements
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.value.clone())
    }

    /// Whether a checkbox/radio in the active page is checked.
    pub fn checked_state(&self, id: u64) -> Option<bool> {
        let inner = self.inner.lock();
        inner.contexts[inner.active]
            .page
            .elements
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.checked)
    }

    /// Selected option index of a selector in the active page.
    pub fn selected_index(&self, id: u64) -> Option<usize> {
        let inner = self.inner.lock();
        inner.contexts[inner.active]
            .page
            .elements
            .iter()
            .find(|e| e.id == id)
            .and_then(|e| e.selected)
    }
}

impl Inner {
    fn page(&self) -> &PageModel {
        &self.contexts[self.active].page
    }

    fn page_mut(&mut self) -> &mut PageModel {
        let active = self.active;
        &mut self.contexts[active].page
    }

    fn element(&self, id: u64) -> Result<&FakeElement> {
        self.page()
            .elements
            .iter()
            .find(|e| e.id == id)
            .ok_or(DriverError::StaleElement(id))
    }

    fn element_mut(&mut self, id: u64) -> Result<&mut FakeElement> {
        self.page_mut()
            .elements
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(DriverError::StaleElement(id))
    }

    fn is_descendant(&self, id: u64, ancestor: u64) -> bool {
        let mut current = Some(id);
        while let Some(cid) = current {
            if cid == ancestor {
                return true;
            }
            current = self
                .page()
                .elements
                .iter()
                .find(|e| e.id == cid)
                .and_then(|e| e.parent);
        }
        false
    }

    fn matches(&self, el: &FakeElement, locator: Locator) -> bool {
        let ty = el.type_attr.as_deref().unwrap_or("").to_ascii_lowercase();
        let class_blob = el.classes.join(" ").to_ascii_lowercase();
        let placeholder = el.placeholder.as_deref().unwrap_or("").to_ascii_lowercase();
        match locator {
            Locator::Any => true,
            Locator::Links => el.tag == "a",
            Locator::Buttons => {
                el.tag == "button"
                    || (el.tag == "a"
                        && (class_blob.contains("btn") || el.role.as_deref() == Some("button")))
            }
            Locator::FormControls => matches!(el.tag.as_str(), "input" | "select" | "textarea"),
            Locator::SearchInputs => {
                el.tag == "input"
                    && (ty == "search"
                        || placeholder.contains("search")
                        || placeholder.contains("filter"))
            }
            Locator::Tables => el.tag == "table",
            Locator::Rows => el.tag == "tr",
            Locator::HeaderCells => el.tag == "th",
            Locator::DataCells => el.tag == "td",
            Locator::NavToggles => {
                matches!(el.tag.as_str(), "button" | "a")
                    && (class_blob.contains("navbar-toggler")
                        || class_blob.contains("sidebar-toggle")
                        || class_blob.contains("menu")
                        || class_blob.contains("fa-bars"))
            }
            Locator::OverflowMenus => {
                matches!(el.tag.as_str(), "a" | "button" | "span") && el.text.contains("More")
            }
            Locator::ValidationRegions => {
                class_blob.contains("error")
                    || class_blob.contains("validation")
                    || class_blob.contains("invalid-feedback")
                    || class_blob.contains("alert")
                    || el.role.as_deref() == Some("alert")
            }
            Locator::SuccessRegions => {
                class_blob.contains("alert-success")
                    || class_blob.contains("toast")
                    || class_blob.contains("text-success")
            }
            Locator::PaginationControls => {
                class_blob.contains("pagination")
                    || class_blob.contains("paging")
                    || class_blob.contains("page-link")
            }
            Locator::FileInputs => el.tag == "input" && ty == "file",
            Locator::CalendarWidgets => {
                el.dom_id.as_deref() == Some("calendar")
                    || class_blob.contains("calendar")
                    || class_blob.contains("fc-view")
            }
            Locator::CurrencyText => el.text.contains('$'),
        }
    }

    fn load_route(&mut self, url: &str) {
        let page = self.routes.get(url).cloned().unwrap_or_default();
        let active = self.active;
        let ctx = &mut self.contexts[active];
        let old_url = std::mem::replace(&mut ctx.url, url.to_string());
        let old_page = std::mem::replace(&mut ctx.page, page);
        ctx.history.push((old_url, old_page));
    }

    fn apply_effect(&mut self, source: u64, effect: ClickEffect) {
        match effect {
            ClickEffect::None => {}
            ClickEffect::Reveal(ids) => {
                for id in ids {
                    if let Ok(el) = self.element_mut(id) {
                        el.visible = true;
                    }
                }
            }
            ClickEffect::Hide(ids) => {
                for id in ids {
                    if let Ok(el) = self.element_mut(id) {
                        el.visible = false;
                    }
                }
            }
            ClickEffect::Navigate(url) => self.load_route(&url),
            ClickEffect::SetBodyText(text) => {
                self.page_mut().body_text = text;
            }
            ClickEffect::CommitForm {
                fields,
                table,
                edit_reveals,
                deletable,
            } => self.commit_form(&fields, table, edit_reveals, deletable),
            ClickEffect::RemoveRow => self.remove_enclosing_row(source),
        }
    }

    fn commit_form(&mut self, fields: &[u64], table: u64, edit_reveals: Vec<u64>, deletable: bool) {
        let mut cells = Vec::new();
        for id in fields {
            let Ok(el) = self.element(*id) else { continue };
            let rendered = match el.tag.as_str() {
                "select" => el
                    .selected
                    .and_then(|i| el.options.get(i))
                    .cloned()
                    .unwrap_or_default(),
                "input"
                    if matches!(
                        el.type_attr.as_deref(),
                        Some("checkbox") | Some("radio")
                    ) =>
                {
                    if el.checked { "on".to_string() } else { "off".to_string() }
                }
                _ => el.value.clone(),
            };
            if !rendered.is_empty() {
                cells.push(rendered);
            }
        }

        let row_id = self.dynamic_id;
        self.dynamic_id += 4;
        let page = self.page_mut();
        let mut row = FakeElement::new("tr").child_of(table);
        row.id = row_id;
        page.elements.push(row);
        let mut cell = FakeElement::new("td")
            .with_text(&cells.join(" | "))
            .child_of(row_id);
        cell.id = row_id + 1;
        page.elements.push(cell);
        if !edit_reveals.is_empty() {
            let mut edit = FakeElement::new("button")
                .with_text("Edit")
                .child_of(row_id)
                .effect(ClickEffect::Reveal(edit_reveals));
            edit.id = row_id + 2;
            page.elements.push(edit);
        }
        if deletable {
            let mut delete = FakeElement::new("button")
                .with_text("Delete")
                .child_of(row_id)
                .effect(ClickEffect::RemoveRow)
                .confirm_guarded();
            delete.id = row_id + 3;
            page.elements.push(delete);
        }
    }

    fn remove_enclosing_row(&mut self, source: u64) {
        let mut current = Some(source);
        let mut row = None;
        while let Some(id) = current {
            let Some(el) = self.page().elements.iter().find(|e| e.id == id) else {
                break;
            };
            if el.tag == "tr" {
                row = Some(id);
                break;
            }
            current = el.parent;
        }
        let Some(row_id) = row else { return };
        let doomed: Vec<u64> = self
            .page()
            .elements
            .iter()
            .filter(|e| self.is_descendant(e.id, row_id))
            .map(|e| e.id)
            .collect();
        self.page_mut().elements.retain(|e| !doomed.contains(&e.id));
    }
}

#[async_trait]
impl PageDriver for FakeDriver {
    async fn navigate(&self, url: &str) -> Result<()> {
        tracing::trace!(url, "fake navigate");
        self.inner.lock().load_route(url);
        Ok(())
    }

    async fn reload(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.reloads += 1;
        tracing::trace!(reloads = inner.reloads, "fake reload");
        let active = inner.active;
        if let Some(page) = inner.contexts[active].reload_queue.pop_front() {
            inner.contexts[active].page = page;
        }
        Ok(())
    }

    async fn go_back(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        let active = inner.active;
        if let Some((url, page)) = inner.contexts[active].history.pop() {
            inner.contexts[active].url = url;
            inner.contexts[active].page = page;
        }
        Ok(())
    }

    async fn page_text(&self) -> Result<String> {
        let inner = self.inner.lock();
        let page = inner.page();
        let mut parts = vec![page.title.clone(), page.body_text.clone()];
        for el in &page.elements {
            if !el.visible {
                continue;
            }
            if !el.text.is_empty() {
                parts.push(el.text.clone());
            }
            for opt in &el.options {
                parts.push(opt.clone());
            }
        }
        Ok(parts.join(" "))
    }

    async fn title(&self) -> Result<String> {
        Ok(self.inner.lock().page().title.clone())
    }

    async fn current_url(&self) -> Result<String> {
        let inner = self.inner.lock();
        Ok(inner.contexts[inner.active].url.clone())
    }

    async fn find(&self, locator: Locator) -> Result<Vec<ElementRef>> {
        let inner = self.inner.lock();
        Ok(inner
            .page()
            .elements
            .iter()
            .filter(|el| inner.matches(el, locator))
            .map(|el| ElementRef::new(el.id))
            .collect())
    }

    async fn find_in(&self, scope: &ElementRef, locator: Locator) -> Result<Vec<ElementRef>> {
        let inner = self.inner.lock();
        Ok(inner
            .page()
            .elements
            .iter()
            .filter(|el| {
                el.id != scope.id()
                    && inner.is_descendant(el.id, scope.id())
                    && inner.matches(el, locator)
            })
            .map(|el| ElementRef::new(el.id))
            .collect())
    }

    async fn tag_name(&self, el: &ElementRef) -> Result<String> {
        Ok(self.inner.lock().element(el.id())?.tag.clone())
    }

    async fn text(&self, el: &ElementRef) -> Result<String> {
        Ok(self.inner.lock().element(el.id())?.text.clone())
    }

    async fn attribute(&self, el: &ElementRef, name: &str) -> Result<Option<String>> {
        let inner = self.inner.lock();
        let e = inner.element(el.id())?;
        Ok(match name {
            "href" => e.href.clone(),
            "type" => e.type_attr.clone(),
            "name" => e.name.clone(),
            "id" => e.dom_id.clone(),
            "class" => {
                if e.classes.is_empty() {
                    None
                } else {
                    Some(e.classes.join(" "))
                }
            }
            "placeholder" => e.placeholder.clone(),
            "role" => e.role.clone(),
            "value" => Some(e.value.clone()),
            _ => None,
        })
    }

    async fn is_visible(&self, el: &ElementRef) -> Result<bool> {
        Ok(self.inner.lock().element(el.id())?.visible)
    }

    async fn is_enabled(&self, el: &ElementRef) -> Result<bool> {
        Ok(self.inner.lock().element(el.id())?.enabled)
    }

    async fn is_checked(&self, el: &ElementRef) -> Result<bool> {
        Ok(self.inner.lock().element(el.id())?.checked)
    }

    async fn click(&self, el: &ElementRef) -> Result<()> {
        let mut inner = self.inner.lock();
        let target = inner.element(el.id())?;
        let label = if target.text.is_empty() {
            format!("#{}", el.id())
        } else {
            target.text.clone()
        };
        let is_toggle = matches!(
            target.type_attr.as_deref(),
            Some("checkbox") | Some("radio")
        );
        let effect = target.effect.clone();
        let guarded = target.confirm_guard;
        inner.clicked.push(label);
        if is_toggle {
            let checked = inner.element(el.id())?.checked;
            let radio = inner.element(el.id())?.type_attr.as_deref() == Some("radio");
            inner.element_mut(el.id())?.checked = if radio { true } else { !checked };
        }
        if guarded {
            inner.pending_prompt = Some((el.id(), effect));
        } else {
            inner.apply_effect(el.id(), effect);
        }
        Ok(())
    }

    async fn clear(&self, el: &ElementRef) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.element(el.id())?.refuse_input {
            return Err(DriverError::Transport(format!(
                "element {} rejected clear",
                el.id()
            )));
        }
        inner.element_mut(el.id())?.value.clear();
        Ok(())
    }

    async fn type_text(&self, el: &ElementRef, text: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.element(el.id())?.refuse_input {
            return Err(DriverError::Transport(format!(
                "element {} rejected input",
                el.id()
            )));
        }
        inner.element_mut(el.id())?.value.push_str(text);
        Ok(())
    }

    async fn press_enter(&self, el: &ElementRef) -> Result<()> {
        self.inner.lock().element(el.id())?;
        Ok(())
    }

    async fn option_labels(&self, el: &ElementRef) -> Result<Vec<String>> {
        let inner = self.inner.lock();
        let e = inner.element(el.id())?;
        if e.tag != "select" {
            return Err(DriverError::UnsupportedOperation {
                operation: "option_labels",
                element: el.id(),
            });
        }
        Ok(e.options.clone())
    }

    async fn select_index(&self, el: &ElementRef, index: usize) -> Result<()> {
        let mut inner = self.inner.lock();
        let e = inner.element(el.id())?;
        if e.tag != "select" {
            return Err(DriverError::UnsupportedOperation {
                operation: "select_index",
                element: el.id(),
            });
        }
        if index >= e.options.len() {
            return Err(DriverError::UnsupportedOperation {
                operation: "select_index",
                element: el.id(),
            });
        }
        let label = e.options[index].clone();
        let e = inner.element_mut(el.id())?;
        e.selected = Some(index);
        e.value = label;
        Ok(())
    }

    async fn open_context(&self, url: &str) -> Result<()> {
        tracing::trace!(url, "fake open_context");
        let mut inner = self.inner.lock();
        let page = inner.routes.get(url).cloned().unwrap_or_default();
        inner.contexts.push(FakeContext {
            url: url.to_string(),
            page,
            reload_queue: VecDeque::new(),
            history: Vec::new(),
        });
        inner.active = inner.contexts.len() - 1;
        Ok(())
    }

    async fn switch_context(&self, index: usize) -> Result<()> {
        let mut inner = self.inner.lock();
        if index >= inner.contexts.len() {
            return Err(DriverError::NoSuchContext(index));
        }
        inner.active = index;
        Ok(())
    }

    async fn close_context(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.active == 0 {
            return Err(DriverError::PrimaryContextClose);
        }
        let active = inner.active;
        inner.contexts.remove(active);
        inner.active = 0;
        Ok(())
    }

    async fn context_count(&self) -> Result<usize> {
        Ok(self.inner.lock().contexts.len())
    }

    async fn screenshot(&self, _path: &Path) -> Result<()> {
        self.inner.lock().screenshots += 1;
        Ok(())
    }

    async fn accept_native_prompt(&self) -> Result<bool> {
        let pending = self.inner.lock().pending_prompt.take();
        match pending {
            Some((source, effect)) => {
                self.inner.lock().apply_effect(source, effect);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_page() -> (PageModel, u64, u64) {
        let mut p = PageBuilder::new("Sample").text("A perfectly ordinary page");
        let link = p.add(
            FakeElement::new("a")
                .with_text("Tasks")
                .with_href("/tasks"),
        );
        let input = p.add(FakeElement::new("input").with_type("text").with_name("title"));
        (p.build(), link, input)
    }

    #[tokio::test]
    async fn find_returns_matches_in_document_order() {
        let (page, link, input) = sample_page();
        let driver = FakeDriver::new(page);
        let links = driver.find(Locator::Links).await.unwrap();
        assert_eq!(links, vec![ElementRef::new(link)]);
        let controls = driver.find(Locator::FormControls).await.unwrap();
        assert_eq!(controls, vec![ElementRef::new(input)]);
    }

    #[tokio::test]
    async fn typed_text_is_appended_after_clear() {
        let (page, _, input) = sample_page();
        let driver = FakeDriver::new(page);
        let handle = ElementRef::new(input);
        driver.type_text(&handle, "abc").await.unwrap();
        driver.clear(&handle).await.unwrap();
        driver.type_text(&handle, "xyz").await.unwrap();
        assert_eq!(driver.value_of(input).as_deref(), Some("xyz"));
    }

    #[tokio::test]
    async fn reload_swaps_in_queued_page() {
        let (page, _, _) = sample_page();
        let driver = FakeDriver::new(page);
        driver.queue_reload(PageBuilder::new("Recovered").text("healthy content").build());
        driver.reload().await.unwrap();
        assert_eq!(driver.reload_count(), 1);
        assert!(driver.page_text().await.unwrap().contains("Recovered"));
    }

    #[tokio::test]
    async fn closing_primary_context_is_refused() {
        let (page, _, _) = sample_page();
        let driver = FakeDriver::new(page);
        assert!(matches!(
            driver.close_context().await,
            Err(DriverError::PrimaryContextClose)
        ));
    }

    #[tokio::test]
    async fn commit_form_appends_a_data_row() {
        let mut p = PageBuilder::new("Form");
        let field = p.add(FakeElement::new("input").with_type("text").with_value("hello"));
        let table = p.add(FakeElement::new("table"));
        let save = p.add(FakeElement::new("button").with_text("Save").effect(
            ClickEffect::CommitForm {
                fields: vec![field],
                table,
                edit_reveals: vec![],
                deletable: true,
            },
        ));
        let driver = FakeDriver::new(p.build());
        driver.click(&ElementRef::new(save)).await.unwrap();
        let rows = driver
            .find_in(&ElementRef::new(table), Locator::Rows)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert!(driver.page_text().await.unwrap().contains("hello"));
    }
}
