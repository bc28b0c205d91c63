// CRUD orchestrator
//
// Sequences one module's pass through a fixed state machine:
// NAVIGATE -> CREATE -> READ -> UPDATE -> DELETE -> SEARCH/FILTER ->
// PAGINATION_CHECK -> DONE. States are strictly sequential with no
// backtracking; only NAVIGATE failure ends a pass early. Everything
// else degrades to outcome records, because absence of a feature is a
// fact about the target application, not a defect in the prober.

use crate::action::{self, intent};
use crate::config::{ModuleSpec, Timing};
use crate::filler;
use crate::marker::{edit_marker, generate_marker, locate_marker, locate_row_with_marker};
use crate::nav;
use crate::outcome::{ArtifactSink, Outcome, ResultSink, Status, capture};
use crate::resilience::{DEFAULT_RELOAD_ATTEMPTS, ensure_page_usable, settle};
use crudprobe_driver::{ElementRef, Locator, PageDriver};

const CREATE_FIELD_LIMIT: usize = 25;
const EDIT_FIELD_LIMIT: usize = 15;
const BUTTON_SURVEY_LIMIT: usize = 30;
const DROPDOWN_SURVEY_LIMIT: usize = 10;
const OPTION_LABEL_PREVIEW: usize = 5;
const SEARCH_PROBE_TERM: &str = "test";

/// States of one module pass, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassState {
    Navigate,
    Create,
    Read,
    Update,
    Delete,
    Search,
    Pagination,
    Done,
}

/// Context threaded through a module pass.
///
/// UPDATE derives its marker from CREATE's output; DELETE prefers the
/// edit marker when one exists. Holding these here keeps the coupling
/// explicit instead of relying on scope capture.
#[derive(Debug, Clone)]
pub struct PassCtx {
    pub create_marker: String,
    pub edit_marker: Option<String>,
    pub base_row_count: usize,
}

/// Runs one module's full pass.
///
/// `Ok(true)`: the module was navigated to and every state ran.
/// `Ok(false)`: navigation failed; the pass was recorded as FAIL and
/// nothing else was attempted. `Err`: an unexpected driver failure
/// escaped; the caller owns the module-boundary handling.
pub async fn run_module_pass<D: PageDriver>(
    driver: &D,
    timing: &Timing,
    results: &mut dyn ResultSink,
    artifacts: &mut dyn ArtifactSink,
    module: &ModuleSpec,
) -> crate::Result<bool> {
    let name = module.name.as_str();
    tracing::debug!(module = name, state = ?PassState::Navigate, "module pass starting");

    if !nav::open_module(driver, timing, name, &module.keywords).await {
        results.record(Outcome::new(
            name,
            "Navigation",
            "Navigation",
            Status::Fail,
            "Could not open module",
        ));
        return Ok(false);
    }
    results.record(Outcome::new(
        name,
        "Navigation",
        "Navigation",
        Status::Pass,
        &format!("Successfully opened {name}"),
    ));

    settle(timing.settle_long()).await;
    ensure_page_usable(driver, timing, DEFAULT_RELOAD_ATTEMPTS).await;

    if let Ok(title) = driver.title().await {
        results.record(Outcome::new(name, "Navigation", "Page Title", Status::Pass, &title));
    }

    crud_pass(driver, timing, results, artifacts, name).await?;

    if driver.close_context().await.is_err() {
        tracing::warn!(module = name, "secondary context was already gone");
    }
    let _ = driver.switch_context(0).await;
    settle(timing.settle_short()).await;

    tracing::debug!(module = name, state = ?PassState::Done, "module pass complete");
    Ok(true)
}

async fn crud_pass<D: PageDriver>(
    driver: &D,
    timing: &Timing,
    results: &mut dyn ResultSink,
    artifacts: &mut dyn ArtifactSink,
    name: &str,
) -> crate::Result<()> {
    let ss_main = capture(driver, artifacts, &format!("{name}_Main_Page")).await;
    results.record(
        Outcome::new(name, "Page", "Page Loaded", Status::Pass, "Main page accessible")
            .artifact(&ss_main),
    );

    let mut ctx = PassCtx {
        create_marker: generate_marker(name),
        edit_marker: None,
        base_row_count: count_table_rows(driver).await,
    };

    tracing::debug!(module = name, state = ?PassState::Create, marker = %ctx.create_marker, "entering state");
    create_state(driver, timing, results, artifacts, name, &mut ctx, &ss_main).await?;

    tracing::debug!(module = name, state = ?PassState::Read, "entering state");
    read_state(driver, results, name, &ss_main).await?;

    tracing::debug!(module = name, state = ?PassState::Update, "entering state");
    update_state(driver, timing, results, artifacts, name, &mut ctx).await?;

    tracing::debug!(module = name, state = ?PassState::Delete, "entering state");
    delete_state(driver, timing, results, artifacts, name, &ctx).await?;

    tracing::debug!(module = name, state = ?PassState::Search, "entering state");
    search_state(driver, timing, results, name, &ss_main).await;

    tracing::debug!(module = name, state = ?PassState::Pagination, "entering state");
    pagination_state(driver, results, name, &ss_main).await;

    survey_buttons(driver, results, name).await;
    survey_dropdowns(driver, results, name).await;
    module_conditioned_checks(driver, artifacts, results, name).await;

    Ok(())
}

async fn create_state<D: PageDriver>(
    driver: &D,
    timing: &Timing,
    results: &mut dyn ResultSink,
    artifacts: &mut dyn ArtifactSink,
    name: &str,
    ctx: &mut PassCtx,
    ss_main: &str,
) -> crate::Result<()> {
    let Some(trigger) = action::find_best_match(driver, None, intent::CREATE).await else {
        results.record(
            Outcome::new(name, "Create", "CREATE Button", Status::Info, "No create button found")
                .expected("At least one create/add trigger"),
        );
        return Ok(());
    };

    let trigger_text = {
        let raw = driver.text(&trigger).await.unwrap_or_default();
        let trimmed = raw.trim().to_string();
        if trimmed.is_empty() { "Create".to_string() } else { trimmed }
    };
    if !action::click_resolved(driver, timing, &trigger).await {
        results.record(
            Outcome::new(name, "Create", "CREATE Button", Status::Info, "Create trigger unclickable")
                .expected("At least one create/add trigger"),
        );
        return Ok(());
    }
    results.record(
        Outcome::new(
            name,
            "Create",
            "CREATE Button",
            Status::Pass,
            &format!("Clicked create trigger {trigger_text}"),
        )
        .expected("Create form should open")
        .artifact(ss_main),
    );

    let ss_create = capture(driver, artifacts, &format!("{name}_Create_Form")).await;
    let fields = visible_form_controls(driver, CREATE_FIELD_LIMIT).await?;
    results.record(
        Outcome::new(
            name,
            "Create",
            "CREATE Form Opened",
            Status::Pass,
            &format!("Form has {} visible fields", fields.len()),
        )
        .artifact(&ss_create),
    );

    // Submit once empty to surface validation; captured, not asserted.
    if action::click_best_match(driver, timing, intent::PERSIST).await.is_some() {
        capture_validation_messages(driver, results, name, "on empty submit").await;
    }

    let mut filled = Vec::new();
    for field in &fields {
        filled.push(filler::fill(driver, field, Some(&ctx.create_marker)).await);
    }
    if !filled.is_empty() {
        results.record(
            Outcome::new(
                name,
                "Create",
                "CREATE Fields Filled",
                Status::Pass,
                &filled[..filled.len().min(5)].join("; "),
            )
            .expected("All required fields populated"),
        );
    }

    let Some(_save) = action::click_best_match(driver, timing, intent::PERSIST).await else {
        results.record(Outcome::new(
            name,
            "Create",
            "CREATE Save",
            Status::Fail,
            "No save/submit button found",
        ));
        return Ok(());
    };

    let ss_after_save = capture(driver, artifacts, &format!("{name}_Create_Save")).await;
    capture_validation_messages(driver, results, name, "after save").await;
    capture_success_messages(driver, results, name, "after save").await;

    // Second pass for fields validation likely rejected as empty.
    filler::fill_likely_required(driver, &fields, &ctx.create_marker).await;
    settle(timing.settle_short()).await;
    ensure_page_usable(driver, timing, DEFAULT_RELOAD_ATTEMPTS).await;

    return_to_listing(driver, timing).await;

    let new_row_count = count_table_rows(driver).await;
    let marker_found = locate_marker(
        driver,
        timing,
        results,
        name,
        &ctx.create_marker,
        "post-create search",
    )
    .await;

    if marker_found {
        results.record(
            Outcome::new(
                name,
                "Create",
                "CREATE Persist",
                Status::Pass,
                &format!(
                    "Marker '{}' located after save (rows {}->{})",
                    ctx.create_marker, ctx.base_row_count, new_row_count
                ),
            )
            .expected("New record should be added and visible")
            .actual(&format!("Rows now {new_row_count}"))
            .artifact(&ss_after_save),
        );
    } else {
        // Some applications navigate away without echoing the record.
        // A success banner makes the result ambiguous, not failed.
        let success_texts =
            capture_success_messages(driver, results, name, "post-save verify").await;
        let status = if success_texts.is_empty() { Status::Fail } else { Status::Info };
        results.record(
            Outcome::new(
                name,
                "Create",
                "CREATE Persist",
                status,
                &format!(
                    "Marker '{}' not found (rows {}->{})",
                    ctx.create_marker, ctx.base_row_count, new_row_count
                ),
            )
            .expected("New record should be added and visible")
            .actual(&format!("Rows now {new_row_count}"))
            .artifact(&ss_after_save),
        );
    }
    Ok(())
}

async fn read_state<D: PageDriver>(
    driver: &D,
    results: &mut dyn ResultSink,
    name: &str,
    ss_main: &str,
) -> crate::Result<()> {
    let tables = driver.find(Locator::Tables).await?;
    if tables.is_empty() {
        results.record(
            Outcome::new(name, "Read", "READ Data", Status::Info, "No data tables found")
                .expected("Data grid should exist"),
        );
        return Ok(());
    }
    for (idx, table) in tables.iter().take(2).enumerate() {
        let rows = driver.find_in(table, Locator::Rows).await.unwrap_or_default();
        let cols = driver
            .find_in(table, Locator::HeaderCells)
            .await
            .unwrap_or_default();
        results.record(
            Outcome::new(
                name,
                "Read",
                &format!("READ Table {}", idx + 1),
                Status::Pass,
                &format!("{} rows, {} columns", rows.len(), cols.len()),
            )
            .expected("Data should be listed")
            .artifact(ss_main),
        );

        let action_buttons = driver
            .find_in(table, Locator::Buttons)
            .await
            .unwrap_or_default();
        if !action_buttons.is_empty() {
            results.record(Outcome::new(
                name,
                "Read",
                "Row Action Buttons",
                Status::Pass,
                &format!("Found {} action buttons in table", action_buttons.len()),
            ));
        }
    }
    Ok(())
}

async fn update_state<D: PageDriver>(
    driver: &D,
    timing: &Timing,
    results: &mut dyn ResultSink,
    artifacts: &mut dyn ArtifactSink,
    name: &str,
    ctx: &mut PassCtx,
) -> crate::Result<()> {
    let marker_present = locate_marker(
        driver,
        timing,
        results,
        name,
        &ctx.create_marker,
        "pre-edit locate",
    )
    .await;

    let row = if marker_present {
        locate_row_with_marker(driver, &ctx.create_marker).await
    } else {
        None
    };
    let row_edit = match &row {
        Some(r) => action::find_best_match(driver, Some(r), intent::EDIT).await,
        None => None,
    };
    let page_edit = action::find_best_match(driver, None, intent::EDIT).await;

    let Some(button) = row_edit.or(page_edit) else {
        results.record(
            Outcome::new(name, "Update", "UPDATE Button", Status::Info, "No edit button found")
                .expected("At least one edit action"),
        );
        return Ok(());
    };
    if !marker_present {
        results.record(Outcome::new(
            name,
            "Update",
            "UPDATE Locate",
            Status::Fail,
            "Marker not found to edit",
        ));
        return Ok(());
    }

    let btn_text = {
        let raw = driver.text(&button).await.unwrap_or_default();
        let trimmed = raw.trim().to_string();
        if trimmed.is_empty() { "Edit".to_string() } else { trimmed }
    };
    results.record(
        Outcome::new(name, "Update", "UPDATE Button", Status::Pass, &format!("Button: {btn_text}"))
            .expected("Edit form should open"),
    );

    if !action::click_resolved(driver, timing, &button).await {
        results.record(Outcome::new(
            name,
            "Update",
            "UPDATE Test",
            Status::Fail,
            "Edit control did not respond to click",
        ));
        return Ok(());
    }

    let ss_edit = capture(driver, artifacts, &format!("{name}_Edit_Form")).await;
    let fields = visible_form_controls(driver, EDIT_FIELD_LIMIT).await?;
    let em = edit_marker(&ctx.create_marker);

    let mut edits = Vec::new();
    for field in &fields {
        edits.push(filler::fill(driver, field, Some(&em)).await);
    }

    if action::click_best_match(driver, timing, intent::PERSIST_EDIT).await.is_some() {
        capture_validation_messages(driver, results, name, "after edit save").await;
        let ss_edit_save = capture(driver, artifacts, &format!("{name}_Edit_Save")).await;
        locate_marker(driver, timing, results, name, &em, "post-edit verify").await;
        results.record(
            Outcome::new(
                name,
                "Update",
                "UPDATE Persist",
                Status::Pass,
                &format!("Edited fields: {}", edits[..edits.len().min(4)].join(", ")),
            )
            .expected("Changes should persist")
            .actual(&format!("Marker now {em}"))
            .artifact(&ss_edit_save),
        );
        ctx.edit_marker = Some(em);
    } else {
        results.record(
            Outcome::new(
                name,
                "Update",
                "UPDATE Save",
                Status::Fail,
                "No save/update button in edit form",
            )
            .artifact(&ss_edit),
        );
    }

    if let Err(e) = driver.go_back().await {
        tracing::debug!("history step back failed: {}", e);
    }
    settle(timing.settle_short()).await;
    ensure_page_usable(driver, timing, DEFAULT_RELOAD_ATTEMPTS).await;
    Ok(())
}

async fn delete_state<D: PageDriver>(
    driver: &D,
    timing: &Timing,
    results: &mut dyn ResultSink,
    artifacts: &mut dyn ArtifactSink,
    name: &str,
    ctx: &PassCtx,
) -> crate::Result<()> {
    let delete_marker = ctx.edit_marker.as_deref().unwrap_or(&ctx.create_marker);

    let marker_present = locate_marker(
        driver,
        timing,
        results,
        name,
        delete_marker,
        "pre-delete locate",
    )
    .await;

    let row = if marker_present {
        locate_row_with_marker(driver, delete_marker).await
    } else {
        None
    };
    let row_delete = match &row {
        Some(r) => action::find_best_match(driver, Some(r), intent::DESTROY).await,
        None => None,
    };
    let page_delete = action::find_best_match(driver, None, intent::DESTROY).await;

    let Some(button) = row_delete.or(page_delete) else {
        results.record(
            Outcome::new(name, "Delete", "DELETE Button", Status::Info, "No delete button found")
                .expected("At least one delete action"),
        );
        return Ok(());
    };
    if !marker_present {
        results.record(Outcome::new(
            name,
            "Delete",
            "DELETE Locate",
            Status::Fail,
            "Marker not found to delete",
        ));
        return Ok(());
    }

    if !action::click_resolved(driver, timing, &button).await {
        results.record(Outcome::new(
            name,
            "Delete",
            "DELETE Action",
            Status::Fail,
            "No delete button resolved",
        ));
        return Ok(());
    }
    if let Ok(true) = driver.accept_native_prompt().await {
        settle(timing.settle_short()).await;
    }

    let ss_del = capture(driver, artifacts, &format!("{name}_Delete")).await;
    ensure_page_usable(driver, timing, DEFAULT_RELOAD_ATTEMPTS).await;
    return_to_listing(driver, timing).await;

    let found_after_delete = locate_marker(
        driver,
        timing,
        results,
        name,
        delete_marker,
        "post-delete verify",
    )
    .await;
    let status = if found_after_delete { Status::Fail } else { Status::Pass };
    results.record(
        Outcome::new(
            name,
            "Delete",
            "DELETE Action",
            status,
            &format!("Delete triggered; marker present after delete? {found_after_delete}"),
        )
        .expected("Record should be removed")
        .artifact(&ss_del),
    );
    Ok(())
}

async fn search_state<D: PageDriver>(
    driver: &D,
    timing: &Timing,
    results: &mut dyn ResultSink,
    name: &str,
    ss_main: &str,
) {
    let fields = driver.find(Locator::SearchInputs).await.unwrap_or_default();
    let Some(field) = fields.first() else {
        results.record(Outcome::new(
            name,
            "Search",
            "Search/Filter",
            Status::Info,
            "No search/filter fields found",
        ));
        return;
    };

    let probe = async {
        driver.clear(field).await?;
        driver.type_text(field, SEARCH_PROBE_TERM).await?;
        driver.press_enter(field).await
    }
    .await;
    settle(timing.settle_short()).await;

    match probe {
        Ok(()) => results.record(
            Outcome::new(
                name,
                "Search",
                "Search/Filter",
                Status::Pass,
                &format!("Search executed with term '{SEARCH_PROBE_TERM}'"),
            )
            .expected("Results filter")
            .actual("Search input responsive")
            .artifact(ss_main),
        ),
        Err(e) => {
            let detail: String = e.to_string().chars().take(80).collect();
            results.record(Outcome::new(name, "Search", "Search/Filter", Status::Fail, &detail));
        }
    }
}

async fn pagination_state<D: PageDriver>(
    driver: &D,
    results: &mut dyn ResultSink,
    name: &str,
    ss_main: &str,
) {
    let pagination = driver
        .find(Locator::PaginationControls)
        .await
        .unwrap_or_default();
    if !pagination.is_empty() {
        results.record(
            Outcome::new(
                name,
                "Pagination",
                "Pagination",
                Status::Pass,
                &format!("Found pagination with {} elements", pagination.len()),
            )
            .artifact(ss_main),
        );
    }
}

/// Logs the first 30 visible, enabled button-like controls.
async fn survey_buttons<D: PageDriver>(driver: &D, results: &mut dyn ResultSink, name: &str) {
    let buttons = driver.find(Locator::Buttons).await.unwrap_or_default();
    for button in buttons.iter().take(BUTTON_SURVEY_LIMIT) {
        let visible = matches!(driver.is_visible(button).await, Ok(true));
        let enabled = matches!(driver.is_enabled(button).await, Ok(true));
        if !visible || !enabled {
            continue;
        }
        let Ok(raw) = driver.text(button).await else { continue };
        let text = raw.trim().to_string();
        if text.is_empty() || text.len() >= 100 {
            continue;
        }
        let tag = driver.tag_name(button).await.unwrap_or_default();
        results.record(Outcome::new(
            name,
            "Buttons",
            &format!("Button Found: {text}"),
            Status::Pass,
            &format!("Type: {tag}, Visible: Yes, Enabled: Yes"),
        ));
    }
}

/// Logs the first 10 visible selectors with option counts and a label
/// preview.
async fn survey_dropdowns<D: PageDriver>(driver: &D, results: &mut dyn ResultSink, name: &str) {
    let controls = driver.find(Locator::FormControls).await.unwrap_or_default();
    let mut surveyed = 0usize;
    for (idx, control) in controls.iter().enumerate() {
        if surveyed >= DROPDOWN_SURVEY_LIMIT {
            break;
        }
        if !matches!(driver.tag_name(control).await.as_deref(), Ok("select")) {
            continue;
        }
        if !matches!(driver.is_visible(control).await, Ok(true)) {
            continue;
        }
        let Ok(options) = driver.option_labels(control).await else {
            continue;
        };
        let dropdown_id = driver
            .attribute(control, "id")
            .await
            .ok()
            .flatten()
            .unwrap_or_else(|| format!("dropdown_{idx}"));
        results.record(Outcome::new(
            name,
            "Dropdowns",
            &format!("Dropdown: {dropdown_id}"),
            Status::Pass,
            &format!(
                "Found {} options: {}",
                options.len(),
                options[..options.len().min(OPTION_LABEL_PREVIEW)].join(", ")
            ),
        ));
        surveyed += 1;
    }
}

/// Checks keyed off the module's name: financial amount markers,
/// calendar widget, file-upload controls.
async fn module_conditioned_checks<D: PageDriver>(
    driver: &D,
    artifacts: &mut dyn ArtifactSink,
    results: &mut dyn ResultSink,
    name: &str,
) {
    let lowered = name.to_lowercase();

    if lowered.contains("billing") || lowered.contains("matter") || lowered.contains("litigation") {
        let amounts = driver.find(Locator::CurrencyText).await.unwrap_or_default();
        if !amounts.is_empty() {
            results.record(Outcome::new(
                name,
                "Financial",
                "Financial Data",
                Status::Pass,
                &format!("Found {} amount/financial fields", amounts.len()),
            ));
        }
    }

    if lowered.contains("calendar") {
        let widgets = driver.find(Locator::CalendarWidgets).await.unwrap_or_default();
        if !widgets.is_empty() {
            let ss_cal = capture(driver, artifacts, &format!("{name}_Calendar_Widget")).await;
            results.record(
                Outcome::new(name, "Widget", "Calendar Widget", Status::Pass, "Calendar view found")
                    .artifact(&ss_cal),
            );
        }
    }

    if lowered.contains("document") {
        let uploads = driver.find(Locator::FileInputs).await.unwrap_or_default();
        if !uploads.is_empty() {
            results.record(Outcome::new(
                name,
                "Upload",
                "Upload Feature",
                Status::Pass,
                &format!("Found {} file upload fields", uploads.len()),
            ));
        }
    }
}

/// First data-bearing table's data-row count; 0 when no table has one.
pub async fn count_table_rows<D: PageDriver>(driver: &D) -> usize {
    let Ok(tables) = driver.find(Locator::Tables).await else {
        return 0;
    };
    for table in &tables {
        let Ok(rows) = driver.find_in(table, Locator::Rows).await else {
            continue;
        };
        let mut data_rows = 0usize;
        for row in &rows {
            match driver.find_in(row, Locator::DataCells).await {
                Ok(cells) if !cells.is_empty() => data_rows += 1,
                _ => {}
            }
        }
        if data_rows > 0 {
            return data_rows;
        }
    }
    0
}

/// Attempts to get from a modal/form back to the listing view.
async fn return_to_listing<D: PageDriver>(driver: &D, timing: &Timing) {
    action::click_best_match(driver, timing, intent::DISMISS).await;
    settle(timing.settle_short()).await;
    ensure_page_usable(driver, timing, DEFAULT_RELOAD_ATTEMPTS).await;
}

async fn capture_validation_messages<D: PageDriver>(
    driver: &D,
    results: &mut dyn ResultSink,
    name: &str,
    context: &str,
) -> Vec<String> {
    collect_region_texts(driver, results, name, context, "Validation", Locator::ValidationRegions)
        .await
}

async fn capture_success_messages<D: PageDriver>(
    driver: &D,
    results: &mut dyn ResultSink,
    name: &str,
    context: &str,
) -> Vec<String> {
    collect_region_texts(driver, results, name, context, "Success", Locator::SuccessRegions).await
}

async fn collect_region_texts<D: PageDriver>(
    driver: &D,
    results: &mut dyn ResultSink,
    name: &str,
    context: &str,
    kind: &str,
    locator: Locator,
) -> Vec<String> {
    let Ok(regions) = driver.find(locator).await else {
        return Vec::new();
    };
    let mut texts = Vec::new();
    for region in &regions {
        if !matches!(driver.is_visible(region).await, Ok(true)) {
            continue;
        }
        if let Ok(raw) = driver.text(region).await {
            let trimmed = raw.trim().to_string();
            if !trimmed.is_empty() {
                texts.push(trimmed);
            }
        }
    }
    if !texts.is_empty() {
        results.record(Outcome::new(
            name,
            "General",
            &format!("{kind} {context}"),
            Status::Info,
            &texts.join(" | "),
        ));
    }
    texts
}

async fn visible_form_controls<D: PageDriver>(
    driver: &D,
    limit: usize,
) -> crate::Result<Vec<ElementRef>> {
    let controls = driver.find(Locator::FormControls).await?;
    let mut visible = Vec::new();
    for control in controls {
        if matches!(driver.is_visible(&control).await, Ok(true)) {
            visible.push(control);
            if visible.len() >= limit {
                break;
            }
        }
    }
    Ok(visible)
}
