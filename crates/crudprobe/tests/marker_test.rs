// Integration tests for marker verification against fake pages
//
// Tests cover:
// - the marker is typed into the first search input before scanning
// - input values never count as page content (no self-confirmation)
// - case-insensitive full-page scan
// - exactly one outcome row per verification
// - row location by marker text in descendant cells

mod fixtures;

use crudprobe::outcome::{CsvReporter, Status};
use crudprobe::{Timing, marker};
use crudprobe_driver::PageDriver;
use crudprobe_driver::fake::{FakeDriver, FakeElement, PageBuilder};
use fixtures::FILLER;

fn listing_with_search(extra_row_text: Option<&str>) -> (FakeDriver, u64, u64) {
    let mut p = PageBuilder::new("Matters").text(FILLER);
    let search = p.add(
        FakeElement::new("input")
            .with_type("search")
            .with_placeholder("Search matters"),
    );
    let table = p.add(FakeElement::new("table"));
    let row = p.add(FakeElement::new("tr").child_of(table));
    p.add(FakeElement::new("td").with_text("Baseline record").child_of(row));
    let marked_row = p.add(FakeElement::new("tr").child_of(table));
    p.add(
        FakeElement::new("td")
            .with_text(extra_row_text.unwrap_or("Second record"))
            .child_of(marked_row),
    );
    (FakeDriver::new(p.build()), search, marked_row)
}

#[tokio::test]
async fn test_marker_present_in_table_is_found() {
    let (driver, search, _) = listing_with_search(Some("Matters_a1B2c3 | Open"));
    let mut sink = CsvReporter::new();
    let found = marker::locate_marker(
        &driver,
        &Timing::instant(),
        &mut sink,
        "Matters",
        "Matters_a1B2c3",
        "post-create search",
    )
    .await;
    assert!(found);
    assert_eq!(driver.value_of(search).as_deref(), Some("Matters_a1B2c3"));
    assert_eq!(sink.rows().len(), 1);
    assert_eq!(sink.rows()[0].status, Status::Pass);
    assert!(sink.rows()[0].action.contains("post-create search"));
}

#[tokio::test]
async fn test_search_box_echo_does_not_self_confirm() {
    // The marker lands in the search input's value; values are not
    // rendered content, so the scan must still miss.
    let (driver, search, _) = listing_with_search(None);
    let mut sink = CsvReporter::new();
    let found = marker::locate_marker(
        &driver,
        &Timing::instant(),
        &mut sink,
        "Matters",
        "Matters_zZ9y8X",
        "post-create search",
    )
    .await;
    assert!(!found);
    assert_eq!(driver.value_of(search).as_deref(), Some("Matters_zZ9y8X"));
    assert_eq!(sink.rows().len(), 1);
    assert_eq!(sink.rows()[0].status, Status::Fail);
    assert!(sink.rows()[0].action.contains("Marker Missing"));
}

#[tokio::test]
async fn test_marker_scan_is_case_insensitive() {
    let (driver, _, _) = listing_with_search(Some("matters_q7r8s9 | Closed"));
    let mut sink = CsvReporter::new();
    let found = marker::locate_marker(
        &driver,
        &Timing::instant(),
        &mut sink,
        "Matters",
        "MATTERS_Q7R8S9",
        "pre-edit locate",
    )
    .await;
    assert!(found);
}

#[tokio::test]
async fn test_marker_scan_without_search_input_still_scans() {
    let page = PageBuilder::new("Notes")
        .text(FILLER)
        .text("Notes_k4L5m6 created moments ago")
        .build();
    let driver = FakeDriver::new(page);
    let mut sink = CsvReporter::new();
    let found = marker::locate_marker(
        &driver,
        &Timing::instant(),
        &mut sink,
        "Notes",
        "Notes_k4L5m6",
        "post-create search",
    )
    .await;
    assert!(found);
}

#[tokio::test]
async fn test_row_location_picks_the_marked_row() {
    let (driver, _, marked_row) = listing_with_search(Some("Matters_t0u1V2 | Open"));
    let row = marker::locate_row_with_marker(&driver, "matters_t0u1v2").await;
    assert_eq!(row.map(|r| r.id()), Some(marked_row));
}

#[tokio::test]
async fn test_row_location_misses_absent_marker() {
    let (driver, _, _) = listing_with_search(None);
    let row = marker::locate_row_with_marker(&driver, "Matters_absent").await;
    assert!(row.is_none());
}

#[tokio::test]
async fn test_clear_search_inputs_empties_the_field() {
    let (driver, search, _) = listing_with_search(None);
    driver
        .type_text(&crudprobe_driver::ElementRef::new(search), "stale filter")
        .await
        .expect("Failed to seed search value");
    marker::clear_search_inputs(&driver).await;
    assert_eq!(driver.value_of(search).as_deref(), Some(""));
}
