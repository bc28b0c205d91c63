// Integration tests for the generic field-filler
//
// Tests cover the dispatch precedence:
// - selects prefer the first non-placeholder option
// - checkboxes/radios get checked, never unchecked
// - date, number and email inputs get plausible values
// - marker-bearing text fields carry the marker verbatim
// - a field that rejects input degrades to a skip string
// - the required-hints pass touches only hinted fields

mod fixtures;

use crudprobe::filler;
use crudprobe_driver::ElementRef;
use crudprobe_driver::fake::{FakeDriver, FakeElement, PageBuilder};

fn single(el: FakeElement) -> (FakeDriver, ElementRef) {
    let mut p = PageBuilder::new("Form").text(fixtures::FILLER);
    let id = p.add(el);
    (FakeDriver::new(p.build()), ElementRef::new(id))
}

#[tokio::test]
async fn test_select_prefers_second_option() {
    let (driver, handle) = single(
        FakeElement::new("select")
            .with_name("status")
            .with_options(&["Choose...", "Open", "Done"]),
    );
    let outcome = filler::fill(&driver, &handle, Some("Tasks_ab12cd")).await;
    assert_eq!(outcome, "Select set (status)");
    assert_eq!(driver.selected_index(handle.id()), Some(1));
}

#[tokio::test]
async fn test_single_option_select_takes_what_exists() {
    let (driver, handle) = single(
        FakeElement::new("select")
            .with_name("owner")
            .with_options(&["Only owner"]),
    );
    filler::fill(&driver, &handle, None).await;
    assert_eq!(driver.selected_index(handle.id()), Some(0));
}

#[tokio::test]
async fn test_unchecked_checkbox_gets_checked() {
    let (driver, handle) = single(
        FakeElement::new("input")
            .with_type("checkbox")
            .with_name("urgent"),
    );
    let outcome = filler::fill(&driver, &handle, None).await;
    assert_eq!(outcome, "Clicked checkbox (urgent)");
    assert_eq!(driver.checked_state(handle.id()), Some(true));
}

#[tokio::test]
async fn test_checked_checkbox_is_left_alone() {
    let (driver, handle) = single(
        FakeElement::new("input")
            .with_type("checkbox")
            .with_name("urgent")
            .checked(),
    );
    filler::fill(&driver, &handle, None).await;
    assert_eq!(driver.checked_state(handle.id()), Some(true));
    assert!(driver.clicked_labels().is_empty());
}

#[tokio::test]
async fn test_radio_gets_selected() {
    let (driver, handle) = single(
        FakeElement::new("input")
            .with_type("radio")
            .with_name("priority"),
    );
    let outcome = filler::fill(&driver, &handle, None).await;
    assert_eq!(outcome, "Clicked radio (priority)");
    assert_eq!(driver.checked_state(handle.id()), Some(true));
}

#[tokio::test]
async fn test_date_field_gets_iso_date() {
    let (driver, handle) = single(
        FakeElement::new("input")
            .with_type("date")
            .with_name("due_date"),
    );
    let outcome = filler::fill(&driver, &handle, Some("Tasks_ab12cd")).await;
    assert_eq!(outcome, "Date set (due_date)");
    let value = driver.value_of(handle.id()).expect("value missing");
    assert_eq!(value.len(), 10);
    assert_eq!(value.as_bytes()[4], b'-');
}

#[tokio::test]
async fn test_number_field_gets_small_integer() {
    let (driver, handle) = single(
        FakeElement::new("input")
            .with_type("number")
            .with_name("amount"),
    );
    filler::fill(&driver, &handle, None).await;
    let value: i32 = driver
        .value_of(handle.id())
        .expect("value missing")
        .parse()
        .expect("not numeric");
    assert!((1..=999).contains(&value));
}

#[tokio::test]
async fn test_email_field_with_marker_carries_the_marker() {
    let (driver, handle) = single(
        FakeElement::new("input")
            .with_type("email")
            .with_name("email"),
    );
    filler::fill(&driver, &handle, Some("Contacts_x1Y2z3")).await;
    assert_eq!(driver.value_of(handle.id()).as_deref(), Some("Contacts_x1Y2z3"));
}

#[tokio::test]
async fn test_email_named_field_without_marker_gets_synthetic_address() {
    let (driver, handle) = single(
        FakeElement::new("input")
            .with_type("text")
            .with_name("contact_email"),
    );
    filler::fill(&driver, &handle, None).await;
    let value = driver.value_of(handle.id()).expect("value missing");
    assert!(value.ends_with("@example.com"));
}

#[tokio::test]
async fn test_textarea_carries_the_marker() {
    let (driver, handle) = single(FakeElement::new("textarea").with_name("description"));
    let outcome = filler::fill(&driver, &handle, Some("Notes_m4N5o6")).await;
    assert_eq!(outcome, "Textarea set (description)");
    assert_eq!(driver.value_of(handle.id()).as_deref(), Some("Notes_m4N5o6"));
}

#[tokio::test]
async fn test_plain_text_field_replaces_prior_value() {
    let (driver, handle) = single(
        FakeElement::new("input")
            .with_type("text")
            .with_name("title")
            .with_value("previous entry"),
    );
    filler::fill(&driver, &handle, Some("Tasks_p7Q8r9")).await;
    assert_eq!(driver.value_of(handle.id()).as_deref(), Some("Tasks_p7Q8r9"));
}

#[tokio::test]
async fn test_refusing_field_degrades_to_skip_string() {
    let (driver, handle) = single(
        FakeElement::new("input")
            .with_type("text")
            .with_name("locked")
            .refusing_input(),
    );
    let outcome = filler::fill(&driver, &handle, Some("Tasks_p7Q8r9")).await;
    assert!(outcome.starts_with("Skip field error"));
    assert_eq!(driver.value_of(handle.id()).as_deref(), Some(""));
}

#[tokio::test]
async fn test_required_hint_pass_touches_only_hinted_fields() {
    let mut p = PageBuilder::new("Form").text(fixtures::FILLER);
    let title = p.add(
        FakeElement::new("input")
            .with_type("text")
            .with_name("matter_title"),
    );
    let misc = p.add(
        FakeElement::new("input")
            .with_type("text")
            .with_name("reference_code"),
    );
    let driver = FakeDriver::new(p.build());
    let fields = vec![ElementRef::new(title), ElementRef::new(misc)];

    let outcomes = filler::fill_likely_required(&driver, &fields, "Matters_s0T1u2").await;

    assert_eq!(outcomes.len(), 1);
    assert_eq!(driver.value_of(title).as_deref(), Some("Matters_s0T1u2"));
    assert_eq!(driver.value_of(misc).as_deref(), Some(""));
}
