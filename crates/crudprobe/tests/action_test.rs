// Integration tests for intent-based action resolution
//
// Tests cover:
// - matching on text, class and href signals
// - document order decides ties
// - invisible and disabled controls never match
// - row-scoped matching stays inside the row
// - a miss returns None without clicking anything

mod fixtures;

use crudprobe::action::{self, intent};
use crudprobe::Timing;
use crudprobe_driver::ElementRef;
use crudprobe_driver::fake::{FakeDriver, FakeElement, PageBuilder};
use fixtures::FILLER;

#[tokio::test]
async fn test_text_signal_matches_create_intent() {
    let mut p = PageBuilder::new("Tasks").text(FILLER);
    p.add(FakeElement::new("button").with_text("Refresh"));
    let add = p.add(FakeElement::new("button").with_text("Add Task"));
    let driver = FakeDriver::new(p.build());

    let found = action::find_best_match(&driver, None, intent::CREATE).await;
    assert_eq!(found.map(|el| el.id()), Some(add));
}

#[tokio::test]
async fn test_class_signal_matches_when_text_is_iconic() {
    let mut p = PageBuilder::new("Tasks").text(FILLER);
    let trash = p.add(
        FakeElement::new("button")
            .with_class("btn-delete")
            .with_text("\u{1F5D1}"),
    );
    let driver = FakeDriver::new(p.build());

    let found = action::find_best_match(&driver, None, intent::DESTROY).await;
    assert_eq!(found.map(|el| el.id()), Some(trash));
}

#[tokio::test]
async fn test_href_signal_matches_link_buttons() {
    let mut p = PageBuilder::new("Tasks").text(FILLER);
    let link = p.add(
        FakeElement::new("a")
            .with_class("btn")
            .with_text("+")
            .with_href("/tasks/new"),
    );
    let driver = FakeDriver::new(p.build());

    let found = action::find_best_match(&driver, None, intent::CREATE).await;
    assert_eq!(found.map(|el| el.id()), Some(link));
}

#[tokio::test]
async fn test_invisible_and_disabled_controls_never_match() {
    let mut p = PageBuilder::new("Tasks").text(FILLER);
    p.add(FakeElement::new("button").with_text("Add Task").hidden());
    p.add(FakeElement::new("button").with_text("Add Matter").disabled());
    let fallback = p.add(FakeElement::new("button").with_text("New Entry"));
    let driver = FakeDriver::new(p.build());

    let found = action::find_best_match(&driver, None, intent::CREATE).await;
    assert_eq!(found.map(|el| el.id()), Some(fallback));
}

#[tokio::test]
async fn test_row_scope_stays_inside_the_row() {
    let mut p = PageBuilder::new("Tasks").text(FILLER);
    let table = p.add(FakeElement::new("table"));
    let first_row = p.add(FakeElement::new("tr").child_of(table));
    p.add(FakeElement::new("button").with_text("Edit").child_of(first_row));
    let second_row = p.add(FakeElement::new("tr").child_of(table));
    let second_edit = p.add(FakeElement::new("button").with_text("Edit").child_of(second_row));
    let driver = FakeDriver::new(p.build());

    let found =
        action::find_best_match(&driver, Some(&ElementRef::new(second_row)), intent::EDIT).await;
    assert_eq!(found.map(|el| el.id()), Some(second_edit));
}

#[tokio::test]
async fn test_miss_returns_none_and_clicks_nothing() {
    let mut p = PageBuilder::new("Tasks").text(FILLER);
    p.add(FakeElement::new("button").with_text("Refresh"));
    let driver = FakeDriver::new(p.build());

    let clicked = action::click_best_match(&driver, &Timing::instant(), intent::DESTROY).await;
    assert!(clicked.is_none());
    assert!(driver.clicked_labels().is_empty());
}

#[tokio::test]
async fn test_click_best_match_clicks_and_reports_the_control() {
    let mut p = PageBuilder::new("Tasks").text(FILLER);
    let add = p.add(FakeElement::new("button").with_text("Add Task"));
    let driver = FakeDriver::new(p.build());

    let clicked = action::click_best_match(&driver, &Timing::instant(), intent::CREATE).await;
    assert_eq!(clicked.map(|el| el.id()), Some(add));
    assert_eq!(driver.clicked_labels(), vec!["Add Task".to_string()]);
}
