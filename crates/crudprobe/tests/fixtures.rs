// Shared fake-application fixtures for integration tests
//
// Builds a small in-memory CRM: a login page, a dashboard with
// navigation links, and a Tasks module with a full create/edit/delete
// form wired through scripted click effects. Tests drive the real
// engine against these pages with no browser and no network.

// Note: Functions appear "unused" because each test binary compiles separately,
// but they ARE used across multiple test files. Suppress false-positive warnings.
#![allow(dead_code)]

use crudprobe_driver::fake::{ClickEffect, FakeDriver, FakeElement, PageBuilder, PageModel};
use std::sync::Once;

static INIT: Once = Once::new();

/// Installs a process-wide tracing subscriber honoring `RUST_LOG`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Enough prose to clear the minimum-content viability check.
pub const FILLER: &str = "Welcome to the practice management workspace. Track matters, \
    tasks, contacts and billing from a single place. All records shown below are \
    synthetic and safe to modify.";

pub const LOGIN_URL: &str = "local://login";
pub const DASHBOARD_URL: &str = "local://dashboard";
pub const TASKS_URL: &str = "local://tasks";

pub fn login_page() -> PageModel {
    let mut p = PageBuilder::new("Sign In").text(FILLER);
    p.add(
        FakeElement::new("input")
            .with_type("email")
            .with_name("email"),
    );
    p.add(
        FakeElement::new("input")
            .with_type("password")
            .with_name("password"),
    );
    p.add(
        FakeElement::new("button")
            .with_text("Login")
            .effect(ClickEffect::Navigate(DASHBOARD_URL.to_string())),
    );
    p.build()
}

pub fn dashboard_page() -> PageModel {
    let mut p = PageBuilder::new("Dashboard").text(FILLER);
    p.add(
        FakeElement::new("a")
            .with_text("Dashboard")
            .with_href(DASHBOARD_URL),
    );
    p.add(FakeElement::new("a").with_text("My Tasks").with_href(TASKS_URL));
    p.build()
}

/// Tasks listing with a hidden create/edit form. "Add Task" reveals
/// the form; "Save" commits the field values as a new table row that
/// carries its own Edit and Delete buttons.
pub fn tasks_page() -> PageModel {
    let mut p = PageBuilder::new("Tasks").text(FILLER);
    p.add(
        FakeElement::new("input")
            .with_type("search")
            .with_name("q")
            .with_placeholder("Search tasks"),
    );
    let table = p.add(FakeElement::new("table"));
    let header = p.add(FakeElement::new("tr").child_of(table));
    p.add(FakeElement::new("th").with_text("Title").child_of(header));
    p.add(FakeElement::new("th").with_text("Status").child_of(header));
    let seed_row = p.add(FakeElement::new("tr").child_of(table));
    p.add(
        FakeElement::new("td")
            .with_text("Quarterly filing reminder")
            .child_of(seed_row),
    );

    let title = p.add(
        FakeElement::new("input")
            .with_type("text")
            .with_name("title")
            .hidden(),
    );
    let due = p.add(
        FakeElement::new("input")
            .with_type("date")
            .with_name("due")
            .hidden(),
    );
    let desc = p.add(FakeElement::new("textarea").with_name("description").hidden());
    let status = p.add(
        FakeElement::new("select")
            .with_name("status")
            .with_options(&["Choose...", "Open", "Done"])
            .hidden(),
    );
    let save = p.add(FakeElement::new("button").with_text("Save").hidden());
    p.set_effect(
        save,
        ClickEffect::CommitForm {
            fields: vec![title, due, desc, status],
            table,
            edit_reveals: vec![title, due, desc, status, save],
            deletable: true,
        },
    );
    p.add(
        FakeElement::new("button")
            .with_text("+ Add Task")
            .effect(ClickEffect::Reveal(vec![title, due, desc, status, save])),
    );
    p.add(
        FakeElement::new("div")
            .with_class("pagination")
            .with_text("1 2 3"),
    );
    p.build()
}

/// Full fake CRM session starting on the login page.
pub fn crm_driver() -> FakeDriver {
    let driver = FakeDriver::new_at(LOGIN_URL, login_page());
    driver.add_route(LOGIN_URL, login_page());
    driver.add_route(DASHBOARD_URL, dashboard_page());
    driver.add_route(TASKS_URL, tasks_page());
    driver
}

/// A page whose content passes the viability checks but offers no
/// CRUD affordances at all.
pub fn featureless_page(title: &str) -> PageModel {
    PageBuilder::new(title).text(FILLER).build()
}
