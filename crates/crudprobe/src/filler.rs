// Generic field-filler
//
// Inspects a form control at runtime and writes semantically plausible
// synthetic input, preferring the caller's marker so the write can be
// verified later. Dispatch is a fixed precedence order; the first
// matching rule wins. One bad field never aborts a form-fill pass.

use chrono::Local;
use crudprobe_driver::{DriverError, ElementRef, PageDriver};
use rand::Rng;

use crate::marker::random_string;

/// Name/id substrings that suggest a field the target's validation is
/// likely to require.
pub const REQUIRED_HINTS: [&str; 11] = [
    "matter",
    "client",
    "title",
    "name",
    "description",
    "amount",
    "fund",
    "time",
    "date",
    "start",
    "end",
];

pub(crate) fn random_email() -> String {
    format!("test_{}@example.com", random_string(6).to_lowercase())
}

pub(crate) fn random_number() -> String {
    rand::rng().random_range(1..=999).to_string()
}

fn today_iso() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Runtime-observed shape of one form control.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub handle: ElementRef,
    pub tag: String,
    pub control_type: String,
    /// Declared name, falling back to id, lowercased; empty if neither.
    pub label: String,
}

/// Reads a control's observable shape. Transient; never persisted.
pub async fn describe<D: PageDriver>(
    driver: &D,
    handle: &ElementRef,
) -> Result<FieldDescriptor, DriverError> {
    let tag = driver.tag_name(handle).await?;
    let control_type = driver
        .attribute(handle, "type")
        .await?
        .unwrap_or_default()
        .to_lowercase();
    let label = match driver.attribute(handle, "name").await? {
        Some(name) if !name.is_empty() => name,
        _ => driver.attribute(handle, "id").await?.unwrap_or_default(),
    }
    .to_lowercase();
    Ok(FieldDescriptor {
        handle: *handle,
        tag,
        control_type,
        label,
    })
}

/// Fills one control, returning a short human-readable outcome string.
///
/// Inspection or write failures are caught and reported as a skip for
/// that field only.
pub async fn fill<D: PageDriver>(driver: &D, handle: &ElementRef, marker: Option<&str>) -> String {
    match try_fill(driver, handle, marker).await {
        Ok(outcome) => outcome,
        Err(e) => {
            let detail: String = e.to_string().chars().take(40).collect();
            format!("Skip field error {detail}")
        }
    }
}

async fn try_fill<D: PageDriver>(
    driver: &D,
    handle: &ElementRef,
    marker: Option<&str>,
) -> Result<String, DriverError> {
    let field = describe(driver, handle).await?;
    let name = &field.label;
    let marker_text = marker
        .map(str::to_string)
        .unwrap_or_else(|| format!("Auto {}", random_string(6)));

    if field.tag == "select" {
        let options = driver.option_labels(handle).await?;
        if options.len() > 1 {
            driver.select_index(handle, 1).await?;
        } else if !options.is_empty() {
            driver.select_index(handle, 0).await?;
        }
        return Ok(format!("Select set ({name})"));
    }

    if matches!(field.control_type.as_str(), "checkbox" | "radio") {
        if !driver.is_checked(handle).await? {
            driver.click(handle).await?;
        }
        return Ok(format!("Clicked {} ({name})", field.control_type));
    }

    if matches!(field.control_type.as_str(), "date" | "datetime-local") {
        let today = today_iso();
        driver.clear(handle).await?;
        driver.type_text(handle, &today).await?;
        return Ok(format!("Date set ({name})"));
    }

    if matches!(field.control_type.as_str(), "number" | "tel") {
        let value = random_number();
        driver.clear(handle).await?;
        driver.type_text(handle, &value).await?;
        return Ok(format!("Number set {value} ({name})"));
    }

    if field.control_type.contains("email") || name.contains("email") {
        let value = if marker.is_some() {
            marker_text.clone()
        } else {
            random_email()
        };
        driver.clear(handle).await?;
        driver.type_text(handle, &value).await?;
        return Ok(format!("Email set {value} ({name})"));
    }

    if field.tag == "textarea" {
        let text = if marker.is_some() {
            marker_text
        } else {
            format!("Automated entry {}", random_string(10))
        };
        driver.clear(handle).await?;
        driver.type_text(handle, &text).await?;
        return Ok(format!("Textarea set ({name})"));
    }

    driver.clear(handle).await?;
    driver.type_text(handle, &marker_text).await?;
    Ok(format!("Text set {marker_text} ({name})"))
}

/// Second pass after a rejected submission: re-fills only fields whose
/// declared name/id carries a domain hint, with the marker.
pub async fn fill_likely_required<D: PageDriver>(
    driver: &D,
    fields: &[ElementRef],
    marker: &str,
) -> Vec<String> {
    let mut outcomes = Vec::new();
    for handle in fields {
        let Ok(field) = describe(driver, handle).await else {
            continue;
        };
        if REQUIRED_HINTS.iter().any(|h| field.label.contains(h)) {
            outcomes.push(fill(driver, handle, Some(marker)).await);
        }
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_number_stays_in_range() {
        for _ in 0..200 {
            let n: i32 = random_number().parse().unwrap();
            assert!((1..=999).contains(&n));
        }
    }

    #[test]
    fn random_email_is_syntactically_plausible() {
        let email = random_email();
        assert!(email.starts_with("test_"));
        assert!(email.ends_with("@example.com"));
    }

    #[test]
    fn today_is_iso_shaped() {
        let today = today_iso();
        assert_eq!(today.len(), 10);
        assert_eq!(today.as_bytes()[4], b'-');
        assert_eq!(today.as_bytes()[7], b'-');
    }
}
