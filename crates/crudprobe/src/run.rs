// Run loop: login, module iteration, final report
//
// Modules are independent: each failure is contained at the module
// boundary and the loop moves on. Only login failure aborts a run,
// since nothing downstream is meaningful without a session.

use crate::action::{self, intent};
use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::filler;
use crate::orchestrator::run_module_pass;
use crate::outcome::{ArtifactSink, Outcome, ResultSink, Status, capture};
use crate::resilience::{DEFAULT_RELOAD_ATTEMPTS, ensure_page_usable, settle};
use crudprobe_driver::{Locator, PageDriver};

const LOGIN_ATTEMPTS: u32 = 3;

/// Aggregate verdict of a completed run.
///
/// A summary exists only when login succeeded; a failed login surfaces
/// as [`Error::LoginFailed`] instead.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub info: usize,
    pub modules_attempted: usize,
    pub screenshots: u64,
}

impl RunSummary {
    /// Fraction of judged checks (PASS + FAIL) that passed. INFO
    /// records are observations, not judgments, and are excluded.
    pub fn success_rate(&self) -> f64 {
        let judged = self.passed + self.failed;
        if judged == 0 {
            0.0
        } else {
            self.passed as f64 / judged as f64
        }
    }
}

/// Authenticates against the target's login page.
///
/// Submits credentials up to three times, reloading between attempts;
/// success means the post-submit URL contains the configured hint.
pub async fn login<D: PageDriver>(
    driver: &D,
    config: &RunConfig,
    results: &mut dyn ResultSink,
    artifacts: &mut dyn ArtifactSink,
) -> Result<()> {
    driver.navigate(&config.login_url).await?;
    settle(config.timing.settle_long()).await;
    ensure_page_usable(driver, &config.timing, DEFAULT_RELOAD_ATTEMPTS).await;

    for attempt in 1..=LOGIN_ATTEMPTS {
        tracing::debug!(attempt, "login attempt");
        if submit_credentials(driver, config).await {
            settle(config.timing.settle_long()).await;
            ensure_page_usable(driver, &config.timing, DEFAULT_RELOAD_ATTEMPTS).await;
            let url = driver.current_url().await.unwrap_or_default();
            if url.to_lowercase().contains(&config.success_url_hint.to_lowercase()) {
                let ss = capture(driver, artifacts, "Login_Success").await;
                results.record(
                    Outcome::new("Login", "Authentication", "Login", Status::Pass, &url)
                        .expected("Redirect to authenticated area")
                        .artifact(&ss),
                );
                return Ok(());
            }
            tracing::debug!(attempt, url, "post-login URL missed the success hint");
        }
        if attempt < LOGIN_ATTEMPTS {
            let _ = driver.navigate(&config.login_url).await;
            settle(config.timing.settle_long()).await;
            ensure_page_usable(driver, &config.timing, DEFAULT_RELOAD_ATTEMPTS).await;
        }
    }

    let ss = capture(driver, artifacts, "Login_Failed").await;
    results.record(
        Outcome::new(
            "Login",
            "Authentication",
            "Login",
            Status::Fail,
            &format!("Credentials rejected after {LOGIN_ATTEMPTS} attempts"),
        )
        .expected("Redirect to authenticated area")
        .artifact(&ss),
    );
    Err(Error::LoginFailed {
        attempts: LOGIN_ATTEMPTS,
    })
}

/// Fills the email and password fields and submits. Returns `false`
/// when either field is missing on the current page.
async fn submit_credentials<D: PageDriver>(driver: &D, config: &RunConfig) -> bool {
    let Ok(controls) = driver.find(Locator::FormControls).await else {
        return false;
    };

    let mut email_field = None;
    let mut password_field = None;
    let mut first_text = None;
    for control in &controls {
        let Ok(field) = filler::describe(driver, control).await else {
            continue;
        };
        if field.control_type == "password" && password_field.is_none() {
            password_field = Some(*control);
        } else if (field.control_type == "email" || field.label.contains("email"))
            && email_field.is_none()
        {
            email_field = Some(*control);
        } else if matches!(field.control_type.as_str(), "" | "text") && first_text.is_none() {
            first_text = Some(*control);
        }
    }
    // Some login pages use a plain text input for the account name.
    let email_field = email_field.or(first_text);

    let (Some(email), Some(password)) = (email_field, password_field) else {
        tracing::debug!("login form fields not found on current page");
        return false;
    };

    let typed = async {
        driver.clear(&email).await?;
        driver.type_text(&email, &config.email).await?;
        driver.clear(&password).await?;
        driver.type_text(&password, &config.password).await
    }
    .await;
    if typed.is_err() {
        return false;
    }

    if action::click_best_match(driver, &config.timing, intent::LOGIN).await.is_none() {
        // No recognizable submit control; Enter in the password field
        // usually submits the form anyway.
        if driver.press_enter(&password).await.is_err() {
            return false;
        }
        settle(config.timing.settle_short()).await;
    }
    true
}

/// Runs the full suite: login, then one pass per configured module,
/// then the report export.
///
/// A module whose pass errors is recorded as a critical failure and
/// its stray browsing context reclaimed; the next module starts from
/// the primary context either way.
pub async fn run_suite<D: PageDriver>(
    driver: &D,
    config: &RunConfig,
    results: &mut dyn ResultSink,
    artifacts: &mut dyn ArtifactSink,
) -> Result<RunSummary> {
    login(driver, config, results, artifacts).await?;

    for module in &config.modules {
        println!("\n{}", "=".repeat(50));
        println!("  MODULE: {}", module.name);
        println!("{}", "=".repeat(50));
        match run_module_pass(driver, &config.timing, results, artifacts, module).await {
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(module = %module.name, error = %e, "module pass aborted");
                results.record(Outcome::new(
                    &module.name,
                    "General",
                    "Critical Error",
                    Status::Fail,
                    &e.to_string(),
                ));
                reclaim_contexts(driver).await;
            }
        }
    }

    results.export(&config.report_path)?;

    let (passed, failed, info) = results.counts();
    let summary = RunSummary {
        passed,
        failed,
        info,
        modules_attempted: config.modules.len(),
        screenshots: artifacts.count(),
    };
    println!("\n{}", "=".repeat(50));
    println!("  RUN COMPLETE");
    println!(
        "  Passed: {}  Failed: {}  Info: {}",
        summary.passed, summary.failed, summary.info
    );
    println!("  Success rate: {:.1}%", summary.success_rate() * 100.0);
    println!("  Screenshots: {}", summary.screenshots);
    println!("  Report: {}", config.report_path.display());
    println!("{}", "=".repeat(50));
    Ok(summary)
}

/// Best-effort teardown of contexts a failed pass left open. The
/// primary context always survives.
async fn reclaim_contexts<D: PageDriver>(driver: &D) {
    while let Ok(n) = driver.context_count().await {
        if n <= 1 {
            break;
        }
        if driver.switch_context(n - 1).await.is_err() || driver.close_context().await.is_err() {
            break;
        }
    }
    let _ = driver.switch_context(0).await;
}

/// Convenience wrapper wiring the default sinks to a config.
pub async fn run_with_defaults<D: PageDriver>(driver: &D, config: &RunConfig) -> Result<RunSummary> {
    let mut results = crate::outcome::CsvReporter::new();
    let mut artifacts = crate::outcome::ScreenshotStore::new(&config.screenshot_dir);
    run_suite(driver, config, &mut results, &mut artifacts).await
}
