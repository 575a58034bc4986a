//! Metrics collection.
//!
//! # Metrics
//! - `plinth_config_edits_total` (counter): edit sessions by outcome
//! - `plinth_service_restarts_total` (counter): restarts by service, outcome
//! - `plinth_module_actions_total` (counter): module operations by module,
//!   action, outcome

use metrics::counter;

/// Record the end of an edit session (`committed` or `discarded`).
pub fn record_config_edit(outcome: &'static str) {
    counter!("plinth_config_edits_total", "outcome" => outcome).increment(1);
}

/// Record a dependent service restart attempt.
pub fn record_restart(service: &str, success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!(
        "plinth_service_restarts_total",
        "service" => service.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a module lifecycle operation (setup, enable, disable).
pub fn record_module_action(module: &'static str, action: &'static str, success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!(
        "plinth_module_actions_total",
        "module" => module,
        "action" => action,
        "outcome" => outcome
    )
    .increment(1);
}
