//! Diagnostics for skipped and completed updates
//!
//! Skip notices go to stderr so deployment scripts can keep stdout clean;
//! they are informational and never change the exit code.

use std::path::Path;

use console::style;
use ssh_host_update_core::PendingWrite;

/// Message for a config file that does not exist
pub fn config_missing_message(path: &Path) -> String {
    format!(
        "ssh config file not found at {}, skipping update",
        path.display()
    )
}

/// Message for a key no host block matched
pub fn host_not_found_message(key: &str) -> String {
    format!("host {key} not found in ssh config file, skipping update")
}

/// Print a non-fatal skip notice to stderr
pub fn show_skip(message: &str) {
    eprintln!("{} {}", style("Skipped:").yellow(), message);
}

/// Print the result of a committed update
pub fn show_updated(key: &str, pending: &PendingWrite) {
    println!(
        "{} Host '{}' updated in {}",
        style("Updated:").green(),
        style(key).cyan(),
        style(pending.path.display()).yellow()
    );
    println!(
        "  {} {} value(s) across {} block(s)",
        style("Changed:").dim(),
        pending.summary.changed_values,
        pending.summary.matched_blocks
    );
}
