//! Fatal error reporting
//!
//! Prints the top-level error after a red `Error:` prefix, then each cause
//! on its own indented line.

use console::style;

/// Lines describing an error and its causes, unstyled
pub fn format_error_chain(err: &anyhow::Error) -> Vec<String> {
    let mut chain = err.chain();
    let mut lines: Vec<String> = chain.next().map(ToString::to_string).into_iter().collect();
    lines.extend(chain.map(|cause| format!("  Caused by: {cause}")));
    lines
}

/// Print a fatal error and its cause chain to stderr
pub fn show_error(err: &anyhow::Error) {
    let mut lines = format_error_chain(err).into_iter();
    let top = lines.next().unwrap_or_default();
    eprintln!("{} {}", style("Error:").red().bold(), top);
    for line in lines {
        eprintln!("{}", style(line).dim());
    }
}
