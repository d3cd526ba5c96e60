// ============================================================================
// gpxstitch-cli/src/terminal.rs
// ============================================================================
//
// TERMINAL OUTPUT: Section Banners and Run Summary
//
// Progress goes through the logger; this module prints what the user reads
// at the end: a short summary of the run report on stdout.

// ---- External crate imports ----
use console::style;
use gpxstitch_core::RunReport;
use gpxstitch_core::format_duration;

// ---- Internal crate imports ----
use crate::logging::SECTION_TARGET;

// ---- Standard library imports ----
use std::path::Path;

/// Styling constants for terminal output
pub mod styling {
    pub const SUCCESS_SYMBOL: &str = "✓";
    pub const WARNING_SYMBOL: &str = "⚠";
    pub const ERROR_SYMBOL: &str = "✗";

    pub const SECTION_PREFIX: &str = "===== ";
    pub const SECTION_SUFFIX: &str = " =====";

    pub const STATUS_INDENT: &str = "  ";
}

/// Formats a section banner.
pub fn section(title: &str) -> String {
    format!(
        "{}{}{}",
        styling::SECTION_PREFIX,
        title.to_uppercase(),
        styling::SECTION_SUFFIX
    )
}

/// Logs a section banner so it lands on the console and in the log file.
pub fn print_section(title: &str) {
    log::info!(target: SECTION_TARGET, "{}", section(title));
}

/// Lines of the end-of-run summary, unstyled.
pub fn summary_lines(report: &RunReport, log_path: Option<&Path>) -> Vec<String> {
    let indent = styling::STATUS_INDENT;
    let mut lines = Vec::new();

    if !report.clips.is_empty() {
        lines.push(format!("{indent}Clips extracted: {}", report.clips.len()));
    }
    lines.push(format!(
        "{indent}Links:           {} ({} new)",
        report.links.len(),
        report.new_link_count()
    ));
    for link in &report.links {
        lines.push(format!(
            "{indent}{indent}{} {} -> {} ({} points)",
            link.name, link.from, link.to, link.points
        ));
    }

    let warnings: Vec<_> = report.warnings().collect();
    if !warnings.is_empty() {
        lines.push(format!("{indent}Gaps left open:  {}", warnings.len()));
        for skip in warnings {
            lines.push(format!(
                "{indent}{indent}{} {}: {}",
                styling::WARNING_SYMBOL,
                skip.link.as_deref().unwrap_or(&skip.track),
                skip.reason
            ));
        }
    }

    if let Some(final_track) = &report.final_track {
        lines.push(format!("{indent}Final track:     {}", final_track.display()));
    }
    lines.push(format!("{indent}Elapsed:         {}", format_duration(report.elapsed())));
    if let Some(path) = log_path {
        lines.push(format!("{indent}Log file:        {}", path.display()));
    }
    lines
}

/// Prints the end-of-run summary to stdout.
pub fn print_summary(report: &RunReport, log_path: Option<&Path>) {
    let open_gaps = report.warnings().count();
    let headline = if open_gaps == 0 {
        style(format!("{} Route complete", styling::SUCCESS_SYMBOL)).green().bold()
    } else {
        style(format!(
            "{} Route complete with {} open gap(s)",
            styling::WARNING_SYMBOL,
            open_gaps
        ))
        .yellow()
        .bold()
    };

    println!();
    println!("{}", headline);
    for line in summary_lines(report, log_path) {
        println!("{}", line);
    }
}

/// Prints a fatal error to stderr.
pub fn print_error(message: &str) {
    eprintln!(
        "{} {}",
        style(format!("{} Error:", styling::ERROR_SYMBOL)).red().bold(),
        message
    );
}
