// ============================================================================
// gpxstitch-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: Console and Per-Run Log File
//
// The core library logs through the `log` facade. This module installs a fern
// dispatcher with two outputs:
// - the console (stderr), at info level or debug with --verbose
// - a timestamped file `gpxstitch_run_<YYYYMMDD_HHMMSS>.log`, always at debug
//
// HTTP client internals are capped at warn so request plumbing does not
// drown the pipeline's own messages.

// ---- Internal crate imports ----
use crate::error::{CliErrorContext, CliResult};

// ---- External crate imports ----
use console::style;
use gpxstitch_core::CoreError;
use log::{Level, LevelFilter};

// ---- Standard library imports ----
use std::path::{Path, PathBuf};

/// Log target of section banners. Only the console dispatch styles them.
pub const SECTION_TARGET: &str = "gpxstitch::section";

/// Console rendering of a record: level prefixes and banner colors.
pub fn console_line(level: Level, target: &str, message: &str) -> String {
    match level {
        Level::Error => format!("{} {}", style("error:").red().bold(), message),
        Level::Warn => format!("{} {}", style("warning:").yellow().bold(), message),
        Level::Info if target == SECTION_TARGET => style(message).cyan().bold().to_string(),
        Level::Info => message.to_string(),
        _ => style(message).dim().to_string(),
    }
}

/// Log file rendering of a record. Always plain text.
pub fn file_line(level: Level, target: &str, message: &str) -> String {
    format!(
        "{} [{:<5}] {}: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        level,
        target,
        message
    )
}

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// File name of the log for a run started now.
pub fn log_file_name() -> String {
    format!("gpxstitch_run_{}.log", get_timestamp())
}

/// Installs the global logger and returns the path of the run's log file.
pub fn init_logging(log_dir: &Path, verbose: bool) -> CliResult<PathBuf> {
    std::fs::create_dir_all(log_dir)
        .cli_with_context(|| format!("Failed to create log directory '{}'", log_dir.display()))?;

    let log_path = log_dir.join(log_file_name());
    let log_file = fern::log_file(&log_path)
        .cli_with_context(|| format!("Failed to create log file '{}'", log_path.display()))?;

    let console_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let console = fern::Dispatch::new()
        .level(console_level)
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}",
                console_line(record.level(), record.target(), &message.to_string())
            ))
        })
        .chain(std::io::stderr());

    let file = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}",
                file_line(record.level(), record.target(), &message.to_string())
            ))
        })
        .chain(log_file);

    fern::Dispatch::new()
        .level(LevelFilter::Debug)
        .level_for("reqwest", LevelFilter::Warn)
        .level_for("hyper", LevelFilter::Warn)
        .level_for("hyper_util", LevelFilter::Warn)
        .level_for("rustls", LevelFilter::Warn)
        .level_for("ffmpeg_sidecar", LevelFilter::Info)
        .chain(console)
        .chain(file)
        .apply()
        .map_err(|e| CoreError::OperationFailed(format!("Failed to initialise logging: {}", e)))?;

    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_banner_is_styled_on_console_only() {
        console::set_colors_enabled(true);
        let banner = crate::terminal::section("Merge");

        let console = console_line(Level::Info, SECTION_TARGET, &banner);
        assert!(console.contains('\u{1b}'));
        assert!(console.contains("MERGE"));

        let file = file_line(Level::Info, SECTION_TARGET, &banner);
        assert!(!file.contains('\u{1b}'));
        assert!(file.ends_with(&format!("[INFO ] {SECTION_TARGET}: {banner}")));
    }

    #[test]
    fn test_log_file_name_format() {
        let name = log_file_name();
        assert!(name.starts_with("gpxstitch_run_"));
        assert!(name.ends_with(".log"));
        // gpxstitch_run_ + YYYYMMDD_HHMMSS + .log
        assert_eq!(name.len(), "gpxstitch_run_".len() + 15 + ".log".len());
    }
}
