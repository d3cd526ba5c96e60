//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of one subcommand. They share
//! the setup and reporting helpers below.

pub mod merge;
pub mod run;
pub mod stitch;

use crate::cli::CommonArgs;
use crate::config::{log_dir, resolve_source};
use crate::error::CliResult;
use crate::logging::init_logging;
use crate::terminal;

use gpxstitch_core::notifications::{
    NotificationSender, NotificationType, NtfyNotificationSender,
};
use gpxstitch_core::{CoreConfig, CoreResult, RunReport};

use log::{error, info, warn};

use std::path::PathBuf;

/// Resolves the source directory, installs logging, and builds the config.
///
/// The source is checked before logging starts so a mistyped path never
/// gets a `logs/` directory created under it.
pub fn prepare<F>(common: &CommonArgs, verbose: bool, build: F) -> CliResult<(CoreConfig, PathBuf)>
where
    F: FnOnce(PathBuf) -> CliResult<CoreConfig>,
{
    let source = resolve_source(common)?;
    let log_path = init_logging(&log_dir(common, &source), verbose)?;

    info!("gpxstitch run started: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    info!("Source directory: {}", source.display());
    info!("Log file: {}", log_path.display());

    let config = build(source)?;
    Ok((config, log_path))
}

/// Runs a pipeline entry point and handles its report.
///
/// On success the report is written as JSON, summarized on stdout, and a
/// completion notification is sent. On failure an error notification is
/// sent and the error returned.
pub fn execute<F>(config: &CoreConfig, log_path: &std::path::Path, pipeline: F) -> CliResult<()>
where
    F: FnOnce(&CoreConfig) -> CoreResult<RunReport>,
{
    match pipeline(config) {
        Ok(report) => {
            let report_path = config.report_path();
            match report.write_json(&report_path) {
                Ok(()) => info!("Run report: {}", report_path.display()),
                Err(e) => warn!("Could not write run report {}: {}", report_path.display(), e),
            }

            terminal::print_summary(&report, Some(log_path));
            notify(config, &NotificationType::from_report(&report));
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            notify(
                config,
                &NotificationType::RunError {
                    source_dir: config.source_dir.clone(),
                    message: e.to_string(),
                },
            );
            Err(e)
        }
    }
}

/// Sends a notification if a topic is configured. Delivery failures are
/// logged and otherwise ignored.
pub fn notify(config: &CoreConfig, notification: &NotificationType) {
    let Some(topic) = config.ntfy_topic.as_deref() else {
        return;
    };

    let result = NtfyNotificationSender::new(topic)
        .and_then(|sender| sender.send_notification(notification));
    if let Err(e) = result {
        warn!("Failed to send notification: {}", e);
    }
}
