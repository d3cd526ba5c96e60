// ============================================================================
// gpxstitch-core/src/notifications/abstraction.rs
// ============================================================================
//
// NOTIFICATION ABSTRACTION: Run Status Messages
//
// This module defines the notifications a run can emit and the trait a
// backend implements to deliver them.
//
// KEY COMPONENTS:
// - NotificationType: Enum of notification kinds
// - NotificationSender: Trait for delivering notifications

// ---- Internal crate imports ----
use crate::error::CoreResult;
use crate::report::RunReport;
use crate::utils::format_duration;

// ---- Standard library imports ----
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// NOTIFICATION TYPES
// ============================================================================

/// Represents the notifications that can be sent for a run.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationType {
    /// A run finished, possibly with unbridged gaps
    RunComplete {
        /// Directory holding the clips
        source_dir: PathBuf,
        /// Number of clips extracted in this run
        clips: usize,
        /// Number of connectors in the final route
        links: usize,
        /// Number of gaps left open because routing failed
        unbridged: usize,
        /// Total run time
        duration: Duration,
    },

    /// A run stopped on a fatal error
    RunError {
        /// Directory holding the clips
        source_dir: PathBuf,
        /// Error message
        message: String,
    },
}

impl NotificationType {
    /// Builds a completion notification from a finished report.
    pub fn from_report(report: &RunReport) -> Self {
        NotificationType::RunComplete {
            source_dir: report.source_dir.clone(),
            clips: report.clips.len(),
            links: report.links.len(),
            unbridged: report.warnings().count(),
            duration: report.elapsed(),
        }
    }

    /// Gets the title for this notification type.
    pub fn get_title(&self) -> String {
        match self {
            NotificationType::RunComplete { unbridged: 0, .. } => "Route Complete".to_string(),
            NotificationType::RunComplete { .. } => "Route Complete With Gaps".to_string(),
            NotificationType::RunError { .. } => "Route Failed".to_string(),
        }
    }

    /// Gets the message body for this notification type.
    pub fn get_message(&self) -> String {
        match self {
            NotificationType::RunComplete {
                source_dir,
                clips,
                links,
                unbridged,
                duration,
            } => {
                let mut message = format!(
                    "Stitched {} in {}: {} clip(s), {} link(s)",
                    dir_label(source_dir),
                    format_duration(*duration),
                    clips,
                    links
                );
                if *unbridged > 0 {
                    message.push_str(&format!(", {} gap(s) left open", unbridged));
                }
                message
            }
            NotificationType::RunError {
                source_dir,
                message,
            } => format!("Error stitching {}: {}", dir_label(source_dir), message),
        }
    }

    /// Gets the priority level for this notification type (1-5, 5 highest).
    pub fn get_priority(&self) -> u8 {
        match self {
            NotificationType::RunComplete { unbridged: 0, .. } => 3,
            NotificationType::RunComplete { .. } => 4,
            NotificationType::RunError { .. } => 5,
        }
    }
}

fn dir_label(dir: &std::path::Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| dir.to_string_lossy().to_string())
}

// ============================================================================
// NOTIFICATION SENDER
// ============================================================================

/// Trait for delivering notifications to a backend.
pub trait NotificationSender {
    fn send_notification(&self, notification: &NotificationType) -> CoreResult<()>;
}
