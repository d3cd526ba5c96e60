// ============================================================================
// gpxstitch-core/src/notifications/ntfy.rs
// ============================================================================
//
// NTFY IMPLEMENTATION: Notification Delivery Using ntfy.sh
//
// This module sends run notifications to an ntfy topic, so a long batch on a
// laptop in the back of a van can report back to a phone.
//
// KEY COMPONENTS:
// - NtfyNotificationSender: Sends notifications to an ntfy server

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};
use crate::notifications::{NotificationSender, NotificationType};

// ---- External crate imports ----
use ntfy::DispatcherBuilder;
use ntfy::payload::{Payload, Priority as NtfyPriority};

// ============================================================================
// NTFY NOTIFICATION SENDER
// ============================================================================

/// Sends notifications to an ntfy server.
///
/// Uses the blocking dispatcher of the ntfy crate; the pipeline itself is
/// synchronous.
///
/// # Examples
///
/// ```rust,no_run
/// use gpxstitch_core::notifications::{
///     NotificationSender, NotificationType, NtfyNotificationSender,
/// };
/// use std::path::PathBuf;
///
/// let sender = NtfyNotificationSender::new("https://ntfy.sh/your_topic").unwrap();
/// let notification = NotificationType::RunError {
///     source_dir: PathBuf::from("/media/gopro/day4"),
///     message: "gpxmerge not found".to_string(),
/// };
/// sender.send_notification(&notification).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct NtfyNotificationSender {
    base_url: String,
    topic: String,
}

impl NtfyNotificationSender {
    /// Creates a sender from a full topic URL (e.g. "https://ntfy.sh/your_topic").
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotificationError` if the URL is not http(s), or
    /// its host or topic is empty.
    pub fn new(topic_url: &str) -> CoreResult<Self> {
        let invalid = |reason: &str| {
            CoreError::NotificationError(format!("Invalid ntfy topic URL '{}': {}", topic_url, reason))
        };

        let (scheme, after_scheme) = if let Some(rest) = topic_url.strip_prefix("https://") {
            ("https", rest)
        } else if let Some(rest) = topic_url.strip_prefix("http://") {
            ("http", rest)
        } else {
            return Err(invalid("must start with https:// or http://"));
        };

        let (host, topic) = after_scheme.split_once('/').unwrap_or((after_scheme, ""));
        if host.is_empty() {
            return Err(invalid("host is empty"));
        }
        let topic = topic.trim_end_matches('/');
        if topic.is_empty() {
            return Err(invalid("topic path is missing"));
        }

        Ok(Self {
            base_url: format!("{scheme}://{host}"),
            topic: topic.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

impl NotificationSender for NtfyNotificationSender {
    fn send_notification(&self, notification: &NotificationType) -> CoreResult<()> {
        let dispatcher = DispatcherBuilder::new(&self.base_url)
            .build_blocking()
            .map_err(|e| {
                CoreError::NotificationError(format!(
                    "Failed to build ntfy dispatcher for {}: {}",
                    self.base_url, e
                ))
            })?;

        let priority = map_priority(notification.get_priority()).unwrap_or_else(|| {
            log::warn!(
                "Invalid ntfy priority value provided: {}",
                notification.get_priority()
            );
            NtfyPriority::Default
        });

        let mut tags = vec!["gpxstitch".to_string()];
        match notification {
            NotificationType::RunComplete { .. } => tags.push("complete".to_string()),
            NotificationType::RunError { .. } => tags.push("error".to_string()),
        }

        let payload = Payload::new(&self.topic)
            .message(notification.get_message())
            .title(notification.get_title())
            .priority(priority)
            .tags(tags);

        dispatcher.send(&payload).map_err(|e| {
            CoreError::NotificationError(format!(
                "Failed to send ntfy notification to {}/{}: {}",
                self.base_url, self.topic, e
            ))
        })?;
        Ok(())
    }
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Maps a numeric priority (1-5) to the ntfy priority enum.
fn map_priority(p: u8) -> Option<NtfyPriority> {
    match p {
        1 => Some(NtfyPriority::Min),
        2 => Some(NtfyPriority::Low),
        3 => Some(NtfyPriority::Default),
        4 => Some(NtfyPriority::High),
        5 => Some(NtfyPriority::Max),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_url_is_split_into_server_and_topic() {
        let sender = NtfyNotificationSender::new("https://ntfy.sh/rides").unwrap();
        assert_eq!(sender.base_url(), "https://ntfy.sh");
        assert_eq!(sender.topic(), "rides");

        let local = NtfyNotificationSender::new("http://localhost:8080/gopro/").unwrap();
        assert_eq!(local.base_url(), "http://localhost:8080");
        assert_eq!(local.topic(), "gopro");
    }

    #[test]
    fn test_invalid_topic_urls() {
        for url in ["ntfy.sh/rides", "https://", "https:///rides", "https://ntfy.sh", "https://ntfy.sh/"] {
            assert!(
                matches!(NtfyNotificationSender::new(url), Err(CoreError::NotificationError(_))),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn test_map_priority() {
        assert!(matches!(map_priority(5), Some(NtfyPriority::Max)));
        assert!(map_priority(0).is_none());
        assert!(map_priority(6).is_none());
    }
}
