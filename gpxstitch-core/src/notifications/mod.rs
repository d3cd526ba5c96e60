//! Notification system for sending run status updates.
//!
//! Notifications go to an ntfy topic when one is configured.
mod abstraction;
mod ntfy;

pub use abstraction::{NotificationSender, NotificationType};
pub use ntfy::NtfyNotificationSender;
