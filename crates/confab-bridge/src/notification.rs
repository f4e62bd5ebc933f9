/// Severity of a user-visible notification, driving how the client presents
/// it.
#[derive(Debug, Clone)]
pub enum NotificationType {
    /// Neutral informational message.
    Info,
    /// A successful operation or positive outcome.
    Success,
    /// A non-critical issue the user should know about; normal operation
    /// continues.
    Warning,
    /// An error or failure that may affect functionality.
    Error,
}

/// A notification payload intended for the user.
#[derive(Debug, Clone)]
pub struct NotificationMessage {
    /// Severity of the notification.
    pub notification_type: NotificationType,
    /// The text content to display.
    pub message: String,
}
