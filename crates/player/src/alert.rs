//! The single user-facing error message

/// Heading shown for every surfaced failure
pub const ALERT_TITLE: &str = "Something went wrong!";

/// Label of the only alert button, which dismisses it
pub const ALERT_DISMISS_LABEL: &str = "OK";

/// A presented error: fixed title plus the underlying detail text
///
/// Only one alert exists at a time. Setting a new one replaces the old.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertState {
    pub title: String,
    pub message: String,
}

impl AlertState {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            title: ALERT_TITLE.to_string(),
            message: message.into(),
        }
    }
}
