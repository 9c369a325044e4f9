//! Common traits and helpers shared across domain models

/// Trait for types that can validate themselves
pub trait Validator {
    /// Validates the instance and returns errors if invalid
    fn validate(&self) -> Result<(), Vec<String>>;

    /// Returns true if the instance is valid
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Formats a number of seconds as `MM:SS`
///
/// Fractional seconds are truncated. Negative or non-finite input renders as `00:00`.
pub fn format_clock(seconds: f64) -> String {
    let whole = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    format!("{:02}:{:02}", whole / 60, whole % 60)
}
