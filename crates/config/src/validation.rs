//! Per-section validation

pub use crate::error::ValidationError;
use std::fmt::Display;

/// A top-level table of the config file
pub trait ConfigSection {
    /// Table name, also the prefix of every field path in its errors
    const NAME: &'static str;

    fn validate(&self) -> Result<(), Vec<ValidationError>>;
}

/// Accumulates problems for one section so all of them are reported at once
pub(crate) struct Checks {
    section: &'static str,
    errors: Vec<ValidationError>,
}

impl Checks {
    pub(crate) fn new(section: &'static str) -> Self {
        Self {
            section,
            errors: Vec::new(),
        }
    }

    pub(crate) fn require(&mut self, field: &str, ok: bool, message: impl Into<String>) -> &mut Self {
        if !ok {
            self.errors.push(ValidationError::new(
                format!("{}.{}", self.section, field),
                message,
            ));
        }
        self
    }

    /// Inclusive range check; NaN is rejected
    pub(crate) fn range<T>(&mut self, field: &str, value: T, min: T, max: T) -> &mut Self
    where
        T: PartialOrd + Display + Copy,
    {
        self.require(
            field,
            value >= min && value <= max,
            format!("must be between {} and {} (got {})", min, max, value),
        )
    }

    pub(crate) fn positive(&mut self, field: &str, value: f64) -> &mut Self {
        self.require(
            field,
            value.is_finite() && value > 0.0,
            format!("must be a positive number (got {})", value),
        )
    }

    pub(crate) fn not_empty(&mut self, field: &str, value: &str) -> &mut Self {
        self.require(field, !value.trim().is_empty(), "must not be empty")
    }

    pub(crate) fn finish(&mut self) -> Result<(), Vec<ValidationError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }
}
