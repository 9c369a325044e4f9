//! Identifiers of the books bundled with the app

use std::fmt;

/// A book resource shipped alongside the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BookResource {
    #[default]
    HappyPrince,
}

impl BookResource {
    /// Identifier used to locate the book record (`<identifier>.json`)
    pub fn identifier(&self) -> &'static str {
        match self {
            Self::HappyPrince => "the_happy_prince",
        }
    }
}

impl fmt::Display for BookResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}
