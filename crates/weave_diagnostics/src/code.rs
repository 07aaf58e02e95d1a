//! Diagnostic codes with category prefixes for structured error identification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The category of a diagnostic code, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Error diagnostics, prefixed with `E`.
    Error,
    /// Warning diagnostics, prefixed with `W`.
    Warning,
    /// Informational diagnostics, prefixed with `N`.
    Note,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
            Category::Note => 'N',
        }
    }

    /// Returns the category for a prefix character, if any.
    pub fn from_prefix(c: char) -> Option<Self> {
        match c {
            'E' => Some(Category::Error),
            'W' => Some(Category::Warning),
            'N' => Some(Category::Note),
            _ => None,
        }
    }
}

/// A structured diagnostic code combining a category prefix and a numeric identifier.
///
/// Displayed as the category prefix followed by a zero-padded 3-digit number,
/// e.g., `E300`, `W301`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

/// The error returned when a string is not a valid diagnostic code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCodeError(pub String);

impl fmt::Display for ParseCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid diagnostic code '{}'", self.0)
    }
}

impl std::error::Error for ParseCodeError {}

impl FromStr for DiagnosticCode {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCodeError(s.to_string());
        let mut chars = s.chars();
        let category = chars.next().and_then(Category::from_prefix).ok_or_else(err)?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(err());
        }
        let number = digits.parse::<u16>().map_err(|_| err())?;
        Ok(Self { category, number })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_prefixes() {
        assert_eq!(Category::Error.prefix(), 'E');
        assert_eq!(Category::Warning.prefix(), 'W');
        assert_eq!(Category::Note.prefix(), 'N');
        assert_eq!(Category::from_prefix('W'), Some(Category::Warning));
        assert_eq!(Category::from_prefix('X'), None);
    }

    #[test]
    fn display_format() {
        let code = DiagnosticCode::new(Category::Error, 300);
        assert_eq!(format!("{code}"), "E300");

        let code = DiagnosticCode::new(Category::Warning, 3);
        assert_eq!(format!("{code}"), "W003");
    }

    #[test]
    fn parse_valid() {
        let code: DiagnosticCode = "W301".parse().unwrap();
        assert_eq!(code, DiagnosticCode::new(Category::Warning, 301));
        let code: DiagnosticCode = "E007".parse().unwrap();
        assert_eq!(code.number, 7);
    }

    #[test]
    fn parse_invalid() {
        assert!("".parse::<DiagnosticCode>().is_err());
        assert!("W".parse::<DiagnosticCode>().is_err());
        assert!("X300".parse::<DiagnosticCode>().is_err());
        assert!("W30a".parse::<DiagnosticCode>().is_err());
        assert!("W+30".parse::<DiagnosticCode>().is_err());
        assert_eq!(
            "Q1".parse::<DiagnosticCode>().unwrap_err().to_string(),
            "invalid diagnostic code 'Q1'"
        );
    }
}
