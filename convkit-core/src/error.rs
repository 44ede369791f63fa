//! Conversion errors
//!
//! Every failure the engine can report is one of four variants. Errors are
//! plain values returned synchronously; nothing is retried and nothing is logged.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const UNKNOWN_CATEGORY: &str = "UNKNOWN_CATEGORY";
    pub const UNKNOWN_UNIT: &str = "UNKNOWN_UNIT";
    pub const UNSUPPORTED_CONVERSION: &str = "UNSUPPORTED_CONVERSION";
    pub const INVALID_VALUE: &str = "INVALID_VALUE";
}

/// Error returned by category lookup, unit lookup and conversion
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("unknown unit '{unit}' for category {category}")]
    UnknownUnit { unit: String, category: String },

    #[error("no conversion path from {from} to {to} in category {category}")]
    UnsupportedConversion {
        category: String,
        from: String,
        to: String,
    },

    #[error("invalid value: {0}")]
    InvalidValue(String),
}

impl ConversionError {
    pub fn unknown_category(name: impl Into<String>) -> Self {
        Self::UnknownCategory(name.into())
    }

    pub fn unknown_unit(unit: impl Into<String>, category: impl Into<String>) -> Self {
        Self::UnknownUnit {
            unit: unit.into(),
            category: category.into(),
        }
    }

    pub fn unsupported(
        category: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self::UnsupportedConversion {
            category: category.into(),
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn invalid_value(details: impl Into<String>) -> Self {
        Self::InvalidValue(details.into())
    }

    /// Machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownCategory(_) => codes::UNKNOWN_CATEGORY,
            Self::UnknownUnit { .. } => codes::UNKNOWN_UNIT,
            Self::UnsupportedConversion { .. } => codes::UNSUPPORTED_CONVERSION,
            Self::InvalidValue(_) => codes::INVALID_VALUE,
        }
    }

    /// Suggestion for fixing the error
    pub fn suggestion(&self) -> String {
        match self {
            Self::UnknownCategory(_) => {
                "Use list_categories() to see the supported categories".to_string()
            }
            Self::UnknownUnit { category, .. } => {
                format!("Use list_units('{}') to see the units of this category", category)
            }
            Self::UnsupportedConversion { .. } => {
                "The unit table for this category is incomplete, please report it".to_string()
            }
            Self::InvalidValue(_) => "Enter a finite decimal number such as 12.5".to_string(),
        }
    }

    /// Structured form of this error for callers that serialize it
    pub fn report(&self) -> ErrorReport {
        ErrorReport::from(self)
    }
}

/// Structured error handed to callers (UI, tool server)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ErrorReport {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.code,
            "message": self.message,
            "suggestion": self.suggestion,
        })
    }
}

impl From<&ConversionError> for ErrorReport {
    fn from(err: &ConversionError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
            suggestion: Some(err.suggestion()),
        }
    }
}

impl std::fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(ConversionError::unknown_category("x").code(), codes::UNKNOWN_CATEGORY);
        assert_eq!(ConversionError::unknown_unit("Kelvin", "Length").code(), codes::UNKNOWN_UNIT);
        assert_eq!(
            ConversionError::unsupported("Length", "Meters", "Feet").code(),
            codes::UNSUPPORTED_CONVERSION
        );
        assert_eq!(ConversionError::invalid_value("abc").code(), codes::INVALID_VALUE);
    }

    #[test]
    fn test_display() {
        let err = ConversionError::unknown_unit("Kelvin", "Length");
        assert_eq!(err.to_string(), "unknown unit 'Kelvin' for category Length");
    }

    #[test]
    fn test_report() {
        let report = ConversionError::unknown_category("Colour").report();
        assert_eq!(report.code, "UNKNOWN_CATEGORY");
        assert_eq!(report.message, "unknown category: Colour");
        assert!(report.suggestion.is_some());

        let display = format!("{}", report);
        assert!(display.starts_with("[UNKNOWN_CATEGORY]"));
    }

    #[test]
    fn test_report_json() {
        let report = ConversionError::invalid_value("abc").report();
        let json = report.to_json();
        assert_eq!(json["code"], "INVALID_VALUE");
        assert_eq!(json["message"], "invalid value: abc");
    }
}
