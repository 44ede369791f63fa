//! Input parsing and result formatting
//!
//! The engine works on finite `f64` values only. Callers holding raw user text
//! go through [`parse_value`]; callers displaying a result go through
//! [`format_fixed`]. Neither rounds the numbers the engine sees.

use crate::ConversionError;

/// Decimal places used when the caller does not ask for any
pub const DEFAULT_DECIMALS: usize = 2;

/// Largest number of decimal places [`format_fixed`] will render
pub const MAX_DECIMALS: usize = 15;

/// Parse user text into a finite number
///
/// Accepts plain decimals and scientific notation ("12", "-3.5", "1e3").
/// Empty input, garbage ("abc") and non-finite spellings ("NaN", "inf")
/// are all `InvalidValue`; nothing silently becomes zero.
pub fn parse_value(text: &str) -> Result<f64, ConversionError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ConversionError::invalid_value("empty input"));
    }

    let value: f64 = trimmed
        .parse()
        .map_err(|_| ConversionError::invalid_value(format!("'{}' is not a number", trimmed)))?;

    ensure_finite(value)
}

/// Reject NaN and infinities
pub fn ensure_finite(value: f64) -> Result<f64, ConversionError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConversionError::invalid_value(format!("{} is not a finite number", value)))
    }
}

/// Format a result with a fixed number of decimal places
///
/// Negative zero after rounding prints as zero ("-0.001" at 2 places is "0.00").
pub fn format_fixed(value: f64, decimals: usize) -> String {
    let decimals = decimals.min(MAX_DECIMALS);
    let text = format!("{:.*}", decimals, value);
    match text.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
        _ => text,
    }
}

/// Format a value the way a user typed it: shortest round-trip form
pub fn format_plain(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}
