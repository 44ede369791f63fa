//! convkit Units - Unit Conversion Engine
//!
//! Converts numeric values between units of one measurement category.
//! Proportional categories store one factor per unit relative to a reference
//! unit and convert with a ratio of ratios; temperature converts through
//! Celsius.
//!
//! Categories:
//! - Length (Meters, Kilometers, Centimeters, Millimeters, Feet, Inches)
//! - Temperature (Celsius, Fahrenheit, Kelvin)
//! - Weight (Kilograms, Grams, Pounds, Ounces)
//! - Time (Seconds, Minutes, Hours, Days)
//! - Speed (Meters per second, Kilometers per hour, Miles per hour)
//! - Data Storage (Bytes through Terabytes, binary prefixes)
//! - Area (Square meters, Square kilometers, Square feet, Square inches)
//! - Volume (Liters, Milliliters, Cubic meters, Cubic inches)
//! - Energy (Joules, Calories, Kilowatt-hours)

mod category;
mod engine;
mod temperature;
mod unit;
mod units;

pub use category::{Category, ConversionStrategy};
pub use convkit_core::ConversionError;
pub use engine::ConversionEngine;
pub use temperature::{TemperatureScale, KELVIN_OFFSET};
pub use unit::{UnitDef, UnitKind};
pub use units::{RegistryError, UnitRegistry, UNITS};

/// Categories in display order
pub fn list_categories() -> &'static [Category] {
    ConversionEngine::builtin().list_categories()
}

/// Unit names of a built-in category
pub fn list_units(category: &str) -> Result<Vec<&'static str>, ConversionError> {
    ConversionEngine::builtin().list_units(category)
}

/// Convert `value` between two units of a built-in category
pub fn convert(
    category: &str,
    from_unit: &str,
    to_unit: &str,
    value: f64,
) -> Result<f64, ConversionError> {
    ConversionEngine::builtin().convert(category, from_unit, to_unit, value)
}

/// Parse `text` and convert it
pub fn convert_text(
    category: &str,
    from_unit: &str,
    to_unit: &str,
    text: &str,
) -> Result<f64, ConversionError> {
    ConversionEngine::builtin().convert_text(category, from_unit, to_unit, text)
}
