//! Temperature scales
//!
//! Temperature is affine, not proportional, so it cannot live in a ratio
//! table. Each scale defines a pair of formulas to and from Celsius, and every
//! pair of scales converts through Celsius.

use serde::Serialize;

/// A temperature scale with formulas relative to Celsius
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TemperatureScale {
    Celsius,
    Fahrenheit,
    Kelvin,
}

/// Offset between Kelvin and Celsius
pub const KELVIN_OFFSET: f64 = 273.15;

impl TemperatureScale {
    /// The scale every conversion passes through
    pub const INTERMEDIATE: TemperatureScale = TemperatureScale::Celsius;

    pub fn to_celsius(self, value: f64) -> f64 {
        match self {
            TemperatureScale::Celsius => value,
            TemperatureScale::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
            TemperatureScale::Kelvin => value - KELVIN_OFFSET,
        }
    }

    pub fn from_celsius(self, celsius: f64) -> f64 {
        match self {
            TemperatureScale::Celsius => celsius,
            TemperatureScale::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
            TemperatureScale::Kelvin => celsius + KELVIN_OFFSET,
        }
    }

    /// Convert a value on this scale to `target`
    pub fn convert(self, target: TemperatureScale, value: f64) -> f64 {
        if self == target {
            return value;
        }
        target.from_celsius(self.to_celsius(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TemperatureScale::*;

    #[test]
    fn test_celsius_to_fahrenheit() {
        assert_eq!(Celsius.convert(Fahrenheit, 0.0), 32.0);
        assert_eq!(Celsius.convert(Fahrenheit, 100.0), 212.0);
        assert_eq!(Celsius.convert(Fahrenheit, -40.0), -40.0);
    }

    #[test]
    fn test_celsius_to_kelvin() {
        assert_eq!(Celsius.convert(Kelvin, 0.0), 273.15);
    }

    #[test]
    fn test_kelvin_to_fahrenheit() {
        // Absolute zero
        let f = Kelvin.convert(Fahrenheit, 0.0);
        assert!((f - (-459.67)).abs() < 1e-9, "got {}", f);

        let k = Fahrenheit.convert(Kelvin, 212.0);
        assert!((k - 373.15).abs() < 1e-9, "got {}", k);
    }

    #[test]
    fn test_formula_pairs_invert() {
        for scale in [Celsius, Fahrenheit, Kelvin] {
            for x in [-273.15, -40.0, 0.0, 37.5, 1000.0] {
                let back = scale.from_celsius(scale.to_celsius(x));
                assert!((back - x).abs() <= 1e-9 * x.abs().max(1.0), "{:?} {}", scale, x);
            }
        }
    }

    #[test]
    fn test_same_scale_is_identity() {
        assert_eq!(Fahrenheit.convert(Fahrenheit, 98.6), 98.6);
    }
}
