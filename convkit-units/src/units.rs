//! Unit definitions - the built-in tables, organized by category

use std::collections::HashMap;
use std::sync::LazyLock;

use convkit_core::ConversionError;
use thiserror::Error;

use crate::{Category, ConversionStrategy, TemperatureScale, UnitDef, UnitKind};

/// Global unit registry
pub static UNITS: LazyLock<UnitRegistry> = LazyLock::new(UnitRegistry::new);

/// Bytes per kilobyte (binary prefixes)
const KIB: f64 = 1024.0;

/// Joules per thermochemical calorie
const JOULES_PER_CALORIE: f64 = 4.184;

/// Joules per kilowatt-hour
const JOULES_PER_KWH: f64 = 3_600_000.0;

/// Rejected registration of a custom unit
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("'{spelling}' is already used by {existing} ({category})")]
    DuplicateSpelling {
        spelling: String,
        existing: String,
        category: Category,
    },

    #[error("{name} has factor {factor}; factors must be finite and positive")]
    InvalidFactor { name: String, factor: f64 },

    #[error("{name} would be a second reference unit in {category} (already {existing})")]
    DuplicateReference {
        name: String,
        existing: String,
        category: Category,
    },

    #[error("{name} does not use the {category} conversion strategy")]
    KindMismatch { name: String, category: Category },
}

/// Registry of all known units
///
/// Units keep their registration order inside a category; that order is what
/// `list_units` returns. Every name, symbol and alias resolves to one unit
/// across the whole registry.
#[derive(Debug, Clone, Default)]
pub struct UnitRegistry {
    units: Vec<UnitDef>,
    by_category: HashMap<Category, Vec<usize>>,
    lookup: HashMap<String, usize>,
}

impl UnitRegistry {
    /// Registry with every built-in table
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_all_units();
        registry
    }

    /// Registry with no units at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add a custom unit
    ///
    /// Fails if any of its spellings is already taken, in any category, if
    /// its kind does not fit the category, if a ratio factor is zero, negative
    /// or not finite, or if it would be a second reference unit.
    pub fn register(&mut self, unit: UnitDef) -> Result<(), RegistryError> {
        let strategy = match unit.kind {
            UnitKind::Ratio(_) => ConversionStrategy::Ratio,
            UnitKind::Formula(_) => ConversionStrategy::Formula,
        };
        if strategy != unit.category.strategy() {
            return Err(RegistryError::KindMismatch {
                name: unit.name.to_string(),
                category: unit.category,
            });
        }

        if let UnitKind::Ratio(factor) = unit.kind {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(RegistryError::InvalidFactor {
                    name: unit.name.to_string(),
                    factor,
                });
            }
        }

        if unit.is_reference() {
            let existing = self
                .units_of(unit.category)
                .into_iter()
                .find(|u| u.is_reference());
            if let Some(existing) = existing {
                return Err(RegistryError::DuplicateReference {
                    name: unit.name.to_string(),
                    existing: existing.name.to_string(),
                    category: unit.category,
                });
            }
        }

        for spelling in unit.spellings() {
            if let Some(&index) = self.lookup.get(&normalize(spelling)) {
                let existing = &self.units[index];
                return Err(RegistryError::DuplicateSpelling {
                    spelling: spelling.to_string(),
                    existing: existing.name.to_string(),
                    category: existing.category,
                });
            }
        }
        self.insert(unit);
        Ok(())
    }

    /// Get a unit by name, symbol or alias, in any category
    pub fn get(&self, name: &str) -> Option<&UnitDef> {
        self.lookup.get(&normalize(name)).map(|&index| &self.units[index])
    }

    /// Get a unit that must belong to `category`
    pub fn resolve(&self, category: Category, name: &str) -> Result<&UnitDef, ConversionError> {
        match self.get(name) {
            Some(unit) if unit.category == category => Ok(unit),
            _ => Err(ConversionError::unknown_unit(name.trim(), category.name())),
        }
    }

    /// Units of a category in registration order
    pub fn units_of(&self, category: Category) -> Vec<&UnitDef> {
        self.by_category
            .get(&category)
            .map(|indices| indices.iter().map(|&i| &self.units[i]).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    fn insert(&mut self, unit: UnitDef) {
        let index = self.units.len();
        for spelling in unit.spellings() {
            self.lookup.insert(normalize(spelling), index);
        }
        self.by_category.entry(unit.category).or_default().push(index);
        self.units.push(unit);
    }

    fn register_all_units(&mut self) {
        self.register_length_units();
        self.register_temperature_units();
        self.register_weight_units();
        self.register_time_units();
        self.register_speed_units();
        self.register_data_units();
        self.register_area_units();
        self.register_volume_units();
        self.register_energy_units();
    }

    fn register_length_units(&mut self) {
        use Category::Length;
        self.insert(
            UnitDef::ratio("Meters", "m", Length, 1.0).with_aliases(&["meter", "metre", "metres"]),
        );
        self.insert(
            UnitDef::ratio("Kilometers", "km", Length, 0.001)
                .with_aliases(&["kilometer", "kilometre"]),
        );
        self.insert(
            UnitDef::ratio("Centimeters", "cm", Length, 100.0).with_aliases(&["centimeter"]),
        );
        self.insert(
            UnitDef::ratio("Millimeters", "mm", Length, 1000.0).with_aliases(&["millimeter"]),
        );
        self.insert(UnitDef::ratio("Feet", "ft", Length, 3.28084).with_aliases(&["foot"]));
        self.insert(UnitDef::ratio("Inches", "in", Length, 39.3701).with_aliases(&["inch"]));
    }

    fn register_temperature_units(&mut self) {
        self.insert(
            UnitDef::formula("Celsius", "°C", TemperatureScale::Celsius)
                .with_aliases(&["C", "degC"]),
        );
        self.insert(
            UnitDef::formula("Fahrenheit", "°F", TemperatureScale::Fahrenheit)
                .with_aliases(&["F", "degF"]),
        );
        self.insert(UnitDef::formula("Kelvin", "K", TemperatureScale::Kelvin));
    }

    fn register_weight_units(&mut self) {
        use Category::Weight;
        self.insert(UnitDef::ratio("Kilograms", "kg", Weight, 1.0).with_aliases(&["kilogram"]));
        self.insert(UnitDef::ratio("Grams", "g", Weight, 1000.0).with_aliases(&["gram"]));
        self.insert(
            UnitDef::ratio("Pounds", "lb", Weight, 2.20462).with_aliases(&["pound", "lbs"]),
        );
        self.insert(UnitDef::ratio("Ounces", "oz", Weight, 35.274).with_aliases(&["ounce"]));
    }

    fn register_time_units(&mut self) {
        use Category::Time;
        self.insert(UnitDef::ratio("Seconds", "s", Time, 1.0).with_aliases(&["second", "sec"]));
        self.insert(UnitDef::ratio("Minutes", "min", Time, 1.0 / 60.0).with_aliases(&["minute"]));
        self.insert(UnitDef::ratio("Hours", "h", Time, 1.0 / 3600.0).with_aliases(&["hour", "hr"]));
        self.insert(UnitDef::ratio("Days", "d", Time, 1.0 / 86400.0).with_aliases(&["day"]));
    }

    fn register_speed_units(&mut self) {
        use Category::Speed;
        self.insert(UnitDef::ratio("Meters per second", "m/s", Speed, 1.0).with_aliases(&["mps"]));
        self.insert(
            UnitDef::ratio("Kilometers per hour", "km/h", Speed, 3.6).with_aliases(&["kph", "kmh"]),
        );
        self.insert(
            UnitDef::ratio("Miles per hour", "mph", Speed, 2.23694).with_aliases(&["mi/h"]),
        );
    }

    fn register_data_units(&mut self) {
        use Category::DataStorage;
        self.insert(UnitDef::ratio("Bytes", "B", DataStorage, 1.0).with_aliases(&["byte"]));
        self.insert(
            UnitDef::ratio("Kilobytes", "KB", DataStorage, 1.0 / KIB).with_aliases(&["kilobyte"]),
        );
        self.insert(
            UnitDef::ratio("Megabytes", "MB", DataStorage, 1.0 / KIB.powi(2))
                .with_aliases(&["megabyte"]),
        );
        self.insert(
            UnitDef::ratio("Gigabytes", "GB", DataStorage, 1.0 / KIB.powi(3))
                .with_aliases(&["gigabyte"]),
        );
        self.insert(
            UnitDef::ratio("Terabytes", "TB", DataStorage, 1.0 / KIB.powi(4))
                .with_aliases(&["terabyte"]),
        );
    }

    fn register_area_units(&mut self) {
        use Category::Area;
        self.insert(UnitDef::ratio("Square meters", "m²", Area, 1.0).with_aliases(&["m2", "sq m"]));
        self.insert(
            UnitDef::ratio("Square kilometers", "km²", Area, 1e-6).with_aliases(&["km2", "sq km"]),
        );
        self.insert(
            UnitDef::ratio("Square feet", "ft²", Area, 10.7639).with_aliases(&["ft2", "sq ft"]),
        );
        self.insert(
            UnitDef::ratio("Square inches", "in²", Area, 1550.0031).with_aliases(&["in2", "sq in"]),
        );
    }

    fn register_volume_units(&mut self) {
        use Category::Volume;
        self.insert(
            UnitDef::ratio("Liters", "L", Volume, 1.0).with_aliases(&["liter", "litre", "litres"]),
        );
        self.insert(
            UnitDef::ratio("Milliliters", "mL", Volume, 1000.0).with_aliases(&["milliliter"]),
        );
        self.insert(UnitDef::ratio("Cubic meters", "m³", Volume, 0.001).with_aliases(&["m3"]));
        self.insert(UnitDef::ratio("Cubic inches", "in³", Volume, 61.0237).with_aliases(&["in3"]));
    }

    fn register_energy_units(&mut self) {
        use Category::Energy;
        self.insert(UnitDef::ratio("Joules", "J", Energy, 1.0).with_aliases(&["joule"]));
        self.insert(
            UnitDef::ratio("Calories", "cal", Energy, 1.0 / JOULES_PER_CALORIE)
                .with_aliases(&["calorie"]),
        );
        self.insert(
            UnitDef::ratio("Kilowatt-hours", "kWh", Energy, 1.0 / JOULES_PER_KWH)
                .with_aliases(&["kilowatt-hour", "kilowatt hours"]),
        );
    }
}

/// Lookup key: trimmed, lowercase, single spaces
fn normalize(name: &str) -> String {
    name.split_whitespace()
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}
