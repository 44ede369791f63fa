//! Measurement categories
//!
//! A category groups mutually convertible units. The set is closed and known
//! at build time; each category resolves to exactly one conversion strategy.

use std::fmt;
use std::str::FromStr;

use convkit_core::ConversionError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::units::UNITS;
use crate::UnitDef;

/// A measurement domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Length,
    Temperature,
    Weight,
    Time,
    Speed,
    DataStorage,
    Area,
    Volume,
    Energy,
}

/// How values move between two units of a category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStrategy {
    /// `value * (factor[to] / factor[from])`
    Ratio,
    /// Affine formulas through a common intermediate unit
    Formula,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 9] = [
        Category::Length,
        Category::Temperature,
        Category::Weight,
        Category::Time,
        Category::Speed,
        Category::DataStorage,
        Category::Area,
        Category::Volume,
        Category::Energy,
    ];

    pub fn iter() -> impl Iterator<Item = Category> {
        Self::ALL.into_iter()
    }

    /// Display name ("Data Storage")
    pub fn name(&self) -> &'static str {
        match self {
            Category::Length => "Length",
            Category::Temperature => "Temperature",
            Category::Weight => "Weight",
            Category::Time => "Time",
            Category::Speed => "Speed",
            Category::DataStorage => "Data Storage",
            Category::Area => "Area",
            Category::Volume => "Volume",
            Category::Energy => "Energy",
        }
    }

    pub fn strategy(&self) -> ConversionStrategy {
        match self {
            Category::Temperature => ConversionStrategy::Formula,
            _ => ConversionStrategy::Ratio,
        }
    }

    /// Built-in units of this category, reference unit first
    pub fn units(&self) -> Vec<&'static UnitDef> {
        UNITS.units_of(*self)
    }

    /// Parse a category name
    ///
    /// Case-insensitive; spaces, underscores and hyphens are interchangeable,
    /// so "Data Storage", "data_storage" and "DATA-STORAGE" all match.
    pub fn parse(s: &str) -> Result<Self, ConversionError> {
        let wanted = normalize_category(s);
        Self::iter()
            .find(|c| normalize_category(c.name()) == wanted)
            .ok_or_else(|| ConversionError::unknown_category(s.trim()))
    }
}

fn normalize_category(s: &str) -> String {
    s.split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::parse(s)
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Category::parse(&name).map_err(de::Error::custom)
    }
}
