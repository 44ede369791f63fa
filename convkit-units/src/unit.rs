//! Unit definitions

use std::fmt;

use serde::Serialize;

use crate::{Category, TemperatureScale};

/// How a unit relates to the rest of its category
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum UnitKind {
    /// Quantity of this unit per one reference unit (1 m = 3.28084 ft)
    Ratio(f64),
    /// Affine temperature scale, converted through Celsius
    Formula(TemperatureScale),
}

/// A named unit scoped to one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitDef {
    /// Display name ("Meters")
    pub name: &'static str,
    /// Short symbol ("m")
    pub symbol: &'static str,
    /// Extra spellings accepted on lookup
    pub aliases: &'static [&'static str],
    pub category: Category,
    pub kind: UnitKind,
}

impl UnitDef {
    /// Proportional unit with a factor relative to the category reference
    pub const fn ratio(
        name: &'static str,
        symbol: &'static str,
        category: Category,
        factor: f64,
    ) -> Self {
        UnitDef {
            name,
            symbol,
            aliases: &[],
            category,
            kind: UnitKind::Ratio(factor),
        }
    }

    /// Temperature unit
    pub const fn formula(
        name: &'static str,
        symbol: &'static str,
        scale: TemperatureScale,
    ) -> Self {
        UnitDef {
            name,
            symbol,
            aliases: &[],
            category: Category::Temperature,
            kind: UnitKind::Formula(scale),
        }
    }

    pub const fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    /// True for the pivot unit of the category (factor 1, or the Celsius intermediate)
    pub fn is_reference(&self) -> bool {
        match self.kind {
            UnitKind::Ratio(factor) => factor == 1.0,
            UnitKind::Formula(scale) => scale == TemperatureScale::INTERMEDIATE,
        }
    }

    /// Every spelling this unit answers to: name, symbol, aliases
    pub fn spellings(&self) -> impl Iterator<Item = &'static str> + '_ {
        [self.name, self.symbol]
            .into_iter()
            .chain(self.aliases.iter().copied())
    }
}

impl fmt::Display for UnitDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
