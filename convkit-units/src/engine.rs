//! The conversion engine
//!
//! Stateless and pure: every call resolves its inputs against an immutable
//! registry and returns a number or a `ConversionError`. Nothing is rounded.

use convkit_core::{ensure_finite, parse_value, ConversionError};

use crate::units::{UnitRegistry, UNITS};
use crate::{Category, UnitDef, UnitKind};

/// Conversion engine bound to a unit registry
#[derive(Debug, Clone, Copy)]
pub struct ConversionEngine<'r> {
    registry: &'r UnitRegistry,
}

impl ConversionEngine<'static> {
    /// Engine over the built-in tables
    pub fn builtin() -> Self {
        Self { registry: &UNITS }
    }
}

impl Default for ConversionEngine<'static> {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'r> ConversionEngine<'r> {
    pub fn new(registry: &'r UnitRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r UnitRegistry {
        self.registry
    }

    /// Categories in display order
    pub fn list_categories(&self) -> &'static [Category] {
        &Category::ALL
    }

    /// Unit names of a category, reference unit first
    pub fn list_units(&self, category: &str) -> Result<Vec<&'r str>, ConversionError> {
        let category = Category::parse(category)?;
        Ok(self.units_of(category).into_iter().map(|u| u.name).collect())
    }

    /// Unit definitions of a category, reference unit first
    pub fn units_of(&self, category: Category) -> Vec<&'r UnitDef> {
        self.registry.units_of(category)
    }

    /// Convert `value` between two units of the named category
    pub fn convert(
        &self,
        category: &str,
        from_unit: &str,
        to_unit: &str,
        value: f64,
    ) -> Result<f64, ConversionError> {
        let category = Category::parse(category)?;
        self.convert_in(category, from_unit, to_unit, value)
    }

    /// Same as [`convert`](Self::convert) with the category already parsed
    pub fn convert_in(
        &self,
        category: Category,
        from_unit: &str,
        to_unit: &str,
        value: f64,
    ) -> Result<f64, ConversionError> {
        let from = self.registry.resolve(category, from_unit)?;
        let to = self.registry.resolve(category, to_unit)?;
        self.convert_units(from, to, value)
    }

    /// Convert raw user text; unparseable or non-finite text is `InvalidValue`
    pub fn convert_text(
        &self,
        category: &str,
        from_unit: &str,
        to_unit: &str,
        text: &str,
    ) -> Result<f64, ConversionError> {
        let category = Category::parse(category)?;
        let from = self.registry.resolve(category, from_unit)?;
        let to = self.registry.resolve(category, to_unit)?;
        let value = parse_value(text)?;
        self.convert_units(from, to, value)
    }

    /// Convert between two resolved unit definitions
    pub fn convert_units(
        &self,
        from: &UnitDef,
        to: &UnitDef,
        value: f64,
    ) -> Result<f64, ConversionError> {
        if from.category != to.category {
            return Err(ConversionError::unknown_unit(to.name, from.category.name()));
        }

        let value = ensure_finite(value)?;

        if from.name == to.name {
            return Ok(value);
        }

        let result = match (from.kind, to.kind) {
            (UnitKind::Ratio(from_factor), UnitKind::Ratio(to_factor)) => {
                value * (to_factor / from_factor)
            }
            (UnitKind::Formula(from_scale), UnitKind::Formula(to_scale)) => {
                from_scale.convert(to_scale, value)
            }
            _ => {
                return Err(ConversionError::unsupported(
                    from.category.name(),
                    from.name,
                    to.name,
                ))
            }
        };

        // A finite input can still leave the f64 range
        if !result.is_finite() {
            return Err(ConversionError::invalid_value(format!(
                "{:e} {} is out of range in {}",
                value, from.name, to.name
            )));
        }
        Ok(result)
    }
}
