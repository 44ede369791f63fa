//! convkit Core - Fundamental types
//!
//! This crate provides the types shared by the engine and its callers:
//! - `ConversionError`: the four-way error taxonomy
//! - `ErrorReport`: structured, serializable form of an error
//! - value parsing and result formatting helpers

mod error;
mod value;

pub use error::{codes, ConversionError, ErrorReport};
pub use value::{
    ensure_finite, format_fixed, format_plain, parse_value, DEFAULT_DECIMALS, MAX_DECIMALS,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::codes;
    pub use crate::{parse_value, ConversionError, ErrorReport};
}
