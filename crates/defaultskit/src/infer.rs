//! Type inference for values written without an explicit type.

use crate::types::TypeTag;

/// Guess the `defaults write` type for a textual value.
///
/// `"true"`/`"false"` are booleans, anything containing a decimal digit is an
/// integer, everything else is a string. The digit rule is deliberately loose:
/// `"v2beta"` infers as [`TypeTag::Int`]. Pass an explicit type to override.
pub fn infer(value: &str) -> TypeTag {
    if value == "true" || value == "false" {
        TypeTag::Bool
    } else if value.chars().any(|c| c.is_ascii_digit()) {
        TypeTag::Int
    } else {
        TypeTag::String
    }
}
