use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Number as JsonNumber;

use crate::CanonicalizeError;

/// Represents a JSON number exactly as it was decoded.
///
/// Integers and floats stay distinct: `1` and `1.0` are different values and
/// no coercion happens during comparison.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Number(JsonNumber);

impl Number {
    /// Creates a float number after validating finiteness.
    ///
    /// ```
    /// # use jsondiff_core::Number;
    /// let num = Number::from_f64(4.5)?;
    /// assert_eq!(num.as_f64(), Some(4.5));
    /// assert!(Number::from_f64(f64::NAN).is_err());
    /// # Ok::<(), jsondiff_core::CanonicalizeError>(())
    /// ```
    pub fn from_f64(value: f64) -> Result<Self, CanonicalizeError> {
        JsonNumber::from_f64(value).map(Self).ok_or(CanonicalizeError::NotFinite { value })
    }

    /// Returns the value as `f64`, if representable.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.0.as_f64()
    }

    /// Returns the value as `i64` when it was decoded as an integer that fits.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.0.as_i64()
    }

    /// Returns the value as `u64` when it was decoded as a non-negative integer.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        self.0.as_u64()
    }

    /// Indicates whether the number was decoded as a float.
    #[must_use]
    pub fn is_float(&self) -> bool {
        self.0.is_f64()
    }

    /// Borrows the underlying `serde_json::Number`.
    #[must_use]
    pub fn as_json_number(&self) -> &JsonNumber {
        &self.0
    }

    /// Converts the number into a `serde_json::Number`.
    #[must_use]
    pub fn into_json_number(self) -> JsonNumber {
        self.0
    }
}

impl From<JsonNumber> for Number {
    fn from(value: JsonNumber) -> Self {
        Self(value)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self(JsonNumber::from(value))
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Self(JsonNumber::from(value))
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_and_float_are_distinct() {
        let int = Number::from(1_i64);
        let float = Number::from_f64(1.0).unwrap();
        assert_ne!(int, float);
        assert!(float.is_float());
        assert!(!int.is_float());
    }

    #[test]
    fn display_keeps_decoded_shape() {
        assert_eq!(Number::from(7_u64).to_string(), "7");
        assert_eq!(Number::from_f64(7.0).unwrap().to_string(), "7.0");
    }
}
