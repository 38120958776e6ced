use alloy::primitives::U256;
use serde::{de, Deserialize, Deserializer, Serializer};

use crate::errors::InputError;

/// Parse a non-negative decimal integer string.
///
/// Surrounding whitespace is ignored; signs, fractions, exponents and hex are
/// rejected.
pub fn parse_decimal(field: &str, value: &str) -> Result<U256, InputError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(InputError::new(format!("{} is required", field)));
    }
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InputError::new(format!(
            "{} is not a valid decimal integer: {}",
            field, value
        )));
    }
    U256::from_str_radix(value, 10)
        .map_err(|_| InputError::new(format!("{} is out of range: {}", field, value)))
}

/// Like [`parse_decimal`] but also rejects zero.
pub fn parse_positive(field: &str, value: &str) -> Result<U256, InputError> {
    let parsed = parse_decimal(field, value)?;
    if parsed.is_zero() {
        return Err(InputError::new(format!("{} must be positive", field)));
    }
    Ok(parsed)
}

/// Serde adapter rendering a `U256` as a decimal string.
pub mod decimal_string {
    use super::*;

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_decimal("value", &raw).map_err(de::Error::custom)
    }
}

/// Serde adapter for `Option<U256>`; `None` renders as `null`.
pub mod optional_decimal_string {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<U256>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serializer.collect_str(value),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<U256>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| parse_decimal("value", &raw).map_err(de::Error::custom))
            .transpose()
    }
}
