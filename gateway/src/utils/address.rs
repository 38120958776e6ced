use alloy::primitives::{hex, Address};

use crate::errors::InputError;

/// Parse a `0x`-prefixed, 40 hex digit address. Case is not checked against
/// the EIP-55 checksum.
pub fn parse_address(field: &str, value: &str) -> Result<Address, InputError> {
    let value = value.trim();
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or_else(|| InputError::new(format!("{} must be 0x-prefixed: {}", field, value)))?;

    if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(InputError::new(format!(
            "{} is not a valid address: {}",
            field, value
        )));
    }

    let mut bytes = [0u8; 20];
    hex::decode_to_slice(digits, &mut bytes)
        .map_err(|e| InputError::new(format!("{} is not a valid address: {}", field, e)))?;
    Ok(Address::from(bytes))
}

/// Canonical outbound rendering: lowercase `0x`-prefixed hex
pub fn format_address(address: &Address) -> String {
    format!("0x{}", hex::encode(address.as_slice()))
}

/// Serde adapter rendering an `Address` in its canonical lowercase form.
pub mod address_string {
    use alloy::primitives::Address;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Address, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_address(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Address, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_address("address", &raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address_is_case_insensitive() {
        let lower = parse_address("to", "0x8def68408bc96553003094180e5c90d9fe5b88c1").unwrap();
        let mixed = parse_address("to", "0x8DEF68408Bc96553003094180E5C90d9fe5b88C1").unwrap();
        let upper_prefix = parse_address("to", "0X8DEF68408BC96553003094180E5C90D9FE5B88C1").unwrap();
        assert_eq!(lower, mixed);
        assert_eq!(lower, upper_prefix);
        assert_eq!(format_address(&mixed), "0x8def68408bc96553003094180e5c90d9fe5b88c1");
    }

    #[test]
    fn test_parse_address_rejects_malformed() {
        for bad in [
            "",
            "8def68408bc96553003094180e5c90d9fe5b88c1",
            "0x8def68408bc96553003094180e5c90d9fe5b88",
            "0x8def68408bc96553003094180e5c90d9fe5b88c1ff",
            "0x8def68408bc96553003094180e5c90d9fe5b88zz",
        ] {
            assert!(parse_address("to", bad).is_err(), "{:?}", bad);
        }
    }
}
