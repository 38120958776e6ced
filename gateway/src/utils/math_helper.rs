use alloy::primitives::U256;

/// 10^precision
pub fn pow10(precision: u8) -> U256 {
    U256::from(10).pow(U256::from(precision))
}

/// Integer division rounding any remainder up. `None` on a zero divisor.
pub fn ceil_div(numerator: U256, denominator: U256) -> Option<U256> {
    if denominator.is_zero() {
        return None;
    }
    let quotient = numerator / denominator;
    if (numerator % denominator).is_zero() {
        Some(quotient)
    } else {
        quotient.checked_add(U256::from(1))
    }
}

/// Rescale an integer amount from `from` decimals to `to` decimals, `to >= from`.
pub fn scale_up(value: U256, from: u8, to: u8) -> Option<U256> {
    let diff = to.checked_sub(from)?;
    value.checked_mul(pow10(diff))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceil_div() {
        assert_eq!(ceil_div(U256::from(10), U256::from(5)), Some(U256::from(2)));
        assert_eq!(ceil_div(U256::from(11), U256::from(5)), Some(U256::from(3)));
        assert_eq!(ceil_div(U256::ZERO, U256::from(5)), Some(U256::ZERO));
        assert_eq!(ceil_div(U256::from(1), U256::ZERO), None);
        assert_eq!(ceil_div(U256::MAX, U256::from(1)), Some(U256::MAX));
    }

    #[test]
    fn test_scale_up() {
        assert_eq!(
            scale_up(U256::from(1_000_000), 6, 18),
            Some(U256::from(10).pow(U256::from(18)))
        );
        assert_eq!(scale_up(U256::from(1), 18, 6), None);
        assert_eq!(scale_up(U256::MAX, 6, 18), None);
    }
}
