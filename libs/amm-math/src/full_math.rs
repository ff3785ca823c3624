use soroban_sdk::{Env, U256};

/// Multiply and divide with 256-bit intermediate precision (rounds down)
/// Returns (a * b) / denominator
pub fn mul_div(env: &Env, a: u128, b: u128, denominator: u128) -> u128 {
    if denominator == 0 {
        panic!("Division by zero");
    }

    let a_256 = U256::from_u128(env, a);
    let b_256 = U256::from_u128(env, b);
    let denom_256 = U256::from_u128(env, denominator);

    let product = a_256.mul(&b_256);
    let result = product.div(&denom_256);

    u128_from_u256(env, &result)
}

/// Narrow a math result back into the i128 ledger amount type, panics if
/// overflow
pub fn to_amount(value: u128) -> i128 {
    if value > i128::MAX as u128 {
        panic!("amount overflow");
    }
    value as i128
}

/// Convert U256 to u128, panics if overflow
pub(crate) fn u128_from_u256(env: &Env, value: &U256) -> u128 {
    let max_u128 = U256::from_u128(env, u128::MAX);
    if value.gt(&max_u128) {
        panic!("U256 overflow when converting to u128");
    }
    value.to_u128().unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::Env;

    #[test]
    fn test_mul_div_basic() {
        let env = Env::default();
        // (12 * 30) / 4 = 90
        assert_eq!(mul_div(&env, 12, 30, 4), 90);
    }

    #[test]
    fn test_mul_div_wide_intermediate() {
        let env = Env::default();
        // The intermediate product overflows u128 but the quotient fits:
        // (2^100 * 2^100) / 2^100 = 2^100
        let large = 1u128 << 100;
        assert_eq!(mul_div(&env, large, large, large), large);

        // (MAX * MAX) / MAX = MAX
        let max = u128::MAX;
        assert_eq!(mul_div(&env, max, max, max), max);
    }

    #[test]
    fn test_mul_div_zero_numerator() {
        let env = Env::default();
        assert_eq!(mul_div(&env, 0, 100, 50), 0);
        assert_eq!(mul_div(&env, 100, 0, 50), 0);
    }

    #[test]
    fn test_mul_div_rounds_down() {
        let env = Env::default();
        assert_eq!(mul_div(&env, 1, 1, 2), 0);
        assert_eq!(mul_div(&env, 7, 1, 2), 3);
        assert_eq!(mul_div(&env, 5, 1, 3), 1);
    }

    #[test]
    fn test_mul_div_share_pricing() {
        let env = Env::default();
        // Proportional share issuance: amount * total / reserve
        let e18 = 1_000_000_000_000_000_000u128;
        let total = 223_606_797_749_978_968_640u128;
        assert_eq!(mul_div(&env, 500 * e18, total, 500 * e18), total);
        assert_eq!(mul_div(&env, 40 * e18, total, 500 * e18), total * 40 / 500);
    }

    #[test]
    #[should_panic(expected = "Division by zero")]
    fn test_mul_div_by_zero() {
        let env = Env::default();
        mul_div(&env, 1, 1, 0);
    }

    #[test]
    #[should_panic(expected = "U256 overflow")]
    fn test_mul_div_result_overflow() {
        let env = Env::default();
        mul_div(&env, u128::MAX, u128::MAX, 1);
    }

    #[test]
    fn test_to_amount_roundtrip() {
        assert_eq!(to_amount(0), 0);
        assert_eq!(to_amount(i128::MAX as u128), i128::MAX);
    }

    #[test]
    #[should_panic(expected = "amount overflow")]
    fn test_to_amount_overflow() {
        to_amount(i128::MAX as u128 + 1);
    }
}
