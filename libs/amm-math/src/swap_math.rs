use crate::full_math::u128_from_u256;
use amm_types::{SWAP_FEE_DENOMINATOR, SWAP_FEE_NUMERATOR};
use soroban_sdk::{Env, U256};

/// Constant-product output for a given input, fee deducted from the input
/// before pricing:
///
/// `amount_out = in·N·reserve_out / (reserve_in·D + in·N)`
///
/// where N/D is the swap-fee ratio. The full (undiscounted) input still
/// lands in reserves, which is what makes K grow across a swap.
pub fn get_amount_out(env: &Env, amount_in: u128, reserve_in: u128, reserve_out: u128) -> u128 {
    let in_with_fee =
        U256::from_u128(env, amount_in).mul(&U256::from_u128(env, SWAP_FEE_NUMERATOR));
    let numerator = in_with_fee.mul(&U256::from_u128(env, reserve_out));
    let denominator = U256::from_u128(env, reserve_in)
        .mul(&U256::from_u128(env, SWAP_FEE_DENOMINATOR))
        .add(&in_with_fee);

    if denominator == U256::from_u32(env, 0) {
        panic!("Division by zero");
    }

    u128_from_u256(env, &numerator.div(&denominator))
}

/// Fee-adjusted constant-product check over post-transfer balances:
///
/// `(bal_t·D − in_t·(D−N)) · (bal_n·D − in_n·(D−N)) ≥ res_t·res_n·D²`
///
/// Inputs are the live balances after the optimistic output transfer, the
/// per-side net transfer-in derived from balance deltas, and the reserve
/// snapshot taken before the swap.
pub fn k_holds_after_swap(
    env: &Env,
    balance_token: u128,
    balance_native: u128,
    amount_in_token: u128,
    amount_in_native: u128,
    reserve_token: u128,
    reserve_native: u128,
) -> bool {
    let den = U256::from_u128(env, SWAP_FEE_DENOMINATOR);
    let fee_per_unit = U256::from_u128(env, SWAP_FEE_DENOMINATOR - SWAP_FEE_NUMERATOR);

    let adjusted_token = U256::from_u128(env, balance_token)
        .mul(&den)
        .sub(&U256::from_u128(env, amount_in_token).mul(&fee_per_unit));
    let adjusted_native = U256::from_u128(env, balance_native)
        .mul(&den)
        .sub(&U256::from_u128(env, amount_in_native).mul(&fee_per_unit));

    let lhs = adjusted_token.mul(&adjusted_native);
    let rhs = U256::from_u128(env, reserve_token)
        .mul(&U256::from_u128(env, reserve_native))
        .mul(&den)
        .mul(&den);

    lhs.gt(&rhs) || lhs == rhs
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::Env;

    const E18: u128 = 1_000_000_000_000_000_000;

    #[test]
    fn test_amount_out_zero_input() {
        let env = Env::default();
        assert_eq!(get_amount_out(&env, 0, 500 * E18, 100 * E18), 0);
    }

    #[test]
    fn test_amount_out_native_to_token() {
        let env = Env::default();
        // 500 token / 100 native pool
        assert_eq!(
            get_amount_out(&env, 20 * E18, 100 * E18, 500 * E18),
            82_637_729_549_248_747_913
        );
        assert_eq!(
            get_amount_out(&env, 2 * E18, 100 * E18, 500 * E18),
            9_707_785_840_360_855_069
        );
    }

    #[test]
    fn test_amount_out_token_to_native() {
        let env = Env::default();
        assert_eq!(
            get_amount_out(&env, 20 * E18, 500 * E18, 100 * E18),
            3_809_157_368_218_545_594
        );
        assert_eq!(
            get_amount_out(&env, 10 * E18, 500 * E18, 100 * E18),
            1_941_557_168_072_171_013
        );
    }

    #[test]
    fn test_amount_out_never_drains_reserve() {
        let env = Env::default();
        // Even an enormous input prices out strictly below the reserve.
        let out = get_amount_out(&env, u64::MAX as u128 * E18, 500 * E18, 100 * E18);
        assert!(out < 100 * E18);
    }

    #[test]
    #[should_panic(expected = "Division by zero")]
    fn test_amount_out_empty_pool() {
        let env = Env::default();
        get_amount_out(&env, 0, 0, 100 * E18);
    }

    #[test]
    fn test_k_holds_priced_swap() {
        let env = Env::default();
        // 5 token in, priced output out; balances observed after transfers
        let amount_in = 5 * E18;
        let out = get_amount_out(&env, amount_in, 500 * E18, 100 * E18);
        assert!(k_holds_after_swap(
            &env,
            505 * E18,
            100 * E18 - out,
            amount_in,
            0,
            500 * E18,
            100 * E18,
        ));
    }

    #[test]
    fn test_k_rejects_unpaid_output() {
        let env = Env::default();
        // Output paid with no input delivered: balances only shrank.
        assert!(!k_holds_after_swap(
            &env,
            500 * E18,
            95 * E18,
            0,
            0,
            500 * E18,
            100 * E18,
        ));
    }

    #[test]
    fn test_k_rejects_underpriced_output() {
        let env = Env::default();
        // 100/100 pool: 100 in covers 49 out (fee-adjusted) but not 50.
        assert!(k_holds_after_swap(
            &env, 200, 51, 100, 0, 100, 100,
        ));
        assert!(!k_holds_after_swap(
            &env, 200, 50, 100, 0, 100, 100,
        ));
    }

    #[test]
    fn test_k_equality_boundary() {
        let env = Env::default();
        // No transfers at all: lhs == rhs exactly.
        assert!(k_holds_after_swap(
            &env,
            500 * E18,
            100 * E18,
            0,
            0,
            500 * E18,
            100 * E18,
        ));
    }
}
