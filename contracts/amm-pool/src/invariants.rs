// Invariant predicates over pool state, written as pure functions so the
// test suite can state properties directly against observed states.

use amm_math::mul_div;
use amm_types::PoolState;
use soroban_sdk::{Env, U256};

/// Invariant: shares outstanding exactly when both reserves are held.
///
/// Property:
///   total_shares > 0  <=>  reserve_token > 0 && reserve_native > 0
pub fn solvency_consistent(state: &PoolState) -> bool {
    let has_shares = state.total_shares > 0;
    let has_reserves = state.reserve_token > 0 && state.reserve_native > 0;
    has_shares == has_reserves
}

/// Invariant: the reserve product never decreases across a swap or a mint
/// (fees and unbalanced-deposit excess are retained by the pool).
pub fn k_non_decreasing(env: &Env, before: &PoolState, after: &PoolState) -> bool {
    let k = |state: &PoolState| {
        U256::from_u128(env, state.reserve_token as u128)
            .mul(&U256::from_u128(env, state.reserve_native as u128))
    };
    let k_before = k(before);
    let k_after = k(after);
    k_after.gt(&k_before) || k_after == k_before
}

/// Invariant: a redemption never pays out more than the proportional slice.
///
/// Property:
///   amount <= liquidity * reserve / total_shares
pub fn redemption_bounded(
    env: &Env,
    liquidity: i128,
    reserve: i128,
    total_shares: i128,
    amount: i128,
) -> bool {
    amount as u128 <= mul_div(env, liquidity as u128, reserve as u128, total_shares as u128)
}
