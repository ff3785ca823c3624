use crate::storage::{acquire_lock, get_config, get_state, release_lock, set_state};
use amm_math::k_holds_after_swap;
use soroban_sdk::{token, Address, Env, Symbol};

/// Single-direction swap: pay out the requested side optimistically, then
/// derive the net input from the observed balance deltas and require the
/// fee-adjusted constant product to hold.
///
/// The output must move before the check because the input asset may levy a
/// transfer tax; what the engine was actually paid is only observable on the
/// post-transfer balances. A failed check panics, which rolls back the
/// optimistic transfer along with all state.
///
/// Returns the measured net input.
pub fn execute_swap(
    env: &Env,
    caller: Address,
    amount_token_out: i128,
    amount_native_out: i128,
    recipient: Address,
) -> i128 {
    acquire_lock(env);
    caller.require_auth();

    if amount_token_out == 0 && amount_native_out == 0 {
        panic!("INSUFFICIENT_OUTPUT_AMOUNT");
    }
    if amount_token_out < 0 || amount_native_out < 0 {
        panic!("INVALID_OUTPUT_AMOUNT");
    }
    if amount_token_out > 0 && amount_native_out > 0 {
        panic!("INVALID_OUTPUT_AMOUNT");
    }

    let config = get_config(env);
    let mut state = get_state(env);
    let contract_address = env.current_contract_address();

    // Crediting output to an address the engine's own accounting reads
    // (itself, or the originating asset contract) would corrupt the next
    // balance-delta computation.
    if recipient == contract_address || recipient == config.token {
        panic!("INVALID_TO_ADDRESS");
    }
    if amount_token_out >= state.reserve_token || amount_native_out >= state.reserve_native {
        panic!("INSUFFICIENT_LIQUIDITY");
    }

    let token_client = token::Client::new(env, &config.token);
    let native_client = token::Client::new(env, &config.native);

    if amount_token_out > 0 {
        token_client.transfer(&contract_address, &recipient, &amount_token_out);
    }
    if amount_native_out > 0 {
        native_client.transfer(&contract_address, &recipient, &amount_native_out);
    }

    let balance_token = token_client.balance(&contract_address);
    let balance_native = native_client.balance(&contract_address);

    // Net transfer-in per side, measured against the snapshot less what was
    // just paid out. Never trusts a caller-declared amount.
    let amount_in_token = (balance_token - (state.reserve_token - amount_token_out)).max(0);
    let amount_in_native = (balance_native - (state.reserve_native - amount_native_out)).max(0);

    if !k_holds_after_swap(
        env,
        balance_token as u128,
        balance_native as u128,
        amount_in_token as u128,
        amount_in_native as u128,
        state.reserve_token as u128,
        state.reserve_native as u128,
    ) {
        panic!("INVALID_K");
    }

    state.reserve_token = balance_token;
    state.reserve_native = balance_native;
    set_state(env, &state);

    let amount_out = if amount_token_out > 0 {
        amount_token_out
    } else {
        amount_native_out
    };
    let amount_in = if amount_token_out > 0 {
        amount_in_native
    } else {
        amount_in_token
    };

    env.events().publish(
        (Symbol::new(env, "swap"),),
        (caller, recipient, amount_out, amount_in),
    );

    release_lock(env);
    amount_in
}
