use crate::storage::{
    acquire_lock, get_config, get_share_balance, get_state, release_lock, set_share_balance,
    set_state,
};
use amm_math::{mul_div, sqrt_product, to_amount};
use amm_types::MINIMUM_LIQUIDITY;
use soroban_sdk::{token, Address, Env, Symbol};

/// Issue shares against the assets received since the last reserve snapshot.
///
/// The transfer-in is discovered as `balance - reserve` per asset, so a
/// fee-on-transfer asset is credited at what actually arrived, not at the
/// nominal amount the sender intended.
pub fn mint(env: &Env, caller: Address, recipient: Address) -> i128 {
    acquire_lock(env);
    caller.require_auth();

    let config = get_config(env);
    let mut state = get_state(env);
    let contract_address = env.current_contract_address();

    let balance_token = token::Client::new(env, &config.token).balance(&contract_address);
    let balance_native = token::Client::new(env, &config.native).balance(&contract_address);
    let amount_token = (balance_token - state.reserve_token).max(0);
    let amount_native = (balance_native - state.reserve_native).max(0);

    let shares = if state.total_shares == 0 {
        if amount_token == 0 || amount_native == 0 {
            panic!("NO_LIQUIDITY");
        }
        let issued = to_amount(sqrt_product(env, amount_token as u128, amount_native as u128));
        if issued <= MINIMUM_LIQUIDITY {
            panic!("INSUFFICIENT_LIQUIDITY_MINTED");
        }
        // The retired quantity never reaches a holder and never enters the
        // outstanding supply; it only fixes the share unit.
        state.retired_shares = MINIMUM_LIQUIDITY;
        issued - MINIMUM_LIQUIDITY
    } else {
        // Priced off the proportionally scarcer side: an unbalanced deposit
        // donates its excess to the pool rather than diluting it.
        let by_token = mul_div(
            env,
            amount_token as u128,
            state.total_shares as u128,
            state.reserve_token as u128,
        );
        let by_native = mul_div(
            env,
            amount_native as u128,
            state.total_shares as u128,
            state.reserve_native as u128,
        );
        let issued = to_amount(by_token.min(by_native));
        if issued == 0 {
            panic!("INSUFFICIENT_LIQUIDITY_MINTED");
        }
        issued
    };

    set_share_balance(
        env,
        &recipient,
        get_share_balance(env, &recipient) + shares,
    );
    state.total_shares += shares;
    state.reserve_token = balance_token;
    state.reserve_native = balance_native;
    set_state(env, &state);

    env.events().publish(
        (Symbol::new(env, "mint"),),
        (caller, recipient, shares),
    );

    release_lock(env);
    shares
}

/// Redeem the shares the engine itself holds for a pro-rata slice of both
/// reserves (push-then-call: the redeemer transfers shares to the engine
/// before invoking this).
pub fn burn(env: &Env, caller: Address, recipient: Address) -> (i128, i128) {
    acquire_lock(env);
    caller.require_auth();

    let config = get_config(env);
    let mut state = get_state(env);
    let contract_address = env.current_contract_address();

    let liquidity = get_share_balance(env, &contract_address);
    if liquidity == 0 {
        panic!("INSUFFICIENT_LIQUIDITY_BURNED");
    }

    let token_client = token::Client::new(env, &config.token);
    let native_client = token::Client::new(env, &config.native);
    let balance_token = token_client.balance(&contract_address);
    let balance_native = native_client.balance(&contract_address);

    let amount_token = to_amount(mul_div(
        env,
        liquidity as u128,
        balance_token as u128,
        state.total_shares as u128,
    ));
    let amount_native = to_amount(mul_div(
        env,
        liquidity as u128,
        balance_native as u128,
        state.total_shares as u128,
    ));
    if amount_token == 0 || amount_native == 0 {
        panic!("INSUFFICIENT_LIQUIDITY_BURNED");
    }

    set_share_balance(env, &contract_address, 0);
    state.total_shares -= liquidity;

    token_client.transfer(&contract_address, &recipient, &amount_token);
    native_client.transfer(&contract_address, &recipient, &amount_native);

    // The outbound transfers may themselves have been taxed; resync to what
    // actually remains rather than to the computed amounts.
    state.reserve_token = token_client.balance(&contract_address);
    state.reserve_native = native_client.balance(&contract_address);
    set_state(env, &state);

    env.events().publish(
        (Symbol::new(env, "burn"),),
        (caller, recipient, amount_token, amount_native),
    );

    release_lock(env);
    (amount_token, amount_native)
}
