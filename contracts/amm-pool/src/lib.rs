#![no_std]

pub mod invariants;
mod liquidity;
mod shares;
mod storage;
mod swap;

use amm_types::{PoolConfig, PoolState};
use soroban_sdk::{contract, contractimpl, Address, Env};
use storage::{
    get_config, get_share_allowance, get_share_balance, get_state, set_config, set_state, DataKey,
};

/// The exchange engine: owns the two reserves and the liquidity-share
/// supply, and exposes the mint / burn / swap primitives any caller may
/// invoke directly. Assets are discovered as balance deltas against the
/// recorded reserves, so the engine never trusts a nominal transfer amount.
#[contract]
pub struct AmmPool;

#[contractimpl]
impl AmmPool {
    /// Bind the pool to its asset pair.
    pub fn initialize(env: Env, token: Address, native: Address) {
        if env.storage().instance().has(&DataKey::Config) {
            panic!("Already initialized");
        }
        if token == native {
            panic!("IDENTICAL_ADDRESSES");
        }
        set_config(&env, &PoolConfig { token, native });
        set_state(&env, &PoolState::new());
    }

    /// Issue liquidity shares to `recipient` against assets transferred in
    /// since the last snapshot.
    ///
    /// # Returns
    /// Shares issued
    pub fn mint(env: Env, caller: Address, recipient: Address) -> i128 {
        liquidity::mint(&env, caller, recipient)
    }

    /// Redeem the engine-held shares for a pro-rata slice of both reserves,
    /// paid to `recipient`.
    ///
    /// # Returns
    /// (amount_token, amount_native) paid out
    pub fn burn(env: Env, caller: Address, recipient: Address) -> (i128, i128) {
        liquidity::burn(&env, caller, recipient)
    }

    /// Swap against the reserves; exactly one of the two output amounts must
    /// be nonzero.
    ///
    /// # Returns
    /// The net input measured from balance deltas
    pub fn swap(
        env: Env,
        caller: Address,
        amount_token_out: i128,
        amount_native_out: i128,
        recipient: Address,
    ) -> i128 {
        swap::execute_swap(&env, caller, amount_token_out, amount_native_out, recipient)
    }

    // === Liquidity-share ledger ===

    /// Transfer shares between holders.
    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) {
        shares::transfer(&env, from, to, amount);
    }

    /// Grant `spender` a pull allowance over the owner's shares.
    pub fn approve(env: Env, owner: Address, spender: Address, amount: i128) {
        shares::approve(&env, owner, spender, amount);
    }

    /// Allowance-based share pull.
    pub fn transfer_from(env: Env, spender: Address, owner: Address, to: Address, amount: i128) {
        shares::transfer_from(&env, spender, owner, to, amount);
    }

    /// Get share balance of a holder
    pub fn balance(env: Env, id: Address) -> i128 {
        get_share_balance(&env, &id)
    }

    /// Get remaining share allowance
    pub fn allowance(env: Env, owner: Address, spender: Address) -> i128 {
        get_share_allowance(&env, &owner, &spender)
    }

    /// Get outstanding share supply (excludes retired shares)
    pub fn total_supply(env: Env) -> i128 {
        get_state(&env).total_shares
    }

    /// Get the permanently retired share quantity
    pub fn retired_shares(env: Env) -> i128 {
        get_state(&env).retired_shares
    }

    // === View Functions ===

    /// Get the current reserve pair
    pub fn get_reserves(env: Env) -> (i128, i128) {
        let state = get_state(&env);
        (state.reserve_token, state.reserve_native)
    }

    /// Get pool state
    pub fn get_state(env: Env) -> PoolState {
        get_state(&env)
    }

    /// Get pool configuration
    pub fn get_config(env: Env) -> PoolConfig {
        get_config(&env)
    }

    /// Get the originating asset address
    pub fn token(env: Env) -> Address {
        get_config(&env).token
    }

    /// Get the native asset address
    pub fn native(env: Env) -> Address {
        get_config(&env).native
    }
}
