use amm_types::{PoolConfig, PoolState};
use soroban_sdk::{contracttype, Address, Env};

/// Storage keys for the pool contract
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Pool configuration (Instance storage)
    Config,
    /// Reserves and share supply (Instance storage)
    State,
    /// Re-entrancy lock (Instance storage)
    Locked,
    /// Liquidity-share balance per holder (Persistent storage)
    Share(Address),
    /// Liquidity-share allowance (Persistent storage)
    Allowance(AllowanceKey),
}

#[contracttype]
#[derive(Clone)]
pub struct AllowanceKey {
    pub owner: Address,
    pub spender: Address,
}

// TTL constants
const INSTANCE_TTL_THRESHOLD: u32 = 17280; // ~1 day
const INSTANCE_TTL_EXTEND: u32 = 518400; // ~30 days
const PERSISTENT_TTL_THRESHOLD: u32 = 17280;
const PERSISTENT_TTL_EXTEND: u32 = 518400;

/// Extend instance storage TTL
pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

// === Config ===

pub fn get_config(env: &Env) -> PoolConfig {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .expect("Pool not initialized")
}

pub fn set_config(env: &Env, config: &PoolConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    extend_instance_ttl(env);
}

// === State ===

pub fn get_state(env: &Env) -> PoolState {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::State)
        .expect("Pool not initialized")
}

pub fn set_state(env: &Env, state: &PoolState) {
    env.storage().instance().set(&DataKey::State, state);
    extend_instance_ttl(env);
}

// === Re-entrancy lock ===
//
// Every mutating operation holds the lock while its token transfers are
// outstanding. A panic rolls the flag back together with everything else.

pub fn acquire_lock(env: &Env) {
    if env
        .storage()
        .instance()
        .get(&DataKey::Locked)
        .unwrap_or(false)
    {
        panic!("REENTRANT_CALL");
    }
    env.storage().instance().set(&DataKey::Locked, &true);
}

pub fn release_lock(env: &Env) {
    env.storage().instance().set(&DataKey::Locked, &false);
}

// === Share balances ===

pub fn get_share_balance(env: &Env, id: &Address) -> i128 {
    let key = DataKey::Share(id.clone());
    match env.storage().persistent().get(&key) {
        Some(balance) => {
            extend_persistent_ttl(env, &key);
            balance
        }
        None => 0,
    }
}

pub fn set_share_balance(env: &Env, id: &Address, amount: i128) {
    let key = DataKey::Share(id.clone());
    if amount == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &amount);
        extend_persistent_ttl(env, &key);
    }
}

// === Share allowances ===

pub fn get_share_allowance(env: &Env, owner: &Address, spender: &Address) -> i128 {
    let key = DataKey::Allowance(AllowanceKey {
        owner: owner.clone(),
        spender: spender.clone(),
    });
    env.storage().persistent().get(&key).unwrap_or(0)
}

pub fn set_share_allowance(env: &Env, owner: &Address, spender: &Address, amount: i128) {
    let key = DataKey::Allowance(AllowanceKey {
        owner: owner.clone(),
        spender: spender.clone(),
    });
    if amount == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &amount);
        extend_persistent_ttl(env, &key);
    }
}
