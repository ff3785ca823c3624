use soroban_sdk::{contracttype, Address, Env, String};

/// Storage keys for the token contract
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Issuer admin (Instance storage)
    Admin,
    /// Tax recipient (Instance storage)
    Treasury,
    /// Whether the transfer tax is levied (Instance storage)
    TaxActive,
    /// Token metadata (Instance storage)
    Metadata,
    /// Holder balance (Persistent storage)
    Balance(Address),
    /// Spender allowance (Persistent storage)
    Allowance(AllowanceKey),
}

#[contracttype]
#[derive(Clone)]
pub struct AllowanceKey {
    pub from: Address,
    pub spender: Address,
}

#[contracttype]
#[derive(Clone)]
pub struct AllowanceValue {
    pub amount: i128,
    pub expiration_ledger: u32,
}

#[contracttype]
#[derive(Clone)]
pub struct TokenMetadata {
    pub decimals: u32,
    pub name: String,
    pub symbol: String,
}

// TTL constants
const INSTANCE_TTL_THRESHOLD: u32 = 17280; // ~1 day
const INSTANCE_TTL_EXTEND: u32 = 518400; // ~30 days
const PERSISTENT_TTL_THRESHOLD: u32 = 17280;
const PERSISTENT_TTL_EXTEND: u32 = 518400;

fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

// === Metadata ===

pub fn get_metadata(env: &Env) -> TokenMetadata {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::Metadata)
        .expect("Not initialized")
}

pub fn set_metadata(env: &Env, metadata: &TokenMetadata) {
    env.storage().instance().set(&DataKey::Metadata, metadata);
    extend_instance_ttl(env);
}

// === Tax flag ===

pub fn get_tax_active(env: &Env) -> bool {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::TaxActive)
        .unwrap_or(false)
}

pub fn set_tax_active(env: &Env, active: bool) {
    env.storage().instance().set(&DataKey::TaxActive, &active);
    extend_instance_ttl(env);
}

pub fn get_treasury(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&DataKey::Treasury)
        .expect("Not initialized")
}

// === Balances ===

pub fn get_balance(env: &Env, id: &Address) -> i128 {
    let key = DataKey::Balance(id.clone());
    match env.storage().persistent().get(&key) {
        Some(balance) => {
            extend_persistent_ttl(env, &key);
            balance
        }
        None => 0,
    }
}

pub fn set_balance(env: &Env, id: &Address, amount: i128) {
    let key = DataKey::Balance(id.clone());
    env.storage().persistent().set(&key, &amount);
    extend_persistent_ttl(env, &key);
}

// === Allowances ===

pub fn get_allowance(env: &Env, from: &Address, spender: &Address) -> i128 {
    let key = DataKey::Allowance(AllowanceKey {
        from: from.clone(),
        spender: spender.clone(),
    });
    match env.storage().persistent().get::<_, AllowanceValue>(&key) {
        Some(allowance) if allowance.expiration_ledger >= env.ledger().sequence() => {
            allowance.amount
        }
        _ => 0,
    }
}

pub fn set_allowance(
    env: &Env,
    from: &Address,
    spender: &Address,
    amount: i128,
    expiration_ledger: u32,
) {
    let key = DataKey::Allowance(AllowanceKey {
        from: from.clone(),
        spender: spender.clone(),
    });
    env.storage().persistent().set(
        &key,
        &AllowanceValue {
            amount,
            expiration_ledger,
        },
    );
    if amount > 0 {
        extend_persistent_ttl(env, &key);
    }
}

pub fn spend_allowance(env: &Env, from: &Address, spender: &Address, amount: i128) {
    let key = DataKey::Allowance(AllowanceKey {
        from: from.clone(),
        spender: spender.clone(),
    });
    let allowance: AllowanceValue = env
        .storage()
        .persistent()
        .get(&key)
        .unwrap_or(AllowanceValue {
            amount: 0,
            expiration_ledger: 0,
        });

    let live = allowance.expiration_ledger >= env.ledger().sequence();
    if !live || allowance.amount < amount {
        panic!("insufficient allowance");
    }
    set_allowance(
        env,
        from,
        spender,
        allowance.amount - amount,
        allowance.expiration_ledger,
    );
}
