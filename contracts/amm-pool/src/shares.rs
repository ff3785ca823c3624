use crate::storage::{
    get_share_allowance, get_share_balance, set_share_allowance, set_share_balance,
};
use soroban_sdk::{Address, Env, Symbol};

pub fn check_nonnegative_amount(amount: i128) {
    if amount < 0 {
        panic!("NEGATIVE_AMOUNT");
    }
}

/// Move liquidity shares between holders.
pub fn move_shares(env: &Env, from: &Address, to: &Address, amount: i128) {
    let from_balance = get_share_balance(env, from);
    if from_balance < amount {
        panic!("INSUFFICIENT_BALANCE");
    }
    set_share_balance(env, from, from_balance - amount);
    set_share_balance(env, to, get_share_balance(env, to) + amount);
}

/// Share transfer initiated by the holder.
pub fn transfer(env: &Env, from: Address, to: Address, amount: i128) {
    from.require_auth();
    check_nonnegative_amount(amount);
    move_shares(env, &from, &to, amount);
    env.events().publish(
        (Symbol::new(env, "share_transfer"),),
        (from, to, amount),
    );
}

/// Grant `spender` the right to pull up to `amount` shares from `owner`.
pub fn approve(env: &Env, owner: Address, spender: Address, amount: i128) {
    owner.require_auth();
    check_nonnegative_amount(amount);
    set_share_allowance(env, &owner, &spender, amount);
    env.events().publish(
        (Symbol::new(env, "share_approve"),),
        (owner, spender, amount),
    );
}

/// Allowance-based pull, spending the spender's grant.
pub fn transfer_from(env: &Env, spender: Address, owner: Address, to: Address, amount: i128) {
    spender.require_auth();
    check_nonnegative_amount(amount);

    let allowance = get_share_allowance(env, &owner, &spender);
    if allowance < amount {
        panic!("INSUFFICIENT_ALLOWANCE");
    }
    set_share_allowance(env, &owner, &spender, allowance - amount);
    move_shares(env, &owner, &to, amount);
    env.events().publish(
        (Symbol::new(env, "share_transfer"),),
        (owner, to, amount),
    );
}
