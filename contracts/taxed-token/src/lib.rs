#![no_std]

mod storage;

use amm_types::{TRANSFER_TAX_DENOMINATOR, TRANSFER_TAX_NUMERATOR};
use soroban_fixed_point_math::FixedPoint;
use soroban_sdk::{
    contract, contractimpl, token::TokenInterface, Address, Env, MuxedAddress, String, Symbol,
};
use storage::{
    get_allowance, get_balance, get_metadata, get_tax_active, get_treasury, set_allowance,
    set_balance, set_metadata, set_tax_active, spend_allowance, DataKey, TokenMetadata,
};

/// A fungible asset that may levy a transfer tax.
///
/// While the tax flag is active, every transfer debits the sender the full
/// nominal amount but delivers only `amount * TRANSFER_TAX_NUMERATOR /
/// TRANSFER_TAX_DENOMINATOR`; the withheld remainder goes to the treasury.
/// Consumers must therefore measure receipts as balance deltas rather than
/// trusting nominal transfer amounts.
#[contract]
pub struct TaxedToken;

fn check_nonnegative_amount(amount: i128) {
    if amount < 0 {
        panic!("negative amount");
    }
}

fn get_admin(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .expect("Not initialized")
}

/// Move `amount` out of `from`, splitting it between `to` and the treasury
/// when the tax is active.
fn move_tokens(env: &Env, from: &Address, to: &Address, amount: i128) {
    let from_balance = get_balance(env, from);
    if from_balance < amount {
        panic!("insufficient balance");
    }
    set_balance(env, from, from_balance - amount);

    let delivered = if get_tax_active(env) {
        amount
            .fixed_mul_floor(
                TRANSFER_TAX_NUMERATOR as i128,
                TRANSFER_TAX_DENOMINATOR as i128,
            )
            .unwrap()
    } else {
        amount
    };

    let tax = amount - delivered;
    if tax > 0 {
        let treasury = get_treasury(env);
        set_balance(env, &treasury, get_balance(env, &treasury) + tax);
    }
    set_balance(env, to, get_balance(env, to) + delivered);
}

#[contractimpl]
impl TaxedToken {
    pub fn initialize(
        env: Env,
        admin: Address,
        treasury: Address,
        decimals: u32,
        name: String,
        symbol: String,
    ) {
        if env.storage().instance().has(&DataKey::Admin) {
            panic!("Already initialized");
        }
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Treasury, &treasury);
        set_tax_active(&env, false);
        set_metadata(
            &env,
            &TokenMetadata {
                decimals,
                name,
                symbol,
            },
        );
    }

    /// Issue new units to `to`. Issuance is not a transfer and is never taxed.
    pub fn mint(env: Env, to: Address, amount: i128) {
        check_nonnegative_amount(amount);
        get_admin(&env).require_auth();

        set_balance(&env, &to, get_balance(&env, &to) + amount);
        env.events().publish(
            (Symbol::new(&env, "mint"),),
            (to, amount),
        );
    }

    /// Toggle the transfer tax.
    pub fn set_tax(env: Env, active: bool) {
        get_admin(&env).require_auth();
        set_tax_active(&env, active);
    }

    /// Whether transfers currently levy the tax.
    pub fn tax_active(env: Env) -> bool {
        get_tax_active(&env)
    }

    pub fn treasury(env: Env) -> Address {
        get_treasury(&env)
    }
}

#[contractimpl]
impl TokenInterface for TaxedToken {
    fn allowance(env: Env, from: Address, spender: Address) -> i128 {
        get_allowance(&env, &from, &spender)
    }

    fn approve(env: Env, from: Address, spender: Address, amount: i128, expiration_ledger: u32) {
        from.require_auth();
        check_nonnegative_amount(amount);

        if amount > 0 && expiration_ledger < env.ledger().sequence() {
            panic!("expiration_ledger is in the past");
        }
        set_allowance(&env, &from, &spender, amount, expiration_ledger);
        env.events().publish(
            (Symbol::new(&env, "approve"),),
            (from, spender, amount, expiration_ledger),
        );
    }

    fn balance(env: Env, id: Address) -> i128 {
        get_balance(&env, &id)
    }

    fn transfer(env: Env, from: Address, to: MuxedAddress, amount: i128) {
        from.require_auth();
        check_nonnegative_amount(amount);

        let to = to.address();
        move_tokens(&env, &from, &to, amount);
        env.events().publish(
            (Symbol::new(&env, "transfer"),),
            (from, to, amount),
        );
    }

    fn transfer_from(env: Env, spender: Address, from: Address, to: Address, amount: i128) {
        spender.require_auth();
        check_nonnegative_amount(amount);

        spend_allowance(&env, &from, &spender, amount);
        move_tokens(&env, &from, &to, amount);
        env.events().publish(
            (Symbol::new(&env, "transfer"),),
            (from, to, amount),
        );
    }

    fn burn(env: Env, from: Address, amount: i128) {
        from.require_auth();
        check_nonnegative_amount(amount);

        let balance = get_balance(&env, &from);
        if balance < amount {
            panic!("insufficient balance");
        }
        set_balance(&env, &from, balance - amount);
        env.events().publish(
            (Symbol::new(&env, "burn"),),
            (from, amount),
        );
    }

    fn burn_from(env: Env, spender: Address, from: Address, amount: i128) {
        spender.require_auth();
        check_nonnegative_amount(amount);

        spend_allowance(&env, &from, &spender, amount);
        let balance = get_balance(&env, &from);
        if balance < amount {
            panic!("insufficient balance");
        }
        set_balance(&env, &from, balance - amount);
        env.events().publish(
            (Symbol::new(&env, "burn"),),
            (from, amount),
        );
    }

    fn decimals(env: Env) -> u32 {
        get_metadata(&env).decimals
    }

    fn name(env: Env) -> String {
        get_metadata(&env).name
    }

    fn symbol(env: Env) -> String {
        get_metadata(&env).symbol
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::testutils::{Address as _, Ledger};
    use soroban_sdk::{Address, Env, String};

    fn setup(env: &Env) -> (Address, Address, TaxedTokenClient<'_>) {
        let admin = Address::generate(env);
        let treasury = Address::generate(env);
        let contract_id = env.register(TaxedToken, ());
        let client = TaxedTokenClient::new(env, &contract_id);
        client.initialize(
            &admin,
            &treasury,
            &18u32,
            &String::from_str(env, "Orbit Coin"),
            &String::from_str(env, "ORB"),
        );
        (admin, treasury, client)
    }

    #[test]
    fn test_metadata() {
        let env = Env::default();
        env.mock_all_auths();
        let (_, _, client) = setup(&env);

        assert_eq!(client.decimals(), 18);
        assert_eq!(client.name(), String::from_str(&env, "Orbit Coin"));
        assert_eq!(client.symbol(), String::from_str(&env, "ORB"));
        assert!(!client.tax_active());
    }

    #[test]
    #[should_panic(expected = "Already initialized")]
    fn test_initialize_twice_fails() {
        let env = Env::default();
        env.mock_all_auths();
        let (admin, treasury, client) = setup(&env);
        client.initialize(
            &admin,
            &treasury,
            &18u32,
            &String::from_str(&env, "Orbit Coin"),
            &String::from_str(&env, "ORB"),
        );
    }

    #[test]
    fn test_transfer_untaxed() {
        let env = Env::default();
        env.mock_all_auths();
        let (_, _, client) = setup(&env);

        let alice = Address::generate(&env);
        let bob = Address::generate(&env);
        client.mint(&alice, &1000);
        client.transfer(&alice, &bob, &400);

        assert_eq!(client.balance(&alice), 600);
        assert_eq!(client.balance(&bob), 400);
    }

    #[test]
    fn test_transfer_taxed() {
        let env = Env::default();
        env.mock_all_auths();
        let (_, treasury, client) = setup(&env);

        let alice = Address::generate(&env);
        let bob = Address::generate(&env);
        client.mint(&alice, &1000);
        client.set_tax(&true);
        client.transfer(&alice, &bob, &500);

        // sender debited the nominal amount, recipient receives 98%
        assert_eq!(client.balance(&alice), 500);
        assert_eq!(client.balance(&bob), 490);
        assert_eq!(client.balance(&treasury), 10);
    }

    #[test]
    fn test_transfer_from_respects_allowance_and_tax() {
        let env = Env::default();
        env.mock_all_auths();
        let (_, treasury, client) = setup(&env);

        let alice = Address::generate(&env);
        let bob = Address::generate(&env);
        let spender = Address::generate(&env);
        client.mint(&alice, &1000);
        client.approve(&alice, &spender, &600, &(env.ledger().sequence() + 100));
        client.set_tax(&true);

        client.transfer_from(&spender, &alice, &bob, &600);
        assert_eq!(client.balance(&alice), 400);
        assert_eq!(client.balance(&bob), 588);
        assert_eq!(client.balance(&treasury), 12);
        assert_eq!(client.allowance(&alice, &spender), 0);
    }

    #[test]
    #[should_panic(expected = "insufficient allowance")]
    fn test_transfer_from_over_allowance_fails() {
        let env = Env::default();
        env.mock_all_auths();
        let (_, _, client) = setup(&env);

        let alice = Address::generate(&env);
        let bob = Address::generate(&env);
        let spender = Address::generate(&env);
        client.mint(&alice, &1000);
        client.approve(&alice, &spender, &100, &(env.ledger().sequence() + 100));
        client.transfer_from(&spender, &alice, &bob, &101);
    }

    #[test]
    fn test_allowance_expires() {
        let env = Env::default();
        env.mock_all_auths();
        let (_, _, client) = setup(&env);

        let alice = Address::generate(&env);
        let spender = Address::generate(&env);
        client.mint(&alice, &1000);

        let expiration = env.ledger().sequence() + 10;
        client.approve(&alice, &spender, &100, &expiration);
        assert_eq!(client.allowance(&alice, &spender), 100);

        env.ledger().with_mut(|l| l.sequence_number = expiration + 1);
        assert_eq!(client.allowance(&alice, &spender), 0);
    }

    #[test]
    #[should_panic(expected = "insufficient balance")]
    fn test_transfer_over_balance_fails() {
        let env = Env::default();
        env.mock_all_auths();
        let (_, _, client) = setup(&env);

        let alice = Address::generate(&env);
        let bob = Address::generate(&env);
        client.mint(&alice, &10);
        client.transfer(&alice, &bob, &11);
    }

    #[test]
    #[should_panic(expected = "negative amount")]
    fn test_negative_transfer_fails() {
        let env = Env::default();
        env.mock_all_auths();
        let (_, _, client) = setup(&env);

        let alice = Address::generate(&env);
        let bob = Address::generate(&env);
        client.transfer(&alice, &bob, &-1);
    }
}
