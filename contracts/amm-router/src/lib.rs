#![no_std]

use amm_math::{get_amount_out, mul_div, to_amount};
use amm_types::{TradeDirection, TRANSFER_TAX_DENOMINATOR, TRANSFER_TAX_NUMERATOR};
use soroban_fixed_point_math::FixedPoint;
use soroban_sdk::{
    contract, contractimpl, contracttype, token, Address, Env, IntoVal, Symbol,
};

/// Stateless façade over the exchange engine: matches deposit ratios,
/// enforces caller-supplied slippage bounds, and pulls assets by allowance
/// so a caller can never be charged more than they authorized. Holds no
/// durable state beyond the engine and originating-asset addresses.
#[contract]
pub struct AmmRouter;

/// Storage keys
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Pool,
    Token,
}

/// A priced trade: what the engine will pay out, and what the caller will
/// actually receive once any outbound transfer tax is levied.
struct Quote {
    engine_out: i128,
    receivable: i128,
}

#[contractimpl]
impl AmmRouter {
    /// Initialize router with the engine and originating-asset addresses
    pub fn initialize(env: Env, pool: Address, token: Address) {
        if env.storage().instance().has(&DataKey::Pool) {
            panic!("Already initialized");
        }
        env.storage().instance().set(&DataKey::Pool, &pool);
        env.storage().instance().set(&DataKey::Token, &token);
    }

    /// Ratio-matched liquidity deposit.
    ///
    /// Computes the largest pair within the caller's stated maximums that
    /// matches the current reserve ratio, pulls exactly that pair by
    /// allowance straight into the engine, and mints shares to `recipient`.
    /// On an empty pool the stated amounts are used as-is.
    ///
    /// # Returns
    /// Shares issued
    pub fn deposit(
        env: Env,
        caller: Address,
        amount_token_desired: i128,
        recipient: Address,
        amount_native_provided: i128,
    ) -> i128 {
        caller.require_auth();
        if amount_token_desired < 0 || amount_native_provided < 0 {
            panic!("NEGATIVE_AMOUNT");
        }

        let pool = get_pool(&env);
        let token_addr = get_token(&env);
        let native_addr = pool_native(&env, &pool);
        let (reserve_token, reserve_native) = pool_reserves(&env, &pool);

        let (amount_token, amount_native) = if reserve_token > 0 && reserve_native > 0 {
            let native_optimal = to_amount(mul_div(
                &env,
                amount_token_desired as u128,
                reserve_native as u128,
                reserve_token as u128,
            ));
            if native_optimal <= amount_native_provided {
                (amount_token_desired, native_optimal)
            } else {
                let token_optimal = to_amount(mul_div(
                    &env,
                    amount_native_provided as u128,
                    reserve_token as u128,
                    reserve_native as u128,
                ));
                (token_optimal, amount_native_provided)
            }
        } else {
            (amount_token_desired, amount_native_provided)
        };
        if amount_token == 0 || amount_native == 0 {
            panic!("NO_LIQUIDITY");
        }

        let router = env.current_contract_address();
        token::Client::new(&env, &token_addr).transfer_from(&router, &caller, &pool, &amount_token);
        token::Client::new(&env, &native_addr).transfer_from(
            &router,
            &caller,
            &pool,
            &amount_native,
        );

        let shares = invoke_mint(&env, &pool, &recipient);
        env.events().publish(
            (Symbol::new(&env, "liquidity_added"),),
            (caller, recipient, amount_token, amount_native, shares),
        );
        shares
    }

    /// Redeem `liquidity` shares pulled from the caller by allowance.
    ///
    /// # Returns
    /// (amount_token, amount_native) paid to `recipient`
    pub fn withdraw(env: Env, caller: Address, liquidity: i128, recipient: Address) -> (i128, i128) {
        caller.require_auth();
        if liquidity <= 0 {
            panic!("INCORRECT_LIQUIDITY_VALUE");
        }

        let pool = get_pool(&env);
        let router = env.current_contract_address();

        // Push-then-call: move the caller's shares into the engine, then
        // trigger the redemption for the recipient.
        env.invoke_contract::<()>(
            &pool,
            &Symbol::new(&env, "transfer_from"),
            (router, caller.clone(), pool.clone(), liquidity).into_val(&env),
        );
        let (amount_token, amount_native) = invoke_burn(&env, &pool, &recipient);

        env.events().publish(
            (Symbol::new(&env, "liquidity_removed"),),
            (caller, recipient, amount_token, amount_native, liquidity),
        );
        (amount_token, amount_native)
    }

    /// Sell the originating asset for the native asset, rejecting the trade
    /// if the quoted proceeds fall below `min_native_out`.
    ///
    /// # Returns
    /// The native amount the caller receives
    pub fn swap_token_for_native(
        env: Env,
        caller: Address,
        amount_token_in: i128,
        min_native_out: i128,
        recipient: Address,
    ) -> i128 {
        caller.require_auth();
        if amount_token_in <= 0 {
            panic!("INVALID_INPUT_AMOUNT");
        }

        let quote = quote_trade(&env, amount_token_in, TradeDirection::TokenToNative);
        if quote.receivable < min_native_out {
            panic!("BELOW_USER_DEFINED_LIMIT");
        }

        let pool = get_pool(&env);
        let token_addr = get_token(&env);
        let router = env.current_contract_address();
        token::Client::new(&env, &token_addr).transfer_from(
            &router,
            &caller,
            &pool,
            &amount_token_in,
        );
        invoke_swap(&env, &pool, 0, quote.engine_out, &recipient);

        env.events().publish(
            (Symbol::new(&env, "swapped_token"),),
            (
                caller,
                recipient,
                TradeDirection::TokenToNative,
                amount_token_in,
                quote.receivable,
            ),
        );
        quote.receivable
    }

    /// Sell the native asset for the originating asset, rejecting the trade
    /// if the quoted proceeds fall below `min_token_out`.
    ///
    /// # Returns
    /// The token amount the caller receives (after any transfer tax on the
    /// outbound leg)
    pub fn swap_native_for_token(
        env: Env,
        caller: Address,
        amount_native_in: i128,
        min_token_out: i128,
        recipient: Address,
    ) -> i128 {
        caller.require_auth();
        if amount_native_in <= 0 {
            panic!("INVALID_INPUT_AMOUNT");
        }

        let quote = quote_trade(&env, amount_native_in, TradeDirection::NativeToToken);
        if quote.receivable < min_token_out {
            panic!("BELOW_USER_DEFINED_LIMIT");
        }

        let pool = get_pool(&env);
        let native_addr = pool_native(&env, &pool);
        let router = env.current_contract_address();
        token::Client::new(&env, &native_addr).transfer_from(
            &router,
            &caller,
            &pool,
            &amount_native_in,
        );
        invoke_swap(&env, &pool, quote.engine_out, 0, &recipient);

        env.events().publish(
            (Symbol::new(&env, "swapped_token"),),
            (
                caller,
                recipient,
                TradeDirection::NativeToToken,
                amount_native_in,
                quote.receivable,
            ),
        );
        quote.receivable
    }

    /// Quote a hypothetical trade without touching any state; the result is
    /// also published for callers that cannot read return values.
    pub fn get_estimated_trade_value(env: Env, amount_in: i128, direction: TradeDirection) -> i128 {
        if amount_in < 0 {
            panic!("INVALID_INPUT_AMOUNT");
        }
        let quote = quote_trade(&env, amount_in, direction);
        env.events().publish(
            (Symbol::new(&env, "estimated_trade_value"),),
            (direction, quote.receivable),
        );
        quote.receivable
    }

    /// Push-style transfer entry point. The router accounts for assets only
    /// through `deposit` and the swap methods; an unsolicited transfer would
    /// silently distort the engine's next balance-delta computation, so it
    /// is always rejected.
    pub fn receive(_env: Env, _from: Address, _amount: i128) {
        panic!("USE_DEPOSIT_METHOD");
    }

    /// Get the engine address
    pub fn pool(env: Env) -> Address {
        get_pool(&env)
    }

    /// Get the originating-asset address
    pub fn token(env: Env) -> Address {
        get_token(&env)
    }
}

fn get_pool(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&DataKey::Pool)
        .expect("Not initialized")
}

fn get_token(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&DataKey::Token)
        .expect("Not initialized")
}

fn pool_reserves(env: &Env, pool: &Address) -> (i128, i128) {
    env.invoke_contract(pool, &Symbol::new(env, "get_reserves"), ().into_val(env))
}

fn pool_native(env: &Env, pool: &Address) -> Address {
    env.invoke_contract(pool, &Symbol::new(env, "native"), ().into_val(env))
}

fn tax_active(env: &Env, token: &Address) -> bool {
    env.invoke_contract(token, &Symbol::new(env, "tax_active"), ().into_val(env))
}

fn invoke_mint(env: &Env, pool: &Address, recipient: &Address) -> i128 {
    env.invoke_contract(
        pool,
        &Symbol::new(env, "mint"),
        (env.current_contract_address(), recipient.clone()).into_val(env),
    )
}

fn invoke_burn(env: &Env, pool: &Address, recipient: &Address) -> (i128, i128) {
    env.invoke_contract(
        pool,
        &Symbol::new(env, "burn"),
        (env.current_contract_address(), recipient.clone()).into_val(env),
    )
}

fn invoke_swap(
    env: &Env,
    pool: &Address,
    amount_token_out: i128,
    amount_native_out: i128,
    recipient: &Address,
) -> i128 {
    env.invoke_contract(
        pool,
        &Symbol::new(env, "swap"),
        (
            env.current_contract_address(),
            amount_token_out,
            amount_native_out,
            recipient.clone(),
        )
            .into_val(env),
    )
}

/// Price a trade with the same discounts, in the same order, that the
/// engine will observe: an inbound tax is levied before the engine measures
/// its transfer-in, an outbound tax after the engine pays out. The fee
/// itself is inside the constant-product formula.
fn quote_trade(env: &Env, amount_in: i128, direction: TradeDirection) -> Quote {
    let pool = get_pool(env);
    let token_addr = get_token(env);
    let (reserve_token, reserve_native) = pool_reserves(env, &pool);
    if reserve_token == 0 || reserve_native == 0 {
        panic!("INSUFFICIENT_LIQUIDITY");
    }
    let taxed = tax_active(env, &token_addr);

    match direction {
        TradeDirection::TokenToNative => {
            let effective_in = if taxed {
                amount_in
                    .fixed_mul_floor(
                        TRANSFER_TAX_NUMERATOR as i128,
                        TRANSFER_TAX_DENOMINATOR as i128,
                    )
                    .unwrap()
            } else {
                amount_in
            };
            let out = to_amount(get_amount_out(
                env,
                effective_in as u128,
                reserve_token as u128,
                reserve_native as u128,
            ));
            Quote {
                engine_out: out,
                receivable: out,
            }
        }
        TradeDirection::NativeToToken => {
            let out = to_amount(get_amount_out(
                env,
                amount_in as u128,
                reserve_native as u128,
                reserve_token as u128,
            ));
            let receivable = if taxed {
                out.fixed_mul_floor(
                    TRANSFER_TAX_NUMERATOR as i128,
                    TRANSFER_TAX_DENOMINATOR as i128,
                )
                .unwrap()
            } else {
                out
            };
            Quote {
                engine_out: out,
                receivable,
            }
        }
    }
}
