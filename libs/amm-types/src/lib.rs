#![no_std]

use soroban_sdk::{contracttype, Address};

/// Swap fee kept by the pool: the engine prices trades on
/// `amount_in * SWAP_FEE_NUMERATOR / SWAP_FEE_DENOMINATOR` while crediting
/// the full input to reserves (a 1% fee).
pub const SWAP_FEE_NUMERATOR: u128 = 99;
pub const SWAP_FEE_DENOMINATOR: u128 = 100;

/// Transfer tax levied by the originating asset while its tax flag is
/// active: a transfer of `x` delivers `x * TRANSFER_TAX_NUMERATOR /
/// TRANSFER_TAX_DENOMINATOR` (a 2% tax).
pub const TRANSFER_TAX_NUMERATOR: u128 = 98;
pub const TRANSFER_TAX_DENOMINATOR: u128 = 100;

/// Share quantity permanently retired on the first mint. Never credited to
/// any holder and never counted in the outstanding supply; it only pins the
/// share unit so a later depositor cannot force a degenerate share price.
pub const MINIMUM_LIQUIDITY: i128 = 1000;

/// Pool configuration - immutable after initialization
#[contracttype]
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// The originating asset; its transfers may be taxed
    pub token: Address,
    /// The wrapped native asset
    pub native: Address,
}

/// Current pool state - stored in Instance storage for frequent access
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolState {
    /// Recorded holding of the originating asset
    pub reserve_token: i128,
    /// Recorded holding of the native asset
    pub reserve_native: i128,
    /// Outstanding liquidity shares (excludes `retired_shares`)
    pub total_shares: i128,
    /// Shares retired forever on the first mint
    pub retired_shares: i128,
}

impl PoolState {
    pub fn new() -> Self {
        Self {
            reserve_token: 0,
            reserve_native: 0,
            total_shares: 0,
            retired_shares: 0,
        }
    }
}

impl Default for PoolState {
    fn default() -> Self {
        Self::new()
    }
}

/// Direction of a routed trade
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TradeDirection {
    /// Sell the originating asset for the native asset
    TokenToNative,
    /// Sell the native asset for the originating asset
    NativeToToken,
}
