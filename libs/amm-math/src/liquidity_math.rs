use crate::full_math::u128_from_u256;
use soroban_sdk::{Env, U256};

/// Integer square root of `a * b` (rounds down), with the product carried
/// in 256 bits so reserve-scale factors cannot overflow.
///
/// Newton's method starting from the product itself; the iterate sequence
/// is strictly decreasing until it brackets the root.
pub fn sqrt_product(env: &Env, a: u128, b: u128) -> u128 {
    if a == 0 || b == 0 {
        return 0;
    }

    let n = U256::from_u128(env, a).mul(&U256::from_u128(env, b));
    let two = U256::from_u32(env, 2);

    let mut x = n.clone();
    let mut y = x.add(&n.div(&x)).div(&two);
    while y.lt(&x) {
        x = y;
        y = x.add(&n.div(&x)).div(&two);
    }

    // sqrt of a 256-bit value always fits in 128 bits
    u128_from_u256(env, &x)
}
