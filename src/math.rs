//! Saturating big-integer helpers.

use primitive_types::U256;

/// Compute `⌈x · n / d⌉`, saturating at `U256::MAX` when `x · n` does not fit
/// in 256 bits.
///
/// Saturation (rather than wrapping) makes price escalation asymptote at the
/// representable maximum instead of collapsing to zero. Returns 0 when `x` or
/// `n` is 0; a zero divisor with a non-zero product saturates.
pub fn ceil_mul_div(x: U256, n: U256, d: U256) -> U256 {
    if x.is_zero() || n.is_zero() {
        return U256::zero();
    }
    let product = match x.checked_mul(n) {
        Some(p) => p,
        None => return U256::MAX,
    };
    if d.is_zero() {
        return U256::MAX;
    }
    let quotient = product / d;
    if (product % d).is_zero() {
        quotient
    } else {
        // quotient < product <= MAX here, so the bump cannot overflow.
        quotient + U256::one()
    }
}
