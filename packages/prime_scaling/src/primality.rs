use crate::{Error, Result};

/// Decides whether `n` is prime by trial division with odd divisors up to `sqrt(n)`.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `n` is zero or negative.
///
/// # Examples
///
/// ```
/// use prime_scaling::is_prime;
///
/// assert!(is_prime(7919)?);
/// assert!(!is_prime(7921)?);
/// # Ok::<(), prime_scaling::Error>(())
/// ```
pub fn is_prime(n: i64) -> Result<bool> {
    if n <= 0 {
        return Err(Error::InvalidArgument { value: n });
    }

    if n == 1 {
        return Ok(false);
    }

    if n == 2 {
        return Ok(true);
    }

    if n.rem_euclid(2) == 0 {
        return Ok(false);
    }

    // `checked_mul` keeps the bound correct for inputs close to `i64::MAX`.
    let mut divisor: i64 = 3;
    while divisor.checked_mul(divisor).is_some_and(|square| square <= n) {
        if n.checked_rem(divisor) == Some(0) {
            return Ok(false);
        }

        divisor = divisor.saturating_add(2);
    }

    Ok(true)
}
