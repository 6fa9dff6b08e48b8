//! Splitting 64-bit plaintexts into two 32-bit halves that can each be encoded and decoded on their
//! own, and merging the decoded halves back.

use crate::error::ElGamalError;

/// Split `x` into `(lo, hi)` with `x = lo + 2^32 * hi`. The input is wider than 64 bits so that
/// out of range values coming from a wider source are reported rather than truncated.
pub fn split64(x: u128) -> crate::Result<(u32, u32)> {
    if x > u64::MAX as u128 {
        return Err(ElGamalError::PlaintextOutOfRange(x));
    }
    let x = x as u64;
    Ok((x as u32, (x >> 32) as u32))
}

/// Recreate the value from the output of `split64`
pub fn merge64(lo: u32, hi: u32) -> u64 {
    lo as u64 + ((hi as u64) << 32)
}
