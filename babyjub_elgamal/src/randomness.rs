//! Uniform sampling of integers in `[0, p)` where `p` is the BN254 scalar field modulus, i.e. the
//! base field of Baby Jubjub. Private key seeds and nonces are drawn from here.

use crate::curve::Fq;
use ark_ff::{BigInteger256, PrimeField};
use ark_std::rand::{CryptoRng, RngCore};

/// `2^256 mod p`. A 256-bit draw below this value is rejected; the remaining
/// `2^256 - (2^256 mod p)` values are an exact multiple of `p`, so reducing them is unbiased.
///
/// 6350874878119819312338956282401532410528162663560392320966563075034087161851
pub const REJECTION_THRESHOLD: BigInteger256 = BigInteger256::new([
    0xac96341c4ffffffb,
    0x36fc76959f60cd29,
    0x666ea36f7879462e,
    0x0e0a77c19a07df2f,
]);

/// Draw a value uniformly distributed in `[0, p)`.
pub fn random_field_value<R: RngCore + CryptoRng>(rng: &mut R) -> BigInteger256 {
    let mut bytes = [0u8; 32];
    loop {
        rng.fill_bytes(&mut bytes);
        if let Some(v) = accept_draw(&bytes) {
            return v;
        }
    }
}

/// Interpret 32 bytes as a big-endian integer and apply the rejection rule. Returns the reduced
/// value if the draw is accepted.
pub fn accept_draw(bytes: &[u8; 32]) -> Option<BigInteger256> {
    if bigint_from_be_bytes(bytes) < REJECTION_THRESHOLD {
        return None;
    }
    Some(Fq::from_be_bytes_mod_order(bytes).into_bigint())
}

pub fn bigint_from_be_bytes(bytes: &[u8; 32]) -> BigInteger256 {
    let mut limbs = [0u64; 4];
    for (limb, chunk) in limbs.iter_mut().rev().zip(bytes.chunks_exact(8)) {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(chunk);
        *limb = u64::from_be_bytes(buf);
    }
    BigInteger256::new(limbs)
}
