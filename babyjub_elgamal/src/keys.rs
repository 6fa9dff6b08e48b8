//! Private key seeds, the clamping that turns a seed into a curve exponent, and public keys.

use crate::{
    curve::{
        bigint_from_decimal, is_valid_point, mul_secret, BabyJubjubAffine, Fq, Scalar, BASE,
    },
    error::ElGamalError,
    randomness::random_field_value,
    serde_utils::DecimalPoint,
};
use alloc::vec::Vec;
use ark_ec::CurveGroup;
use ark_ff::{BigInteger, BigInteger256, PrimeField};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{
    fmt,
    rand::{CryptoRng, RngCore},
};
use digest::{consts::U64, Digest, FixedOutput, HashMarker, Output, OutputSizeUser, Update};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Hash used to derive the secret exponent from a seed
pub type DefaultKeyHash = Blake512;

/// BLAKE-512, the SHA-3 finalist and not BLAKE2b. This is the hash circomlib derives Baby Jubjub
/// keys with, so seeds map to the same keys as in circom based tooling.
///
/// Input is buffered and hashed in one go on finalization. Seeds are at most 32 bytes.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct Blake512 {
    input: Vec<u8>,
}

impl HashMarker for Blake512 {}

impl OutputSizeUser for Blake512 {
    type OutputSize = U64;
}

impl Update for Blake512 {
    fn update(&mut self, data: &[u8]) {
        self.input.extend_from_slice(data);
    }
}

impl FixedOutput for Blake512 {
    fn finalize_into(self, out: &mut Output<Self>) {
        let hash = <blake_hash::Blake512 as blake_hash::Digest>::digest(self.input.as_slice());
        out.copy_from_slice(hash.as_slice());
    }
}

/// Clear the 3 lowest bits (cofactor), clear the top bit and set the second highest bit of the
/// first 32 bytes of a seed hash, read little-endian.
pub fn prune(bytes: &mut [u8; 32]) {
    bytes[0] &= 0xf8;
    bytes[31] &= 0x7f;
    bytes[31] |= 0x40;
}

/// Derive the curve exponent for a seed: hash, prune the lower 32 bytes, then divide by the
/// cofactor. The result is in `[2^251, 2^252)` and is what actually multiplies points wherever a
/// "private key" is used.
pub fn derive_scalar<D: Digest<OutputSize = U64>>(seed: &[u8]) -> Scalar {
    let hash = D::digest(seed);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash[..32]);
    prune(&mut bytes);
    let mut s = bigint_from_le_bytes(&bytes);
    bytes.zeroize();
    s.divn(3);
    Scalar(s)
}

pub fn bigint_from_le_bytes(bytes: &[u8; 32]) -> BigInteger256 {
    let mut limbs = [0u64; 4];
    for (limb, chunk) in limbs.iter_mut().zip(bytes.chunks_exact(8)) {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(chunk);
        *limb = u64::from_le_bytes(buf);
    }
    BigInteger256::new(limbs)
}

/// Raw private key seed, an integer less than the BN254 scalar field modulus.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(BigInteger256);

impl PrivateKey {
    pub fn new(seed: BigInteger256) -> crate::Result<Self> {
        if seed >= Fq::MODULUS {
            return Err(ElGamalError::InvalidPrivateKey);
        }
        Ok(Self(seed))
    }

    /// Fresh uniformly random seed
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self(random_field_value(rng))
    }

    /// Seed from a big-endian integer of any length; leading zeros are allowed.
    pub fn from_bytes_be(bytes: &[u8]) -> crate::Result<Self> {
        BigInteger256::try_from(BigUint::from_bytes_be(bytes))
            .map_err(|_| ElGamalError::InvalidPrivateKey)
            .and_then(Self::new)
    }

    pub fn from_decimal_str(s: &str) -> crate::Result<Self> {
        bigint_from_decimal(s)
            .ok_or(ElGamalError::InvalidPrivateKey)
            .and_then(Self::new)
    }

    pub fn seed(&self) -> &BigInteger256 {
        &self.0
    }

    /// Minimal big-endian encoding of the seed. Zero encodes to no bytes.
    pub fn to_bytes_be(&self) -> Vec<u8> {
        minimal_bytes_be(&self.0)
    }

    /// What the key hash is applied to: the bytes of the seed's hex digits read two at a time.
    /// When the seed has an odd number of hex digits the last digit is dropped, so `0x75bcd15`
    /// hashes `[0x75, 0xbc, 0xd1]` and seeds below 16 hash the empty string.
    pub fn hash_input(&self) -> Vec<u8> {
        let mut seed = self.0;
        let nibbles = (seed.num_bits() + 3) / 4;
        if nibbles % 2 == 1 {
            seed.divn(4);
        }
        let bytes = minimal_bytes_be(&seed);
        seed.zeroize();
        bytes
    }

    /// The exponent this seed stands for
    pub fn secret_scalar(&self) -> Scalar {
        self.secret_scalar_with::<DefaultKeyHash>()
    }

    pub fn secret_scalar_with<D: Digest<OutputSize = U64>>(&self) -> Scalar {
        let mut seed = self.hash_input();
        let s = derive_scalar::<D>(&seed);
        seed.zeroize();
        s
    }
}

fn minimal_bytes_be(n: &BigInteger256) -> Vec<u8> {
    let mut bytes = n.to_bytes_be();
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    let minimal = bytes[first..].to_vec();
    bytes.zeroize();
    minimal
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

#[serde_as]
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
)]
pub struct PublicKey(#[serde_as(as = "DecimalPoint")] pub BabyJubjubAffine);

impl PublicKey {
    pub fn new(private_key: &PrivateKey) -> Self {
        Self::new_with::<DefaultKeyHash>(private_key)
    }

    pub fn new_with<D: Digest<OutputSize = U64>>(private_key: &PrivateKey) -> Self {
        let mut s = private_key.secret_scalar_with::<D>();
        let pk = mul_secret(&BASE, &s).into_affine();
        s.zeroize();
        Self(pk)
    }

    /// A public key must be a non-identity point of the prime order subgroup.
    pub fn is_valid(&self) -> bool {
        !self.0.is_zero() && is_valid_point(&self.0)
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ElGamalError::InvalidPublicKey)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPair {
    pub private_key: PrivateKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self::from_private_key(PrivateKey::random(rng))
    }

    pub fn from_private_key(private_key: PrivateKey) -> Self {
        let public_key = PublicKey::new(&private_key);
        Self {
            private_key,
            public_key,
        }
    }
}
