//! Elgamal encryption over Baby Jubjub with messages encoded in the exponent.
//!
//! A 32-bit plaintext `m` is encoded as `m * BASE`, so ciphertexts add up to encryptions of the sum
//! of their plaintexts. Decoding back to an integer is a bounded discrete log, see
//! [`crate::discrete_log`].

use crate::{
    curve::{mul_public, mul_secret, BabyJubjubAffine, Scalar, BASE},
    error::ElGamalError,
    keys::{PrivateKey, PublicKey},
    randomness::random_field_value,
    serde_utils::{DecimalPoint, DecimalScalar},
    split::split64,
};
use alloc::vec::Vec;
use ark_ec::{AffineRepr, CurveGroup};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{
    ops::{Add, AddAssign},
    rand::{CryptoRng, RngCore},
};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// Plaintexts accepted by `encode` are less than this
pub const PLAINTEXT_BOUND: u64 = 1 << 32;

/// Encode a plaintext `m < 2^32` as `m * BASE`. The plaintext is hidden by the encryption mask,
/// not by the multiplication, so this uses variable time arithmetic.
pub fn encode(plaintext: u64) -> crate::Result<BabyJubjubAffine> {
    if plaintext >= PLAINTEXT_BOUND {
        return Err(ElGamalError::PlaintextOutOfRange(plaintext as u128));
    }
    Ok(encode_u32(plaintext as u32))
}

pub fn encode_u32(plaintext: u32) -> BabyJubjubAffine {
    mul_public(&BASE, plaintext as u64).into_affine()
}

/// Nonce derived like a private key: a random seed, clamped.
pub fn random_nonce<R: RngCore + CryptoRng>(rng: &mut R) -> Scalar {
    PrivateKey::random(rng).secret_scalar()
}

/// A uniformly random point of the subgroup, used as an opaque mask when there is no plaintext.
pub fn random_point<R: RngCore + CryptoRng>(rng: &mut R) -> BabyJubjubAffine {
    mul_secret(&BASE, &random_nonce(rng)).into_affine()
}

/// Elgamal encryption of a group element `m`
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
pub struct Ciphertext {
    /// `r * BASE`
    #[serde_as(as = "DecimalPoint")]
    pub ephemeral_key: BabyJubjubAffine,
    /// `m + r * pk`
    #[serde_as(as = "DecimalPoint")]
    pub encrypted_message: BabyJubjubAffine,
}

impl Ciphertext {
    /// Encrypt `message` and return the ciphertext with the nonce used. If no nonce is given, a raw
    /// random value is used without clamping.
    pub fn new<R: RngCore + CryptoRng>(
        rng: &mut R,
        message: &BabyJubjubAffine,
        public_key: &PublicKey,
        nonce: Option<Scalar>,
    ) -> crate::Result<(Self, Scalar)> {
        public_key.validate()?;
        let nonce = nonce.unwrap_or_else(|| Scalar(random_field_value(rng)));
        Ok((Self::with_nonce(message, public_key, &nonce), nonce))
    }

    /// Assumes the public key has been validated
    fn with_nonce(message: &BabyJubjubAffine, public_key: &PublicKey, nonce: &Scalar) -> Self {
        let ephemeral_key = mul_secret(&BASE, nonce);
        let encrypted_message = mul_secret(&public_key.0, nonce) + message;
        let [ephemeral_key, encrypted_message] =
            normalize_pair(ephemeral_key, encrypted_message);
        Self {
            ephemeral_key,
            encrypted_message,
        }
    }

    /// `encrypted_message - sk * ephemeral_key`. A ciphertext for another key decrypts to an
    /// unrelated point; there is no way to tell.
    pub fn decrypt(&self, private_key: &PrivateKey) -> BabyJubjubAffine {
        decrypt(private_key, &self.ephemeral_key, &self.encrypted_message)
    }

    /// Compressed canonical encoding, 32 bytes per point
    pub fn to_bytes(&self) -> crate::Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.compressed_size());
        self.serialize_compressed(&mut bytes)?;
        Ok(bytes)
    }

    /// Decodes and validates both points
    pub fn from_bytes(bytes: &[u8]) -> crate::Result<Self> {
        Ok(Self::deserialize_compressed(bytes)?)
    }

    /// Returns a ciphertext of the same message which cannot be linked to this one. If no nonce is
    /// given, a raw random value is used.
    pub fn rerandomize<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        public_key: &PublicKey,
        nonce: Option<Scalar>,
    ) -> crate::Result<Self> {
        rerandomize(
            rng,
            public_key,
            &self.ephemeral_key,
            &self.encrypted_message,
            nonce,
        )
    }
}

/// Ciphertexts under the same public key add component-wise to a ciphertext of the sum of the
/// messages.
impl Add for Ciphertext {
    type Output = Ciphertext;

    fn add(self, rhs: Ciphertext) -> Ciphertext {
        let [ephemeral_key, encrypted_message] = normalize_pair(
            self.ephemeral_key.into_group() + rhs.ephemeral_key,
            self.encrypted_message.into_group() + rhs.encrypted_message,
        );
        Ciphertext {
            ephemeral_key,
            encrypted_message,
        }
    }
}

impl<'a> Add<&'a Ciphertext> for &'a Ciphertext {
    type Output = Ciphertext;

    fn add(self, rhs: &'a Ciphertext) -> Ciphertext {
        *self + *rhs
    }
}

impl AddAssign for Ciphertext {
    fn add_assign(&mut self, rhs: Ciphertext) {
        *self = *self + rhs;
    }
}

/// Output of `encrypt`. The message is kept since it may have been generated, and the nonce is
/// needed by the proof that attests to the encryption.
#[serde_as]
#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
)]
pub struct Encryption {
    #[serde_as(as = "DecimalPoint")]
    pub message: BabyJubjubAffine,
    pub ciphertext: Ciphertext,
    #[serde_as(as = "DecimalScalar")]
    pub nonce: Scalar,
}

/// Encrypt `message` for `public_key`. Without a message a random point is encrypted; without a
/// nonce a random seed is clamped into one, the same way private keys are.
pub fn encrypt<R: RngCore + CryptoRng>(
    rng: &mut R,
    public_key: &PublicKey,
    message: Option<&BabyJubjubAffine>,
    nonce: Option<Scalar>,
) -> crate::Result<Encryption> {
    public_key.validate()?;
    let message = match message {
        Some(m) => *m,
        None => random_point(rng),
    };
    let nonce = nonce.unwrap_or_else(|| random_nonce(rng));
    Ok(Encryption {
        message,
        ciphertext: Ciphertext::with_nonce(&message, public_key, &nonce),
        nonce,
    })
}

/// Encrypt a 64-bit value as two 32-bit encryptions, low half first.
pub fn encrypt_u64<R: RngCore + CryptoRng>(
    rng: &mut R,
    public_key: &PublicKey,
    plaintext: u64,
) -> crate::Result<[Encryption; 2]> {
    let (lo, hi) = split64(plaintext as u128)?;
    let lo = encrypt(rng, public_key, Some(&encode_u32(lo)), None)?;
    let hi = encrypt(rng, public_key, Some(&encode_u32(hi)), None)?;
    Ok([lo, hi])
}

/// `encrypted_message - clamp(sk) * ephemeral_key`
pub fn decrypt(
    private_key: &PrivateKey,
    ephemeral_key: &BabyJubjubAffine,
    encrypted_message: &BabyJubjubAffine,
) -> BabyJubjubAffine {
    let mask = mul_secret(ephemeral_key, &private_key.secret_scalar());
    (encrypted_message.into_group() - mask).into_affine()
}

/// Add `r * BASE` to the ephemeral key and `r * pk` to the encrypted message.
pub fn rerandomize<R: RngCore + CryptoRng>(
    rng: &mut R,
    public_key: &PublicKey,
    ephemeral_key: &BabyJubjubAffine,
    encrypted_message: &BabyJubjubAffine,
    nonce: Option<Scalar>,
) -> crate::Result<Ciphertext> {
    public_key.validate()?;
    let nonce = nonce.unwrap_or_else(|| Scalar(random_field_value(rng)));
    let [ephemeral_key, encrypted_message] = normalize_pair(
        mul_secret(&BASE, &nonce) + ephemeral_key,
        mul_secret(&public_key.0, &nonce) + encrypted_message,
    );
    Ok(Ciphertext {
        ephemeral_key,
        encrypted_message,
    })
}

fn normalize_pair<G: CurveGroup>(a: G, b: G) -> [G::Affine; 2] {
    let affine = G::normalize_batch(&[a, b]);
    [affine[0], affine[1]]
}
