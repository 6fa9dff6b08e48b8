//! Values exchanged with a proving circuit that attests to an encryption. Circuits take and return
//! field elements as decimal strings.
//!
//! The prover encrypts the low 32 bits of its identity commitment and feeds the nonce and the
//! public key to the circuit as an [`EncryptionWitness`]. The proof then carries the ciphertext and
//! the public key as six public signals, the [`Decryptables`], from which the holder of the private
//! key recovers the ciphertext, decrypts it and decodes the commitment bits.

use crate::{
    curve::{bigint_from_decimal, point_from_decimal, point_to_decimal, BabyJubjubAffine},
    elgamal::{encode_u32, encrypt, Ciphertext, Encryption},
    error::ElGamalError,
    keys::PublicKey,
};
use alloc::string::String;
use ark_ff::BigInteger256;
use ark_std::rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

/// Only this many low bits of a commitment are encrypted, so that they can be decoded.
pub const COMMITMENT_BITS: u32 = 32;

/// The public signals of a proof that describe the encryption, in circuit output order:
/// `[ephemeral_key.x, ephemeral_key.y, encrypted_message.x, encrypted_message.y, pk.x, pk.y]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Decryptables(pub [String; 6]);

impl Decryptables {
    pub fn new(ciphertext: &Ciphertext, public_key: &PublicKey) -> Self {
        let [c1x, c1y] = point_to_decimal(&ciphertext.ephemeral_key);
        let [c2x, c2y] = point_to_decimal(&ciphertext.encrypted_message);
        let [pkx, pky] = point_to_decimal(&public_key.0);
        Self([c1x, c1y, c2x, c2y, pkx, pky])
    }

    pub fn to_signals(&self) -> [String; 6] {
        self.0.clone()
    }

    /// Parse the ciphertext back. Both points must be in the prime order subgroup.
    pub fn ciphertext(&self) -> crate::Result<Ciphertext> {
        Ok(Ciphertext {
            ephemeral_key: point_from_decimal(&self.0[0], &self.0[1])?,
            encrypted_message: point_from_decimal(&self.0[2], &self.0[3])?,
        })
    }

    /// The public key the ciphertext claims to be encrypted for
    pub fn public_key(&self) -> crate::Result<PublicKey> {
        let pk = PublicKey(point_from_decimal(&self.0[4], &self.0[5])?);
        pk.validate()?;
        Ok(pk)
    }
}

/// Private and public inputs of the circuit that concern the encryption
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionWitness {
    /// The nonce used to encrypt
    pub nonce_key: String,
    pub public_key: [String; 2],
}

impl EncryptionWitness {
    pub fn new(encryption: &Encryption, public_key: &PublicKey) -> Self {
        Self {
            nonce_key: encryption.nonce.to_decimal_string(),
            public_key: point_to_decimal(&public_key.0),
        }
    }
}

/// Parse a commitment given as a decimal string, as identity commitments usually are.
pub fn parse_commitment(commitment: &str) -> crate::Result<BigInteger256> {
    bigint_from_decimal(commitment).ok_or(ElGamalError::InvalidCommitment)
}

/// `commitment mod 2^32`
pub fn commitment_low_bits(commitment: &BigInteger256) -> u32 {
    (commitment.0[0] & ((1u64 << COMMITMENT_BITS) - 1)) as u32
}

/// Encrypt the low 32 bits of an identity commitment
pub fn encrypt_identity_commitment<R: RngCore + CryptoRng>(
    rng: &mut R,
    public_key: &PublicKey,
    commitment: &BigInteger256,
) -> crate::Result<Encryption> {
    let message: BabyJubjubAffine = encode_u32(commitment_low_bits(commitment));
    encrypt(rng, public_key, Some(&message), None)
}
