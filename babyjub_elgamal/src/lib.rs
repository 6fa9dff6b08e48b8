#![cfg_attr(not(feature = "std"), no_std)]

//! Additively homomorphic Elgamal encryption over the Baby Jubjub curve, in the coordinates used by
//! circomlib so that ciphertexts and keys can be fed to circuits directly.
//!
//! - Private keys are seeds below the BN254 scalar field modulus. A seed is hashed and clamped into
//!   the exponent that is actually applied to curve points, see [`keys`].
//! - A 32-bit plaintext `m` is encoded as `m * BASE` and encrypted with [`elgamal`]. Ciphertexts
//!   under the same key can be added, which adds the plaintexts.
//! - Decrypting returns the point `m * BASE`. Recovering `m` is a discrete log in `[0, 2^32)`,
//!   solved with a baby-step giant-step search over a precomputed [`discrete_log::LookupTable`].
//!   With `std`, [`table_cache::TableCache`] builds each table once per process and mirrors it
//!   to a [`storage::TableStorage`] so later processes can load it.
//! - 64-bit values are split into two 32-bit halves with [`split`], encrypted separately and
//!   merged after decoding.
//! - [`circuit`] exposes ciphertexts and witnesses as the decimal strings a prover consumes.

extern crate alloc;

pub mod circuit;
pub mod curve;
pub mod discrete_log;
pub mod elgamal;
pub mod error;
pub mod keys;
pub mod randomness;
pub mod serde_utils;
pub mod split;
#[cfg(feature = "std")]
pub mod storage;
#[cfg(feature = "std")]
pub mod table_cache;

pub use curve::{BabyJubjubAffine, Scalar, BASE};
pub use discrete_log::{LookupTable, DEFAULT_PRECOMPUTE_SIZE};
pub use elgamal::{decrypt, encode, encrypt, rerandomize, Ciphertext, Encryption};
pub use error::ElGamalError;
pub use keys::{KeyPair, PrivateKey, PublicKey};
pub use split::{merge64, split64};
#[cfg(feature = "std")]
pub use table_cache::TableCache;

pub type Result<T> = core::result::Result<T, ElGamalError>;

#[cfg(test)]
#[macro_export]
macro_rules! test_serialization {
    ($obj_type:ty, $obj: expr) => {
        let mut serz = vec![];
        ark_serialize::CanonicalSerialize::serialize_compressed(&$obj, &mut serz).unwrap();
        let deserz: $obj_type =
            ark_serialize::CanonicalDeserialize::deserialize_compressed(&serz[..]).unwrap();
        assert_eq!(deserz, $obj);

        let mut serz = vec![];
        ark_serialize::CanonicalSerialize::serialize_uncompressed(&$obj, &mut serz).unwrap();
        let deserz: $obj_type =
            ark_serialize::CanonicalDeserialize::deserialize_uncompressed(&serz[..]).unwrap();
        assert_eq!(deserz, $obj);

        // Test JSON serialization
        let ser = serde_json::to_string(&$obj).unwrap();
        let deser = serde_json::from_str::<$obj_type>(&ser).unwrap();
        assert_eq!($obj, deser);
    };
}
