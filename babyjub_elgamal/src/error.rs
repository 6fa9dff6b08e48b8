use ark_serialize::SerializationError;

#[derive(Debug)]
pub enum ElGamalError {
    /// Private key seed is not less than the BN254 scalar field modulus or could not be parsed
    InvalidPrivateKey,
    /// Public key is the identity, not on the curve or outside the prime order subgroup
    InvalidPublicKey,
    /// Plaintext is at least 2^32 for encoding, or at least 2^64 for splitting
    PlaintextOutOfRange(u128),
    /// The baby-step search exhausted its range, so the point does not encode a 32-bit value
    DiscreteLogNotFound,
    /// Precompute size must be in `[1, 32]`
    InvalidPrecomputeSize(u8),
    /// Coordinates do not describe a point of the prime order subgroup
    InvalidPoint,
    /// Identity commitment is not a decimal integer below 2^256
    InvalidCommitment,
    Serialization(SerializationError),
    #[cfg(feature = "std")]
    TableStorage(TableStorageError),
}

impl From<SerializationError> for ElGamalError {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}

/// Failure of the durable lookup table mirror. Kept apart from `DiscreteLogNotFound` so that an
/// unreadable table is never mistaken for an undecodable point.
#[cfg(feature = "std")]
#[derive(Debug)]
pub enum TableStorageError {
    Io(std::io::Error),
    Format(serde_json::Error),
}

#[cfg(feature = "std")]
impl From<std::io::Error> for TableStorageError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(feature = "std")]
impl From<serde_json::Error> for TableStorageError {
    fn from(e: serde_json::Error) -> Self {
        Self::Format(e)
    }
}

#[cfg(feature = "std")]
impl From<TableStorageError> for ElGamalError {
    fn from(e: TableStorageError) -> Self {
        Self::TableStorage(e)
    }
}
