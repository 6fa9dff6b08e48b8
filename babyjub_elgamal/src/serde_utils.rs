//! Serde adapters for points and scalars. Both are written as decimal strings, the representation
//! circuits and their JSON input files use, rather than as canonical bytes.

use crate::curve::{point_from_decimal, point_to_decimal, BabyJubjubAffine, Scalar};
use alloc::string::String;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_with::{DeserializeAs, SerializeAs};

/// `[x, y]` as decimal strings. Deserialization checks the point is in the prime order subgroup.
pub struct DecimalPoint;

impl SerializeAs<BabyJubjubAffine> for DecimalPoint {
    fn serialize_as<S>(point: &BabyJubjubAffine, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        point_to_decimal(point).serialize(serializer)
    }
}

impl<'de> DeserializeAs<'de, BabyJubjubAffine> for DecimalPoint {
    fn deserialize_as<D>(deserializer: D) -> Result<BabyJubjubAffine, D::Error>
    where
        D: Deserializer<'de>,
    {
        let [x, y] = <[String; 2]>::deserialize(deserializer)?;
        point_from_decimal(&x, &y)
            .map_err(|_| de::Error::custom("not a point of the Baby Jubjub prime order subgroup"))
    }
}

/// A scalar as a decimal string
pub struct DecimalScalar;

impl SerializeAs<Scalar> for DecimalScalar {
    fn serialize_as<S>(scalar: &Scalar, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&scalar.to_decimal_string())
    }
}

impl<'de> DeserializeAs<'de, Scalar> for DecimalScalar {
    fn deserialize_as<D>(deserializer: D) -> Result<Scalar, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Scalar::from_decimal_str(&s)
            .ok_or_else(|| de::Error::custom("scalar must be a decimal integer below 2^256"))
    }
}
