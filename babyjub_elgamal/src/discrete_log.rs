//! Recover a 32-bit plaintext `m` from the point `m * BASE` with a baby-step giant-step search.
//!
//! For a precompute size `p`, write `m = xlo + 2^(32-p) * xhi` with `xhi < 2^p` and
//! `xlo < 2^(32-p)`. The [`LookupTable`] maps the x-coordinate of every giant step
//! `(xhi * 2^(32-p)) * BASE` to `xhi`. Decoding walks `target - xlo * BASE` for increasing `xlo`
//! until the x-coordinate is in the table. A larger `p` means a larger table and fewer steps.
//!
//! Only x-coordinates are stored. Negation maps `(x, y)` to `(-x, y)`, so the only other point
//! with the x-coordinate of `P` is `(x, -y) = (0, -1) - P`, which is outside the prime order
//! subgroup. Targets outside the subgroup are rejected up front and every candidate
//! `target - xlo * BASE` stays inside it, so a key hit always identifies the giant step.
//!
//! All points involved are public so variable time arithmetic is used throughout.

use crate::{
    curve::{is_valid_point, mul_public, BabyJubjubAffine, BabyJubjubProjective, Fq, BASE},
    error::ElGamalError,
};
use alloc::{
    format,
    string::{String, ToString},
    vec,
    vec::Vec,
};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{BigInteger256, PrimeField};
use ark_std::{cfg_into_iter, collections::BTreeMap, end_timer, fmt, start_timer};
use serde::{
    de::{self, MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Bit length of plaintexts that can be decoded
pub const PLAINTEXT_BITS: u8 = 32;

/// `2^19` table entries and at most `2^13` search steps
pub const DEFAULT_PRECOMPUTE_SIZE: u8 = 19;

/// Number of points converted to affine together, both when building and when searching
pub const BATCH_SIZE: u64 = 1 << 10;

pub fn check_precompute_size(precompute_size: u8) -> crate::Result<()> {
    if precompute_size == 0 || precompute_size > PLAINTEXT_BITS {
        return Err(ElGamalError::InvalidPrecomputeSize(precompute_size));
    }
    Ok(())
}

/// Giant steps, keyed by x-coordinate. When serialized with serde this is a flat map from the
/// decimal x-coordinate to `xhi` in lowercase hex without prefix.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LookupTable {
    entries: BTreeMap<BigInteger256, u32>,
}

impl LookupTable {
    /// Compute the giant steps for `precompute_size`. This is the expensive part of decoding,
    /// `2^precompute_size` points, and is done in parallel with the `parallel` feature.
    pub fn build(precompute_size: u8) -> crate::Result<Self> {
        check_precompute_size(precompute_size)?;
        let build_time =
            start_timer!(|| format!("Build lookup table of size 2^{}", precompute_size));

        let range = PLAINTEXT_BITS - precompute_size;
        let count = 1u64 << precompute_size;
        let step = mul_public(&BASE, 1u64 << range).into_affine();
        let num_batches = (count + BATCH_SIZE - 1) / BATCH_SIZE;

        let batches: Vec<Vec<(BigInteger256, u32)>> = cfg_into_iter!(0..num_batches)
            .map(|b| {
                let start = b * BATCH_SIZE;
                let end = core::cmp::min(start + BATCH_SIZE, count);
                let mut cur = mul_public(&step, start);
                let mut points = Vec::with_capacity((end - start) as usize);
                for _ in start..end {
                    points.push(cur);
                    cur += step;
                }
                BabyJubjubProjective::normalize_batch(&points)
                    .into_iter()
                    .zip(start..end)
                    .map(|(p, xhi)| (p.x.into_bigint(), xhi as u32))
                    .collect::<Vec<_>>()
            })
            .collect();

        let entries = batches.into_iter().flatten().collect();
        end_timer!(build_time);
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if the table has as many entries as a table for `precompute_size`
    pub fn has_size(&self, precompute_size: u8) -> bool {
        check_precompute_size(precompute_size).is_ok()
            && self.entries.len() as u64 == 1u64 << precompute_size
    }

    /// Returns true if every `xhi < 2^precompute_size` appears exactly once. Tables read back from
    /// storage must pass this before they are used.
    pub fn is_complete(&self, precompute_size: u8) -> bool {
        if !self.has_size(precompute_size) {
            return false;
        }
        let mut seen = vec![false; self.entries.len()];
        self.entries
            .values()
            .all(|xhi| match seen.get_mut(*xhi as usize) {
                Some(s) if !*s => {
                    *s = true;
                    true
                }
                _ => false,
            })
    }

    /// `xhi` of the giant step with this x-coordinate
    pub fn get(&self, x: &Fq) -> Option<u32> {
        self.entries.get(&x.into_bigint()).copied()
    }

    /// Find `m < 2^32` with `m * BASE = target`. The table must have been built for
    /// `precompute_size`. Returns `DiscreteLogNotFound` if the whole range has been searched, which
    /// is always the case for points outside the prime order subgroup.
    pub fn solve(&self, target: &BabyJubjubAffine, precompute_size: u8) -> crate::Result<u32> {
        check_precompute_size(precompute_size)?;
        if !self.has_size(precompute_size) {
            return Err(ElGamalError::InvalidPrecomputeSize(precompute_size));
        }
        if !is_valid_point(target) {
            return Err(ElGamalError::DiscreteLogNotFound);
        }
        let search_time = start_timer!(|| "Baby step search");

        let range = PLAINTEXT_BITS - precompute_size;
        let steps = 1u64 << range;
        let neg_base = -BASE;
        let mut cur = target.into_group();
        let mut start = 0;
        while start < steps {
            let end = core::cmp::min(start + BATCH_SIZE, steps);
            let mut candidates = Vec::with_capacity((end - start) as usize);
            for _ in start..end {
                candidates.push(cur);
                cur += neg_base;
            }
            let candidates = BabyJubjubProjective::normalize_batch(&candidates);
            for (c, xlo) in candidates.iter().zip(start..end) {
                match self.entries.get(&c.x.into_bigint()) {
                    // An out of range entry can only come from a corrupted table
                    Some(xhi) if (*xhi as u64) >> precompute_size == 0 => {
                        end_timer!(search_time);
                        return Ok(xlo as u32 + (*xhi << range));
                    }
                    _ => {}
                }
            }
            start = end;
        }

        end_timer!(search_time);
        Err(ElGamalError::DiscreteLogNotFound)
    }
}

impl Serialize for LookupTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (x, xhi) in &self.entries {
            map.serialize_entry(&x.to_string(), &format!("{:x}", xhi))?;
        }
        map.end()
    }
}

struct LookupTableVisitor;

impl<'de> Visitor<'de> for LookupTableVisitor {
    type Value = LookupTable;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map from decimal x-coordinates to hex exponents")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = BTreeMap::new();
        while let Some((x, xhi)) = access.next_entry::<String, String>()? {
            let x = crate::curve::field_element_from_decimal(&x)
                .ok_or_else(|| de::Error::custom(format!("invalid x-coordinate {}", x)))?;
            let xhi = u32::from_str_radix(&xhi, 16)
                .map_err(|_| de::Error::custom(format!("invalid exponent {}", xhi)))?;
            entries.insert(x.into_bigint(), xhi);
        }
        Ok(LookupTable { entries })
    }
}

impl<'de> Deserialize<'de> for LookupTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(LookupTableVisitor)
    }
}

/// Decode without any caching, building the table on every call. Meant for one-off decodes with a
/// small precompute size, otherwise use a `TableCache`.
pub fn decode(target: &BabyJubjubAffine, precompute_size: u8) -> crate::Result<u32> {
    LookupTable::build(precompute_size)?.solve(target, precompute_size)
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::{elgamal::encode, keys::KeyPair};
    use ark_ec::AffineRepr;
    use ark_std::{
        rand::{rngs::StdRng, SeedableRng},
        UniformRand,
    };
    use std::time::Instant;

    #[test]
    fn table_content() {
        let table = LookupTable::build(4).unwrap();
        assert_eq!(table.len(), 16);
        assert!(table.has_size(4));
        assert!(!table.has_size(5));
        // Identity has x = 0
        assert_eq!(table.get(&Fq::from(0u64)), Some(0));
        for xhi in 0..16u64 {
            let point = mul_public(&BASE, xhi << 28).into_affine();
            assert_eq!(table.get(&point.x), Some(xhi as u32));
        }
        assert_eq!(table.get(&BASE.x), None);
        assert!(table.is_complete(4));
        assert!(!table.is_complete(5));

        // Negation flips x
        let giant = mul_public(&BASE, 3 << 28).into_affine();
        let neg = -giant;
        assert_eq!(table.get(&neg.x), None);

        // (x, -y) shares the key of a giant step but is outside the subgroup
        let partner = BabyJubjubAffine::new_unchecked(giant.x, -giant.y);
        assert!(partner.is_on_curve());
        assert!(!partner.is_in_correct_subgroup_assuming_on_curve());
        assert_eq!(table.get(&partner.x), Some(3));
        assert!(matches!(
            table.solve(&partner, 4),
            Err(ElGamalError::DiscreteLogNotFound)
        ));
    }

    #[test]
    fn corrupted_tables() {
        let p = 16;
        let table = LookupTable::build(p).unwrap();
        assert_eq!(table.solve(&encode(5).unwrap(), p).unwrap(), 5);

        // Right number of entries, every exponent out of range
        let all_ff = LookupTable {
            entries: table.entries.keys().map(|x| (*x, u32::MAX)).collect(),
        };
        assert!(all_ff.has_size(p));
        assert!(!all_ff.is_complete(p));
        assert!(matches!(
            all_ff.solve(&encode(5).unwrap(), p),
            Err(ElGamalError::DiscreteLogNotFound)
        ));

        // Same, read from a table file
        let json = serde_json::to_string(&all_ff).unwrap();
        assert!(json.contains("\"ffffffff\""));
        let loaded: LookupTable = serde_json::from_str(&json).unwrap();
        assert!(!loaded.is_complete(p));

        // One exponent just out of range
        let mut entries = table.entries.clone();
        entries.insert(BigInteger256::from(0u64), 1 << p);
        let shifted = LookupTable { entries };
        assert!(shifted.has_size(p));
        assert!(!shifted.is_complete(p));
        assert!(matches!(
            shifted.solve(&BabyJubjubAffine::zero(), p),
            Err(ElGamalError::DiscreteLogNotFound)
        ));

        // A repeated exponent
        let mut entries = table.entries.clone();
        entries.insert(BigInteger256::from(0u64), 1);
        assert!(!LookupTable { entries }.is_complete(p));

        assert!(!table.is_complete(32));
        assert!(!table.is_complete(0));
    }

    #[test]
    fn table_json() {
        let table = LookupTable::build(2).unwrap();
        let json = serde_json::to_string(&table).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), 4);
        assert_eq!(map["0"], "0");
        let x3 = mul_public(&BASE, 3 << 30).into_affine().x.into_bigint().to_string();
        assert_eq!(map[&x3], "3");
        assert_eq!(serde_json::from_str::<LookupTable>(&json).unwrap(), table);

        // Hex values as in existing table files
        let table = LookupTable::build(5).unwrap();
        let json = serde_json::to_string(&table).unwrap();
        let x26 = mul_public(&BASE, 26 << 27).into_affine().x.into_bigint().to_string();
        assert!(json.contains(&format!("\"{}\":\"1a\"", x26)));

        assert!(serde_json::from_str::<LookupTable>("{\"abc\":\"1\"}").is_err());
        assert!(serde_json::from_str::<LookupTable>("{\"1\":\"xyz\"}").is_err());
        assert!(serde_json::from_str::<LookupTable>("{\"1\":\"100000000\"}").is_err());
        assert!(serde_json::from_str::<LookupTable>("[1, 2]").is_err());
    }

    #[test]
    fn decode_values() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let p = 16;
        let start = Instant::now();
        let table = LookupTable::build(p).unwrap();
        println!("Table of size 2^{} built in {:?}", p, start.elapsed());

        let mut values = vec![0u32, 1, 2, 1 << 16, (1 << 16) - 1, u32::MAX];
        for _ in 0..5 {
            values.push(u32::rand(&mut rng));
        }
        for m in values {
            let start = Instant::now();
            assert_eq!(table.solve(&encode(m as u64).unwrap(), p).unwrap(), m);
            println!("Decoded {} in {:?}", m, start.elapsed());
        }
    }

    #[test]
    fn decrypted_values() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let p = 16;
        let table = LookupTable::build(p).unwrap();
        let kp = KeyPair::generate(&mut rng);
        for _ in 0..3 {
            let m = u32::rand(&mut rng);
            let enc = crate::elgamal::encrypt(
                &mut rng,
                &kp.public_key,
                Some(&encode(m as u64).unwrap()),
                None,
            )
            .unwrap();
            let point = enc.ciphertext.decrypt(&kp.private_key);
            assert_eq!(table.solve(&point, p).unwrap(), m);
        }
    }

    #[test]
    fn default_precompute_size() {
        let start = Instant::now();
        let table = LookupTable::build(DEFAULT_PRECOMPUTE_SIZE).unwrap();
        println!("Default table built in {:?}", start.elapsed());
        assert_eq!(table.len(), 1 << 19);

        let start = Instant::now();
        let m = table
            .solve(&encode(123456).unwrap(), DEFAULT_PRECOMPUTE_SIZE)
            .unwrap();
        println!("Decoded in {:?}", start.elapsed());
        assert_eq!(m, 123456);

        // Found at xlo = 123456 mod 2^13, within the 2^13 baby steps
        let xlo = 123456u64 % (1 << 13);
        assert_eq!(xlo, 576);
        let giant = (encode(123456).unwrap().into_group() - mul_public(&BASE, xlo)).into_affine();
        assert_eq!(table.get(&giant.x), Some(123456 >> 13));
    }

    #[test]
    fn not_found() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let p = 16;
        let table = LookupTable::build(p).unwrap();

        let random = crate::elgamal::random_point(&mut rng);
        assert!(matches!(
            table.solve(&random, p),
            Err(ElGamalError::DiscreteLogNotFound)
        ));

        // Just outside the range
        let too_large = mul_public(&BASE, 1 << 32).into_affine();
        assert!(matches!(
            table.solve(&too_large, p),
            Err(ElGamalError::DiscreteLogNotFound)
        ));

        // Not in the subgroup, rejected before searching
        let torsion = BabyJubjubAffine::new_unchecked(Fq::from(0u64), -Fq::from(1u64));
        assert!(matches!(
            table.solve(&torsion, p),
            Err(ElGamalError::DiscreteLogNotFound)
        ));
        let shifted = (encode(5).unwrap().into_group() + torsion).into_affine();
        assert!(matches!(
            table.solve(&shifted, p),
            Err(ElGamalError::DiscreteLogNotFound)
        ));

        assert_eq!(table.solve(&BabyJubjubAffine::zero(), p).unwrap(), 0);
    }

    #[test]
    fn invalid_sizes() {
        assert!(matches!(
            LookupTable::build(0),
            Err(ElGamalError::InvalidPrecomputeSize(0))
        ));
        assert!(matches!(
            LookupTable::build(33),
            Err(ElGamalError::InvalidPrecomputeSize(33))
        ));
        assert!(matches!(
            decode(&BASE, 0),
            Err(ElGamalError::InvalidPrecomputeSize(0))
        ));

        // Table built for another size
        let table = LookupTable::build(4).unwrap();
        assert!(matches!(
            table.solve(&BASE, 5),
            Err(ElGamalError::InvalidPrecomputeSize(5))
        ));
        assert_eq!(decode(&encode(77).unwrap(), 8).unwrap(), 77);
    }
}
