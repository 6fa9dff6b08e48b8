//! Baby Jubjub in the coordinates used by circomlib, i.e.
//! `168700 * x^2 + y^2 = 1 + 168696 * x^2 * y^2` over the scalar field of BN254. `ark-ed-on-bn254`
//! ships the same group but with a rescaled `x` (so that `a = 1`) and a different generator, which
//! would not match what a circom circuit sees. Only the field types are reused from it.

use alloc::string::{String, ToString};
use ark_ec::{
    twisted_edwards::{Affine, MontCurveConfig, Projective, TECurveConfig},
    AffineRepr, CurveConfig, Group,
};
use ark_ff::{BigInteger256, BitIteratorBE, MontFp, PrimeField};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{fmt, str::FromStr, Zero};
use num_bigint::BigUint;
use zeroize::Zeroize;

pub use ark_ed_on_bn254::{Fq, Fr};

#[derive(Clone, Default, PartialEq, Eq)]
pub struct BabyJubjubConfig;

pub type BabyJubjubAffine = Affine<BabyJubjubConfig>;
pub type BabyJubjubProjective = Projective<BabyJubjubConfig>;

/// x-coordinate of circomlib's `Base8`
pub const BASE8_X: Fq =
    MontFp!("5299619240641551281634865583518297030282874472190772894086521144482721001553");
/// y-coordinate of circomlib's `Base8`
pub const BASE8_Y: Fq =
    MontFp!("16950150798460657717958625567821834550301663161624707787222815936182638968203");

/// Generator of the prime order subgroup, circomlib's `Base8`.
pub const BASE: BabyJubjubAffine = BabyJubjubAffine::new_unchecked(BASE8_X, BASE8_Y);

impl CurveConfig for BabyJubjubConfig {
    type BaseField = Fq;
    type ScalarField = Fr;

    /// COFACTOR = 8
    const COFACTOR: &'static [u64] = &[8];

    /// COFACTOR^(-1) mod r
    const COFACTOR_INV: Fr =
        MontFp!("2394026564107420727433200628387514462817212225638746351800188703329891451411");
}

impl TECurveConfig for BabyJubjubConfig {
    const COEFF_A: Fq = MontFp!("168700");
    const COEFF_D: Fq = MontFp!("168696");
    const GENERATOR: BabyJubjubAffine = BASE;

    type MontCurveConfig = BabyJubjubConfig;
}

impl MontCurveConfig for BabyJubjubConfig {
    /// `2 * (a + d) / (a - d)`
    const COEFF_A: Fq = MontFp!("168698");
    /// `4 / (a - d)`
    const COEFF_B: Fq = MontFp!("1");

    type TECurveConfig = BabyJubjubConfig;
}

/// An exponent applied to curve points as a plain 256-bit integer. It is never reduced modulo the
/// subgroup order so that a derived secret keeps the exact value a circuit expects.
#[derive(Clone, Copy, Default, PartialEq, Eq, Zeroize, CanonicalSerialize, CanonicalDeserialize)]
pub struct Scalar(pub BigInteger256);

impl Scalar {
    pub fn to_decimal_string(&self) -> String {
        self.0.to_string()
    }

    pub fn from_decimal_str(s: &str) -> Option<Self> {
        bigint_from_decimal(s).map(Self)
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        Self(BigInteger256::from(value))
    }
}

// Scalars are secrets (private key exponents, nonces) so they are not printed
impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Scalar(<redacted>)")
    }
}

/// Multiply by a scalar that is public, like an encoded plaintext or a table index. Variable time.
pub fn mul_public(point: &BabyJubjubAffine, scalar: u64) -> BabyJubjubProjective {
    point.mul_bigint([scalar])
}

/// Multiply by a secret scalar using a Montgomery ladder. Every one of the 256 bits costs exactly
/// one addition and one doubling, and the twisted Edwards formulas are complete, so the sequence of
/// group operations does not depend on the scalar.
pub fn mul_secret(point: &BabyJubjubAffine, scalar: &Scalar) -> BabyJubjubProjective {
    let mut r0 = BabyJubjubProjective::zero();
    let mut r1 = point.into_group();
    // Invariant: r1 - r0 = point
    for bit in BitIteratorBE::new(scalar.0) {
        if bit {
            r0 += r1;
            r1.double_in_place();
        } else {
            r1 += r0;
            r0.double_in_place();
        }
    }
    r0
}

/// Returns true if the point is on the curve and in the prime order subgroup.
pub fn is_valid_point(point: &BabyJubjubAffine) -> bool {
    point.is_on_curve() && point.is_in_correct_subgroup_assuming_on_curve()
}

/// Parse a decimal string into a 256-bit integer. Returns None for anything that is not a plain
/// decimal number or that does not fit in 256 bits.
pub fn bigint_from_decimal(s: &str) -> Option<BigInteger256> {
    let n = BigUint::from_str(s).ok()?;
    BigInteger256::try_from(n).ok()
}

/// Parse a decimal string into a base field element, rejecting values not less than the modulus.
pub fn field_element_from_decimal(s: &str) -> Option<Fq> {
    Fq::from_bigint(bigint_from_decimal(s)?)
}

/// Affine coordinates as decimal strings, the way circuit inputs and public signals carry them.
pub fn point_to_decimal(point: &BabyJubjubAffine) -> [String; 2] {
    [
        point.x.into_bigint().to_string(),
        point.y.into_bigint().to_string(),
    ]
}

/// Inverse of `point_to_decimal`. The point must be on the curve and in the prime order subgroup.
pub fn point_from_decimal(x: &str, y: &str) -> crate::Result<BabyJubjubAffine> {
    let x = field_element_from_decimal(x).ok_or(crate::error::ElGamalError::InvalidPoint)?;
    let y = field_element_from_decimal(y).ok_or(crate::error::ElGamalError::InvalidPoint)?;
    let point = BabyJubjubAffine::new_unchecked(x, y);
    if !is_valid_point(&point) {
        return Err(crate::error::ElGamalError::InvalidPoint);
    }
    Ok(point)
}
