//! Signed arbitrary-precision integer over a `BigUint` magnitude.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// A sign-magnitude integer used for reserve and fee math.
///
/// The magnitude grows as needed, so none of the arithmetic here can
/// overflow. Zero is always stored with a positive sign, which makes
/// `a + (-a)` compare equal to `SignedBigInt::zero()` regardless of the sign
/// of `a`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "SignedBigIntRepr")]
pub struct SignedBigInt {
    magnitude: BigUint,
    negative: bool,
}

/// Wire form, normalized through `SignedBigInt::new` on the way in.
#[derive(Deserialize)]
struct SignedBigIntRepr {
    magnitude: BigUint,
    negative: bool,
}

impl From<SignedBigIntRepr> for SignedBigInt {
    fn from(repr: SignedBigIntRepr) -> Self {
        Self::new(repr.magnitude, repr.negative)
    }
}

impl SignedBigInt {
    /// Build a value from a magnitude and a sign flag (`true` for negative).
    pub fn new(magnitude: BigUint, negative: bool) -> Self {
        let negative = negative && !magnitude.is_zero();
        Self { magnitude, negative }
    }

    /// A non-negative value with the given magnitude.
    pub fn positive(magnitude: BigUint) -> Self {
        Self::new(magnitude, false)
    }

    /// A non-positive value with the given magnitude.
    pub fn negative(magnitude: BigUint) -> Self {
        Self::new(magnitude, true)
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn magnitude(&self) -> &BigUint {
        &self.magnitude
    }

    pub fn into_magnitude(self) -> BigUint {
        self.magnitude
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude.is_zero()
    }

    /// Strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        !self.negative && !self.magnitude.is_zero()
    }

    /// Approximate value as `f64`; `None` when the magnitude overflows it.
    pub fn to_f64(&self) -> Option<f64> {
        let value = self.magnitude.to_f64().filter(|v| v.is_finite())?;
        Some(if self.negative { -value } else { value })
    }

    /// Signed addition of `rhs` into `self`.
    ///
    /// Equal signs add magnitudes. Differing signs subtract the smaller
    /// magnitude from the larger and take the sign of the larger operand.
    fn add_signed(&mut self, rhs_magnitude: &BigUint, rhs_negative: bool) {
        if self.negative == rhs_negative {
            self.magnitude += rhs_magnitude;
        } else if self.magnitude >= *rhs_magnitude {
            self.magnitude -= rhs_magnitude;
        } else {
            self.magnitude = rhs_magnitude - &self.magnitude;
            self.negative = rhs_negative;
        }

        if self.magnitude.is_zero() {
            self.negative = false;
        }
    }
}

impl From<BigUint> for SignedBigInt {
    fn from(magnitude: BigUint) -> Self {
        Self::positive(magnitude)
    }
}

impl From<u64> for SignedBigInt {
    fn from(value: u64) -> Self {
        Self::positive(BigUint::from(value))
    }
}

impl From<i64> for SignedBigInt {
    fn from(value: i64) -> Self {
        Self::new(BigUint::from(value.unsigned_abs()), value < 0)
    }
}

impl From<SignedBigInt> for BigInt {
    fn from(value: SignedBigInt) -> Self {
        let sign = if value.negative { Sign::Minus } else { Sign::Plus };
        BigInt::from_biguint(sign, value.magnitude)
    }
}

impl From<BigInt> for SignedBigInt {
    fn from(value: BigInt) -> Self {
        let (sign, magnitude) = value.into_parts();
        Self::new(magnitude, sign == Sign::Minus)
    }
}

impl Ord for SignedBigInt {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => self.magnitude.cmp(&other.magnitude),
            (true, true) => other.magnitude.cmp(&self.magnitude),
        }
    }
}

impl PartialOrd for SignedBigInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Neg for SignedBigInt {
    type Output = SignedBigInt;

    fn neg(self) -> Self::Output {
        Self::new(self.magnitude, !self.negative)
    }
}

impl Neg for &SignedBigInt {
    type Output = SignedBigInt;

    fn neg(self) -> Self::Output {
        SignedBigInt::new(self.magnitude.clone(), !self.negative)
    }
}

impl AddAssign<&SignedBigInt> for SignedBigInt {
    fn add_assign(&mut self, rhs: &SignedBigInt) {
        self.add_signed(&rhs.magnitude, rhs.negative);
    }
}

impl AddAssign for SignedBigInt {
    fn add_assign(&mut self, rhs: SignedBigInt) {
        self.add_signed(&rhs.magnitude, rhs.negative);
    }
}

impl SubAssign<&SignedBigInt> for SignedBigInt {
    fn sub_assign(&mut self, rhs: &SignedBigInt) {
        // a - b == a + (-b); a zero rhs has no sign to flip
        let flipped = !rhs.negative && !rhs.magnitude.is_zero();
        self.add_signed(&rhs.magnitude, flipped);
    }
}

impl SubAssign for SignedBigInt {
    fn sub_assign(&mut self, rhs: SignedBigInt) {
        *self -= &rhs;
    }
}

impl Add for SignedBigInt {
    type Output = SignedBigInt;

    fn add(mut self, rhs: SignedBigInt) -> Self::Output {
        self += rhs;
        self
    }
}

impl Add<&SignedBigInt> for &SignedBigInt {
    type Output = SignedBigInt;

    fn add(self, rhs: &SignedBigInt) -> Self::Output {
        let mut result = self.clone();
        result += rhs;
        result
    }
}

impl Sub for SignedBigInt {
    type Output = SignedBigInt;

    fn sub(mut self, rhs: SignedBigInt) -> Self::Output {
        self -= &rhs;
        self
    }
}

impl Sub<&SignedBigInt> for &SignedBigInt {
    type Output = SignedBigInt;

    fn sub(self, rhs: &SignedBigInt) -> Self::Output {
        let mut result = self.clone();
        result -= rhs;
        result
    }
}

impl Mul for SignedBigInt {
    type Output = SignedBigInt;

    fn mul(self, rhs: SignedBigInt) -> Self::Output {
        &self * &rhs
    }
}

impl Mul<&SignedBigInt> for &SignedBigInt {
    type Output = SignedBigInt;

    fn mul(self, rhs: &SignedBigInt) -> Self::Output {
        SignedBigInt::new(&self.magnitude * &rhs.magnitude, self.negative ^ rhs.negative)
    }
}

impl fmt::Display for SignedBigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-{}", self.magnitude)
        } else {
            write!(f, "{}", self.magnitude)
        }
    }
}
