//! Exact exchange rates as integer fractions.

use super::SignedBigInt;
use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;

/// Largest bit width kept when approximating a fraction as `f64`.
const F64_APPROX_BITS: u64 = 1000;

/// An exchange rate `numerator / denominator` with a non-zero denominator.
#[derive(Debug, Clone)]
pub struct ExactRate {
    numerator: BigUint,
    denominator: BigUint,
}

impl ExactRate {
    /// Returns `None` when `denominator` is zero.
    pub fn new(numerator: BigUint, denominator: BigUint) -> Option<Self> {
        if denominator.is_zero() {
            return None;
        }
        Some(Self { numerator, denominator })
    }

    /// The multiplicative identity (a 1:1 rate).
    pub fn one() -> Self {
        Self {
            numerator: BigUint::one(),
            denominator: BigUint::one(),
        }
    }

    pub fn numerator(&self) -> &BigUint {
        &self.numerator
    }

    pub fn denominator(&self) -> &BigUint {
        &self.denominator
    }

    /// Compound this rate with the next hop's rate.
    pub fn compound(&self, next: &ExactRate) -> ExactRate {
        ExactRate {
            numerator: &self.numerator * &next.numerator,
            denominator: &self.denominator * &next.denominator,
        }
    }

    /// `numerator - denominator`: positive exactly when the rate exceeds 1:1.
    pub fn surplus(&self) -> SignedBigInt {
        SignedBigInt::positive(self.numerator.clone()) - SignedBigInt::positive(self.denominator.clone())
    }

    /// Approximate value as `f64`.
    ///
    /// Both sides are shifted down together first so fractions of huge
    /// fixed-point reserves do not overflow to `inf / inf`.
    pub fn to_f64(&self) -> f64 {
        let bits = self.numerator.bits().max(self.denominator.bits());
        let shift = bits.saturating_sub(F64_APPROX_BITS);
        let numerator = (&self.numerator >> shift).to_f64().unwrap_or(f64::INFINITY);
        let denominator = (&self.denominator >> shift).to_f64().unwrap_or(f64::INFINITY);
        numerator / denominator
    }
}

impl PartialEq for ExactRate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ExactRate {}

impl Ord for ExactRate {
    /// Cross-multiplied comparison; no rounding involved.
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.numerator * &other.denominator).cmp(&(&other.numerator * &self.denominator))
    }
}

impl PartialOrd for ExactRate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ExactRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}
