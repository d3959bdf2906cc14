//! Runtime values.
//!
//! Only double-precision numbers exist at this stage. The newtype keeps the
//! formatting rule in one place and lets the VM use plain operators.

use core::{
    fmt,
    ops::{Add, Div, Mul, Neg, Sub},
};

/// A runtime datum: one `f64`, copied by value.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Value(pub f64);

impl Value {
    /// Raw number.
    pub const fn as_f64(self) -> f64 { self.0 }

    /// Bitwise equality (`NaN == NaN`, `0.0 != -0.0`), used where two
    /// constants must be told apart exactly.
    pub fn same_bits(self, other: Self) -> bool { self.0.to_bits() == other.0.to_bits() }
}

/// Shortest round-trip decimal form: `1.2`, `3`, `-0.8214285714285714`, `inf`, `NaN`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

impl From<f64> for Value { fn from(v: f64) -> Self { Value(v) } }
impl From<Value> for f64 { fn from(v: Value) -> Self { v.0 } }

impl Add for Value {
    type Output = Value;
    fn add(self, rhs: Self) -> Self::Output { Value(self.0 + rhs.0) }
}

impl Sub for Value {
    type Output = Value;
    fn sub(self, rhs: Self) -> Self::Output { Value(self.0 - rhs.0) }
}

impl Mul for Value {
    type Output = Value;
    fn mul(self, rhs: Self) -> Self::Output { Value(self.0 * rhs.0) }
}

/// IEEE-754 division: `x / 0.0` is `±inf`, `0.0 / 0.0` is `NaN`.
impl Div for Value {
    type Output = Value;
    fn div(self, rhs: Self) -> Self::Output { Value(self.0 / rhs.0) }
}

impl Neg for Value {
    type Output = Value;
    fn neg(self) -> Self::Output { Value(-self.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_shortest_roundtrip() {
        assert_eq!(Value(1.2).to_string(), "1.2");
        assert_eq!(Value(3.0).to_string(), "3");
        assert_eq!(Value(-0.821_428_571_428_571_4).to_string(), "-0.8214285714285714");
        assert_eq!(Value(f64::INFINITY).to_string(), "inf");
        assert_eq!(Value(f64::NAN).to_string(), "NaN");
    }

    #[test]
    fn division_by_zero_follows_ieee() {
        assert_eq!((Value(1.0) / Value(0.0)).as_f64(), f64::INFINITY);
        assert_eq!((Value(-1.0) / Value(0.0)).as_f64(), f64::NEG_INFINITY);
        assert!((Value(0.0) / Value(0.0)).as_f64().is_nan());
    }

    #[test]
    fn same_bits_distinguishes_signed_zero() {
        assert!(!Value(0.0).same_bits(Value(-0.0)));
        assert!(Value(f64::NAN).same_bits(Value(f64::NAN)));
    }
}
