//! Exact numbers: normalized rationals with a floating-point fallback.
//!
//! Every arithmetic operation stays exact while the `i128` numerator and
//! denominator fit; on overflow the result degrades to `Real`.

use std::cmp::Ordering;
use std::fmt;

/// Tolerance below which a `Real` is treated as zero.
pub const REAL_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy)]
pub enum Number {
  /// Numerator and denominator, reduced, with a positive denominator.
  Rational(i128, i128),
  Real(f64),
}

pub fn gcd(a: i128, b: i128) -> i128 {
  let (mut a, mut b) = (a.unsigned_abs(), b.unsigned_abs());
  while b != 0 {
    let t = a % b;
    a = b;
    b = t;
  }
  a as i128
}

pub fn lcm(a: i128, b: i128) -> Option<i128> {
  if a == 0 || b == 0 {
    return Some(0);
  }
  (a / gcd(a, b)).checked_mul(b).map(i128::abs)
}

/// Split `n >= 0` into `(outside, inside)` with `n = outside² * inside` and
/// `inside` free of small square factors.
pub fn sqrt_parts(n: i128) -> (i128, i128) {
  let mut outside = 1;
  let mut inside = n;
  let mut f: i128 = 2;
  while f <= 1_000_000 && f * f <= inside {
    while inside % (f * f) == 0 {
      outside *= f;
      inside /= f * f;
    }
    f += 1;
  }
  (outside, inside)
}

impl Number {
  pub const ZERO: Number = Number::Rational(0, 1);
  pub const ONE: Number = Number::Rational(1, 1);

  pub fn int(n: i128) -> Self {
    Number::Rational(n, 1)
  }

  /// Build `num/den`, returning `None` for a zero denominator.
  pub fn rational(num: i128, den: i128) -> Option<Self> {
    if den == 0 {
      return None;
    }
    let g = gcd(num, den).max(1);
    let (mut n, mut d) = (num / g, den / g);
    if d < 0 {
      match (n.checked_neg(), d.checked_neg()) {
        (Some(nn), Some(nd)) => {
          n = nn;
          d = nd;
        }
        _ => return Some(Number::Real(num as f64 / den as f64)),
      }
    }
    Some(Number::Rational(n, d))
  }

  /// Read a decimal literal such as `12`, `2.5` or `.75` exactly.
  pub fn from_decimal(text: &str) -> Option<Self> {
    let (int_part, frac_part) = match text.split_once('.') {
      Some((i, f)) => (i, f),
      None => (text, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
      return None;
    }
    let digits = format!("{}{}", int_part, frac_part);
    if !digits.chars().all(|c| c.is_ascii_digit()) {
      return None;
    }
    let exact = digits.parse::<i128>().ok().and_then(|num| {
      let den = 10i128.checked_pow(frac_part.len() as u32)?;
      Number::rational(num, den)
    });
    match exact {
      Some(n) => Some(n),
      None => text.parse::<f64>().ok().map(Number::Real),
    }
  }

  pub fn to_f64(self) -> f64 {
    match self {
      Number::Rational(n, d) => n as f64 / d as f64,
      Number::Real(f) => f,
    }
  }

  pub fn is_exact(self) -> bool {
    matches!(self, Number::Rational(..))
  }

  pub fn is_zero(self) -> bool {
    match self {
      Number::Rational(n, _) => n == 0,
      Number::Real(f) => f == 0.0,
    }
  }

  /// Zero, or a `Real` within [`REAL_EPSILON`] of zero.
  pub fn is_negligible(self) -> bool {
    match self {
      Number::Rational(n, _) => n == 0,
      Number::Real(f) => f.abs() < REAL_EPSILON,
    }
  }

  pub fn is_one(self) -> bool {
    matches!(self, Number::Rational(1, 1))
  }

  pub fn to_integer(self) -> Option<i128> {
    match self {
      Number::Rational(n, 1) => Some(n),
      _ => None,
    }
  }

  pub fn signum(self) -> i8 {
    match self {
      Number::Rational(n, _) => n.signum() as i8,
      Number::Real(f) if f.abs() < REAL_EPSILON => 0,
      Number::Real(f) if f > 0.0 => 1,
      Number::Real(_) => -1,
    }
  }

  pub fn is_negative(self) -> bool {
    self.signum() < 0
  }

  pub fn abs(self) -> Self {
    if self.is_negative() {
      -self
    } else {
      self
    }
  }

  pub fn recip(self) -> Option<Self> {
    match self {
      Number::Rational(n, d) => Number::rational(d, n),
      Number::Real(f) if f == 0.0 => None,
      Number::Real(f) => Some(Number::Real(1.0 / f)),
    }
  }

  pub fn checked_div(self, rhs: Self) -> Option<Self> {
    Some(self * rhs.recip()?)
  }

  /// Integer power; `None` only for a negative power of zero.
  pub fn pow_int(self, exponent: i64) -> Option<Self> {
    if exponent < 0 {
      return self.recip()?.pow_int(-exponent);
    }
    let mut result = Number::ONE;
    for _ in 0..exponent {
      result = result * self;
    }
    Some(result)
  }

  pub fn numer(self) -> Option<i128> {
    match self {
      Number::Rational(n, _) => Some(n),
      Number::Real(_) => None,
    }
  }

  pub fn denom(self) -> Option<i128> {
    match self {
      Number::Rational(_, d) => Some(d),
      Number::Real(_) => None,
    }
  }

  /// `(numerator, denominator)` of a rational, used as an ordering key.
  pub fn key(self) -> (i128, i128) {
    match self {
      Number::Rational(n, d) => (n, d),
      Number::Real(f) => ((f * 1e9) as i128, 1_000_000_000),
    }
  }
}

fn rational_op(
  a: (i128, i128),
  b: (i128, i128),
  op: fn(i128, i128) -> Option<i128>,
) -> Option<Number> {
  let (an, ad) = a;
  let (bn, bd) = b;
  let num = op(an.checked_mul(bd)?, bn.checked_mul(ad)?)?;
  Number::rational(num, ad.checked_mul(bd)?)
}

impl std::ops::Add for Number {
  type Output = Self;

  fn add(self, rhs: Self) -> Self {
    match (self, rhs) {
      (Number::Rational(a, b), Number::Rational(c, d)) => {
        rational_op((a, b), (c, d), i128::checked_add)
          .unwrap_or(Number::Real(self.to_f64() + rhs.to_f64()))
      }
      _ => Number::Real(self.to_f64() + rhs.to_f64()),
    }
  }
}

impl std::ops::Sub for Number {
  type Output = Self;

  fn sub(self, rhs: Self) -> Self {
    match (self, rhs) {
      (Number::Rational(a, b), Number::Rational(c, d)) => {
        rational_op((a, b), (c, d), i128::checked_sub)
          .unwrap_or(Number::Real(self.to_f64() - rhs.to_f64()))
      }
      _ => Number::Real(self.to_f64() - rhs.to_f64()),
    }
  }
}

impl std::ops::Mul for Number {
  type Output = Self;

  fn mul(self, rhs: Self) -> Self {
    match (self, rhs) {
      (Number::Rational(a, b), Number::Rational(c, d)) => {
        // Cross-reduce first to keep intermediate values small
        let g1 = gcd(a, d).max(1);
        let g2 = gcd(c, b).max(1);
        let exact = (a / g1)
          .checked_mul(c / g2)
          .zip((b / g2).checked_mul(d / g1))
          .and_then(|(n, d)| Number::rational(n, d));
        exact.unwrap_or(Number::Real(self.to_f64() * rhs.to_f64()))
      }
      _ => Number::Real(self.to_f64() * rhs.to_f64()),
    }
  }
}

impl std::ops::Neg for Number {
  type Output = Self;

  fn neg(self) -> Self {
    match self {
      Number::Rational(n, d) => match n.checked_neg() {
        Some(n) => Number::Rational(n, d),
        None => Number::Real(-(n as f64) / d as f64),
      },
      Number::Real(f) => Number::Real(-f),
    }
  }
}

impl PartialEq for Number {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Number::Rational(a, b), Number::Rational(c, d)) => a == c && b == d,
      _ => self.to_f64() == other.to_f64(),
    }
  }
}

impl PartialOrd for Number {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    match (*self, *other) {
      (Number::Rational(a, b), Number::Rational(c, d)) => {
        match (a.checked_mul(d), c.checked_mul(b)) {
          (Some(l), Some(r)) => Some(l.cmp(&r)),
          _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
      }
      _ => self.to_f64().partial_cmp(&other.to_f64()),
    }
  }
}

impl fmt::Display for Number {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Number::Rational(n, 1) => write!(f, "{}", n),
      Number::Rational(n, d) => write!(f, "{}/{}", n, d),
      Number::Real(x) => write!(f, "{}", format_real(*x)),
    }
  }
}

/// Render a float with at most `places` decimals, trailing zeros trimmed.
pub fn format_decimal(x: f64, places: usize) -> String {
  let s = format!("{:.*}", places, x);
  let s = if s.contains('.') {
    s.trim_end_matches('0').trim_end_matches('.').to_string()
  } else {
    s
  };
  if s == "-0" {
    "0".to_string()
  } else {
    s
  }
}

/// Ten significant digits in scientific notation: `1.5e-40`.
fn format_scientific(x: f64) -> String {
  let s = format!("{:.9e}", x);
  match s.split_once('e') {
    Some((mantissa, exponent)) => {
      let mantissa = mantissa.trim_end_matches('0').trim_end_matches('.');
      format!("{}e{}", mantissa, exponent)
    }
    None => s,
  }
}

fn format_real(x: f64) -> String {
  if !x.is_finite() {
    x.to_string()
  } else if x != 0.0 && (x.abs() < 1e-6 || x.abs() >= 1e15) {
    format_scientific(x)
  } else {
    format_decimal(x, 10)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rationals_are_normalized() {
    assert_eq!(Number::rational(4, -8), Some(Number::Rational(-1, 2)));
    assert_eq!(Number::rational(3, 0), None);
  }

  #[test]
  fn decimals_are_exact() {
    assert_eq!(Number::from_decimal("2.50"), Some(Number::Rational(5, 2)));
    assert_eq!(Number::from_decimal(".75"), Some(Number::Rational(3, 4)));
    assert_eq!(Number::from_decimal("12"), Some(Number::int(12)));
  }

  #[test]
  fn overflow_degrades_to_real() {
    let big = Number::int(i128::MAX);
    assert!(!(big * big).is_exact());
  }

  #[test]
  fn sqrt_parts_extracts_squares() {
    assert_eq!(sqrt_parts(20), (2, 5));
    assert_eq!(sqrt_parts(49), (7, 1));
    assert_eq!(sqrt_parts(7), (1, 7));
  }

  #[test]
  fn display() {
    assert_eq!(Number::rational(-3, 4).unwrap().to_string(), "-3/4");
    assert_eq!(Number::Real(0.5).to_string(), "0.5");
    assert_eq!(format_decimal(28.274333882308138, 6), "28.274334");
  }

  #[test]
  fn tiny_and_huge_reals_use_scientific_notation() {
    assert_eq!(Number::Real(1e-40).to_string(), "1e-40");
    assert_eq!(Number::Real(9.999999999999999e-41).to_string(), "1e-40");
    assert_eq!(Number::Real(-2.5e20).to_string(), "-2.5e20");
    assert_eq!(Number::Real(0.0).to_string(), "0");
  }
}
