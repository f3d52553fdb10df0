// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Numbers for exact arithmetic.
//!
//! Values stay exact rationals as long as they fit in `i64` and the
//! operation has a rational result; anything else degrades to `f64`.

use std::fmt;

use crate::{AlgebraError, Result};

/// Significant digits used when rendering a non-integer value.
const SIGNIFICANT_DIGITS: i32 = 15;

fn gcd(mut a: i128, mut b: i128) -> i128 {
    a = a.abs();
    b = b.abs();
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// A numeric value.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    /// Exact rational (numerator, denominator).
    /// Invariant: denominator > 0, gcd(num, den) == 1.
    Rational(i64, i64),
    /// Floating-point approximation.
    Float(f64),
}

impl Number {
    pub fn int(n: i64) -> Self {
        Number::Rational(n, 1)
    }

    pub fn float(value: f64) -> Self {
        Number::Float(value)
    }

    /// Creates a reduced rational.
    pub fn rational(num: i64, den: i64) -> Result<Self> {
        if den == 0 {
            return Err(AlgebraError::DivisionByZero);
        }
        Ok(Self::reduce(num as i128, den as i128))
    }

    /// Reduces `num/den` and falls back to a float when it no longer fits.
    /// `den` must be non-zero.
    fn reduce(num: i128, den: i128) -> Self {
        let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
        let g = gcd(num, den).max(1);
        let (num, den) = (num / g, den / g);
        match (i64::try_from(num), i64::try_from(den)) {
            (Ok(n), Ok(d)) => Number::Rational(n, d),
            _ => Number::Float(num as f64 / den as f64),
        }
    }

    pub fn to_f64(self) -> f64 {
        match self {
            Number::Rational(n, d) => n as f64 / d as f64,
            Number::Float(f) => f,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Number::Rational(n, _) => n == 0,
            Number::Float(f) => f == 0.0,
        }
    }

    pub fn is_negative(self) -> bool {
        self.to_f64() < 0.0
    }

    /// Returns the value as an integer when it is exactly one.
    pub fn as_integer(self) -> Option<i64> {
        match self {
            Number::Rational(n, 1) => Some(n),
            Number::Rational(..) => None,
            Number::Float(f) => {
                if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    Some(f as i64)
                } else {
                    None
                }
            }
        }
    }

    pub fn neg(self) -> Self {
        match self {
            Number::Rational(n, d) => Self::reduce(-(n as i128), d as i128),
            Number::Float(f) => Number::Float(-f),
        }
    }

    pub fn add(self, other: Self) -> Self {
        match (self, other) {
            (Number::Rational(a, b), Number::Rational(c, d)) => {
                let (a, b, c, d) = (a as i128, b as i128, c as i128, d as i128);
                Self::reduce(a * d + c * b, b * d)
            }
            _ => Number::Float(self.to_f64() + other.to_f64()),
        }
    }

    pub fn sub(self, other: Self) -> Self {
        self.add(other.neg())
    }

    pub fn mul(self, other: Self) -> Self {
        match (self, other) {
            (Number::Rational(a, b), Number::Rational(c, d)) => {
                Self::reduce(a as i128 * c as i128, b as i128 * d as i128)
            }
            _ => Number::Float(self.to_f64() * other.to_f64()),
        }
    }

    pub fn div(self, other: Self) -> Result<Self> {
        if other.is_zero() {
            return Err(AlgebraError::DivisionByZero);
        }
        Ok(match (self, other) {
            (Number::Rational(a, b), Number::Rational(c, d)) => {
                Self::reduce(a as i128 * d as i128, b as i128 * c as i128)
            }
            _ => Number::Float(self.to_f64() / other.to_f64()),
        })
    }

    /// Raises to an integer power, exactly when the result fits.
    pub fn powi(self, exp: i64) -> Result<Self> {
        if exp < 0 {
            return Number::int(1).div(self.powi(exp.checked_neg().unwrap_or(i64::MAX))?);
        }
        match self {
            Number::Rational(n, d) => {
                let exact = u32::try_from(exp).ok().and_then(|e| {
                    Some((
                        (n as i128).checked_pow(e)?,
                        (d as i128).checked_pow(e)?,
                    ))
                });
                Ok(match exact {
                    Some((num, den)) => Self::reduce(num, den),
                    None => Number::Float(self.to_f64().powf(exp as f64)),
                })
            }
            Number::Float(f) => Ok(Number::Float(f.powf(exp as f64))),
        }
    }

    /// Raises to an arbitrary power.
    pub fn pow(self, exp: Self) -> Result<Self> {
        if let Some(n) = exp.as_integer() {
            return self.powi(n);
        }
        if let Number::Rational(1, 2) = exp {
            return self.sqrt();
        }
        let value = self.to_f64().powf(exp.to_f64());
        if value.is_nan() {
            return Err(AlgebraError::Domain(format!("{self}^{exp}")));
        }
        Ok(Number::Float(value))
    }

    /// Square root, exact for perfect rational squares.
    pub fn sqrt(self) -> Result<Self> {
        if self.is_negative() {
            return Err(AlgebraError::Domain(format!("sqrt({self})")));
        }
        if let Number::Rational(n, d) = self {
            if let (Some(rn), Some(rd)) = (exact_isqrt(n), exact_isqrt(d)) {
                return Ok(Number::Rational(rn, rd));
            }
        }
        Ok(Number::Float(self.to_f64().sqrt()))
    }
}

fn exact_isqrt(n: i64) -> Option<i64> {
    if n < 0 {
        return None;
    }
    let guess = (n as f64).sqrt().round() as i64;
    (guess.saturating_sub(1)..=guess.saturating_add(1))
        .find(|&r| r >= 0 && r.checked_mul(r) == Some(n))
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Rational(a, b), Number::Rational(c, d)) => a == c && b == d,
            _ => self.to_f64() == other.to_f64(),
        }
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::int(n)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Rational(n, 1) => write!(f, "{n}"),
            _ => f.write_str(&format_decimal(self.to_f64())),
        }
    }
}

/// Renders with [`SIGNIFICANT_DIGITS`] significant digits, trailing zeros trimmed.
fn format_decimal(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (SIGNIFICANT_DIGITS - 1 - magnitude).clamp(0, 40) as usize;
    let mut text = format!("{value:.decimals$}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}
