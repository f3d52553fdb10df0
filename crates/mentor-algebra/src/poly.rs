// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Univariate polynomials and their real roots.

use crate::expr::{BinOp, Expr};
use crate::number::Number;
use crate::{AlgebraError, Result};

/// Highest degree any intermediate product may reach. Only degrees up to
/// two are solvable, so anything past this is rejected before expanding.
const MAX_DEGREE: usize = 8;

/// Dense polynomial; `coeffs[i]` multiplies `var^i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coeffs: Vec<Number>,
}

impl Polynomial {
    pub fn constant(value: Number) -> Self {
        Self::from_coeffs(vec![value])
    }

    /// The polynomial `var`.
    pub fn identity() -> Self {
        Self::from_coeffs(vec![Number::int(0), Number::int(1)])
    }

    pub fn from_coeffs(coeffs: Vec<Number>) -> Self {
        let mut poly = Self { coeffs };
        poly.trim();
        poly
    }

    fn trim(&mut self) {
        while self.coeffs.last().is_some_and(|c| c.is_zero()) {
            self.coeffs.pop();
        }
    }

    pub fn coefficients(&self) -> &[Number] {
        &self.coeffs
    }

    /// Degree, with the zero polynomial reported as 0.
    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    fn coeff(&self, power: usize) -> Number {
        self.coeffs.get(power).copied().unwrap_or(Number::int(0))
    }

    /// Expands `expr` as a polynomial in `var`.
    ///
    /// Subtrees that do not mention `var` are evaluated to numbers. The
    /// unknown may not appear in a denominator, an exponent, or a function
    /// argument.
    pub fn from_expr(expr: &Expr, var: &str) -> Result<Self> {
        if !expr.mentions(var) {
            return Ok(Self::constant(expr.evaluate()?));
        }
        match expr {
            Expr::Sym(_) => Ok(Self::identity()),
            Expr::Neg(inner) => Ok(Self::from_expr(inner, var)?.neg()),
            Expr::Call(func, _) => Err(AlgebraError::Unsupported(format!(
                "{var} inside {}()",
                func.name()
            ))),
            Expr::Binary(op, lhs, rhs) => match op {
                BinOp::Add => Ok(Self::from_expr(lhs, var)?.add(&Self::from_expr(rhs, var)?)),
                BinOp::Sub => Ok(Self::from_expr(lhs, var)?.sub(&Self::from_expr(rhs, var)?)),
                BinOp::Mul => Self::from_expr(lhs, var)?.mul(&Self::from_expr(rhs, var)?),
                BinOp::Div => {
                    if rhs.mentions(var) {
                        return Err(AlgebraError::Unsupported(format!("{var} in a denominator")));
                    }
                    Self::from_expr(lhs, var)?.scale_div(rhs.evaluate()?)
                }
                BinOp::Pow => {
                    if rhs.mentions(var) {
                        return Err(AlgebraError::Unsupported(format!("{var} in an exponent")));
                    }
                    let exponent = rhs
                        .evaluate()?
                        .as_integer()
                        .and_then(|n| usize::try_from(n).ok())
                        .filter(|n| *n <= MAX_DEGREE)
                        .ok_or_else(|| {
                            AlgebraError::Unsupported(format!("power of {var} is not a small integer"))
                        })?;
                    Self::from_expr(lhs, var)?.powi(exponent)
                }
            },
            Expr::Num(_) | Expr::Const(_) => Ok(Self::constant(expr.evaluate()?)),
        }
    }

    pub fn neg(&self) -> Self {
        Self::from_coeffs(self.coeffs.iter().map(|c| c.neg()).collect())
    }

    pub fn add(&self, other: &Self) -> Self {
        let len = self.coeffs.len().max(other.coeffs.len());
        Self::from_coeffs((0..len).map(|i| self.coeff(i).add(other.coeff(i))).collect())
    }

    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    /// Fails with [`AlgebraError::Unsupported`] when the product would pass
    /// degree eight.
    pub fn mul(&self, other: &Self) -> Result<Self> {
        if self.coeffs.is_empty() || other.coeffs.is_empty() {
            return Ok(Self::from_coeffs(Vec::new()));
        }
        check_degree(self.degree() + other.degree())?;
        let mut out = vec![Number::int(0); self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in other.coeffs.iter().enumerate() {
                out[i + j] = out[i + j].add(a.mul(*b));
            }
        }
        Ok(Self::from_coeffs(out))
    }

    fn scale_div(&self, divisor: Number) -> Result<Self> {
        let coeffs = self
            .coeffs
            .iter()
            .map(|c| c.div(divisor))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_coeffs(coeffs))
    }

    fn powi(&self, exponent: usize) -> Result<Self> {
        check_degree(self.degree().saturating_mul(exponent))?;
        (0..exponent).try_fold(Self::constant(Number::int(1)), |acc, _| acc.mul(self))
    }

    /// Real roots of `self = 0` in ascending order.
    ///
    /// Degree 0 (including the zero polynomial) and a negative discriminant
    /// give [`AlgebraError::NoSolution`]; degree above two is unsupported.
    pub fn real_roots(&self) -> Result<Vec<Number>> {
        match self.coeffs.len() {
            0 | 1 => Err(AlgebraError::NoSolution),
            2 => Ok(vec![self.coeff(0).neg().div(self.coeff(1))?]),
            3 => self.quadratic_roots(),
            _ => Err(AlgebraError::Unsupported(format!(
                "degree {} equation",
                self.degree()
            ))),
        }
    }

    fn quadratic_roots(&self) -> Result<Vec<Number>> {
        let (a, b, c) = (self.coeff(2), self.coeff(1), self.coeff(0));
        let discriminant = b.mul(b).sub(Number::int(4).mul(a).mul(c));
        if discriminant.is_negative() {
            return Err(AlgebraError::NoSolution);
        }
        let two_a = Number::int(2).mul(a);
        if discriminant.is_zero() {
            return Ok(vec![b.neg().div(two_a)?]);
        }
        let root = discriminant.sqrt()?;
        let mut roots = vec![
            b.neg().sub(root).div(two_a)?,
            b.neg().add(root).div(two_a)?,
        ];
        roots.sort_by(|x, y| x.to_f64().total_cmp(&y.to_f64()));
        Ok(roots)
    }
}

fn check_degree(degree: usize) -> Result<()> {
    if degree > MAX_DEGREE {
        return Err(AlgebraError::Unsupported(format!("degree {degree} equation")));
    }
    Ok(())
}
