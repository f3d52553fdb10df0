// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Small computer-algebra engine behind the exact-solve path.
//!
//! This crate provides:
//! - [`parse`]: tokenizer and recursive-descent parser for textual expressions
//! - [`Number`]: exact rational arithmetic with a float fallback
//! - [`SymbolicEngine`]: [`AlgebraEngine`] that evaluates expressions and
//!   solves univariate equations up to degree two
//!
//! Anything it cannot handle is reported as an [`AlgebraError`]; callers
//! treat every such error as "try something else".

mod expr;
mod number;
mod parser;
mod poly;

pub use expr::{BinOp, Constant, Expr, Func};
pub use number::Number;
pub use parser::parse;
pub use poly::Polynomial;

use std::collections::BTreeSet;

use tracing::trace;

/// Error type for parsing, evaluation, and solving.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AlgebraError {
    #[error("parse error at {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("unknown function `{0}`")]
    UnknownFunction(String),

    #[error("no solution found")]
    NoSolution,

    #[error("unsupported expression: {0}")]
    Unsupported(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("expression is not numeric: free symbol `{0}`")]
    NotNumeric(String),

    #[error("value outside the function domain: {0}")]
    Domain(String),
}

pub type Result<T> = std::result::Result<T, AlgebraError>;

/// One variable/value pair of a solution set.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub variable: String,
    pub value: Number,
}

/// The algebra collaborator consulted before any model call.
pub trait AlgebraEngine: Send + Sync {
    /// Solves `lhs = rhs` for its free symbols.
    ///
    /// Solutions come back in ascending order of value.
    fn solve(&self, lhs: &str, rhs: &str) -> Result<Vec<Solution>>;

    /// Evaluates an expression without free symbols.
    fn evaluate(&self, expression: &str) -> Result<Number>;
}

/// Default [`AlgebraEngine`] built on this crate's parser and polynomial solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolicEngine;

impl AlgebraEngine for SymbolicEngine {
    fn solve(&self, lhs: &str, rhs: &str) -> Result<Vec<Solution>> {
        let left = parse(lhs)?;
        let right = parse(rhs)?;

        let mut symbols = BTreeSet::new();
        left.collect_symbols(&mut symbols);
        right.collect_symbols(&mut symbols);

        let variable = match symbols.len() {
            0 => return Err(AlgebraError::NoSolution),
            1 => symbols.pop_first().unwrap_or_default(),
            _ => {
                let names: Vec<&str> = symbols.iter().map(String::as_str).collect();
                return Err(AlgebraError::Unsupported(format!(
                    "several unknowns: {}",
                    names.join(", ")
                )));
            }
        };

        let poly = Polynomial::from_expr(&left, &variable)?
            .sub(&Polynomial::from_expr(&right, &variable)?);
        trace!(
            %variable,
            %left,
            %right,
            coefficients = ?poly.coefficients(),
            degree = poly.degree(),
            "solving polynomial equation"
        );

        let roots = poly.real_roots()?;
        if let Some(root) = roots.iter().find(|r| !r.to_f64().is_finite()) {
            return Err(AlgebraError::Domain(format!("{variable} = {root} is not finite")));
        }
        Ok(roots
            .into_iter()
            .map(|value| Solution {
                variable: variable.clone(),
                value,
            })
            .collect())
    }

    fn evaluate(&self, expression: &str) -> Result<Number> {
        let expr = parse(expression)?;
        let value = expr.evaluate()?;
        if value.to_f64().is_finite() {
            Ok(value)
        } else {
            Err(AlgebraError::Domain(format!("{expression} is not finite")))
        }
    }
}
