// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Expression tree produced by the parser.

use std::collections::BTreeSet;
use std::fmt;

use crate::number::Number;
use crate::{AlgebraError, Result};

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// Named constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    pub fn value(self) -> f64 {
        match self {
            Constant::Pi => std::f64::consts::PI,
            Constant::E => std::f64::consts::E,
        }
    }
}

/// Known single-argument functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    Sqrt,
    Sin,
    Cos,
    Tan,
    Exp,
    /// Natural logarithm.
    Log,
    Ln,
    Abs,
}

impl Func {
    /// Looks a function up by its source name.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "sqrt" => Func::Sqrt,
            "sin" => Func::Sin,
            "cos" => Func::Cos,
            "tan" => Func::Tan,
            "exp" => Func::Exp,
            "log" => Func::Log,
            "ln" => Func::Ln,
            "abs" | "Abs" => Func::Abs,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Func::Sqrt => "sqrt",
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
            Func::Exp => "exp",
            Func::Log => "log",
            Func::Ln => "ln",
            Func::Abs => "abs",
        }
    }

    fn apply(self, arg: Number) -> Result<Number> {
        let x = arg.to_f64();
        let domain = || AlgebraError::Domain(format!("{}({arg})", self.name()));
        Ok(match self {
            Func::Sqrt => return arg.sqrt(),
            Func::Abs => {
                if arg.is_negative() {
                    arg.neg()
                } else {
                    arg
                }
            }
            Func::Sin => Number::float(x.sin()),
            Func::Cos => Number::float(x.cos()),
            Func::Tan => Number::float(x.tan()),
            Func::Exp => Number::float(x.exp()),
            Func::Log | Func::Ln => {
                if x <= 0.0 {
                    return Err(domain());
                }
                Number::float(x.ln())
            }
        })
    }
}

/// A parsed expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num(Number),
    Sym(String),
    Const(Constant),
    Neg(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Call(Func, Box<Expr>),
}

impl Expr {
    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    /// Adds every free symbol in the tree to `out`.
    pub fn collect_symbols(&self, out: &mut BTreeSet<String>) {
        match self {
            Expr::Sym(name) => {
                out.insert(name.clone());
            }
            Expr::Num(_) | Expr::Const(_) => {}
            Expr::Neg(inner) | Expr::Call(_, inner) => inner.collect_symbols(out),
            Expr::Binary(_, lhs, rhs) => {
                lhs.collect_symbols(out);
                rhs.collect_symbols(out);
            }
        }
    }

    /// Returns true if `var` occurs anywhere in the tree.
    pub fn mentions(&self, var: &str) -> bool {
        match self {
            Expr::Sym(name) => name == var,
            Expr::Num(_) | Expr::Const(_) => false,
            Expr::Neg(inner) | Expr::Call(_, inner) => inner.mentions(var),
            Expr::Binary(_, lhs, rhs) => lhs.mentions(var) || rhs.mentions(var),
        }
    }

    /// Evaluates a tree without free symbols.
    pub fn evaluate(&self) -> Result<Number> {
        match self {
            Expr::Num(n) => Ok(*n),
            Expr::Sym(name) => Err(AlgebraError::NotNumeric(name.clone())),
            Expr::Const(c) => Ok(Number::float(c.value())),
            Expr::Neg(inner) => Ok(inner.evaluate()?.neg()),
            Expr::Call(func, arg) => func.apply(arg.evaluate()?),
            Expr::Binary(op, lhs, rhs) => {
                let a = lhs.evaluate()?;
                let b = rhs.evaluate()?;
                match op {
                    BinOp::Add => Ok(a.add(b)),
                    BinOp::Sub => Ok(a.sub(b)),
                    BinOp::Mul => Ok(a.mul(b)),
                    BinOp::Div => a.div(b),
                    BinOp::Pow => a.pow(b),
                }
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Num(n) => write!(f, "{n}"),
            Expr::Sym(name) => f.write_str(name),
            Expr::Const(Constant::Pi) => f.write_str("pi"),
            Expr::Const(Constant::E) => f.write_str("E"),
            Expr::Neg(inner) => write!(f, "-({inner})"),
            Expr::Call(func, arg) => write!(f, "{}({arg})", func.name()),
            Expr::Binary(op, lhs, rhs) => {
                let sym = match op {
                    BinOp::Add => "+",
                    BinOp::Sub => "-",
                    BinOp::Mul => "*",
                    BinOp::Div => "/",
                    BinOp::Pow => "^",
                };
                write!(f, "({lhs}{sym}{rhs})")
            }
        }
    }
}
