// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic classification of normalized expressions.
//!
//! Decides formula versus equation, whether the text names any of the usual
//! unknowns, and how heavy the expression looks. Pure text checks, no parsing.
//!
//! Multi-letter names outside the vocabulary (`vel`, `area`) are invisible to
//! the variable check; that is a known approximation.

use std::sync::LazyLock;

use regex::Regex;

use crate::normalize::NormalizedExpression;

/// Variable names recognized as free variables, matched as whole words.
pub const VARIABLE_VOCABULARY: &[&str] = &["x", "y", "z", "r", "a", "b", "h", "m", "v", "g", "t", "v0"];

/// Extra complexity per `^`.
const POWER_WEIGHT: usize = 10;

/// Extra complexity per `sqrt`.
const ROOT_WEIGHT: usize = 5;

static VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    let names = VARIABLE_VOCABULARY.join("|");
    Regex::new(&format!(r"(?i)\b(?:{names})\b")).unwrap()
});

/// Facts derived from a normalized expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// No `=` anywhere in the text.
    pub is_formula: bool,
    /// At least one vocabulary variable appears as a whole word.
    pub has_free_variables: bool,
    /// Length in characters plus weights for powers and roots.
    pub complexity_score: usize,
}

impl Classification {
    /// A formula that names unknowns; it gets explained rather than solved.
    pub fn is_symbolic_formula(&self) -> bool {
        self.is_formula && self.has_free_variables
    }
}

/// Classifies a normalized expression.
pub fn classify(expr: &NormalizedExpression) -> Classification {
    let text = expr.as_str();
    Classification {
        is_formula: !text.contains('='),
        has_free_variables: VARIABLE.is_match(text),
        complexity_score: complexity(text),
    }
}

fn complexity(text: &str) -> usize {
    text.chars().count()
        + POWER_WEIGHT * text.matches('^').count()
        + ROOT_WEIGHT * text.matches("sqrt").count()
}
