// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rewrites hand-typed math into the explicit form the algebra engine and
//! the model prompts expect.
//!
//! Rules, applied in order:
//! 1. trim surrounding whitespace
//! 2. `2x` becomes `2*x`
//! 3. `x(` becomes `x*(`
//! 4. `)(` becomes `)*(`
//! 5. `)2` becomes `)*2`
//! 6. `×` becomes `*`, `÷` becomes `/`, and `−`, `–`, `—` become `-`
//! 7. whitespace around `=` collapses to exactly one space on each side
//!
//! No validation happens here; garbage in is garbage out.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static DIGIT_LETTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d)([a-zA-Z])").unwrap());
static LETTER_PAREN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([a-zA-Z])(\()").unwrap());
static PAREN_PAREN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\))(\()").unwrap());
static PAREN_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\))(\d)").unwrap());
static EQUALS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*=\s*").unwrap());

/// Typographic operators and their ASCII replacements.
const GLYPHS: &[(char, &str)] = &[
    ('×', "*"),
    ('÷', "/"),
    ('−', "-"),
    ('–', "-"),
    ('—', "-"),
];

/// An expression after normalization.
///
/// Normalizing it again yields the same text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedExpression(String);

impl NormalizedExpression {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedExpression {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalizes a raw user expression.
pub fn normalize(raw: &str) -> NormalizedExpression {
    let mut e = raw.trim().to_string();
    e = DIGIT_LETTER.replace_all(&e, "${1}*${2}").into_owned();
    e = LETTER_PAREN.replace_all(&e, "${1}*${2}").into_owned();
    e = PAREN_PAREN.replace_all(&e, "${1}*${2}").into_owned();
    e = PAREN_DIGIT.replace_all(&e, "${1}*${2}").into_owned();
    for (glyph, ascii) in GLYPHS {
        if e.contains(*glyph) {
            e = e.replace(*glyph, ascii);
        }
    }
    e = EQUALS.replace_all(&e, " = ").into_owned();
    NormalizedExpression(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn n(raw: &str) -> String {
        normalize(raw).into_inner()
    }

    #[test]
    fn implicit_multiplication_and_equals_spacing() {
        assert_eq!(n("2x+3=7"), "2*x+3 = 7");
    }

    #[test]
    fn trims_input() {
        assert_eq!(n("  x^2  "), "x^2");
    }

    #[test]
    fn letter_before_paren() {
        assert_eq!(n("sqrt(16)"), "sqrt*(16)");
        assert_eq!(n("x(x+1)"), "x*(x+1)");
    }

    #[test]
    fn adjacent_groups() {
        assert_eq!(n("(x+1)(x-1)"), "(x+1)*(x-1)");
        assert_eq!(n("(x+1)2"), "(x+1)*2");
    }

    #[test]
    fn digit_runs_stay_together() {
        assert_eq!(n("12ab"), "12*ab");
        assert_eq!(n("v0*t"), "v0*t");
    }

    #[test]
    fn typographic_operators() {
        assert_eq!(n("6×2÷3−1"), "6*2/3-1");
        assert_eq!(n("5–2—1"), "5-2-1");
    }

    #[test]
    fn equals_whitespace_collapses() {
        assert_eq!(n("x   =\t4"), "x = 4");
        assert_eq!(n("a=b=c"), "a = b = c");
    }

    #[test]
    fn garbage_passes_through() {
        assert_eq!(n("¿qué?"), "¿qué?");
        assert_eq!(n(""), "");
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(raw in "\\PC{0,40}") {
            let once = normalize(&raw);
            let twice = normalize(once.as_str());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn idempotent_on_math_like_input(raw in "[0-9a-z()×÷−=+*/^ .]{0,30}") {
            let once = normalize(&raw);
            prop_assert_eq!(normalize(once.as_str()), once);
        }
    }
}
