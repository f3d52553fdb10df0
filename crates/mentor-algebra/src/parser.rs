// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tokenizer and recursive-descent parser.
//!
//! Input is capped at 512 tokens and 64 levels of nesting, so the recursive
//! walks over the resulting tree stay shallow.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := unary (('*' | '/') unary)*
//! unary  := ('-' | '+') unary | power
//! power  := atom (('^' | '**') unary)?
//! atom   := number | constant | func call | ident | '(' expr ')'
//! call   := func ('(' | '*' '(') expr ')'
//! ```
//!
//! The `func*(` form is accepted because normalized input inserts a `*`
//! between every letter and an opening parenthesis.

use logos::Logos;

use crate::expr::{BinOp, Constant, Expr, Func};
use crate::number::Number;
use crate::{AlgebraError, Result};

/// Deepest nesting of groups, signs, and exponents accepted.
const MAX_DEPTH: usize = 64;

/// Longest token sequence accepted.
const MAX_TOKENS: usize = 512;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
enum Token {
    #[regex(r"[0-9]+(\.[0-9]*)?")]
    #[regex(r"\.[0-9]+")]
    Num,
    #[regex(r"[a-zA-Z][a-zA-Z0-9_]*")]
    Ident,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("^")]
    #[token("**")]
    Caret,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
}

#[derive(Debug, Clone)]
struct TokenInfo {
    token: Token,
    lexeme: String,
    position: usize,
}

/// Parses `input` into an expression tree.
pub fn parse(input: &str) -> Result<Expr> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        end: input.len(),
    };
    let expr = parser.parse_expr()?;
    match parser.tokens.get(parser.pos) {
        None => Ok(expr),
        Some(info) => Err(parser.error_at(info.position, "unexpected trailing input")),
    }
}

fn tokenize(input: &str) -> Result<Vec<TokenInfo>> {
    let mut lex = Token::lexer(input);
    let mut tokens = Vec::new();
    while let Some(res) = lex.next() {
        let position = lex.span().start;
        let Ok(token) = res else {
            let other = input[position..].chars().next().unwrap_or_default();
            return Err(AlgebraError::Parse {
                position,
                message: format!("unexpected character '{other}'"),
            });
        };
        if tokens.len() == MAX_TOKENS {
            return Err(AlgebraError::Parse {
                position,
                message: format!("expression longer than {MAX_TOKENS} tokens"),
            });
        }
        tokens.push(TokenInfo {
            token,
            lexeme: lex.slice().to_string(),
            position,
        });
    }
    Ok(tokens)
}

/// Decimal literals become exact rationals, e.g. `3.25` is `13/4`.
fn parse_number(lexeme: &str, position: usize) -> Result<Number> {
    let invalid = || AlgebraError::Parse {
        position,
        message: format!("invalid number '{lexeme}'"),
    };
    let (whole, frac) = lexeme.split_once('.').unwrap_or((lexeme, ""));
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }

    let digits = format!("{whole}{frac}");
    let scale = u32::try_from(frac.len()).ok().and_then(|n| 10_i64.checked_pow(n));
    match (digits.parse::<i64>(), scale) {
        (Ok(num), Some(den)) => Number::rational(num, den),
        _ => lexeme
            .parse::<f64>()
            .map(Number::float)
            .map_err(|_| invalid()),
    }
}

struct Parser {
    tokens: Vec<TokenInfo>,
    pos: usize,
    depth: usize,
    end: usize,
}

impl Parser {
    fn parse_expr(&mut self) -> Result<Expr> {
        let mut node = self.parse_term()?;
        loop {
            let op = match self.peek_token() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.parse_term()?;
            node = Expr::binary(op, node, rhs);
        }
        Ok(node)
    }

    fn parse_term(&mut self) -> Result<Expr> {
        let mut node = self.parse_unary()?;
        loop {
            let op = match self.peek_token() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.parse_unary()?;
            node = Expr::binary(op, node, rhs);
        }
        Ok(node)
    }

    /// Every recursive path passes through here, so the depth is counted once.
    fn parse_unary(&mut self) -> Result<Expr> {
        if self.depth == MAX_DEPTH {
            let position = self.current_position();
            return Err(self.error_at(position, "expression nested too deeply"));
        }
        self.depth += 1;
        let result = self.parse_signed();
        self.depth -= 1;
        result
    }

    fn parse_signed(&mut self) -> Result<Expr> {
        if self.consume(&Token::Minus) {
            Ok(Expr::Neg(Box::new(self.parse_unary()?)))
        } else if self.consume(&Token::Plus) {
            self.parse_unary()
        } else {
            self.parse_power()
        }
    }

    fn parse_power(&mut self) -> Result<Expr> {
        let base = self.parse_atom()?;
        if self.consume(&Token::Caret) {
            // right associative, and the exponent may carry its own sign
            let exponent = self.parse_unary()?;
            return Ok(Expr::binary(BinOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn parse_atom(&mut self) -> Result<Expr> {
        let Some(info) = self.next() else {
            return Err(self.error_at(self.end, "unexpected end of input, expected expression"));
        };
        match info.token {
            Token::Num => Ok(Expr::Num(parse_number(&info.lexeme, info.position)?)),
            Token::LParen => self.parse_group(),
            Token::Ident => self.parse_ident(info.lexeme, info.position),
            other => Err(self.error_at(
                info.position,
                &format!("unexpected {} in expression", describe(&other)),
            )),
        }
    }

    fn parse_group(&mut self) -> Result<Expr> {
        let inner = self.parse_expr()?;
        if !self.consume(&Token::RParen) {
            let position = self.current_position();
            return Err(self.error_at(position, "expected ')'"));
        }
        Ok(inner)
    }

    fn parse_ident(&mut self, name: String, position: usize) -> Result<Expr> {
        let direct_call = self.peek_token() == Some(&Token::LParen);
        let starred_call = self.peek_token() == Some(&Token::Star)
            && self.peek_token_at(1) == Some(&Token::LParen);

        if let Some(func) = Func::from_name(&name) {
            if direct_call || starred_call {
                self.pos += if direct_call { 1 } else { 2 };
                let arg = self.parse_group()?;
                return Ok(Expr::Call(func, Box::new(arg)));
            }
            return Err(self.error_at(position, &format!("function '{name}' needs an argument")));
        }
        if direct_call {
            return Err(AlgebraError::UnknownFunction(name));
        }
        Ok(match name.as_str() {
            "pi" => Expr::Const(Constant::Pi),
            "E" => Expr::Const(Constant::E),
            _ => Expr::Sym(name),
        })
    }

    fn error_at(&self, position: usize, message: &str) -> AlgebraError {
        AlgebraError::Parse {
            position,
            message: message.to_string(),
        }
    }

    fn current_position(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|t| t.position)
            .unwrap_or(self.end)
    }

    fn peek_token(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn peek_token_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset).map(|t| &t.token)
    }

    fn next(&mut self) -> Option<TokenInfo> {
        let info = self.tokens.get(self.pos).cloned();
        if info.is_some() {
            self.pos += 1;
        }
        info
    }

    fn consume(&mut self, t: &Token) -> bool {
        if self.peek_token() == Some(t) {
            self.pos += 1;
            true
        } else {
            false
        }
    }
}

fn describe(token: &Token) -> &'static str {
    match token {
        Token::Num => "number",
        Token::Ident => "identifier",
        Token::Plus => "'+'",
        Token::Minus => "'-'",
        Token::Star => "'*'",
        Token::Slash => "'/'",
        Token::Caret => "'^'",
        Token::LParen => "'('",
        Token::RParen => "')'",
    }
}
