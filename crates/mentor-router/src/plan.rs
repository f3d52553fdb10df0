// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt templates and generation budgets for every resolution path.

use std::sync::LazyLock;

use mentor_core::PromptPlan;
use regex::Regex;

use crate::normalize::NormalizedExpression;

/// Shared nucleus cutoff.
const TOP_P: f32 = 0.9;

/// Sampling temperature for explanations.
const EXPLAIN_TEMPERATURE: f32 = 0.2;

/// Stop sequences for worked solutions.
const STEP_STOP: &[&str] = &["###", "\n\n\n\n"];

/// Stop sequences for topic explanations.
const TOPIC_STOP: &[&str] = &["\n\n", "Pregunta:", "P:"];

/// Complexity below which an equation counts as simple.
const LOW_TIER_LIMIT: usize = 20;

/// Complexity below which an equation counts as medium.
const MEDIUM_TIER_LIMIT: usize = 50;

static DETAIL_CUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:detailed|complete|long|explained|expanded|detallad[oa]|complet[oa]|larg[oa]|explicado|ampli[oa])\b",
    )
    .unwrap()
});

/// Token budget tiers for step-by-step solving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetTier {
    /// Short equations such as `2x+3=7`.
    Low,
    /// Mid-sized equations such as `x^2-5x+6=0`.
    Medium,
    /// Long or nested equations.
    High,
}

impl BudgetTier {
    /// Picks the tier for a complexity score.
    pub fn for_complexity(score: usize) -> Self {
        if score < LOW_TIER_LIMIT {
            BudgetTier::Low
        } else if score < MEDIUM_TIER_LIMIT {
            BudgetTier::Medium
        } else {
            BudgetTier::High
        }
    }

    pub fn max_tokens(self) -> u32 {
        match self {
            BudgetTier::Low => 300,
            BudgetTier::Medium => 400,
            BudgetTier::High => 500,
        }
    }

    pub fn context_window(self) -> u32 {
        match self {
            BudgetTier::Low => 1536,
            BudgetTier::Medium | BudgetTier::High => 2048,
        }
    }
}

impl std::fmt::Display for BudgetTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BudgetTier::Low => write!(f, "low"),
            BudgetTier::Medium => write!(f, "medium"),
            BudgetTier::High => write!(f, "high"),
        }
    }
}

fn stops(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// One-line explanation of what a formula computes.
pub fn formula_summary(expr: &NormalizedExpression) -> PromptPlan {
    PromptPlan {
        prompt: format!("Fórmula {expr}: explica en 1 línea"),
        max_tokens: 25,
        context_window: 256,
        temperature: 0.0,
        top_p: TOP_P,
        top_k: 10,
        repeat_penalty: None,
        stop: Vec::new(),
    }
}

/// Bare-result request used when exact solving fails.
pub fn result_fallback(expr: &NormalizedExpression) -> PromptPlan {
    PromptPlan {
        prompt: format!("Resuelve {expr} = "),
        max_tokens: 15,
        context_window: 128,
        temperature: 0.0,
        top_p: TOP_P,
        top_k: 5,
        repeat_penalty: None,
        stop: Vec::new(),
    }
}

/// Short explanation of a formula, with an example.
pub fn formula_walkthrough(expr: &NormalizedExpression) -> PromptPlan {
    PromptPlan {
        prompt: format!("Fórmula {expr}: explica brevemente con ejemplo.\nRespuesta completa:"),
        max_tokens: 100,
        context_window: 512,
        temperature: EXPLAIN_TEMPERATURE,
        top_p: TOP_P,
        top_k: 20,
        repeat_penalty: Some(1.0),
        stop: stops(STEP_STOP),
    }
}

/// Worked solution sized by tier.
pub fn step_by_step(expr: &NormalizedExpression, tier: BudgetTier) -> PromptPlan {
    PromptPlan {
        prompt: format!("Resuelve paso a paso: {expr}"),
        max_tokens: tier.max_tokens(),
        context_window: tier.context_window(),
        temperature: EXPLAIN_TEMPERATURE,
        top_p: TOP_P,
        top_k: 20,
        repeat_penalty: Some(1.0),
        stop: stops(STEP_STOP),
    }
}

/// Returns true when the question asks for a longer answer.
pub fn wants_detail(question: &str) -> bool {
    DETAIL_CUE.is_match(question)
}

/// Topic explanation, detailed or brief.
pub fn topic(question: &str, detailed: bool) -> PromptPlan {
    let (prompt, max_tokens) = if detailed {
        (format!("{question}\nExplica con detalle:"), 100)
    } else {
        (format!("{question}\nRespuesta breve en 2 frases:"), 40)
    };
    PromptPlan {
        prompt,
        max_tokens,
        context_window: 512,
        temperature: EXPLAIN_TEMPERATURE,
        top_p: TOP_P,
        top_k: 20,
        repeat_penalty: None,
        stop: stops(TOPIC_STOP),
    }
}
