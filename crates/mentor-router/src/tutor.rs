// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Answer orchestration for math expressions and general topics.
//!
//! Every math query is normalized and classified first. Result-only queries
//! try the algebra engine before the model; step-by-step queries and topic
//! questions always go to the model. Symbolic failures never reach the
//! caller, inference failures always do.

use std::sync::{Arc, LazyLock};

use futures::stream::{self, StreamExt};
use mentor_algebra::AlgebraEngine;
use mentor_core::{
    Answer, ChunkStream, Delivery, InferenceAdapter, MentorError, PromptPlan, ResolutionMode,
    Sentinel, SolveOutcome, TextStream,
};
use regex::Regex;
use tracing::debug;

use crate::classifier::{classify, Classification};
use crate::normalize::{normalize, NormalizedExpression};
use crate::plan::{self, BudgetTier};

static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+(?:[.,]\d+)?").unwrap());

/// Stateless orchestrator shared by every request.
#[derive(Clone)]
pub struct Tutor {
    inference: Arc<dyn InferenceAdapter>,
    algebra: Arc<dyn AlgebraEngine>,
}

impl Tutor {
    pub fn new(inference: Arc<dyn InferenceAdapter>, algebra: Arc<dyn AlgebraEngine>) -> Self {
        Self { inference, algebra }
    }

    /// Answers a math expression in the requested mode.
    ///
    /// Result-only answers are always materialized text, whatever the
    /// delivery. Step-by-step answers stream when `delivery` asks for it.
    pub async fn resolve_math(
        &self,
        raw: &str,
        mode: ResolutionMode,
        delivery: Delivery,
    ) -> Result<Answer, MentorError> {
        match mode {
            ResolutionMode::ResultOnly => {
                let outcome = self.solve_result_only(raw).await?;
                Ok(Answer::Text(outcome.to_string()))
            }
            ResolutionMode::StepByStep => {
                let (expr, facts) = prepare(raw);
                let plan = if facts.is_symbolic_formula() {
                    plan::formula_walkthrough(&expr)
                } else {
                    let tier = BudgetTier::for_complexity(facts.complexity_score);
                    debug!(tier = %tier, complexity = facts.complexity_score, "step-by-step budget");
                    plan::step_by_step(&expr, tier)
                };
                self.answer(&plan, delivery, Sentinel::Unsolved).await
            }
        }
    }

    /// Produces the shortest useful answer for a math expression.
    pub async fn solve_result_only(&self, raw: &str) -> Result<SolveOutcome, MentorError> {
        let (expr, facts) = prepare(raw);

        if facts.is_symbolic_formula() {
            let text = self.complete(&plan::formula_summary(&expr)).await?;
            return Ok(if text.is_empty() {
                SolveOutcome::Failure(Sentinel::NoNumericFormula)
            } else {
                SolveOutcome::ModelText { text }
            });
        }

        if let Some(outcome) = self.solve_exact(&expr) {
            return Ok(outcome);
        }

        let text = self.complete(&plan::result_fallback(&expr)).await?;
        Ok(extract_result(&text))
    }

    /// Explains a general topic, briefly unless the question asks for detail.
    pub async fn explain_topic(
        &self,
        question: &str,
        delivery: Delivery,
    ) -> Result<Answer, MentorError> {
        let detailed = plan::wants_detail(question);
        debug!(detailed, "topic explanation");
        self.answer(&plan::topic(question, detailed), delivery, Sentinel::Unexplained)
            .await
    }

    /// Tries the algebra engine; `None` means fall back to the model.
    fn solve_exact(&self, expr: &NormalizedExpression) -> Option<SolveOutcome> {
        let text = expr.as_str();
        let result = match text.split_once('=') {
            Some((lhs, rhs)) => self.algebra.solve(lhs, rhs).map(|solutions| {
                solutions.into_iter().next().map(|s| SolveOutcome::SymbolicSolution {
                    variable: s.variable,
                    value: s.value.to_string(),
                })
            }),
            None => self.algebra.evaluate(text).map(|value| {
                Some(SolveOutcome::NumericValue {
                    value: value.to_string(),
                })
            }),
        };

        match result {
            Ok(Some(outcome)) => Some(outcome),
            Ok(None) => {
                debug!(expr = text, "empty solution set, asking the model");
                None
            }
            Err(e) => {
                debug!(expr = text, error = %e, "exact solve failed, asking the model");
                None
            }
        }
    }

    async fn complete(&self, plan: &PromptPlan) -> Result<String, MentorError> {
        let response = self.inference.generate(plan).await?;
        Ok(response.response.trim().to_string())
    }

    async fn answer(
        &self,
        plan: &PromptPlan,
        delivery: Delivery,
        sentinel: Sentinel,
    ) -> Result<Answer, MentorError> {
        match delivery {
            Delivery::Blocking => {
                let text = self.complete(plan).await?;
                Ok(Answer::Text(if text.is_empty() {
                    sentinel.text().to_string()
                } else {
                    text
                }))
            }
            Delivery::Streaming => {
                let chunks = self.inference.generate_stream(plan).await?;
                Ok(Answer::Stream(text_increments(chunks)))
            }
        }
    }
}

fn prepare(raw: &str) -> (NormalizedExpression, Classification) {
    let expr = normalize(raw);
    let facts = classify(&expr);
    debug!(
        expr = %expr,
        is_formula = facts.is_formula,
        has_free_variables = facts.has_free_variables,
        complexity = facts.complexity_score,
        "classified expression"
    );
    (expr, facts)
}

/// Pulls the first number out of model text, comma decimals become dots.
fn extract_result(text: &str) -> SolveOutcome {
    if let Some(m) = FIRST_NUMBER.find(text) {
        return SolveOutcome::NumericValue {
            value: m.as_str().replace(',', "."),
        };
    }
    if text.is_empty() {
        SolveOutcome::Failure(Sentinel::NoNumber)
    } else {
        SolveOutcome::ModelText {
            text: text.to_string(),
        }
    }
}

/// Maps inference fragments to text increments, ending after the final
/// fragment or the first error. Upstream ending before the final fragment
/// yields one last error.
fn text_increments(chunks: ChunkStream) -> TextStream {
    Box::pin(stream::unfold(
        (chunks, false),
        |(mut chunks, finished)| async move {
            if finished {
                return None;
            }
            let Some(next) = chunks.next().await else {
                return Some((
                    Err(MentorError::inference("stream ended before the final fragment")),
                    (chunks, true),
                ));
            };
            match next {
                Ok(chunk) => {
                    let done = chunk.done;
                    Some((Ok(chunk.response.unwrap_or_default()), (chunks, done)))
                }
                Err(e) => Some((Err(e), (chunks, true))),
            }
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mentor_core::InferenceChunk;
    use mentor_test_utils::{AlgebraCall, MockInference, MockReply, RecordingAlgebra};

    fn tutor(inference: &MockInference, algebra: &RecordingAlgebra) -> Tutor {
        Tutor::new(Arc::new(inference.clone()), Arc::new(algebra.clone()))
    }

    async fn text(answer: Answer) -> String {
        assert!(!answer.is_stream(), "expected materialized text");
        answer.into_text().await.unwrap()
    }

    // --- result only ---

    #[tokio::test]
    async fn equation_is_solved_exactly_without_the_model() {
        let inference = MockInference::new();
        let algebra = RecordingAlgebra::new();
        let outcome = tutor(&inference, &algebra)
            .solve_result_only("2x+3=7")
            .await
            .unwrap();

        assert_eq!(
            outcome,
            SolveOutcome::SymbolicSolution {
                variable: "x".into(),
                value: "2".into()
            }
        );
        assert_eq!(outcome.to_string(), "x = 2");
        assert_eq!(inference.call_count().await, 0);
        assert_eq!(
            algebra.calls(),
            vec![AlgebraCall::Solve {
                lhs: "2*x+3 ".into(),
                rhs: " 7".into()
            }]
        );
    }

    #[tokio::test]
    async fn numeric_expression_is_evaluated() {
        let inference = MockInference::new();
        let algebra = RecordingAlgebra::new();
        let outcome = tutor(&inference, &algebra)
            .solve_result_only("sqrt(16)+1")
            .await
            .unwrap();
        assert_eq!(outcome, SolveOutcome::NumericValue { value: "5".into() });
        assert_eq!(inference.call_count().await, 0);
    }

    #[tokio::test]
    async fn quadratic_returns_smallest_root() {
        let inference = MockInference::new();
        let algebra = RecordingAlgebra::new();
        let outcome = tutor(&inference, &algebra)
            .solve_result_only("x^2-5x+6=0")
            .await
            .unwrap();
        assert_eq!(outcome.to_string(), "x = 2");
    }

    #[tokio::test]
    async fn formula_with_variables_never_consults_the_engine() {
        let inference = MockInference::with_responses(["  Energía cinética de un cuerpo.  "]);
        let algebra = RecordingAlgebra::new();
        let outcome = tutor(&inference, &algebra)
            .solve_result_only("m*v^2/2")
            .await
            .unwrap();

        assert_eq!(
            outcome,
            SolveOutcome::ModelText {
                text: "Energía cinética de un cuerpo.".into()
            }
        );
        assert_eq!(algebra.call_count(), 0);
        let plan = inference.last_plan().await.unwrap();
        assert_eq!(plan.prompt, "Fórmula m*v^2/2: explica en 1 línea");
        assert_eq!(plan.max_tokens, 25);
    }

    #[tokio::test]
    async fn silent_formula_yields_sentinel() {
        let inference = MockInference::with_responses(["   "]);
        let algebra = RecordingAlgebra::new();
        let outcome = tutor(&inference, &algebra)
            .solve_result_only("m*v^2/2")
            .await
            .unwrap();
        assert_eq!(outcome.to_string(), "📐 Fórmula sin valores numéricos");
        assert_eq!(algebra.call_count(), 0);
    }

    #[tokio::test]
    async fn failed_solve_falls_back_to_first_number() {
        let inference = MockInference::with_responses(["El resultado es 3,5 aproximadamente"]);
        let algebra = RecordingAlgebra::failing();
        let outcome = tutor(&inference, &algebra)
            .solve_result_only("2x=7")
            .await
            .unwrap();

        assert_eq!(outcome, SolveOutcome::NumericValue { value: "3.5".into() });
        assert_eq!(algebra.call_count(), 1);
        let plan = inference.last_plan().await.unwrap();
        assert_eq!(plan.prompt, "Resuelve 2*x = 7 = ");
        assert_eq!((plan.max_tokens, plan.context_window, plan.top_k), (15, 128, 5));
    }

    #[tokio::test]
    async fn runaway_nesting_falls_back_to_the_model() {
        let inference = MockInference::with_responses(["Resultado: 1"]);
        let algebra = RecordingAlgebra::new();
        let input = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        let outcome = tutor(&inference, &algebra)
            .solve_result_only(&input)
            .await
            .unwrap();
        assert_eq!(outcome, SolveOutcome::NumericValue { value: "1".into() });
        assert_eq!(algebra.call_count(), 1);
        assert_eq!(inference.call_count().await, 1);
    }

    #[tokio::test]
    async fn high_degree_equation_falls_back_to_the_model() {
        let inference = MockInference::with_responses(["x = 1"]);
        let algebra = RecordingAlgebra::new();
        let outcome = tutor(&inference, &algebra)
            .solve_result_only("(((((x^8)^8)^8)^8)^8)=1")
            .await
            .unwrap();
        assert_eq!(outcome, SolveOutcome::NumericValue { value: "1".into() });
        assert_eq!(algebra.call_count(), 1);
    }

    #[tokio::test]
    async fn fallback_keeps_negative_sign() {
        let inference = MockInference::with_responses(["x = -4"]);
        let algebra = RecordingAlgebra::failing();
        let outcome = tutor(&inference, &algebra)
            .solve_result_only("x+4=0")
            .await
            .unwrap();
        assert_eq!(outcome, SolveOutcome::NumericValue { value: "-4".into() });
    }

    #[tokio::test]
    async fn fallback_without_number_returns_text() {
        let inference = MockInference::with_responses(["infinitas soluciones"]);
        let algebra = RecordingAlgebra::new();
        let outcome = tutor(&inference, &algebra)
            .solve_result_only("x+y=3")
            .await
            .unwrap();
        assert_eq!(
            outcome,
            SolveOutcome::ModelText {
                text: "infinitas soluciones".into()
            }
        );
    }

    #[tokio::test]
    async fn empty_fallback_yields_sentinel() {
        let inference = MockInference::with_responses([""]);
        let algebra = RecordingAlgebra::new();
        let outcome = tutor(&inference, &algebra)
            .solve_result_only("x^2+1=0")
            .await
            .unwrap();
        assert_eq!(outcome, SolveOutcome::Failure(Sentinel::NoNumber));
    }

    #[tokio::test]
    async fn equation_without_vocabulary_variable_takes_equation_path() {
        let inference = MockInference::new();
        let algebra = RecordingAlgebra::new();
        let outcome = tutor(&inference, &algebra)
            .solve_result_only("k+1=3")
            .await
            .unwrap();
        assert_eq!(outcome.to_string(), "k = 2");
        assert_eq!(inference.call_count().await, 0);
    }

    #[tokio::test]
    async fn result_only_ignores_streaming_request() {
        let inference = MockInference::new();
        let algebra = RecordingAlgebra::new();
        let answer = tutor(&inference, &algebra)
            .resolve_math("2x+3=7", ResolutionMode::ResultOnly, Delivery::Streaming)
            .await
            .unwrap();
        assert_eq!(text(answer).await, "x = 2");
    }

    #[tokio::test]
    async fn inference_failure_propagates() {
        let inference = MockInference::new();
        inference.push(MockReply::Error("connection refused".into())).await;
        let algebra = RecordingAlgebra::failing();
        let result = tutor(&inference, &algebra).solve_result_only("2x=7").await;
        assert!(matches!(result, Err(MentorError::Inference { .. })));
    }

    // --- step by step ---

    #[tokio::test]
    async fn step_by_step_plans_by_tier() {
        let cases = [
            ("2x+3=7", 300, 1536),                  // 9
            ("x^2-5x+6=0", 400, 2048),              // 13 + 10
            ("x^3+2x^2-5x+6=sqrt(x+1)", 500, 2048), // 28 + 20 + 5
        ];
        for (raw, tokens, ctx) in cases {
            let inference = MockInference::with_responses(["Paso 1."]);
            let algebra = RecordingAlgebra::new();
            tutor(&inference, &algebra)
                .resolve_math(raw, ResolutionMode::StepByStep, Delivery::Blocking)
                .await
                .unwrap();
            let plan = inference.last_plan().await.unwrap();
            assert!(plan.prompt.starts_with("Resuelve paso a paso: "), "{raw}");
            assert_eq!((plan.max_tokens, plan.context_window), (tokens, ctx), "{raw}");
            assert_eq!(algebra.call_count(), 0);
        }
    }

    #[tokio::test]
    async fn step_by_step_formula_gets_walkthrough() {
        let inference = MockInference::with_responses(["Ejemplo: m=2, v=3."]);
        let algebra = RecordingAlgebra::new();
        let answer = tutor(&inference, &algebra)
            .resolve_math("m*v^2/2", ResolutionMode::StepByStep, Delivery::Blocking)
            .await
            .unwrap();
        assert_eq!(text(answer).await, "Ejemplo: m=2, v=3.");
        let plan = inference.last_plan().await.unwrap();
        assert_eq!((plan.max_tokens, plan.context_window), (100, 512));
    }

    #[tokio::test]
    async fn empty_steps_yield_sentinel() {
        let inference = MockInference::with_responses([" \n "]);
        let algebra = RecordingAlgebra::new();
        let answer = tutor(&inference, &algebra)
            .resolve_math("2x+3=7", ResolutionMode::StepByStep, Delivery::Blocking)
            .await
            .unwrap();
        assert_eq!(text(answer).await, "🛑 No pude resolver la ecuación.");
    }

    #[tokio::test]
    async fn streamed_steps_arrive_in_order() {
        let inference = MockInference::with_responses(["Paso 1: restar 3. Paso 2: dividir."]);
        let algebra = RecordingAlgebra::new();
        let answer = tutor(&inference, &algebra)
            .resolve_math("2x+3=7", ResolutionMode::StepByStep, Delivery::Streaming)
            .await
            .unwrap();
        assert!(answer.is_stream());
        assert_eq!(
            answer.into_text().await.unwrap(),
            "Paso 1: restar 3. Paso 2: dividir."
        );
        assert!(inference.requests().await[0].streamed);
    }

    #[tokio::test]
    async fn stream_ends_after_done_fragment() {
        let inference = MockInference::new();
        let chunk = |text: &str, done| InferenceChunk {
            response: Some(text.to_string()),
            done,
        };
        inference
            .push(MockReply::Chunks(vec![
                chunk("uno ", false),
                chunk("dos", true),
                chunk(" tres", false),
            ]))
            .await;
        let algebra = RecordingAlgebra::new();
        let answer = tutor(&inference, &algebra)
            .resolve_math("2x=4", ResolutionMode::StepByStep, Delivery::Streaming)
            .await
            .unwrap();
        assert_eq!(answer.into_text().await.unwrap(), "uno dos");
    }

    #[tokio::test]
    async fn stream_without_done_fragment_ends_in_error() {
        let inference = MockInference::new();
        inference
            .push(MockReply::Chunks(vec![InferenceChunk {
                response: Some("a medias".into()),
                done: false,
            }]))
            .await;
        let algebra = RecordingAlgebra::new();
        let answer = tutor(&inference, &algebra)
            .explain_topic("¿Qué es la luz?", Delivery::Streaming)
            .await
            .unwrap();
        let Answer::Stream(mut pieces) = answer else {
            panic!("expected a stream");
        };
        assert_eq!(pieces.next().await.unwrap().unwrap(), "a medias");
        let err = pieces.next().await.unwrap().unwrap_err();
        assert_eq!(
            err.to_string(),
            "inference error: stream ended before the final fragment"
        );
        assert!(pieces.next().await.is_none());
    }

    // --- topics ---

    #[tokio::test]
    async fn brief_topic_by_default() {
        let inference = MockInference::with_responses(["La fotosíntesis convierte luz en energía."]);
        let algebra = RecordingAlgebra::new();
        let answer = tutor(&inference, &algebra)
            .explain_topic("¿Qué es la fotosíntesis?", Delivery::Blocking)
            .await
            .unwrap();
        assert_eq!(text(answer).await, "La fotosíntesis convierte luz en energía.");
        let plan = inference.last_plan().await.unwrap();
        assert_eq!(plan.max_tokens, 40);
        assert!(plan.prompt.ends_with("Respuesta breve en 2 frases:"));
    }

    #[tokio::test]
    async fn detail_cue_selects_detailed_plan() {
        let inference = MockInference::new();
        let algebra = RecordingAlgebra::new();
        tutor(&inference, &algebra)
            .explain_topic("Explain photosynthesis, detailed", Delivery::Blocking)
            .await
            .unwrap();
        let plan = inference.last_plan().await.unwrap();
        assert_eq!(plan.max_tokens, 100);
        assert!(plan.prompt.ends_with("Explica con detalle:"));
    }

    #[tokio::test]
    async fn empty_topic_answer_yields_sentinel() {
        let inference = MockInference::with_responses([""]);
        let algebra = RecordingAlgebra::new();
        let answer = tutor(&inference, &algebra)
            .explain_topic("¿Quién fue Bolívar?", Delivery::Blocking)
            .await
            .unwrap();
        assert_eq!(text(answer).await, "🛑 No pude explicar el tema.");
    }

    #[tokio::test]
    async fn streamed_topic() {
        let inference = MockInference::with_responses(["Roma fue un imperio."]);
        let algebra = RecordingAlgebra::new();
        let answer = tutor(&inference, &algebra)
            .explain_topic("Roma", Delivery::Streaming)
            .await
            .unwrap();
        assert_eq!(answer.into_text().await.unwrap(), "Roma fue un imperio.");
    }

    #[test]
    fn first_number_extraction() {
        assert_eq!(
            extract_result("El resultado es 3,5 aproximadamente"),
            SolveOutcome::NumericValue { value: "3.5".into() }
        );
        assert_eq!(
            extract_result("x vale 12 y luego 4"),
            SolveOutcome::NumericValue { value: "12".into() }
        );
        assert_eq!(extract_result(""), SolveOutcome::Failure(Sentinel::NoNumber));
    }
}
