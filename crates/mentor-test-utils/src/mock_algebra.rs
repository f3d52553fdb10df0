// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Algebra engine wrapper that records how it was consulted.

use std::sync::{Arc, Mutex};

use mentor_algebra::{AlgebraEngine, AlgebraError, Number, Solution, SymbolicEngine};

/// One call made to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlgebraCall {
    Solve { lhs: String, rhs: String },
    Evaluate { expression: String },
}

/// Delegates to [`SymbolicEngine`] (or fails every call) and records each call.
#[derive(Clone, Default)]
pub struct RecordingAlgebra {
    calls: Arc<Mutex<Vec<AlgebraCall>>>,
    failing: bool,
}

impl RecordingAlgebra {
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine that rejects every expression as unsupported.
    pub fn failing() -> Self {
        Self {
            calls: Arc::default(),
            failing: true,
        }
    }

    pub fn calls(&self) -> Vec<AlgebraCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }

    fn record(&self, call: AlgebraCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl AlgebraEngine for RecordingAlgebra {
    fn solve(&self, lhs: &str, rhs: &str) -> Result<Vec<Solution>, AlgebraError> {
        self.record(AlgebraCall::Solve {
            lhs: lhs.to_string(),
            rhs: rhs.to_string(),
        });
        if self.failing {
            return Err(AlgebraError::Unsupported("scripted failure".into()));
        }
        SymbolicEngine.solve(lhs, rhs)
    }

    fn evaluate(&self, expression: &str) -> Result<Number, AlgebraError> {
        self.record(AlgebraCall::Evaluate {
            expression: expression.to_string(),
        });
        if self.failing {
            return Err(AlgebraError::Unsupported("scripted failure".into()));
        }
        SymbolicEngine.evaluate(expression)
    }
}
