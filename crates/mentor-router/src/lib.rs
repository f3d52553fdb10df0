// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query routing for the Mentor tutor.
//!
//! Normalizes and classifies math input, chooses a prompt plan and budget
//! tier, and orchestrates the algebra engine and the inference adapter.

pub mod classifier;
pub mod normalize;
pub mod plan;
pub mod tutor;

pub use classifier::{classify, Classification};
pub use normalize::{normalize, NormalizedExpression};
pub use plan::BudgetTier;
pub use tutor::Tutor;
