// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Mentor tests.
//!
//! Provides mock collaborators for fast, deterministic tests without a
//! running inference server.
//!
//! # Components
//!
//! - [`MockInference`] - scripted inference adapter that records every plan
//! - [`RecordingAlgebra`] - algebra engine wrapper that records every call

pub mod mock_algebra;
pub mod mock_inference;

pub use mock_algebra::{AlgebraCall, RecordingAlgebra};
pub use mock_inference::{MockInference, MockReply, RecordedRequest};
