// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Mentor tutor.
//!
//! Exposes the orchestrators over JSON and Server-Sent Events, and owns the
//! history of answered queries. Nothing below this crate knows about HTTP or
//! history.

pub mod error;
pub mod handlers;
pub mod history;
pub mod server;
pub mod sse;

pub use error::RequestError;
pub use history::MemoryHistory;
pub use server::{build_router, start_server, GatewayState, HealthState};
