// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! Dispatch policy for the durable task execution core: the orchestration
//! and activity dispatcher loops, the worker boundary they call through,
//! the traffic signal that gates dispatch on a connected worker, and the
//! concurrency/timeout knobs that govern all of it.
//!
//! State and its atomic transitions live in
//! [`dte-storage`](../dte_storage/index.html); the worker-channel transport
//! that implements [`Executor`] lives in [`dte-proxy`](../dte_proxy/index.html).

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod activity_dispatcher;
pub mod config;
pub mod executor;
pub mod orchestration_dispatcher;
pub mod traffic_signal;
pub mod translate;

pub use activity_dispatcher::ActivityDispatcher;
pub use config::DispatcherConfig;
pub use executor::{ActivityOutcome, ActivityRequest, Executor, OrchestratorRequest, OrchestratorResponse};
pub use orchestration_dispatcher::OrchestrationDispatcher;
pub use traffic_signal::TrafficSignal;
