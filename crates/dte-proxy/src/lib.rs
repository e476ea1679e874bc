// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! The execution-proxy protocol (§4.7): the boundary between the
//! dispatchers in [`dte-engine`](../dte_engine/index.html) and a single
//! connected remote worker.
//!
//! The spec excludes gRPC transport framing from the core, so this crate
//! stops at the transport-agnostic shape of the protocol: an outbound
//! stream of [`WorkItem`]s to whichever worker is attached, and two
//! completion entry points (`complete_orchestrator_task`,
//! `complete_activity_task`) that a real transport layer (gRPC, a framed
//! socket, anything) calls once it has decoded a worker's response. The
//! `ExecutorProxy` in this crate implements
//! [`dte_engine::Executor`](dte_engine::executor::Executor) by turning each
//! call into a pending correlation entry plus an outbound `WorkItem`.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod connection;
pub mod error;
pub mod proxy;
pub mod work_item;

pub use connection::{AttachHandle, ConnectionConfig};
pub use error::ProxyError;
pub use proxy::{ActivityCompletion, ExecutorProxy};
pub use work_item::WorkItem;
