// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! scf-supervisor: a per-node fan-out supervisor that keeps one
//! Change-Reader worker running per locally-hosted shard matching a
//! configured database-name suffix, relaying every row through a
//! user-supplied callback module and re-discovering shards from both a
//! startup scan and live cluster event-bus notifications.
//!
//! The Supervisor's state machine ([`decision::apply`]) is a pure function
//! independent of tokio; [`supervisor::start_link`] wires it to the real
//! Change-Reader workers, Scanner task, and event-bus forwarder that make
//! up a running instance.

mod decision;
mod effect;
mod message;
mod reader;
mod scanner;
mod state;
mod supervisor;

pub use supervisor::{start_link, SupervisorDeps, SupervisorHandle, SupervisorOptions};
