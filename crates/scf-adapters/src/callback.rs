// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The user-supplied callback module (spec §4.4).

use async_trait::async_trait;
use scf_core::ChangeRow;

/// The four operations an application implements to receive supervisor
/// events. Each takes the current user context and returns the next one;
/// because every call is made from the Supervisor's own single execution
/// context, the context never needs locking.
///
/// Implementations must not call back into the Supervisor synchronously —
/// doing so would deadlock the worker that is blocked waiting on this call.
#[async_trait]
pub trait CallbackModule: Send + Sync + 'static {
    type Context: Send + 'static;

    async fn db_created(&self, shard: &str, ctx: Self::Context) -> Self::Context;
    async fn db_deleted(&self, shard: &str, ctx: Self::Context) -> Self::Context;
    async fn db_found(&self, shard: &str, ctx: Self::Context) -> Self::Context;
    async fn db_change(&self, shard: &str, row: &ChangeRow, ctx: Self::Context) -> Self::Context;
}
