// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effects produced by [`crate::decision::apply`].
//!
//! The decision function never performs I/O itself — it returns a list of
//! effects describing what should happen, and the actor loop in
//! [`crate::supervisor`] carries them out. This is what makes the state
//! transitions unit-testable without tokio: a test calls `apply` and asserts
//! on the returned `Vec<Effect>` directly.

use scf_core::{ChangeRow, Sequence, ShutdownReason, WorkerId};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Effect {
    /// Spawn a Change-Reader worker for `shard`, resuming from `since`.
    SpawnReader { worker: WorkerId, shard: String, since: Sequence },
    InvokeDbFound { shard: String },
    InvokeDbCreated { shard: String },
    InvokeDbDeleted { shard: String },
    InvokeDbChange { shard: String, row: ChangeRow },
    /// A checkpoint arrived from a worker the table no longer recognizes as
    /// the shard's current owner. No state change; logged for visibility.
    LogStaleCheckpoint { shard: String, worker: WorkerId },
    LogWorkerError { shard: String, reason: String },
    /// Terminate the Supervisor; no further messages are processed.
    Terminate(ShutdownReason),
}
