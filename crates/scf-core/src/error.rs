// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor-fatal shutdown reasons.

use thiserror::Error;

/// Why a Supervisor stopped running.
///
/// A correctly-initialized Supervisor either runs indefinitely or exits
/// with one of these reasons; there is no other terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShutdownReason {
    #[error("event bus died: {0}")]
    EventBusDied(String),

    #[error("scanner died: {0}")]
    ScannerDied(String),

    #[error("unexpected exit of untracked task {task_id}: {reason}")]
    UnexpectedExit { task_id: String, reason: String },
}
