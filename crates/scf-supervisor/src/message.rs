// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mailbox message shapes.
//!
//! [`Mail`] is what actually travels over the Supervisor's mpsc channel —
//! it carries the oneshot ack senders that give workers their synchronous
//! backpressure. [`Msg`] is the ack-free shape the decision logic in
//! [`crate::decision`] actually reasons about, so that logic stays free of
//! any channel type and is trivially unit-testable.

use scf_core::{BusEvent, ChangeRow, Sequence, WorkerId};
use tokio::sync::oneshot;

/// Which background task a [`Msg::TaskDone`] notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TaskId {
    Scanner,
    EventBus,
    Worker(WorkerId),
}

/// How a background task exited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outcome {
    Normal,
    Abnormal(String),
}

impl Outcome {
    pub(crate) fn describe(&self) -> String {
        match self {
            Outcome::Normal => "normal".to_string(),
            Outcome::Abnormal(reason) => reason.clone(),
        }
    }
}

/// Ack-free message shape, consumed by the pure decision function.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Msg {
    Change { shard: String, row: ChangeRow },
    Checkpoint { shard: String, end_seq: Sequence, worker: WorkerId },
    ResumeScan { shard: String },
    Bus(BusEvent),
    TaskDone { task: TaskId, outcome: Outcome },
}

/// What actually flows through the Supervisor's mailbox.
pub(crate) enum Mail {
    Change { shard: String, row: ChangeRow, ack: oneshot::Sender<()> },
    Checkpoint { shard: String, end_seq: Sequence, worker: WorkerId, ack: oneshot::Sender<()> },
    ResumeScan { shard: String },
    Bus(BusEvent),
    TaskDone { task: TaskId, outcome: Outcome },
}

impl Mail {
    /// Split into the pure message and, for the two operations workers
    /// block on, the ack channel to signal once it has been handled.
    pub(crate) fn split(self) -> (Msg, Option<oneshot::Sender<()>>) {
        match self {
            Mail::Change { shard, row, ack } => (Msg::Change { shard, row }, Some(ack)),
            Mail::Checkpoint { shard, end_seq, worker, ack } => {
                (Msg::Checkpoint { shard, end_seq, worker }, Some(ack))
            }
            Mail::ResumeScan { shard } => (Msg::ResumeScan { shard }, None),
            Mail::Bus(event) => (Msg::Bus(event), None),
            Mail::TaskDone { task, outcome } => (Msg::TaskDone { task, outcome }, None),
        }
    }
}
