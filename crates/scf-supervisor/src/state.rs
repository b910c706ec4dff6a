// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The checkpoint table and worker registry the Supervisor mutates in place
//! as it applies each mailbox message.

use scf_core::{CheckpointEntry, WorkerId};
use std::collections::HashMap;

/// All state owned by a running Supervisor.
///
/// Mutated only from [`crate::decision::apply`], serially, one message at a
/// time — there is never concurrent access, so no locking is needed here.
pub(crate) struct SupervisorState {
    pub(crate) suffix: String,
    pub(crate) skip_design_docs: bool,
    pub(crate) checkpoints: HashMap<String, CheckpointEntry>,
    pub(crate) workers: HashMap<WorkerId, String>,
    next_worker: u64,
}

impl SupervisorState {
    pub(crate) fn new(suffix: impl Into<String>, skip_design_docs: bool) -> Self {
        Self {
            suffix: suffix.into(),
            skip_design_docs,
            checkpoints: HashMap::new(),
            workers: HashMap::new(),
            next_worker: 0,
        }
    }

    pub(crate) fn alloc_worker(&mut self) -> WorkerId {
        let id = WorkerId(self.next_worker);
        self.next_worker += 1;
        id
    }
}
