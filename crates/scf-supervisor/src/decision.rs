// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Supervisor's state-transition logic: one pure function from
//! `(state, message)` to `(state', effects)`.
//!
//! This is the heart of the Supervisor. Keeping it free of tokio, channels,
//! and the callback trait means every boundary scenario can be exercised as
//! a plain synchronous unit test.

use crate::effect::Effect;
use crate::message::{Msg, Outcome, TaskId};
use crate::state::SupervisorState;
use scf_core::{suffix_of, BusEventKind, CheckpointEntry, ShutdownReason, WorkerId};

pub(crate) fn apply(state: &mut SupervisorState, msg: Msg) -> Vec<Effect> {
    match msg {
        Msg::Change { shard, row } => {
            if state.skip_design_docs && row.is_design_doc() {
                vec![]
            } else {
                vec![Effect::InvokeDbChange { shard, row }]
            }
        }
        Msg::Checkpoint { shard, end_seq, worker } => match state.checkpoints.get_mut(&shard) {
            Some(entry) if entry.worker == Some(worker) => {
                entry.end_seq = end_seq;
                vec![]
            }
            _ => vec![Effect::LogStaleCheckpoint { shard, worker }],
        },
        Msg::ResumeScan { shard } => resume_scan(state, shard),
        Msg::Bus(event) => {
            if suffix_of(&event.database) != state.suffix {
                return vec![];
            }
            match event.kind {
                BusEventKind::Created => {
                    let mut effects = vec![Effect::InvokeDbCreated { shard: event.database.clone() }];
                    effects.extend(resume_scan(state, event.database));
                    effects
                }
                BusEventKind::Deleted => vec![Effect::InvokeDbDeleted { shard: event.database }],
                BusEventKind::Updated => resume_scan(state, event.database),
                BusEventKind::Other(_) => vec![],
            }
        }
        Msg::TaskDone { task, outcome } => task_done(state, task, outcome),
    }
}

/// Ensure a reader is (or will be) running for `shard`, per the three-way
/// split on the shard's current checkpoint entry:
///
/// - no entry: first sighting, spawn from sequence zero and report it found
/// - entry with no live worker: respawn from the last checkpointed sequence
/// - entry with a live worker: coalesce into that worker's pending rescan
fn resume_scan(state: &mut SupervisorState, shard: String) -> Vec<Effect> {
    match state.checkpoints.get(&shard) {
        None => {
            let worker = state.alloc_worker();
            state.checkpoints.insert(shard.clone(), CheckpointEntry::fresh(worker));
            state.workers.insert(worker, shard.clone());
            vec![
                Effect::SpawnReader { worker, shard: shard.clone(), since: scf_core::Sequence::zero() },
                Effect::InvokeDbFound { shard },
            ]
        }
        Some(entry) if entry.worker.is_none() => {
            let since = entry.end_seq.clone();
            let worker = state.alloc_worker();
            state
                .checkpoints
                .insert(shard.clone(), CheckpointEntry { end_seq: since.clone(), rescan_pending: false, worker: Some(worker) });
            state.workers.insert(worker, shard.clone());
            vec![Effect::SpawnReader { worker, shard, since }]
        }
        Some(_) => {
            if let Some(entry) = state.checkpoints.get_mut(&shard) {
                entry.rescan_pending = true;
            }
            vec![]
        }
    }
}

fn task_done(state: &mut SupervisorState, task: TaskId, outcome: Outcome) -> Vec<Effect> {
    match task {
        TaskId::EventBus => vec![Effect::Terminate(ShutdownReason::EventBusDied(outcome.describe()))],
        TaskId::Scanner => match outcome {
            Outcome::Normal => vec![],
            Outcome::Abnormal(reason) => vec![Effect::Terminate(ShutdownReason::ScannerDied(reason))],
        },
        TaskId::Worker(worker) => worker_done(state, worker, outcome),
    }
}

fn worker_done(state: &mut SupervisorState, worker: WorkerId, outcome: Outcome) -> Vec<Effect> {
    let Some(shard) = state.workers.remove(&worker) else {
        return vec![Effect::Terminate(ShutdownReason::UnexpectedExit {
            task_id: format!("{worker:?}"),
            reason: outcome.describe(),
        })];
    };

    let mut effects = Vec::new();
    if let Outcome::Abnormal(reason) = &outcome {
        effects.push(Effect::LogWorkerError { shard: shard.clone(), reason: reason.clone() });
    }

    let rescan_needed = match state.checkpoints.get_mut(&shard) {
        Some(entry) if entry.worker == Some(worker) => {
            entry.worker = None;
            entry.rescan_pending
        }
        _ => false,
    };

    if rescan_needed {
        effects.extend(resume_scan(state, shard));
    }
    effects
}

#[cfg(test)]
mod tests {
    use super::*;
    use scf_core::{BusEvent, ChangeRow, Sequence};

    fn state() -> SupervisorState {
        SupervisorState::new("suff", true)
    }

    // Scenario 1: cold discovery spawns a worker from zero and reports the
    // shard found.
    #[test]
    fn cold_discovery_spawns_from_zero() {
        let mut st = state();
        let effects = apply(&mut st, Msg::ResumeScan { shard: "shards/.../db.suff.0".into() });
        assert_eq!(
            effects,
            vec![
                Effect::SpawnReader { worker: WorkerId(0), shard: "shards/.../db.suff.0".into(), since: Sequence::zero() },
                Effect::InvokeDbFound { shard: "shards/.../db.suff.0".into() },
            ]
        );
        assert_eq!(st.workers.get(&WorkerId(0)), Some(&"shards/.../db.suff.0".to_string()));
    }

    // Scenario 2: a plain change row passes straight through to the
    // callback.
    #[test]
    fn change_passthrough() {
        let mut st = state();
        let row = ChangeRow::new("doc1");
        let effects = apply(&mut st, Msg::Change { shard: "s1".into(), row: row.clone() });
        assert_eq!(effects, vec![Effect::InvokeDbChange { shard: "s1".into(), row }]);
    }

    // Scenario 3: design documents are dropped when skip_design_docs is set.
    #[test]
    fn design_doc_filtered() {
        let mut st = state();
        let row = ChangeRow::new("_design/views");
        let effects = apply(&mut st, Msg::Change { shard: "s1".into(), row });
        assert_eq!(effects, vec![]);
    }

    // Scenario 4: a checkpoint from a worker the table no longer owns is
    // ignored, leaving the entry untouched.
    #[test]
    fn stale_checkpoint_ignored() {
        let mut st = state();
        apply(&mut st, Msg::ResumeScan { shard: "s1".into() });
        let before = st.checkpoints.get("s1").cloned();
        let effects = apply(&mut st, Msg::Checkpoint { shard: "s1".into(), end_seq: Sequence::from("42"), worker: WorkerId(99) });
        assert!(matches!(effects.as_slice(), [Effect::LogStaleCheckpoint { .. }]));
        assert_eq!(st.checkpoints.get("s1").cloned(), before);
    }

    // Scenario 5: a resume_scan while the shard's worker is alive coalesces
    // into a single pending rescan rather than spawning a second worker.
    #[test]
    fn coalesced_rescan() {
        let mut st = state();
        apply(&mut st, Msg::ResumeScan { shard: "s1".into() });
        let effects = apply(&mut st, Msg::ResumeScan { shard: "s1".into() });
        assert_eq!(effects, vec![]);
        assert!(st.checkpoints.get("s1").unwrap().rescan_pending);

        // When that worker exits normally, the pending rescan spawns a
        // fresh reader from the checkpointed sequence, exactly once.
        apply(&mut st, Msg::Checkpoint { shard: "s1".into(), end_seq: Sequence::from("7"), worker: WorkerId(0) });
        let effects = apply(&mut st, Msg::TaskDone { task: TaskId::Worker(WorkerId(0)), outcome: Outcome::Normal });
        assert_eq!(
            effects,
            vec![Effect::SpawnReader { worker: WorkerId(1), shard: "s1".into(), since: Sequence::from("7") }]
        );
        assert!(!st.checkpoints.get("s1").unwrap().rescan_pending);
    }

    // Scenario 6: a `created` bus event for a shard matching our suffix
    // reports creation and triggers discovery.
    #[test]
    fn bus_created_triggers_discovery() {
        let mut st = state();
        let effects = apply(&mut st, Msg::Bus(BusEvent::created("acct/suff")));
        assert_eq!(
            effects,
            vec![
                Effect::InvokeDbCreated { shard: "acct/suff".into() },
                Effect::SpawnReader { worker: WorkerId(0), shard: "acct/suff".into(), since: Sequence::zero() },
                Effect::InvokeDbFound { shard: "acct/suff".into() },
            ]
        );
    }

    // Scenario 7: a bus event for a shard with a different suffix is
    // ignored entirely.
    #[test]
    fn bus_event_suffix_mismatch_ignored() {
        let mut st = state();
        let effects = apply(&mut st, Msg::Bus(BusEvent::created("acct/other")));
        assert_eq!(effects, vec![]);
    }

    // Scenario 8: a Scanner exiting normally produces no effect — it has
    // already reported every shard via resume_scan.
    #[test]
    fn scanner_normal_exit_is_quiet() {
        let mut st = state();
        let effects = apply(&mut st, Msg::TaskDone { task: TaskId::Scanner, outcome: Outcome::Normal });
        assert_eq!(effects, vec![]);
    }

    // Scenario 9: a Scanner exiting abnormally is fatal to the Supervisor.
    #[test]
    fn scanner_abnormal_exit_terminates() {
        let mut st = state();
        let effects = apply(&mut st, Msg::TaskDone { task: TaskId::Scanner, outcome: Outcome::Abnormal("disconnected".into()) });
        assert_eq!(effects, vec![Effect::Terminate(ShutdownReason::ScannerDied("disconnected".into()))]);
    }

    #[test]
    fn event_bus_death_terminates() {
        let mut st = state();
        let effects = apply(&mut st, Msg::TaskDone { task: TaskId::EventBus, outcome: Outcome::Abnormal("closed".into()) });
        assert_eq!(effects, vec![Effect::Terminate(ShutdownReason::EventBusDied("closed".into()))]);
    }

    #[test]
    fn untracked_worker_exit_terminates() {
        let mut st = state();
        let effects = apply(&mut st, Msg::TaskDone { task: TaskId::Worker(WorkerId(7)), outcome: Outcome::Normal });
        assert!(matches!(effects.as_slice(), [Effect::Terminate(ShutdownReason::UnexpectedExit { .. })]));
    }

    #[test]
    fn worker_error_logged_and_shard_released() {
        let mut st = state();
        apply(&mut st, Msg::ResumeScan { shard: "s1".into() });
        let effects = apply(&mut st, Msg::TaskDone { task: TaskId::Worker(WorkerId(0)), outcome: Outcome::Abnormal("feed reset".into()) });
        assert_eq!(effects, vec![Effect::LogWorkerError { shard: "s1".into(), reason: "feed reset".into() }]);
        assert_eq!(st.checkpoints.get("s1").unwrap().worker, None);
        assert!(!st.workers.contains_key(&WorkerId(0)));
    }
}
