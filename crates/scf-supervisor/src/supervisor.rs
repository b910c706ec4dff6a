// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Supervisor actor: a single long-lived task owning the checkpoint
//! table, serially applying the pure decision function to every mailbox
//! message and carrying out the effects it returns.

use crate::decision;
use crate::effect::Effect;
use crate::message::{Mail, Outcome, TaskId};
use crate::reader;
use crate::scanner;
use crate::state::SupervisorState;
use scf_adapters::{CallbackModule, ChangeFeedSource, EventBusSource, EventSubscription, RandomSource, ShardMapSource};
use scf_core::ShutdownReason;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Tuning knobs independent of the collaborator wiring.
#[derive(Debug, Clone, Copy, Default)]
pub struct SupervisorOptions {
    /// Drop design documents (`_design/...`) before they reach
    /// [`CallbackModule::db_change`].
    pub skip_design_docs: bool,
}

/// The external collaborators a Supervisor is wired to at startup.
pub struct SupervisorDeps<F, M, B, K, R> {
    pub feed_source: Arc<F>,
    pub shard_map: M,
    pub event_bus: B,
    pub callback: K,
    pub random: R,
}

/// A handle to a running Supervisor.
pub struct SupervisorHandle {
    join: JoinHandle<ShutdownReason>,
    mail_tx: mpsc::UnboundedSender<Mail>,
}

impl SupervisorHandle {
    /// Wait for the Supervisor to stop and report why.
    pub async fn join(self) -> ShutdownReason {
        match self.join.await {
            Ok(reason) => reason,
            Err(err) => ShutdownReason::UnexpectedExit { task_id: "supervisor".to_string(), reason: err.to_string() },
        }
    }

    /// Abort the Supervisor task directly, without waiting for a clean
    /// shutdown reason. Intended for host-process teardown, not for
    /// reacting to a collaborator failure (use [`SupervisorHandle::join`]
    /// for that).
    pub fn abort(&self) {
        self.join.abort();
    }

    #[cfg(test)]
    pub(crate) fn test_mail_tx(&self) -> mpsc::UnboundedSender<Mail> {
        self.mail_tx.clone()
    }
}

/// Start a Supervisor: subscribe to the event bus, spawn the Scanner, and
/// begin serially applying mailbox messages.
///
/// The only synchronous failure mode is malformed arguments; any runtime
/// failure of a collaborator (including the initial event-bus subscribe)
/// surfaces later as the Supervisor's [`ShutdownReason`], delivered through
/// [`SupervisorHandle::join`].
pub fn start_link<F, M, B, K, R>(
    suffix: impl Into<String>,
    options: SupervisorOptions,
    deps: SupervisorDeps<F, M, B, K, R>,
    context: K::Context,
) -> SupervisorHandle
where
    F: ChangeFeedSource + 'static,
    M: ShardMapSource + 'static,
    B: EventBusSource + 'static,
    K: CallbackModule,
    R: RandomSource + 'static,
{
    let suffix = suffix.into();
    let (mail_tx, mail_rx) = mpsc::unbounded_channel::<Mail>();

    spawn_event_bus_forwarder(deps.event_bus, mail_tx.clone());
    tokio::spawn(scanner::run(suffix.clone(), deps.shard_map, deps.random, mail_tx.clone()));

    let join = tokio::spawn(run_actor(suffix, options, deps.feed_source, deps.callback, context, mail_tx.clone(), mail_rx));

    SupervisorHandle { join, mail_tx }
}

fn spawn_event_bus_forwarder<B>(event_bus: B, mail_tx: mpsc::UnboundedSender<Mail>)
where
    B: EventBusSource + 'static,
{
    tokio::spawn(async move {
        match event_bus.subscribe().await {
            Ok(mut sub) => loop {
                match sub.recv().await {
                    Some(event) => {
                        if mail_tx.send(Mail::Bus(event)).is_err() {
                            break;
                        }
                    }
                    None => {
                        let _ = mail_tx.send(Mail::TaskDone {
                            task: TaskId::EventBus,
                            outcome: Outcome::Abnormal("event bus connection closed".to_string()),
                        });
                        break;
                    }
                }
            },
            Err(err) => {
                let _ = mail_tx.send(Mail::TaskDone { task: TaskId::EventBus, outcome: Outcome::Abnormal(err.to_string()) });
            }
        }
    });
}

#[allow(clippy::too_many_arguments)]
async fn run_actor<F, K>(
    suffix: String,
    options: SupervisorOptions,
    feed_source: Arc<F>,
    callback: K,
    mut ctx: K::Context,
    mail_tx: mpsc::UnboundedSender<Mail>,
    mut mail_rx: mpsc::UnboundedReceiver<Mail>,
) -> ShutdownReason
where
    F: ChangeFeedSource + 'static,
    K: CallbackModule,
{
    let mut state = SupervisorState::new(suffix, options.skip_design_docs);

    loop {
        let mail = match mail_rx.recv().await {
            Some(mail) => mail,
            None => break ShutdownReason::EventBusDied("mailbox closed".to_string()),
        };

        let (msg, ack) = mail.split();
        let effects = decision::apply(&mut state, msg);

        let mut shutdown = None;
        for effect in effects {
            match effect {
                Effect::SpawnReader { worker, shard, since } => {
                    let fs = Arc::clone(&feed_source);
                    let tx = mail_tx.clone();
                    tokio::spawn(reader::run(worker, shard, since, fs, tx));
                }
                Effect::InvokeDbFound { shard } => ctx = callback.db_found(&shard, ctx).await,
                Effect::InvokeDbCreated { shard } => ctx = callback.db_created(&shard, ctx).await,
                Effect::InvokeDbDeleted { shard } => ctx = callback.db_deleted(&shard, ctx).await,
                Effect::InvokeDbChange { shard, row } => ctx = callback.db_change(&shard, &row, ctx).await,
                Effect::LogStaleCheckpoint { shard, worker } => {
                    tracing::warn!(shard = %shard, worker = ?worker, "stale checkpoint from untracked worker ignored");
                }
                Effect::LogWorkerError { shard, reason } => {
                    tracing::error!(shard = %shard, reason = %reason, "change-reader exited abnormally");
                }
                Effect::Terminate(reason) => {
                    shutdown = Some(reason);
                    break;
                }
            }
        }

        if let Some(ack) = ack {
            let _ = ack.send(());
        }

        if let Some(reason) = shutdown {
            tracing::warn!(reason = %reason, "supervisor shutting down");
            break reason;
        }
    }
}
