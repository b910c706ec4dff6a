// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Change-Reader worker: one per currently-scanned shard, translating
//! change-feed frames into mailbox calls the Supervisor blocks on (spec
//! §4.2).

use crate::message::{Mail, Outcome, TaskId};
use scf_adapters::{ChangeFeed, ChangeFeedSource, Frame};
use scf_core::{Sequence, WorkerId};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

pub(crate) async fn run<F: ChangeFeedSource>(
    worker: WorkerId,
    shard: String,
    since: Sequence,
    feed_source: Arc<F>,
    mail_tx: mpsc::UnboundedSender<Mail>,
) {
    let mut feed = match feed_source.open(&shard, since).await {
        Ok(feed) => feed,
        Err(err) => {
            let _ = mail_tx.send(Mail::TaskDone {
                task: TaskId::Worker(worker),
                outcome: Outcome::Abnormal(err.to_string()),
            });
            return;
        }
    };

    loop {
        match feed.next_frame().await {
            Ok(Frame::Change(row)) => {
                let (ack_tx, ack_rx) = oneshot::channel();
                if mail_tx.send(Mail::Change { shard: shard.clone(), row, ack: ack_tx }).is_err() {
                    return;
                }
                // Block until the Supervisor has processed this row —
                // this is the worker's entire backpressure contract.
                let _ = ack_rx.await;
            }
            Ok(Frame::Stop(end_seq)) => {
                let (ack_tx, ack_rx) = oneshot::channel();
                if mail_tx
                    .send(Mail::Checkpoint { shard: shard.clone(), end_seq, worker, ack: ack_tx })
                    .is_err()
                {
                    return;
                }
                let _ = ack_rx.await;
                let _ = mail_tx.send(Mail::TaskDone { task: TaskId::Worker(worker), outcome: Outcome::Normal });
                return;
            }
            Ok(Frame::Other) => continue,
            Err(err) => {
                let _ = mail_tx.send(Mail::TaskDone {
                    task: TaskId::Worker(worker),
                    outcome: Outcome::Abnormal(err.to_string()),
                });
                return;
            }
        }
    }
}
