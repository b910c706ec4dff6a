// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Scanner task: a one-shot walk of the shard-map database that issues
//! a `resume_scan` for every local shard matching our suffix, jitter-paced
//! so a fleet-wide restart doesn't thunder every shard's reader at once
//! (spec §4.3).

use crate::message::{Mail, Outcome, TaskId};
use scf_adapters::{ChangeFeed, Frame, LocalShardsError, RandomSource, ShardMapSource};
use scf_core::suffix_of;
use std::time::Duration;
use tokio::sync::mpsc;

const AVG_DELAY_MSEC: u64 = 10;
const MAX_DELAY_MSEC: u64 = 120_000;

pub(crate) async fn run<M: ShardMapSource, R: RandomSource>(
    suffix: String,
    shard_map: M,
    random: R,
    mail_tx: mpsc::UnboundedSender<Mail>,
) {
    let mut n: u64 = 1;

    // The shard-map database itself may be locally hosted; if so it is
    // scanned like any other shard.
    if shard_map.local_db_exists(&suffix).await {
        let _ = mail_tx.send(Mail::ResumeScan { shard: suffix.clone() });
    }

    let mut feed = match shard_map.open_feed().await {
        Ok(feed) => feed,
        Err(err) => {
            let _ = mail_tx.send(Mail::TaskDone { task: TaskId::Scanner, outcome: Outcome::Abnormal(err.to_string()) });
            return;
        }
    };

    loop {
        match feed.next_frame().await {
            Ok(Frame::Change(row)) => {
                if row.deleted || row.is_design_doc() {
                    continue;
                }
                let database = row.id;
                if suffix_of(&database) != suffix {
                    continue;
                }
                match shard_map.local_shards(&database).await {
                    Ok(shards) => {
                        for shard in shards {
                            let delay_ms = jitter(&random, n, AVG_DELAY_MSEC, MAX_DELAY_MSEC);
                            n += 1;
                            let tx = mail_tx.clone();
                            tokio::spawn(async move {
                                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                                let _ = tx.send(Mail::ResumeScan { shard });
                            });
                        }
                    }
                    Err(LocalShardsError::DatabaseDoesNotExist(_)) => {}
                    Err(err) => {
                        tracing::warn!(database = %database, error = %err, "failed to enumerate local shards");
                    }
                }
            }
            Ok(Frame::Stop(_)) => break,
            Ok(Frame::Other) => continue,
            Err(err) => {
                let _ = mail_tx.send(Mail::TaskDone { task: TaskId::Scanner, outcome: Outcome::Abnormal(err.to_string()) });
                return;
            }
        }
    }

    let _ = mail_tx.send(Mail::TaskDone { task: TaskId::Scanner, outcome: Outcome::Normal });
}

fn jitter<R: RandomSource>(random: &R, n: u64, avg_delay_msec: u64, max_delay_msec: u64) -> u64 {
    let hi = (2 * n * avg_delay_msec).min(max_delay_msec).max(1);
    random.uniform(1, hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jitter_bounded_by_max_delay() {
        struct Hi;
        impl RandomSource for Hi {
            fn uniform(&self, _lo: u64, hi: u64) -> u64 {
                hi
            }
        }
        // With n large enough that 2*n*avg exceeds max, the bound clamps.
        assert_eq!(jitter(&Hi, 1_000_000, AVG_DELAY_MSEC, MAX_DELAY_MSEC), MAX_DELAY_MSEC);
    }

    #[test]
    fn jitter_scales_with_n_below_cap() {
        struct Hi;
        impl RandomSource for Hi {
            fn uniform(&self, _lo: u64, hi: u64) -> u64 {
                hi
            }
        }
        assert_eq!(jitter(&Hi, 3, AVG_DELAY_MSEC, MAX_DELAY_MSEC), 60);
    }
}
