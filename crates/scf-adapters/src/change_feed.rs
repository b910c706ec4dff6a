// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The change-feed primitive, consumed by both Change-Readers (per shard)
//! and the Scanner (over the shard-map database).

use async_trait::async_trait;
use scf_core::{ChangeRow, Sequence};
use thiserror::Error;

/// Errors from opening or reading a change feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("io error opening change feed for {shard}: {message}")]
    Io { shard: String, message: String },
}

/// One frame emitted by an open change feed.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// A document mutation.
    Change(ChangeRow),
    /// The feed has reached the end of its (finite) backlog.
    Stop(Sequence),
    /// Any other frame shape — ignored by readers.
    Other,
}

/// A single open change-feed cursor.
#[async_trait]
pub trait ChangeFeed: Send {
    /// Pull the next frame. Implementations drive this to completion
    /// themselves; there is no per-call timeout (see spec §5).
    async fn next_frame(&mut self) -> Result<Frame, FeedError>;
}

/// Opens change feeds on shards (privileged / admin context, include-docs,
/// feed mode "normal" — stream the current backlog then end).
#[async_trait]
pub trait ChangeFeedSource: Send + Sync + 'static {
    type Feed: ChangeFeed;

    async fn open(&self, shard: &str, since: Sequence) -> Result<Self::Feed, FeedError>;
}
