// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The shard-map database: discovery of local shards matching the
//! configured suffix.

use crate::change_feed::{ChangeFeed, FeedError};
use async_trait::async_trait;
use thiserror::Error;

/// Errors from `local_shards`.
#[derive(Debug, Error)]
pub enum LocalShardsError {
    /// The named database does not exist locally. The Scanner treats this
    /// as an empty shard list rather than an error (spec §6).
    #[error("database does not exist: {0}")]
    DatabaseDoesNotExist(String),
    #[error("shard map error: {0}")]
    Other(String),
}

/// The well-known local database that maps logical database names to the
/// shards that host them (configuration key `mem3.shards_db`, default
/// `"_dbs"`).
#[async_trait]
pub trait ShardMapSource: Send + Sync + 'static {
    type Feed: ChangeFeed;

    /// True if a local database literally named `name` exists (supports the
    /// Scanner's "system database" special case, spec §4.3 step 1).
    async fn local_db_exists(&self, name: &str) -> bool;

    /// Open a change feed over the shard-map database's full history.
    async fn open_feed(&self) -> Result<Self::Feed, FeedError>;

    /// The local shards (present on this node) for a given database name.
    async fn local_shards(&self, database: &str) -> Result<Vec<String>, LocalShardsError>;
}
