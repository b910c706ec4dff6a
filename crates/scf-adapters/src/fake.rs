// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory test doubles for the four external collaborators, in the style
//! of the teacher's `FakeAgentAdapter` / `FakeClock`: deterministic,
//! inspectable, and safe to drive from `#[tokio::test]`.

use crate::callback::CallbackModule;
use crate::change_feed::{ChangeFeed, ChangeFeedSource, FeedError, Frame};
use crate::event_bus::{BusError, EventBusSource, EventSubscription};
use crate::random::RandomSource;
use crate::shard_map::{LocalShardsError, ShardMapSource};
use async_trait::async_trait;
use parking_lot::Mutex;
use scf_core::{BusEvent, ChangeRow, Sequence};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{mpsc, Notify};

/// A scripted change feed: a fixed list of frames, replayed in order.
///
/// When the script is exhausted without a `Frame::Stop`, `next_frame` parks
/// forever rather than returning an error — tests that want a feed to "hang"
/// (e.g. to keep a worker alive while exercising rescan coalescing) simply
/// omit the terminal frame.
pub struct ScriptedFeed {
    frames: VecDeque<Frame>,
    parked: Arc<Notify>,
}

#[async_trait]
impl ChangeFeed for ScriptedFeed {
    async fn next_frame(&mut self) -> Result<Frame, FeedError> {
        match self.frames.pop_front() {
            Some(frame) => Ok(frame),
            None => {
                self.parked.notified().await;
                unreachable!("fake feed parked notifier is never fired")
            }
        }
    }
}

/// Records each `open()` call and hands back a pre-programmed
/// [`ScriptedFeed`] per shard.
#[derive(Clone, Default)]
pub struct FakeChangeFeedSource {
    programmed: Arc<Mutex<HashMap<String, VecDeque<Vec<Frame>>>>>,
    opens: Arc<Mutex<Vec<(String, Sequence)>>>,
}

impl FakeChangeFeedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the frames the next `open()` for `shard` will replay.
    pub fn program(&self, shard: impl Into<String>, frames: Vec<Frame>) {
        self.programmed.lock().entry(shard.into()).or_default().push_back(frames);
    }

    /// `(shard, since)` for every `open()` call made so far, in order.
    pub fn opens(&self) -> Vec<(String, Sequence)> {
        self.opens.lock().clone()
    }
}

#[async_trait]
impl ChangeFeedSource for FakeChangeFeedSource {
    type Feed = ScriptedFeed;

    async fn open(&self, shard: &str, since: Sequence) -> Result<Self::Feed, FeedError> {
        self.opens.lock().push((shard.to_string(), since));
        let frames = self
            .programmed
            .lock()
            .get_mut(shard)
            .and_then(|scripts| scripts.pop_front())
            .unwrap_or_default();
        Ok(ScriptedFeed { frames: frames.into(), parked: Arc::new(Notify::new()) })
    }
}

/// A controllable event-bus subscription backed by an mpsc channel.
pub struct FakeEventSubscription {
    rx: mpsc::UnboundedReceiver<BusEvent>,
}

#[async_trait]
impl EventSubscription for FakeEventSubscription {
    async fn recv(&mut self) -> Option<BusEvent> {
        self.rx.recv().await
    }
}

/// Hands out one live subscription; `kill()` closes it, simulating the bus
/// process dying.
#[derive(Clone)]
pub struct FakeEventBusSource {
    tx: Arc<Mutex<Option<mpsc::UnboundedSender<BusEvent>>>>,
}

impl FakeEventBusSource {
    pub fn new() -> Self {
        Self { tx: Arc::new(Mutex::new(None)) }
    }

    pub fn publish(&self, event: BusEvent) {
        if let Some(tx) = self.tx.lock().as_ref() {
            let _ = tx.send(event);
        }
    }

    /// Simulate the event-bus process dying.
    pub fn kill(&self) {
        self.tx.lock().take();
    }
}

impl Default for FakeEventBusSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventBusSource for FakeEventBusSource {
    type Subscription = FakeEventSubscription;

    async fn subscribe(&self) -> Result<Self::Subscription, BusError> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.tx.lock() = Some(tx);
        Ok(FakeEventSubscription { rx })
    }
}

/// An in-memory shard map: a fixed set of local databases and their local
/// shards, plus a scripted feed over the shard-map database's history.
#[derive(Clone, Default)]
pub struct FakeShardMapSource {
    local_dbs: Arc<Mutex<Vec<String>>>,
    local_shards: Arc<Mutex<HashMap<String, Vec<String>>>>,
    feed: Arc<Mutex<Vec<Frame>>>,
}

impl FakeShardMapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_local_db(self, name: impl Into<String>) -> Self {
        self.local_dbs.lock().push(name.into());
        self
    }

    pub fn with_local_shards(self, database: impl Into<String>, shards: Vec<String>) -> Self {
        self.local_shards.lock().insert(database.into(), shards);
        self
    }

    pub fn with_feed_rows(self, rows: Vec<Frame>) -> Self {
        *self.feed.lock() = rows;
        self
    }
}

#[async_trait]
impl ShardMapSource for FakeShardMapSource {
    type Feed = ScriptedFeed;

    async fn local_db_exists(&self, name: &str) -> bool {
        self.local_dbs.lock().iter().any(|d| d == name)
    }

    async fn open_feed(&self) -> Result<Self::Feed, FeedError> {
        let mut frames: VecDeque<Frame> = self.feed.lock().clone().into();
        frames.push_back(Frame::Stop(Sequence::zero()));
        Ok(ScriptedFeed { frames, parked: Arc::new(Notify::new()) })
    }

    async fn local_shards(&self, database: &str) -> Result<Vec<String>, LocalShardsError> {
        self.local_shards
            .lock()
            .get(database)
            .cloned()
            .ok_or_else(|| LocalShardsError::DatabaseDoesNotExist(database.to_string()))
    }
}

/// Records every callback invocation and threads a simple counter context.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackCall {
    Found(String),
    Created(String),
    Deleted(String),
    Change(String, ChangeRow),
}

#[derive(Clone, Default)]
pub struct FakeCallbackModule {
    calls: Arc<Mutex<Vec<CallbackCall>>>,
}

impl FakeCallbackModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<CallbackCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl CallbackModule for FakeCallbackModule {
    type Context = u64;

    async fn db_created(&self, shard: &str, ctx: Self::Context) -> Self::Context {
        self.calls.lock().push(CallbackCall::Created(shard.to_string()));
        ctx + 1
    }

    async fn db_deleted(&self, shard: &str, ctx: Self::Context) -> Self::Context {
        self.calls.lock().push(CallbackCall::Deleted(shard.to_string()));
        ctx + 1
    }

    async fn db_found(&self, shard: &str, ctx: Self::Context) -> Self::Context {
        self.calls.lock().push(CallbackCall::Found(shard.to_string()));
        ctx + 1
    }

    async fn db_change(&self, shard: &str, row: &ChangeRow, ctx: Self::Context) -> Self::Context {
        self.calls.lock().push(CallbackCall::Change(shard.to_string(), row.clone()));
        ctx + 1
    }
}

/// A deterministic `RandomSource` that always returns the low end of the
/// range, so jitter-driven tests don't need to wait out real delays.
#[derive(Debug, Default, Clone, Copy)]
pub struct FakeRandomSource;

impl RandomSource for FakeRandomSource {
    fn uniform(&self, lo: u64, _hi: u64) -> u64 {
        lo
    }
}
