// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The cluster event bus: per-database `created`/`deleted`/`updated`
//! notifications.

use async_trait::async_trait;
use scf_core::BusEvent;
use thiserror::Error;

/// Errors subscribing to the event bus.
#[derive(Debug, Error)]
pub enum BusError {
    #[error("event bus subscribe failed: {0}")]
    SubscribeFailed(String),
}

/// A live subscription to the event bus.
#[async_trait]
pub trait EventSubscription: Send {
    /// Await the next notification. `None` signals the bus process died —
    /// the Supervisor treats this as fatal (`ShutdownReason::EventBusDied`).
    async fn recv(&mut self) -> Option<BusEvent>;
}

/// The cluster-wide event bus.
#[async_trait]
pub trait EventBusSource: Send + Sync + 'static {
    type Subscription: EventSubscription;

    async fn subscribe(&self) -> Result<Self::Subscription, BusError>;
}
