// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cluster event-bus notifications.

/// Per-database lifecycle notification kinds published by the cluster event
/// bus. Anything the bus emits that isn't one of the three known kinds is
/// `Other` and is ignored by the Supervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusEventKind {
    Created,
    Deleted,
    Updated,
    Other(String),
}

/// A single event-bus notification for one database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusEvent {
    pub database: String,
    pub kind: BusEventKind,
}

impl BusEvent {
    pub fn created(database: impl Into<String>) -> Self {
        Self { database: database.into(), kind: BusEventKind::Created }
    }

    pub fn deleted(database: impl Into<String>) -> Self {
        Self { database: database.into(), kind: BusEventKind::Deleted }
    }

    pub fn updated(database: impl Into<String>) -> Self {
        Self { database: database.into(), kind: BusEventKind::Updated }
    }
}
