// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Change-feed row shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Prefix marking a document as a design document (used to store views,
/// optionally filtered out of the `db_change` callback stream).
pub const DESIGN_DOC_PREFIX: &str = "_design/";

/// A single row delivered by the change feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRow {
    pub id: String,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub doc: Option<Value>,
}

impl ChangeRow {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), deleted: false, doc: None }
    }

    pub fn deleted(mut self) -> Self {
        self.deleted = true;
        self
    }

    pub fn is_design_doc(&self) -> bool {
        self.id.starts_with(DESIGN_DOC_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn design_doc_detection() {
        assert!(ChangeRow::new("_design/x").is_design_doc());
        assert!(!ChangeRow::new("doc1").is_design_doc());
    }
}
