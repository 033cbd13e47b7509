// SPDX-License-Identifier: AGPL-3.0-or-later
//! Extraction options

use serde::{Deserialize, Serialize};

/// What to do with events that are neither `change` nor `drop`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnknownEventPolicy {
    /// Return no files
    #[default]
    Ignore,
    /// Fail with `ExtractError::UnsupportedEvent`
    Reject,
}

/// Order in which pending directories are visited
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraversalOrder {
    /// Last discovered directory first
    #[default]
    DepthFirst,
    /// First discovered directory first
    BreadthFirst,
}

/// Options for an `Extractor`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOptions {
    pub unknown_events: UnknownEventPolicy,
    /// Attach a file entry to files obtained directly from a drop item
    pub attach_entries: bool,
    pub order: TraversalOrder,
}

impl ExtractOptions {
    pub fn strict() -> Self {
        Self { unknown_events: UnknownEventPolicy::Reject, ..Default::default() }
    }

    pub fn with_attach_entries(mut self, attach: bool) -> Self {
        self.attach_entries = attach;
        self
    }

    pub fn with_order(mut self, order: TraversalOrder) -> Self {
        self.order = order;
        self
    }
}
