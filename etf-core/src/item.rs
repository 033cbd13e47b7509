// SPDX-License-Identifier: AGPL-3.0-or-later
//! Drop event transfer items

use std::sync::Arc;

use crate::{entry::EntryRef, file::FileHandle};

/// Transfer item kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    File,
    Other(String),
}

impl ItemKind {
    pub fn parse(kind: &str) -> Self {
        match kind {
            "file" => ItemKind::File,
            other => ItemKind::Other(other.to_string()),
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, ItemKind::File)
    }
}

/// Shared handle to a transfer item
pub type ItemRef = Arc<dyn TransferItem>;

/// One payload entry of a drop event
///
/// Both accessors are synchronous. `as_entry` is optional in some hosts;
/// the default reports it as unavailable.
pub trait TransferItem: Send + Sync {
    fn kind(&self) -> ItemKind;

    fn as_file(&self) -> Option<FileHandle>;

    fn as_entry(&self) -> Option<EntryRef> {
        None
    }
}
