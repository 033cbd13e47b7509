// SPDX-License-Identifier: AGPL-3.0-or-later
//! Source events and extraction results

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    entry::EntryRef,
    file::{FileHandle, FileMetadata},
    item::ItemRef,
};

/// An event that may carry files
pub enum SourceEvent {
    /// File input `change`; `files` is absent when the input has no file list
    Change { files: Option<Vec<FileHandle>> },
    /// Drag-and-drop `drop`; `items` is absent when there is no data transfer
    Drop { items: Option<Vec<ItemRef>> },
    /// Any other event type
    Unrecognized { kind: String },
}

impl SourceEvent {
    pub fn change(files: Vec<FileHandle>) -> Self {
        SourceEvent::Change { files: Some(files) }
    }

    pub fn dropped(items: Vec<ItemRef>) -> Self {
        SourceEvent::Drop { items: Some(items) }
    }

    pub fn unrecognized(kind: impl Into<String>) -> Self {
        SourceEvent::Unrecognized { kind: kind.into() }
    }

    pub fn kind(&self) -> &str {
        match self {
            SourceEvent::Change { .. } => "change",
            SourceEvent::Drop { .. } => "drop",
            SourceEvent::Unrecognized { kind } => kind,
        }
    }
}

impl fmt::Debug for SourceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceEvent::Change { files } => f
                .debug_struct("Change")
                .field("files", &files.as_ref().map(Vec::len))
                .finish(),
            SourceEvent::Drop { items } => f
                .debug_struct("Drop")
                .field("items", &items.as_ref().map(Vec::len))
                .finish(),
            SourceEvent::Unrecognized { kind } => {
                f.debug_struct("Unrecognized").field("kind", kind).finish()
            }
        }
    }
}

/// One extracted file
///
/// `entry` is set only when the file was reached through a file-system
/// entry, e.g. for files inside a dropped directory.
#[derive(Clone)]
pub struct ResultRecord {
    pub file: FileHandle,
    pub entry: Option<EntryRef>,
}

impl ResultRecord {
    pub fn new(file: FileHandle) -> Self {
        Self { file, entry: None }
    }

    pub fn with_entry(file: FileHandle, entry: EntryRef) -> Self {
        Self { file, entry: Some(entry) }
    }

    pub fn name(&self) -> &str {
        self.file.name()
    }

    pub fn full_path(&self) -> Option<&str> {
        self.entry.as_ref().map(|entry| entry.full_path())
    }

    pub fn summary(&self) -> RecordSummary {
        RecordSummary {
            name: self.file.name.clone(),
            full_path: self.full_path().map(String::from),
            metadata: self.file.metadata.clone(),
        }
    }
}

impl fmt::Debug for ResultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultRecord")
            .field("file", &self.file)
            .field("entry", &self.full_path())
            .finish()
    }
}

/// Serializable view of a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_path: Option<String>,
    pub metadata: FileMetadata,
}
