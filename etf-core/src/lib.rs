// SPDX-License-Identifier: AGPL-3.0-or-later
//! Event to Files Core
//!
//! Extracts file handles from file-input `change` events and drag-and-drop
//! `drop` events. Dropped directories are walked through the host's paged
//! directory readers, one reader per directory, until every file has been
//! materialized.
//!
//! Host environments plug in through the traits in [`entry`] and [`item`],
//! or through the callback-pair contract in [`legacy`].

pub mod entry;
pub mod error;
pub mod event;
pub mod extract;
pub mod file;
pub mod item;
pub mod legacy;
pub mod options;
pub mod walk;

#[cfg(test)]
pub(crate) mod testing;

pub use entry::{DirectoryReader, EntryKind, EntryRef, FileSystemEntry};
pub use error::{ExtractError, ExtractResult};
pub use event::{RecordSummary, ResultRecord, SourceEvent};
pub use extract::{extract, Extractor};
pub use file::{FileHandle, FileMetadata};
pub use item::{ItemKind, ItemRef, TransferItem};
pub use options::{ExtractOptions, TraversalOrder, UnknownEventPolicy};
