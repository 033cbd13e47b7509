// SPDX-License-Identifier: AGPL-3.0-or-later
//! File-system entries offered by a drop event

use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    error::{ExtractError, ExtractResult},
    file::FileHandle,
};

/// Entry kind
///
/// An entry that is neither a file nor a directory is `Unknown` and
/// contributes no files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Unknown,
}

/// Shared handle to a host entry
pub type EntryRef = Arc<dyn FileSystemEntry>;

/// A file or directory in a dropped tree
#[async_trait]
pub trait FileSystemEntry: Send + Sync {
    fn kind(&self) -> EntryKind;
    fn name(&self) -> &str;

    /// Path of the entry relative to the drop root, as reported by the host
    fn full_path(&self) -> &str;

    fn is_file(&self) -> bool {
        self.kind() == EntryKind::File
    }

    fn is_directory(&self) -> bool {
        self.kind() == EntryKind::Directory
    }

    /// Resolve a file entry into a concrete file handle
    async fn materialize(&self) -> ExtractResult<FileHandle> {
        Err(ExtractError::NotAFile(self.full_path().to_string()))
    }

    /// Open a fresh reader over a directory entry's children
    ///
    /// Readers start from the first page; they are never shared between walks.
    fn open(&self) -> ExtractResult<Box<dyn DirectoryReader>> {
        Err(ExtractError::NotADirectory(self.full_path().to_string()))
    }
}

/// Paged reader over one directory
#[async_trait]
pub trait DirectoryReader: Send {
    /// Return the next page of children; an empty page ends the directory
    async fn read_page(&mut self) -> ExtractResult<Vec<EntryRef>>;
}
