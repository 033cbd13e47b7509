// SPDX-License-Identifier: AGPL-3.0-or-later
//! In-memory host
//!
//! Builds dropped trees in memory. Directory readers hand out children in
//! fixed-size pages and can be told to fail on a given page; file entries can
//! be told to fail materialization.

use async_trait::async_trait;
use etf_core::{
    DirectoryReader, EntryKind, EntryRef, ExtractError, ExtractResult, FileHandle, FileMetadata,
    FileSystemEntry, ItemKind, ItemRef, SourceEvent, TransferItem,
};
use std::sync::Arc;

/// Default number of children per directory page
pub const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone)]
enum Node {
    File {
        file: FileHandle,
        failure: Option<String>,
    },
    Directory {
        children: Vec<Arc<MemoryEntry>>,
        page_size: usize,
        failure: Option<(usize, String)>,
    },
    Unknown,
}

/// A file, directory or unknown entry held in memory
#[derive(Debug, Clone)]
pub struct MemoryEntry {
    name: String,
    full_path: String,
    node: Node,
}

impl MemoryEntry {
    pub fn file(full_path: impl Into<String>, metadata: FileMetadata) -> Self {
        let full_path = full_path.into();
        let name = name_of(&full_path);
        let file = FileHandle::new(name.clone()).with_metadata(metadata);
        Self { name, full_path, node: Node::File { file, failure: None } }
    }

    pub fn directory(full_path: impl Into<String>, children: Vec<MemoryEntry>) -> Self {
        let full_path = full_path.into();
        Self {
            name: name_of(&full_path),
            full_path,
            node: Node::Directory {
                children: children.into_iter().map(Arc::new).collect(),
                page_size: DEFAULT_PAGE_SIZE,
                failure: None,
            },
        }
    }

    pub fn unknown(full_path: impl Into<String>) -> Self {
        let full_path = full_path.into();
        Self { name: name_of(&full_path), full_path, node: Node::Unknown }
    }

    /// Serve children `page_size` at a time (directories only, minimum 1)
    pub fn with_page_size(mut self, size: usize) -> Self {
        if let Node::Directory { page_size, .. } = &mut self.node {
            *page_size = size.max(1);
        }
        self
    }

    /// Fail materialization with `message` (files only)
    pub fn failing_materialize(mut self, message: impl Into<String>) -> Self {
        if let Node::File { failure, .. } = &mut self.node {
            *failure = Some(message.into());
        }
        self
    }

    /// Fail the read of page `page` (zero-based) with `message` (directories only)
    pub fn failing_read_at(mut self, page: usize, message: impl Into<String>) -> Self {
        if let Node::Directory { failure, .. } = &mut self.node {
            *failure = Some((page, message.into()));
        }
        self
    }

    pub fn into_ref(self) -> EntryRef {
        Arc::new(self)
    }

    /// Full paths of every file in this tree
    pub fn file_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        let mut pending = vec![self];
        while let Some(entry) = pending.pop() {
            match &entry.node {
                Node::File { .. } => paths.push(entry.full_path.clone()),
                Node::Directory { children, .. } => {
                    pending.extend(children.iter().map(|child| &**child))
                }
                Node::Unknown => {}
            }
        }
        paths
    }
}

fn name_of(full_path: &str) -> String {
    full_path.rsplit('/').next().unwrap_or_default().to_string()
}

#[async_trait]
impl FileSystemEntry for MemoryEntry {
    fn kind(&self) -> EntryKind {
        match self.node {
            Node::File { .. } => EntryKind::File,
            Node::Directory { .. } => EntryKind::Directory,
            Node::Unknown => EntryKind::Unknown,
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn full_path(&self) -> &str {
        &self.full_path
    }

    async fn materialize(&self) -> ExtractResult<FileHandle> {
        match &self.node {
            Node::File { failure: Some(message), .. } => {
                Err(ExtractError::file_materialize(&self.full_path, message.as_str()))
            }
            Node::File { file, .. } => Ok(file.clone()),
            _ => Err(ExtractError::NotAFile(self.full_path.clone())),
        }
    }

    fn open(&self) -> ExtractResult<Box<dyn DirectoryReader>> {
        match &self.node {
            Node::Directory { children, page_size, failure } => Ok(Box::new(MemoryReader {
                path: self.full_path.clone(),
                children: children.clone(),
                page_size: *page_size,
                failure: failure.clone(),
                cursor: 0,
                pages: 0,
            })),
            _ => Err(ExtractError::NotADirectory(self.full_path.clone())),
        }
    }
}

struct MemoryReader {
    path: String,
    children: Vec<Arc<MemoryEntry>>,
    page_size: usize,
    failure: Option<(usize, String)>,
    cursor: usize,
    pages: usize,
}

#[async_trait]
impl DirectoryReader for MemoryReader {
    async fn read_page(&mut self) -> ExtractResult<Vec<EntryRef>> {
        let page = self.pages;
        self.pages += 1;

        if let Some((fail_at, message)) = &self.failure {
            if *fail_at == page {
                return Err(ExtractError::entry_read(&self.path, message.as_str()));
            }
        }

        let end = (self.cursor + self.page_size).min(self.children.len());
        let entries = self.children[self.cursor..end]
            .iter()
            .map(|child| child.clone() as EntryRef)
            .collect();
        self.cursor = end;
        Ok(entries)
    }
}

/// A drop item held in memory
pub struct MemoryItem {
    kind: ItemKind,
    file: Option<FileHandle>,
    entry: Option<EntryRef>,
}

impl MemoryItem {
    /// Item that yields `file` directly
    pub fn file(file: FileHandle) -> Self {
        Self { kind: ItemKind::File, file: Some(file), entry: None }
    }

    /// Item that only yields an entry
    pub fn entry(entry: MemoryEntry) -> Self {
        Self { kind: ItemKind::File, file: None, entry: Some(entry.into_ref()) }
    }

    /// Item that yields both a file and an entry
    pub fn both(file: FileHandle, entry: MemoryEntry) -> Self {
        Self { kind: ItemKind::File, file: Some(file), entry: Some(entry.into_ref()) }
    }

    /// Non-file item, e.g. a dragged string
    pub fn other(kind: impl Into<String>) -> Self {
        Self { kind: ItemKind::Other(kind.into()), file: None, entry: None }
    }

    pub fn into_ref(self) -> ItemRef {
        Arc::new(self)
    }
}

impl TransferItem for MemoryItem {
    fn kind(&self) -> ItemKind {
        self.kind.clone()
    }

    fn as_file(&self) -> Option<FileHandle> {
        self.file.clone()
    }

    fn as_entry(&self) -> Option<EntryRef> {
        self.entry.clone()
    }
}

/// Build a drop event from in-memory items
pub fn drop_event(items: Vec<MemoryItem>) -> SourceEvent {
    SourceEvent::dropped(items.into_iter().map(MemoryItem::into_ref).collect())
}
