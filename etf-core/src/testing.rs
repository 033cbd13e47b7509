// SPDX-License-Identifier: AGPL-3.0-or-later
//! Callback-style mock hosts shared by the unit tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::{
    entry::EntryRef,
    file::FileHandle,
    item::{ItemKind, TransferItem},
    legacy::{
        CallbackEntry, CallbackEntryAdapter, CallbackReader, CallbackRef, ErrorCallback,
        SuccessCallback,
    },
};

enum Shape {
    File(Result<FileHandle, String>),
    DelayedFile(Duration),
    Directory(Reading),
    Ambiguous,
    Unknown,
}

#[derive(Clone)]
enum Reading {
    /// Fires `ok([])` and then `ok(children)` on every call after the first
    Echo(Vec<CallbackRef>),
    Paged { children: Vec<CallbackRef>, page_size: usize },
    Failing { children: Vec<CallbackRef>, after_pages: usize, message: String },
    Abandon,
}

struct MockEntry {
    name: String,
    full_path: String,
    shape: Shape,
}

fn name_of(full_path: &str) -> String {
    full_path.rsplit('/').next().unwrap_or_default().to_string()
}

fn mock(full_path: &str, shape: Shape) -> CallbackRef {
    Arc::new(MockEntry { name: name_of(full_path), full_path: full_path.to_string(), shape })
}

impl CallbackEntry for MockEntry {
    fn is_file(&self) -> bool {
        matches!(self.shape, Shape::File(_) | Shape::DelayedFile(_) | Shape::Ambiguous)
    }

    fn is_directory(&self) -> bool {
        matches!(self.shape, Shape::Directory(_) | Shape::Ambiguous)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn full_path(&self) -> &str {
        &self.full_path
    }

    fn file(&self, mut on_success: SuccessCallback<FileHandle>, mut on_error: ErrorCallback) {
        match &self.shape {
            Shape::File(Ok(file)) => on_success(file.clone()),
            Shape::File(Err(message)) => on_error(message.clone()),
            Shape::DelayedFile(delay) => {
                let delay = *delay;
                let file = FileHandle::new(self.name.clone());
                std::thread::spawn(move || {
                    std::thread::sleep(delay);
                    on_success(file);
                });
            }
            Shape::Ambiguous => on_success(FileHandle::new(self.name.clone())),
            _ => on_error("TypeMismatchError".into()),
        }
    }

    fn create_reader(&self) -> Option<Box<dyn CallbackReader>> {
        match &self.shape {
            Shape::Directory(reading) => {
                Some(Box::new(MockReader { reading: reading.clone(), calls: 0 }))
            }
            _ => None,
        }
    }
}

struct MockReader {
    reading: Reading,
    calls: usize,
}

impl CallbackReader for MockReader {
    fn read_entries(
        &mut self,
        mut on_success: SuccessCallback<Vec<CallbackRef>>,
        mut on_error: ErrorCallback,
    ) {
        let call = self.calls;
        self.calls += 1;
        match &self.reading {
            Reading::Echo(children) => {
                if call > 0 {
                    on_success(Vec::new());
                }
                on_success(children.clone());
            }
            Reading::Paged { children, page_size } => {
                let start = (call * page_size).min(children.len());
                let end = (start + page_size).min(children.len());
                on_success(children[start..end].to_vec());
            }
            Reading::Failing { children, after_pages, message } => {
                if call >= *after_pages {
                    on_error(message.clone());
                } else {
                    on_success(children.clone());
                }
            }
            Reading::Abandon => {}
        }
    }
}

pub(crate) fn callback_file(full_path: &str) -> CallbackRef {
    mock(full_path, Shape::File(Ok(FileHandle::new(name_of(full_path)))))
}

pub(crate) fn callback_failing_file(full_path: &str, message: &str) -> CallbackRef {
    mock(full_path, Shape::File(Err(message.to_string())))
}

pub(crate) fn callback_delayed_file(full_path: &str, delay: Duration) -> CallbackRef {
    mock(full_path, Shape::DelayedFile(delay))
}

pub(crate) fn callback_dir(full_path: &str, children: Vec<CallbackRef>) -> CallbackRef {
    mock(full_path, Shape::Directory(Reading::Echo(children)))
}

pub(crate) fn callback_paged_dir(
    full_path: &str,
    children: Vec<CallbackRef>,
    page_size: usize,
) -> CallbackRef {
    mock(full_path, Shape::Directory(Reading::Paged { children, page_size }))
}

pub(crate) fn callback_failing_dir(
    full_path: &str,
    children: Vec<CallbackRef>,
    after_pages: usize,
    message: &str,
) -> CallbackRef {
    mock(
        full_path,
        Shape::Directory(Reading::Failing {
            children,
            after_pages,
            message: message.to_string(),
        }),
    )
}

pub(crate) fn callback_abandoning_dir(full_path: &str) -> CallbackRef {
    mock(full_path, Shape::Directory(Reading::Abandon))
}

pub(crate) fn callback_ambiguous(full_path: &str) -> CallbackRef {
    mock(full_path, Shape::Ambiguous)
}

pub(crate) fn callback_unknown(full_path: &str) -> CallbackRef {
    mock(full_path, Shape::Unknown)
}

pub(crate) fn file_entry(full_path: &str) -> EntryRef {
    CallbackEntryAdapter::wrap(callback_file(full_path))
}

/// Drop item with configurable accessors
pub(crate) struct MockItem {
    kind: ItemKind,
    file: Option<FileHandle>,
    entry: Option<EntryRef>,
    entry_calls: AtomicUsize,
}

impl MockItem {
    fn new(kind: ItemKind, file: Option<FileHandle>, entry: Option<EntryRef>) -> Self {
        Self { kind, file, entry, entry_calls: AtomicUsize::new(0) }
    }

    pub(crate) fn file(name: &str) -> Self {
        Self::new(ItemKind::File, Some(FileHandle::new(name)), None)
    }

    pub(crate) fn entry(entry: CallbackRef) -> Self {
        Self::new(ItemKind::File, None, Some(CallbackEntryAdapter::wrap(entry)))
    }

    pub(crate) fn both(name: &str, entry: CallbackRef) -> Self {
        Self::new(
            ItemKind::File,
            Some(FileHandle::new(name)),
            Some(CallbackEntryAdapter::wrap(entry)),
        )
    }

    pub(crate) fn empty() -> Self {
        Self::new(ItemKind::File, None, None)
    }

    pub(crate) fn other(kind: &str) -> Self {
        Self::new(ItemKind::parse(kind), Some(FileHandle::new("ignored")), None)
    }

    pub(crate) fn entry_calls(&self) -> usize {
        self.entry_calls.load(Ordering::SeqCst)
    }
}

impl TransferItem for MockItem {
    fn kind(&self) -> ItemKind {
        self.kind.clone()
    }

    fn as_file(&self) -> Option<FileHandle> {
        self.file.clone()
    }

    fn as_entry(&self) -> Option<EntryRef> {
        self.entry_calls.fetch_add(1, Ordering::SeqCst);
        self.entry.clone()
    }
}
