// SPDX-License-Identifier: AGPL-3.0-or-later
//! Callback-pair host contract
//!
//! Browser-style hosts report completion through a success callback and an
//! error callback instead of returning a future. [`settle`] adapts one such
//! call into a single-settlement future: the first callback to fire wins and
//! any later call of either callback is ignored.
//!
//! [`CallbackEntry`] and [`CallbackReader`] mirror that host shape;
//! [`CallbackEntryAdapter`] lifts them into [`FileSystemEntry`] so the
//! walker never sees a callback.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::warn;

use crate::{
    entry::{DirectoryReader, EntryKind, EntryRef, FileSystemEntry},
    error::{ExtractError, ExtractResult},
    file::FileHandle,
};

pub type SuccessCallback<T> = Box<dyn FnMut(T) + Send>;
pub type ErrorCallback = Box<dyn FnMut(String) + Send>;

type Slot<T> = Arc<Mutex<Option<oneshot::Sender<Result<T, String>>>>>;

/// Run a callback-pair operation and wait for its first outcome
///
/// `start` receives both callbacks and hands them to the host. A host error
/// message is turned into an `ExtractError` by `fail`. If the host drops both
/// callbacks without calling either, the result is
/// `ExtractError::CallbackDropped`.
pub async fn settle<T, S, E>(operation: &str, start: S, fail: E) -> ExtractResult<T>
where
    T: Send + 'static,
    S: FnOnce(SuccessCallback<T>, ErrorCallback) + Send,
    E: FnOnce(String) -> ExtractError + Send,
{
    let (tx, rx) = oneshot::channel();
    let slot: Slot<T> = Arc::new(Mutex::new(Some(tx)));

    let on_success: SuccessCallback<T> = {
        let slot = slot.clone();
        let operation = operation.to_string();
        Box::new(move |value: T| deliver(&slot, &operation, Ok(value)))
    };
    // The last handle on the slot moves into the error callback so the sender
    // only lives as long as the host keeps a callback.
    let on_error: ErrorCallback = {
        let operation = operation.to_string();
        Box::new(move |message: String| deliver(&slot, &operation, Err(message)))
    };

    start(on_success, on_error);

    match rx.await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(message)) => Err(fail(message)),
        Err(_) => Err(ExtractError::CallbackDropped(operation.to_string())),
    }
}

fn deliver<T>(slot: &Slot<T>, operation: &str, outcome: Result<T, String>) {
    let sender = slot.lock().take();
    match sender {
        Some(sender) => {
            // Receiver is gone once the caller stopped waiting.
            let _ = sender.send(outcome);
        }
        None => warn!(operation = %operation, "Ignoring callback fired after settlement"),
    }
}

/// Shared handle to a callback-style entry
pub type CallbackRef = Arc<dyn CallbackEntry>;

/// Host entry that completes through callback pairs
pub trait CallbackEntry: Send + Sync {
    fn is_file(&self) -> bool;
    fn is_directory(&self) -> bool;
    fn name(&self) -> &str;
    fn full_path(&self) -> &str;

    fn file(&self, _on_success: SuccessCallback<FileHandle>, mut on_error: ErrorCallback) {
        on_error(format!("{} is not a file", self.full_path()));
    }

    fn create_reader(&self) -> Option<Box<dyn CallbackReader>> {
        None
    }
}

/// Host directory reader that completes through callback pairs
pub trait CallbackReader: Send {
    fn read_entries(
        &mut self,
        on_success: SuccessCallback<Vec<CallbackRef>>,
        on_error: ErrorCallback,
    );
}

/// [`FileSystemEntry`] over a [`CallbackEntry`]
pub struct CallbackEntryAdapter {
    inner: CallbackRef,
}

impl CallbackEntryAdapter {
    pub fn new(inner: CallbackRef) -> Self {
        Self { inner }
    }

    pub fn wrap(inner: CallbackRef) -> EntryRef {
        Arc::new(Self::new(inner))
    }
}

#[async_trait]
impl FileSystemEntry for CallbackEntryAdapter {
    fn kind(&self) -> EntryKind {
        if self.inner.is_file() {
            EntryKind::File
        } else if self.inner.is_directory() {
            EntryKind::Directory
        } else {
            EntryKind::Unknown
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn full_path(&self) -> &str {
        self.inner.full_path()
    }

    async fn materialize(&self) -> ExtractResult<FileHandle> {
        let path = self.inner.full_path().to_string();
        let inner = &self.inner;
        settle(
            "file",
            |on_success, on_error| inner.file(on_success, on_error),
            move |message| ExtractError::file_materialize(path, message),
        )
        .await
    }

    fn open(&self) -> ExtractResult<Box<dyn DirectoryReader>> {
        let reader = self
            .inner
            .create_reader()
            .ok_or_else(|| ExtractError::NotADirectory(self.full_path().to_string()))?;
        Ok(Box::new(CallbackReaderAdapter {
            path: self.full_path().to_string(),
            inner: reader,
        }))
    }
}

/// [`DirectoryReader`] over a [`CallbackReader`]
pub struct CallbackReaderAdapter {
    path: String,
    inner: Box<dyn CallbackReader>,
}

#[async_trait]
impl DirectoryReader for CallbackReaderAdapter {
    async fn read_page(&mut self) -> ExtractResult<Vec<EntryRef>> {
        let path = self.path.clone();
        let inner = &mut self.inner;
        let page = settle(
            "readEntries",
            |on_success, on_error| inner.read_entries(on_success, on_error),
            move |message| ExtractError::entry_read(path, message),
        )
        .await?;
        Ok(page.into_iter().map(CallbackEntryAdapter::wrap).collect())
    }
}
