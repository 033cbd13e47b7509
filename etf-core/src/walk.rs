// SPDX-License-Identifier: AGPL-3.0-or-later
//! Entry walker
//!
//! Directories are walked with an explicit work list rather than recursion,
//! so nesting depth never grows the call stack. Each directory gets exactly
//! one reader, which is drained page by page until it returns an empty page.

use std::collections::VecDeque;
use tracing::{debug, trace};

use crate::{
    entry::{EntryKind, EntryRef},
    error::ExtractResult,
    event::ResultRecord,
    options::TraversalOrder,
};

/// Collect every file reachable from `entry`
///
/// A file entry yields itself, a directory yields all files below it and an
/// unknown entry yields nothing. Any host failure aborts the walk.
pub async fn walk_entry(entry: EntryRef, order: TraversalOrder) -> ExtractResult<Vec<ResultRecord>> {
    match entry.kind() {
        EntryKind::File => Ok(vec![materialize(entry).await?]),
        EntryKind::Directory => walk_directory(entry, order).await,
        EntryKind::Unknown => {
            trace!(path = entry.full_path(), "Skipping entry of unknown kind");
            Ok(Vec::new())
        }
    }
}

/// Walk a directory tree rooted at `root`
pub async fn walk_directory(root: EntryRef, order: TraversalOrder) -> ExtractResult<Vec<ResultRecord>> {
    let mut records = Vec::new();
    let mut pending = VecDeque::from([root]);
    let mut directories = 0usize;

    while let Some(dir) = next_pending(&mut pending, order) {
        directories += 1;
        debug!(path = dir.full_path(), "Reading directory");

        let mut reader = dir.open()?;
        loop {
            let page = reader.read_page().await?;
            if page.is_empty() {
                break;
            }
            trace!(path = dir.full_path(), entries = page.len(), "Read directory page");

            for child in page {
                match child.kind() {
                    EntryKind::File => records.push(materialize(child).await?),
                    EntryKind::Directory => pending.push_back(child),
                    EntryKind::Unknown => {
                        trace!(path = child.full_path(), "Skipping entry of unknown kind");
                    }
                }
            }
        }
    }

    debug!(files = records.len(), directories, "Directory walk complete");
    Ok(records)
}

fn next_pending(pending: &mut VecDeque<EntryRef>, order: TraversalOrder) -> Option<EntryRef> {
    match order {
        TraversalOrder::DepthFirst => pending.pop_back(),
        TraversalOrder::BreadthFirst => pending.pop_front(),
    }
}

async fn materialize(entry: EntryRef) -> ExtractResult<ResultRecord> {
    let file = entry.materialize().await?;
    Ok(ResultRecord::with_entry(file, entry))
}
