// SPDX-License-Identifier: AGPL-3.0-or-later
//! Event dispatch and item resolution

use futures::future::try_join_all;
use tracing::{debug, trace};

use crate::{
    error::{ExtractError, ExtractResult},
    event::{ResultRecord, SourceEvent},
    item::{ItemRef, TransferItem},
    options::{ExtractOptions, UnknownEventPolicy},
    walk::walk_entry,
};

/// Extract files from `event` with default options
pub async fn extract(event: SourceEvent) -> ExtractResult<Vec<ResultRecord>> {
    Extractor::default().extract(event).await
}

/// File extractor
///
/// Holds no state between calls; every extraction builds its work lists
/// from scratch.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    options: ExtractOptions,
}

impl Extractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Return the files carried by `event`
    ///
    /// Drop items are resolved concurrently and their files concatenated in
    /// item order. The first host failure fails the whole call and no partial
    /// result is returned.
    pub async fn extract(&self, event: SourceEvent) -> ExtractResult<Vec<ResultRecord>> {
        match event {
            SourceEvent::Change { files } => {
                let files = files.unwrap_or_default();
                debug!(files = files.len(), "Extracting files from change event");
                Ok(files.into_iter().map(ResultRecord::new).collect())
            }
            SourceEvent::Drop { items } => {
                let items = items.unwrap_or_default();
                debug!(items = items.len(), "Extracting files from drop event");
                self.extract_items(&items).await
            }
            SourceEvent::Unrecognized { kind } => match self.options.unknown_events {
                UnknownEventPolicy::Ignore => {
                    debug!(kind = %kind, "Ignoring unsupported event");
                    Ok(Vec::new())
                }
                UnknownEventPolicy::Reject => Err(ExtractError::UnsupportedEvent(kind)),
            },
        }
    }

    async fn extract_items(&self, items: &[ItemRef]) -> ExtractResult<Vec<ResultRecord>> {
        let resolutions = items
            .iter()
            .filter(|item| item.kind().is_file())
            .map(|item| self.resolve_item(item.as_ref()));

        let per_item = try_join_all(resolutions).await?;
        Ok(per_item.into_iter().flatten().collect())
    }

    /// Resolve one drop item into files
    ///
    /// A file handle obtained directly wins and the item's entry is not
    /// consulted unless `attach_entries` is set. Otherwise the item's entry,
    /// if any, is walked.
    pub async fn resolve_item(&self, item: &dyn TransferItem) -> ExtractResult<Vec<ResultRecord>> {
        if let Some(file) = item.as_file() {
            let mut record = ResultRecord::new(file);
            if self.options.attach_entries {
                record.entry = item.as_entry().filter(|entry| entry.is_file());
            }
            trace!(name = record.name(), "Resolved item to file");
            return Ok(vec![record]);
        }

        match item.as_entry() {
            Some(entry) => walk_entry(entry, self.options.order).await,
            None => {
                trace!("Item has neither a file nor an entry");
                Ok(Vec::new())
            }
        }
    }
}
