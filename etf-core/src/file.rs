// SPDX-License-Identifier: AGPL-3.0-or-later
//! File handles produced by the host

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Host-reported file metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub size: Option<u64>,
    pub modified: Option<DateTime<Utc>>,
    pub mime_type: Option<String>,
    pub custom: HashMap<String, String>,
}

impl FileMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_modified(mut self, modified: DateTime<Utc>) -> Self {
        self.modified = Some(modified);
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// A concrete file handle
///
/// Opaque to the extractor: it is passed through to the result unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    pub name: String,
    pub metadata: FileMetadata,
}

impl FileHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), metadata: FileMetadata::new() }
    }

    pub fn with_metadata(mut self, metadata: FileMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> Option<u64> {
        self.metadata.size
    }
}
