// SPDX-License-Identifier: AGPL-3.0-or-later
//! Local filesystem host
//!
//! Treats local paths as if they had been dropped onto a page: every path
//! becomes a transfer item whose entry is rooted at `/<name>`, and
//! directories are read through `tokio::fs` one page at a time.

use async_trait::async_trait;
use etf_core::{
    DirectoryReader, EntryKind, EntryRef, ExtractError, ExtractResult, FileHandle, FileMetadata,
    FileSystemEntry, ItemKind, ItemRef, SourceEvent, TransferItem,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{self, ReadDir};
use tracing::trace;

/// Local host configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    /// Maximum children returned by one directory read
    pub page_size: usize,
    /// Resolve symlinks; when off, symlinks are entries of unknown kind
    pub follow_symlinks: bool,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self { page_size: 100, follow_symlinks: false }
    }
}

/// An entry backed by a local path
#[derive(Debug, Clone)]
pub struct LocalEntry {
    path: PathBuf,
    name: String,
    full_path: String,
    kind: EntryKind,
    config: Arc<LocalConfig>,
}

impl LocalEntry {
    /// Entry for a dropped path, rooted at `/<file name>`
    pub async fn from_path(path: impl AsRef<Path>, config: Arc<LocalConfig>) -> ExtractResult<Self> {
        let path = path.as_ref().to_path_buf();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let full_path = if name.starts_with('/') { name.clone() } else { format!("/{name}") };
        let kind = kind_of(&path, &config).await?;
        Ok(Self { path, name, full_path, kind, config })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn child(&self, name: String, path: PathBuf, kind: EntryKind) -> Self {
        Self {
            full_path: format!("{}/{}", self.full_path.trim_end_matches('/'), name),
            name,
            path,
            kind,
            config: self.config.clone(),
        }
    }
}

async fn kind_of(path: &Path, config: &LocalConfig) -> std::io::Result<EntryKind> {
    let meta = if config.follow_symlinks {
        fs::metadata(path).await?
    } else {
        fs::symlink_metadata(path).await?
    };

    Ok(if meta.is_file() {
        EntryKind::File
    } else if meta.is_dir() {
        EntryKind::Directory
    } else {
        EntryKind::Unknown
    })
}

fn read_error(full_path: &str, err: std::io::Error) -> ExtractError {
    ExtractError::entry_read(full_path, err.to_string())
}

#[async_trait]
impl FileSystemEntry for LocalEntry {
    fn kind(&self) -> EntryKind {
        self.kind
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn full_path(&self) -> &str {
        &self.full_path
    }

    async fn materialize(&self) -> ExtractResult<FileHandle> {
        if self.kind != EntryKind::File {
            return Err(ExtractError::NotAFile(self.full_path.clone()));
        }

        let meta = fs::metadata(&self.path)
            .await
            .map_err(|e| ExtractError::file_materialize(&self.full_path, e.to_string()))?;

        let mut metadata = FileMetadata::new().with_size(meta.len());
        if let Ok(modified) = meta.modified() {
            metadata.modified = Some(modified.into());
        }
        metadata
            .custom
            .insert("local_path".to_string(), self.path.display().to_string());

        Ok(FileHandle::new(self.name.clone()).with_metadata(metadata))
    }

    fn open(&self) -> ExtractResult<Box<dyn DirectoryReader>> {
        if self.kind != EntryKind::Directory {
            return Err(ExtractError::NotADirectory(self.full_path.clone()));
        }
        Ok(Box::new(LocalReader { parent: self.clone(), read_dir: None, exhausted: false }))
    }
}

struct LocalReader {
    parent: LocalEntry,
    read_dir: Option<ReadDir>,
    exhausted: bool,
}

#[async_trait]
impl DirectoryReader for LocalReader {
    async fn read_page(&mut self) -> ExtractResult<Vec<EntryRef>> {
        if self.exhausted {
            return Ok(Vec::new());
        }

        let full_path = self.parent.full_path.clone();
        let mut read_dir = match self.read_dir.take() {
            Some(read_dir) => read_dir,
            None => fs::read_dir(&self.parent.path)
                .await
                .map_err(|e| read_error(&full_path, e))?,
        };

        let page_size = self.parent.config.page_size.max(1);
        let mut page: Vec<EntryRef> = Vec::with_capacity(page_size);
        while page.len() < page_size {
            match read_dir.next_entry().await.map_err(|e| read_error(&full_path, e))? {
                Some(dir_entry) => {
                    let path = dir_entry.path();
                    let kind = kind_of(&path, &self.parent.config)
                        .await
                        .map_err(|e| read_error(&full_path, e))?;
                    let name = dir_entry.file_name().to_string_lossy().into_owned();
                    page.push(Arc::new(self.parent.child(name, path, kind)));
                }
                None => {
                    self.exhausted = true;
                    break;
                }
            }
        }

        if !self.exhausted {
            self.read_dir = Some(read_dir);
        }
        trace!(path = %full_path, entries = page.len(), "Read local directory page");
        Ok(page)
    }
}

/// A dropped local path
pub struct LocalItem {
    file: Option<FileHandle>,
    entry: EntryRef,
}

impl LocalItem {
    /// Regular files yield a file handle directly; everything else only an entry
    pub async fn from_path(path: impl AsRef<Path>, config: Arc<LocalConfig>) -> ExtractResult<Self> {
        let entry = LocalEntry::from_path(path, config).await?;
        let file = match entry.kind() {
            EntryKind::File => Some(entry.materialize().await?),
            _ => None,
        };
        Ok(Self { file, entry: Arc::new(entry) })
    }

    pub fn into_ref(self) -> ItemRef {
        Arc::new(self)
    }
}

impl TransferItem for LocalItem {
    fn kind(&self) -> ItemKind {
        ItemKind::File
    }

    fn as_file(&self) -> Option<FileHandle> {
        self.file.clone()
    }

    fn as_entry(&self) -> Option<EntryRef> {
        Some(self.entry.clone())
    }
}

/// Build a drop event from local paths
pub async fn drop_event(paths: &[PathBuf], config: LocalConfig) -> ExtractResult<SourceEvent> {
    let config = Arc::new(config);
    let mut items = Vec::with_capacity(paths.len());
    for path in paths {
        items.push(LocalItem::from_path(path, config.clone()).await?.into_ref());
    }
    Ok(SourceEvent::dropped(items))
}

/// Build a change event from local file paths
///
/// A file input cannot select directories; any non-file path is an error.
pub async fn change_event(paths: &[PathBuf]) -> ExtractResult<SourceEvent> {
    let config = Arc::new(LocalConfig { follow_symlinks: true, ..Default::default() });
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let entry = LocalEntry::from_path(path, config.clone()).await?;
        files.push(entry.materialize().await?);
    }
    Ok(SourceEvent::change(files))
}

#[cfg(test)]
mod tests {
    use super::*;
    use etf_core::{extract, ExtractOptions, Extractor};
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    async fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.unwrap();
        }
        fs::write(path, contents).await.unwrap();
    }

    async fn sample_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.txt", "alpha").await;
        write(dir.path(), "docs/b.md", "bravo").await;
        write(dir.path(), "docs/deep/c.rs", "charlie").await;
        write(dir.path(), "docs/deep/deeper/d.json", "{}").await;
        fs::create_dir_all(dir.path().join("empty")).await.unwrap();
        dir
    }

    fn root_name(dir: &TempDir) -> String {
        dir.path().file_name().unwrap().to_string_lossy().into_owned()
    }

    fn full_paths(records: &[etf_core::ResultRecord]) -> BTreeSet<String> {
        records.iter().filter_map(|r| r.full_path().map(String::from)).collect()
    }

    #[tokio::test]
    async fn test_drop_local_directory() {
        let dir = sample_tree().await;
        let root = root_name(&dir);

        for page_size in [1, 2, 100] {
            let config = LocalConfig { page_size, ..Default::default() };
            let event = drop_event(&[dir.path().to_path_buf()], config).await.unwrap();
            let records = extract(event).await.unwrap();

            let expected: BTreeSet<String> = ["a.txt", "docs/b.md", "docs/deep/c.rs", "docs/deep/deeper/d.json"]
                .iter()
                .map(|p| format!("/{root}/{p}"))
                .collect();
            assert_eq!(full_paths(&records), expected, "page size {page_size}");
        }
    }

    #[tokio::test]
    async fn test_materialized_metadata() {
        let dir = sample_tree().await;
        let event = drop_event(&[dir.path().join("docs")], LocalConfig::default()).await.unwrap();
        let records = extract(event).await.unwrap();

        let b = records.iter().find(|r| r.name() == "b.md").unwrap();
        assert_eq!(b.full_path(), Some("/docs/b.md"));
        assert_eq!(b.file.size(), Some(5));
        assert!(b.file.metadata.modified.is_some());
        assert!(b.file.metadata.custom["local_path"].ends_with("b.md"));
    }

    #[tokio::test]
    async fn test_drop_local_file_is_direct() {
        let dir = sample_tree().await;
        let event = drop_event(&[dir.path().join("a.txt")], LocalConfig::default()).await.unwrap();

        let records = extract(event).await.unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].entry.is_none());

        let event = drop_event(&[dir.path().join("a.txt")], LocalConfig::default()).await.unwrap();
        let records = Extractor::new(ExtractOptions::default().with_attach_entries(true))
            .extract(event)
            .await
            .unwrap();
        assert_eq!(records[0].full_path(), Some("/a.txt"));
    }

    #[tokio::test]
    async fn test_change_event() {
        let dir = sample_tree().await;
        let paths = [dir.path().join("a.txt"), dir.path().join("docs/b.md")];
        let records = extract(change_event(&paths).await.unwrap()).await.unwrap();

        let names: Vec<_> = records.iter().map(|r| r.name()).collect();
        assert_eq!(names, ["a.txt", "b.md"]);
        assert!(records.iter().all(|r| r.entry.is_none()));
    }

    #[tokio::test]
    async fn test_change_event_rejects_directory() {
        let dir = sample_tree().await;
        let err = change_event(&[dir.path().join("docs")]).await.unwrap_err();
        assert!(matches!(err, ExtractError::NotAFile(_)));
    }

    #[tokio::test]
    async fn test_missing_path() {
        let dir = TempDir::new().unwrap();
        let result = drop_event(&[dir.path().join("missing")], LocalConfig::default()).await;
        assert!(matches!(result, Err(ExtractError::Io(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinks_are_skipped_unless_followed() {
        let dir = sample_tree().await;
        std::os::unix::fs::symlink(dir.path().join("a.txt"), dir.path().join("docs/link.txt")).unwrap();

        let event = drop_event(&[dir.path().join("docs")], LocalConfig::default()).await.unwrap();
        let records = extract(event).await.unwrap();
        assert!(records.iter().all(|r| r.name() != "link.txt"));

        let config = LocalConfig { follow_symlinks: true, ..Default::default() };
        let event = drop_event(&[dir.path().join("docs")], config).await.unwrap();
        let records = extract(event).await.unwrap();
        assert!(records.iter().any(|r| r.full_path() == Some("/docs/link.txt")));
    }

    #[test]
    fn test_config_partial_json() {
        let config: LocalConfig = serde_json::from_str(r#"{"follow_symlinks":true}"#).unwrap();
        assert!(config.follow_symlinks);
        assert_eq!(config.page_size, 100);

        let json = serde_json::to_string(&LocalConfig::default()).unwrap();
        assert_eq!(json, r#"{"page_size":100,"follow_symlinks":false}"#);
    }
}
