// SPDX-License-Identifier: AGPL-3.0-or-later
//! Host adapters for event-to-files
//!
//! - `memory`: in-memory trees with configurable paging and failure injection
//! - `local`: a local directory tree read through `tokio::fs`

pub mod memory;

#[cfg(feature = "local")]
pub mod local;

pub use memory::{MemoryEntry, MemoryItem};

#[cfg(feature = "local")]
pub use local::{LocalConfig, LocalEntry, LocalItem};
