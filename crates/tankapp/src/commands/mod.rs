//! # Command Layer
//!
//! This module contains the **core business logic** of tank. Each command lives in its
//! own submodule and implements plain Rust functions over a [`DataStore`].
//!
//! ## Role and Responsibilities
//!
//! Commands are where the real work happens:
//! - Validate names and required attributes
//! - Hold the per-name lock for the whole check-then-write sequence
//! - Normalize attributes and build the persisted record
//! - Return a structured [`CmdResult`]
//!
//! ## What Commands Do NOT Do
//!
//! - **Any terminal I/O**: No stdout, stderr or formatting
//! - **Transport decisions**: Errors are classified ([`crate::error::ErrorKind`]),
//!   never mapped to status codes
//! - **Retries**: A failed step is reported, not retried (the only exception is
//!   the single directory-removal retry inside the store)
//!
//! ## Testing Strategy
//!
//! Command tests use `InMemoryStore` and its fault injection to cover every
//! branch, including partial failures.
//!
//! ## Command Modules
//!
//! - [`create`]: Add a new fish
//! - [`list`]: All fish keyed by name
//! - [`get`]: One fish by name
//! - [`update`]: Merge attribute changes into a fish
//! - [`delete`]: Remove a fish from disk
//! - [`sweep`]: Remove orphaned record directories
//!
//! [`DataStore`]: crate::store::DataStore

use crate::model::{Fish, FishInfo};
use serde::Serialize;
use std::collections::BTreeMap;

pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod sweep;
pub mod update;

pub use list::ListFilter;
pub use sweep::SweepReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Fish written or removed by the command.
    pub affected_fish: Vec<Fish>,
    /// Fish to display, keyed by their directory name.
    pub listed_fish: BTreeMap<String, Fish>,
    /// Update response projection.
    pub info: Option<FishInfo>,
    pub sweep: Option<SweepReport>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_fish(mut self, fish: Vec<Fish>) -> Self {
        self.affected_fish = fish;
        self
    }

    pub fn with_listed_fish(mut self, fish: BTreeMap<String, Fish>) -> Self {
        self.listed_fish = fish;
        self
    }

    /// The first message, used as the one-line outcome of the command.
    pub fn summary(&self) -> &str {
        self.messages
            .first()
            .map(|m| m.content.as_str())
            .unwrap_or("")
    }
}
