//! # Storage Layer
//!
//! This module defines the storage abstraction for tank. The [`DataStore`]
//! trait allows the command layer to work with different storage backends.
//!
//! ## Storage Layout
//!
//! ```text
//! <root>/
//! ├── Nemo/               # one directory per fish, named by its validated name
//! │   └── info            # JSON object with the fish's attributes
//! └── Dory/
//!     └── info
//! ```
//!
//! There is no index: the existence of a fish's directory **is** the
//! uniqueness proof. Directories are created with mode `0711` so other users
//! can traverse into a known fish but not enumerate the tank.
//!
//! ## Consistency Without a Database
//!
//! - **Atomic documents**: `info` is always replaced by writing a temp file
//!   in the same directory and renaming it over the old one. Readers see the
//!   old document or the new one, never a torn write.
//! - **Create-if-absent**: directory creation is exclusive. Losing a create
//!   race is a conflict, not a storage failure.
//! - **Per-name exclusion**: [`DataStore::lock_name`] serializes every
//!   multi-step sequence on one record within the process.
//! - **Compensation**: a create whose `info` write fails removes the
//!   directory it just made; a delete whose directory removal fails clears
//!   stale temp files and retries once.
//!
//! ## Unit States
//!
//! A directory without `info` (an interrupted create or delete) is
//! [`UnitState::Orphaned`]. Listing skips it, a create for the same name
//! reclaims it on sight, and the sweep command removes it.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: Production store over [`fs_backend::FsBackend`].
//! - [`memory::InMemoryStore`]: For testing logic without filesystem I/O.

use crate::error::Result;
use crate::model::Fish;
use std::collections::BTreeMap;

pub mod backend;
pub mod fish_store;
pub mod fs;
pub mod fs_backend;
pub mod locks;
pub mod mem_backend;
pub mod memory;

pub use locks::NameGuard;

/// Name of the per-record info document.
pub const INFO_FILE: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    /// No directory for this name.
    Absent,
    /// A directory without an info document.
    Orphaned,
    /// A directory holding an info document.
    Present,
}

/// Abstract interface for fish storage.
///
/// Keys are validated names (see [`crate::names`]). Mutating methods expect
/// the caller to hold the key's [`NameGuard`] for the whole read-check-write
/// sequence.
pub trait DataStore {
    /// Acquire the in-process lock for `name`.
    fn lock_name(&self, name: &str) -> NameGuard<'_>;

    fn unit_state(&self, key: &str) -> Result<UnitState>;

    /// Keys of every record directory, including orphaned ones.
    fn keys(&self) -> Result<Vec<String>>;

    /// All fish with an info document, keyed by directory name.
    fn list_fish(&self) -> Result<BTreeMap<String, Fish>>;

    /// A single fish; `NotFound` if its info document is missing.
    fn get_fish(&self, key: &str) -> Result<Fish>;

    /// Persist a new fish. `Conflict` if the directory already exists.
    fn insert_fish(&self, key: &str, fish: &Fish) -> Result<()>;

    /// Replace the info document of an existing fish.
    fn save_fish(&self, key: &str, fish: &Fish) -> Result<()>;

    /// Remove the info document, then the directory.
    fn delete_fish(&self, key: &str) -> Result<()>;

    /// Remove an orphaned directory. Returns the number of stale temp files
    /// removed along the way.
    fn reclaim_unit(&self, key: &str) -> Result<usize>;

    /// Remove leftover temp files from a unit, keeping its info document.
    fn clear_stale_files(&self, key: &str) -> Result<usize>;
}
