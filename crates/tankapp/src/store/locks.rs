//! In-process mutual exclusion keyed by fish name.
//!
//! Every read-check-write sequence on a record (existence check then
//! create, lookup then rewrite, remove info then remove directory) runs while
//! holding the record's [`NameGuard`], so callers sharing one store never
//! interleave on the same name. Different names never contend.
//!
//! The lock table only holds names that are currently locked; waiters park
//! on a shared condition variable and recheck after every release.
//!
//! Exclusion is per process. Across processes the filesystem's exclusive
//! directory creation still turns a lost create race into a conflict.

use parking_lot::{Condvar, Mutex};
use std::collections::HashSet;

#[derive(Default)]
pub struct NameLocks {
    held: Mutex<HashSet<String>>,
    released: Condvar,
}

impl NameLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks until `name` is free, then holds it until the guard drops.
    pub fn acquire(&self, name: &str) -> NameGuard<'_> {
        let mut held = self.held.lock();
        while held.contains(name) {
            self.released.wait(&mut held);
        }
        held.insert(name.to_string());
        NameGuard {
            locks: self,
            name: name.to_string(),
        }
    }

    /// Number of names currently held.
    pub fn len(&self) -> usize {
        self.held.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[must_use = "the name is unlocked as soon as the guard is dropped"]
pub struct NameGuard<'a> {
    locks: &'a NameLocks,
    name: String,
}

impl NameGuard<'_> {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for NameGuard<'_> {
    fn drop(&mut self) {
        self.locks.held.lock().remove(&self.name);
        self.locks.released.notify_all();
    }
}
