use super::backend::StorageBackend;
use super::locks::{NameGuard, NameLocks};
use super::{DataStore, UnitState};
use crate::error::{Result, StorageOp, TankError};
use crate::model::{Fish, RawFish};
use log::{debug, warn};
use serde_json::Value;
use std::collections::BTreeMap;
use std::io;

pub struct FishStore<B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
    locks: NameLocks,
}

impl<B: StorageBackend> FishStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            locks: NameLocks::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Parse an info document and merge it with its normalized fields.
    ///
    /// Only content that is not a JSON object is a parse failure; mistyped
    /// attributes are carried along as unknown ones.
    fn decode(&self, key: &str, content: &str) -> Result<Fish> {
        let parse_error = |e: serde_json::Error| {
            TankError::storage(
                StorageOp::ParseInfo,
                self.backend.info_path(key),
                io::Error::new(io::ErrorKind::InvalidData, e),
            )
        };
        let document = match serde_json::from_str::<Value>(content).map_err(parse_error)? {
            Value::Object(document) => document,
            _ => {
                return Err(TankError::storage(
                    StorageOp::ParseInfo,
                    self.backend.info_path(key),
                    io::Error::new(io::ErrorKind::InvalidData, "info is not a JSON object"),
                ))
            }
        };
        let raw = RawFish::from_document(document).map_err(parse_error)?;
        Ok(Fish::from_raw(raw))
    }

    fn encode(&self, key: &str, fish: &Fish) -> Result<String> {
        serde_json::to_string(fish).map_err(|e| {
            TankError::storage(
                StorageOp::WriteInfo,
                self.backend.info_path(key),
                io::Error::new(io::ErrorKind::InvalidData, e),
            )
        })
    }
}

impl<B: StorageBackend> DataStore for FishStore<B> {
    fn lock_name(&self, name: &str) -> NameGuard<'_> {
        self.locks.acquire(name)
    }

    fn unit_state(&self, key: &str) -> Result<UnitState> {
        if !self.backend.unit_exists(key)? {
            return Ok(UnitState::Absent);
        }
        if self.backend.info_exists(key)? {
            Ok(UnitState::Present)
        } else {
            Ok(UnitState::Orphaned)
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        self.backend.list_units()
    }

    fn list_fish(&self) -> Result<BTreeMap<String, Fish>> {
        let mut fish = BTreeMap::new();
        for key in self.backend.list_units()? {
            // No info document: interrupted create/delete, not a fish.
            let Some(content) = self.backend.read_info(&key)? else {
                debug!("skipping {} (no info)", key);
                continue;
            };
            let record = self.decode(&key, &content)?;
            fish.insert(key, record);
        }
        Ok(fish)
    }

    fn get_fish(&self, key: &str) -> Result<Fish> {
        match self.backend.read_info(key)? {
            Some(content) => self.decode(key, &content),
            None => Err(TankError::NotFound(key.to_string())),
        }
    }

    fn insert_fish(&self, key: &str, fish: &Fish) -> Result<()> {
        let content = self.encode(key, fish)?;

        // 1. Claim the name (exclusive)
        self.backend.create_unit(key)?;

        // 2. Write the info document; undo the claim if that fails
        if let Err(e) = self.backend.write_info(key, &content) {
            warn!("rolling back {} after failed write: {}", key, e);
            if let Err(cleanup) = self.backend.remove_unit(key) {
                warn!("could not remove {}: {}", key, cleanup);
            }
            return Err(e);
        }

        debug!("inserted {}", key);
        Ok(())
    }

    fn save_fish(&self, key: &str, fish: &Fish) -> Result<()> {
        let content = self.encode(key, fish)?;
        self.backend.write_info(key, &content)
    }

    fn delete_fish(&self, key: &str) -> Result<()> {
        // 1. Info first: if this fails the fish is untouched
        self.backend.remove_info(key)?;

        // 2. Directory. A leftover temp file is the usual reason this fails.
        if let Err(first) = self.backend.remove_unit(key) {
            warn!("retrying removal of {}: {}", key, first);
            if let Err(e) = self.backend.clear_temp_files(key) {
                warn!("could not clear temp files in {}: {}", key, e);
            }
            self.backend.remove_unit(key)?;
        }

        debug!("deleted {}", key);
        Ok(())
    }

    fn reclaim_unit(&self, key: &str) -> Result<usize> {
        let removed = self.backend.clear_temp_files(key)?;
        self.backend.remove_unit(key)?;
        debug!("reclaimed orphaned {} ({} temp files)", key, removed);
        Ok(removed)
    }

    fn clear_stale_files(&self, key: &str) -> Result<usize> {
        let removed = self.backend.clear_temp_files(key)?;
        if removed > 0 {
            debug!("cleared {} temp files in {}", removed, key);
        }
        Ok(removed)
    }
}
