use super::backend::StorageBackend;
use crate::error::{Result, StorageOp, TankError};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

const MEM_ROOT: &str = "/mem/Tank";

#[derive(Clone, Default)]
struct MemUnit {
    info: Option<String>,
    temp_files: usize,
    foreign_files: usize,
}

impl MemUnit {
    fn is_empty(&self) -> bool {
        self.info.is_none() && self.temp_files == 0 && self.foreign_files == 0
    }
}

/// Storage operations that can be made to fail on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    ListUnits,
    CreateUnit,
    WriteInfo,
    RemoveInfo,
    RemoveUnit,
}

/// In-memory storage backend for testing.
///
/// Uses `parking_lot::Mutex` so the backend is `Sync` and can sit behind a
/// store shared between threads, while keeping the `&self` trait methods.
#[derive(Default)]
pub struct MemBackend {
    units: Mutex<BTreeMap<String, MemUnit>>,
    faults: Mutex<HashSet<Fault>>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call of the given kind fail until cleared.
    pub fn inject_fault(&self, fault: Fault) {
        self.faults.lock().insert(fault);
    }

    pub fn clear_fault(&self, fault: Fault) {
        self.faults.lock().remove(&fault);
    }

    /// Test helper: a unit with no info document.
    pub fn add_orphan(&self, key: &str) {
        self.units.lock().entry(key.to_string()).or_default();
    }

    /// Test helper: a leftover temp file from an interrupted write.
    pub fn add_temp_file(&self, key: &str) {
        self.units
            .lock()
            .entry(key.to_string())
            .or_default()
            .temp_files += 1;
    }

    /// Test helper: a file the store does not own, which blocks unit removal.
    pub fn add_foreign_file(&self, key: &str) {
        self.units
            .lock()
            .entry(key.to_string())
            .or_default()
            .foreign_files += 1;
    }

    /// Test helper: store an info document verbatim, creating the unit.
    pub fn put_info(&self, key: &str, content: &str) {
        self.units.lock().entry(key.to_string()).or_default().info = Some(content.to_string());
    }

    pub fn raw_info(&self, key: &str) -> Option<String> {
        self.units.lock().get(key).and_then(|unit| unit.info.clone())
    }

    fn check(&self, fault: Fault, op: StorageOp, path: &Path) -> Result<()> {
        if self.faults.lock().contains(&fault) {
            return Err(TankError::storage(
                op,
                path,
                io::Error::new(io::ErrorKind::Other, "simulated failure"),
            ));
        }
        Ok(())
    }
}

fn missing(op: StorageOp, path: PathBuf) -> TankError {
    TankError::storage(op, path, io::Error::from(io::ErrorKind::NotFound))
}

impl StorageBackend for MemBackend {
    fn list_units(&self) -> Result<Vec<String>> {
        self.check(Fault::ListUnits, StorageOp::ReadRoot, Path::new(MEM_ROOT))?;
        Ok(self.units.lock().keys().cloned().collect())
    }

    fn unit_exists(&self, key: &str) -> Result<bool> {
        Ok(self.units.lock().contains_key(key))
    }

    fn info_exists(&self, key: &str) -> Result<bool> {
        Ok(self
            .units
            .lock()
            .get(key)
            .is_some_and(|unit| unit.info.is_some()))
    }

    fn create_unit(&self, key: &str) -> Result<()> {
        self.check(Fault::CreateUnit, StorageOp::CreateDir, &self.unit_path(key))?;
        let mut units = self.units.lock();
        if units.contains_key(key) {
            return Err(TankError::Conflict(key.to_string()));
        }
        units.insert(key.to_string(), MemUnit::default());
        Ok(())
    }

    fn remove_unit(&self, key: &str) -> Result<()> {
        let path = self.unit_path(key);
        self.check(Fault::RemoveUnit, StorageOp::RemoveDir, &path)?;
        let mut units = self.units.lock();
        let Some(unit) = units.get(key) else {
            return Err(missing(StorageOp::RemoveDir, path));
        };
        if !unit.is_empty() {
            return Err(TankError::storage(
                StorageOp::RemoveDir,
                path,
                io::Error::new(io::ErrorKind::Other, "directory not empty"),
            ));
        }
        units.remove(key);
        Ok(())
    }

    fn read_info(&self, key: &str) -> Result<Option<String>> {
        Ok(self.raw_info(key))
    }

    fn write_info(&self, key: &str, content: &str) -> Result<()> {
        let path = self.info_path(key);
        self.check(Fault::WriteInfo, StorageOp::WriteInfo, &path)?;
        match self.units.lock().get_mut(key) {
            Some(unit) => {
                unit.info = Some(content.to_string());
                Ok(())
            }
            None => Err(missing(StorageOp::WriteInfo, path)),
        }
    }

    fn remove_info(&self, key: &str) -> Result<()> {
        let path = self.info_path(key);
        self.check(Fault::RemoveInfo, StorageOp::RemoveInfo, &path)?;
        match self.units.lock().get_mut(key) {
            Some(unit) if unit.info.is_some() => {
                unit.info = None;
                Ok(())
            }
            _ => Err(missing(StorageOp::RemoveInfo, path)),
        }
    }

    fn clear_temp_files(&self, key: &str) -> Result<usize> {
        Ok(self
            .units
            .lock()
            .get_mut(key)
            .map(|unit| std::mem::take(&mut unit.temp_files))
            .unwrap_or(0))
    }

    fn unit_path(&self, key: &str) -> PathBuf {
        Path::new(MEM_ROOT).join(key)
    }
}
