use crate::error::Result;
use std::path::PathBuf;

/// Abstract interface for raw storage I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while FishStore handles the "what" (normalization, conflicts, compensation).
///
/// A *unit* is the per-record container (a directory for `FsBackend`) and
/// each unit holds at most one *info* document. Keys are already validated
/// fish names.
pub trait StorageBackend {
    // --- Discovery ---

    /// Keys of every unit under the root.
    /// Fails when the root itself cannot be enumerated.
    fn list_units(&self) -> Result<Vec<String>>;

    fn unit_exists(&self, key: &str) -> Result<bool>;

    fn info_exists(&self, key: &str) -> Result<bool>;

    // --- Unit Lifecycle ---

    /// Create the unit for `key`. Must fail with `TankError::Conflict` if it
    /// already exists, so the call doubles as an atomic create-if-absent.
    fn create_unit(&self, key: &str) -> Result<()>;

    /// Remove an empty unit.
    fn remove_unit(&self, key: &str) -> Result<()>;

    // --- Info Operations ---

    /// Read the info document for `key`.
    /// Returns Ok(None) if the unit has no info document.
    fn read_info(&self, key: &str) -> Result<Option<String>>;

    /// Replace the info document.
    /// MUST be atomic (e.g. write to tmp then rename) so readers never see a
    /// partial document.
    fn write_info(&self, key: &str, content: &str) -> Result<()>;

    fn remove_info(&self, key: &str) -> Result<()>;

    /// Remove temp files left behind by interrupted writes.
    /// Returns how many were removed.
    fn clear_temp_files(&self, key: &str) -> Result<usize>;

    // --- Paths ---

    /// For FsBackend, the real directory. For MemBackend, a virtual path.
    fn unit_path(&self, key: &str) -> PathBuf;

    fn info_path(&self, key: &str) -> PathBuf {
        self.unit_path(key).join(super::INFO_FILE)
    }
}
