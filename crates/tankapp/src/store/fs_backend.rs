use super::backend::StorageBackend;
use crate::error::{Result, StorageOp, TankError};
use crate::names::is_storage_key;
use log::{debug, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Owner rwx, everyone else traverse-only: others can reach a known fish
/// but cannot list the directory.
#[cfg(unix)]
pub const UNIT_MODE: u32 = 0o711;

const TEMP_PREFIX: &str = ".info-";
const TEMP_SUFFIX: &str = ".tmp";

pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the storage root if it does not exist yet.
    pub fn ensure_root(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)
                .map_err(|e| TankError::storage(StorageOp::CreateRoot, &self.root, e))?;
        }
        Ok(())
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.unit_path(key)
            .join(format!("{}{}{}", TEMP_PREFIX, Uuid::new_v4(), TEMP_SUFFIX))
    }

    #[cfg(unix)]
    fn restrict(&self, path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(UNIT_MODE))
            .map_err(|e| TankError::storage(StorageOp::SetPermissions, path, e))
    }

    #[cfg(not(unix))]
    fn restrict(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

fn is_temp_file(name: &str) -> bool {
    name.starts_with(TEMP_PREFIX) && name.ends_with(TEMP_SUFFIX)
}

impl StorageBackend for FsBackend {
    fn list_units(&self) -> Result<Vec<String>> {
        let read_root = |e: io::Error| TankError::storage(StorageOp::ReadRoot, &self.root, e);
        let entries = fs::read_dir(&self.root).map_err(read_root)?;

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(read_root)?;
            if !entry.file_type().map_err(read_root)?.is_dir() {
                continue;
            }
            match entry.file_name().to_str() {
                Some(name) if is_storage_key(name) => keys.push(name.to_string()),
                _ => debug!("ignoring foreign entry {}", entry.path().display()),
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn unit_exists(&self, key: &str) -> Result<bool> {
        let path = self.unit_path(key);
        path.try_exists()
            .map_err(|e| TankError::storage(StorageOp::ReadRoot, path, e))
    }

    fn info_exists(&self, key: &str) -> Result<bool> {
        let path = self.info_path(key);
        path.try_exists()
            .map_err(|e| TankError::storage(StorageOp::ReadInfo, path, e))
    }

    fn create_unit(&self, key: &str) -> Result<()> {
        let path = self.unit_path(key);
        let mut builder = fs::DirBuilder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(UNIT_MODE);
        }

        match builder.create(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(TankError::Conflict(key.to_string()));
            }
            Err(e) => return Err(TankError::storage(StorageOp::CreateDir, path, e)),
        }

        // The umask may have stripped bits from the requested mode.
        if let Err(e) = self.restrict(&path) {
            if let Err(cleanup) = fs::remove_dir(&path) {
                warn!("could not roll back {}: {}", path.display(), cleanup);
            }
            return Err(e);
        }

        debug!("created unit {}", path.display());
        Ok(())
    }

    fn remove_unit(&self, key: &str) -> Result<()> {
        let path = self.unit_path(key);
        fs::remove_dir(&path).map_err(|e| TankError::storage(StorageOp::RemoveDir, path, e))
    }

    fn read_info(&self, key: &str) -> Result<Option<String>> {
        let path = self.info_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TankError::storage(StorageOp::ReadInfo, path, e)),
        }
    }

    fn write_info(&self, key: &str, content: &str) -> Result<()> {
        let target = self.info_path(key);

        // Atomic Write
        let tmp = self.temp_path(key);
        if let Err(e) = fs::write(&tmp, content) {
            let _ = fs::remove_file(&tmp);
            return Err(TankError::storage(StorageOp::WriteInfo, target, e));
        }
        if let Err(e) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(TankError::storage(StorageOp::WriteInfo, target, e));
        }

        debug!("wrote {}", target.display());
        Ok(())
    }

    fn remove_info(&self, key: &str) -> Result<()> {
        let path = self.info_path(key);
        fs::remove_file(&path).map_err(|e| TankError::storage(StorageOp::RemoveInfo, path, e))
    }

    fn clear_temp_files(&self, key: &str) -> Result<usize> {
        let unit = self.unit_path(key);
        let entries = match fs::read_dir(&unit) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(TankError::storage(StorageOp::RemoveTemp, unit, e)),
        };

        let mut removed = 0;
        for entry in entries {
            let entry = entry.map_err(|e| TankError::storage(StorageOp::RemoveTemp, &unit, e))?;
            let path = entry.path();
            let stale = path
                .file_name()
                .and_then(|s| s.to_str())
                .is_some_and(is_temp_file);
            if stale {
                fs::remove_file(&path)
                    .map_err(|e| TankError::storage(StorageOp::RemoveTemp, &path, e))?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn unit_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}
