use crate::store::fs::FileStore;
use std::path::PathBuf;
use tempfile::TempDir;

/// A [`FileStore`] over a fresh temporary root.
pub struct TestEnv {
    // Kept so the directory lives as long as the store.
    pub _temp_dir: TempDir,
    pub store: FileStore,
    pub root: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().join("Tank");
        let store = FileStore::open(root.clone()).expect("failed to open store");
        Self {
            _temp_dir: temp_dir,
            store,
            root,
        }
    }
}
