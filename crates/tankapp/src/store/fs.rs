use super::fish_store::FishStore;
use super::fs_backend::FsBackend;
use crate::error::Result;
use std::path::{Path, PathBuf};

pub type FileStore = FishStore<FsBackend>;

impl FileStore {
    /// A store over `root`. Nothing is touched until the first operation.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FishStore::with_backend(FsBackend::new(root))
    }

    /// A store over `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let backend = FsBackend::new(root);
        backend.ensure_root()?;
        Ok(FishStore::with_backend(backend))
    }

    pub fn root(&self) -> &Path {
        self.backend.root()
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{Fish, RawFish};
    use crate::store::{DataStore, UnitState};
    use crate::test_utils::TestEnv;
    use std::fs;

    #[test]
    fn open_creates_missing_root() {
        let env = TestEnv::new();
        assert!(env.root.is_dir());
        assert_eq!(env.store.root(), env.root.as_path());
    }

    #[test]
    fn insert_lays_out_one_directory_per_fish() {
        let env = TestEnv::new();
        env.store
            .insert_fish("Nemo", &Fish::from_raw(RawFish::named("Nemo")))
            .unwrap();
        assert!(env.root.join("Nemo").join("info").is_file());
        assert_eq!(env.store.keys().unwrap(), vec!["Nemo"]);
    }

    #[test]
    fn directory_without_info_is_orphaned() {
        let env = TestEnv::new();
        fs::create_dir(env.root.join("Ghost")).unwrap();
        assert_eq!(env.store.unit_state("Ghost").unwrap(), UnitState::Orphaned);
        assert!(env.store.list_fish().unwrap().is_empty());
    }
}
