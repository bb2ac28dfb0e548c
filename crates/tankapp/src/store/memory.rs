use super::fish_store::FishStore;
use super::mem_backend::MemBackend;

pub type InMemoryStore = FishStore<MemBackend>;

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        FishStore::with_backend(MemBackend::new())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{Fish, RawFish};
    use crate::store::DataStore;

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        /// Insert a fish built from a JSON attribute object.
        pub fn with_fish(self, name: &str, attributes: serde_json::Value) -> Self {
            let mut raw: RawFish =
                serde_json::from_value(attributes).expect("fixture attributes must parse");
            raw.name = Some(name.to_string());
            self.store
                .insert_fish(name, &Fish::from_raw(raw))
                .expect("fixture insert must succeed");
            self
        }
    }
}
