use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, TankError};
use crate::model::{Fish, RawFish};
use crate::names::sanitize_name;
use crate::normalize::normalize;
use crate::store::{DataStore, UnitState};
use chrono::Utc;
use log::warn;
use serde_json::Map;

pub const REQUIRED_FIELDS: &str = "Required fields: name, userName, apiKey";

pub fn run<S: DataStore>(store: &S, input: RawFish) -> Result<CmdResult> {
    let (Some(name), Some(user_name), Some(api_key)) = (
        input.name.as_deref(),
        input.user_name.as_ref(),
        input.api_key.as_ref(),
    ) else {
        return Err(TankError::Validation(REQUIRED_FIELDS.to_string()));
    };
    let key = sanitize_name(name)?;

    let _guard = store.lock_name(&key);
    match store.unit_state(&key)? {
        UnitState::Present => return Err(TankError::Conflict(key)),
        UnitState::Orphaned => {
            // Debris from an interrupted create or delete: claim it.
            if let Err(e) = store.reclaim_unit(&key) {
                warn!("cannot reclaim orphaned {}: {}", key, e);
                return Err(TankError::Conflict(key));
            }
        }
        UnitState::Absent => {}
    }

    let canonical = normalize(&input);
    let fish = Fish {
        name: key.clone(),
        water_type: canonical.water_type,
        aggression: canonical.aggression,
        size: canonical.size,
        created_by: Some(user_name.clone()),
        api_key: Some(api_key.clone()),
        created_at: Some(Utc::now().timestamp()),
        deleted: false,
        user_name: None,
        browser_id: None,
        thumbmark: None,
        extra: Map::new(),
    };
    store.insert_fish(&key, &fish)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("New fish {} created", key)));
    Ok(result.with_affected_fish(vec![fish]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageOp;
    use crate::model::{Size, WaterType};
    use crate::store::mem_backend::Fault;
    use crate::store::memory::InMemoryStore;
    use serde_json::json;

    fn input(value: serde_json::Value) -> RawFish {
        serde_json::from_value(value).unwrap()
    }

    fn nemo() -> RawFish {
        input(json!({
            "name": "Nemo",
            "userName": "alice",
            "apiKey": "k1",
            "waterType": "Saltwater",
            "aggression": "9",
            "size": "Extra Large"
        }))
    }

    #[test]
    fn creates_normalized_record() {
        let store = InMemoryStore::new();
        let result = run(&store, nemo()).unwrap();
        assert_eq!(result.summary(), "New fish Nemo created");

        let stored = store.get_fish("Nemo").unwrap();
        assert_eq!(stored.water_type, WaterType::Salt);
        // "9" is out of range, so creation falls back to the default.
        assert_eq!(stored.aggression.get(), 3);
        assert_eq!(stored.size, Size::ExtraLarge);
        assert_eq!(stored.created_by.as_deref(), Some("alice"));
        assert_eq!(stored.api_key.as_deref(), Some("k1"));
        assert!(stored.created_at.unwrap() > 0);
        assert!(!stored.deleted);
        assert!(stored.user_name.is_none());
    }

    #[test]
    fn missing_required_fields_is_validation_error() {
        let store = InMemoryStore::new();
        for body in [
            json!({"userName": "alice", "apiKey": "k"}),
            json!({"name": "Nemo", "apiKey": "k"}),
            json!({"name": "Nemo", "userName": "alice"}),
        ] {
            let err = run(&store, input(body)).unwrap_err();
            assert!(matches!(err, TankError::Validation(ref m) if m == REQUIRED_FIELDS));
        }
        assert!(store.list_fish().unwrap().is_empty());
    }

    #[test]
    fn unsafe_name_is_rejected_before_touching_storage() {
        let store = InMemoryStore::new();
        let err = run(
            &store,
            input(json!({"name": "../escape", "userName": "a", "apiKey": "k"})),
        )
        .unwrap_err();
        assert!(matches!(err, TankError::Validation(_)));
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn second_create_conflicts_and_keeps_original() {
        let store = InMemoryStore::new();
        run(&store, nemo()).unwrap();

        let mut again = nemo();
        again.water_type = Some(json!("brackish"));
        let err = run(&store, again).unwrap_err();
        assert!(matches!(err, TankError::Conflict(ref n) if n == "Nemo"));
        assert_eq!(store.get_fish("Nemo").unwrap().water_type, WaterType::Salt);
    }

    #[test]
    fn stores_the_trimmed_name() {
        let store = InMemoryStore::new();
        run(
            &store,
            input(json!({"name": "  Dory ", "userName": "a", "apiKey": "k"})),
        )
        .unwrap();
        assert_eq!(store.get_fish("Dory").unwrap().name, "Dory");
    }

    #[test]
    fn extra_attributes_are_not_persisted_on_create() {
        let store = InMemoryStore::new();
        let mut body = nemo();
        body.extra.insert("color".into(), json!("orange"));
        body.browser_id = Some("b".into());
        run(&store, body).unwrap();
        let stored = store.get_fish("Nemo").unwrap();
        assert!(stored.extra.is_empty());
        assert!(stored.browser_id.is_none());
    }

    #[test]
    fn reclaims_orphaned_directory() {
        let store = InMemoryStore::new();
        store.backend().add_orphan("Nemo");
        store.backend().add_temp_file("Nemo");

        run(&store, nemo()).unwrap();
        assert_eq!(store.unit_state("Nemo").unwrap(), UnitState::Present);
    }

    #[test]
    fn unreclaimable_orphan_conflicts() {
        let store = InMemoryStore::new();
        store.backend().add_foreign_file("Nemo");
        let err = run(&store, nemo()).unwrap_err();
        assert!(matches!(err, TankError::Conflict(_)));
    }

    #[test]
    fn failed_directory_creation_is_storage_error_with_path() {
        let store = InMemoryStore::new();
        store.backend().inject_fault(Fault::CreateUnit);

        let err = run(&store, nemo()).unwrap_err();
        assert!(matches!(
            err,
            TankError::Storage {
                op: StorageOp::CreateDir,
                ..
            }
        ));
        assert!(err.path().unwrap().ends_with("Nemo"));
        assert_eq!(store.unit_state("Nemo").unwrap(), UnitState::Absent);
    }

    #[test]
    fn failed_write_leaves_no_directory() {
        let store = InMemoryStore::new();
        store.backend().inject_fault(Fault::WriteInfo);
        assert!(matches!(
            run(&store, nemo()),
            Err(TankError::Storage { .. })
        ));
        store.backend().clear_fault(Fault::WriteInfo);

        assert_eq!(store.unit_state("Nemo").unwrap(), UnitState::Absent);
        run(&store, nemo()).unwrap();
    }
}
