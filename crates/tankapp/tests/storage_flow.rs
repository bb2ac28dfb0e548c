//! End-to-end flows through the API over a real directory.

use serde_json::json;
use std::fs;
use std::thread;
use tankapp::api::TankApi;
use tankapp::commands::ListFilter;
use tankapp::error::{ErrorKind, TankError};
use tankapp::model::{RawFish, Size, WaterType};
use tankapp::store::fs::FileStore;
use tankapp::store::{DataStore, UnitState};
use tempfile::TempDir;

fn input(value: serde_json::Value) -> RawFish {
    serde_json::from_value(value).unwrap()
}

fn setup() -> (TempDir, TankApi<FileStore>) {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path().join("Tank")).unwrap();
    (dir, TankApi::new(store))
}

#[test]
fn nemo_round_trip() {
    let (_dir, api) = setup();
    api.create_fish(input(json!({
        "name": "Nemo",
        "userName": "alice",
        "apiKey": "k1",
        "waterType": "Saltwater",
        "aggression": "2",
        "size": "Extra Large"
    })))
    .unwrap();

    let info_path = api.store().root().join("Nemo").join("info");
    let on_disk: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&info_path).unwrap()).unwrap();
    assert_eq!(on_disk["name"], "Nemo");
    assert_eq!(on_disk["waterType"], "salt");
    assert_eq!(on_disk["aggression"], 2);
    assert_eq!(on_disk["size"], "extra-large");
    assert_eq!(on_disk["createdBy"], "alice");
    assert_eq!(on_disk["apiKey"], "k1");
    assert_eq!(on_disk["deleted"], false);
    assert!(on_disk["createdAt"].as_i64().unwrap() > 0);

    let listed = api.list_fish().unwrap().listed_fish;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed["Nemo"].water_type, WaterType::Salt);
    assert_eq!(listed["Nemo"].size, Size::ExtraLarge);
}

#[test]
fn update_then_delete_then_recreate() {
    let (_dir, api) = setup();
    let nemo = json!({"name": "Nemo", "userName": "alice", "apiKey": "k1"});
    api.create_fish(input(nemo.clone())).unwrap();

    let updated = api
        .update_fish(input(json!({"name": "Nemo", "aggression": 7, "color": "orange"})))
        .unwrap();
    let info = updated.info.unwrap();
    assert_eq!(info.aggression.get(), 5);
    assert_eq!(info.created_by, "alice");

    api.delete_fish("Nemo").unwrap();
    assert!(!api.store().root().join("Nemo").exists());
    assert!(matches!(
        api.get_fish("Nemo"),
        Err(TankError::NotFound(_))
    ));

    api.create_fish(input(nemo)).unwrap();
    assert_eq!(api.get_fish("Nemo").unwrap().listed_fish["Nemo"].aggression.get(), 3);
}

#[test]
fn soft_deleted_fish_follow_the_list_filter() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("Tank");
    let api = TankApi::new(FileStore::open(&root).unwrap());
    api.create_fish(input(json!({"name": "Gill", "userName": "a", "apiKey": "k"})))
        .unwrap();
    api.update_fish(input(json!({"name": "Gill", "deleted": true})))
        .unwrap();
    assert_eq!(api.list_fish().unwrap().listed_fish.len(), 1);

    let hiding = TankApi::new(FileStore::open(&root).unwrap())
        .with_list_filter(ListFilter::hide_deleted());
    assert!(hiding.list_fish().unwrap().listed_fish.is_empty());
}

#[test]
fn corrupt_info_fails_listing_with_its_path() {
    let (_dir, api) = setup();
    api.create_fish(input(json!({"name": "Nemo", "userName": "a", "apiKey": "k"})))
        .unwrap();
    let info_path = api.store().root().join("Nemo").join("info");
    fs::write(&info_path, "{not json").unwrap();

    let err = api.list_fish().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);
    assert_eq!(err.path(), Some(&info_path));
}

#[test]
fn mistyped_attributes_keep_every_fish_listable() {
    let (_dir, api) = setup();
    for name in ["Nemo", "Dory"] {
        api.create_fish(input(json!({"name": name, "userName": "a", "apiKey": "k"})))
            .unwrap();
    }
    let info_path = api.store().root().join("Dory").join("info");
    fs::write(
        &info_path,
        r#"{"name":"Dory","createdAt":"1700000000","deleted":0,"apiKey":5}"#,
    )
    .unwrap();

    let listed = api.list_fish().unwrap().listed_fish;
    assert_eq!(listed.len(), 2);
    assert_eq!(listed["Nemo"].api_key.as_deref(), Some("k"));
    assert_eq!(listed["Dory"].extra["apiKey"], json!(5));

    let updated = api
        .update_fish(input(json!({"name": "Dory", "createdAt": 1700000000})))
        .unwrap();
    assert_eq!(updated.info.unwrap().created_at, 1_700_000_000);
    let on_disk: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&info_path).unwrap()).unwrap();
    assert_eq!(on_disk["createdAt"], 1_700_000_000);
    assert_eq!(on_disk["apiKey"], 5);
}

#[test]
fn sweep_removes_interrupted_creates() {
    let (_dir, api) = setup();
    let root = api.store().root().to_path_buf();
    fs::create_dir(root.join("Ghost")).unwrap();
    fs::write(root.join("Ghost").join(".info-1234.tmp"), "half").unwrap();
    assert_eq!(api.store().unit_state("Ghost").unwrap(), UnitState::Orphaned);

    let report = api.sweep().unwrap().sweep.unwrap();
    assert_eq!(report.removed_units, 1);
    assert_eq!(report.removed_temp_files, 1);
    assert!(!root.join("Ghost").exists());
}

#[test]
fn concurrent_creates_of_one_name_yield_one_winner() {
    let (_dir, api) = setup();
    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let api = &api;
                scope.spawn(move || {
                    api.create_fish(input(json!({
                        "name": "Nemo",
                        "userName": format!("user{}", i),
                        "apiKey": "k"
                    })))
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    for result in results.iter().filter_map(|r| r.as_ref().err()) {
        assert_eq!(result.kind(), ErrorKind::Conflict);
    }
}

#[test]
fn separate_stores_on_one_root_still_conflict() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("Tank");
    let first = TankApi::new(FileStore::open(&root).unwrap());
    let second = TankApi::new(FileStore::open(&root).unwrap());
    let body = json!({"name": "Nemo", "userName": "a", "apiKey": "k"});

    first.create_fish(input(body.clone())).unwrap();
    let err = second.create_fish(input(body)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}
