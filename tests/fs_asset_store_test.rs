//! Tests for FsAssetStore against the fixture asset directory

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use autobind::domain::{AssetIndex, AssetRef, FieldType};
use autobind::infrastructure::traits::{AssetStore, FsAssetStore};

fn assets_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/resources/assets")
}

#[test]
fn given_asset_tree_when_listing_then_relative_sorted_paths() {
    let store = FsAssetStore::new(assets_dir());

    let paths = store.asset_paths().unwrap();

    assert_eq!(
        paths,
        vec![
            "Characters/hero.prefab",
            "Enemies/enemy.prefab",
            "Textures/hero.png",
        ]
    );
}

#[test]
fn given_listing_when_indexing_then_only_prefabs_included() {
    let store = FsAssetStore::new(assets_dir());

    let index = AssetIndex::build(store.asset_paths().unwrap(), "prefab");

    assert_eq!(index.len(), 2);
    assert_eq!(index.get("hero"), Some("Characters/hero.prefab"));
    assert_eq!(index.get("enemy"), Some("Enemies/enemy.prefab"));
}

#[test]
fn given_missing_root_when_listing_then_error() {
    let temp = TempDir::new().unwrap();
    let store = FsAssetStore::new(temp.path().join("nope"));

    assert!(store.asset_paths().is_err());
}

#[cfg(unix)]
#[test]
fn given_unreadable_subdirectory_when_listing_then_rest_still_listed() {
    use std::os::unix::fs::PermissionsExt;

    // Arrange
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("hero.prefab"), "").unwrap();
    let locked = temp.path().join("Locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("secret.prefab"), "").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::read_dir(&locked).is_ok() {
        // permissions are not enforced for this user
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }
    let store = FsAssetStore::new(temp.path());

    // Act
    let paths = store.asset_paths();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    // Assert
    assert_eq!(paths.unwrap(), vec!["hero.prefab"]);
}

#[test]
fn given_asset_when_loading_as_object_then_found() {
    let store = FsAssetStore::new(assets_dir());

    let loaded = store.load("Characters/hero.prefab", &FieldType::Object);

    assert_eq!(
        loaded,
        Some(AssetRef {
            path: "Characters/hero.prefab".into(),
            type_name: "GameObject".into(),
        })
    );
}

#[test]
fn given_asset_when_loading_as_component_then_requires_listed_component() {
    let store = FsAssetStore::new(assets_dir());

    let animator = store.load(
        "Characters/hero.prefab",
        &FieldType::Component("Animator".into()),
    );
    let rigidbody = store.load(
        "Characters/hero.prefab",
        &FieldType::Component("Rigidbody".into()),
    );

    assert_eq!(animator.map(|a| a.type_name), Some("Animator".to_string()));
    assert!(rigidbody.is_none());
}

#[test]
fn given_non_toml_asset_when_loading_as_component_then_none() {
    // Arrange
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("blob.prefab"), [0xff, 0xfe, 0x00]).unwrap();
    let store = FsAssetStore::new(temp.path());

    // Act
    let loaded = store.load("blob.prefab", &FieldType::Component("Animator".into()));

    // Assert
    assert!(loaded.is_none());
    assert!(store.load("blob.prefab", &FieldType::Object).is_some());
}

#[test]
fn given_missing_asset_when_loading_then_none() {
    let store = FsAssetStore::new(assets_dir());

    assert!(store.load("Characters/villain.prefab", &FieldType::Object).is_none());
}
