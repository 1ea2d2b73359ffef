//! Binding behavior through the public AutoBinder entry point

use std::sync::Arc;

use rstest::rstest;

use autobind::application::services::AutoBinder;
use autobind::domain::{
    bind_descendants, bind_key, classify, AssetIndex, AssetRef, BindAttr, BindOptions,
    BindTarget, BoundValue, ComponentRef, FieldDecl, FieldType, NodeId, SceneArena, TypeDecl,
    TypeRegistry,
};
use autobind::infrastructure::traits::InMemoryAssetStore;
use autobind::util::testing;

fn binder(store: InMemoryAssetStore) -> AutoBinder {
    AutoBinder::new(Arc::new(store), BindOptions::default())
}

fn registry(decls: impl IntoIterator<Item = TypeDecl>) -> TypeRegistry {
    TypeRegistry::from_decls(decls).expect("valid registry")
}

/// Root -> [Weapon, Weapon]
fn twin_weapons() -> (SceneArena, NodeId, NodeId, NodeId) {
    let mut arena = SceneArena::new();
    let root = arena.insert_node("Root", vec![], None);
    let first = arena.insert_node("Weapon", vec![], Some(root));
    let second = arena.insert_node("Weapon", vec![], Some(root));
    (arena, root, first, second)
}

#[test]
fn given_two_same_named_children_when_binding_then_first_child_wins() {
    // Arrange
    testing::init_test_setup();
    let (arena, root, first, _second) = twin_weapons();
    let types = registry([TypeDecl::bindable("View").field(FieldDecl::object("weapon"))]);
    let mut target = BindTarget::new("View", root);

    // Act
    binder(InMemoryAssetStore::new()).bind(&types, &arena, &mut target);

    // Assert
    assert_eq!(target.get("weapon"), Some(&BoundValue::Node(first)));
}

#[test]
fn given_two_same_named_children_when_walking_then_key_consumed() {
    // Arrange
    let (arena, root, first, _second) = twin_weapons();
    let types = registry([TypeDecl::bindable("View").field(FieldDecl::object("weapon"))]);
    let plan = classify(&types, "View", &BindOptions::default());
    let mut target = BindTarget::new("View", root);

    // Act
    let remaining = bind_descendants(&mut target, &arena, root, plan.descendants);

    // Assert
    assert!(!remaining.contains("weapon"));
    assert_eq!(target.get("weapon"), Some(&BoundValue::Node(first)));
}

#[test]
fn given_grandchild_target_when_searching_parent_then_reaches_root() {
    // Arrange: Root -> Child -> Grandchild
    testing::init_test_setup();
    let mut arena = SceneArena::new();
    let root = arena.insert_node("Root", vec![], None);
    let child = arena.insert_node("Child", vec![], Some(root));
    let grandchild = arena.insert_node("Grandchild", vec![], Some(child));
    let types = registry([TypeDecl::bindable("View")
        .field(FieldDecl::object("root").with_bind(BindAttr::parent()))]);
    let mut target = BindTarget::new("View", grandchild);

    // Act
    binder(InMemoryAssetStore::new()).bind(&types, &arena, &mut target);

    // Assert
    assert_eq!(target.get("root"), Some(&BoundValue::Node(root)));
}

#[test]
fn given_same_name_above_and_below_when_binding_then_directions_stay_apart() {
    // Arrange: Panel -> View -> Panel
    let mut arena = SceneArena::new();
    let upper = arena.insert_node("Panel", vec![], None);
    let view = arena.insert_node("View", vec![], Some(upper));
    let lower = arena.insert_node("Panel", vec![], Some(view));
    let types = registry([
        TypeDecl::bindable("Up").field(FieldDecl::object("panel").with_bind(BindAttr::parent())),
        TypeDecl::bindable("Down").field(FieldDecl::object("panel")),
    ]);
    let mut up = BindTarget::new("Up", view);
    let mut down = BindTarget::new("Down", view);

    // Act
    let mut binder = binder(InMemoryAssetStore::new());
    binder.bind(&types, &arena, &mut up);
    binder.bind(&types, &arena, &mut down);

    // Assert
    assert_eq!(up.get("panel"), Some(&BoundValue::Node(upper)));
    assert_eq!(down.get("panel"), Some(&BoundValue::Node(lower)));
}

#[test]
fn given_matched_node_without_component_when_binding_then_previous_value_overwritten() {
    // Arrange
    let mut arena = SceneArena::new();
    let root = arena.insert_node("Root", vec![], None);
    arena.insert_node("Body", vec!["Collider".into()], Some(root));
    let types = registry([TypeDecl::bindable("View")
        .field(FieldDecl::component("body", "Rigidbody"))
        .field(FieldDecl::component("_collider", "Collider"))]);
    let mut target = BindTarget::new("View", root)
        .with_value("body", BoundValue::Stored("Old/Body#Rigidbody".into()));

    // Act
    binder(InMemoryAssetStore::new()).bind(&types, &arena, &mut target);

    // Assert
    assert_eq!(target.get("body"), Some(&BoundValue::Absent));
    assert_eq!(target.get("_collider"), None, "no node named collider");
}

#[test]
fn given_component_on_matched_node_when_binding_then_component_bound() {
    // Arrange
    let mut arena = SceneArena::new();
    let root = arena.insert_node("Root", vec![], None);
    let body = arena.insert_node("_Body", vec!["Rigidbody".into()], Some(root));
    let types = registry([TypeDecl::bindable("View")
        .field(FieldDecl::component("rigid", "Rigidbody").with_bind(BindAttr::named("_BODY")))]);
    let mut target = BindTarget::new("View", root);

    // Act
    binder(InMemoryAssetStore::new()).bind(&types, &arena, &mut target);

    // Assert
    assert_eq!(
        target.get("rigid"),
        Some(&BoundValue::Component(ComponentRef {
            node: body,
            type_name: "Rigidbody".into(),
        }))
    );
}

#[test]
fn given_unmatched_field_when_binding_then_previous_value_kept() {
    // Arrange
    let (arena, root, _, _) = twin_weapons();
    let types = registry([TypeDecl::bindable("View").field(FieldDecl::object("shield"))]);
    let stored = BoundValue::Stored("Root/Shield".into());
    let mut target = BindTarget::new("View", root).with_value("shield", stored.clone());

    // Act
    binder(InMemoryAssetStore::new()).bind(&types, &arena, &mut target);

    // Assert
    assert_eq!(target.get("shield"), Some(&stored));
}

#[test]
fn given_unmarked_type_when_binding_then_target_untouched() {
    // Arrange
    let (arena, root, _, _) = twin_weapons();
    let types = registry([TypeDecl::new("View").field(FieldDecl::object("weapon"))]);
    let mut target = BindTarget::new("View", root);

    // Act
    binder(InMemoryAssetStore::new()).bind(&types, &arena, &mut target);

    // Assert
    assert!(target.fields.is_empty());
}

#[test]
fn given_marker_on_base_type_when_binding_then_derived_type_bound() {
    // Arrange
    let (arena, root, first, _) = twin_weapons();
    let types = registry([
        TypeDecl::bindable("Base").field(FieldDecl::object("weapon")),
        TypeDecl::new("Derived").extends("Base"),
    ]);
    let mut target = BindTarget::new("Derived", root);

    // Act
    binder(InMemoryAssetStore::new()).bind(&types, &arena, &mut target);

    // Assert
    assert_eq!(target.get("weapon"), Some(&BoundValue::Node(first)));
}

#[test]
fn given_ignore_rule_when_binding_then_matching_fields_skipped() {
    // Arrange
    let (arena, root, _, _) = twin_weapons();
    let types = registry([TypeDecl::bindable("View")
        .field(FieldDecl::object("weapon"))
        .ignore_pattern("^weap")]);
    let mut target = BindTarget::new("View", root);

    // Act
    binder(InMemoryAssetStore::new()).bind(&types, &arena, &mut target);

    // Assert
    assert!(target.get("weapon").is_none());
}

#[test]
fn given_fresh_targets_when_binding_repeatedly_then_results_identical() {
    // Arrange
    let mut arena = SceneArena::new();
    let root = arena.insert_node("Root", vec![], None);
    let panel = arena.insert_node("Panel", vec!["Image".into()], Some(root));
    arena.insert_node("Label", vec![], Some(panel));
    let types = registry([TypeDecl::bindable("View")
        .field(FieldDecl::object("label"))
        .field(FieldDecl::component("panel", "Image"))
        .field(FieldDecl::object("heroPrefab"))]);
    let store = InMemoryAssetStore::new().with_asset("Prefabs/hero.prefab", &[]);

    // Act
    let results: Vec<BindTarget> = (0..3)
        .map(|_| {
            let mut target = BindTarget::new("View", root);
            binder(store.clone()).bind(&types, &arena, &mut target);
            target
        })
        .collect();

    // Assert
    assert_eq!(results[0], results[1]);
    assert_eq!(results[1], results[2]);
    assert_eq!(results[0].fields.len(), 3);
}

#[test]
fn given_prefab_suffixed_field_when_binding_then_asset_found_by_stripped_name() {
    // Arrange
    let mut arena = SceneArena::new();
    let root = arena.insert_node("Root", vec![], None);
    let types = registry([TypeDecl::bindable("Spawner")
        .field(FieldDecl::object("_heroPrefab"))
        .field(FieldDecl::component("enemyPrefab", "Rigidbody"))
        .field(FieldDecl::object("bossPrefab"))]);
    let store = InMemoryAssetStore::new()
        .with_asset("Prefabs/Hero.prefab", &[])
        .with_asset("Prefabs/heroprefab.prefab", &[])
        .with_asset("Prefabs/enemy.prefab", &["Collider"])
        .with_asset("Prefabs/boss.asset", &[]);
    let mut target = BindTarget::new("Spawner", root)
        .with_value("bossPrefab", BoundValue::Stored("asset:Old/boss.prefab".into()));

    // Act
    binder(store).bind(&types, &arena, &mut target);

    // Assert
    assert_eq!(
        target.get("_heroPrefab"),
        Some(&BoundValue::Asset(AssetRef {
            path: "Prefabs/Hero.prefab".into(),
            type_name: "GameObject".into(),
        }))
    );
    // Load as Rigidbody fails: assigned as absent
    assert_eq!(target.get("enemyPrefab"), Some(&BoundValue::Absent));
    // Not indexed: untouched
    assert_eq!(
        target.get("bossPrefab"),
        Some(&BoundValue::Stored("asset:Old/boss.prefab".into()))
    );
}

#[test]
fn given_asset_field_matching_node_when_binding_then_asset_step_overwrites() {
    // Arrange
    let mut arena = SceneArena::new();
    let root = arena.insert_node("Root", vec![], None);
    arena.insert_node("HeroPrefab", vec![], Some(root));
    let types = registry([TypeDecl::bindable("Spawner").field(FieldDecl::object("heroPrefab"))]);
    let store = InMemoryAssetStore::new().with_asset("hero.prefab", &[]);
    let mut target = BindTarget::new("Spawner", root);

    // Act
    binder(store).bind(&types, &arena, &mut target);

    // Assert
    assert!(matches!(target.get("heroPrefab"), Some(BoundValue::Asset(a)) if a.path == "hero.prefab"));
}

#[test]
fn given_empty_asset_suffix_when_binding_then_node_binding_not_replaced_by_asset() {
    // Arrange
    let (arena, root, first, _) = twin_weapons();
    let types = registry([TypeDecl::bindable("View").field(FieldDecl::object("weapon"))]);
    let store = InMemoryAssetStore::new().with_asset("Assets/weapon.prefab", &[]);
    let options = BindOptions {
        asset_suffix: String::new(),
        ..BindOptions::default()
    };
    let mut target = BindTarget::new("View", root);

    // Act
    AutoBinder::new(Arc::new(store), options).bind(&types, &arena, &mut target);

    // Assert
    assert_eq!(target.get("weapon"), Some(&BoundValue::Node(first)));
}

#[test]
fn given_duplicate_basenames_when_indexing_then_last_wins() {
    let index = AssetIndex::build(["a/hero.prefab", "b/Hero.prefab"], "prefab");

    assert_eq!(index.len(), 1);
    assert_eq!(index.get("hero"), Some("b/Hero.prefab"));
}

#[rstest]
#[case("_Target", "target")]
#[case("_t", "_t")]
#[case("_ab", "ab")]
#[case("Weapon", "weapon")]
#[case("__double", "_double")]
#[case("HeroPrefab", "heroprefab")]
fn given_field_name_when_deriving_key_then_normalized(#[case] raw: &str, #[case] key: &str) {
    let decl = FieldDecl::new(raw, FieldType::Object);

    assert_eq!(bind_key(&decl, &BindOptions::default()), key);
}

#[rstest]
#[case(Some("Canvas"), "canvas")]
#[case(Some(""), "field")]
#[case(None, "field")]
fn given_explicit_name_when_deriving_key_then_used_if_non_empty(
    #[case] name: Option<&str>,
    #[case] key: &str,
) {
    let decl = FieldDecl::object("_field").with_bind(BindAttr {
        name: name.map(String::from),
        search_parent: false,
    });

    assert_eq!(bind_key(&decl, &BindOptions::default()), key);
}
