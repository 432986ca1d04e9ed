use std::cell::RefCell;
use std::rc::Rc;

use onestyle_core::{DocumentError, HslaAdjustment, PropertyMap, STANDARD_WEIGHTS};
use onestyle_theme::{
    compile, namespaced_key, ConfigStore, DefaultPreset, FileStorage, ImportError, MemoryStorage,
    Storage, StoreConfig,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn open() -> (ConfigStore, MemoryStorage) {
    let storage = MemoryStorage::new();
    let store = ConfigStore::open(storage.clone(), StoreConfig::default());
    (store, storage)
}

fn config_key() -> String {
    let config = StoreConfig::default();
    namespaced_key(&config.namespace, &config.config_key)
}

#[test]
fn starts_from_default_without_persisted_state() {
    let (store, storage) = open();
    assert_eq!(store.document(), &DefaultPreset::One.document());
    assert!(store.overrides().is_empty());
    // Nothing is written until the first mutation.
    assert!(storage.is_empty());
}

#[test]
fn malformed_persisted_state_falls_back_to_default() {
    let mut storage = MemoryStorage::new();
    storage.set(&config_key(), "{\"colors\": oops").unwrap();
    storage.set("onestyle_custom_overrides", "42").unwrap();

    let store = ConfigStore::open(storage, StoreConfig::default());
    assert_eq!(store.document(), &DefaultPreset::One.document());
    assert!(store.overrides().is_empty());
}

#[test]
fn every_mutation_is_persisted_and_reloaded() {
    let (mut store, storage) = open();
    store.create_new_scope("hero", PropertyMap::from([("--one-display", "block")]));
    store.add_custom_override("--one-gap", "3px");

    let reopened = ConfigStore::open(storage, StoreConfig::default());
    assert_eq!(reopened.document(), store.document());
    assert_eq!(reopened.overrides().get("--one-gap").map(String::as_str), Some("3px"));
}

#[test]
fn update_component_replaces_instead_of_merging() {
    let (mut store, _) = open();
    store.update_component("x", PropertyMap::from([("a", "1"), ("b", "2")]));
    store.update_component("x", PropertyMap::from([("a", "1")]));

    assert_eq!(store.document().component("x"), Some(&PropertyMap::from([("a", "1")])));
}

#[test]
fn scope_base_update_replaces_and_keeps_presets() {
    let (mut store, _) = open();
    store.update_scope_base_properties(
        "one-stack",
        PropertyMap::from([("--one-display", "grid")]),
    );

    let scope = store.document().scope("one-stack").unwrap();
    assert_eq!(
        scope.base_properties,
        Some(PropertyMap::from([("--one-display", "grid")]))
    );
    assert!(scope.presets.contains_key("tight"));
}

#[test]
fn sync_adds_missing_components_without_clobbering() {
    let (mut store, _) = open();
    store.update_component("one-button", PropertyMap::from([("--one-button-bg", "red")]));
    store.delete_component("one-card");
    store.update_component("custom", PropertyMap::from([("--one-x", "1")]));

    let added = store.sync_new_components();
    assert_eq!(added, vec!["one-card".to_string()]);

    let doc = store.document();
    assert_eq!(
        doc.component("one-button"),
        Some(&PropertyMap::from([("--one-button-bg", "red")]))
    );
    assert_eq!(
        doc.component("one-card"),
        DefaultPreset::One.document().component("one-card")
    );
    assert!(doc.component("custom").is_some());
    assert!(store.sync_new_components().is_empty());
}

#[test]
fn color_scale_edit_changes_only_that_line() {
    let (mut store, _) = open();
    let before = compile(store.document(), store.overrides());

    let mut scale = store.document().brand_color("color1").unwrap().clone();
    scale.insert("500".to_string(), json!("hsl(10,50%,50%)"));
    store.update_color_scale("color1", scale).unwrap();

    let after = compile(store.document(), store.overrides());
    assert!(after.contains("  --color1-500: hsl(10,50%,50%);\n"));

    let changed: Vec<_> = before
        .lines()
        .zip(after.lines())
        .filter(|(a, b)| a != b)
        .collect();
    assert_eq!(changed, vec![("  --color1-500: #3b82f6;", "  --color1-500: hsl(10,50%,50%);")]);
}

#[test]
fn incomplete_color_scale_is_rejected() {
    let (mut store, _) = open();
    let before = store.export_config();

    let mut scale = store.document().brand_color("color2").unwrap().clone();
    scale.shift_remove("950");
    let err = store.update_color_scale("color2", scale).unwrap_err();
    assert_eq!(
        err,
        DocumentError::IncompleteScale {
            color: "color2".to_string(),
            missing: vec!["950".to_string()],
        }
    );
    assert_eq!(store.export_config(), before);

    let new_slot = STANDARD_WEIGHTS
        .iter()
        .map(|w| (w.to_string(), json!(format!("#{w:0>6}"))))
        .collect();
    store.update_color_scale("color5", new_slot).unwrap();
    assert!(store.document().brand_color("color5").is_some());
}

#[test]
fn deleted_scope_disappears_from_css() {
    let (mut store, _) = open();
    store.create_new_scope("hero", PropertyMap::from([("--one-display", "block")]));
    assert!(compile(store.document(), store.overrides()).contains("[data-scope=\"hero\"]"));

    assert!(store.delete_scope("hero"));
    assert!(!store.delete_scope("hero"));
    assert!(!compile(store.document(), store.overrides()).contains("[data-scope=\"hero\"]"));
}

#[test]
fn create_new_scope_overwrites_existing() {
    let (mut store, _) = open();
    store.create_new_scope("one-stack", PropertyMap::from([("--one-display", "inline")]));

    let scope = store.document().scope("one-stack").unwrap();
    assert!(scope.presets.is_empty());
    assert_eq!(
        scope.base_properties,
        Some(PropertyMap::from([("--one-display", "inline")]))
    );
}

#[test]
fn scope_presets_and_rename() {
    let (mut store, _) = open();
    store.create_new_scope("hero", PropertyMap::from([("--one-gap", "1rem")]));
    assert!(store.set_scope_preset("hero", "wide", PropertyMap::from([("--one-gap", "4rem")])));
    assert!(!store.set_scope_preset("nope", "wide", PropertyMap::new()));

    assert!(store.rename_scope("hero", "banner"));
    assert!(!store.rename_scope("banner", "one-stack"));
    let names: Vec<_> = store.document().scopes.keys().cloned().collect();
    assert_eq!(names, vec!["one-body", "one-stack", "banner"]);

    let resolved = store.document().scope("banner").unwrap().resolve(Some("wide"));
    assert_eq!(resolved.get_str("--one-gap"), Some("4rem"));

    assert!(store.delete_scope_preset("banner", "wide"));
    assert!(!store.delete_scope_preset("banner", "wide"));
}

#[test]
fn color_variations_and_presets() {
    let (mut store, _) = open();
    store.create_color_variation("color1", "muted", "#94a3b8").unwrap();
    store.create_color_preset("faded", HslaAdjustment::new(0.0, -50.0, 30.0, 0.8));

    let css = compile(store.document(), store.overrides());
    assert!(css.contains("  --color1-muted: #94a3b8;\n"));
    assert!(css.contains("  --book-faded: hsla("));

    assert!(store.delete_color_variation("color1", "muted"));
    assert!(!store.document().color_variations.contains_key("color1"));
    assert!(!store.delete_color_variation("color1", "muted"));

    assert!(store.delete_color_preset("faded"));
    assert!(!store.delete_color_preset("faded"));

    store.set_color_book_base(None);
    let css = compile(store.document(), store.overrides());
    assert!(!css.contains("--book-"));
}

#[test]
fn variation_cannot_take_a_weight_name() {
    let (mut store, storage) = open();

    let err = store.create_color_variation("color1", "500", "#000").unwrap_err();
    assert_eq!(
        err,
        DocumentError::ReservedVariation {
            slot: "color1".to_string(),
            name: "500".to_string(),
        }
    );

    // Extra weights of the slot's own scale are reserved too.
    let mut scale = store.document().brand_color("color1").unwrap().clone();
    scale.insert("975".to_string(), json!("#010101"));
    store.update_color_scale("color1", scale).unwrap();
    assert!(store.create_color_variation("color1", "975", "#000").is_err());
    // Another slot's weights are not.
    store.create_color_variation("color2", "975", "#000").unwrap();

    let css = compile(store.document(), store.overrides());
    assert!(css.contains("  --color1-500: #3b82f6;\n"));
    assert!(css.contains("  --color1-975: #010101;\n"));
    assert!(!storage.is_empty());
}

#[test]
fn override_takes_precedence_and_can_be_removed() {
    let (mut store, _) = open();
    store.add_custom_override("--color1-500", "hotpink");
    let css = compile(store.document(), store.overrides());
    assert!(css.contains("  --color1-500: hotpink;\n"));
    assert_eq!(css.matches("--color1-500:").count(), 1);

    assert!(store.remove_custom_override("--color1-500"));
    assert!(!store.remove_custom_override("--color1-500"));
    let css = compile(store.document(), store.overrides());
    assert!(css.contains("  --color1-500: #3b82f6;\n"));
}

#[test]
fn reset_restores_default_and_clears_overrides() {
    let (mut store, storage) = open();
    store.delete_component("one-button");
    store.add_custom_override("--x", "1");

    store.reset_to_default();
    assert_eq!(store.document(), &DefaultPreset::One.document());
    assert!(store.overrides().is_empty());

    let reopened = ConfigStore::open(storage, StoreConfig::default());
    assert_eq!(reopened.document(), &DefaultPreset::One.document());
    assert!(reopened.overrides().is_empty());
}

#[test]
fn bad_import_leaves_state_untouched() {
    let (mut store, _) = open();
    store.add_custom_override("--keep", "me");
    let before = store.export_config();

    let err = store.import_config("{not json").unwrap_err();
    assert!(matches!(err, ImportError::Syntax { .. }));
    assert!(store.import_config("[]").is_err());
    assert_eq!(store.export_config(), before);
}

#[test]
fn import_replaces_whole_document() {
    let (mut store, _) = open();
    let exported = ConfigStore::open(
        MemoryStorage::new(),
        StoreConfig {
            preset: DefaultPreset::Box,
            ..StoreConfig::default()
        },
    )
    .export_config();

    store.import_config(&exported).unwrap();
    assert_eq!(store.document(), &DefaultPreset::Box.document());
}

#[test]
fn subscribers_see_every_change_until_unsubscribed() {
    let (mut store, _) = open();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let sink = Rc::clone(&seen);
    let id = store.subscribe(move |doc, overrides| {
        sink.borrow_mut()
            .push((doc.scopes.len(), overrides.len()));
    });

    store.create_new_scope("hero", PropertyMap::new());
    store.add_custom_override("--a", "1");
    // No-op deletions do not notify.
    store.delete_scope("missing");
    assert!(store.unsubscribe(id));
    assert!(!store.unsubscribe(id));
    store.delete_scope("hero");

    assert_eq!(*seen.borrow(), vec![(3, 0), (3, 1)]);
}

#[test]
fn identical_updates_neither_persist_nor_notify() {
    let (mut store, storage) = open();
    let calls = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&calls);
    store.subscribe(move |_, _| *sink.borrow_mut() += 1);

    let doc = store.document().clone();
    let scale = doc.brand_color("color1").unwrap().clone();
    store.update_color_scale("color1", scale).unwrap();
    store.update_component("one-button", doc.component("one-button").unwrap().clone());
    let stack = doc.scope("one-stack").unwrap();
    store.update_scope_base_properties("one-stack", stack.base_properties.clone().unwrap());
    store.set_scope_preset("one-stack", "tight", stack.presets["tight"].clone());
    for (name, adjustment) in &doc.color_book.presets {
        store.create_color_preset(name, *adjustment);
    }
    store.set_color_book_base(doc.color_book.base.clone());

    assert_eq!(*calls.borrow(), 0);
    assert!(storage.is_empty());

    store.add_custom_override("--a", "1");
    store.add_custom_override("--a", "1");
    store.create_new_scope("hero", PropertyMap::from([("--one-gap", "1px")]));
    store.create_new_scope("hero", PropertyMap::from([("--one-gap", "1px")]));
    store.create_color_variation("color1", "muted", "#ccc").unwrap();
    store.create_color_variation("color1", "muted", "#ccc").unwrap();
    assert_eq!(*calls.borrow(), 3);
}

#[test]
fn persisted_null_weight_keeps_the_document() {
    let mut storage = MemoryStorage::new();
    let mut value = serde_json::to_value(DefaultPreset::One.document()).unwrap();
    value["colors"]["brand"]["color1"]["500"] = serde_json::Value::Null;
    value["scopes"]["hero"] = json!({ "baseProperties": { "--one-display": "block" } });
    storage.set(&config_key(), &value.to_string()).unwrap();

    let store = ConfigStore::open(storage, StoreConfig::default());
    assert!(store.document().scope("hero").is_some());
    assert_eq!(store.document().brand_value("color1", "500"), None);

    let css = compile(store.document(), store.overrides());
    assert!(css.contains("[data-scope=\"hero\"] .one-block {\n"));
    assert!(!css.contains("  --color1-500:"));
    assert!(css.contains("  --color1-400:"));
}

#[test]
fn snapshots_are_immutable() {
    let (mut store, _) = open();
    let snapshot = store.snapshot();
    store.delete_component("one-button");
    assert!(snapshot.component("one-button").is_some());
    assert!(store.document().component("one-button").is_none());
}

#[test]
fn storage_failure_keeps_in_memory_state() {
    let storage = MemoryStorage::new().with_quota(16);
    let mut store = ConfigStore::open(storage.clone(), StoreConfig::default());

    store.create_new_scope("hero", PropertyMap::from([("--one-display", "block")]));
    assert!(store.document().scope("hero").is_some());
    assert!(storage.is_empty());

    // The next session does not see the failed write.
    let reopened = ConfigStore::open(storage, StoreConfig::default());
    assert!(reopened.document().scope("hero").is_none());
}

#[test]
fn file_backend_persists_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig {
        namespace: "site".to_string(),
        ..StoreConfig::default()
    };

    let mut store = ConfigStore::open(FileStorage::new(dir.path()), config.clone());
    store.create_new_scope("hero", PropertyMap::from([("--one-display", "block")]));
    assert!(dir.path().join("site_theme_config.json").exists());

    let reopened = ConfigStore::open(FileStorage::new(dir.path()), config);
    assert!(reopened.document().scope("hero").is_some());
}
