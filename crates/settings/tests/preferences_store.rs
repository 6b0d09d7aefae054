use jnotepad_settings::{Preferences, PreferencesStore};
use std::fs;
use tempfile::tempdir;

#[test]
fn load_missing_file_returns_defaults() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("preferences.json");

    let store = PreferencesStore::load(&path).expect("load defaults");
    assert_eq!(store.preferences().ui.language, "en");
    assert_eq!(store.preferences().window.width, 600.0);
    assert_eq!(store.preferences().window.height, 600.0);
}

#[test]
fn save_and_reload_roundtrip() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("nested").join("preferences.json");

    let mut store = PreferencesStore::new(path.clone(), Preferences::default());
    store
        .update(|prefs| {
            prefs.ui.language = "hr".to_string();
            prefs.window.width = 800.0;
        })
        .expect("save");

    let reloaded = PreferencesStore::load(&path).expect("reload");
    assert_eq!(reloaded.preferences().ui.language, "hr");
    assert_eq!(reloaded.preferences().window.width, 800.0);
    assert!(!path.with_extension("tmp").exists());
}

#[test]
fn legacy_version_is_upgraded_on_load() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("preferences.json");
    fs::write(
        &path,
        r#"{
            "version": 0,
            "ui": { "language": "" }
        }"#,
    )
    .expect("write legacy prefs");

    let store = PreferencesStore::load(&path).expect("load legacy file");
    let prefs = store.preferences();
    assert_eq!(prefs.version, 1, "legacy preferences should be upgraded");
    assert_eq!(prefs.ui.language, "en", "empty language falls back to English");
    assert_eq!(prefs.window.height, 600.0, "missing window section uses defaults");
}

#[test]
fn corrupt_file_is_reported_and_replaced_by_defaults() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("preferences.json");
    fs::write(&path, "{ not json").expect("write corrupt prefs");

    assert!(PreferencesStore::load(&path).is_err());
    let store = PreferencesStore::load_or_default(&path);
    assert_eq!(store.preferences(), &Preferences::default());
    assert_eq!(store.path(), path.as_path());
}
