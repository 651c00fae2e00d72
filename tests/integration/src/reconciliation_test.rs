//! End-to-end integration test for the reconciliation flow
//!
//! Exercises the complete path: manifest on disk -> engine copy ->
//! discrepancy reporting -> settings and history persistence.

use std::fs;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use filelist_core::{
    History, HistoryField, HistoryStore, Manifest, Settings, SettingsStore, engine,
};

/// Set up source/destination/lists folders with a manifest naming two
/// files, of which only one exists in the source.
fn setup_workspace() -> TempDir {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source");
    let lists = temp.path().join("lists");
    fs::create_dir_all(&source).unwrap();
    fs::create_dir_all(&lists).unwrap();

    fs::write(source.join("a.txt"), "alpha").unwrap();
    fs::write(
        lists.join("weekly.json"),
        r#"{
  "files": [
    {"filename": "a.txt", "description": "alpha file", "tags": ["weekly"]},
    {"filename": "b.txt"}
  ]
}"#,
    )
    .unwrap();

    temp
}

fn load_list(temp: &TempDir, name: &str) -> Manifest {
    Manifest::load(&temp.path().join("lists").join(name)).unwrap()
}

#[test]
fn copy_then_revalidate_round_trip() {
    let temp = setup_workspace();
    let source = temp.path().join("source");
    let destination = temp.path().join("destination");
    let manifest = load_list(&temp, "weekly.json");

    let result = engine::copy(&manifest, &source, &destination).unwrap();

    assert_eq!(result.copied, 1);
    assert_eq!(
        result.missing_in_destination.iter().collect::<Vec<_>>(),
        ["b.txt"]
    );
    assert_eq!(
        result.missing_in_source.iter().collect::<Vec<_>>(),
        ["b.txt"]
    );

    // The destination now satisfies everything the source could provide
    let missing = engine::validate_destination(&manifest, &destination).unwrap();
    assert_eq!(missing.iter().collect::<Vec<_>>(), ["b.txt"]);

    // Supplying b.txt and re-running converges to a clean destination
    fs::write(source.join("b.txt"), "beta").unwrap();
    let second = engine::copy(&manifest, &source, &destination).unwrap();
    assert_eq!(second.copied, 2);
    assert!(second.missing_in_destination.is_empty());
    assert!(second.is_clean());
}

#[test]
fn generated_manifest_drives_a_full_mirror() {
    let temp = setup_workspace();
    let source = temp.path().join("source");
    let destination = temp.path().join("destination");
    fs::write(source.join("b.txt"), "beta").unwrap();

    // Generate a manifest from the source, persist it, reload it, copy
    let manifest = Manifest::generate_from_folder(&source).unwrap();
    let list_path = temp.path().join("lists").join("generated.json");
    manifest.write(&list_path).unwrap();
    let reloaded = Manifest::load(&list_path).unwrap();
    assert_eq!(reloaded.entries, manifest.entries);

    let result = engine::copy(&reloaded, &source, &destination).unwrap();

    assert_eq!(result.copied, 2);
    assert!(result.is_clean());
    assert!(engine::extra_in_destination(&reloaded, &destination)
        .unwrap()
        .is_empty());
}

#[test]
fn drift_is_reported_without_being_corrected() {
    let temp = setup_workspace();
    let source = temp.path().join("source");
    let destination = temp.path().join("destination");
    let manifest = load_list(&temp, "weekly.json");

    engine::copy(&manifest, &source, &destination).unwrap();
    fs::write(destination.join("c.txt"), "intruder").unwrap();

    let extra = engine::extra_in_destination(&manifest, &destination).unwrap();

    assert_eq!(extra.iter().collect::<Vec<_>>(), ["c.txt"]);
    // Reporting drift never deletes anything
    assert!(destination.join("c.txt").is_file());
}

#[test]
fn settings_and_history_survive_a_session() {
    let temp = setup_workspace();
    let settings_path = temp.path().join("settings.json");
    let history_path = temp.path().join("history.json");

    // First session: configure folders, run a copy, record history
    {
        let store = SettingsStore::new(&settings_path);
        let mut settings = store.load().unwrap();
        assert_eq!(settings, Settings::default());

        let source = temp.path().join("source");
        let destination = temp.path().join("destination");
        store
            .set(&mut settings, "source_folder", source.to_str().unwrap())
            .unwrap();
        store
            .set(
                &mut settings,
                "destination_folder",
                destination.to_str().unwrap(),
            )
            .unwrap();

        let manifest = load_list(&temp, "weekly.json");
        engine::copy(
            &manifest,
            settings.source_folder.as_deref().unwrap(),
            settings.destination_folder.as_deref().unwrap(),
        )
        .unwrap();

        let history_store = HistoryStore::new(&history_path);
        let mut history = History::default();
        history.record(HistoryField::SourceFolder, source.to_str().unwrap());
        history.record(
            HistoryField::DestinationFolder,
            destination.to_str().unwrap(),
        );
        history_store.save(&history).unwrap();
    }

    // Second session: everything is still there
    let settings = SettingsStore::new(&settings_path).load().unwrap();
    assert_eq!(
        settings.source_folder.as_deref(),
        Some(temp.path().join("source").as_path())
    );

    let history = HistoryStore::new(&history_path).load().unwrap();
    assert_eq!(history.source_folder.len(), 1);
    assert_eq!(history.destination_folder.len(), 1);
}

#[test]
fn bare_string_manifest_behaves_like_object_manifest() {
    let temp = setup_workspace();
    let source = temp.path().join("source");
    let destination = temp.path().join("destination");
    let bare_path = temp.path().join("lists").join("bare.json");
    fs::write(
        &bare_path,
        r#"{"description": "simple", "file_list": ["a.txt", "b.txt"]}"#,
    )
    .unwrap();

    let bare = Manifest::load(&bare_path).unwrap();
    let object = load_list(&temp, "weekly.json");

    let bare_result = engine::copy(&bare, &source, &destination).unwrap();
    let object_missing = engine::validate_source(&object, &source).unwrap();

    assert_eq!(bare_result.copied, 1);
    assert_eq!(bare_result.missing_in_source, object_missing);
}

#[test]
fn rewriting_an_unchanged_manifest_is_byte_identical() {
    let temp = setup_workspace();
    let list_path = temp.path().join("lists").join("stable.json");

    let manifest = Manifest::generate_from_folder(&temp.path().join("source")).unwrap();
    manifest.write(&list_path).unwrap();
    let first = fs::read(&list_path).unwrap();

    Manifest::load(&list_path).unwrap().write(&list_path).unwrap();
    let second = fs::read(&list_path).unwrap();

    assert_eq!(first, second);
}

#[test]
fn manifest_is_always_loaded_fresh() {
    let temp = setup_workspace();
    let list_path = temp.path().join("lists").join("weekly.json");
    let source = temp.path().join("source");

    let before = Manifest::load(&list_path).unwrap();
    assert_eq!(before.len(), 2);

    // External tool rewrites the list between operations
    fs::write(&list_path, r#"{"files": [{"filename": "a.txt"}]}"#).unwrap();

    let after = Manifest::load(&list_path).unwrap();
    assert_eq!(after.len(), 1);
    assert!(engine::validate_source(&after, &source).unwrap().is_empty());
}
