use super::*;
use crate::domain::value_objects::FileStatus;
use crate::resources::{ResourceKind, ResourceMerger, ResourceSet};
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn config(qualifiers: &str) -> FolderConfiguration {
    FolderConfiguration::from_qualifier_str(qualifiers).unwrap()
}

fn fixture() -> (TempDir, ResourceMerger, ResourceRepository) {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "main/values/strings.xml", r#"<resources><string name="app">App</string></resources>"#);
    write(root, "main/values-fr/strings.xml", r#"<resources><string name="app">Appli</string></resources>"#);
    write(
        root,
        "main/values-fr-rCA/strings.xml",
        r#"<resources><string name="app">Appli CA</string></resources>"#,
    );
    write(
        root,
        "main/values/dimens.xml",
        r#"<resources>
    <dimen name="margin"> 8dp </dimen>
    <declare-styleable name="Widget"><attr name="tint" format="color"/></declare-styleable>
</resources>"#,
    );
    write(root, "main/values-land/dimens.xml", r#"<resources><dimen name="margin">16dp</dimen></resources>"#);
    write(root, "main/drawable/icon.png", "mdpi");
    write(root, "main/drawable-hdpi/icon.png", "hdpi");
    write(
        root,
        "overlay/values/strings.xml",
        r#"<resources><string name="app">It\'s  overlay</string></resources>"#,
    );

    let mut merger = ResourceMerger::new(ResourceKind);
    for name in ["main", "overlay"] {
        let mut set = ResourceSet::new(name, ResourceKind).with_sources([root.join(name)]);
        set.load_from_files().unwrap();
        merger.add_data_set(set);
    }
    let mut repository = ResourceRepository::new();
    merger.merge_data(&mut repository, false).unwrap();
    (dir, merger, repository)
}

#[test]
fn strings_resolve_by_locale_with_overlay_default() {
    let (_dir, _merger, repository) = fixture();
    let value = |q: &str| repository.configured_value(ResourceType::String, "app", &config(q));
    assert_eq!(value("").as_deref(), Some("It's overlay"));
    assert_eq!(value("de").as_deref(), Some("It's overlay"));
    assert_eq!(value("fr").as_deref(), Some("Appli"));
    assert_eq!(value("fr-rCA").as_deref(), Some("Appli CA"));
    assert_eq!(repository.resource_items(ResourceType::String, "app").len(), 3);
}

#[test]
fn non_string_values_are_trimmed_and_match_orientation() {
    let (_dir, _merger, repository) = fixture();
    let value = |q: &str| repository.configured_value(ResourceType::Dimen, "margin", &config(q));
    assert_eq!(value("").as_deref(), Some("8dp"));
    assert_eq!(value("land").as_deref(), Some("16dp"));
    assert_eq!(value("port").as_deref(), Some("8dp"));
}

#[test]
fn files_resolve_by_density() {
    let (_dir, _merger, repository) = fixture();
    let file = repository
        .matching_file("icon", ResourceType::Drawable, &config("hdpi"))
        .unwrap();
    assert!(file.ends_with("drawable-hdpi/icon.png"));
    assert!(repository
        .matching_file("missing", ResourceType::Drawable, &config(""))
        .is_none());
}

#[test]
fn urls_and_types() {
    let (_dir, _merger, repository) = fixture();
    assert!(repository.has_resource_url("@string/app"));
    assert!(repository.has_resource_url("@drawable/icon"));
    assert!(!repository.has_resource_url("@+id/missing"));
    assert!(!repository.has_resource_url("@android:string/ok"));
    assert!(!repository.has_resource_url("string/app"));
    assert_eq!(
        repository.available_types(),
        [
            ResourceType::Attr,
            ResourceType::DeclareStyleable,
            ResourceType::Dimen,
            ResourceType::Drawable,
            ResourceType::String,
        ]
    );
    assert_eq!(repository.items_of_type(ResourceType::Drawable).len(), 2);
}

#[test]
fn locales_are_collected_from_qualifiers() {
    let (_dir, _merger, repository) = fixture();
    assert_eq!(repository.languages(), BTreeSet::from(["fr".to_string()]));
    assert_eq!(repository.regions("fr"), BTreeSet::from(["CA".to_string()]));
    assert!(repository.regions("de").is_empty());
}

#[test]
fn configured_resources_pick_one_item_per_name() {
    let (_dir, _merger, repository) = fixture();
    let strings = repository.configured_resources(ResourceType::String, &config("fr"));
    assert_eq!(strings.len(), 1);
    assert_eq!(strings["app"].qualifiers(), "fr");
}

#[test]
fn incremental_merges_keep_the_index_current() {
    let (dir, mut merger, mut repository) = fixture();
    let canadian = dir.path().join("main/values-fr-rCA/strings.xml");
    fs::remove_file(&canadian).unwrap();
    assert!(merger.update_with(&canadian, FileStatus::Removed).unwrap());
    merger.merge_data(&mut repository, false).unwrap();

    assert_eq!(repository.resource_items(ResourceType::String, "app").len(), 2);
    assert!(repository.regions("fr").is_empty());
    assert_eq!(
        repository
            .configured_value(ResourceType::String, "app", &config("fr-rCA"))
            .as_deref(),
        Some("Appli")
    );
}
