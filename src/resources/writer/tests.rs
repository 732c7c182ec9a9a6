use super::*;
use crate::domain::value_objects::FileStatus;
use crate::resources::{ResourceKind, ResourceMerger, ResourceSet};
use std::fs;
use tempfile::{tempdir, TempDir};

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Self {
        let project = Self { dir: tempdir().unwrap() };
        project.write(
            "main/values/strings.xml",
            r#"<resources>
    <string name="b">B</string>
    <color name="a">#fff</color>
</resources>"#,
        );
        project.write(
            "main/values-fr/strings.xml",
            r#"<resources><string name="b">Bé</string></resources>"#,
        );
        project.write("main/drawable/icon.png", "main-icon");
        project.write(
            "overlay/values/strings.xml",
            r#"<resources><string name="b">Overlay</string></resources>"#,
        );
        project
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    fn write(&self, relative: &str, content: &str) {
        write(&self.path(relative), content);
    }

    fn out(&self) -> PathBuf {
        self.path("out")
    }

    fn merger(&self) -> ResourceMerger {
        let mut merger = ResourceMerger::new(ResourceKind);
        for name in ["main", "overlay"] {
            let mut set = ResourceSet::new(name, ResourceKind).with_sources([self.path(name)]);
            set.load_from_files().unwrap();
            merger.add_data_set(set);
        }
        merger
    }
}

#[test]
fn values_file_is_sorted_by_type_then_name() {
    let project = Project::new();
    let mut merger = project.merger();
    let mut writer = MergedResourceWriter::new(project.out());
    merger.merge_data(&mut writer, true).unwrap();

    let content = fs::read_to_string(project.out().join("values/values.xml")).unwrap();
    insta::assert_snapshot!(content.trim_end(), @r###"
    <?xml version="1.0" encoding="utf-8"?>
    <resources>
        <color name="a">#fff</color>
        <string name="b">Overlay</string>
    </resources>
    "###);
    assert!(project.out().join("values-fr/values-fr.xml").is_file());
    assert_eq!(
        fs::read_to_string(project.out().join("drawable/icon.png")).unwrap(),
        "main-icon"
    );
}

#[test]
fn only_changed_qualifiers_are_rewritten() {
    let project = Project::new();
    let mut merger = project.merger();
    merger
        .merge_data(&mut MergedResourceWriter::new(project.out()), true)
        .unwrap();

    let fr = project.path("main/values-fr/strings.xml");
    fs::remove_file(&fr).unwrap();
    assert!(merger.update_with(&fr, FileStatus::Removed).unwrap());

    let mut writer = MergedResourceWriter::new(project.out());
    merger.merge_data(&mut writer, true).unwrap();

    assert!(!project.out().join("values-fr").exists());
    assert!(project.out().join("values/values.xml").is_file());
    assert_eq!(writer.stats(), WriteStats { copied: 0, deleted: 1 });
}

#[test]
fn replaced_file_with_same_name_is_not_deleted() {
    let project = Project::new();
    let mut merger = project.merger();
    merger
        .merge_data(&mut MergedResourceWriter::new(project.out()), true)
        .unwrap();

    let overlay_icon = project.path("overlay/drawable/icon.png");
    write(&overlay_icon, "overlay-icon");
    assert!(merger.update_with(&overlay_icon, FileStatus::New).unwrap());
    merger
        .merge_data(&mut MergedResourceWriter::new(project.out()), true)
        .unwrap();
    assert_eq!(
        fs::read_to_string(project.out().join("drawable/icon.png")).unwrap(),
        "overlay-icon"
    );

    fs::remove_file(&overlay_icon).unwrap();
    assert!(merger.update_with(&overlay_icon, FileStatus::Removed).unwrap());
    merger
        .merge_data(&mut MergedResourceWriter::new(project.out()), true)
        .unwrap();
    assert_eq!(
        fs::read_to_string(project.out().join("drawable/icon.png")).unwrap(),
        "main-icon"
    );
}

#[test]
fn styleables_are_written_merged_and_inline_attrs_stay_inside() {
    let project = Project::new();
    project.write(
        "main/values/attrs.xml",
        r#"<resources>
    <declare-styleable name="Widget">
        <attr name="tint" format="color"/>
    </declare-styleable>
</resources>"#,
    );
    project.write(
        "overlay/values/attrs.xml",
        r#"<resources>
    <declare-styleable name="Widget">
        <attr name="size" format="dimension"/>
    </declare-styleable>
</resources>"#,
    );
    let mut merger = project.merger();
    merger
        .merge_data(&mut MergedResourceWriter::new(project.out()), true)
        .unwrap();

    let content = fs::read_to_string(project.out().join("values/values.xml")).unwrap();
    insta::assert_snapshot!(content.trim_end(), @r###"
    <?xml version="1.0" encoding="utf-8"?>
    <resources>
        <color name="a">#fff</color>
        <declare-styleable name="Widget">
            <attr name="tint" format="color"/>
            <attr name="size" format="dimension"/>
        </declare-styleable>
        <string name="b">Overlay</string>
    </resources>
    "###);
}

#[test]
fn clean_up_removes_untracked_outputs() {
    let project = Project::new();
    write(&project.out().join("layout/stale.xml"), "<x/>");
    let mut merger = project.merger();
    merger
        .merge_data(&mut MergedResourceWriter::new(project.out()), true)
        .unwrap();
    assert!(!project.out().join("layout").exists());
    assert!(project.out().join("drawable/icon.png").is_file());
}
