//! Test fixtures - reusable resource content for tests.

/// Two sets of resources, the overlay winning on `app_name`.
pub const RESOURCES_CONFIG: &str = r#"kind = "resources"
output = "build/merged"
blob_dir = "build/blob"

[[sets]]
name = "main"
sources = ["res/main"]

[[sets]]
name = "overlay"
sources = ["res/overlay"]
"#;

pub const MAIN_STRINGS: &str = r#"<resources>
    <string name="app_name">Main</string>
    <string name="welcome">Welcome</string>
    <color name="accent">#ff0000</color>
</resources>"#;

pub const OVERLAY_STRINGS: &str = r#"<resources>
    <string name="app_name">Overlay</string>
</resources>"#;

pub const FRENCH_STRINGS: &str = r#"<resources>
    <string name="welcome">Bienvenue</string>
</resources>"#;

pub const MAIN_ATTRS: &str = r#"<resources>
    <declare-styleable name="Badge">
        <attr name="badgeColor" format="color"/>
    </declare-styleable>
</resources>"#;

pub const OVERLAY_ATTRS: &str = r#"<resources>
    <declare-styleable name="Badge">
        <attr name="badgeSize" format="dimension"/>
        <attr name="badgeColor"/>
    </declare-styleable>
</resources>"#;

/// A standard two-set resource project.
pub fn resource_files() -> Vec<(&'static str, &'static str)> {
    vec![
        ("res/main/values/strings.xml", MAIN_STRINGS),
        ("res/main/values-fr/strings.xml", FRENCH_STRINGS),
        ("res/main/values/attrs.xml", MAIN_ATTRS),
        ("res/main/drawable/icon.png", "main-icon"),
        ("res/main/layout/main.xml", "<LinearLayout/>"),
        ("res/overlay/values/strings.xml", OVERLAY_STRINGS),
        ("res/overlay/values/attrs.xml", OVERLAY_ATTRS),
        ("res/overlay/drawable/icon.png", "overlay-icon"),
    ]
}

/// Two asset sets.
pub const ASSETS_CONFIG: &str = r#"kind = "assets"
output = "build/assets"
blob_dir = "build/asset-blob"

[[sets]]
name = "main"
sources = ["assets/main"]

[[sets]]
name = "overlay"
sources = ["assets/overlay"]
"#;
