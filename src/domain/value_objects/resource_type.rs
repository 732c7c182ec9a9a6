//! Resource categories and the folder types that hold them

use std::fmt;
use std::str::FromStr;

/// Category of a resource item; the first segment of a resource key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceType {
    Anim,
    Animator,
    Array,
    Attr,
    Bool,
    Color,
    DeclareStyleable,
    Dimen,
    Drawable,
    Fraction,
    Id,
    Integer,
    Interpolator,
    Layout,
    Menu,
    Mipmap,
    Plurals,
    Public,
    Raw,
    String,
    Style,
    Transition,
    Xml,
}

impl ResourceType {
    pub const ALL: [ResourceType; 23] = [
        ResourceType::Anim,
        ResourceType::Animator,
        ResourceType::Array,
        ResourceType::Attr,
        ResourceType::Bool,
        ResourceType::Color,
        ResourceType::DeclareStyleable,
        ResourceType::Dimen,
        ResourceType::Drawable,
        ResourceType::Fraction,
        ResourceType::Id,
        ResourceType::Integer,
        ResourceType::Interpolator,
        ResourceType::Layout,
        ResourceType::Menu,
        ResourceType::Mipmap,
        ResourceType::Plurals,
        ResourceType::Public,
        ResourceType::Raw,
        ResourceType::String,
        ResourceType::Style,
        ResourceType::Transition,
        ResourceType::Xml,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ResourceType::Anim => "anim",
            ResourceType::Animator => "animator",
            ResourceType::Array => "array",
            ResourceType::Attr => "attr",
            ResourceType::Bool => "bool",
            ResourceType::Color => "color",
            ResourceType::DeclareStyleable => "declare-styleable",
            ResourceType::Dimen => "dimen",
            ResourceType::Drawable => "drawable",
            ResourceType::Fraction => "fraction",
            ResourceType::Id => "id",
            ResourceType::Integer => "integer",
            ResourceType::Interpolator => "interpolator",
            ResourceType::Layout => "layout",
            ResourceType::Menu => "menu",
            ResourceType::Mipmap => "mipmap",
            ResourceType::Plurals => "plurals",
            ResourceType::Public => "public",
            ResourceType::Raw => "raw",
            ResourceType::String => "string",
            ResourceType::Style => "style",
            ResourceType::Transition => "transition",
            ResourceType::Xml => "xml",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }

    /// Type declared by an element of a values file.
    ///
    /// `<item>` takes its type from the `type` attribute, so callers pass it
    /// separately.
    pub fn from_value_tag(tag: &str, item_type: Option<&str>) -> Option<Self> {
        match tag {
            "item" => item_type.and_then(Self::from_name),
            "string-array" | "integer-array" => Some(ResourceType::Array),
            "eat-comment" | "skip" => None,
            other => Self::from_name(other),
        }
    }

    /// Whether repeated definitions inside one set are tolerated.
    ///
    /// Inline `attr` declarations are handled by the caller since they
    /// depend on the item, not only its category.
    pub fn tolerates_repetition(&self) -> bool {
        matches!(self, ResourceType::DeclareStyleable | ResourceType::Id)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown resource type '{s}'"))
    }
}

const XML_EXTENSIONS: &[&str] = &[".xml"];
const BITMAP_EXTENSIONS: &[&str] = &[
    ".xml", ".png", ".9.png", ".jpg", ".jpeg", ".gif", ".webp", ".bmp",
];

/// Type of a folder directly under a resource source folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceFolderType {
    Anim,
    Animator,
    Color,
    Drawable,
    Interpolator,
    Layout,
    Menu,
    Mipmap,
    Raw,
    Transition,
    Values,
    Xml,
}

impl ResourceFolderType {
    pub const ALL: [ResourceFolderType; 12] = [
        ResourceFolderType::Anim,
        ResourceFolderType::Animator,
        ResourceFolderType::Color,
        ResourceFolderType::Drawable,
        ResourceFolderType::Interpolator,
        ResourceFolderType::Layout,
        ResourceFolderType::Menu,
        ResourceFolderType::Mipmap,
        ResourceFolderType::Raw,
        ResourceFolderType::Transition,
        ResourceFolderType::Values,
        ResourceFolderType::Xml,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ResourceFolderType::Anim => "anim",
            ResourceFolderType::Animator => "animator",
            ResourceFolderType::Color => "color",
            ResourceFolderType::Drawable => "drawable",
            ResourceFolderType::Interpolator => "interpolator",
            ResourceFolderType::Layout => "layout",
            ResourceFolderType::Menu => "menu",
            ResourceFolderType::Mipmap => "mipmap",
            ResourceFolderType::Raw => "raw",
            ResourceFolderType::Transition => "transition",
            ResourceFolderType::Values => "values",
            ResourceFolderType::Xml => "xml",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }

    /// Split `drawable-hdpi` into its folder type and qualifier string.
    pub fn from_folder_name(folder: &str) -> Option<(Self, &str)> {
        let (head, qualifiers) = match folder.split_once('-') {
            Some((head, rest)) => (head, rest),
            None => (folder, ""),
        };
        Self::from_name(head).map(|t| (t, qualifiers))
    }

    /// Resource type of files stored in this folder; `None` for values.
    pub fn file_resource_type(&self) -> Option<ResourceType> {
        match self {
            ResourceFolderType::Anim => Some(ResourceType::Anim),
            ResourceFolderType::Animator => Some(ResourceType::Animator),
            ResourceFolderType::Color => Some(ResourceType::Color),
            ResourceFolderType::Drawable => Some(ResourceType::Drawable),
            ResourceFolderType::Interpolator => Some(ResourceType::Interpolator),
            ResourceFolderType::Layout => Some(ResourceType::Layout),
            ResourceFolderType::Menu => Some(ResourceType::Menu),
            ResourceFolderType::Mipmap => Some(ResourceType::Mipmap),
            ResourceFolderType::Raw => Some(ResourceType::Raw),
            ResourceFolderType::Transition => Some(ResourceType::Transition),
            ResourceFolderType::Xml => Some(ResourceType::Xml),
            ResourceFolderType::Values => None,
        }
    }

    /// Folder that holds file-backed resources of `resource_type`.
    pub fn for_file_resource(resource_type: ResourceType) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|folder| folder.file_resource_type() == Some(resource_type))
    }

    /// File extensions accepted in this folder; `None` means anything goes.
    pub fn allowed_extensions(&self) -> Option<&'static [&'static str]> {
        match self {
            ResourceFolderType::Raw => None,
            ResourceFolderType::Drawable | ResourceFolderType::Mipmap => Some(BITMAP_EXTENSIONS),
            _ => Some(XML_EXTENSIONS),
        }
    }
}

impl fmt::Display for ResourceFolderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_type_names_round_trip() {
        for t in ResourceType::ALL {
            assert_eq!(ResourceType::from_name(t.name()), Some(t));
        }
        assert_eq!(ResourceType::from_name("nope"), None);
    }

    #[test]
    fn value_tags_map_to_types() {
        assert_eq!(
            ResourceType::from_value_tag("string-array", None),
            Some(ResourceType::Array)
        );
        assert_eq!(
            ResourceType::from_value_tag("item", Some("id")),
            Some(ResourceType::Id)
        );
        assert_eq!(ResourceType::from_value_tag("item", None), None);
        assert_eq!(ResourceType::from_value_tag("eat-comment", None), None);
        assert_eq!(
            ResourceType::from_value_tag("declare-styleable", None),
            Some(ResourceType::DeclareStyleable)
        );
    }

    #[test]
    fn folder_name_splits_qualifiers() {
        assert_eq!(
            ResourceFolderType::from_folder_name("drawable-hdpi"),
            Some((ResourceFolderType::Drawable, "hdpi"))
        );
        assert_eq!(
            ResourceFolderType::from_folder_name("values-en-rUS"),
            Some((ResourceFolderType::Values, "en-rUS"))
        );
        assert_eq!(
            ResourceFolderType::from_folder_name("layout"),
            Some((ResourceFolderType::Layout, ""))
        );
        assert_eq!(ResourceFolderType::from_folder_name("foo-hdpi"), None);
    }

    #[test]
    fn file_folders_map_back_to_types() {
        assert_eq!(
            ResourceFolderType::for_file_resource(ResourceType::Drawable),
            Some(ResourceFolderType::Drawable)
        );
        assert_eq!(ResourceFolderType::for_file_resource(ResourceType::String), None);
    }

    #[test]
    fn only_raw_accepts_any_extension() {
        assert!(ResourceFolderType::Raw.allowed_extensions().is_none());
        assert_eq!(ResourceFolderType::Layout.allowed_extensions(), Some(&[".xml"][..]));
    }
}
