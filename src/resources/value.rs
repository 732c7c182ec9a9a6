//! Values carried by resource items

use crate::domain::value_objects::ResourceType;
use crate::xml::XmlElement;

/// A resource is either a whole file or an element of a values document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceValue {
    /// File-backed (`drawable/icon.png`); the item's source is the value.
    File { resource_type: ResourceType },
    /// Value-backed (`<string name="app">`), detached from its document.
    Element {
        resource_type: ResourceType,
        element: XmlElement,
    },
}

impl ResourceValue {
    pub fn file(resource_type: ResourceType) -> Self {
        ResourceValue::File { resource_type }
    }

    pub fn element(resource_type: ResourceType, element: XmlElement) -> Self {
        ResourceValue::Element {
            resource_type,
            element,
        }
    }

    pub fn resource_type(&self) -> ResourceType {
        match self {
            ResourceValue::File { resource_type } | ResourceValue::Element { resource_type, .. } => {
                *resource_type
            }
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, ResourceValue::File { .. })
    }

    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            ResourceValue::Element { element, .. } => Some(element),
            ResourceValue::File { .. } => None,
        }
    }
}
