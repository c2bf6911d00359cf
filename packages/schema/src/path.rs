//! Parent-scoped node addressing.
//!
//! Ids are only unique among siblings, so every lookup goes through a full
//! path: `sectionId/componentId/elementId`.

use crate::kinds::NodeLevel;
use std::fmt;
use std::str::FromStr;

/// Path to a Section, Component, or Element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodePath {
    Section {
        section: String,
    },
    Component {
        section: String,
        component: String,
    },
    Element {
        section: String,
        component: String,
        element: String,
    },
}

impl NodePath {
    pub fn section(section: impl Into<String>) -> Self {
        NodePath::Section {
            section: section.into(),
        }
    }

    pub fn component(section: impl Into<String>, component: impl Into<String>) -> Self {
        NodePath::Component {
            section: section.into(),
            component: component.into(),
        }
    }

    pub fn element(
        section: impl Into<String>,
        component: impl Into<String>,
        element: impl Into<String>,
    ) -> Self {
        NodePath::Element {
            section: section.into(),
            component: component.into(),
            element: element.into(),
        }
    }

    pub fn level(&self) -> NodeLevel {
        match self {
            NodePath::Section { .. } => NodeLevel::Section,
            NodePath::Component { .. } => NodeLevel::Component,
            NodePath::Element { .. } => NodeLevel::Element,
        }
    }

    pub fn section_id(&self) -> &str {
        match self {
            NodePath::Section { section }
            | NodePath::Component { section, .. }
            | NodePath::Element { section, .. } => section,
        }
    }

    /// Id of the node the path points at
    pub fn leaf_id(&self) -> &str {
        match self {
            NodePath::Section { section } => section,
            NodePath::Component { component, .. } => component,
            NodePath::Element { element, .. } => element,
        }
    }

    pub fn parent(&self) -> ParentPath {
        match self {
            NodePath::Section { .. } => ParentPath::Root,
            NodePath::Component { section, .. } => ParentPath::Section {
                section: section.clone(),
            },
            NodePath::Element {
                section, component, ..
            } => ParentPath::Component {
                section: section.clone(),
                component: component.clone(),
            },
        }
    }

    /// Component path for elements, the path itself otherwise
    pub fn ancestors_and_self(&self) -> Vec<NodePath> {
        match self {
            NodePath::Section { .. } => vec![self.clone()],
            NodePath::Component { section, .. } => {
                vec![NodePath::section(section.clone()), self.clone()]
            }
            NodePath::Element {
                section, component, ..
            } => vec![
                NodePath::section(section.clone()),
                NodePath::component(section.clone(), component.clone()),
                self.clone(),
            ],
        }
    }

    /// True when `self` is `other` or one of its ancestors
    pub fn contains(&self, other: &NodePath) -> bool {
        other.ancestors_and_self().iter().any(|p| p == self)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodePath::Section { section } => write!(f, "{}", section),
            NodePath::Component { section, component } => write!(f, "{}/{}", section, component),
            NodePath::Element {
                section,
                component,
                element,
            } => write!(f, "{}/{}/{}", section, component, element),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPath(pub String);

impl fmt::Display for InvalidPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid node path `{}`", self.0)
    }
}

impl std::error::Error for InvalidPath {}

impl FromStr for NodePath {
    type Err = InvalidPath;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(InvalidPath(s.to_string()));
        }

        match parts.as_slice() {
            [section] => Ok(NodePath::section(*section)),
            [section, component] => Ok(NodePath::component(*section, *component)),
            [section, component, element] => Ok(NodePath::element(*section, *component, *element)),
            _ => Err(InvalidPath(s.to_string())),
        }
    }
}

/// Container a child is inserted into
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParentPath {
    Root,
    Section { section: String },
    Component { section: String, component: String },
}

impl ParentPath {
    /// Level of the children this parent holds
    pub fn child_level(&self) -> NodeLevel {
        match self {
            ParentPath::Root => NodeLevel::Section,
            ParentPath::Section { .. } => NodeLevel::Component,
            ParentPath::Component { .. } => NodeLevel::Element,
        }
    }

    pub fn child(&self, id: impl Into<String>) -> NodePath {
        match self {
            ParentPath::Root => NodePath::section(id),
            ParentPath::Section { section } => NodePath::component(section.clone(), id),
            ParentPath::Component { section, component } => {
                NodePath::element(section.clone(), component.clone(), id)
            }
        }
    }

    /// The parent as a node path, `None` for the template root
    pub fn as_node(&self) -> Option<NodePath> {
        match self {
            ParentPath::Root => None,
            ParentPath::Section { section } => Some(NodePath::section(section.clone())),
            ParentPath::Component { section, component } => {
                Some(NodePath::component(section.clone(), component.clone()))
            }
        }
    }
}

impl fmt::Display for ParentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_node() {
            Some(path) => write!(f, "{}", path),
            None => f.write_str("/"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() -> anyhow::Result<()> {
        let path: NodePath = "header/navbar/logo".parse()?;
        assert_eq!(path, NodePath::element("header", "navbar", "logo"));
        assert_eq!(path.to_string(), "header/navbar/logo");
        assert_eq!(path.leaf_id(), "logo");
        assert_eq!(path.level(), NodeLevel::Element);
        Ok(())
    }

    #[test]
    fn test_rejects_empty_segments() {
        assert!("header//logo".parse::<NodePath>().is_err());
        assert!("".parse::<NodePath>().is_err());
        assert!("a/b/c/d".parse::<NodePath>().is_err());
    }

    #[test]
    fn test_contains() {
        let section = NodePath::section("hero");
        let element = NodePath::element("hero", "banner", "title");
        assert!(section.contains(&element));
        assert!(element.contains(&element));
        assert!(!element.contains(&section));
        assert!(!NodePath::section("footer").contains(&element));
    }

    #[test]
    fn test_parent_round_trip() {
        let element = NodePath::element("hero", "banner", "title");
        assert_eq!(element.parent().child("title"), element);
        assert_eq!(NodePath::section("hero").parent(), ParentPath::Root);
    }
}
