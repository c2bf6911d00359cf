//! # Document Model
//!
//! The page tree: Template → Sections → Components → Elements.
//!
//! Every parent owns its children exclusively and child order is render
//! order. Ids are unique among siblings only, so lookups take the full path
//! (see [`NodePath`]). Each level carries an `extra` map holding fields this
//! version does not model, so documents written by newer clients keep them.

use crate::error::SchemaViolation;
use crate::kinds::{ComponentType, EditableType, ElementType, NodeLevel, SectionType};
use crate::path::NodePath;
use crate::properties::{ElementProps, PropertyMap};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Theme colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Colors {
    pub primary: String,
    pub secondary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(flatten)]
    pub extra: PropertyMap,
}

/// Vertical rhythm of a section
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Spacing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub between: Option<String>,
    #[serde(flatten)]
    pub extra: PropertyMap,
}

/// Leaf content node
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: String,
    pub props: ElementProps,
    pub extra: PropertyMap,
}

impl Element {
    pub fn new(id: impl Into<String>, props: ElementProps) -> Self {
        Self {
            id: id.into(),
            props,
            extra: PropertyMap::new(),
        }
    }

    pub fn element_type(&self) -> ElementType {
        self.props.element_type()
    }

    pub fn property(&self, key: &str) -> Option<Value> {
        self.props.get(key)
    }

    /// Set one property, returning the previous value. On error the element
    /// is unchanged.
    pub fn set_property(&mut self, key: &str, value: Value) -> Result<Option<Value>, SchemaViolation> {
        let previous = self.props.get(key);
        self.props = self.props.with_property(key, value)?;
        Ok(previous)
    }
}

/// Named block of elements
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub id: String,
    pub component_type: ComponentType,
    pub editable: Option<EditableType>,
    pub properties: Option<PropertyMap>,
    pub elements: Vec<Element>,
    pub extra: PropertyMap,
}

impl Component {
    pub fn new(id: impl Into<String>, component_type: ComponentType) -> Self {
        Self {
            id: id.into(),
            component_type,
            editable: None,
            properties: None,
            elements: Vec::new(),
            extra: PropertyMap::new(),
        }
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub fn property(&self, key: &str) -> Option<Value> {
        self.properties.as_ref().and_then(|p| p.get(key).cloned())
    }

    /// Components only carry free-form properties; `Value::Null` removes a key
    pub fn set_property(&mut self, key: &str, value: Value) -> Result<Option<Value>, SchemaViolation> {
        Ok(set_free_form(&mut self.properties, key, value))
    }
}

/// Horizontal page region
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: String,
    pub section_type: SectionType,
    pub name: String,
    pub editable: Option<EditableType>,
    pub background: Option<String>,
    pub spacing: Option<Spacing>,
    pub properties: Option<PropertyMap>,
    pub components: Vec<Component>,
    pub extra: PropertyMap,
}

impl Section {
    /// Keys stored in typed fields rather than the free-form map
    pub const TYPED_KEYS: &'static [&'static str] = &["name", "background", "spacing"];

    pub fn new(id: impl Into<String>, section_type: SectionType, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            section_type,
            name: name.into(),
            editable: None,
            background: None,
            spacing: None,
            properties: None,
            components: Vec::new(),
            extra: PropertyMap::new(),
        }
    }

    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn component_mut(&mut self, id: &str) -> Option<&mut Component> {
        self.components.iter_mut().find(|c| c.id == id)
    }

    pub fn property(&self, key: &str) -> Option<Value> {
        match key {
            "name" => Some(Value::String(self.name.clone())),
            "background" => self.background.clone().map(Value::String),
            "spacing" => self
                .spacing
                .as_ref()
                .and_then(|s| serde_json::to_value(s).ok()),
            _ => self.properties.as_ref().and_then(|p| p.get(key).cloned()),
        }
    }

    /// `name`, `background` and `spacing` are typed; any other key lands in
    /// the free-form `properties` map. On error the section is unchanged.
    pub fn set_property(&mut self, key: &str, value: Value) -> Result<Option<Value>, SchemaViolation> {
        let previous = self.property(key);
        let node_type = self.section_type.as_str();
        let invalid = |message: &str| SchemaViolation::InvalidProperty {
            node_type,
            key: key.to_string(),
            message: message.to_string(),
        };

        match key {
            "name" => match value {
                Value::String(name) => self.name = name,
                _ => return Err(invalid("must be a string")),
            },
            "background" => match value {
                Value::String(background) => self.background = Some(background),
                Value::Null => self.background = None,
                _ => return Err(invalid("must be a string or null")),
            },
            "spacing" => {
                if value.is_null() {
                    self.spacing = None;
                } else {
                    let spacing: Spacing = serde_json::from_value(value)
                        .map_err(|e| invalid(&e.to_string()))?;
                    self.spacing = Some(spacing);
                }
            }
            _ => {
                set_free_form(&mut self.properties, key, value);
            }
        }

        Ok(previous)
    }
}

/// Set or (with `Value::Null`) remove a free-form property. A map emptied by
/// removal goes back to `None`.
fn set_free_form(properties: &mut Option<PropertyMap>, key: &str, value: Value) -> Option<Value> {
    if value.is_null() {
        let map = properties.as_mut()?;
        let previous = map.remove(key);
        if map.is_empty() {
            *properties = None;
        }
        previous
    } else {
        properties
            .get_or_insert_with(PropertyMap::new)
            .insert(key.to_string(), value)
    }
}

/// Document root
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub thumbnail: Option<String>,
    pub logo_url: Option<String>,
    pub colors: Option<Colors>,
    pub metadata: Option<PropertyMap>,
    pub sections: Vec<Section>,
    pub extra: PropertyMap,
}

impl Template {
    pub fn new(id: impl Into<String>, name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            title: title.into(),
            description: None,
            category: None,
            thumbnail: None,
            logo_url: None,
            colors: None,
            metadata: None,
            sections: Vec::new(),
            extra: PropertyMap::new(),
        }
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn section_mut(&mut self, id: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == id)
    }

    pub fn component(&self, section: &str, component: &str) -> Option<&Component> {
        self.section(section)?.component(component)
    }

    pub fn component_mut(&mut self, section: &str, component: &str) -> Option<&mut Component> {
        self.section_mut(section)?.component_mut(component)
    }

    pub fn element(&self, section: &str, component: &str, element: &str) -> Option<&Element> {
        self.component(section, component)?.element(element)
    }

    pub fn element_mut(
        &mut self,
        section: &str,
        component: &str,
        element: &str,
    ) -> Option<&mut Element> {
        self.component_mut(section, component)?.element_mut(element)
    }

    /// Follow `path` down the tree
    pub fn resolve(&self, path: &NodePath) -> Option<NodeRef<'_>> {
        match path {
            NodePath::Section { section } => self.section(section).map(NodeRef::Section),
            NodePath::Component { section, component } => {
                self.component(section, component).map(NodeRef::Component)
            }
            NodePath::Element {
                section,
                component,
                element,
            } => self.element(section, component, element).map(NodeRef::Element),
        }
    }

    pub fn contains(&self, path: &NodePath) -> bool {
        self.resolve(path).is_some()
    }

    /// Index of the node within its parent's children
    pub fn position(&self, path: &NodePath) -> Option<usize> {
        match path {
            NodePath::Section { section } => self.sections.iter().position(|s| &s.id == section),
            NodePath::Component { section, component } => self
                .section(section)?
                .components
                .iter()
                .position(|c| &c.id == component),
            NodePath::Element {
                section,
                component,
                element,
            } => self
                .component(section, component)?
                .elements
                .iter()
                .position(|e| &e.id == element),
        }
    }

    /// Nearest editability override on the path, `Editable` when none is set.
    /// `None` when the path does not resolve.
    pub fn effective_editable(&self, path: &NodePath) -> Option<EditableType> {
        let section = self.section(path.section_id())?;
        let component = match path {
            NodePath::Section { .. } => None,
            NodePath::Component { component, .. } | NodePath::Element { component, .. } => {
                Some(section.component(component)?)
            }
        };
        if let NodePath::Element { element, .. } = path {
            component.and_then(|c| c.element(element))?;
        }

        Some(
            component
                .and_then(|c| c.editable)
                .or(section.editable)
                .unwrap_or_default(),
        )
    }

    /// Paths of every component with this id, optionally limited to one section
    pub fn component_paths(&self, id: &str, within_section: Option<&str>) -> Vec<NodePath> {
        self.sections
            .iter()
            .filter(|s| within_section.map_or(true, |scope| s.id == scope))
            .flat_map(|s| {
                s.components
                    .iter()
                    .filter(|c| c.id == id)
                    .map(|c| NodePath::component(s.id.clone(), c.id.clone()))
            })
            .collect()
    }

    /// Paths of every element with this id, optionally limited to one section
    pub fn element_paths(&self, id: &str, within_section: Option<&str>) -> Vec<NodePath> {
        let mut paths = Vec::new();
        for section in &self.sections {
            if within_section.is_some_and(|scope| section.id != scope) {
                continue;
            }
            for component in &section.components {
                for element in component.elements.iter().filter(|e| e.id == id) {
                    paths.push(NodePath::element(
                        section.id.clone(),
                        component.id.clone(),
                        element.id.clone(),
                    ));
                }
            }
        }
        paths
    }
}

/// Owned subtree detached from (or about to be inserted into) a template
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Section(Section),
    Component(Component),
    Element(Element),
}

impl Node {
    pub fn id(&self) -> &str {
        match self {
            Node::Section(s) => &s.id,
            Node::Component(c) => &c.id,
            Node::Element(e) => &e.id,
        }
    }

    pub fn level(&self) -> NodeLevel {
        match self {
            Node::Section(_) => NodeLevel::Section,
            Node::Component(_) => NodeLevel::Component,
            Node::Element(_) => NodeLevel::Element,
        }
    }

    pub fn as_node_ref(&self) -> NodeRef<'_> {
        match self {
            Node::Section(s) => NodeRef::Section(s),
            Node::Component(c) => NodeRef::Component(c),
            Node::Element(e) => NodeRef::Element(e),
        }
    }
}

/// Borrowed view of any node in the tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'a> {
    Template(&'a Template),
    Section(&'a Section),
    Component(&'a Component),
    Element(&'a Element),
}

impl<'a> NodeRef<'a> {
    /// The free-form map a write of `key` lands in. `None` when `key` has a
    /// typed slot on this node.
    pub fn free_form(&self, key: &str) -> Option<&'a Option<PropertyMap>> {
        match *self {
            NodeRef::Section(s) if !Section::TYPED_KEYS.contains(&key) => Some(&s.properties),
            NodeRef::Component(c) => Some(&c.properties),
            _ => None,
        }
    }

    pub fn id(&self) -> &'a str {
        match self {
            NodeRef::Template(t) => &t.id,
            NodeRef::Section(s) => &s.id,
            NodeRef::Component(c) => &c.id,
            NodeRef::Element(e) => &e.id,
        }
    }

    pub fn level(&self) -> NodeLevel {
        match self {
            NodeRef::Template(_) => NodeLevel::Template,
            NodeRef::Section(_) => NodeLevel::Section,
            NodeRef::Component(_) => NodeLevel::Component,
            NodeRef::Element(_) => NodeLevel::Element,
        }
    }

    /// Name of the node's type, as written in documents
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeRef::Template(_) => "Template",
            NodeRef::Section(s) => s.section_type.as_str(),
            NodeRef::Component(c) => c.component_type.as_str(),
            NodeRef::Element(e) => e.element_type().as_str(),
        }
    }

    pub fn property(&self, key: &str) -> Option<Value> {
        match self {
            NodeRef::Template(_) => None,
            NodeRef::Section(s) => s.property(key),
            NodeRef::Component(c) => c.property(key),
            NodeRef::Element(e) => e.property(key),
        }
    }

    /// The node's own override (elements never carry one)
    pub fn editable(&self) -> Option<EditableType> {
        match self {
            NodeRef::Section(s) => s.editable,
            NodeRef::Component(c) => c.editable,
            NodeRef::Template(_) | NodeRef::Element(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::{HeadingProps, TextProps};
    use serde_json::json;

    fn heading(id: &str, text: &str) -> Element {
        Element::new(
            id,
            ElementProps::Heading(HeadingProps {
                text: text.to_string(),
                level: Some(1),
                align: None,
                extra: PropertyMap::new(),
            }),
        )
    }

    fn sample() -> Template {
        let mut locked = Component::new("quote", ComponentType::Testimonial);
        locked.editable = Some(EditableType::LockedEdit);
        locked.elements.push(Element::new(
            "body",
            ElementProps::Text(TextProps {
                text: "Great".to_string(),
                extra: PropertyMap::new(),
            }),
        ));

        Template::new("t", "Test", "Test")
            .with_section(
                Section::new("hero", SectionType::HeroSection, "Hero").with_component(
                    Component::new("banner", ComponentType::HeroImage)
                        .with_element(heading("title", "Hi")),
                ),
            )
            .with_section(
                Section::new("quotes", SectionType::TestimonialsSection, "Quotes")
                    .with_component(locked)
                    .with_component(Component::new("banner", ComponentType::HeroImage)),
            )
    }

    #[test]
    fn test_resolve_is_scoped_by_parent() {
        let template = sample();
        let a = template.resolve(&NodePath::component("hero", "banner")).unwrap();
        let b = template.resolve(&NodePath::component("quotes", "banner")).unwrap();
        assert_ne!(a, b);
        assert!(template.resolve(&NodePath::element("quotes", "banner", "title")).is_none());
    }

    #[test]
    fn test_effective_editable_inherits_from_component() {
        let template = sample();
        assert_eq!(
            template.effective_editable(&NodePath::element("quotes", "quote", "body")),
            Some(EditableType::LockedEdit)
        );
        assert_eq!(
            template.effective_editable(&NodePath::element("hero", "banner", "title")),
            Some(EditableType::Editable)
        );
        assert_eq!(
            template.effective_editable(&NodePath::element("hero", "banner", "missing")),
            None
        );
    }

    #[test]
    fn test_component_paths_reports_every_parent() {
        let template = sample();
        assert_eq!(template.component_paths("banner", None).len(), 2);
        assert_eq!(
            template.component_paths("banner", Some("quotes")),
            vec![NodePath::component("quotes", "banner")]
        );
    }

    #[test]
    fn test_section_property_dispatch() {
        let mut section = Section::new("hero", SectionType::HeroSection, "Hero");

        section.set_property("background", json!("#111")).unwrap();
        section.set_property("spacing", json!({ "top": "4rem" })).unwrap();
        section.set_property("layout", json!("split")).unwrap();

        assert_eq!(section.background.as_deref(), Some("#111"));
        assert_eq!(section.spacing.as_ref().and_then(|s| s.top.as_deref()), Some("4rem"));
        assert_eq!(section.property("layout"), Some(json!("split")));

        let before = section.clone();
        assert!(section.set_property("name", json!(42)).is_err());
        assert_eq!(section, before);
    }

    #[test]
    fn test_removing_last_free_form_key_restores_none() -> anyhow::Result<()> {
        let mut component = Component::new("banner", ComponentType::HeroImage);
        component.set_property("overlay", json!(0.4))?;
        assert_eq!(component.property("overlay"), Some(json!(0.4)));

        let previous = component.set_property("overlay", Value::Null)?;
        assert_eq!(previous, Some(json!(0.4)));
        assert_eq!(component.properties, None);
        Ok(())
    }

    #[test]
    fn test_free_form_target_skips_typed_keys() {
        let template = sample();
        let hero = template.resolve(&NodePath::section("hero")).unwrap();
        assert!(hero.free_form("background").is_none());
        assert_eq!(hero.free_form("layout"), Some(&None));

        let title = template
            .resolve(&NodePath::element("hero", "banner", "title"))
            .unwrap();
        assert!(title.free_form("text").is_none());
    }

    #[test]
    fn test_element_set_property_returns_previous() {
        let mut element = heading("title", "Hi");
        let previous = element.set_property("text", json!("Welcome")).unwrap();
        assert_eq!(previous, Some(json!("Hi")));
        assert_eq!(element.property("text"), Some(json!("Welcome")));
    }
}
