//! # Schema Validation
//!
//! Pure predicates over the typed tree. Type names are already closed by
//! construction here; what remains are id rules, sibling uniqueness, and the
//! per-type content rules.

use crate::error::{SchemaViolation, Violation};
use crate::kinds::{ComponentType, ElementType, NodeLevel};
use crate::model::{Component, Node, NodeRef, Section, Template};
use std::collections::HashSet;

/// Ids must be non-empty and free of the path separator
pub fn check_id(level: NodeLevel, id: &str) -> Result<(), SchemaViolation> {
    if id.is_empty() || id.contains('/') {
        return Err(SchemaViolation::InvalidId {
            level,
            id: id.to_string(),
        });
    }
    Ok(())
}

/// One violation per id that occurs more than once among siblings
pub fn check_unique_ids<'a>(
    level: NodeLevel,
    ids: impl IntoIterator<Item = &'a str>,
) -> Vec<SchemaViolation> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut violations = Vec::new();

    for id in ids {
        if !seen.insert(id) && reported.insert(id) {
            violations.push(SchemaViolation::DuplicateId {
                level,
                id: id.to_string(),
            });
        }
    }

    violations
}

/// Content rules that depend on the component type
pub fn check_component(component: &Component) -> Vec<SchemaViolation> {
    let mut violations = Vec::new();

    if component.component_type == ComponentType::ProductCard
        && !component
            .elements
            .iter()
            .any(|e| e.element_type() == ElementType::Price)
    {
        violations.push(SchemaViolation::MissingElement {
            component_type: ComponentType::ProductCard,
            required: ElementType::Price,
        });
    }

    violations
}

/// Every violation on this node itself (not its descendants)
pub fn node_violations(node: NodeRef<'_>) -> Vec<SchemaViolation> {
    let mut violations = Vec::new();

    match node {
        NodeRef::Template(t) => {
            if t.id.is_empty() {
                violations.push(SchemaViolation::InvalidId {
                    level: NodeLevel::Template,
                    id: t.id.clone(),
                });
            }
            violations.extend(check_unique_ids(
                NodeLevel::Section,
                t.sections.iter().map(|s| s.id.as_str()),
            ));
        }
        NodeRef::Section(s) => {
            violations.extend(check_id(NodeLevel::Section, &s.id).err());
            violations.extend(check_unique_ids(
                NodeLevel::Component,
                s.components.iter().map(|c| c.id.as_str()),
            ));
        }
        NodeRef::Component(c) => {
            violations.extend(check_id(NodeLevel::Component, &c.id).err());
            violations.extend(check_unique_ids(
                NodeLevel::Element,
                c.elements.iter().map(|e| e.id.as_str()),
            ));
            violations.extend(check_component(c));
        }
        NodeRef::Element(e) => {
            violations.extend(check_id(NodeLevel::Element, &e.id).err());
            violations.extend(e.props.check().err());
        }
    }

    violations
}

/// Fails with the first violation found on `node`
pub fn validate(node: NodeRef<'_>) -> Result<(), SchemaViolation> {
    match node_violations(node).into_iter().next() {
        Some(violation) => Err(violation),
        None => Ok(()),
    }
}

/// Every violation in the whole document, with locations
pub fn validate_tree(template: &Template) -> Vec<Violation> {
    let mut out = Vec::new();
    push_all(&mut out, "", NodeRef::Template(template));
    for (i, section) in template.sections.iter().enumerate() {
        collect_section(&mut out, &format!("/sections/{}", i), section);
    }
    out
}

/// Every violation in a detached subtree, with locations relative to it
pub fn validate_subtree(node: &Node) -> Vec<Violation> {
    let mut out = Vec::new();
    match node {
        Node::Section(section) => collect_section(&mut out, "", section),
        Node::Component(component) => collect_component(&mut out, "", component),
        Node::Element(element) => push_all(&mut out, "", NodeRef::Element(element)),
    }
    out
}

fn collect_section(out: &mut Vec<Violation>, at: &str, section: &Section) {
    push_all(out, at, NodeRef::Section(section));
    for (i, component) in section.components.iter().enumerate() {
        collect_component(out, &format!("{}/components/{}", at, i), component);
    }
}

fn collect_component(out: &mut Vec<Violation>, at: &str, component: &Component) {
    push_all(out, at, NodeRef::Component(component));
    for (i, element) in component.elements.iter().enumerate() {
        push_all(out, &format!("{}/elements/{}", at, i), NodeRef::Element(element));
    }
}

fn push_all(out: &mut Vec<Violation>, at: &str, node: NodeRef<'_>) {
    out.extend(
        node_violations(node)
            .into_iter()
            .map(|violation| Violation::new(at, violation)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::SectionType;
    use crate::model::Element;
    use crate::properties::{ElementProps, PriceProps, PropertyMap, TextProps};

    fn text(id: &str) -> Element {
        Element::new(
            id,
            ElementProps::Text(TextProps {
                text: "x".to_string(),
                extra: PropertyMap::new(),
            }),
        )
    }

    #[test]
    fn test_product_card_requires_price() {
        let card = Component::new("card", ComponentType::ProductCard).with_element(text("name"));
        assert_eq!(
            validate(NodeRef::Component(&card)),
            Err(SchemaViolation::MissingElement {
                component_type: ComponentType::ProductCard,
                required: ElementType::Price,
            })
        );

        let priced = card.with_element(Element::new(
            "price",
            ElementProps::Price(PriceProps {
                amount: 19.0,
                currency: None,
                compare_at: None,
                extra: PropertyMap::new(),
            }),
        ));
        assert!(validate(NodeRef::Component(&priced)).is_ok());
    }

    #[test]
    fn test_duplicate_ids_reported_once_each() {
        let violations = check_unique_ids(NodeLevel::Section, ["a", "b", "a", "a", "b"]);
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_validate_tree_locations() {
        let template = Template::new("t", "T", "T").with_section(
            Section::new("hero", SectionType::HeroSection, "Hero").with_component(
                Component::new("banner", ComponentType::HeroImage)
                    .with_element(text("a"))
                    .with_element(text("a")),
            ),
        );

        let violations = validate_tree(&template);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].location, "/sections/0/components/0");
        assert!(matches!(
            violations[0].violation,
            SchemaViolation::DuplicateId {
                level: NodeLevel::Element,
                ..
            }
        ));
    }

    #[test]
    fn test_ids_cannot_contain_separator() {
        assert!(check_id(NodeLevel::Element, "a/b").is_err());
        assert!(check_id(NodeLevel::Element, "").is_err());
        assert!(check_id(NodeLevel::Element, "hero-title").is_ok());
    }
}
