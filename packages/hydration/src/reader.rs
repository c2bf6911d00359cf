//! Serialized layout → live tree.
//!
//! The reader keeps going after a bad field so the caller gets the full list
//! of problems. A node is only materialised when all of its own fields are
//! valid; its children are still visited either way.

use crate::HydrationError;
use pagecraft_schema::validate::{check_component, check_id, check_unique_ids};
use pagecraft_schema::{
    Colors, Component, ComponentType, EditableType, Element, ElementProps, ElementType,
    NodeLevel, PropertyMap, SchemaViolation, Section, SectionType, Spacing, Template, Violation,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

const TEMPLATE_FIELDS: &[&str] = &[
    "id",
    "name",
    "title",
    "description",
    "category",
    "thumbnail",
    "logoUrl",
    "colors",
    "metadata",
    "sections",
];
const SECTION_FIELDS: &[&str] = &[
    "id",
    "type",
    "name",
    "editable",
    "background",
    "spacing",
    "properties",
    "components",
];
const COMPONENT_FIELDS: &[&str] = &["id", "type", "editable", "properties", "elements"];
const ELEMENT_FIELDS: &[&str] = &["id", "type", "properties"];

/// Hydrate a stored template. Fails with every violation found.
pub fn deserialize(value: &Value) -> Result<Template, HydrationError> {
    let mut reader = Reader::default();
    let template = reader.template("", value);
    reader.finish(template)
}

#[derive(Default)]
pub(crate) struct Reader {
    violations: Vec<Violation>,
}

impl Reader {
    pub(crate) fn finish<T>(self, value: Option<T>) -> Result<T, HydrationError> {
        match value {
            Some(value) if self.violations.is_empty() => Ok(value),
            _ => Err(HydrationError::Invalid(self.violations)),
        }
    }

    pub(crate) fn report(&mut self, at: &str, violation: SchemaViolation) {
        self.violations.push(Violation::new(at, violation));
    }

    pub(crate) fn template(&mut self, at: &str, value: &Value) -> Option<Template> {
        let obj = self.object(at, NodeLevel::Template, value)?;

        let id = self.required_str(at, NodeLevel::Template, obj, "id");
        if id.as_deref() == Some("") {
            self.report(
                at,
                SchemaViolation::InvalidId {
                    level: NodeLevel::Template,
                    id: String::new(),
                },
            );
        }
        let name = self.required_str(at, NodeLevel::Template, obj, "name");
        let title = self.required_str(at, NodeLevel::Template, obj, "title");
        let description = self.optional_str(at, obj, "description");
        let category = self.optional_str(at, obj, "category");
        let thumbnail = self.optional_str(at, obj, "thumbnail");
        let logo_url = self.optional_str(at, obj, "logoUrl");
        let colors: Option<Colors> = self.optional_record(at, obj, "colors");
        let metadata = self.optional_object(at, obj, "metadata");

        let raw_sections = self.children(at, NodeLevel::Template, obj, "sections");
        let sections_at = format!("{}/sections", at);
        self.unique_ids(&sections_at, NodeLevel::Section, raw_sections);
        let sections: Vec<Section> = raw_sections
            .iter()
            .enumerate()
            .filter_map(|(i, raw)| self.section(&format!("{}/{}", sections_at, i), raw))
            .collect();
        let complete = sections.len() == raw_sections.len();

        let template = Template {
            id: id?,
            name: name?,
            title: title?,
            description,
            category,
            thumbnail,
            logo_url,
            colors,
            metadata,
            sections,
            extra: extra_fields(obj, TEMPLATE_FIELDS),
        };
        complete.then_some(template)
    }

    fn section(&mut self, at: &str, value: &Value) -> Option<Section> {
        let obj = self.object(at, NodeLevel::Section, value)?;

        let id = self.node_id(at, NodeLevel::Section, obj);
        let section_type = self.kind::<SectionType>(at, NodeLevel::Section, obj);
        let name = self.required_str(at, NodeLevel::Section, obj, "name");
        let editable = self.editable(at, obj);
        let background = self.optional_str(at, obj, "background");
        let spacing: Option<Spacing> = self.optional_record(at, obj, "spacing");
        let properties = self.optional_object(at, obj, "properties");

        let raw_components = self.children(at, NodeLevel::Section, obj, "components");
        let components_at = format!("{}/components", at);
        self.unique_ids(&components_at, NodeLevel::Component, raw_components);
        let components: Vec<Component> = raw_components
            .iter()
            .enumerate()
            .filter_map(|(i, raw)| self.component(&format!("{}/{}", components_at, i), raw))
            .collect();
        let complete = components.len() == raw_components.len();

        let section = Section {
            id: id?,
            section_type: section_type?,
            name: name?,
            editable: editable.ok()?,
            background,
            spacing,
            properties,
            components,
            extra: extra_fields(obj, SECTION_FIELDS),
        };
        complete.then_some(section)
    }

    fn component(&mut self, at: &str, value: &Value) -> Option<Component> {
        let obj = self.object(at, NodeLevel::Component, value)?;

        let id = self.node_id(at, NodeLevel::Component, obj);
        let component_type = self.kind::<ComponentType>(at, NodeLevel::Component, obj);
        let editable = self.editable(at, obj);
        let properties = self.optional_object(at, obj, "properties");

        let raw_elements = self.children(at, NodeLevel::Component, obj, "elements");
        let elements_at = format!("{}/elements", at);
        self.unique_ids(&elements_at, NodeLevel::Element, raw_elements);
        let elements: Vec<Element> = raw_elements
            .iter()
            .enumerate()
            .filter_map(|(i, raw)| self.element(&format!("{}/{}", elements_at, i), raw))
            .collect();
        let complete = elements.len() == raw_elements.len();

        let component = Component {
            id: id?,
            component_type: component_type?,
            editable: editable.ok()?,
            properties,
            elements,
            extra: extra_fields(obj, COMPONENT_FIELDS),
        };

        // Content rules only make sense once every element was read
        if !complete {
            return None;
        }
        let rule_violations = check_component(&component);
        let valid = rule_violations.is_empty();
        for violation in rule_violations {
            self.report(at, violation);
        }
        valid.then_some(component)
    }

    fn element(&mut self, at: &str, value: &Value) -> Option<Element> {
        let obj = self.object(at, NodeLevel::Element, value)?;

        let id = self.node_id(at, NodeLevel::Element, obj);
        let element_type = self.kind::<ElementType>(at, NodeLevel::Element, obj);
        let properties = match obj.get("properties") {
            Some(Value::Object(map)) => Some(map.clone()),
            Some(_) => {
                self.report(
                    at,
                    SchemaViolation::WrongType {
                        field: "properties".into(),
                        expected: "an object",
                    },
                );
                None
            }
            None => {
                self.report(
                    at,
                    SchemaViolation::MissingField {
                        level: NodeLevel::Element,
                        field: "properties".into(),
                    },
                );
                None
            }
        };

        let props = match (element_type, properties) {
            (Some(kind), Some(map)) => match ElementProps::from_map(kind, map) {
                Ok(props) => Some(props),
                Err(violation) => {
                    self.report(&format!("{}/properties", at), violation);
                    None
                }
            },
            _ => None,
        };

        Some(Element {
            id: id?,
            props: props?,
            extra: extra_fields(obj, ELEMENT_FIELDS),
        })
    }

    fn object<'v>(
        &mut self,
        at: &str,
        level: NodeLevel,
        value: &'v Value,
    ) -> Option<&'v PropertyMap> {
        match value {
            Value::Object(obj) => Some(obj),
            _ => {
                let expected = match level {
                    NodeLevel::Template => "a template object",
                    NodeLevel::Section => "a section object",
                    NodeLevel::Component => "a component object",
                    NodeLevel::Element => "an element object",
                };
                self.report(
                    at,
                    SchemaViolation::WrongType {
                        field: level.to_string(),
                        expected,
                    },
                );
                None
            }
        }
    }

    pub(crate) fn required_str(
        &mut self,
        at: &str,
        level: NodeLevel,
        obj: &PropertyMap,
        field: &str,
    ) -> Option<String> {
        match obj.get(field) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Null) | None => {
                self.report(
                    at,
                    SchemaViolation::MissingField {
                        level,
                        field: field.to_string(),
                    },
                );
                None
            }
            Some(_) => {
                self.report(
                    at,
                    SchemaViolation::WrongType {
                        field: field.to_string(),
                        expected: "a string",
                    },
                );
                None
            }
        }
    }

    fn optional_str(&mut self, at: &str, obj: &PropertyMap, field: &str) -> Option<String> {
        match obj.get(field) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Null) | None => None,
            Some(_) => {
                self.report(
                    at,
                    SchemaViolation::WrongType {
                        field: field.to_string(),
                        expected: "a string",
                    },
                );
                None
            }
        }
    }

    fn optional_object(&mut self, at: &str, obj: &PropertyMap, field: &str) -> Option<PropertyMap> {
        match obj.get(field) {
            Some(Value::Object(map)) => Some(map.clone()),
            Some(Value::Null) | None => None,
            Some(_) => {
                self.report(
                    at,
                    SchemaViolation::WrongType {
                        field: field.to_string(),
                        expected: "an object",
                    },
                );
                None
            }
        }
    }

    fn optional_record<T: DeserializeOwned>(
        &mut self,
        at: &str,
        obj: &PropertyMap,
        field: &str,
    ) -> Option<T> {
        match obj.get(field) {
            Some(Value::Null) | None => None,
            Some(value) => match serde_json::from_value(value.clone()) {
                Ok(record) => Some(record),
                Err(e) => {
                    self.report(
                        &format!("{}/{}", at, field),
                        SchemaViolation::InvalidProperty {
                            node_type: "record",
                            key: field.to_string(),
                            message: e.to_string(),
                        },
                    );
                    None
                }
            },
        }
    }

    fn node_id(&mut self, at: &str, level: NodeLevel, obj: &PropertyMap) -> Option<String> {
        let id = self.required_str(at, level, obj, "id")?;
        match check_id(level, &id) {
            Ok(()) => Some(id),
            Err(violation) => {
                self.report(at, violation);
                None
            }
        }
    }

    fn kind<K: std::str::FromStr>(
        &mut self,
        at: &str,
        level: NodeLevel,
        obj: &PropertyMap,
    ) -> Option<K> {
        let name = self.required_str(at, level, obj, "type")?;
        match name.parse::<K>() {
            Ok(kind) => Some(kind),
            Err(_) => {
                self.report(at, SchemaViolation::UnknownType { level, found: name });
                None
            }
        }
    }

    /// `Err` when the field holds an unknown value
    fn editable(&mut self, at: &str, obj: &PropertyMap) -> Result<Option<EditableType>, ()> {
        match obj.get("editable") {
            Some(Value::Null) | None => Ok(None),
            Some(Value::String(s)) => match s.parse::<EditableType>() {
                Ok(editable) => Ok(Some(editable)),
                Err(_) => {
                    self.report(
                        at,
                        SchemaViolation::WrongType {
                            field: "editable".into(),
                            expected: "one of editable, locked-replacing, locked-edit",
                        },
                    );
                    Err(())
                }
            },
            Some(_) => {
                self.report(
                    at,
                    SchemaViolation::WrongType {
                        field: "editable".into(),
                        expected: "one of editable, locked-replacing, locked-edit",
                    },
                );
                Err(())
            }
        }
    }

    fn children<'v>(
        &mut self,
        at: &str,
        level: NodeLevel,
        obj: &'v PropertyMap,
        field: &str,
    ) -> &'v [Value] {
        match obj.get(field) {
            Some(Value::Array(items)) => items,
            Some(_) => {
                self.report(
                    at,
                    SchemaViolation::WrongType {
                        field: field.to_string(),
                        expected: "an array",
                    },
                );
                &[]
            }
            None => {
                self.report(
                    at,
                    SchemaViolation::MissingField {
                        level,
                        field: field.to_string(),
                    },
                );
                &[]
            }
        }
    }

    fn unique_ids(&mut self, at: &str, level: NodeLevel, raw: &[Value]) {
        let ids = raw
            .iter()
            .filter_map(|v| v.get("id").and_then(Value::as_str));
        for violation in check_unique_ids(level, ids) {
            self.report(at, violation);
        }
    }
}

fn extra_fields(obj: &PropertyMap, known: &[&str]) -> PropertyMap {
    obj.iter()
        .filter(|(key, _)| !known.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
