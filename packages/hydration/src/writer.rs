//! Live tree → serialized layout

use crate::HydrationError;
use pagecraft_schema::{Component, Element, PropertyMap, Section, Template};
use serde_json::Value;

/// Convert a template into its stored JSON form
pub fn serialize(template: &Template) -> Result<Value, HydrationError> {
    let mut obj = template.extra.clone();
    obj.insert("id".into(), Value::String(template.id.clone()));
    obj.insert("name".into(), Value::String(template.name.clone()));
    obj.insert("title".into(), Value::String(template.title.clone()));
    insert_opt(&mut obj, "description", &template.description);
    insert_opt(&mut obj, "category", &template.category);
    insert_opt(&mut obj, "thumbnail", &template.thumbnail);
    insert_opt(&mut obj, "logoUrl", &template.logo_url);
    if let Some(colors) = &template.colors {
        obj.insert("colors".into(), serde_json::to_value(colors)?);
    }
    if let Some(metadata) = &template.metadata {
        obj.insert("metadata".into(), Value::Object(metadata.clone()));
    }

    let sections = template
        .sections
        .iter()
        .map(section_value)
        .collect::<Result<Vec<_>, _>>()?;
    obj.insert("sections".into(), Value::Array(sections));

    Ok(Value::Object(obj))
}

fn section_value(section: &Section) -> Result<Value, HydrationError> {
    let mut obj = section.extra.clone();
    obj.insert("id".into(), Value::String(section.id.clone()));
    obj.insert("type".into(), Value::String(section.section_type.as_str().into()));
    obj.insert("name".into(), Value::String(section.name.clone()));
    if let Some(editable) = section.editable {
        obj.insert("editable".into(), Value::String(editable.as_str().into()));
    }
    insert_opt(&mut obj, "background", &section.background);
    if let Some(spacing) = &section.spacing {
        obj.insert("spacing".into(), serde_json::to_value(spacing)?);
    }
    if let Some(properties) = &section.properties {
        obj.insert("properties".into(), Value::Object(properties.clone()));
    }

    let components = section
        .components
        .iter()
        .map(component_value)
        .collect::<Result<Vec<_>, _>>()?;
    obj.insert("components".into(), Value::Array(components));

    Ok(Value::Object(obj))
}

fn component_value(component: &Component) -> Result<Value, HydrationError> {
    let mut obj = component.extra.clone();
    obj.insert("id".into(), Value::String(component.id.clone()));
    obj.insert(
        "type".into(),
        Value::String(component.component_type.as_str().into()),
    );
    if let Some(editable) = component.editable {
        obj.insert("editable".into(), Value::String(editable.as_str().into()));
    }
    if let Some(properties) = &component.properties {
        obj.insert("properties".into(), Value::Object(properties.clone()));
    }

    let elements = component
        .elements
        .iter()
        .map(element_value)
        .collect::<Result<Vec<_>, _>>()?;
    obj.insert("elements".into(), Value::Array(elements));

    Ok(Value::Object(obj))
}

fn element_value(element: &Element) -> Result<Value, HydrationError> {
    let mut obj = element.extra.clone();
    obj.insert("id".into(), Value::String(element.id.clone()));
    obj.insert(
        "type".into(),
        Value::String(element.element_type().as_str().into()),
    );
    obj.insert("properties".into(), Value::Object(element.props.to_map()?));
    Ok(Value::Object(obj))
}

fn insert_opt(obj: &mut PropertyMap, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        obj.insert(key.to_string(), Value::String(value.clone()));
    }
}
