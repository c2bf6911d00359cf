//! Saved project payloads: a template plus the editor session fields worth
//! restoring.

use crate::reader::Reader;
use crate::{serialize, HydrationError};
use pagecraft_schema::{SchemaViolation, Template, ToolId};
use serde_json::{Map, Value};

/// Everything a saved project restores
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectState {
    pub template: Template,
    pub active_tool: Option<ToolId>,
    pub template_selected: Option<bool>,
}

impl ProjectState {
    pub fn new(template: Template) -> Self {
        Self {
            template,
            active_tool: None,
            template_selected: None,
        }
    }
}

pub fn serialize_project(project: &ProjectState) -> Result<Value, HydrationError> {
    let mut obj = Map::new();
    obj.insert("template".into(), serialize(&project.template)?);
    if let Some(tool) = project.active_tool {
        obj.insert("activeTool".into(), Value::String(tool.as_str().into()));
    }
    if let Some(selected) = project.template_selected {
        obj.insert("templateSelected".into(), Value::Bool(selected));
    }
    Ok(Value::Object(obj))
}

/// Hydrate a project payload. A bare template object is accepted as a
/// project with no session fields.
pub fn deserialize_project(value: &Value) -> Result<ProjectState, HydrationError> {
    let mut reader = Reader::default();

    let Some(obj) = value.as_object().filter(|obj| obj.contains_key("template")) else {
        let template = reader.template("", value);
        return reader.finish(template.map(ProjectState::new));
    };

    let template = reader.template("/template", &obj["template"]);

    let active_tool = match obj.get("activeTool") {
        Some(Value::Null) | None => Ok(None),
        Some(Value::String(name)) => name.parse::<ToolId>().map(Some).map_err(|_| ()),
        Some(_) => Err(()),
    };
    if active_tool.is_err() {
        reader.report(
            "",
            SchemaViolation::WrongType {
                field: "activeTool".into(),
                expected: "a known tool id",
            },
        );
    }

    let template_selected = match obj.get("templateSelected") {
        Some(Value::Null) | None => None,
        Some(Value::Bool(selected)) => Some(*selected),
        Some(_) => {
            reader.report(
                "",
                SchemaViolation::WrongType {
                    field: "templateSelected".into(),
                    expected: "a boolean",
                },
            );
            None
        }
    };

    let project = match (template, active_tool) {
        (Some(template), Ok(active_tool)) => Some(ProjectState {
            template,
            active_tool,
            template_selected,
        }),
        _ => None,
    };
    reader.finish(project)
}
