use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::kinds::UnknownKind;

/// Editor tool selected in the toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolId {
    #[default]
    Select,
    Text,
    Image,
    Section,
    Component,
    Style,
    Pan,
}

impl ToolId {
    pub const ALL: [ToolId; 7] = [
        ToolId::Select,
        ToolId::Text,
        ToolId::Image,
        ToolId::Section,
        ToolId::Component,
        ToolId::Style,
        ToolId::Pan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolId::Select => "select",
            ToolId::Text => "text",
            ToolId::Image => "image",
            ToolId::Section => "section",
            ToolId::Component => "component",
            ToolId::Style => "style",
            ToolId::Pan => "pan",
        }
    }
}

impl FromStr for ToolId {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolId::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
