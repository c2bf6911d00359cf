//! Editor settings

use pagecraft_schema::ToolId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Undo depth (0 = unlimited)
    pub max_undo_levels: usize,

    /// Tool active after init and after `reset`
    pub default_tool: ToolId,

    /// Log a warning when an edit stores a key the element type does not model
    pub warn_unknown_properties: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_undo_levels: 100,
            default_tool: ToolId::Select,
            warn_unknown_properties: true,
        }
    }
}

impl EditorConfig {
    /// Missing keys take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config = EditorConfig::from_json_str(r#"{ "maxUndoLevels": 5 }"#).unwrap();
        assert_eq!(config.max_undo_levels, 5);
        assert_eq!(config.default_tool, ToolId::Select);
        assert!(config.warn_unknown_properties);
    }

    #[test]
    fn test_tool_uses_kebab_case() {
        let config = EditorConfig::from_json_str(r#"{ "defaultTool": "pan" }"#).unwrap();
        assert_eq!(config.default_tool, ToolId::Pan);
        assert!(EditorConfig::from_json_str(r#"{ "defaultTool": "lasso" }"#).is_err());
    }
}
