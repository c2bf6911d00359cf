//! # Template Catalog
//!
//! Read-only set of starter templates used to seed new projects.
//!
//! Built-in templates ship as JSON and go through hydration when the catalog
//! is built, so a catalog that loads is a catalog that validates. Entries are
//! never handed out mutably: [`Catalog::instantiate`] returns a deep copy for
//! the editor to own.

use pagecraft_hydration::HydrationError;
use pagecraft_schema::Template;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

const BUILTIN: &[(&str, &str)] = &[
    ("business", include_str!("../templates/business.json")),
    ("storefront", include_str!("../templates/storefront.json")),
    ("portfolio", include_str!("../templates/portfolio.json")),
];

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template {name} failed to load: {source}")]
    Hydration {
        name: String,
        #[source]
        source: HydrationError,
    },

    #[error("Duplicate template id: {0}")]
    DuplicateTemplate(String),
}

/// Gallery entry (no subtree)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// CRC32 of the serialized template
    pub checksum: String,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    summaries: Vec<TemplateSummary>,
    templates: Vec<Template>,
}

impl Catalog {
    /// The templates bundled with the editor
    pub fn builtin() -> Result<Self, CatalogError> {
        let mut templates = Vec::with_capacity(BUILTIN.len());
        for (name, json) in BUILTIN {
            let template = pagecraft_hydration::from_bytes(json.as_bytes()).map_err(|source| {
                CatalogError::Hydration {
                    name: name.to_string(),
                    source,
                }
            })?;
            templates.push(template);
        }
        Self::from_templates(templates)
    }

    /// Build from serialized documents, e.g. a `GET /api/templates` response
    pub fn from_documents(documents: impl IntoIterator<Item = Value>) -> Result<Self, CatalogError> {
        let mut templates = Vec::new();
        for (i, document) in documents.into_iter().enumerate() {
            let template = pagecraft_hydration::deserialize(&document).map_err(|source| {
                CatalogError::Hydration {
                    name: document
                        .get("id")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("#{}", i)),
                    source,
                }
            })?;
            templates.push(template);
        }
        Self::from_templates(templates)
    }

    pub fn from_templates(templates: Vec<Template>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        let mut summaries = Vec::with_capacity(templates.len());

        for template in &templates {
            if !seen.insert(template.id.as_str()) {
                return Err(CatalogError::DuplicateTemplate(template.id.clone()));
            }
            let bytes = pagecraft_hydration::to_bytes(template).map_err(|source| {
                CatalogError::Hydration {
                    name: template.id.clone(),
                    source,
                }
            })?;
            summaries.push(TemplateSummary {
                id: template.id.clone(),
                name: template.name.clone(),
                description: template.description.clone(),
                category: template.category.clone(),
                thumbnail: template.thumbnail.clone(),
                checksum: format!("{:08x}", crc32fast::hash(&bytes)),
            });
        }

        Ok(Self {
            summaries,
            templates,
        })
    }

    /// Summaries in catalog order
    pub fn list(&self) -> &[TemplateSummary] {
        &self.summaries
    }

    /// Full template, borrowed. Clone (or use [`Catalog::instantiate`])
    /// before editing.
    pub fn get(&self, id: &str) -> Result<&Template, CatalogError> {
        self.templates
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Deep copy of a template, ready to be owned by an editor
    pub fn instantiate(&self, id: &str) -> Result<Template, CatalogError> {
        self.get(id).cloned()
    }

    pub fn summary(&self, id: &str) -> Option<&TemplateSummary> {
        self.summaries.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.summaries.iter().any(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
