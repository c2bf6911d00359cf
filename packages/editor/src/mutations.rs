//! # Tree Mutations
//!
//! Semantic, path-addressed operations on a [`Template`].
//!
//! ## Mutation Semantics
//!
//! ### SetProperty
//! - Atomic replacement of one key (`Value::Null` removes it)
//! - A value the node's type rejects leaves the node untouched
//! - On a free-form key, the inverse restores the whole map
//!   (`RestoreProperties`) so an absent map and an empty one stay distinct
//!
//! ### InsertNode / MoveNode
//! - Index is clamped to the sibling count
//! - Inserted subtrees are validated before they enter the tree
//! - Sibling ids stay unique
//!
//! ### RemoveNode
//! - Removes the node and all descendants
//!
//! Every variant is checked against the effective editability of the node it
//! touches (for inserts, the parent) before it runs. History replay skips
//! that check: the original operation already passed it.

use pagecraft_schema::{
    validate_subtree, Component, EditAction, EditableType, Element, Node, NodePath, NodeRef,
    ParentPath, PropertyMap, SchemaViolation, Section, Template,
};
use serde_json::Value;
use thiserror::Error;

/// Semantic mutations (intent-preserving operations)
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Set (or with `Value::Null`, remove) one property
    SetProperty {
        path: NodePath,
        key: String,
        value: Value,
    },

    /// Put back a section/component's free-form property map as a whole
    RestoreProperties {
        path: NodePath,
        properties: Option<PropertyMap>,
    },

    /// Insert a detached subtree under `parent` at `index`
    InsertNode {
        parent: ParentPath,
        index: usize,
        node: Node,
    },

    /// Remove a node from its parent
    RemoveNode { path: NodePath },

    /// Swap a node for another of the same level, in place
    ReplaceNode { path: NodePath, node: Node },

    /// Reorder a node within its parent
    MoveNode { path: NodePath, index: usize },

    /// Set or clear a section/component editability override
    SetEditable {
        path: NodePath,
        editable: Option<EditableType>,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Parent not found: {0}")]
    ParentNotFound(String),

    #[error("Cannot {action} {path}: node is {editable}")]
    Locked {
        path: NodePath,
        editable: EditableType,
        action: EditAction,
    },

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    #[error("Schema violation: {0}")]
    Schema(#[from] SchemaViolation),
}

impl Mutation {
    /// Path of the node this mutation creates, changes, or removes
    pub fn target(&self) -> NodePath {
        match self {
            Mutation::InsertNode { parent, node, .. } => parent.child(node.id()),
            Mutation::SetProperty { path, .. }
            | Mutation::RestoreProperties { path, .. }
            | Mutation::RemoveNode { path }
            | Mutation::ReplaceNode { path, .. }
            | Mutation::MoveNode { path, .. }
            | Mutation::SetEditable { path, .. } => path.clone(),
        }
    }

    /// The editability class this mutation is checked against
    pub fn action(&self) -> EditAction {
        match self {
            Mutation::SetProperty { .. } | Mutation::RestoreProperties { .. } => {
                EditAction::UpdateProperty
            }
            Mutation::InsertNode { .. } => EditAction::InsertChild,
            Mutation::RemoveNode { .. } => EditAction::Delete,
            Mutation::ReplaceNode { .. } => EditAction::Replace,
            Mutation::MoveNode { .. } => EditAction::Move,
            Mutation::SetEditable { .. } => EditAction::SetEditable,
        }
    }

    /// Apply mutation to the template with validation
    pub fn apply(&self, template: &mut Template) -> Result<(), MutationError> {
        self.validate(template)?;
        self.perform(template)
    }

    /// Apply a mutation recorded in history. Structure is still checked,
    /// editability is not.
    pub(crate) fn replay(&self, template: &mut Template) -> Result<(), MutationError> {
        self.validate_structure(template)?;
        self.perform(template)
    }

    /// Validate without applying
    pub fn validate(&self, template: &Template) -> Result<(), MutationError> {
        self.validate_structure(template)?;
        self.check_lock(template)
    }

    fn check_lock(&self, template: &Template) -> Result<(), MutationError> {
        let path = match self {
            Mutation::InsertNode { parent, .. } => match parent.as_node() {
                Some(path) => path,
                None => return Ok(()),
            },
            other => other.target(),
        };
        let action = self.action();

        let editable = template
            .effective_editable(&path)
            .ok_or_else(|| MutationError::NodeNotFound(path.to_string()))?;
        if editable.permits(action) {
            Ok(())
        } else {
            Err(MutationError::Locked {
                path,
                editable,
                action,
            })
        }
    }

    fn validate_structure(&self, template: &Template) -> Result<(), MutationError> {
        match self {
            Mutation::SetProperty { path, .. }
            | Mutation::RemoveNode { path }
            | Mutation::MoveNode { path, .. } => {
                require(template, path)?;
                Ok(())
            }

            Mutation::RestoreProperties { path, .. } => {
                require(template, path)?;
                if let NodePath::Element { .. } = path {
                    return Err(MutationError::InvalidStructure(
                        "elements have no free-form properties".to_string(),
                    ));
                }
                Ok(())
            }

            Mutation::SetEditable { path, .. } => {
                require(template, path)?;
                if let NodePath::Element { .. } = path {
                    return Err(MutationError::InvalidStructure(
                        "elements inherit editability from their component".to_string(),
                    ));
                }
                Ok(())
            }

            Mutation::InsertNode { parent, node, .. } => {
                let siblings = sibling_ids(template, parent)
                    .ok_or_else(|| MutationError::ParentNotFound(parent.to_string()))?;
                if node.level() != parent.child_level() {
                    return Err(MutationError::InvalidStructure(format!(
                        "cannot insert a {} into {}",
                        node.level(),
                        parent
                    )));
                }
                if siblings.contains(&node.id()) {
                    return Err(duplicate(node));
                }
                check_subtree(node)
            }

            Mutation::ReplaceNode { path, node } => {
                require(template, path)?;
                if node.level() != path.level() {
                    return Err(MutationError::InvalidStructure(format!(
                        "cannot replace {} with a {}",
                        path,
                        node.level()
                    )));
                }
                let siblings = sibling_ids(template, &path.parent())
                    .ok_or_else(|| MutationError::ParentNotFound(path.parent().to_string()))?;
                if node.id() != path.leaf_id() && siblings.contains(&node.id()) {
                    return Err(duplicate(node));
                }
                check_subtree(node)
            }
        }
    }

    fn perform(&self, template: &mut Template) -> Result<(), MutationError> {
        match self {
            Mutation::SetProperty { path, key, value } => {
                apply_set_property(template, path, key, value.clone())?;
            }
            Mutation::RestoreProperties { path, properties } => {
                apply_restore_properties(template, path, properties.clone())?;
            }
            Mutation::InsertNode {
                parent,
                index,
                node,
            } => apply_insert(template, parent, *index, node.clone())?,
            Mutation::RemoveNode { path } => {
                apply_remove(template, path)?;
            }
            Mutation::ReplaceNode { path, node } => {
                apply_replace(template, path, node.clone())?;
            }
            Mutation::MoveNode { path, index } => {
                apply_move(template, path, *index)?;
            }
            Mutation::SetEditable { path, editable } => {
                apply_set_editable(template, path, *editable)?;
            }
        }
        Ok(())
    }

    /// Create the mutation that undoes this one, from the state before it runs
    pub fn to_inverse(&self, template: &Template) -> Result<Mutation, MutationError> {
        match self {
            Mutation::SetProperty { path, key, .. } => {
                let node = require(template, path)?;
                if let Some(properties) = node.free_form(key) {
                    return Ok(Mutation::RestoreProperties {
                        path: path.clone(),
                        properties: properties.clone(),
                    });
                }
                Ok(Mutation::SetProperty {
                    path: path.clone(),
                    key: key.clone(),
                    value: node.property(key).unwrap_or(Value::Null),
                })
            }

            Mutation::RestoreProperties { path, .. } => Ok(Mutation::RestoreProperties {
                path: path.clone(),
                properties: free_form_map(template, path)?,
            }),

            Mutation::InsertNode { parent, node, .. } => Ok(Mutation::RemoveNode {
                path: parent.child(node.id()),
            }),

            Mutation::RemoveNode { path } => Ok(Mutation::InsertNode {
                parent: path.parent(),
                index: position(template, path)?,
                node: detach(template, path)?,
            }),

            Mutation::ReplaceNode { path, node } => Ok(Mutation::ReplaceNode {
                path: path.parent().child(node.id()),
                node: detach(template, path)?,
            }),

            Mutation::MoveNode { path, .. } => Ok(Mutation::MoveNode {
                path: path.clone(),
                index: position(template, path)?,
            }),

            Mutation::SetEditable { path, .. } => Ok(Mutation::SetEditable {
                path: path.clone(),
                editable: require(template, path)?.editable(),
            }),
        }
    }

    /// Short label for logs and history descriptions
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::SetProperty { .. } => "SetProperty",
            Mutation::RestoreProperties { .. } => "RestoreProperties",
            Mutation::InsertNode { .. } => "InsertNode",
            Mutation::RemoveNode { .. } => "RemoveNode",
            Mutation::ReplaceNode { .. } => "ReplaceNode",
            Mutation::MoveNode { .. } => "MoveNode",
            Mutation::SetEditable { .. } => "SetEditable",
        }
    }
}

/// Anything stored in a child sequence
trait Child {
    fn child_id(&self) -> &str;
}

impl Child for Section {
    fn child_id(&self) -> &str {
        &self.id
    }
}

impl Child for Component {
    fn child_id(&self) -> &str {
        &self.id
    }
}

impl Child for Element {
    fn child_id(&self) -> &str {
        &self.id
    }
}

fn index_of<T: Child>(items: &[T], id: &str) -> Option<usize> {
    items.iter().position(|c| c.child_id() == id)
}

fn put<T>(items: &mut Vec<T>, index: usize, item: T) {
    let index = index.min(items.len());
    items.insert(index, item);
}

fn take<T: Child>(items: &mut Vec<T>, id: &str) -> Option<T> {
    let index = index_of(items, id)?;
    Some(items.remove(index))
}

fn swap_in<T: Child>(items: &mut [T], id: &str, item: T) -> Option<T> {
    let index = index_of(items, id)?;
    Some(std::mem::replace(&mut items[index], item))
}

fn relocate<T: Child>(items: &mut Vec<T>, id: &str, index: usize) -> Option<usize> {
    let from = index_of(items, id)?;
    let item = items.remove(from);
    put(items, index, item);
    Some(from)
}

fn require<'a>(
    template: &'a Template,
    path: &NodePath,
) -> Result<NodeRef<'a>, MutationError> {
    template
        .resolve(path)
        .ok_or_else(|| MutationError::NodeNotFound(path.to_string()))
}

fn position(template: &Template, path: &NodePath) -> Result<usize, MutationError> {
    template
        .position(path)
        .ok_or_else(|| MutationError::NodeNotFound(path.to_string()))
}

/// Owned copy of the subtree at `path`
fn detach(template: &Template, path: &NodePath) -> Result<Node, MutationError> {
    let node = match require(template, path)? {
        NodeRef::Section(s) => Node::Section(s.clone()),
        NodeRef::Component(c) => Node::Component(c.clone()),
        NodeRef::Element(e) => Node::Element(e.clone()),
        NodeRef::Template(_) => {
            return Err(MutationError::InvalidStructure(
                "the template root cannot be detached".to_string(),
            ))
        }
    };
    Ok(node)
}

fn sibling_ids<'a>(template: &'a Template, parent: &ParentPath) -> Option<Vec<&'a str>> {
    let ids = match parent {
        ParentPath::Root => template.sections.iter().map(|s| s.id.as_str()).collect(),
        ParentPath::Section { section } => template
            .section(section)?
            .components
            .iter()
            .map(|c| c.id.as_str())
            .collect(),
        ParentPath::Component { section, component } => template
            .component(section, component)?
            .elements
            .iter()
            .map(|e| e.id.as_str())
            .collect(),
    };
    Some(ids)
}

fn duplicate(node: &Node) -> MutationError {
    MutationError::Schema(SchemaViolation::DuplicateId {
        level: node.level(),
        id: node.id().to_string(),
    })
}

fn check_subtree(node: &Node) -> Result<(), MutationError> {
    match validate_subtree(node).into_iter().next() {
        Some(found) => Err(MutationError::Schema(found.violation)),
        None => Ok(()),
    }
}

fn apply_set_property(
    template: &mut Template,
    path: &NodePath,
    key: &str,
    value: Value,
) -> Result<Option<Value>, MutationError> {
    let missing = || MutationError::NodeNotFound(path.to_string());

    let previous = match path {
        NodePath::Section { section } => template
            .section_mut(section)
            .ok_or_else(missing)?
            .set_property(key, value)?,
        NodePath::Component { section, component } => template
            .component_mut(section, component)
            .ok_or_else(missing)?
            .set_property(key, value)?,
        NodePath::Element {
            section,
            component,
            element,
        } => template
            .element_mut(section, component, element)
            .ok_or_else(missing)?
            .set_property(key, value)?,
    };

    Ok(previous)
}

fn apply_insert(
    template: &mut Template,
    parent: &ParentPath,
    index: usize,
    node: Node,
) -> Result<(), MutationError> {
    let missing = || MutationError::ParentNotFound(parent.to_string());

    match (parent, node) {
        (ParentPath::Root, Node::Section(section)) => put(&mut template.sections, index, section),
        (ParentPath::Section { section }, Node::Component(component)) => {
            let parent = template.section_mut(section).ok_or_else(missing)?;
            put(&mut parent.components, index, component);
        }
        (ParentPath::Component { section, component }, Node::Element(element)) => {
            let parent = template
                .component_mut(section, component)
                .ok_or_else(missing)?;
            put(&mut parent.elements, index, element);
        }
        (parent, node) => {
            return Err(MutationError::InvalidStructure(format!(
                "cannot insert a {} into {}",
                node.level(),
                parent
            )))
        }
    }

    Ok(())
}

fn apply_remove(template: &mut Template, path: &NodePath) -> Result<Node, MutationError> {
    let removed = match path {
        NodePath::Section { section } => take(&mut template.sections, section).map(Node::Section),
        NodePath::Component { section, component } => template
            .section_mut(section)
            .and_then(|s| take(&mut s.components, component))
            .map(Node::Component),
        NodePath::Element {
            section,
            component,
            element,
        } => template
            .component_mut(section, component)
            .and_then(|c| take(&mut c.elements, element))
            .map(Node::Element),
    };

    removed.ok_or_else(|| MutationError::NodeNotFound(path.to_string()))
}

fn apply_replace(
    template: &mut Template,
    path: &NodePath,
    node: Node,
) -> Result<Node, MutationError> {
    let replaced = match (path, node) {
        (NodePath::Section { section }, Node::Section(new)) => {
            swap_in(&mut template.sections, section, new).map(Node::Section)
        }
        (NodePath::Component { section, component }, Node::Component(new)) => template
            .section_mut(section)
            .and_then(|s| swap_in(&mut s.components, component, new))
            .map(Node::Component),
        (
            NodePath::Element {
                section,
                component,
                element,
            },
            Node::Element(new),
        ) => template
            .component_mut(section, component)
            .and_then(|c| swap_in(&mut c.elements, element, new))
            .map(Node::Element),
        (path, node) => {
            return Err(MutationError::InvalidStructure(format!(
                "cannot replace {} with a {}",
                path,
                node.level()
            )))
        }
    };

    replaced.ok_or_else(|| MutationError::NodeNotFound(path.to_string()))
}

fn apply_move(template: &mut Template, path: &NodePath, index: usize) -> Result<usize, MutationError> {
    let from = match path {
        NodePath::Section { section } => relocate(&mut template.sections, section, index),
        NodePath::Component { section, component } => template
            .section_mut(section)
            .and_then(|s| relocate(&mut s.components, component, index)),
        NodePath::Element {
            section,
            component,
            element,
        } => template
            .component_mut(section, component)
            .and_then(|c| relocate(&mut c.elements, element, index)),
    };

    from.ok_or_else(|| MutationError::NodeNotFound(path.to_string()))
}

fn free_form_map(
    template: &Template,
    path: &NodePath,
) -> Result<Option<PropertyMap>, MutationError> {
    match require(template, path)? {
        NodeRef::Section(s) => Ok(s.properties.clone()),
        NodeRef::Component(c) => Ok(c.properties.clone()),
        _ => Err(MutationError::InvalidStructure(
            "elements have no free-form properties".to_string(),
        )),
    }
}

fn apply_restore_properties(
    template: &mut Template,
    path: &NodePath,
    properties: Option<PropertyMap>,
) -> Result<Option<PropertyMap>, MutationError> {
    let missing = || MutationError::NodeNotFound(path.to_string());

    let slot = match path {
        NodePath::Section { section } => {
            &mut template.section_mut(section).ok_or_else(missing)?.properties
        }
        NodePath::Component { section, component } => {
            &mut template
                .component_mut(section, component)
                .ok_or_else(missing)?
                .properties
        }
        NodePath::Element { .. } => {
            return Err(MutationError::InvalidStructure(
                "elements have no free-form properties".to_string(),
            ))
        }
    };
    Ok(std::mem::replace(slot, properties))
}

fn apply_set_editable(
    template: &mut Template,
    path: &NodePath,
    editable: Option<EditableType>,
) -> Result<Option<EditableType>, MutationError> {
    let missing = || MutationError::NodeNotFound(path.to_string());

    match path {
        NodePath::Section { section } => {
            let node = template.section_mut(section).ok_or_else(missing)?;
            Ok(std::mem::replace(&mut node.editable, editable))
        }
        NodePath::Component { section, component } => {
            let node = template
                .component_mut(section, component)
                .ok_or_else(missing)?;
            Ok(std::mem::replace(&mut node.editable, editable))
        }
        NodePath::Element { .. } => Err(MutationError::InvalidStructure(
            "elements inherit editability from their component".to_string(),
        )),
    }
}
