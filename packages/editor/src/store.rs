//! # Editor Store
//!
//! Single owner of the live template and the editing session around it:
//! active tool, preview mode, selection, and history.
//!
//! ## States
//!
//! ```text
//!  Unselected ── select_template / load_template / hydrate_state ──▶ Editing
//!                                                                    │   ▲
//!                                              toggle_preview_mode   ▼   │
//!                                                                  Previewing
//! ```
//!
//! Tree edits are legal only while editing; in preview they return
//! [`MutationOutcome::Noop`] instead of failing. Every operation either
//! completes or leaves the store exactly as it was, and selection is
//! reconciled against the tree before an operation returns.

use crate::config::EditorConfig;
use crate::errors::EditorError;
use crate::mutations::{Mutation, MutationError};
use crate::selection::FocusTracker;
use crate::undo_stack::UndoStack;
use pagecraft_catalog::Catalog;
use pagecraft_hydration::{deserialize, deserialize_project, HydrationError, ProjectState};
use pagecraft_schema::{
    Component, EditableType, Element, ElementProps, Node, NodePath, NodeRef, ParentPath, Rect,
    Section, Template, ToolId,
};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Coarse editor state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Unselected,
    Editing,
    Previewing,
}

/// Why an operation had no effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoopReason {
    Previewing,
    NothingSelected,
    Unchanged,
    Superseded,
}

impl fmt::Display for NoopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            NoopReason::Previewing => "preview mode is on",
            NoopReason::NothingSelected => "nothing is selected",
            NoopReason::Unchanged => "nothing to change",
            NoopReason::Superseded => "a newer request was issued",
        };
        f.write_str(reason)
    }
}

/// Result of a store transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The transition took effect; `version` is the tree version afterwards
    Applied { version: u64 },
    /// The transition was skipped
    Noop { reason: NoopReason },
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied { .. })
    }
}

/// Handle for an in-flight load. Only the most recently issued ticket may
/// complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// What the renderer needs to draw one node
#[derive(Debug, Clone, Copy)]
pub struct NodeView<'a> {
    pub node: NodeRef<'a>,
    pub editable: EditableType,
    pub selected: bool,
}

#[derive(Debug)]
pub struct EditorStore {
    config: EditorConfig,
    catalog: Arc<Catalog>,
    template: Option<Template>,
    template_selected: bool,
    active_tool: ToolId,
    preview_mode: bool,
    focus: FocusTracker,
    history: UndoStack,
    version: u64,
    latest_request: u64,
}

impl EditorStore {
    /// Start a session with no template loaded
    pub fn init(config: EditorConfig, catalog: Arc<Catalog>) -> Self {
        info!(
            "[init] editor store ready, {} catalog templates",
            catalog.len()
        );
        Self {
            history: UndoStack::with_max_levels(config.max_undo_levels),
            active_tool: config.default_tool,
            config,
            catalog,
            template: None,
            template_selected: false,
            preview_mode: false,
            focus: FocusTracker::new(),
            version: 0,
            latest_request: 0,
        }
    }

    /// Drop the document and session state. Pending requests are superseded.
    pub fn reset(&mut self) {
        self.template = None;
        self.template_selected = false;
        self.active_tool = self.config.default_tool;
        self.preview_mode = false;
        self.focus.clear_focus();
        self.history.clear();
        self.latest_request += 1;
        info!("[reset] editor store back to unselected");
    }

    /// End the session, handing back the document
    pub fn teardown(self) -> Option<Template> {
        debug!("[teardown] version={}", self.version);
        self.template
    }

    // Read accessors

    pub fn template(&self) -> Option<&Template> {
        self.template.as_ref()
    }

    pub fn template_selected(&self) -> bool {
        self.template_selected
    }

    pub fn active_tool(&self) -> ToolId {
        self.active_tool
    }

    pub fn preview_mode(&self) -> bool {
        self.preview_mode
    }

    pub fn mode(&self) -> EditorMode {
        match (&self.template, self.preview_mode) {
            (None, _) => EditorMode::Unselected,
            (Some(_), false) => EditorMode::Editing,
            (Some(_), true) => EditorMode::Previewing,
        }
    }

    /// Bumped by every applied tree change, including loads
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn current_focused_element_id(&self) -> Option<&str> {
        self.focus.focused_id()
    }

    pub fn focused_path(&self) -> Option<&NodePath> {
        self.focus.focused()
    }

    pub fn selected_item_rect(&self) -> Option<Rect> {
        self.focus.rect()
    }

    pub fn is_selected(&self, path: &NodePath) -> bool {
        self.focus.is_focused(path)
    }

    pub fn effective_editable(&self, path: &NodePath) -> Option<EditableType> {
        self.template.as_ref()?.effective_editable(path)
    }

    pub fn node_view(&self, path: &NodePath) -> Option<NodeView<'_>> {
        let template = self.template.as_ref()?;
        Some(NodeView {
            node: template.resolve(path)?,
            editable: template.effective_editable(path)?,
            selected: self.focus.is_focused(path),
        })
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Label of the step `undo` would revert, e.g. "Delete logo"
    pub fn undo_description(&self) -> Option<&str> {
        self.history.undo_description()
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.history.redo_description()
    }

    /// Recorded steps, capped at `max_undo_levels`
    pub fn undo_levels(&self) -> usize {
        self.history.undo_levels()
    }

    pub fn redo_levels(&self) -> usize {
        self.history.redo_levels()
    }

    /// Template plus session fields, ready for `serialize_project`
    pub fn snapshot(&self) -> Option<ProjectState> {
        let template = self.template.clone()?;
        Some(ProjectState {
            template,
            active_tool: Some(self.active_tool),
            template_selected: Some(self.template_selected),
        })
    }

    // Loading

    /// Load a fresh copy of a catalog template. Supersedes any pending load,
    /// even if the lookup then fails.
    pub fn select_template(&mut self, template_id: &str) -> Result<MutationOutcome, EditorError> {
        if self.preview_mode {
            return Ok(self.skip("select_template", NoopReason::Previewing));
        }

        self.supersede_pending();
        let template = self.catalog.instantiate(template_id)?;
        info!("[select_template] {}", template_id);
        Ok(self.replace_document(template, None, None))
    }

    /// Replace the document with an externally sourced one. Invalid input
    /// is rejected whole and the current document is kept.
    pub fn load_template(&mut self, payload: &Value) -> Result<MutationOutcome, EditorError> {
        if self.preview_mode {
            return Ok(self.skip("load_template", NoopReason::Previewing));
        }

        self.supersede_pending();
        let template = deserialize(payload).map_err(|e| rejected("load_template", e))?;
        info!("[load_template] {} ({} sections)", template.id, template.sections.len());
        Ok(self.replace_document(template, None, None))
    }

    /// Restore a saved project, including its tool and selection flag
    pub fn hydrate_state(&mut self, payload: &Value) -> Result<MutationOutcome, EditorError> {
        if self.preview_mode {
            return Ok(self.skip("hydrate_state", NoopReason::Previewing));
        }

        self.supersede_pending();
        self.apply_project(payload)
    }

    /// Issue a ticket for a load that will complete later. Issuing a ticket
    /// supersedes every earlier one.
    pub fn begin_request(&mut self) -> RequestTicket {
        self.latest_request += 1;
        debug!("[begin_request] #{}", self.latest_request);
        RequestTicket(self.latest_request)
    }

    /// A direct load or selection outranks any fetch still in flight, even
    /// when the direct one then fails
    fn supersede_pending(&mut self) {
        self.latest_request += 1;
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.latest_request
    }

    /// Apply the payload of a finished load, unless something newer was
    /// requested or selected in the meantime
    pub fn complete_request(
        &mut self,
        ticket: RequestTicket,
        payload: &Value,
    ) -> Result<MutationOutcome, EditorError> {
        if !self.is_current(ticket) {
            info!(
                "[complete_request] discarding #{} (latest is #{})",
                ticket.0, self.latest_request
            );
            return Ok(MutationOutcome::Noop {
                reason: NoopReason::Superseded,
            });
        }
        if self.preview_mode {
            return Ok(self.skip("complete_request", NoopReason::Previewing));
        }

        self.apply_project(payload)
    }

    fn apply_project(&mut self, payload: &Value) -> Result<MutationOutcome, EditorError> {
        let project = deserialize_project(payload).map_err(|e| rejected("hydrate_state", e))?;
        info!(
            "[hydrate_state] {} ({} sections)",
            project.template.id,
            project.template.sections.len()
        );
        Ok(self.replace_document(
            project.template,
            project.active_tool,
            project.template_selected,
        ))
    }

    fn replace_document(
        &mut self,
        template: Template,
        active_tool: Option<ToolId>,
        template_selected: Option<bool>,
    ) -> MutationOutcome {
        self.template = Some(template);
        self.template_selected = template_selected.unwrap_or(true);
        if let Some(tool) = active_tool {
            self.active_tool = tool;
        }
        self.focus.clear_focus();
        self.history.clear();
        self.version += 1;
        self.applied()
    }

    // Session

    pub fn set_active_tool(&mut self, tool: ToolId) -> MutationOutcome {
        if self.preview_mode {
            return self.skip("set_active_tool", NoopReason::Previewing);
        }
        if self.active_tool == tool {
            return self.skip("set_active_tool", NoopReason::Unchanged);
        }

        debug!("[set_active_tool] {} -> {}", self.active_tool, tool);
        self.active_tool = tool;
        self.applied()
    }

    /// Flip between editing and preview. Selection survives the round trip;
    /// its geometry does not, since editor chrome changes the layout.
    pub fn toggle_preview_mode(&mut self) -> Result<MutationOutcome, EditorError> {
        if self.template.is_none() {
            return Err(EditorError::NoDocument);
        }

        self.preview_mode = !self.preview_mode;
        self.focus.invalidate_geometry();
        info!("[toggle_preview_mode] preview={}", self.preview_mode);
        Ok(self.applied())
    }

    // Selection

    /// Focus the node at `path`, or clear the selection with `None`. A path
    /// that does not resolve clears the selection and reports `NotFound`.
    pub fn select(
        &mut self,
        path: Option<NodePath>,
        rect: Option<Rect>,
    ) -> Result<MutationOutcome, EditorError> {
        if self.preview_mode {
            return Ok(self.skip("select", NoopReason::Previewing));
        }
        let template = self.template.as_ref().ok_or(EditorError::NoDocument)?;

        let Some(path) = path else {
            self.focus.clear_focus();
            return Ok(self.applied());
        };

        if !template.contains(&path) {
            debug!("[select] {} not found, clearing selection", path);
            self.focus.clear_focus();
            return Err(EditorError::NotFound(path.to_string()));
        }

        self.focus.focus(path, rect);
        Ok(self.applied())
    }

    pub fn select_section(
        &mut self,
        section: &str,
        rect: Option<Rect>,
    ) -> Result<MutationOutcome, EditorError> {
        self.select(Some(NodePath::section(section)), rect)
    }

    pub fn select_component(
        &mut self,
        section: &str,
        component: &str,
        rect: Option<Rect>,
    ) -> Result<MutationOutcome, EditorError> {
        self.select(Some(NodePath::component(section, component)), rect)
    }

    pub fn select_element(
        &mut self,
        section: &str,
        component: &str,
        element: &str,
        rect: Option<Rect>,
    ) -> Result<MutationOutcome, EditorError> {
        self.select(Some(NodePath::element(section, component, element)), rect)
    }

    pub fn clear_selection(&mut self) -> Result<MutationOutcome, EditorError> {
        self.select(None, None)
    }

    /// Select a component by id alone, searching the focused section (or the
    /// whole template when nothing is focused)
    pub fn select_component_in_scope(
        &mut self,
        component_id: Option<&str>,
        rect: Option<Rect>,
    ) -> Result<MutationOutcome, EditorError> {
        self.select_in_scope(component_id, rect, Template::component_paths)
    }

    /// Element counterpart of [`Self::select_component_in_scope`]
    pub fn select_element_in_scope(
        &mut self,
        element_id: Option<&str>,
        rect: Option<Rect>,
    ) -> Result<MutationOutcome, EditorError> {
        self.select_in_scope(element_id, rect, Template::element_paths)
    }

    fn select_in_scope(
        &mut self,
        id: Option<&str>,
        rect: Option<Rect>,
        find: fn(&Template, &str, Option<&str>) -> Vec<NodePath>,
    ) -> Result<MutationOutcome, EditorError> {
        if self.preview_mode {
            return Ok(self.skip("select", NoopReason::Previewing));
        }
        let template = self.template.as_ref().ok_or(EditorError::NoDocument)?;

        let Some(id) = id else {
            self.focus.clear_focus();
            return Ok(self.applied());
        };

        let scope = self.focus.focused().map(|p| p.section_id().to_string());
        let mut matches = find(template, id, scope.as_deref());

        match matches.len() {
            0 => {
                let within = scope.as_deref().unwrap_or("template");
                debug!("[select] {} not found in {}, clearing selection", id, within);
                self.focus.clear_focus();
                Err(EditorError::NotFound(format!("{} in {}", id, within)))
            }
            1 => {
                self.focus.focus(matches.remove(0), rect);
                Ok(self.applied())
            }
            _ => Err(EditorError::Ambiguous {
                id: id.to_string(),
                matches,
            }),
        }
    }

    /// Fresh geometry from the renderer. Ignored unless `path` is focused.
    pub fn set_focus_rect(&mut self, path: &NodePath, rect: Rect) -> bool {
        self.focus.set_focus_rect(path, rect)
    }

    pub fn clear_focus(&mut self) {
        self.focus.clear_focus();
    }

    /// The viewport scrolled or resized
    pub fn invalidate_geometry(&mut self) {
        self.focus.invalidate_geometry();
    }

    // Tree edits

    pub fn update_property(
        &mut self,
        path: &NodePath,
        key: &str,
        value: Value,
    ) -> Result<MutationOutcome, EditorError> {
        let mutation = Mutation::SetProperty {
            path: path.clone(),
            key: key.to_string(),
            value,
        };
        let outcome = self.commit(mutation, format!("Update {}", key))?;

        if outcome.is_applied() && self.config.warn_unknown_properties {
            self.warn_if_unknown(path, key);
        }
        Ok(outcome)
    }

    /// Remove the focused node and clear the selection
    pub fn delete_selected_item(&mut self) -> Result<MutationOutcome, EditorError> {
        if self.preview_mode {
            return Ok(self.skip("delete_selected_item", NoopReason::Previewing));
        }
        let Some(path) = self.focus.focused().cloned() else {
            return Ok(self.skip("delete_selected_item", NoopReason::NothingSelected));
        };

        self.delete_node(&path)
    }

    pub fn delete_node(&mut self, path: &NodePath) -> Result<MutationOutcome, EditorError> {
        let mutation = Mutation::RemoveNode { path: path.clone() };
        self.commit(mutation, format!("Delete {}", path.leaf_id()))
    }

    pub fn insert_node(
        &mut self,
        parent: ParentPath,
        index: usize,
        node: Node,
    ) -> Result<MutationOutcome, EditorError> {
        let description = format!("Add {}", node.id());
        let mutation = Mutation::InsertNode {
            parent,
            index,
            node,
        };
        self.commit(mutation, description)
    }

    pub fn add_section(
        &mut self,
        index: usize,
        section: Section,
    ) -> Result<MutationOutcome, EditorError> {
        self.insert_node(ParentPath::Root, index, Node::Section(section))
    }

    pub fn add_component(
        &mut self,
        section: &str,
        index: usize,
        component: Component,
    ) -> Result<MutationOutcome, EditorError> {
        let parent = ParentPath::Section {
            section: section.to_string(),
        };
        self.insert_node(parent, index, Node::Component(component))
    }

    pub fn add_element(
        &mut self,
        section: &str,
        component: &str,
        index: usize,
        element: Element,
    ) -> Result<MutationOutcome, EditorError> {
        let parent = ParentPath::Component {
            section: section.to_string(),
            component: component.to_string(),
        };
        self.insert_node(parent, index, Node::Element(element))
    }

    /// Reorder a node among its siblings
    pub fn move_node(&mut self, path: &NodePath, index: usize) -> Result<MutationOutcome, EditorError> {
        if !self.preview_mode
            && self.template.as_ref().and_then(|t| t.position(path)) == Some(index)
        {
            return Ok(self.skip("move_node", NoopReason::Unchanged));
        }

        let mutation = Mutation::MoveNode {
            path: path.clone(),
            index,
        };
        self.commit(mutation, format!("Move {}", path.leaf_id()))
    }

    pub fn replace_node(&mut self, path: &NodePath, node: Node) -> Result<MutationOutcome, EditorError> {
        let mutation = Mutation::ReplaceNode {
            path: path.clone(),
            node,
        };
        self.commit(mutation, format!("Replace {}", path.leaf_id()))
    }

    /// Lock or unlock a section or component. Always permitted.
    pub fn set_editable(
        &mut self,
        path: &NodePath,
        editable: Option<EditableType>,
    ) -> Result<MutationOutcome, EditorError> {
        let mutation = Mutation::SetEditable {
            path: path.clone(),
            editable,
        };
        self.commit(mutation, format!("Set editability of {}", path.leaf_id()))
    }

    pub fn undo(&mut self) -> Result<MutationOutcome, EditorError> {
        if self.preview_mode {
            return Ok(self.skip("undo", NoopReason::Previewing));
        }
        let template = self.template.as_mut().ok_or(EditorError::NoDocument)?;

        match self.history.undo(template)? {
            Some(applied) => {
                self.version += 1;
                self.reconcile(&applied);
                info!("[undo] {} {}", applied.name(), applied.target());
                Ok(self.applied())
            }
            None => Ok(self.skip("undo", NoopReason::Unchanged)),
        }
    }

    pub fn redo(&mut self) -> Result<MutationOutcome, EditorError> {
        if self.preview_mode {
            return Ok(self.skip("redo", NoopReason::Previewing));
        }
        let template = self.template.as_mut().ok_or(EditorError::NoDocument)?;

        match self.history.redo(template)? {
            Some(applied) => {
                self.version += 1;
                self.reconcile(&applied);
                info!("[redo] {} {}", applied.name(), applied.target());
                Ok(self.applied())
            }
            None => Ok(self.skip("redo", NoopReason::Unchanged)),
        }
    }

    fn commit(&mut self, mutation: Mutation, description: String) -> Result<MutationOutcome, EditorError> {
        if self.preview_mode {
            return Ok(self.skip(mutation.name(), NoopReason::Previewing));
        }
        let template = self.template.as_mut().ok_or(EditorError::NoDocument)?;

        if let Err(e) = self
            .history
            .apply_described(&mutation, template, Some(description))
        {
            match &e {
                MutationError::Locked { .. } => warn!("[{}] blocked: {}", mutation.name(), e),
                MutationError::Schema(_) => warn!("[{}] rejected: {}", mutation.name(), e),
                _ => debug!("[{}] failed: {}", mutation.name(), e),
            }
            return Err(e.into());
        }

        self.version += 1;
        self.reconcile(&mutation);
        debug!(
            "[{}] {} applied, version={}",
            mutation.name(),
            mutation.target(),
            self.version
        );
        Ok(self.applied())
    }

    /// Bring selection back in line with the tree after `applied` ran
    fn reconcile(&mut self, applied: &Mutation) {
        match applied {
            Mutation::MoveNode { path, .. } | Mutation::ReplaceNode { path, .. } => {
                self.focus.node_moved(path)
            }
            Mutation::RemoveNode { path } => self.focus.node_removed(path),
            _ => {}
        }

        let stale = match (self.focus.focused(), &self.template) {
            (Some(path), Some(template)) => !template.contains(path),
            (Some(_), None) => true,
            (None, _) => false,
        };
        if stale {
            debug!("[reconcile] focused node left the tree, clearing selection");
            self.focus.clear_focus();
        }
    }

    fn warn_if_unknown(&self, path: &NodePath, key: &str) {
        let Some(NodeRef::Element(element)) = self.template.as_ref().and_then(|t| t.resolve(path))
        else {
            return;
        };
        let kind = element.element_type();
        if !ElementProps::known_keys(kind).contains(&key) {
            warn!(
                "[update_property] {} has no `{}` property, stored as extra",
                kind, key
            );
        }
    }

    fn applied(&self) -> MutationOutcome {
        MutationOutcome::Applied {
            version: self.version,
        }
    }

    fn skip(&self, operation: &str, reason: NoopReason) -> MutationOutcome {
        debug!("[{}] skipped: {}", operation, reason);
        MutationOutcome::Noop { reason }
    }
}

fn rejected(operation: &str, e: HydrationError) -> EditorError {
    warn!(
        "[{}] rejected payload with {} violation(s): {}",
        operation,
        e.violations().len(),
        e
    );
    EditorError::Hydration(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_hydration::serialize;
    use pagecraft_schema::ElementType;
    use serde_json::json;

    fn store() -> EditorStore {
        let catalog = Arc::new(Catalog::builtin().unwrap());
        EditorStore::init(EditorConfig::default(), catalog)
    }

    fn editing() -> EditorStore {
        let mut store = store();
        store.select_template("business").unwrap();
        store
    }

    #[test]
    fn test_init_is_unselected() {
        let store = store();
        assert_eq!(store.mode(), EditorMode::Unselected);
        assert_eq!(store.active_tool(), ToolId::Select);
        assert!(!store.template_selected());
        assert!(store.template().is_none());
    }

    #[test]
    fn test_select_template_enters_editing() {
        let mut store = store();
        let outcome = store.select_template("business").unwrap();

        assert_eq!(outcome, MutationOutcome::Applied { version: 1 });
        assert_eq!(store.mode(), EditorMode::Editing);
        assert!(store.template_selected());
        assert_eq!(store.template().map(|t| t.id.as_str()), Some("business"));
    }

    #[test]
    fn test_select_unknown_template() {
        let mut store = store();
        assert!(matches!(
            store.select_template("nope"),
            Err(EditorError::NotFound(_))
        ));
        assert_eq!(store.mode(), EditorMode::Unselected);
    }

    #[test]
    fn test_mutations_need_a_document() {
        let mut store = store();
        let path = NodePath::section("header");
        assert!(matches!(
            store.update_property(&path, "name", json!("Top")),
            Err(EditorError::NoDocument)
        ));
        assert!(matches!(
            store.toggle_preview_mode(),
            Err(EditorError::NoDocument)
        ));
    }

    #[test]
    fn test_select_missing_path_clears_selection() {
        let mut store = editing();
        store.select_section("hero", None).unwrap();

        let result = store.select_component("hero", "missing", None);
        assert!(matches!(result, Err(EditorError::NotFound(_))));
        assert_eq!(store.current_focused_element_id(), None);
    }

    #[test]
    fn test_scoped_selection_uses_focused_section() {
        let mut store = editing();
        store.select_section("testimonials", None).unwrap();

        store.select_component_in_scope(Some("quote-2"), None).unwrap();
        assert_eq!(
            store.focused_path(),
            Some(&NodePath::component("testimonials", "quote-2"))
        );

        let outside = store.select_component_in_scope(Some("navbar"), None);
        assert!(matches!(outside, Err(EditorError::NotFound(_))));
        assert_eq!(store.focused_path(), None);
    }

    #[test]
    fn test_unscoped_selection_reports_ambiguity() {
        let mut store = editing();
        let before = store.template().cloned();

        // "body" exists in both testimonial components
        let result = store.select_element_in_scope(Some("body"), None);
        match result {
            Err(EditorError::Ambiguous { matches, .. }) => assert_eq!(matches.len(), 2),
            other => panic!("expected ambiguity, got {:?}", other),
        }
        assert_eq!(store.template().cloned(), before);
    }

    #[test]
    fn test_null_id_clears_selection() {
        let mut store = editing();
        store
            .select_component("header", "navbar", Some(Rect::new(0.0, 0.0, 100.0, 60.0)))
            .unwrap();

        store.select_component_in_scope(None, None).unwrap();
        assert_eq!(store.current_focused_element_id(), None);
        assert_eq!(store.selected_item_rect(), None);
    }

    #[test]
    fn test_set_active_tool() {
        let mut store = editing();
        assert!(store.set_active_tool(ToolId::Text).is_applied());
        assert_eq!(
            store.set_active_tool(ToolId::Text),
            MutationOutcome::Noop {
                reason: NoopReason::Unchanged
            }
        );
        assert_eq!(store.active_tool(), ToolId::Text);
    }

    #[test]
    fn test_invalid_property_value_is_rejected() {
        let mut store = editing();
        let before = store.template().cloned();
        let path = NodePath::element("hero", "banner", "title");

        let result = store.update_property(&path, "level", json!(9));
        assert!(matches!(result, Err(EditorError::Schema(_))));
        assert_eq!(store.template().cloned(), before);
        assert!(!store.can_undo());
    }

    #[test]
    fn test_unknown_property_is_kept() {
        let mut store = editing();
        let path = NodePath::element("hero", "banner", "title");

        store
            .update_property(&path, "animation", json!("fade"))
            .unwrap();
        let view = store.node_view(&path).unwrap();
        assert_eq!(view.node.property("animation"), Some(json!("fade")));
    }

    #[test]
    fn test_move_to_same_index_is_unchanged() {
        let mut store = editing();
        let outcome = store.move_node(&NodePath::section("header"), 0).unwrap();
        assert_eq!(
            outcome,
            MutationOutcome::Noop {
                reason: NoopReason::Unchanged
            }
        );
    }

    #[test]
    fn test_move_drops_geometry_but_keeps_focus() {
        let mut store = editing();
        let path = NodePath::section("testimonials");
        store
            .select(Some(path.clone()), Some(Rect::new(0.0, 400.0, 800.0, 300.0)))
            .unwrap();

        store.move_node(&path, 0).unwrap();
        assert!(store.is_selected(&path));
        assert_eq!(store.selected_item_rect(), None);
        assert_eq!(store.template().map(|t| t.sections[0].id.as_str()), Some("testimonials"));
    }

    #[test]
    fn test_undo_insert_clears_selection_inside_it() {
        let mut store = editing();
        let mut map = serde_json::Map::new();
        map.insert("text".into(), json!("New"));
        let element = Element::new("fresh", ElementProps::from_map(ElementType::Text, map).unwrap());

        store.add_element("hero", "banner", 0, element).unwrap();
        store.select_element("hero", "banner", "fresh", None).unwrap();

        store.undo().unwrap();
        assert_eq!(store.focused_path(), None);
        assert!(store.can_redo());

        store.redo().unwrap();
        assert!(store.template().and_then(|t| t.element("hero", "banner", "fresh")).is_some());
    }

    #[test]
    fn test_history_labels_and_depth() {
        let config = EditorConfig {
            max_undo_levels: 2,
            ..EditorConfig::default()
        };
        let mut store = EditorStore::init(config, Arc::new(Catalog::builtin().unwrap()));
        store.select_template("business").unwrap();

        let logo = NodePath::element("header", "navbar", "logo");
        for name in ["A", "B", "C"] {
            store.update_property(&logo, "text", json!(name)).unwrap();
        }
        assert_eq!(store.undo_levels(), 2);
        assert_eq!(store.undo_description(), Some("Update text"));

        store
            .delete_node(&NodePath::element("hero", "banner", "subtitle"))
            .unwrap();
        assert_eq!(store.undo_description(), Some("Delete subtitle"));

        store.undo().unwrap();
        assert_eq!(store.redo_description(), Some("Delete subtitle"));
        assert_eq!(store.redo_levels(), 1);
    }

    #[test]
    fn test_undo_with_empty_history() {
        let mut store = editing();
        assert_eq!(
            store.undo().unwrap(),
            MutationOutcome::Noop {
                reason: NoopReason::Unchanged
            }
        );
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut store = editing();
        let first = store.begin_request();
        let second = store.begin_request();

        let payload = serialize(store.catalog().get("portfolio").unwrap()).unwrap();
        assert_eq!(
            store.complete_request(first, &payload).unwrap(),
            MutationOutcome::Noop {
                reason: NoopReason::Superseded
            }
        );
        assert_eq!(store.template().map(|t| t.id.as_str()), Some("business"));

        assert!(store.complete_request(second, &payload).unwrap().is_applied());
        assert_eq!(store.template().map(|t| t.id.as_str()), Some("portfolio"));
    }

    #[test]
    fn test_selection_supersedes_pending_request() {
        let mut store = editing();
        let ticket = store.begin_request();
        store.select_template("storefront").unwrap();

        let payload = serialize(store.catalog().get("portfolio").unwrap()).unwrap();
        let outcome = store.complete_request(ticket, &payload).unwrap();
        assert!(!outcome.is_applied());
        assert_eq!(store.template().map(|t| t.id.as_str()), Some("storefront"));
    }

    #[test]
    fn test_failed_selection_still_supersedes_pending_request() {
        let mut store = editing();
        let ticket = store.begin_request();
        assert!(store.select_template("nope").is_err());
        assert!(store.load_template(&json!({ "id": "broken" })).is_err());

        let payload = serialize(store.catalog().get("portfolio").unwrap()).unwrap();
        let outcome = store.complete_request(ticket, &payload).unwrap();
        assert_eq!(
            outcome,
            MutationOutcome::Noop {
                reason: NoopReason::Superseded
            }
        );
        assert_eq!(store.template().map(|t| t.id.as_str()), Some("business"));
    }

    #[test]
    fn test_hydrate_state_restores_session_fields() {
        let mut store = store();
        let template = store.catalog().instantiate("portfolio").unwrap();
        let payload = json!({
            "template": serialize(&template).unwrap(),
            "activeTool": "image",
            "templateSelected": false,
        });

        store.hydrate_state(&payload).unwrap();
        assert_eq!(store.active_tool(), ToolId::Image);
        assert!(!store.template_selected());
        assert_eq!(store.template(), Some(&template));
    }

    #[test]
    fn test_snapshot_round_trips_through_hydrate() {
        let mut store = editing();
        store.set_active_tool(ToolId::Style);
        let snapshot = store.snapshot().unwrap();
        let payload = pagecraft_hydration::serialize_project(&snapshot).unwrap();

        let mut restored = EditorStore::init(EditorConfig::default(), store.catalog().clone());
        restored.hydrate_state(&payload).unwrap();
        assert_eq!(restored.snapshot(), Some(snapshot));
    }

    #[test]
    fn test_reset_and_teardown() {
        let mut store = editing();
        store.set_active_tool(ToolId::Pan);
        store.reset();
        assert_eq!(store.mode(), EditorMode::Unselected);
        assert_eq!(store.active_tool(), ToolId::Select);
        assert!(!store.can_undo());

        store.select_template("portfolio").unwrap();
        let template = store.teardown();
        assert_eq!(template.map(|t| t.id), Some("portfolio".to_string()));
    }

    #[test]
    fn test_node_view_reports_editability_and_selection() {
        let mut store = editing();
        let logo = NodePath::element("header", "navbar", "logo");
        store.select(Some(logo.clone()), None).unwrap();

        let view = store.node_view(&logo).unwrap();
        assert_eq!(view.editable, EditableType::LockedReplacing);
        assert!(view.selected);
        assert_eq!(view.node.type_name(), "Logo");
    }
}
