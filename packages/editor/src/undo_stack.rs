//! # Undo/Redo Stack
//!
//! Tracks mutation history and enables undo/redo operations.
//!
//! ## Design
//!
//! - Each mutation records its inverse before being applied
//! - Undo applies the inverse and moves the entry to the redo stack
//! - Redo reapplies the original mutation
//! - New mutations clear the redo stack
//! - Every entry is one user action; entries are never merged
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//!
//! let mutation = Mutation::SetProperty { path, key, value };
//! stack.apply_described(&mutation, &mut template, Some("Edit title".into()))?;
//!
//! stack.undo(&mut template)?;
//! stack.redo(&mut template)?;
//! ```

use crate::mutations::{Mutation, MutationError};
use pagecraft_schema::Template;

/// One undoable step
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub mutation: Mutation,
    pub inverse: Mutation,
    pub description: Option<String>,
}

/// Undo/redo stack for template editing
#[derive(Debug)]
pub struct UndoStack {
    /// Applied mutations (most recent last)
    undo_stack: Vec<HistoryEntry>,

    /// Undone mutations (most recent last)
    redo_stack: Vec<HistoryEntry>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
        }
    }

    /// Apply a mutation and record it under a user-facing description
    pub fn apply_described(
        &mut self,
        mutation: &Mutation,
        template: &mut Template,
        description: Option<String>,
    ) -> Result<(), MutationError> {
        // Validate first so a rejected edit never reaches history
        mutation.validate(template)?;
        let inverse = mutation.to_inverse(template)?;
        mutation.apply(template)?;

        self.push(HistoryEntry {
            mutation: mutation.clone(),
            inverse,
            description,
        });
        Ok(())
    }

    fn push(&mut self, entry: HistoryEntry) {
        self.undo_stack.push(entry);

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // New action invalidates the future
        self.redo_stack.clear();
    }

    /// Undo the most recent entry, returning the mutation that was applied
    pub fn undo(&mut self, template: &mut Template) -> Result<Option<Mutation>, MutationError> {
        let Some(entry) = self.undo_stack.pop() else {
            return Ok(None);
        };

        if let Err(e) = entry.inverse.replay(template) {
            self.undo_stack.push(entry);
            return Err(e);
        }

        let applied = entry.inverse.clone();
        self.redo_stack.push(entry);
        Ok(Some(applied))
    }

    /// Redo the most recently undone entry, returning the mutation that was applied
    pub fn redo(&mut self, template: &mut Template) -> Result<Option<Mutation>, MutationError> {
        let Some(entry) = self.redo_stack.pop() else {
            return Ok(None);
        };

        if let Err(e) = entry.mutation.replay(template) {
            self.redo_stack.push(entry);
            return Err(e);
        }

        let applied = entry.mutation.clone();
        self.undo_stack.push(entry);
        Ok(Some(applied))
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Description of the next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .last()
            .and_then(|entry| entry.description.as_deref())
    }

    /// Description of the next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|entry| entry.description.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
