//! Local model of the workflow collection and the active selection.
//!
//! The store holds pure state: every method is a synchronous transition
//! applied by the workbench after the corresponding server call has
//! confirmed. No transition can leave the active id dangling: it is
//! always either `None` or the id of a workflow currently in the list.

use crate::api::payloads::Workflow;
use crate::types::WorkflowId;

/// Ordered workflow list (newest first) plus the active selection.
#[derive(Debug, Default)]
pub struct WorkflowStore {
    items: Vec<Workflow>,
    active: Option<WorkflowId>,
}

impl WorkflowStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The workflows in display order.
    #[must_use]
    pub fn items(&self) -> &[Workflow] {
        &self.items
    }

    /// The active workflow id, if any.
    #[must_use]
    pub fn active(&self) -> Option<WorkflowId> {
        self.active
    }

    /// The active workflow record, if any.
    #[must_use]
    pub fn active_workflow(&self) -> Option<&Workflow> {
        let id = self.active?;
        self.items.iter().find(|workflow| workflow.id == id)
    }

    /// Replaces the list with a fresh server fetch.
    ///
    /// Only the first successful fetch chooses an active workflow (the
    /// first item, or none when empty); later fetches never override an
    /// existing choice unless it no longer exists in the new list.
    pub fn apply_listed(&mut self, items: Vec<Workflow>) {
        self.items = items;
        match self.active {
            Some(id) if self.items.iter().any(|workflow| workflow.id == id) => {}
            _ => self.active = self.items.first().map(|workflow| workflow.id),
        }
    }

    /// Prepends a newly created workflow and makes it active.
    pub fn apply_created(&mut self, workflow: Workflow) {
        self.active = Some(workflow.id);
        self.items.insert(0, workflow);
    }

    /// Replaces the matching entry in place, preserving list position.
    pub fn apply_renamed(&mut self, workflow: Workflow) {
        if let Some(slot) = self.items.iter_mut().find(|entry| entry.id == workflow.id) {
            *slot = workflow;
        }
    }

    /// Drops the entry; if it was active, falls back to the new first
    /// entry (or none). Returns `true` when the active id changed.
    pub fn apply_removed(&mut self, id: WorkflowId) -> bool {
        self.items.retain(|workflow| workflow.id != id);
        if self.active == Some(id) {
            self.active = self.items.first().map(|workflow| workflow.id);
            return true;
        }
        false
    }

    /// Selects a workflow by id. Returns `true` when the selection
    /// changed; unknown ids are ignored.
    pub fn select(&mut self, id: WorkflowId) -> bool {
        if self.active == Some(id) || !self.items.iter().any(|workflow| workflow.id == id) {
            return false;
        }
        self.active = Some(id);
        true
    }

    /// Empties the store (logout / total reset).
    pub fn clear(&mut self) {
        self.items.clear();
        self.active = None;
    }
}
