//! Per-vessel task lists.
//!
//! Lists stay sorted ascending by priority (stable on ties), at most
//! one operation per vessel is active, and an active operation is
//! always pending. Empty input is rejected silently: the contract is
//! no-op, not error.

use uuid::Uuid;

use crate::model::{OpStatus, Operation, next_status};

use super::{Board, Result};

impl Board {
    /// Adds a pending operation and re-sorts the list. Empty text is a
    /// silent no-op.
    pub fn add_op(&mut self, index: usize, text: &str, priority: u8) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let vessel = self.vessel_mut(index)?;
        vessel.ops.push(Operation::new(text, priority));
        vessel.ops.sort_by_key(|op| op.priority);
        self.mark_dirty(index)
    }

    /// Rewrites an operation's text and priority and re-sorts. Blank
    /// text is a silent no-op, as is an unknown id.
    pub fn edit_op(&mut self, index: usize, op_id: Uuid, text: &str, priority: u8) -> Result<()> {
        if text.trim().is_empty() {
            return Ok(());
        }
        let vessel = self.vessel_mut(index)?;
        let Some(op) = vessel.ops.iter_mut().find(|op| op.id == op_id) else {
            return Ok(());
        };
        op.description = text.to_string();
        op.priority = priority;
        vessel.ops.sort_by_key(|op| op.priority);
        self.mark_dirty(index)
    }

    /// Marks the operation as the one in progress, or un-marks it if it
    /// already was. At most one operation per vessel is ever active.
    pub fn toggle_active(&mut self, index: usize, op_id: Uuid) -> Result<()> {
        let vessel = self.vessel_mut(index)?;
        vessel.active_op_id = if vessel.active_op_id == Some(op_id) {
            None
        } else {
            Some(op_id)
        };
        self.mark_dirty(index)
    }

    /// Applies the status-button transition (see [`next_status`]).
    /// When the active operation ends up anything other than pending,
    /// the active reference is cleared.
    pub fn set_op_status(&mut self, index: usize, op_id: Uuid, requested: OpStatus) -> Result<()> {
        let vessel = self.vessel_mut(index)?;
        let Some(op) = vessel.ops.iter_mut().find(|op| op.id == op_id) else {
            return Ok(());
        };
        let resulting = next_status(op.status, requested);
        op.status = resulting;
        if resulting != OpStatus::Pending && vessel.active_op_id == Some(op_id) {
            vessel.active_op_id = None;
        }
        self.mark_dirty(index)
    }

    /// Deletes the operation. A stale active reference is left behind
    /// on purpose; readers resolve it through [`crate::model::Vessel::active_op`].
    pub fn remove_op(&mut self, index: usize, op_id: Uuid) -> Result<()> {
        let vessel = self.vessel_mut(index)?;
        vessel.ops.retain(|op| op.id != op_id);
        self.mark_dirty(index)
    }

    /// Looks an operation up by id on one vessel's list.
    pub fn find_op(&self, index: usize, op_id: Uuid) -> Option<&Operation> {
        self.vessel(index)
            .ok()?
            .ops
            .iter()
            .find(|op| op.id == op_id)
    }
}
