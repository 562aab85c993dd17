//! Undo/redo stack with nestable, labelled tasks.
//!
//! Every mutation is recorded as a `Change` holding the before and after
//! state of one property, one ownership link or one whole object. A task is a list of changes
//! undone in reverse order and redone in forward order, the way a text
//! transaction is inverted operation by operation.
//!
//! # Invariants
//! - Begin/End pairs nest; inner pairs fold into the outermost task and
//!   their labels are ignored.
//! - Undoable and non-undoable brackets never nest inside each other.
//! - Empty tasks are discarded when closed, so an empty bracket leaves
//!   `can_undo`/`can_redo` untouched.
//! - Committing a task that added changes clears the redo list.

use std::collections::VecDeque;

use crate::error::{DataError, Result};
use crate::handle::{Flid, Hvo};
use crate::object::DomainObject;
use crate::repository::ObjectRepository;
use crate::value::PropValue;

/// One recorded mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// A property value replaced; `None` means "no recorded value".
    Prop {
        hvo: Hvo,
        tag: Flid,
        before: Option<PropValue>,
        after: Option<PropValue>,
    },
    /// An object created (`before == None`) or deleted (`after == None`).
    Object {
        hvo: Hvo,
        before: Option<Box<DomainObject>>,
        after: Option<Box<DomainObject>>,
    },
    /// An object re-parented; only its `(owner, owning_flid)` pair moves.
    Owner {
        hvo: Hvo,
        before: (Hvo, Flid),
        after: (Hvo, Flid),
    },
}

impl Change {
    /// The change that reverses this one.
    pub fn invert(&self) -> Change {
        match self {
            Change::Prop {
                hvo,
                tag,
                before,
                after,
            } => Change::Prop {
                hvo: *hvo,
                tag: *tag,
                before: after.clone(),
                after: before.clone(),
            },
            Change::Object { hvo, before, after } => Change::Object {
                hvo: *hvo,
                before: after.clone(),
                after: before.clone(),
            },
            Change::Owner { hvo, before, after } => Change::Owner {
                hvo: *hvo,
                before: *after,
                after: *before,
            },
        }
    }

    /// Writes the `after` state into the repository.
    pub fn apply<R: ObjectRepository + ?Sized>(&self, repo: &mut R) -> Result<()> {
        match self {
            Change::Prop { hvo, tag, after, .. } => {
                let obj = repo.resolve_mut(*hvo)?;
                match after {
                    Some(value) => {
                        obj.set_prop(*tag, value.clone());
                    }
                    None => {
                        obj.remove_prop(*tag);
                    }
                }
            }
            Change::Object { hvo, after, .. } => match after {
                Some(obj) => repo.insert(obj.as_ref().clone()),
                None => {
                    if repo.is_valid_id(*hvo) {
                        repo.remove(*hvo)?;
                    }
                }
            },
            Change::Owner { hvo, after, .. } => {
                let obj = repo.resolve_mut(*hvo)?;
                (obj.owner, obj.owning_flid) = *after;
            }
        }
        Ok(())
    }
}

/// A named unit of undoable work.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UndoTask {
    pub undo_label: String,
    pub redo_label: String,
    pub changes: Vec<Change>,
}

impl UndoTask {
    pub fn new(undo_label: &str, redo_label: &str) -> Self {
        Self {
            undo_label: undo_label.to_string(),
            redo_label: redo_label.to_string(),
            changes: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Reverts every change, last first.
    pub fn undo_into<R: ObjectRepository + ?Sized>(&self, repo: &mut R) -> Result<()> {
        for change in self.changes.iter().rev() {
            change.invert().apply(repo)?;
        }
        Ok(())
    }

    /// Re-applies every change, first first.
    pub fn redo_into<R: ObjectRepository + ?Sized>(&self, repo: &mut R) -> Result<()> {
        for change in &self.changes {
            change.apply(repo)?;
        }
        Ok(())
    }
}

/// Kind of the currently open bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskMode {
    Undoable,
    NonUndoable,
}

#[derive(Debug)]
struct OpenTask {
    mode: TaskMode,
    depth: usize,
    task: UndoTask,
    /// Changes carried over when a committed task was continued.
    base_len: usize,
}

/// The undo/redo history plus the currently open bracket.
#[derive(Debug)]
pub struct UndoStack {
    done: VecDeque<UndoTask>,
    undone: Vec<UndoTask>,
    open: Option<OpenTask>,
    max_depth: usize,
}

impl UndoStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            done: VecDeque::new(),
            undone: Vec::new(),
            open: None,
            max_depth: max_depth.max(1),
        }
    }

    pub fn begin_undo_task(&mut self, undo_label: &str, redo_label: &str) -> Result<()> {
        match &mut self.open {
            None => {
                tracing::debug!("begin undo task '{}'", undo_label);
                self.open = Some(OpenTask {
                    mode: TaskMode::Undoable,
                    depth: 1,
                    task: UndoTask::new(undo_label, redo_label),
                    base_len: 0,
                });
                Ok(())
            }
            Some(open) if open.mode == TaskMode::Undoable => {
                open.depth += 1;
                tracing::trace!(
                    "nested undo task '{}' folded into '{}'",
                    undo_label,
                    open.task.undo_label
                );
                Ok(())
            }
            Some(_) => Err(violation(
                "cannot begin an undoable task inside a non-undoable task",
            )),
        }
    }

    pub fn end_undo_task(&mut self) -> Result<()> {
        self.end(TaskMode::Undoable)
    }

    pub fn begin_non_undoable_task(&mut self) -> Result<()> {
        match &mut self.open {
            None => {
                tracing::debug!("begin non-undoable task");
                self.open = Some(OpenTask {
                    mode: TaskMode::NonUndoable,
                    depth: 1,
                    task: UndoTask::default(),
                    base_len: 0,
                });
                Ok(())
            }
            Some(open) if open.mode == TaskMode::NonUndoable => {
                open.depth += 1;
                Ok(())
            }
            Some(_) => Err(violation(
                "cannot begin a non-undoable task inside an undoable task",
            )),
        }
    }

    pub fn end_non_undoable_task(&mut self) -> Result<()> {
        self.end(TaskMode::NonUndoable)
    }

    /// Reopens the most recently committed task for trailing changes.
    pub fn continue_undo_task(&mut self) -> Result<()> {
        if self.open.is_some() {
            return Err(violation("cannot continue a task while another is open"));
        }
        if !self.undone.is_empty() {
            return Err(violation("the last action was an undo; nothing to continue"));
        }
        let task = self
            .done
            .pop_back()
            .ok_or_else(|| violation("no committed task to continue"))?;
        tracing::debug!("continue undo task '{}'", task.undo_label);
        self.open = Some(OpenTask {
            mode: TaskMode::Undoable,
            depth: 1,
            base_len: task.changes.len(),
            task,
        });
        Ok(())
    }

    /// Commits what the open task holds so far and starts a new task with
    /// the given labels at the same nesting depth.
    pub fn break_undo_task(&mut self, undo_label: &str, redo_label: &str) -> Result<()> {
        let open = match self.open.take() {
            Some(open) if open.mode == TaskMode::Undoable => open,
            other => {
                self.open = other;
                return Err(violation("no open undoable task to break"));
            }
        };
        let depth = open.depth;
        self.commit(open);
        tracing::debug!("break undo task; new task '{}'", undo_label);
        self.open = Some(OpenTask {
            mode: TaskMode::Undoable,
            depth,
            task: UndoTask::new(undo_label, redo_label),
            base_len: 0,
        });
        Ok(())
    }

    /// Closes the open undoable task and returns the changes to revert.
    ///
    /// A continued task keeps the changes it had when it was reopened.
    pub fn take_for_rollback(&mut self) -> Result<UndoTask> {
        match self.open.take() {
            Some(open) if open.mode == TaskMode::Undoable => {
                let OpenTask {
                    mut task, base_len, ..
                } = open;
                let tail = task.changes.split_off(base_len);
                let rolled_back = UndoTask {
                    undo_label: task.undo_label.clone(),
                    redo_label: task.redo_label.clone(),
                    changes: tail,
                };
                if !task.is_empty() {
                    self.done.push_back(task);
                }
                Ok(rolled_back)
            }
            Some(open) => {
                self.open = Some(open);
                Err(DataError::NotSupported(
                    "rollback of a non-undoable task",
                ))
            }
            None => Err(violation("no open task to roll back")),
        }
    }

    /// Fails unless a mutation may be issued now.
    pub fn check_can_mutate(&self, require_task: bool) -> Result<()> {
        if require_task && self.open.is_none() {
            tracing::warn!("mutation attempted outside an undo task");
            return Err(violation("mutation outside an undo task"));
        }
        Ok(())
    }

    /// Logs a change into the open undoable task. Changes made inside a
    /// non-undoable task, or with no task, are not kept.
    pub fn record(&mut self, change: Change) {
        if let Some(open) = &mut self.open {
            if open.mode == TaskMode::Undoable {
                open.task.changes.push(change);
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.done.back().map(|t| t.undo_label.as_str())
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.undone.last().map(|t| t.redo_label.as_str())
    }

    pub fn is_task_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn depth(&self) -> usize {
        self.open.as_ref().map(|o| o.depth).unwrap_or(0)
    }

    pub fn undo_count(&self) -> usize {
        self.done.len()
    }

    /// Removes the next task to undo. Fails while a task is open.
    pub fn pop_undo(&mut self) -> Result<Option<UndoTask>> {
        if self.open.is_some() {
            return Err(violation("cannot undo while a task is open"));
        }
        Ok(self.done.pop_back())
    }

    /// Removes the next task to redo. Fails while a task is open.
    pub fn pop_redo(&mut self) -> Result<Option<UndoTask>> {
        if self.open.is_some() {
            return Err(violation("cannot redo while a task is open"));
        }
        Ok(self.undone.pop())
    }

    pub fn push_undone(&mut self, task: UndoTask) {
        self.undone.push(task);
    }

    pub fn push_redone(&mut self, task: UndoTask) {
        self.done.push_back(task);
        self.trim();
    }

    fn end(&mut self, mode: TaskMode) -> Result<()> {
        let open = match self.open.as_mut() {
            Some(open) if open.mode == mode => open,
            Some(_) => {
                return Err(violation(match mode {
                    TaskMode::Undoable => "end of undoable task inside a non-undoable task",
                    TaskMode::NonUndoable => "end of non-undoable task inside an undoable task",
                }))
            }
            None => return Err(violation("end of a task that was never begun")),
        };
        open.depth -= 1;
        if open.depth > 0 {
            return Ok(());
        }
        if let Some(open) = self.open.take() {
            match open.mode {
                TaskMode::Undoable => self.commit(open),
                TaskMode::NonUndoable => tracing::debug!("end non-undoable task"),
            }
        }
        Ok(())
    }

    fn commit(&mut self, open: OpenTask) {
        let added = open.task.changes.len() > open.base_len;
        if open.task.is_empty() {
            tracing::trace!("discarding empty undo task '{}'", open.task.undo_label);
            return;
        }
        tracing::debug!(
            "commit undo task '{}' ({} changes)",
            open.task.undo_label,
            open.task.changes.len()
        );
        self.done.push_back(open.task);
        if added {
            self.undone.clear();
        }
        self.trim();
    }

    fn trim(&mut self) {
        while self.done.len() > self.max_depth {
            self.done.pop_front();
        }
    }
}

fn violation(msg: &str) -> DataError {
    tracing::warn!("undo nesting violation: {}", msg);
    DataError::NestingViolation(msg.to_string())
}
