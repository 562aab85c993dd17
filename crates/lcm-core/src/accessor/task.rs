//! Undo task bracketing and undo/redo against the repository.

use super::DomainDataByFlid;
use crate::error::{DataError, Result};
use crate::repository::ObjectRepository;
use crate::undo::UndoStack;

impl<R: ObjectRepository> DomainDataByFlid<R> {
    /// Opens an undoable task, or folds into the one already open.
    pub fn begin_undo_task(&mut self, undo_label: &str, redo_label: &str) -> Result<()> {
        self.undo.begin_undo_task(undo_label, redo_label)
    }

    pub fn end_undo_task(&mut self) -> Result<()> {
        self.undo.end_undo_task()
    }

    pub fn begin_non_undoable_task(&mut self) -> Result<()> {
        self.undo.begin_non_undoable_task()
    }

    pub fn end_non_undoable_task(&mut self) -> Result<()> {
        self.undo.end_non_undoable_task()
    }

    pub fn continue_undo_task(&mut self) -> Result<()> {
        self.undo.continue_undo_task()
    }

    pub fn break_undo_task(&mut self, undo_label: &str, redo_label: &str) -> Result<()> {
        self.undo.break_undo_task(undo_label, redo_label)
    }

    /// Reverts everything the open undoable task changed and closes it,
    /// whatever its nesting depth.
    pub fn rollback(&mut self) -> Result<()> {
        let task = self.undo.take_for_rollback()?;
        tracing::debug!(
            "rollback '{}' ({} changes)",
            task.undo_label,
            task.changes.len()
        );
        task.undo_into(&mut self.repo)
    }

    /// Undoes the most recent task. Returns false when there is none.
    pub fn undo(&mut self) -> Result<bool> {
        let Some(task) = self.undo.pop_undo()? else {
            return Ok(false);
        };
        tracing::debug!("undo '{}'", task.undo_label);
        task.undo_into(&mut self.repo)?;
        self.undo.push_undone(task);
        Ok(true)
    }

    /// Redoes the most recently undone task. Returns false when there is none.
    pub fn redo(&mut self) -> Result<bool> {
        let Some(task) = self.undo.pop_redo()? else {
            return Ok(false);
        };
        tracing::debug!("redo '{}'", task.redo_label);
        task.redo_into(&mut self.repo)?;
        self.undo.push_redone(task);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.undo.undo_label()
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.undo.redo_label()
    }

    pub fn is_task_open(&self) -> bool {
        self.undo.is_task_open()
    }

    pub fn undo_stack(&self) -> &UndoStack {
        &self.undo
    }

    /// The undo stack is owned by the accessor and cannot be swapped.
    pub fn set_action_handler(&mut self, _stack: UndoStack) -> Result<()> {
        Err(DataError::NotSupported("replacing the action handler"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AccessorConfig;
    use crate::handle::NULL_HVO;
    use crate::model::{class, flid};

    #[test]
    fn undo_and_redo_round_trip_a_value() {
        let mut dd = DomainDataByFlid::new(AccessorConfig::default()).unwrap();
        dd.begin_undo_task("Create", "Create").unwrap();
        let entry = dd.make_new_object(class::LEX_ENTRY, NULL_HVO, 0, -1).unwrap();
        dd.end_undo_task().unwrap();

        dd.begin_undo_task("Undo Homograph", "Redo Homograph").unwrap();
        dd.set_integer(entry, flid::LEX_ENTRY_HOMOGRAPH_NUMBER, 2).unwrap();
        dd.end_undo_task().unwrap();

        assert_eq!(dd.undo_label(), Some("Undo Homograph"));
        assert!(dd.undo().unwrap());
        assert_eq!(dd.get_integer(entry, flid::LEX_ENTRY_HOMOGRAPH_NUMBER).unwrap(), 0);
        assert_eq!(dd.redo_label(), Some("Redo Homograph"));
        assert!(dd.redo().unwrap());
        assert_eq!(dd.get_integer(entry, flid::LEX_ENTRY_HOMOGRAPH_NUMBER).unwrap(), 2);

        assert!(dd.undo().unwrap());
        assert!(dd.undo().unwrap());
        assert!(!dd.is_valid_object(entry));
        assert!(!dd.undo().unwrap());
    }

    #[test]
    fn undo_while_task_open_is_a_violation() {
        let mut dd = DomainDataByFlid::new(AccessorConfig::default()).unwrap();
        dd.begin_undo_task("A", "a").unwrap();
        assert!(matches!(dd.undo(), Err(DataError::NestingViolation(_))));
        assert!(matches!(dd.redo(), Err(DataError::NestingViolation(_))));
    }

    #[test]
    fn rollback_reverts_open_task() {
        let mut dd = DomainDataByFlid::new(AccessorConfig::default()).unwrap();
        dd.begin_undo_task("Create", "Create").unwrap();
        let entry = dd.make_new_object(class::LEX_ENTRY, NULL_HVO, 0, -1).unwrap();
        dd.rollback().unwrap();

        assert!(!dd.is_valid_object(entry));
        assert!(!dd.is_task_open());
        assert!(!dd.can_undo());
    }

    #[test]
    fn mutation_requires_a_task() {
        let mut dd = DomainDataByFlid::new(AccessorConfig::default()).unwrap();
        assert!(matches!(
            dd.make_new_object(class::LEX_ENTRY, NULL_HVO, 0, -1),
            Err(DataError::NestingViolation(_))
        ));

        let mut config = AccessorConfig::default();
        config.undo.require_task = false;
        let mut relaxed = DomainDataByFlid::new(config).unwrap();
        let entry = relaxed
            .make_new_object(class::LEX_ENTRY, NULL_HVO, 0, -1)
            .unwrap();
        assert!(relaxed.is_valid_object(entry));
        assert!(!relaxed.can_undo());
    }

    #[test]
    fn action_handler_cannot_be_replaced() {
        let mut dd = DomainDataByFlid::new(AccessorConfig::default()).unwrap();
        assert!(matches!(
            dd.set_action_handler(UndoStack::new(5)),
            Err(DataError::NotSupported(_))
        ));
    }
}
