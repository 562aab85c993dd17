use std::rc::Rc;

use crate::handle::{Flid, Hvo};

/// Receives property change announcements.
pub trait PropChangeListener {
    /// `cvins` items were inserted and `cvdel` removed at `ivmin` of
    /// `hvo.tag`. Scalar changes are announced as `(0, 0, 0)`.
    fn prop_changed(&self, hvo: Hvo, tag: Flid, ivmin: usize, cvins: usize, cvdel: usize);
}

/// Registered change listeners.
///
/// Broadcasting is always explicit: whoever mutated the data announces it.
#[derive(Default)]
pub struct NotifierRegistry {
    listeners: Vec<Rc<dyn PropChangeListener>>,
}

impl NotifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_notification(&mut self, listener: Rc<dyn PropChangeListener>) {
        if !self.contains(&listener) {
            self.listeners.push(listener);
        }
    }

    /// Unregisters by identity. Returns false if it was not registered.
    pub fn remove_notification(&mut self, listener: &Rc<dyn PropChangeListener>) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| !Rc::ptr_eq(l, listener));
        self.listeners.len() != before
    }

    pub fn contains(&self, listener: &Rc<dyn PropChangeListener>) -> bool {
        self.listeners.iter().any(|l| Rc::ptr_eq(l, listener))
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn prop_changed(&self, hvo: Hvo, tag: Flid, ivmin: usize, cvins: usize, cvdel: usize) {
        tracing::trace!(
            "prop_changed hvo={} tag={} ivmin={} cvins={} cvdel={} ({} listeners)",
            hvo,
            tag,
            ivmin,
            cvins,
            cvdel,
            self.listeners.len()
        );
        for listener in &self.listeners {
            listener.prop_changed(hvo, tag, ivmin, cvins, cvdel);
        }
    }
}

impl std::fmt::Debug for NotifierRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifierRegistry")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
