use std::collections::HashMap;
use uuid::Uuid;

use crate::error::{DataError, Result};
use crate::handle::{is_real_handle, Hvo};
use crate::object::DomainObject;

/// The trait that object repositories implement.
///
/// Resolves session handles to live objects. Handles are never reused
/// within a session, so a removed handle stays invalid.
pub trait ObjectRepository {
    /// Get a live object by handle.
    fn resolve(&self, hvo: Hvo) -> Result<&DomainObject>;

    /// Get a live object for mutation.
    fn resolve_mut(&mut self, hvo: Hvo) -> Result<&mut DomainObject>;

    /// Whether the handle names a live object.
    fn is_valid_id(&self, hvo: Hvo) -> bool;

    /// Handle of the object with this persistent identity.
    fn resolve_by_guid(&self, guid: Uuid) -> Option<Hvo>;

    /// Reserve a fresh handle.
    fn allocate_hvo(&mut self) -> Hvo;

    /// Insert an object under its own handle, replacing any previous state.
    fn insert(&mut self, obj: DomainObject);

    /// Remove an object, returning its last state.
    fn remove(&mut self, hvo: Hvo) -> Result<DomainObject>;

    /// All live handles, in ascending order.
    fn handles(&self) -> Vec<Hvo>;

    /// Number of live objects.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory repository keyed by handle, with a GUID index.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    objects: HashMap<Hvo, DomainObject>,
    by_guid: HashMap<Uuid, Hvo>,
    last_hvo: Hvo,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ObjectRepository for MemoryRepository {
    fn resolve(&self, hvo: Hvo) -> Result<&DomainObject> {
        self.objects.get(&hvo).ok_or(DataError::InvalidObject(hvo))
    }

    fn resolve_mut(&mut self, hvo: Hvo) -> Result<&mut DomainObject> {
        self.objects
            .get_mut(&hvo)
            .ok_or(DataError::InvalidObject(hvo))
    }

    fn is_valid_id(&self, hvo: Hvo) -> bool {
        is_real_handle(hvo) && self.objects.contains_key(&hvo)
    }

    fn resolve_by_guid(&self, guid: Uuid) -> Option<Hvo> {
        self.by_guid.get(&guid).copied()
    }

    fn allocate_hvo(&mut self) -> Hvo {
        self.last_hvo += 1;
        self.last_hvo
    }

    fn insert(&mut self, obj: DomainObject) {
        if obj.hvo > self.last_hvo {
            self.last_hvo = obj.hvo;
        }
        self.by_guid.insert(obj.guid, obj.hvo);
        self.objects.insert(obj.hvo, obj);
    }

    fn remove(&mut self, hvo: Hvo) -> Result<DomainObject> {
        let obj = self
            .objects
            .remove(&hvo)
            .ok_or(DataError::InvalidObject(hvo))?;
        self.by_guid.remove(&obj.guid);
        Ok(obj)
    }

    fn handles(&self) -> Vec<Hvo> {
        let mut hvos: Vec<_> = self.objects.keys().copied().collect();
        hvos.sort_unstable();
        hvos
    }

    fn len(&self) -> usize {
        self.objects.len()
    }
}
