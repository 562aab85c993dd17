//! Field-id indexed access to the domain object graph.
//!
//! `DomainDataByFlid` is the single entry point callers use to read and
//! write any property of any object by `(hvo, flid)`. It owns the object
//! repository, the meta-data catalog, the class factory, the writing
//! system manager, the undo stack and the change notifier registry.
//!
//! # Invariants
//! - Every read or write resolves the handle first (`InvalidObject`), then
//!   checks the field is declared on the object's class (`InvalidField`),
//!   then checks the field's kind fits the operation (`KindMismatch`).
//! - Every mutation is recorded on the undo stack before it returns.
//! - Setters never broadcast; callers announce changes with `prop_changed`.
//! - An object is owned by at most one slot, and every owned object's
//!   `owner`/`owning_flid` name the slot that holds it.

mod lifecycle;
mod paragraph;
mod scalar;
mod strings;
mod task;
mod vector;

use std::collections::HashSet;
use std::rc::Rc;
use std::sync::Arc;

use crate::catalog::{FieldDef, MetaDataCache};
use crate::config::AccessorConfig;
use crate::error::{DataError, Result};
use crate::factory::ObjectFactory;
use crate::handle::{is_real_handle, tags, ClassId, Flid, Hvo, NULL_HVO};
use crate::kind::PropertyKind;
use crate::model::standard_catalog;
use crate::notify::{NotifierRegistry, PropChangeListener};
use crate::object::DomainObject;
use crate::repository::{MemoryRepository, ObjectRepository};
use crate::undo::{Change, UndoStack};
use crate::value::PropValue;
use crate::ws::WritingSystemManager;

/// Property accessor over an object repository.
pub struct DomainDataByFlid<R: ObjectRepository = MemoryRepository> {
    repo: R,
    mdc: Arc<MetaDataCache>,
    factory: ObjectFactory,
    wsm: WritingSystemManager,
    undo: UndoStack,
    notifiers: NotifierRegistry,
    config: AccessorConfig,
}

impl DomainDataByFlid<MemoryRepository> {
    /// Accessor over an empty in-memory repository and the standard schema.
    pub fn new(config: AccessorConfig) -> Result<Self> {
        let mdc = standard_catalog()?;
        let factory = ObjectFactory::standard(&mdc);
        Self::with_parts(MemoryRepository::new(), Arc::new(mdc), factory, config)
    }
}

impl<R: ObjectRepository> DomainDataByFlid<R> {
    /// Accessor over caller-supplied collaborators.
    pub fn with_parts(
        repo: R,
        mdc: Arc<MetaDataCache>,
        factory: ObjectFactory,
        config: AccessorConfig,
    ) -> Result<Self> {
        config.validate()?;
        tracing::debug!(
            "accessor ready: {} classes, {} fields, {} objects",
            mdc.class_count(),
            mdc.field_count(),
            repo.len()
        );
        Ok(Self {
            wsm: WritingSystemManager::new(&config.writing_systems),
            undo: UndoStack::new(config.undo.max_depth),
            notifiers: NotifierRegistry::new(),
            repo,
            mdc,
            factory,
            config,
        })
    }

    pub fn config(&self) -> &AccessorConfig {
        &self.config
    }

    pub fn meta_data_cache(&self) -> &MetaDataCache {
        &self.mdc
    }

    pub fn writing_system_factory(&self) -> &WritingSystemManager {
        &self.wsm
    }

    pub fn writing_system_factory_mut(&mut self) -> &mut WritingSystemManager {
        &mut self.wsm
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// False for the null handle, sentinels, and handles of deleted objects.
    pub fn is_valid_object(&self, hvo: Hvo) -> bool {
        self.repo.is_valid_id(hvo)
    }

    pub fn class_of(&self, hvo: Hvo) -> Result<ClassId> {
        Ok(self.object(hvo)?.class_id)
    }

    /// Whether `tag` is declared on the class of `hvo`. Never fails.
    pub fn has_field(&self, hvo: Hvo, tag: Flid) -> bool {
        self.object(hvo)
            .map(|obj| self.mdc.is_field_of(obj.class_id, tag))
            .unwrap_or(false)
    }

    /// Whether `hvo` has a recorded value for `tag`. Never fails.
    ///
    /// The reserved `CmObject` tags always count as present.
    pub fn has_prop(&self, hvo: Hvo, tag: Flid) -> bool {
        match self.object(hvo) {
            Ok(obj) if tags::is_reserved(tag) => self.mdc.is_field_of(obj.class_id, tag),
            Ok(obj) => self.mdc.is_field_of(obj.class_id, tag) && obj.prop(tag).is_some(),
            Err(_) => false,
        }
    }

    pub fn add_notification(&mut self, listener: Rc<dyn PropChangeListener>) {
        self.notifiers.add_notification(listener);
    }

    pub fn remove_notification(&mut self, listener: &Rc<dyn PropChangeListener>) -> bool {
        self.notifiers.remove_notification(listener)
    }

    /// Announces a change to every registered listener.
    pub fn prop_changed(&self, hvo: Hvo, tag: Flid, ivmin: usize, cvins: usize, cvdel: usize) {
        self.notifiers.prop_changed(hvo, tag, ivmin, cvins, cvdel);
    }

    /// Automatic notification is not offered; broadcasts are explicit.
    pub fn set_auto_notify(&mut self, _enabled: bool) -> Result<()> {
        Err(DataError::NotSupported("automatic change notification"))
    }

    fn object(&self, hvo: Hvo) -> Result<&DomainObject> {
        if !is_real_handle(hvo) {
            return Err(DataError::InvalidObject(hvo));
        }
        self.repo.resolve(hvo)
    }

    /// Resolves `hvo` and looks up `tag` on its class.
    fn field(&self, hvo: Hvo, tag: Flid) -> Result<(&DomainObject, &FieldDef)> {
        let obj = self.object(hvo)?;
        if !self.mdc.is_field_of(obj.class_id, tag) {
            return Err(DataError::InvalidField { hvo, tag });
        }
        let def = self
            .mdc
            .field(tag)
            .ok_or(DataError::InvalidField { hvo, tag })?;
        Ok((obj, def))
    }

    /// Like `field`, but the field must have exactly `kind`.
    fn field_of_kind(&self, hvo: Hvo, tag: Flid, kind: PropertyKind) -> Result<&DomainObject> {
        let (obj, def) = self.field(hvo, tag)?;
        if def.kind != kind {
            return Err(DataError::kind_mismatch(tag, def.kind, kind.name()));
        }
        Ok(obj)
    }

    /// Handle `target` must be live and fit the destination class of `tag`.
    fn check_target(&self, tag: Flid, dst_class: Option<ClassId>, target: Hvo) -> Result<()> {
        let obj = self.object(target)?;
        if let Some(dst) = dst_class {
            if !self.mdc.is_subclass_of(obj.class_id, dst) {
                return Err(DataError::ClassMismatch {
                    class: obj.class_id,
                    tag,
                });
            }
        }
        Ok(())
    }

    fn begin_change(&self) -> Result<()> {
        self.undo.check_can_mutate(self.config.undo.require_task)
    }

    /// Stores (or clears) one property value and records the change.
    fn write_prop(&mut self, hvo: Hvo, tag: Flid, value: Option<PropValue>) -> Result<()> {
        if let (Some(v), Some(kind)) = (&value, self.mdc.kind_of(tag)) {
            if !v.fits(kind) {
                return Err(DataError::kind_mismatch(tag, kind, "a value of the field's kind"));
            }
        }
        let obj = self.repo.resolve_mut(hvo)?;
        let before = match &value {
            Some(v) => obj.set_prop(tag, v.clone()),
            None => obj.remove_prop(tag),
        };
        if before == value {
            return Ok(());
        }
        self.undo.record(Change::Prop {
            hvo,
            tag,
            before,
            after: value,
        });
        Ok(())
    }

    fn add_object(&mut self, obj: DomainObject) {
        self.undo.record(Change::Object {
            hvo: obj.hvo,
            before: None,
            after: Some(Box::new(obj.clone())),
        });
        self.repo.insert(obj);
    }

    fn remove_object(&mut self, hvo: Hvo) -> Result<()> {
        let before = self.repo.remove(hvo)?;
        self.undo.record(Change::Object {
            hvo,
            before: Some(Box::new(before)),
            after: None,
        });
        Ok(())
    }

    /// Points `child` at a new owning slot.
    fn set_owner(&mut self, child: Hvo, owner: Hvo, tag: Flid) -> Result<()> {
        let obj = self.repo.resolve_mut(child)?;
        let before = (obj.owner, obj.owning_flid);
        if before == (owner, tag) {
            return Ok(());
        }
        (obj.owner, obj.owning_flid) = (owner, tag);
        self.undo.record(Change::Owner {
            hvo: child,
            before,
            after: (owner, tag),
        });
        Ok(())
    }

    /// Fails if `moved` is `dst` or one of its owners.
    fn check_no_cycle(&self, moved: Hvo, dst: Hvo) -> Result<()> {
        let mut seen = HashSet::new();
        let mut current = dst;
        while current != NULL_HVO && seen.insert(current) {
            if current == moved {
                return Err(DataError::OwnershipCycle(moved));
            }
            current = self
                .repo
                .resolve(current)
                .map(|obj| obj.owner)
                .unwrap_or(NULL_HVO);
        }
        Ok(())
    }
}
