//! Object creation and deletion.
//!
//! Deleting an object deletes everything it owns, takes it out of its
//! owner's slot and clears every reference to any deleted object across
//! the whole repository, whether or not the object had an owner.

use std::collections::HashSet;

use super::DomainDataByFlid;
use crate::error::{DataError, Result};
use crate::handle::{ClassId, Flid, Hvo, NULL_HVO};
use crate::kind::PropertyKind;
use crate::model::{class, flid};
use crate::repository::ObjectRepository;
use crate::value::PropValue;

/// Where a new object goes in its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Atomic,
    At(usize),
}

impl<R: ObjectRepository> DomainDataByFlid<R> {
    /// Creates an object of `class_id` owned by `owner.tag`.
    ///
    /// `ord` selects the slot: `-2` for an owning atomic field, `-1` to
    /// append to a collection or sequence, `>= 0` to insert into a
    /// sequence at that position. An `owner` of `NULL_HVO` creates an
    /// unowned root and ignores `tag` and `ord`.
    pub fn make_new_object(&mut self, class_id: ClassId, owner: Hvo, tag: Flid, ord: i32) -> Result<Hvo> {
        self.create_object(class_id, owner, tag, ord, true)
    }

    pub(super) fn create_object(
        &mut self,
        class_id: ClassId,
        owner: Hvo,
        tag: Flid,
        ord: i32,
        seed_style: bool,
    ) -> Result<Hvo> {
        if self.mdc.class(class_id).is_none() {
            return Err(DataError::UnknownClass(class_id));
        }
        let slot = if owner == NULL_HVO {
            None
        } else {
            Some(self.owning_slot(class_id, owner, tag, ord)?)
        };
        let mut obj = self.factory.create(&self.mdc, NULL_HVO, class_id)?;
        self.begin_change()?;

        let hvo = self.repo.allocate_hvo();
        obj.hvo = hvo;
        if slot.is_some() {
            obj.owner = owner;
            obj.owning_flid = tag;
        }
        tracing::debug!(
            "make_new_object class={} hvo={} owner={} tag={} ord={}",
            self.mdc.class_name(class_id).unwrap_or("?"),
            hvo,
            owner,
            tag,
            ord
        );
        self.add_object(obj);

        match slot {
            None => {}
            Some(Slot::Atomic) => {
                let occupant = self.get_object(owner, tag)?;
                if occupant != NULL_HVO {
                    self.delete_tree(occupant)?;
                }
                self.write_prop(owner, tag, Some(PropValue::Atomic(hvo)))?;
            }
            Some(Slot::At(index)) => {
                let mut items = self.object(owner)?.object_handles(tag);
                items.insert(index, hvo);
                self.write_prop(owner, tag, Some(PropValue::Vector(items)))?;
                if seed_style
                    && tag == flid::ST_TEXT_PARAGRAPHS
                    && self.mdc.is_subclass_of(class_id, class::ST_PARA)
                {
                    self.seed_paragraph_style(owner, hvo, index)?;
                }
            }
        }
        Ok(hvo)
    }

    fn owning_slot(&self, class_id: ClassId, owner: Hvo, tag: Flid, ord: i32) -> Result<Slot> {
        let (obj, def) = self.field(owner, tag)?;
        if !def.kind.is_owning() {
            return Err(DataError::kind_mismatch(tag, def.kind, "an owning property"));
        }
        if let Some(dst) = def.dst_class {
            if !self.mdc.is_subclass_of(class_id, dst) {
                return Err(DataError::ClassMismatch {
                    class: class_id,
                    tag,
                });
            }
        }
        let size = obj.object_handles(tag).len();
        match (ord, def.kind) {
            (-2, PropertyKind::OwningAtomic) => Ok(Slot::Atomic),
            (-2, kind) => Err(DataError::kind_mismatch(
                tag,
                kind,
                "an owning atomic property for ord -2",
            )),
            (-1, PropertyKind::OwningAtomic) => Err(DataError::kind_mismatch(
                tag,
                PropertyKind::OwningAtomic,
                "an owning collection or sequence for ord -1",
            )),
            (-1, _) => Ok(Slot::At(size)),
            (index, PropertyKind::OwningSequence) if index >= 0 => {
                let index = index as usize;
                if index > size {
                    return Err(DataError::OutOfRange { index, size });
                }
                Ok(Slot::At(index))
            }
            (index, kind) if index >= 0 => Err(DataError::kind_mismatch(
                tag,
                kind,
                "an owning sequence for a positional ord",
            )),
            _ => Err(DataError::NotSupported("ord values below -2")),
        }
    }

    /// Deletes `hvo`, which must sit in `owner.tag` (at `ihvo` when that
    /// is non-negative). An `owner` of `NULL_HVO` skips the slot check.
    pub fn delete_obj_owner(&mut self, owner: Hvo, hvo: Hvo, tag: Flid, ihvo: i32) -> Result<()> {
        let obj = self.object(hvo)?;
        if owner != NULL_HVO {
            let (owner_obj, def) = self.field(owner, tag)?;
            if !def.kind.is_owning() {
                return Err(DataError::kind_mismatch(tag, def.kind, "an owning property"));
            }
            let not_there = DataError::NotInProperty { hvo, owner, tag };
            if obj.owner != owner || obj.owning_flid != tag {
                return Err(not_there);
            }
            if ihvo >= 0 {
                let items = owner_obj.object_handles(tag);
                let index = ihvo as usize;
                match items.get(index) {
                    Some(h) if *h == hvo => {}
                    Some(_) => return Err(not_there),
                    None => {
                        return Err(DataError::OutOfRange {
                            index,
                            size: items.len(),
                        })
                    }
                }
            }
        }
        self.begin_change()?;
        self.delete_tree(hvo)
    }

    /// Deletes `hvo` wherever it is owned.
    pub fn delete_obj(&mut self, hvo: Hvo) -> Result<()> {
        self.object(hvo)?;
        self.begin_change()?;
        self.delete_tree(hvo)
    }

    pub(super) fn delete_tree(&mut self, root: Hvo) -> Result<()> {
        let doomed = self.owned_subtree(root)?;
        tracing::debug!(
            "delete object {} with {} owned descendants",
            root,
            doomed.len() - 1
        );

        let (owner, owning_flid) = {
            let obj = self.object(root)?;
            (obj.owner, obj.owning_flid)
        };
        if self.repo.is_valid_id(owner) {
            self.detach(owner, owning_flid, root)?;
        }

        let doomed_set: HashSet<Hvo> = doomed.iter().copied().collect();
        self.purge_references(&doomed_set)?;

        for hvo in doomed.into_iter().rev() {
            self.remove_object(hvo)?;
        }
        Ok(())
    }

    /// `root` and everything it owns, owners before the objects they own.
    fn owned_subtree(&self, root: Hvo) -> Result<Vec<Hvo>> {
        let mut subtree = Vec::new();
        let mut pending = vec![root];
        while let Some(hvo) = pending.pop() {
            let obj = self.object(hvo)?;
            subtree.push(hvo);
            for (tag, value) in &obj.props {
                let owning = self
                    .mdc
                    .kind_of(*tag)
                    .map(PropertyKind::is_owning)
                    .unwrap_or(false);
                if owning {
                    pending.extend(value.object_handles());
                }
            }
        }
        Ok(subtree)
    }

    fn detach(&mut self, owner: Hvo, tag: Flid, child: Hvo) -> Result<()> {
        let emptied = match self.object(owner)?.prop(tag) {
            Some(PropValue::Atomic(h)) if *h == child => PropValue::Atomic(NULL_HVO),
            Some(PropValue::Vector(items)) if items.contains(&child) => {
                PropValue::Vector(items.iter().copied().filter(|h| *h != child).collect())
            }
            _ => return Ok(()),
        };
        self.write_prop(owner, tag, Some(emptied))
    }

    /// Clears references to `doomed` held by objects outside it.
    fn purge_references(&mut self, doomed: &HashSet<Hvo>) -> Result<()> {
        let reference_tags: HashSet<Flid> = self
            .mdc
            .reference_fields()
            .iter()
            .map(|def| def.flid)
            .collect();

        let mut edits = Vec::new();
        for hvo in self.repo.handles() {
            if doomed.contains(&hvo) {
                continue;
            }
            let obj = self.object(hvo)?;
            for (tag, value) in &obj.props {
                if !reference_tags.contains(tag) {
                    continue;
                }
                let cleaned = match value {
                    PropValue::Atomic(target) if doomed.contains(target) => {
                        PropValue::Atomic(NULL_HVO)
                    }
                    PropValue::Vector(items) if items.iter().any(|h| doomed.contains(h)) => {
                        PropValue::Vector(
                            items
                                .iter()
                                .copied()
                                .filter(|h| !doomed.contains(h))
                                .collect(),
                        )
                    }
                    _ => continue,
                };
                edits.push((hvo, *tag, cleaned));
            }
        }

        for (hvo, tag, value) in edits {
            tracing::trace!("clearing reference from {} via {}", hvo, tag);
            self.write_prop(hvo, tag, Some(value))?;
        }
        Ok(())
    }
}
