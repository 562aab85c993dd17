//! Object-valued properties: atomic slots, collections and sequences.

use super::DomainDataByFlid;
use crate::error::{DataError, Result};
use crate::handle::{tags, Flid, Hvo, NULL_HVO};
use crate::kind::PropertyKind;
use crate::repository::ObjectRepository;
use crate::value::PropValue;

impl<R: ObjectRepository> DomainDataByFlid<R> {
    /// Handles held by a collection or sequence field.
    fn vector_items(&self, hvo: Hvo, tag: Flid) -> Result<(Vec<Hvo>, PropertyKind)> {
        let (obj, def) = self.field(hvo, tag)?;
        if !def.kind.is_vector() {
            return Err(DataError::kind_mismatch(
                tag,
                def.kind,
                "a collection or sequence",
            ));
        }
        Ok((obj.object_handles(tag), def.kind))
    }

    /// Target of an atomic object field, or `NULL_HVO` when empty.
    /// `tags::OWNER` yields the owner.
    pub fn get_object(&self, hvo: Hvo, tag: Flid) -> Result<Hvo> {
        if tag == tags::OWNER {
            return Ok(self.object(hvo)?.owner);
        }
        let (obj, def) = self.field(hvo, tag)?;
        if !def.kind.is_atomic() {
            return Err(DataError::kind_mismatch(
                tag,
                def.kind,
                "an atomic object property",
            ));
        }
        Ok(match obj.prop(tag) {
            Some(PropValue::Atomic(target)) => *target,
            _ => NULL_HVO,
        })
    }

    /// Points a reference-atomic field at `target` (`NULL_HVO` clears it).
    pub fn set_object(&mut self, hvo: Hvo, tag: Flid, target: Hvo) -> Result<()> {
        let (_, def) = self.field(hvo, tag)?;
        if def.kind != PropertyKind::ReferenceAtomic || tags::is_reserved(tag) {
            return Err(DataError::kind_mismatch(
                tag,
                def.kind,
                "a writable reference atomic property",
            ));
        }
        let dst_class = def.dst_class;
        if target != NULL_HVO {
            self.check_target(tag, dst_class, target)?;
        }
        self.begin_change()?;
        tracing::debug!("set_object hvo={} tag={} target={}", hvo, tag, target);
        self.write_prop(hvo, tag, Some(PropValue::Atomic(target)))
    }

    pub fn get_vec_size(&self, hvo: Hvo, tag: Flid) -> Result<usize> {
        Ok(self.vector_items(hvo, tag)?.0.len())
    }

    pub fn get_vec_item(&self, hvo: Hvo, tag: Flid, index: usize) -> Result<Hvo> {
        let (items, _) = self.vector_items(hvo, tag)?;
        items.get(index).copied().ok_or(DataError::OutOfRange {
            index,
            size: items.len(),
        })
    }

    /// The whole vector, provided it fits in `capacity` items.
    pub fn vec_prop(&self, hvo: Hvo, tag: Flid, capacity: usize) -> Result<Vec<Hvo>> {
        let (items, _) = self.vector_items(hvo, tag)?;
        if items.len() > capacity {
            return Err(DataError::BufferTooSmall {
                required: items.len(),
                capacity,
            });
        }
        Ok(items)
    }

    /// Position of `child` in the vector, if present.
    pub fn get_obj_index(&self, hvo: Hvo, tag: Flid, child: Hvo) -> Result<Option<usize>> {
        let (items, _) = self.vector_items(hvo, tag)?;
        Ok(items.iter().position(|h| *h == child))
    }

    /// Replaces `[min, lim)` of a reference vector with `new`.
    ///
    /// An empty `new` deletes the range. Reference collections are sets:
    /// a handle already present is not added twice.
    pub fn replace(&mut self, hvo: Hvo, tag: Flid, min: usize, lim: usize, new: &[Hvo]) -> Result<()> {
        let (mut items, kind) = self.vector_items(hvo, tag)?;
        if !kind.is_reference() {
            return Err(DataError::kind_mismatch(
                tag,
                kind,
                "a reference collection or sequence",
            ));
        }
        if min > lim {
            return Err(DataError::OutOfRange {
                index: min,
                size: lim,
            });
        }
        if lim > items.len() {
            return Err(DataError::OutOfRange {
                index: lim,
                size: items.len(),
            });
        }
        let dst_class = self.mdc.field(tag).and_then(|def| def.dst_class);
        for target in new {
            self.check_target(tag, dst_class, *target)?;
        }
        self.begin_change()?;
        tracing::debug!(
            "replace hvo={} tag={} [{}, {}) with {} items",
            hvo,
            tag,
            min,
            lim,
            new.len()
        );
        items.splice(min..lim, new.iter().copied());
        if kind == PropertyKind::ReferenceCollection {
            let mut seen = std::collections::HashSet::new();
            items.retain(|h| seen.insert(*h));
        }
        self.write_prop(hvo, tag, Some(PropValue::Vector(items)))
    }

    /// Moves `[start, end]` of an owning sequence to `dst.dst_tag` before
    /// position `dst_start`, keeping order. An owning collection
    /// destination appends. Within one vector `dst_start` counts positions
    /// before the move.
    #[allow(clippy::too_many_arguments)]
    pub fn move_own_seq(
        &mut self,
        src: Hvo,
        src_tag: Flid,
        start: usize,
        end: usize,
        dst: Hvo,
        dst_tag: Flid,
        dst_start: usize,
    ) -> Result<()> {
        let (src_items, src_kind) = self.vector_items(src, src_tag)?;
        if src_kind != PropertyKind::OwningSequence {
            return Err(DataError::kind_mismatch(
                src_tag,
                src_kind,
                "an owning sequence",
            ));
        }
        if start > end || end >= src_items.len() {
            return Err(DataError::OutOfRange {
                index: end,
                size: src_items.len(),
            });
        }
        let (dst_items, dst_kind) = self.vector_items(dst, dst_tag)?;
        if !dst_kind.is_owning() {
            return Err(DataError::kind_mismatch(
                dst_tag,
                dst_kind,
                "an owning collection or sequence",
            ));
        }
        if dst_kind.is_sequence() && dst_start > dst_items.len() {
            return Err(DataError::OutOfRange {
                index: dst_start,
                size: dst_items.len(),
            });
        }
        let moved: Vec<Hvo> = src_items[start..=end].to_vec();
        let dst_class = self.mdc.field(dst_tag).and_then(|def| def.dst_class);
        for child in &moved {
            self.check_no_cycle(*child, dst)?;
            self.check_target(dst_tag, dst_class, *child)?;
        }
        self.begin_change()?;
        tracing::debug!(
            "move_own_seq {} items from {}:{} to {}:{} at {}",
            moved.len(),
            src,
            src_tag,
            dst,
            dst_tag,
            dst_start
        );

        if src == dst && src_tag == dst_tag {
            let mut items = src_items;
            items.drain(start..=end);
            let at = if dst_start > end {
                dst_start - moved.len()
            } else if dst_start > start {
                start
            } else {
                dst_start
            };
            items.splice(at..at, moved);
            return self.write_prop(src, src_tag, Some(PropValue::Vector(items)));
        }

        let mut remaining = src_items;
        remaining.drain(start..=end);
        self.write_prop(src, src_tag, Some(PropValue::Vector(remaining)))?;

        let mut items = dst_items;
        let at = if dst_kind.is_sequence() {
            dst_start
        } else {
            items.len()
        };
        items.splice(at..at, moved.iter().copied());
        self.write_prop(dst, dst_tag, Some(PropValue::Vector(items)))?;

        for child in moved {
            self.set_owner(child, dst, dst_tag)?;
        }
        Ok(())
    }

    /// Moves one owned object to another owning slot.
    ///
    /// An atomic destination ignores `dst_index` and deletes its previous
    /// occupant. A collection appends. A sequence needs `Some(index)`;
    /// without one the call is a `KindMismatch`.
    pub fn move_own(
        &mut self,
        src: Hvo,
        src_tag: Flid,
        hvo: Hvo,
        dst: Hvo,
        dst_tag: Flid,
        dst_index: Option<usize>,
    ) -> Result<()> {
        let (src_obj, src_def) = self.field(src, src_tag)?;
        if !src_def.kind.is_owning() {
            return Err(DataError::kind_mismatch(
                src_tag,
                src_def.kind,
                "an owning property",
            ));
        }
        let src_kind = src_def.kind;
        let mut src_items = src_obj.object_handles(src_tag);
        let src_pos = src_items
            .iter()
            .position(|h| *h == hvo)
            .ok_or(DataError::NotInProperty {
                hvo,
                owner: src,
                tag: src_tag,
            })?;

        let (dst_obj, dst_def) = self.field(dst, dst_tag)?;
        if !dst_def.kind.is_owning() {
            return Err(DataError::kind_mismatch(
                dst_tag,
                dst_def.kind,
                "an owning property",
            ));
        }
        let dst_kind = dst_def.kind;
        let dst_class = dst_def.dst_class;
        let same = src == dst && src_tag == dst_tag;
        let mut dst_items = dst_obj.object_handles(dst_tag);
        if same {
            dst_items.remove(src_pos);
        }
        let insert_at = match dst_kind {
            PropertyKind::OwningSequence => match dst_index {
                Some(index) if index <= dst_items.len() => Some(index),
                Some(index) => {
                    return Err(DataError::OutOfRange {
                        index,
                        size: dst_items.len(),
                    })
                }
                None => {
                    return Err(DataError::kind_mismatch(
                        dst_tag,
                        dst_kind,
                        "a position for a sequence destination",
                    ))
                }
            },
            PropertyKind::OwningCollection => Some(dst_items.len()),
            _ => None,
        };
        self.check_no_cycle(hvo, dst)?;
        self.check_target(dst_tag, dst_class, hvo)?;
        self.begin_change()?;
        tracing::debug!(
            "move_own {} from {}:{} to {}:{}",
            hvo,
            src,
            src_tag,
            dst,
            dst_tag
        );

        if !same {
            let emptied = if src_kind.is_atomic() {
                PropValue::Atomic(NULL_HVO)
            } else {
                src_items.remove(src_pos);
                PropValue::Vector(src_items)
            };
            self.write_prop(src, src_tag, Some(emptied))?;
        }

        match insert_at {
            Some(at) => {
                dst_items.insert(at, hvo);
                self.write_prop(dst, dst_tag, Some(PropValue::Vector(dst_items)))?;
            }
            None => {
                let occupant = self.get_object(dst, dst_tag)?;
                if occupant != NULL_HVO && occupant != hvo {
                    self.delete_tree(occupant)?;
                }
                self.write_prop(dst, dst_tag, Some(PropValue::Atomic(hvo)))?;
            }
        }
        self.set_owner(hvo, dst, dst_tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AccessorConfig;
    use crate::model::{class, flid};

    struct Fixture {
        dd: DomainDataByFlid,
        entry: Hvo,
        senses: Vec<Hvo>,
    }

    fn fixture(count: usize) -> Fixture {
        let mut dd = DomainDataByFlid::new(AccessorConfig::default()).unwrap();
        dd.begin_undo_task("Create", "Create").unwrap();
        let entry = dd
            .make_new_object(class::LEX_ENTRY, NULL_HVO, 0, -1)
            .unwrap();
        let senses = (0..count)
            .map(|_| {
                dd.make_new_object(class::LEX_SENSE, entry, flid::LEX_ENTRY_SENSES, -1)
                    .unwrap()
            })
            .collect();
        dd.end_undo_task().unwrap();
        Fixture { dd, entry, senses }
    }

    #[test]
    fn vector_reads() {
        let f = fixture(3);
        let tag = flid::LEX_ENTRY_SENSES;
        assert_eq!(f.dd.get_vec_size(f.entry, tag).unwrap(), 3);
        assert_eq!(f.dd.get_vec_item(f.entry, tag, 1).unwrap(), f.senses[1]);
        assert_eq!(
            f.dd.get_vec_item(f.entry, tag, 3).unwrap_err(),
            DataError::OutOfRange { index: 3, size: 3 }
        );
        assert_eq!(f.dd.vec_prop(f.entry, tag, 3).unwrap(), f.senses);
        assert_eq!(
            f.dd.vec_prop(f.entry, tag, 2).unwrap_err(),
            DataError::BufferTooSmall {
                required: 3,
                capacity: 2
            }
        );
        assert_eq!(f.dd.get_obj_index(f.entry, tag, f.senses[2]).unwrap(), Some(2));
        assert_eq!(f.dd.get_obj_index(f.entry, tag, 999).unwrap(), None);
    }

    #[test]
    fn replace_rejects_owning_vectors() {
        let mut f = fixture(1);
        f.dd.begin_undo_task("Edit", "Edit").unwrap();
        assert!(matches!(
            f.dd.replace(f.entry, flid::LEX_ENTRY_SENSES, 0, 0, &[]),
            Err(DataError::KindMismatch { .. })
        ));
        f.dd.end_undo_task().unwrap();
    }

    #[test]
    fn replace_checks_range_and_handles() {
        let mut f = fixture(2);
        let tag = flid::LEX_ENTRY_MAIN_ENTRIES_OR_SENSES;
        f.dd.begin_undo_task("Edit", "Edit").unwrap();
        assert_eq!(
            f.dd.replace(f.entry, tag, 0, 1, &[]).unwrap_err(),
            DataError::OutOfRange { index: 1, size: 0 }
        );
        assert_eq!(
            f.dd.replace(f.entry, tag, 0, 0, &[4242]).unwrap_err(),
            DataError::InvalidObject(4242)
        );
        f.dd.replace(f.entry, tag, 0, 0, &f.senses.clone()).unwrap();
        f.dd.end_undo_task().unwrap();
        assert_eq!(f.dd.vec_prop(f.entry, tag, 10).unwrap(), f.senses);
    }

    #[test]
    fn reference_collection_is_a_set() {
        let mut dd = DomainDataByFlid::new(AccessorConfig::default()).unwrap();
        dd.begin_undo_task("Edit", "Edit").unwrap();
        let sense = dd
            .make_new_object(class::LEX_SENSE, NULL_HVO, 0, -1)
            .unwrap();
        let domain = dd
            .make_new_object(class::CM_POSSIBILITY, NULL_HVO, 0, -1)
            .unwrap();
        let tag = flid::LEX_SENSE_SEMANTIC_DOMAINS;
        dd.replace(sense, tag, 0, 0, &[domain, domain]).unwrap();
        assert_eq!(dd.get_vec_size(sense, tag).unwrap(), 1);
        assert!(matches!(
            dd.replace(sense, tag, 0, 0, &[sense]),
            Err(DataError::ClassMismatch { .. })
        ));
        dd.end_undo_task().unwrap();
    }

    #[test]
    fn move_within_one_sequence() {
        let mut f = fixture(4);
        let tag = flid::LEX_ENTRY_SENSES;
        f.dd.begin_undo_task("Move", "Move").unwrap();
        f.dd.move_own_seq(f.entry, tag, 0, 0, f.entry, tag, 3).unwrap();
        f.dd.end_undo_task().unwrap();
        let s = &f.senses;
        assert_eq!(
            f.dd.vec_prop(f.entry, tag, 4).unwrap(),
            vec![s[1], s[2], s[0], s[3]]
        );
    }

    #[test]
    fn move_own_into_atomic_slot() {
        let mut dd = DomainDataByFlid::new(AccessorConfig::default()).unwrap();
        dd.begin_undo_task("Move", "Move").unwrap();
        let a = dd
            .make_new_object(class::LEX_ENTRY, NULL_HVO, 0, -1)
            .unwrap();
        let b = dd
            .make_new_object(class::LEX_ENTRY, NULL_HVO, 0, -1)
            .unwrap();
        let tag = flid::LEX_ENTRY_ETYMOLOGY;
        let ety_a = dd.make_new_object(class::LEX_ETYMOLOGY, a, tag, -2).unwrap();
        let ety_b = dd.make_new_object(class::LEX_ETYMOLOGY, b, tag, -2).unwrap();

        dd.move_own(a, tag, ety_a, b, tag, None).unwrap();
        dd.end_undo_task().unwrap();

        assert_eq!(dd.get_object(a, tag).unwrap(), NULL_HVO);
        assert_eq!(dd.get_object(b, tag).unwrap(), ety_a);
        assert_eq!(dd.get_object(ety_a, tags::OWNER).unwrap(), b);
        assert!(!dd.is_valid_object(ety_b));
    }

    #[test]
    fn move_own_requires_position_in_sequence() {
        let mut f = fixture(2);
        let tag = flid::LEX_ENTRY_SENSES;
        f.dd.begin_undo_task("Move", "Move").unwrap();
        let sub = f.dd
            .make_new_object(class::LEX_SENSE, f.senses[0], flid::LEX_SENSE_SENSES, -1)
            .unwrap();
        assert!(matches!(
            f.dd.move_own(f.senses[0], flid::LEX_SENSE_SENSES, sub, f.entry, tag, None),
            Err(DataError::KindMismatch { .. })
        ));
        assert!(matches!(
            f.dd.move_own(f.senses[0], flid::LEX_SENSE_SENSES, sub, f.entry, tag, Some(3)),
            Err(DataError::OutOfRange { index: 3, size: 2 })
        ));
        f.dd.move_own(f.senses[0], flid::LEX_SENSE_SENSES, sub, f.entry, tag, Some(1))
            .unwrap();
        f.dd.end_undo_task().unwrap();

        assert_eq!(f.dd.get_vec_item(f.entry, tag, 1).unwrap(), sub);
        assert_eq!(f.dd.get_integer(sub, tags::OWN_ORD).unwrap(), 1);
        assert_eq!(f.dd.get_integer(sub, tags::OWN_FLID).unwrap(), tag);
    }

    #[test]
    fn moving_beneath_itself_is_a_cycle() {
        let mut f = fixture(1);
        f.dd.begin_undo_task("Move", "Move").unwrap();
        let sub = f.dd
            .make_new_object(class::LEX_SENSE, f.senses[0], flid::LEX_SENSE_SENSES, -1)
            .unwrap();
        assert_eq!(
            f.dd.move_own(
                f.entry,
                flid::LEX_ENTRY_SENSES,
                f.senses[0],
                sub,
                flid::LEX_SENSE_SENSES,
                Some(0)
            )
            .unwrap_err(),
            DataError::OwnershipCycle(f.senses[0])
        );
        f.dd.end_undo_task().unwrap();
    }

    #[test]
    fn set_object_checks_destination_class() {
        let mut dd = DomainDataByFlid::new(AccessorConfig::default()).unwrap();
        dd.begin_undo_task("Style", "Style").unwrap();
        let normal = dd.make_new_object(class::ST_STYLE, NULL_HVO, 0, -1).unwrap();
        let heading = dd.make_new_object(class::ST_STYLE, NULL_HVO, 0, -1).unwrap();
        let entry = dd.make_new_object(class::LEX_ENTRY, NULL_HVO, 0, -1).unwrap();
        dd.set_object(heading, flid::ST_STYLE_NEXT, normal).unwrap();
        assert!(matches!(
            dd.set_object(heading, flid::ST_STYLE_NEXT, entry),
            Err(DataError::ClassMismatch { .. })
        ));
        assert!(matches!(
            dd.set_object(heading, tags::OWNER, normal),
            Err(DataError::KindMismatch { .. })
        ));
        dd.end_undo_task().unwrap();
        assert_eq!(dd.get_object(heading, flid::ST_STYLE_NEXT).unwrap(), normal);
    }
}
