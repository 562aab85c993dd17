//! Class-id keyed construction of domain objects.
//!
//! The table is built once from the catalog: every concrete class gets a
//! constructor that seeds its empty object and multilingual properties,
//! and a few classes get specialised constructors on top.

use chrono::Utc;
use std::collections::HashMap;

use crate::catalog::MetaDataCache;
use crate::error::{DataError, Result};
use crate::handle::{tags, ClassId, Hvo};
use crate::model::{class, flid};
use crate::object::DomainObject;
use crate::value::PropValue;

/// Initialises a freshly allocated object of one class.
pub type Constructor = fn(&MetaDataCache, &mut DomainObject);

/// Constructor table keyed by class id.
#[derive(Clone)]
pub struct ObjectFactory {
    ctors: HashMap<ClassId, Constructor>,
}

impl std::fmt::Debug for ObjectFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut classes: Vec<_> = self.ctors.keys().collect();
        classes.sort();
        f.debug_struct("ObjectFactory")
            .field("classes", &classes)
            .finish()
    }
}

impl ObjectFactory {
    /// Generic constructor for every concrete class in `mdc`.
    pub fn from_catalog(mdc: &MetaDataCache) -> Self {
        let ctors = mdc
            .concrete_classes()
            .into_iter()
            .map(|id| (id, seed_defaults as Constructor))
            .collect();
        Self { ctors }
    }

    /// Table for the standard schema, with its specialised constructors.
    pub fn standard(mdc: &MetaDataCache) -> Self {
        let mut factory = Self::from_catalog(mdc);
        factory.register(class::LEX_ENTRY, new_lex_entry);
        factory.register(class::SEGMENT, new_segment);
        factory
    }

    pub fn register(&mut self, class_id: ClassId, ctor: Constructor) {
        self.ctors.insert(class_id, ctor);
    }

    pub fn can_create(&self, class_id: ClassId) -> bool {
        self.ctors.contains_key(&class_id)
    }

    /// Builds an unowned object of `class_id` under handle `hvo`.
    pub fn create(&self, mdc: &MetaDataCache, hvo: Hvo, class_id: ClassId) -> Result<DomainObject> {
        let ctor = match self.ctors.get(&class_id) {
            Some(ctor) => ctor,
            None if mdc.class(class_id).is_some() => {
                return Err(DataError::AbstractClass(class_id))
            }
            None => return Err(DataError::UnknownClass(class_id)),
        };
        let mut obj = DomainObject::new(hvo, class_id);
        ctor(mdc, &mut obj);
        Ok(obj)
    }
}

/// Empty values for object and multilingual fields.
fn seed_defaults(mdc: &MetaDataCache, obj: &mut DomainObject) {
    for field in mdc.fields_of(obj.class_id, true) {
        if tags::is_reserved(field.flid) {
            continue;
        }
        if let Some(value) = PropValue::empty_for(field.kind) {
            obj.set_prop(field.flid, value);
        }
    }
}

fn new_lex_entry(mdc: &MetaDataCache, obj: &mut DomainObject) {
    seed_defaults(mdc, obj);
    obj.set_prop(flid::LEX_ENTRY_DATE_CREATED, PropValue::Time(Utc::now()));
}

fn new_segment(mdc: &MetaDataCache, obj: &mut DomainObject) {
    seed_defaults(mdc, obj);
    obj.set_prop(flid::SEGMENT_BEGIN_OFFSET, PropValue::Integer(0));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::standard_catalog;

    #[test]
    fn creates_concrete_classes() {
        let mdc = standard_catalog().unwrap();
        let factory = ObjectFactory::standard(&mdc);
        let obj = factory.create(&mdc, 1, class::ST_TXT_PARA).unwrap();
        assert_eq!(obj.class_id, class::ST_TXT_PARA);
        assert_eq!(
            obj.prop(flid::ST_TXT_PARA_SEGMENTS),
            Some(&PropValue::Vector(vec![]))
        );
        assert!(obj.prop(flid::ST_TXT_PARA_CONTENTS).is_none());
    }

    #[test]
    fn specialised_constructor_runs() {
        let mdc = standard_catalog().unwrap();
        let factory = ObjectFactory::standard(&mdc);
        let entry = factory.create(&mdc, 2, class::LEX_ENTRY).unwrap();
        assert!(matches!(
            entry.prop(flid::LEX_ENTRY_DATE_CREATED),
            Some(PropValue::Time(_))
        ));
        assert!(matches!(
            entry.prop(flid::LEX_ENTRY_LEXEME_FORM),
            Some(PropValue::MultiUnicode(_))
        ));
    }

    #[test]
    fn abstract_and_unknown_classes_fail() {
        let mdc = standard_catalog().unwrap();
        let factory = ObjectFactory::standard(&mdc);
        assert_eq!(
            factory.create(&mdc, 3, class::ST_PARA).unwrap_err(),
            DataError::AbstractClass(class::ST_PARA)
        );
        assert_eq!(
            factory.create(&mdc, 3, 424242).unwrap_err(),
            DataError::UnknownClass(424242)
        );
        assert!(!factory.can_create(class::ST_PARA));
    }
}
