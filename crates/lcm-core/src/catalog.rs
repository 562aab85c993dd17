//! Meta-data catalog: classes, fields and their declared kinds.
//!
//! Field ids are globally unique. A field's kind is always looked up here,
//! never inferred from a stored value.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::CatalogError;
use crate::handle::{tags, ClassId, Flid};
use crate::kind::PropertyKind;
use crate::ws::WsRole;

/// Class id of the abstract root every class inherits from.
pub const CM_OBJECT: ClassId = 0;

/// A class definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDef {
    pub id: ClassId,
    pub name: String,
    pub base: Option<ClassId>,
    pub is_abstract: bool,
}

/// A field (property) definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub flid: Flid,
    pub name: String,
    pub class: ClassId,
    pub kind: PropertyKind,
    /// Signature class for object properties.
    #[serde(default)]
    pub dst_class: Option<ClassId>,
    /// Default writing system role for string properties.
    #[serde(default)]
    pub ws_role: WsRole,
    #[serde(default)]
    pub description: Option<String>,
}

impl FieldDef {
    pub fn new(flid: Flid, class: ClassId, name: &str, kind: PropertyKind) -> Self {
        Self {
            flid,
            name: name.to_string(),
            class,
            kind,
            dst_class: None,
            ws_role: WsRole::None,
            description: None,
        }
    }

    pub fn to_class(mut self, dst: ClassId) -> Self {
        self.dst_class = Some(dst);
        self
    }

    pub fn role(mut self, role: WsRole) -> Self {
        self.ws_role = role;
        self
    }
}

/// Registry of classes and fields.
#[derive(Debug, Clone)]
pub struct MetaDataCache {
    classes: HashMap<ClassId, ClassDef>,
    fields: BTreeMap<Flid, FieldDef>,
    by_class: HashMap<ClassId, Vec<Flid>>,
}

impl MetaDataCache {
    /// Catalog holding only the abstract `CmObject` root and its reserved tags.
    pub fn new() -> Self {
        let mut mdc = Self {
            classes: HashMap::new(),
            fields: BTreeMap::new(),
            by_class: HashMap::new(),
        };
        mdc.classes.insert(
            CM_OBJECT,
            ClassDef {
                id: CM_OBJECT,
                name: "CmObject".into(),
                base: None,
                is_abstract: true,
            },
        );
        for (flid, name, kind) in [
            (tags::GUID, "Guid", PropertyKind::Guid),
            (tags::CLASS, "Class", PropertyKind::Integer),
            (tags::OWNER, "Owner", PropertyKind::ReferenceAtomic),
            (tags::OWN_FLID, "OwnFlid", PropertyKind::Integer),
            (tags::OWN_ORD, "OwnOrd", PropertyKind::Integer),
        ] {
            let mut def = FieldDef::new(flid, CM_OBJECT, name, kind);
            if kind == PropertyKind::ReferenceAtomic {
                def.dst_class = Some(CM_OBJECT);
            }
            mdc.fields.insert(flid, def);
            mdc.by_class.entry(CM_OBJECT).or_default().push(flid);
        }
        mdc
    }

    /// Register a class. Its base class must already be registered.
    pub fn register_class(
        &mut self,
        id: ClassId,
        name: &str,
        base: ClassId,
        is_abstract: bool,
    ) -> Result<(), CatalogError> {
        if self.classes.contains_key(&id) {
            return Err(CatalogError::DuplicateClass(id));
        }
        if !self.classes.contains_key(&base) {
            return Err(CatalogError::ClassNotFound(base));
        }
        self.classes.insert(
            id,
            ClassDef {
                id,
                name: name.to_string(),
                base: Some(base),
                is_abstract,
            },
        );
        Ok(())
    }

    /// Register a field on an already registered class.
    pub fn register_field(&mut self, def: FieldDef) -> Result<(), CatalogError> {
        if self.fields.contains_key(&def.flid) {
            return Err(CatalogError::DuplicateField(def.flid));
        }
        if !self.classes.contains_key(&def.class) {
            return Err(CatalogError::ClassNotFound(def.class));
        }
        if self.field_id(def.class, &def.name, true).is_some() {
            return Err(CatalogError::DuplicateFieldName {
                class: def.class,
                name: def.name.clone(),
            });
        }
        if def.kind.is_object() {
            match def.dst_class {
                None => {
                    return Err(CatalogError::MissingDestination {
                        flid: def.flid,
                        kind: def.kind,
                    })
                }
                Some(dst) if !self.classes.contains_key(&dst) => {
                    return Err(CatalogError::ClassNotFound(dst));
                }
                Some(_) => {}
            }
        }
        self.by_class.entry(def.class).or_default().push(def.flid);
        self.fields.insert(def.flid, def);
        Ok(())
    }

    pub fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.get(&id)
    }

    pub fn class_name(&self, id: ClassId) -> Option<&str> {
        self.classes.get(&id).map(|c| c.name.as_str())
    }

    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.classes
            .values()
            .find(|c| c.name == name)
            .map(|c| c.id)
    }

    pub fn base_class(&self, id: ClassId) -> Option<ClassId> {
        self.classes.get(&id).and_then(|c| c.base)
    }

    pub fn is_abstract(&self, id: ClassId) -> bool {
        self.classes.get(&id).map(|c| c.is_abstract).unwrap_or(true)
    }

    /// Concrete classes, in id order.
    pub fn concrete_classes(&self) -> Vec<ClassId> {
        let mut ids: Vec<_> = self
            .classes
            .values()
            .filter(|c| !c.is_abstract)
            .map(|c| c.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// True if `sub` is `sup` or derives from it.
    pub fn is_subclass_of(&self, sub: ClassId, sup: ClassId) -> bool {
        let mut current = Some(sub);
        while let Some(id) = current {
            if id == sup {
                return true;
            }
            current = self.base_class(id);
        }
        false
    }

    pub fn field(&self, flid: Flid) -> Option<&FieldDef> {
        self.fields.get(&flid)
    }

    pub fn kind_of(&self, flid: Flid) -> Option<PropertyKind> {
        self.fields.get(&flid).map(|f| f.kind)
    }

    pub fn ws_role_of(&self, flid: Flid) -> WsRole {
        self.fields
            .get(&flid)
            .map(|f| f.ws_role)
            .unwrap_or_default()
    }

    /// Class that declares `flid`.
    pub fn class_of_field(&self, flid: Flid) -> Option<ClassId> {
        self.fields.get(&flid).map(|f| f.class)
    }

    /// Whether `flid` is declared on `class` or one of its superclasses.
    pub fn is_field_of(&self, class: ClassId, flid: Flid) -> bool {
        match self.class_of_field(flid) {
            Some(owner) => self.is_subclass_of(class, owner),
            None => false,
        }
    }

    /// Field id by name, optionally searching superclasses.
    pub fn field_id(&self, class: ClassId, name: &str, include_base: bool) -> Option<Flid> {
        let mut current = Some(class);
        while let Some(id) = current {
            let found = self
                .by_class
                .get(&id)
                .into_iter()
                .flatten()
                .find(|flid| self.fields.get(*flid).map(|f| f.name == name).unwrap_or(false));
            if let Some(flid) = found {
                return Some(*flid);
            }
            if !include_base {
                return None;
            }
            current = self.base_class(id);
        }
        None
    }

    /// Fields of a class, inherited ones first.
    pub fn fields_of(&self, class: ClassId, include_base: bool) -> Vec<&FieldDef> {
        let mut fields = Vec::new();
        if include_base {
            if let Some(base) = self.base_class(class) {
                fields.extend(self.fields_of(base, true));
            }
        }
        for flid in self.by_class.get(&class).into_iter().flatten() {
            if let Some(def) = self.fields.get(flid) {
                fields.push(def);
            }
        }
        fields
    }

    /// Every reference-kind field, excluding the reserved `Owner` tag.
    pub fn reference_fields(&self) -> Vec<&FieldDef> {
        self.fields
            .values()
            .filter(|f| f.kind.is_reference() && !tags::is_reserved(f.flid))
            .collect()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

impl Default for MetaDataCache {
    fn default() -> Self {
        Self::new()
    }
}
