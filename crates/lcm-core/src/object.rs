use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::handle::{ClassId, Flid, Hvo, NULL_HVO};
use crate::value::PropValue;

/// A live domain object.
///
/// Identity inside the session is `hvo`; persistent identity is `guid`.
/// Ownership is recorded on the child (`owner`, `owning_flid`) as well as
/// in the owner's owning property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainObject {
    pub hvo: Hvo,
    pub guid: Uuid,
    pub class_id: ClassId,
    pub owner: Hvo,
    pub owning_flid: Flid,
    pub props: BTreeMap<Flid, PropValue>,
}

impl DomainObject {
    pub fn new(hvo: Hvo, class_id: ClassId) -> Self {
        Self::with_guid(hvo, Uuid::new_v4(), class_id)
    }

    pub fn with_guid(hvo: Hvo, guid: Uuid, class_id: ClassId) -> Self {
        Self {
            hvo,
            guid,
            class_id,
            owner: NULL_HVO,
            owning_flid: 0,
            props: BTreeMap::new(),
        }
    }

    pub fn prop(&self, tag: Flid) -> Option<&PropValue> {
        self.props.get(&tag)
    }

    /// Stores `value`, returning the previous one.
    pub fn set_prop(&mut self, tag: Flid, value: PropValue) -> Option<PropValue> {
        self.props.insert(tag, value)
    }

    pub fn remove_prop(&mut self, tag: Flid) -> Option<PropValue> {
        self.props.remove(&tag)
    }

    pub fn is_owned(&self) -> bool {
        self.owner != NULL_HVO
    }

    /// Handles stored in the object's atomic and vector properties.
    pub fn object_handles(&self, tag: Flid) -> Vec<Hvo> {
        self.prop(tag).map(PropValue::object_handles).unwrap_or_default()
    }
}
