use serde::{Deserialize, Serialize};

/// The closed set of property kinds a field can declare.
///
/// Numeric codes match the cellar property type codes so that a model
/// description can refer to kinds either by name or by number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyKind {
    Boolean,
    Integer,
    Time,
    Guid,
    GenDate,
    Binary,
    String,
    MultiString,
    Unicode,
    MultiUnicode,
    OwningAtomic,
    ReferenceAtomic,
    OwningCollection,
    ReferenceCollection,
    OwningSequence,
    ReferenceSequence,
}

impl PropertyKind {
    pub const ALL: [PropertyKind; 16] = [
        PropertyKind::Boolean,
        PropertyKind::Integer,
        PropertyKind::Time,
        PropertyKind::Guid,
        PropertyKind::GenDate,
        PropertyKind::Binary,
        PropertyKind::String,
        PropertyKind::MultiString,
        PropertyKind::Unicode,
        PropertyKind::MultiUnicode,
        PropertyKind::OwningAtomic,
        PropertyKind::ReferenceAtomic,
        PropertyKind::OwningCollection,
        PropertyKind::ReferenceCollection,
        PropertyKind::OwningSequence,
        PropertyKind::ReferenceSequence,
    ];

    /// Cellar type code.
    pub fn code(self) -> i32 {
        match self {
            PropertyKind::Boolean => 1,
            PropertyKind::Integer => 2,
            PropertyKind::Time => 5,
            PropertyKind::Guid => 6,
            PropertyKind::GenDate => 8,
            PropertyKind::Binary => 9,
            PropertyKind::String => 13,
            PropertyKind::MultiString => 14,
            PropertyKind::Unicode => 15,
            PropertyKind::MultiUnicode => 16,
            PropertyKind::OwningAtomic => 23,
            PropertyKind::ReferenceAtomic => 24,
            PropertyKind::OwningCollection => 25,
            PropertyKind::ReferenceCollection => 26,
            PropertyKind::OwningSequence => 27,
            PropertyKind::ReferenceSequence => 28,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.code() == code)
    }

    /// Owning or reference property of any arity.
    pub fn is_object(self) -> bool {
        self.is_owning() || self.is_reference()
    }

    pub fn is_owning(self) -> bool {
        matches!(
            self,
            PropertyKind::OwningAtomic
                | PropertyKind::OwningCollection
                | PropertyKind::OwningSequence
        )
    }

    pub fn is_reference(self) -> bool {
        matches!(
            self,
            PropertyKind::ReferenceAtomic
                | PropertyKind::ReferenceCollection
                | PropertyKind::ReferenceSequence
        )
    }

    /// Single-slot object property.
    pub fn is_atomic(self) -> bool {
        matches!(
            self,
            PropertyKind::OwningAtomic | PropertyKind::ReferenceAtomic
        )
    }

    /// Collection or sequence.
    pub fn is_vector(self) -> bool {
        self.is_object() && !self.is_atomic()
    }

    pub fn is_sequence(self) -> bool {
        matches!(
            self,
            PropertyKind::OwningSequence | PropertyKind::ReferenceSequence
        )
    }

    pub fn is_collection(self) -> bool {
        matches!(
            self,
            PropertyKind::OwningCollection | PropertyKind::ReferenceCollection
        )
    }

    /// One value per writing system.
    pub fn is_multi(self) -> bool {
        matches!(self, PropertyKind::MultiString | PropertyKind::MultiUnicode)
    }

    pub fn name(self) -> &'static str {
        match self {
            PropertyKind::Boolean => "Boolean",
            PropertyKind::Integer => "Integer",
            PropertyKind::Time => "Time",
            PropertyKind::Guid => "Guid",
            PropertyKind::GenDate => "GenDate",
            PropertyKind::Binary => "Binary",
            PropertyKind::String => "String",
            PropertyKind::MultiString => "MultiString",
            PropertyKind::Unicode => "Unicode",
            PropertyKind::MultiUnicode => "MultiUnicode",
            PropertyKind::OwningAtomic => "OwningAtomic",
            PropertyKind::ReferenceAtomic => "ReferenceAtomic",
            PropertyKind::OwningCollection => "OwningCollection",
            PropertyKind::ReferenceCollection => "ReferenceCollection",
            PropertyKind::OwningSequence => "OwningSequence",
            PropertyKind::ReferenceSequence => "ReferenceSequence",
        }
    }
}

impl std::fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_unique_and_reversible() {
        for kind in PropertyKind::ALL {
            assert_eq!(PropertyKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(PropertyKind::from_code(3), None);
    }

    #[test]
    fn object_kind_classification() {
        let vectors: Vec<_> = PropertyKind::ALL
            .iter()
            .filter(|k| k.is_vector())
            .collect();
        assert_eq!(vectors.len(), 4);
        assert!(PropertyKind::OwningAtomic.is_atomic());
        assert!(PropertyKind::OwningAtomic.is_owning());
        assert!(!PropertyKind::OwningAtomic.is_vector());
        assert!(PropertyKind::ReferenceCollection.is_reference());
        assert!(!PropertyKind::ReferenceCollection.is_sequence());
        assert!(!PropertyKind::MultiString.is_object());
        assert!(PropertyKind::MultiUnicode.is_multi());
    }

    #[test]
    fn kind_serde_round_trip() {
        for kind in PropertyKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            let back: PropertyKind = serde_json::from_str(&json).unwrap();
            assert_eq!(kind, back);
        }
    }
}
