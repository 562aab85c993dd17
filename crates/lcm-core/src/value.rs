use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::handle::{Hvo, NULL_HVO};
use crate::kind::PropertyKind;
use crate::text::{MultiString, MultiUnicode, TsString};

/// How exactly a `GenDate` is known.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatePrecision {
    Before,
    #[default]
    Exact,
    Approximate,
    After,
}

/// Calendar date with precision, for dates that are only partly known
/// ("about 1850", "before March 1902").
///
/// Month and day are 1-based; `0` means unknown. A date whose year is `0`
/// is the empty date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenDate {
    pub precision: DatePrecision,
    pub year: u32,
    pub month: u32,
    pub day: u32,
    pub is_ad: bool,
}

impl GenDate {
    pub fn new(precision: DatePrecision, year: u32, month: u32, day: u32, is_ad: bool) -> Option<Self> {
        let date = Self {
            precision,
            year,
            month,
            day,
            is_ad,
        };
        date.is_valid().then_some(date)
    }

    pub fn empty() -> Self {
        Self {
            is_ad: true,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.year == 0
    }

    /// Month in 0..=12 and day within the month's length.
    pub fn is_valid(&self) -> bool {
        if self.is_empty() {
            return self.month == 0 && self.day == 0;
        }
        if self.month > 12 {
            return false;
        }
        if self.day == 0 {
            return true;
        }
        if self.month == 0 {
            return false;
        }
        self.day <= days_in_month(self.year, self.month)
    }

    /// Signed sort key: BC dates sort before AD dates, unknown parts
    /// sort first within their year/month.
    pub fn ordinal(&self) -> i64 {
        let magnitude = (self.year as i64) * 10_000 + (self.month as i64) * 100 + self.day as i64;
        if self.is_ad {
            magnitude
        } else {
            -(self.year as i64) * 10_000 + (self.month as i64) * 100 + self.day as i64
        }
    }
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
            if leap {
                29
            } else {
                28
            }
        }
    }
}

/// A stored property value.
///
/// One variant per value shape; the owning and reference object kinds share
/// `Atomic` and `Vector` since the kind lives in the catalog, not the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropValue {
    Boolean(bool),
    Integer(i32),
    GenDate(GenDate),
    Guid(Uuid),
    Time(DateTime<Utc>),
    Binary(Vec<u8>),
    Unicode(String),
    String(TsString),
    MultiString(MultiString),
    MultiUnicode(MultiUnicode),
    Atomic(Hvo),
    Vector(Vec<Hvo>),
}

impl PropValue {
    /// The "no data yet" value for object kinds and multilingual kinds.
    ///
    /// Scalar kinds have no stored default; readers synthesize one.
    pub fn empty_for(kind: PropertyKind) -> Option<PropValue> {
        match kind {
            PropertyKind::OwningAtomic | PropertyKind::ReferenceAtomic => {
                Some(PropValue::Atomic(NULL_HVO))
            }
            PropertyKind::OwningCollection
            | PropertyKind::ReferenceCollection
            | PropertyKind::OwningSequence
            | PropertyKind::ReferenceSequence => Some(PropValue::Vector(Vec::new())),
            PropertyKind::MultiString => Some(PropValue::MultiString(MultiString::new())),
            PropertyKind::MultiUnicode => Some(PropValue::MultiUnicode(MultiUnicode::new())),
            _ => None,
        }
    }

    /// Whether a value of this shape may be stored under `kind`.
    pub fn fits(&self, kind: PropertyKind) -> bool {
        match (self, kind) {
            (PropValue::Boolean(_), PropertyKind::Boolean)
            | (PropValue::Integer(_), PropertyKind::Integer)
            | (PropValue::GenDate(_), PropertyKind::GenDate)
            | (PropValue::Guid(_), PropertyKind::Guid)
            | (PropValue::Time(_), PropertyKind::Time)
            | (PropValue::Binary(_), PropertyKind::Binary)
            | (PropValue::Unicode(_), PropertyKind::Unicode)
            | (PropValue::String(_), PropertyKind::String)
            | (PropValue::MultiString(_), PropertyKind::MultiString)
            | (PropValue::MultiUnicode(_), PropertyKind::MultiUnicode) => true,
            (PropValue::Atomic(_), k) => k.is_atomic(),
            (PropValue::Vector(_), k) => k.is_vector(),
            _ => false,
        }
    }

    /// Object handles held by an atomic or vector value.
    pub fn object_handles(&self) -> Vec<Hvo> {
        match self {
            PropValue::Atomic(hvo) if *hvo != NULL_HVO => vec![*hvo],
            PropValue::Vector(hvos) => hvos.clone(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gen_date_validation() {
        assert!(GenDate::new(DatePrecision::Exact, 2024, 2, 29, true).is_some());
        assert!(GenDate::new(DatePrecision::Exact, 2023, 2, 29, true).is_none());
        assert!(GenDate::new(DatePrecision::Approximate, 1850, 0, 0, true).is_some());
        assert!(GenDate::new(DatePrecision::Before, 1902, 13, 0, true).is_none());
        assert!(GenDate::new(DatePrecision::Exact, 1900, 0, 5, true).is_none());
        assert!(GenDate::empty().is_empty());
        assert!(GenDate::empty().is_valid());
    }

    #[test]
    fn gen_date_ordering() {
        let bc = GenDate::new(DatePrecision::Exact, 44, 3, 15, false).unwrap();
        let ad = GenDate::new(DatePrecision::Exact, 14, 8, 19, true).unwrap();
        let later = GenDate::new(DatePrecision::After, 14, 9, 0, true).unwrap();
        assert!(bc.ordinal() < ad.ordinal());
        assert!(ad.ordinal() < later.ordinal());
    }

    #[test]
    fn value_fits_kind() {
        assert!(PropValue::Atomic(3).fits(PropertyKind::OwningAtomic));
        assert!(PropValue::Atomic(3).fits(PropertyKind::ReferenceAtomic));
        assert!(!PropValue::Atomic(3).fits(PropertyKind::ReferenceSequence));
        assert!(PropValue::Vector(vec![]).fits(PropertyKind::OwningCollection));
        assert!(!PropValue::Integer(1).fits(PropertyKind::Boolean));
    }

    #[test]
    fn empty_values_for_object_kinds() {
        assert_eq!(
            PropValue::empty_for(PropertyKind::ReferenceSequence),
            Some(PropValue::Vector(vec![]))
        );
        assert_eq!(
            PropValue::empty_for(PropertyKind::OwningAtomic),
            Some(PropValue::Atomic(NULL_HVO))
        );
        assert_eq!(PropValue::empty_for(PropertyKind::Integer), None);
        assert!(PropValue::Atomic(NULL_HVO).object_handles().is_empty());
    }
}
