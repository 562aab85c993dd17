//! Scalar properties: booleans, integers, GUIDs, times, dates, plain
//! unicode, binary blobs and opaque text properties.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::DomainDataByFlid;
use crate::error::{DataError, Result};
use crate::handle::{tags, Flid, Hvo, NULL_HVO};
use crate::kind::PropertyKind;
use crate::repository::ObjectRepository;
use crate::text::TextProps;
use crate::value::{GenDate, PropValue};

impl<R: ObjectRepository> DomainDataByFlid<R> {
    fn scalar(&self, hvo: Hvo, tag: Flid, kind: PropertyKind) -> Result<Option<&PropValue>> {
        Ok(self.field_of_kind(hvo, tag, kind)?.prop(tag))
    }

    fn set_scalar(&mut self, hvo: Hvo, tag: Flid, kind: PropertyKind, value: PropValue) -> Result<()> {
        self.field_of_kind(hvo, tag, kind)?;
        if tags::is_reserved(tag) {
            return Err(DataError::kind_mismatch(tag, kind, "a writable property"));
        }
        self.begin_change()?;
        tracing::debug!("set {} hvo={} tag={}", kind, hvo, tag);
        self.write_prop(hvo, tag, Some(value))
    }

    pub fn get_boolean(&self, hvo: Hvo, tag: Flid) -> Result<bool> {
        Ok(matches!(
            self.scalar(hvo, tag, PropertyKind::Boolean)?,
            Some(PropValue::Boolean(true))
        ))
    }

    pub fn set_boolean(&mut self, hvo: Hvo, tag: Flid, value: bool) -> Result<()> {
        self.set_scalar(hvo, tag, PropertyKind::Boolean, PropValue::Boolean(value))
    }

    /// Integer value; unset reads as 0.
    ///
    /// `tags::CLASS` doubles as an existence probe: it yields 0 for a
    /// handle that does not resolve instead of failing.
    pub fn get_integer(&self, hvo: Hvo, tag: Flid) -> Result<i32> {
        match tag {
            tags::CLASS => return Ok(self.object(hvo).map(|obj| obj.class_id).unwrap_or(0)),
            tags::OWN_FLID => return Ok(self.object(hvo)?.owning_flid),
            tags::OWN_ORD => return self.own_ord(hvo),
            _ => {}
        }
        match self.scalar(hvo, tag, PropertyKind::Integer)? {
            Some(PropValue::Integer(n)) => Ok(*n),
            _ => Ok(0),
        }
    }

    pub fn set_integer(&mut self, hvo: Hvo, tag: Flid, value: i32) -> Result<()> {
        self.set_scalar(hvo, tag, PropertyKind::Integer, PropValue::Integer(value))
    }

    /// Position in the owning sequence, or -1 when not held by a sequence.
    fn own_ord(&self, hvo: Hvo) -> Result<i32> {
        let obj = self.object(hvo)?;
        if obj.owner == NULL_HVO {
            return Ok(-1);
        }
        let in_sequence = self
            .mdc
            .kind_of(obj.owning_flid)
            .map(PropertyKind::is_sequence)
            .unwrap_or(false);
        if !in_sequence {
            return Ok(-1);
        }
        let owner = self.object(obj.owner)?;
        Ok(owner
            .object_handles(obj.owning_flid)
            .iter()
            .position(|h| *h == hvo)
            .map(|i| i as i32)
            .unwrap_or(-1))
    }

    /// GUID value; `tags::GUID` yields the object's persistent identity.
    pub fn get_guid(&self, hvo: Hvo, tag: Flid) -> Result<Uuid> {
        if tag == tags::GUID {
            return Ok(self.object(hvo)?.guid);
        }
        match self.scalar(hvo, tag, PropertyKind::Guid)? {
            Some(PropValue::Guid(guid)) => Ok(*guid),
            _ => Ok(Uuid::nil()),
        }
    }

    pub fn set_guid(&mut self, hvo: Hvo, tag: Flid, value: Uuid) -> Result<()> {
        self.set_scalar(hvo, tag, PropertyKind::Guid, PropValue::Guid(value))
    }

    pub fn get_time(&self, hvo: Hvo, tag: Flid) -> Result<Option<DateTime<Utc>>> {
        match self.scalar(hvo, tag, PropertyKind::Time)? {
            Some(PropValue::Time(time)) => Ok(Some(*time)),
            _ => Ok(None),
        }
    }

    pub fn set_time(&mut self, hvo: Hvo, tag: Flid, value: DateTime<Utc>) -> Result<()> {
        self.set_scalar(hvo, tag, PropertyKind::Time, PropValue::Time(value))
    }

    pub fn get_gen_date(&self, hvo: Hvo, tag: Flid) -> Result<GenDate> {
        match self.scalar(hvo, tag, PropertyKind::GenDate)? {
            Some(PropValue::GenDate(date)) => Ok(*date),
            _ => Ok(GenDate::empty()),
        }
    }

    pub fn set_gen_date(&mut self, hvo: Hvo, tag: Flid, value: GenDate) -> Result<()> {
        self.set_scalar(hvo, tag, PropertyKind::GenDate, PropValue::GenDate(value))
    }

    pub fn get_unicode(&self, hvo: Hvo, tag: Flid) -> Result<String> {
        match self.scalar(hvo, tag, PropertyKind::Unicode)? {
            Some(PropValue::Unicode(text)) => Ok(text.clone()),
            _ => Ok(String::new()),
        }
    }

    pub fn set_unicode(&mut self, hvo: Hvo, tag: Flid, value: &str) -> Result<()> {
        self.set_scalar(
            hvo,
            tag,
            PropertyKind::Unicode,
            PropValue::Unicode(value.to_string()),
        )
    }

    /// Copies the UTF-8 text into `buf` and returns the number of bytes
    /// the value needs. An empty `buf` only probes the size.
    pub fn copy_unicode(&self, hvo: Hvo, tag: Flid, buf: &mut [u8]) -> Result<usize> {
        let text = self.get_unicode(hvo, tag)?;
        copy_into(text.as_bytes(), buf)
    }

    pub fn get_binary(&self, hvo: Hvo, tag: Flid) -> Result<Vec<u8>> {
        match self.scalar(hvo, tag, PropertyKind::Binary)? {
            Some(PropValue::Binary(bytes)) => Ok(bytes.clone()),
            _ => Ok(Vec::new()),
        }
    }

    pub fn set_binary(&mut self, hvo: Hvo, tag: Flid, value: &[u8]) -> Result<()> {
        self.set_scalar(
            hvo,
            tag,
            PropertyKind::Binary,
            PropValue::Binary(value.to_vec()),
        )
    }

    /// Same buffer convention as `copy_unicode`.
    pub fn copy_binary(&self, hvo: Hvo, tag: Flid, buf: &mut [u8]) -> Result<usize> {
        let bytes = self.get_binary(hvo, tag)?;
        copy_into(&bytes, buf)
    }

    /// Opaque text properties stored in a Binary field (paragraph style
    /// rules, style definitions). `None` when unset or undecodable.
    pub fn get_unknown(&self, hvo: Hvo, tag: Flid) -> Result<Option<TextProps>> {
        let bytes = self.get_binary(hvo, tag)?;
        Ok(TextProps::from_bytes(&bytes))
    }

    pub fn set_unknown(&mut self, hvo: Hvo, tag: Flid, value: &TextProps) -> Result<()> {
        self.set_binary(hvo, tag, &value.to_bytes())
    }

    pub fn get_int64(&self, _hvo: Hvo, _tag: Flid) -> Result<i64> {
        Err(DataError::NotSupported("64-bit integer properties"))
    }

    pub fn set_int64(&mut self, _hvo: Hvo, _tag: Flid, _value: i64) -> Result<()> {
        Err(DataError::NotSupported("64-bit integer properties"))
    }

    pub fn get_rel_extra(&self, _hvo: Hvo, _tag: Flid, _ihvo: usize) -> Result<String> {
        Err(DataError::NotSupported("relation extra data"))
    }

    pub fn set_rel_extra(&mut self, _hvo: Hvo, _tag: Flid, _ihvo: usize, _extra: &str) -> Result<()> {
        Err(DataError::NotSupported("relation extra data"))
    }

    pub fn is_dirty(&self) -> Result<bool> {
        Err(DataError::NotSupported("dirty tracking"))
    }

    pub fn set_dirty(&mut self, _dirty: bool) -> Result<()> {
        Err(DataError::NotSupported("dirty tracking"))
    }
}

fn copy_into(value: &[u8], buf: &mut [u8]) -> Result<usize> {
    let required = value.len();
    if buf.is_empty() {
        return Ok(required);
    }
    if buf.len() < required {
        return Err(DataError::BufferTooSmall {
            required,
            capacity: buf.len(),
        });
    }
    buf[..required].copy_from_slice(value);
    Ok(required)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AccessorConfig;
    use crate::model::{class, flid};
    use crate::value::DatePrecision;

    fn with_entry() -> (DomainDataByFlid, Hvo) {
        let mut dd = DomainDataByFlid::new(AccessorConfig::default()).unwrap();
        dd.begin_undo_task("Create", "Create").unwrap();
        let entry = dd.make_new_object(class::LEX_ENTRY, NULL_HVO, 0, -1).unwrap();
        dd.end_undo_task().unwrap();
        (dd, entry)
    }

    #[test]
    fn unset_scalars_read_as_defaults() {
        let (dd, entry) = with_entry();
        assert_eq!(dd.get_integer(entry, flid::LEX_ENTRY_HOMOGRAPH_NUMBER).unwrap(), 0);
        assert!(!dd.get_boolean(entry, flid::LEX_ENTRY_DO_NOT_USE_FOR_PARSING).unwrap());
        assert!(dd.get_time(entry, flid::LEX_ENTRY_DATE_CREATED).unwrap().is_some());
    }

    #[test]
    fn scalar_set_and_get() {
        let (mut dd, entry) = with_entry();
        dd.begin_undo_task("Edit", "Edit").unwrap();
        dd.set_integer(entry, flid::LEX_ENTRY_HOMOGRAPH_NUMBER, 3).unwrap();
        dd.set_boolean(entry, flid::LEX_ENTRY_DO_NOT_USE_FOR_PARSING, true)
            .unwrap();
        dd.end_undo_task().unwrap();

        assert_eq!(dd.get_integer(entry, flid::LEX_ENTRY_HOMOGRAPH_NUMBER).unwrap(), 3);
        assert!(dd.get_boolean(entry, flid::LEX_ENTRY_DO_NOT_USE_FOR_PARSING).unwrap());
    }

    #[test]
    fn kind_mismatch_is_reported() {
        let (dd, entry) = with_entry();
        let err = dd.get_boolean(entry, flid::LEX_ENTRY_HOMOGRAPH_NUMBER).unwrap_err();
        assert!(matches!(
            err,
            DataError::KindMismatch {
                kind: PropertyKind::Integer,
                ..
            }
        ));
    }

    #[test]
    fn reserved_tags() {
        let (dd, entry) = with_entry();
        assert_eq!(dd.get_integer(entry, tags::CLASS).unwrap(), class::LEX_ENTRY);
        assert_eq!(dd.get_integer(9999, tags::CLASS).unwrap(), 0);
        assert_eq!(dd.get_integer(entry, tags::OWN_ORD).unwrap(), -1);
        assert_eq!(dd.get_integer(entry, tags::OWN_FLID).unwrap(), 0);
        assert_ne!(dd.get_guid(entry, tags::GUID).unwrap(), Uuid::nil());
    }

    #[test]
    fn reserved_tags_are_read_only() {
        let (mut dd, entry) = with_entry();
        dd.begin_undo_task("Edit", "Edit").unwrap();
        assert!(matches!(
            dd.set_integer(entry, tags::CLASS, 7),
            Err(DataError::KindMismatch { .. })
        ));
        dd.end_undo_task().unwrap();
    }

    #[test]
    fn buffer_convention() {
        let mut dd = DomainDataByFlid::new(AccessorConfig::default()).unwrap();
        dd.begin_undo_task("Style", "Style").unwrap();
        let style = dd.make_new_object(class::ST_STYLE, NULL_HVO, 0, -1).unwrap();
        dd.set_unicode(style, flid::ST_STYLE_NAME, "Heading").unwrap();
        dd.end_undo_task().unwrap();

        assert_eq!(dd.copy_unicode(style, flid::ST_STYLE_NAME, &mut []).unwrap(), 7);
        let mut small = [0u8; 3];
        assert_eq!(
            dd.copy_unicode(style, flid::ST_STYLE_NAME, &mut small).unwrap_err(),
            DataError::BufferTooSmall {
                required: 7,
                capacity: 3
            }
        );
        let mut buf = [0u8; 16];
        let n = dd.copy_unicode(style, flid::ST_STYLE_NAME, &mut buf).unwrap();
        assert_eq!(&buf[..n], b"Heading");
    }

    #[test]
    fn gen_date_and_unknown() {
        let mut dd = DomainDataByFlid::new(AccessorConfig::default()).unwrap();
        dd.begin_undo_task("Create", "Create").unwrap();
        let ety = dd
            .make_new_object(class::LEX_ETYMOLOGY, NULL_HVO, 0, -1)
            .unwrap();
        let para = dd
            .make_new_object(class::ST_TXT_PARA, NULL_HVO, 0, -1)
            .unwrap();
        let date = GenDate::new(DatePrecision::Approximate, 1850, 3, 0, true).unwrap();
        dd.set_gen_date(ety, flid::LEX_ETYMOLOGY_DATE_ATTESTED, date).unwrap();
        dd.set_unknown(para, flid::ST_PARA_STYLE_RULES, &TextProps::with_style("Quote"))
            .unwrap();
        dd.end_undo_task().unwrap();

        assert_eq!(dd.get_gen_date(ety, flid::LEX_ETYMOLOGY_DATE_ATTESTED).unwrap(), date);
        assert_eq!(
            dd.get_unknown(para, flid::ST_PARA_STYLE_RULES)
                .unwrap()
                .and_then(|p| p.named_style),
            Some("Quote".to_string())
        );
    }

    #[test]
    fn unsupported_operations() {
        let (mut dd, entry) = with_entry();
        assert!(matches!(dd.get_int64(entry, 1), Err(DataError::NotSupported(_))));
        assert!(matches!(dd.set_int64(entry, 1, 5), Err(DataError::NotSupported(_))));
        assert!(matches!(dd.get_rel_extra(entry, 1, 0), Err(DataError::NotSupported(_))));
        assert!(matches!(dd.is_dirty(), Err(DataError::NotSupported(_))));
        assert!(matches!(dd.set_dirty(true), Err(DataError::NotSupported(_))));
    }
}
