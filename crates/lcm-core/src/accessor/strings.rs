//! Rich strings and multilingual alternatives.

use super::DomainDataByFlid;
use crate::error::{DataError, Result};
use crate::handle::{Flid, Hvo, Ws};
use crate::kind::PropertyKind;
use crate::object::DomainObject;
use crate::repository::ObjectRepository;
use crate::text::{MultiString, MultiUnicode, TsString};
use crate::value::PropValue;

impl<R: ObjectRepository> DomainDataByFlid<R> {
    /// Rich string value. An unset value is an empty string in the
    /// field's default writing system.
    pub fn get_string(&self, hvo: Hvo, tag: Flid) -> Result<TsString> {
        let obj = self.field_of_kind(hvo, tag, PropertyKind::String)?;
        match obj.prop(tag) {
            Some(PropValue::String(value)) => Ok(value.clone()),
            _ => {
                let ws = self.wsm.default_for(self.mdc.ws_role_of(tag));
                tracing::trace!("unset string hvo={} tag={}; empty in ws {}", hvo, tag, ws);
                Ok(TsString::empty(ws))
            }
        }
    }

    pub fn set_string(&mut self, hvo: Hvo, tag: Flid, value: &TsString) -> Result<()> {
        self.field_of_kind(hvo, tag, PropertyKind::String)?;
        self.begin_change()?;
        tracing::debug!("set String hvo={} tag={} len={}", hvo, tag, value.len());
        self.write_prop(hvo, tag, Some(PropValue::String(value.clone())))
    }

    fn multi_field(&self, hvo: Hvo, tag: Flid) -> Result<(&DomainObject, PropertyKind)> {
        let (obj, def) = self.field(hvo, tag)?;
        if !def.kind.is_multi() {
            return Err(DataError::kind_mismatch(
                tag,
                def.kind,
                "a multilingual string property",
            ));
        }
        Ok((obj, def.kind))
    }

    /// One alternative of a MultiString or MultiUnicode field. A missing
    /// alternative is an empty string tagged with `ws`.
    pub fn get_multi_string_alt(&self, hvo: Hvo, tag: Flid, ws: Ws) -> Result<TsString> {
        let (obj, _) = self.multi_field(hvo, tag)?;
        Ok(match obj.prop(tag) {
            Some(PropValue::MultiString(ms)) => ms.get_or_empty(ws),
            Some(PropValue::MultiUnicode(mu)) => mu
                .get(ws)
                .map(|text| TsString::new(text, ws))
                .unwrap_or_else(|| TsString::empty(ws)),
            _ => TsString::empty(ws),
        })
    }

    /// Sets one alternative and leaves every other writing system alone.
    /// MultiUnicode fields keep only the plain text.
    pub fn set_multi_string_alt(&mut self, hvo: Hvo, tag: Flid, ws: Ws, value: &TsString) -> Result<()> {
        let (obj, kind) = self.multi_field(hvo, tag)?;
        let updated = match (kind, obj.prop(tag)) {
            (PropertyKind::MultiString, current) => {
                let mut ms = match current {
                    Some(PropValue::MultiString(ms)) => ms.clone(),
                    _ => MultiString::new(),
                };
                ms.set(ws, value.clone());
                PropValue::MultiString(ms)
            }
            (_, current) => {
                let mut mu = match current {
                    Some(PropValue::MultiUnicode(mu)) => mu.clone(),
                    _ => MultiUnicode::new(),
                };
                mu.set(ws, value.text());
                PropValue::MultiUnicode(mu)
            }
        };
        self.begin_change()?;
        tracing::debug!("set {} alt hvo={} tag={} ws={}", kind, hvo, tag, ws);
        self.write_prop(hvo, tag, Some(updated))
    }

    /// Every alternative of a multilingual field.
    pub fn get_multi_string_prop(&self, hvo: Hvo, tag: Flid) -> Result<MultiString> {
        let (obj, _) = self.multi_field(hvo, tag)?;
        Ok(match obj.prop(tag) {
            Some(PropValue::MultiString(ms)) => ms.clone(),
            Some(PropValue::MultiUnicode(mu)) => mu.to_multi_string(),
            _ => MultiString::new(),
        })
    }

    pub fn get_multi_unicode_alt(&self, hvo: Hvo, tag: Flid, ws: Ws) -> Result<String> {
        Ok(self.get_multi_string_alt(hvo, tag, ws)?.text())
    }

    pub fn set_multi_unicode_alt(&mut self, hvo: Hvo, tag: Flid, ws: Ws, text: &str) -> Result<()> {
        self.set_multi_string_alt(hvo, tag, ws, &TsString::new(text, ws))
    }
}
