//! Paragraph-aware behaviour: style inheritance for new paragraphs,
//! bulk paragraph insertion, and moving text between paragraphs with
//! their segment offsets kept in step.

use super::DomainDataByFlid;
use crate::error::{DataError, Result};
use crate::handle::{Flid, Hvo, Ws, NULL_HVO};
use crate::kind::PropertyKind;
use crate::model::{class, flid};
use crate::repository::ObjectRepository;
use crate::text::{TextProps, TsString};
use crate::value::PropValue;

impl<R: ObjectRepository> DomainDataByFlid<R> {
    /// Named style of a paragraph, from its style rules.
    pub fn paragraph_style(&self, para: Hvo) -> Result<Option<String>> {
        Ok(self
            .get_unknown(para, flid::ST_PARA_STYLE_RULES)?
            .and_then(|props| props.named_style))
    }

    /// Gives a new paragraph the style that follows its predecessor's.
    pub(super) fn seed_paragraph_style(&mut self, text: Hvo, para: Hvo, index: usize) -> Result<()> {
        let previous = match index {
            0 => None,
            _ => {
                let prev = self.get_vec_item(text, flid::ST_TEXT_PARAGRAPHS, index - 1)?;
                self.paragraph_style(prev)?
            }
        };
        let style = match previous {
            Some(name) => self.next_style_name(&name).unwrap_or(name),
            None => self.config.text.default_paragraph_style.clone(),
        };
        tracing::trace!("paragraph {} gets style '{}'", para, style);
        self.write_prop(
            para,
            flid::ST_PARA_STYLE_RULES,
            Some(PropValue::Binary(TextProps::with_style(style).to_bytes())),
        )
    }

    /// First live style object with this name, in handle order.
    fn find_style(&self, name: &str) -> Option<Hvo> {
        self.repo.handles().into_iter().find(|hvo| {
            self.repo
                .resolve(*hvo)
                .map(|obj| {
                    self.mdc.is_subclass_of(obj.class_id, class::ST_STYLE)
                        && matches!(
                            obj.prop(flid::ST_STYLE_NAME),
                            Some(PropValue::Unicode(n)) if n == name
                        )
                })
                .unwrap_or(false)
        })
    }

    /// Name of the style declared to follow `name`, if any.
    fn next_style_name(&self, name: &str) -> Option<String> {
        let style = self.find_style(name)?;
        let next = match self.repo.resolve(style).ok()?.prop(flid::ST_STYLE_NEXT) {
            Some(PropValue::Atomic(next)) if *next != NULL_HVO => *next,
            _ => return None,
        };
        match self.repo.resolve(next).ok()?.prop(flid::ST_STYLE_NAME) {
            Some(PropValue::Unicode(next_name)) => Some(next_name.clone()),
            _ => None,
        }
    }

    /// Creates `count` paragraphs right after the one at `index`, each
    /// copying its class and style rules.
    pub fn insert_new(&mut self, owner: Hvo, tag: Flid, index: usize, count: usize) -> Result<Vec<Hvo>> {
        let (obj, def) = self.field(owner, tag)?;
        let holds_paragraphs = def.kind == PropertyKind::OwningSequence
            && def
                .dst_class
                .map(|dst| self.mdc.is_subclass_of(dst, class::ST_PARA))
                .unwrap_or(false);
        if !holds_paragraphs {
            return Err(DataError::NotSupported(
                "insert_new outside a paragraph sequence",
            ));
        }
        let items = obj.object_handles(tag);
        let source = *items.get(index).ok_or(DataError::OutOfRange {
            index,
            size: items.len(),
        })?;
        let source_obj = self.object(source)?;
        let class_id = source_obj.class_id;
        let rules = source_obj.prop(flid::ST_PARA_STYLE_RULES).cloned();
        self.begin_change()?;

        let mut created = Vec::with_capacity(count);
        for offset in 0..count {
            let ord = (index + 1 + offset) as i32;
            let hvo = self.create_object(class_id, owner, tag, ord, false)?;
            if let Some(rules) = &rules {
                self.write_prop(hvo, flid::ST_PARA_STYLE_RULES, Some(rules.clone()))?;
            }
            created.push(hvo);
        }
        Ok(created)
    }

    /// Moves chars `[ich_min, ich_lim)` of one paragraph's contents into
    /// another paragraph at `ich_dest`, keeping run properties.
    ///
    /// Segments of the source that begin at or after `ich_lim` shift left
    /// by the moved length; segments of the destination that begin at or
    /// after `ich_dest` shift right. Segments that begin inside the moved
    /// range leave the source; unless `dst_is_new` they are first copied to
    /// the destination with their free translations. Source text after the
    /// range that such a segment covered folds into the preceding segment.
    #[allow(clippy::too_many_arguments)]
    pub fn move_string(
        &mut self,
        hvo_src: Hvo,
        flid_src: Flid,
        ws_src: Ws,
        ich_min: usize,
        ich_lim: usize,
        hvo_dst: Hvo,
        flid_dst: Flid,
        ws_dst: Ws,
        ich_dest: usize,
        dst_is_new: bool,
    ) -> Result<()> {
        if flid_src != flid::ST_TXT_PARA_CONTENTS || flid_dst != flid::ST_TXT_PARA_CONTENTS {
            return Err(DataError::NotSupported(
                "move_string outside paragraph contents",
            ));
        }
        if ws_src != 0 || ws_dst != 0 {
            return Err(DataError::NotSupported(
                "move_string between multilingual alternatives",
            ));
        }
        if hvo_src == hvo_dst {
            return Err(DataError::NotSupported("move_string within one paragraph"));
        }
        let mut src_text = self.get_string(hvo_src, flid_src)?;
        let mut dst_text = self.get_string(hvo_dst, flid_dst)?;
        let moved = src_text.substring(ich_min..ich_lim)?;
        if ich_dest > dst_text.len() {
            return Err(DataError::OutOfRange {
                index: ich_dest,
                size: dst_text.len(),
            });
        }
        self.begin_change()?;
        let count = ich_lim - ich_min;
        tracing::debug!(
            "move_string {} chars from {} to {} at {}",
            count,
            hvo_src,
            hvo_dst,
            ich_dest
        );

        let gap = TsString::empty(src_text.ws_at(ich_min));
        src_text.replace(ich_min..ich_lim, &gap)?;
        dst_text.insert(ich_dest, &moved)?;
        self.write_prop(hvo_src, flid_src, Some(PropValue::String(src_text)))?;
        self.write_prop(hvo_dst, flid_dst, Some(PropValue::String(dst_text)))?;

        let src_segments = self.segments(hvo_src)?;
        for (seg, begin) in self.segments(hvo_dst)? {
            if begin >= ich_dest {
                self.set_segment_offset(seg, begin + count)?;
            }
        }
        for (seg, begin) in src_segments {
            if (ich_min..ich_lim).contains(&begin) {
                if !dst_is_new {
                    self.copy_segment(seg, hvo_dst, ich_dest + (begin - ich_min))?;
                }
                self.delete_tree(seg)?;
            } else if begin >= ich_lim {
                self.set_segment_offset(seg, begin - count)?;
            }
        }
        Ok(())
    }

    /// Segments of a paragraph with their begin offsets.
    fn segments(&self, para: Hvo) -> Result<Vec<(Hvo, usize)>> {
        self.object(para)?
            .object_handles(flid::ST_TXT_PARA_SEGMENTS)
            .into_iter()
            .map(|seg| {
                let begin = self.get_integer(seg, flid::SEGMENT_BEGIN_OFFSET)?;
                Ok((seg, begin.max(0) as usize))
            })
            .collect()
    }

    fn set_segment_offset(&mut self, seg: Hvo, begin: usize) -> Result<()> {
        self.write_prop(
            seg,
            flid::SEGMENT_BEGIN_OFFSET,
            Some(PropValue::Integer(begin as i32)),
        )
    }

    /// Copies a segment into `para`, keeping the segments ordered by offset.
    fn copy_segment(&mut self, seg: Hvo, para: Hvo, begin: usize) -> Result<Hvo> {
        let position = self
            .segments(para)?
            .iter()
            .take_while(|(_, b)| *b <= begin)
            .count();
        let free = self
            .object(seg)?
            .prop(flid::SEGMENT_FREE_TRANSLATION)
            .cloned();
        let copy = self.create_object(
            class::SEGMENT,
            para,
            flid::ST_TXT_PARA_SEGMENTS,
            position as i32,
            false,
        )?;
        self.set_segment_offset(copy, begin)?;
        if let Some(free) = free {
            self.write_prop(copy, flid::SEGMENT_FREE_TRANSLATION, Some(free))?;
        }
        Ok(copy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AccessorConfig;

    fn text_with_paragraphs(n: usize) -> (DomainDataByFlid, Hvo, Vec<Hvo>) {
        let mut dd = DomainDataByFlid::new(AccessorConfig::default()).unwrap();
        dd.begin_undo_task("Text", "Text").unwrap();
        let text = dd.make_new_object(class::ST_TEXT, NULL_HVO, 0, -1).unwrap();
        let paras = (0..n)
            .map(|_| {
                dd.make_new_object(class::ST_TXT_PARA, text, flid::ST_TEXT_PARAGRAPHS, -1)
                    .unwrap()
            })
            .collect();
        (dd, text, paras)
    }

    #[test]
    fn first_paragraph_gets_default_style() {
        let (dd, _, paras) = text_with_paragraphs(2);
        assert_eq!(dd.paragraph_style(paras[0]).unwrap().as_deref(), Some("Normal"));
        assert_eq!(dd.paragraph_style(paras[1]).unwrap().as_deref(), Some("Normal"));
    }

    #[test]
    fn next_style_follows_stylesheet() {
        let (mut dd, text, paras) = text_with_paragraphs(1);
        let heading = dd.make_new_object(class::ST_STYLE, NULL_HVO, 0, -1).unwrap();
        let body = dd.make_new_object(class::ST_STYLE, NULL_HVO, 0, -1).unwrap();
        dd.set_unicode(heading, flid::ST_STYLE_NAME, "Heading").unwrap();
        dd.set_unicode(body, flid::ST_STYLE_NAME, "Body").unwrap();
        dd.set_object(heading, flid::ST_STYLE_NEXT, body).unwrap();
        dd.set_unknown(paras[0], flid::ST_PARA_STYLE_RULES, &TextProps::with_style("Heading"))
            .unwrap();

        let next = dd
            .make_new_object(class::ST_TXT_PARA, text, flid::ST_TEXT_PARAGRAPHS, -1)
            .unwrap();
        assert_eq!(dd.paragraph_style(next).unwrap().as_deref(), Some("Body"));
    }

    #[test]
    fn insert_new_copies_style() {
        let (mut dd, text, paras) = text_with_paragraphs(2);
        dd.set_unknown(paras[0], flid::ST_PARA_STYLE_RULES, &TextProps::with_style("Quote"))
            .unwrap();
        let created = dd.insert_new(text, flid::ST_TEXT_PARAGRAPHS, 0, 2).unwrap();
        assert_eq!(created.len(), 2);
        assert_eq!(
            dd.vec_prop(text, flid::ST_TEXT_PARAGRAPHS, 4).unwrap(),
            vec![paras[0], created[0], created[1], paras[1]]
        );
        for hvo in created {
            assert_eq!(dd.paragraph_style(hvo).unwrap().as_deref(), Some("Quote"));
        }
    }

    #[test]
    fn insert_new_only_for_paragraphs() {
        let mut dd = DomainDataByFlid::new(AccessorConfig::default()).unwrap();
        dd.begin_undo_task("Entry", "Entry").unwrap();
        let entry = dd.make_new_object(class::LEX_ENTRY, NULL_HVO, 0, -1).unwrap();
        assert!(matches!(
            dd.insert_new(entry, flid::LEX_ENTRY_SENSES, 0, 1),
            Err(DataError::NotSupported(_))
        ));
    }

    #[test]
    fn move_string_carries_runs_and_segments() {
        let (mut dd, _, paras) = text_with_paragraphs(2);
        let vern = dd.writing_system_factory().default_vernacular();
        let tag = flid::ST_TXT_PARA_CONTENTS;
        dd.set_string(paras[0], tag, &TsString::new("Hello world. Bye.", vern))
            .unwrap();
        dd.set_string(paras[1], tag, &TsString::new("Next.", vern))
            .unwrap();
        let seg_tag = flid::ST_TXT_PARA_SEGMENTS;
        let s0 = dd.make_new_object(class::SEGMENT, paras[0], seg_tag, -1).unwrap();
        let s1 = dd.make_new_object(class::SEGMENT, paras[0], seg_tag, -1).unwrap();
        dd.set_integer(s1, flid::SEGMENT_BEGIN_OFFSET, 13).unwrap();
        let t0 = dd.make_new_object(class::SEGMENT, paras[1], seg_tag, -1).unwrap();

        // move "Bye." to the front of the second paragraph
        dd.move_string(paras[0], tag, 0, 13, 17, paras[1], tag, 0, 0, false)
            .unwrap();

        assert_eq!(dd.get_string(paras[0], tag).unwrap().text(), "Hello world. ");
        assert_eq!(dd.get_string(paras[1], tag).unwrap().text(), "Bye.Next.");
        assert_eq!(dd.get_integer(s0, flid::SEGMENT_BEGIN_OFFSET).unwrap(), 0);
        assert_eq!(dd.vec_prop(paras[0], seg_tag, 10).unwrap(), vec![s0]);
        assert!(!dd.is_valid_object(s1));
        assert_eq!(dd.get_integer(t0, flid::SEGMENT_BEGIN_OFFSET).unwrap(), 4);
        let dst_segments = dd.vec_prop(paras[1], seg_tag, 10).unwrap();
        assert_eq!(dst_segments.len(), 2);
        assert_eq!(
            dd.get_integer(dst_segments[0], flid::SEGMENT_BEGIN_OFFSET).unwrap(),
            0
        );
    }

    #[test]
    fn move_string_into_new_paragraph_skips_segments() {
        let (mut dd, _, paras) = text_with_paragraphs(2);
        let vern = dd.writing_system_factory().default_vernacular();
        let tag = flid::ST_TXT_PARA_CONTENTS;
        dd.set_string(paras[0], tag, &TsString::new("One. Two.", vern))
            .unwrap();
        let seg_tag = flid::ST_TXT_PARA_SEGMENTS;
        let s1 = dd.make_new_object(class::SEGMENT, paras[0], seg_tag, -1).unwrap();
        dd.set_integer(s1, flid::SEGMENT_BEGIN_OFFSET, 5).unwrap();

        dd.move_string(paras[0], tag, 0, 5, 9, paras[1], tag, 0, 0, true)
            .unwrap();
        assert_eq!(dd.get_vec_size(paras[1], seg_tag).unwrap(), 0);
        assert_eq!(dd.get_vec_size(paras[0], seg_tag).unwrap(), 0);
        assert_eq!(dd.get_string(paras[1], tag).unwrap().text(), "Two.");
    }

    #[test]
    fn move_string_restrictions() {
        let (mut dd, _, paras) = text_with_paragraphs(2);
        let tag = flid::ST_TXT_PARA_CONTENTS;
        assert!(matches!(
            dd.move_string(paras[0], tag, 0, 0, 0, paras[0], tag, 0, 0, false),
            Err(DataError::NotSupported(_))
        ));
        assert!(matches!(
            dd.move_string(paras[0], tag, 1, 0, 0, paras[1], tag, 0, 0, false),
            Err(DataError::NotSupported(_))
        ));
        assert!(matches!(
            dd.move_string(paras[0], tag, 0, 0, 3, paras[1], tag, 0, 0, false),
            Err(DataError::OutOfRange { .. })
        ));
    }
}
