//! The closed schema shipped with the crate: structured texts, styles, and
//! a small lexicon.
//!
//! Field ids follow the cellar convention `class id * 1000 + n`.

use crate::catalog::{FieldDef, MetaDataCache, CM_OBJECT};
use crate::error::CatalogError;
use crate::kind::PropertyKind;
use crate::ws::WsRole;

/// Class ids.
pub mod class {
    use crate::handle::ClassId;

    pub const CM_POSSIBILITY: ClassId = 7;
    pub const ST_TEXT: ClassId = 14;
    pub const ST_PARA: ClassId = 15;
    pub const ST_TXT_PARA: ClassId = 16;
    pub const ST_STYLE: ClassId = 17;
    pub const CM_TRANSLATION: ClassId = 29;
    pub const SEGMENT: ClassId = 36;
    pub const CM_PICTURE: ClassId = 48;
    pub const LEX_ENTRY: ClassId = 5002;
    pub const LEX_DB: ClassId = 5005;
    pub const LEX_SENSE: ClassId = 5016;
    pub const LEX_ETYMOLOGY: ClassId = 5030;
}

/// Field ids.
pub mod flid {
    use crate::handle::Flid;

    pub const CM_POSSIBILITY_NAME: Flid = 7001;
    pub const CM_POSSIBILITY_ABBREVIATION: Flid = 7002;

    pub const ST_TEXT_PARAGRAPHS: Flid = 14001;

    pub const ST_PARA_STYLE_RULES: Flid = 15002;

    pub const ST_TXT_PARA_CONTENTS: Flid = 16002;
    pub const ST_TXT_PARA_TRANSLATIONS: Flid = 16008;
    pub const ST_TXT_PARA_SEGMENTS: Flid = 16011;

    pub const ST_STYLE_NAME: Flid = 17001;
    pub const ST_STYLE_NEXT: Flid = 17004;
    pub const ST_STYLE_RULES: Flid = 17009;

    pub const CM_TRANSLATION_TRANSLATION: Flid = 29001;

    pub const SEGMENT_BEGIN_OFFSET: Flid = 36001;
    pub const SEGMENT_FREE_TRANSLATION: Flid = 36002;

    pub const CM_PICTURE_DATA: Flid = 48001;

    pub const LEX_ENTRY_LEXEME_FORM: Flid = 5002001;
    pub const LEX_ENTRY_SENSES: Flid = 5002002;
    pub const LEX_ENTRY_MAIN_ENTRIES_OR_SENSES: Flid = 5002003;
    pub const LEX_ENTRY_HOMOGRAPH_NUMBER: Flid = 5002004;
    pub const LEX_ENTRY_DO_NOT_USE_FOR_PARSING: Flid = 5002005;
    pub const LEX_ENTRY_DATE_CREATED: Flid = 5002006;
    pub const LEX_ENTRY_COMMENT: Flid = 5002007;
    pub const LEX_ENTRY_IMPORT_RESIDUE: Flid = 5002008;
    pub const LEX_ENTRY_ETYMOLOGY: Flid = 5002009;

    pub const LEX_DB_ENTRIES: Flid = 5005001;
    pub const LEX_DB_STYLES: Flid = 5005002;

    pub const LEX_SENSE_GLOSS: Flid = 5016001;
    pub const LEX_SENSE_DEFINITION: Flid = 5016002;
    pub const LEX_SENSE_SEMANTIC_DOMAINS: Flid = 5016003;
    pub const LEX_SENSE_SENSES: Flid = 5016004;

    pub const LEX_ETYMOLOGY_FORM: Flid = 5030001;
    pub const LEX_ETYMOLOGY_DATE_ATTESTED: Flid = 5030002;
}

/// Builds the catalog for the standard schema.
pub fn standard_catalog() -> Result<MetaDataCache, CatalogError> {
    use PropertyKind::*;

    let mut mdc = MetaDataCache::new();

    for (id, name, base, is_abstract) in [
        (class::CM_POSSIBILITY, "CmPossibility", CM_OBJECT, false),
        (class::ST_TEXT, "StText", CM_OBJECT, false),
        (class::ST_PARA, "StPara", CM_OBJECT, true),
        (class::ST_TXT_PARA, "StTxtPara", class::ST_PARA, false),
        (class::ST_STYLE, "StStyle", CM_OBJECT, false),
        (class::CM_TRANSLATION, "CmTranslation", CM_OBJECT, false),
        (class::SEGMENT, "Segment", CM_OBJECT, false),
        (class::CM_PICTURE, "CmPicture", CM_OBJECT, false),
        (class::LEX_ENTRY, "LexEntry", CM_OBJECT, false),
        (class::LEX_DB, "LexDb", CM_OBJECT, false),
        (class::LEX_SENSE, "LexSense", CM_OBJECT, false),
        (class::LEX_ETYMOLOGY, "LexEtymology", CM_OBJECT, false),
    ] {
        mdc.register_class(id, name, base, is_abstract)?;
    }

    let fields = [
        FieldDef::new(flid::CM_POSSIBILITY_NAME, class::CM_POSSIBILITY, "Name", MultiUnicode)
            .role(WsRole::Analysis),
        FieldDef::new(
            flid::CM_POSSIBILITY_ABBREVIATION,
            class::CM_POSSIBILITY,
            "Abbreviation",
            MultiUnicode,
        )
        .role(WsRole::Analysis),
        FieldDef::new(flid::ST_TEXT_PARAGRAPHS, class::ST_TEXT, "Paragraphs", OwningSequence)
            .to_class(class::ST_PARA),
        FieldDef::new(flid::ST_PARA_STYLE_RULES, class::ST_PARA, "StyleRules", Binary),
        FieldDef::new(flid::ST_TXT_PARA_CONTENTS, class::ST_TXT_PARA, "Contents", String)
            .role(WsRole::Vernacular),
        FieldDef::new(
            flid::ST_TXT_PARA_TRANSLATIONS,
            class::ST_TXT_PARA,
            "Translations",
            OwningCollection,
        )
        .to_class(class::CM_TRANSLATION),
        FieldDef::new(flid::ST_TXT_PARA_SEGMENTS, class::ST_TXT_PARA, "Segments", OwningSequence)
            .to_class(class::SEGMENT),
        FieldDef::new(flid::ST_STYLE_NAME, class::ST_STYLE, "Name", Unicode),
        FieldDef::new(flid::ST_STYLE_NEXT, class::ST_STYLE, "Next", ReferenceAtomic)
            .to_class(class::ST_STYLE),
        FieldDef::new(flid::ST_STYLE_RULES, class::ST_STYLE, "Rules", Binary),
        FieldDef::new(
            flid::CM_TRANSLATION_TRANSLATION,
            class::CM_TRANSLATION,
            "Translation",
            MultiString,
        )
        .role(WsRole::Analysis),
        FieldDef::new(flid::SEGMENT_BEGIN_OFFSET, class::SEGMENT, "BeginOffset", Integer),
        FieldDef::new(
            flid::SEGMENT_FREE_TRANSLATION,
            class::SEGMENT,
            "FreeTranslation",
            MultiString,
        )
        .role(WsRole::Analysis),
        FieldDef::new(flid::CM_PICTURE_DATA, class::CM_PICTURE, "PictureData", Binary),
        FieldDef::new(flid::LEX_ENTRY_LEXEME_FORM, class::LEX_ENTRY, "LexemeForm", MultiUnicode)
            .role(WsRole::Vernacular),
        FieldDef::new(flid::LEX_ENTRY_SENSES, class::LEX_ENTRY, "Senses", OwningSequence)
            .to_class(class::LEX_SENSE),
        FieldDef::new(
            flid::LEX_ENTRY_MAIN_ENTRIES_OR_SENSES,
            class::LEX_ENTRY,
            "MainEntriesOrSenses",
            ReferenceSequence,
        )
        .to_class(CM_OBJECT),
        FieldDef::new(
            flid::LEX_ENTRY_HOMOGRAPH_NUMBER,
            class::LEX_ENTRY,
            "HomographNumber",
            Integer,
        ),
        FieldDef::new(
            flid::LEX_ENTRY_DO_NOT_USE_FOR_PARSING,
            class::LEX_ENTRY,
            "DoNotUseForParsing",
            Boolean,
        ),
        FieldDef::new(flid::LEX_ENTRY_DATE_CREATED, class::LEX_ENTRY, "DateCreated", Time),
        FieldDef::new(flid::LEX_ENTRY_COMMENT, class::LEX_ENTRY, "Comment", MultiString)
            .role(WsRole::Analysis),
        FieldDef::new(
            flid::LEX_ENTRY_IMPORT_RESIDUE,
            class::LEX_ENTRY,
            "ImportResidue",
            String,
        ),
        FieldDef::new(flid::LEX_ENTRY_ETYMOLOGY, class::LEX_ENTRY, "Etymology", OwningAtomic)
            .to_class(class::LEX_ETYMOLOGY),
        FieldDef::new(flid::LEX_DB_ENTRIES, class::LEX_DB, "Entries", OwningCollection)
            .to_class(class::LEX_ENTRY),
        FieldDef::new(flid::LEX_DB_STYLES, class::LEX_DB, "Styles", OwningCollection)
            .to_class(class::ST_STYLE),
        FieldDef::new(flid::LEX_SENSE_GLOSS, class::LEX_SENSE, "Gloss", MultiUnicode)
            .role(WsRole::Analysis),
        FieldDef::new(flid::LEX_SENSE_DEFINITION, class::LEX_SENSE, "Definition", MultiString)
            .role(WsRole::Analysis),
        FieldDef::new(
            flid::LEX_SENSE_SEMANTIC_DOMAINS,
            class::LEX_SENSE,
            "SemanticDomains",
            ReferenceCollection,
        )
        .to_class(class::CM_POSSIBILITY),
        FieldDef::new(flid::LEX_SENSE_SENSES, class::LEX_SENSE, "Senses", OwningSequence)
            .to_class(class::LEX_SENSE),
        FieldDef::new(flid::LEX_ETYMOLOGY_FORM, class::LEX_ETYMOLOGY, "Form", MultiUnicode)
            .role(WsRole::Vernacular),
        FieldDef::new(
            flid::LEX_ETYMOLOGY_DATE_ATTESTED,
            class::LEX_ETYMOLOGY,
            "DateAttested",
            GenDate,
        ),
    ];
    for def in fields {
        mdc.register_field(def)?;
    }

    Ok(mdc)
}
