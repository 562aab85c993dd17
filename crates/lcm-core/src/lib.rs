//! lcm-core: field-id indexed access to an in-memory lexicon object graph.
//!
//! Objects are addressed by session handle (`Hvo`) and their properties by
//! field id (`Flid`). The meta-data catalog says which fields each class
//! declares and what kind each field has; `DomainDataByFlid` reads and
//! writes values through that catalog, records every change on a nestable
//! undo stack, and keeps ownership and references consistent when objects
//! are created, moved or deleted.

pub mod accessor;
pub mod catalog;
pub mod config;
pub mod error;
pub mod factory;
pub mod handle;
pub mod kind;
pub mod model;
pub mod notify;
pub mod object;
pub mod repository;
pub mod text;
pub mod undo;
pub mod value;
pub mod ws;

pub use accessor::DomainDataByFlid;
pub use catalog::{ClassDef, FieldDef, MetaDataCache, CM_OBJECT};
pub use config::{AccessorConfig, ConfigError, TextConfig, UndoConfig, WritingSystemConfig};
pub use error::{CatalogError, DataError, Result};
pub use factory::{Constructor, ObjectFactory};
pub use handle::*;
pub use kind::PropertyKind;
pub use model::standard_catalog;
pub use notify::{NotifierRegistry, PropChangeListener};
pub use object::DomainObject;
pub use repository::{MemoryRepository, ObjectRepository};
pub use text::{MultiString, MultiUnicode, TextProps, TsRun, TsString};
pub use undo::{Change, TaskMode, UndoStack, UndoTask};
pub use value::{DatePrecision, GenDate, PropValue};
pub use ws::{WritingSystemManager, WsRole};
