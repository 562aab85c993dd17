//! Writing system handles and defaulting rules.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::WritingSystemConfig;
use crate::handle::Ws;

/// Which default writing system a string field falls back to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WsRole {
    Analysis,
    Vernacular,
    #[default]
    None,
}

/// Interns writing system identifiers ("en", "fr", "qaa-x-kal") to handles
/// and knows the project's default writing systems.
#[derive(Debug, Clone)]
pub struct WritingSystemManager {
    ids: Vec<String>,
    handles: HashMap<String, Ws>,
    analysis: Ws,
    vernacular: Ws,
    user: Ws,
}

impl WritingSystemManager {
    pub fn new(config: &WritingSystemConfig) -> Self {
        let mut manager = Self {
            ids: Vec::new(),
            handles: HashMap::new(),
            analysis: 0,
            vernacular: 0,
            user: 0,
        };
        manager.user = manager.get_ws_from_str(&config.user);
        manager.analysis = manager.get_ws_from_str(&config.analysis);
        manager.vernacular = manager.get_ws_from_str(&config.vernacular);
        manager
    }

    /// Handle for `id`, registering it on first use. Handles start at 1.
    pub fn get_ws_from_str(&mut self, id: &str) -> Ws {
        if let Some(ws) = self.handles.get(id) {
            return *ws;
        }
        self.ids.push(id.to_string());
        let ws = self.ids.len() as Ws;
        self.handles.insert(id.to_string(), ws);
        ws
    }

    /// Handle for an already registered `id`.
    pub fn lookup(&self, id: &str) -> Option<Ws> {
        self.handles.get(id).copied()
    }

    pub fn get_str_from_ws(&self, ws: Ws) -> Option<&str> {
        if ws < 1 {
            return None;
        }
        self.ids.get((ws - 1) as usize).map(String::as_str)
    }

    pub fn default_analysis(&self) -> Ws {
        self.analysis
    }

    pub fn default_vernacular(&self) -> Ws {
        self.vernacular
    }

    pub fn user_ws(&self) -> Ws {
        self.user
    }

    /// Writing system an unset string of a field with `role` is tagged with.
    pub fn default_for(&self, role: WsRole) -> Ws {
        match role {
            WsRole::Analysis => self.analysis,
            WsRole::Vernacular => self.vernacular,
            WsRole::None => self.user,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
