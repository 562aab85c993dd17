//! Rich (formatted) strings and their multilingual bundles.
//!
//! A `TsString` is a sequence of runs; every run carries the text
//! properties (writing system, named style) that apply to its characters.
//! Offsets are counted in `char`s throughout.
//!
//! # Invariants
//! - A string always has at least one run. Only an empty string may
//!   contain an empty run, so that an empty string still knows its
//!   writing system.
//! - Adjacent runs never carry equal properties; they are merged.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;

use crate::error::{DataError, Result};
use crate::handle::Ws;

/// Properties applied to a run of text.
///
/// Also the value type of "unknown" (opaque) properties such as paragraph
/// style rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextProps {
    pub ws: Ws,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub named_style: Option<String>,
}

impl TextProps {
    pub fn with_ws(ws: Ws) -> Self {
        Self {
            ws,
            named_style: None,
        }
    }

    pub fn with_style(style: impl Into<String>) -> Self {
        Self {
            ws: 0,
            named_style: Some(style.into()),
        }
    }

    /// Encoding used when the props are stored in a Binary field.
    pub fn to_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_default()
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.is_empty() {
            return None;
        }
        serde_json::from_slice(bytes).ok()
    }
}

/// One run of uniformly formatted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TsRun {
    pub text: String,
    pub props: TextProps,
}

impl TsRun {
    fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Rich string: text plus per-run formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawTsString")]
pub struct TsString {
    runs: Vec<TsRun>,
}

/// Wire shape of a `TsString`; normalised on the way in.
#[derive(Deserialize)]
struct RawTsString {
    #[serde(default)]
    runs: Vec<TsRun>,
}

impl From<RawTsString> for TsString {
    fn from(raw: RawTsString) -> Self {
        TsString::from_runs(raw.runs)
    }
}

impl TsString {
    /// Single-run string in one writing system.
    pub fn new(text: impl Into<String>, ws: Ws) -> Self {
        Self::with_props(text, TextProps::with_ws(ws))
    }

    pub fn with_props(text: impl Into<String>, props: TextProps) -> Self {
        Self {
            runs: vec![TsRun {
                text: text.into(),
                props,
            }],
        }
    }

    /// Empty string tagged with `ws`.
    pub fn empty(ws: Ws) -> Self {
        Self::new(String::new(), ws)
    }

    /// Builds a string from runs, merging and dropping empty runs.
    pub fn from_runs(runs: Vec<TsRun>) -> Self {
        let fallback = runs.first().map(|r| r.props.clone()).unwrap_or_default();
        Self::normalized(runs, fallback)
    }

    pub fn runs(&self) -> &[TsRun] {
        &self.runs
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.runs.iter().map(TsRun::char_len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.text.is_empty())
    }

    /// Writing system of the first run.
    pub fn ws(&self) -> Ws {
        self.runs.first().map(|r| r.props.ws).unwrap_or(0)
    }

    /// Properties in effect at `ich`; the end offset reports the last run.
    pub fn props_at(&self, ich: usize) -> &TextProps {
        let mut start = 0;
        for run in &self.runs {
            let end = start + run.char_len();
            if ich < end {
                return &run.props;
            }
            start = end;
        }
        // runs is never empty
        &self.runs[self.runs.len() - 1].props
    }

    pub fn ws_at(&self, ich: usize) -> Ws {
        self.props_at(ich).ws
    }

    /// Copy of the chars in `range`, keeping run properties.
    pub fn substring(&self, range: Range<usize>) -> Result<TsString> {
        self.check_range(&range)?;
        let mut runs = Vec::new();
        let mut start = 0;
        for run in &self.runs {
            let len = run.char_len();
            let end = start + len;
            let lo = range.start.max(start);
            let hi = range.end.min(end);
            if lo < hi {
                runs.push(TsRun {
                    text: char_slice(&run.text, lo - start, hi - start),
                    props: run.props.clone(),
                });
            }
            start = end;
        }
        let fallback = self.props_at(range.start).clone();
        Ok(Self::normalized(runs, fallback))
    }

    /// Replaces the chars in `range` with `replacement`.
    pub fn replace(&mut self, range: Range<usize>, replacement: &TsString) -> Result<()> {
        self.check_range(&range)?;
        let len = self.len();
        let fallback = self.props_at(range.start).clone();
        let left = self.substring(0..range.start)?;
        let right = self.substring(range.end..len)?;
        let mut runs = left.runs;
        runs.extend(replacement.runs.iter().cloned());
        runs.extend(right.runs);
        *self = Self::normalized(runs, fallback);
        Ok(())
    }

    pub fn insert(&mut self, ich: usize, other: &TsString) -> Result<()> {
        self.replace(ich..ich, other)
    }

    pub fn append(&mut self, other: &TsString) {
        let mut runs = std::mem::take(&mut self.runs);
        let fallback = runs.first().map(|r| r.props.clone()).unwrap_or_default();
        runs.extend(other.runs.iter().cloned());
        *self = Self::normalized(runs, fallback);
    }

    fn check_range(&self, range: &Range<usize>) -> Result<()> {
        let size = self.len();
        if range.start > range.end {
            return Err(DataError::OutOfRange {
                index: range.start,
                size: range.end,
            });
        }
        if range.end > size {
            return Err(DataError::OutOfRange {
                index: range.end,
                size,
            });
        }
        Ok(())
    }

    fn normalized(runs: Vec<TsRun>, fallback: TextProps) -> Self {
        let mut merged: Vec<TsRun> = Vec::with_capacity(runs.len());
        for run in runs.into_iter().filter(|r| !r.text.is_empty()) {
            match merged.last_mut() {
                Some(last) if last.props == run.props => last.text.push_str(&run.text),
                _ => merged.push(run),
            }
        }
        if merged.is_empty() {
            merged.push(TsRun {
                text: String::new(),
                props: fallback,
            });
        }
        Self { runs: merged }
    }
}

impl std::fmt::Display for TsString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for run in &self.runs {
            f.write_str(&run.text)?;
        }
        Ok(())
    }
}

fn char_slice(s: &str, start: usize, end: usize) -> String {
    s.chars().skip(start).take(end - start).collect()
}

/// One rich string per writing system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiString {
    alternatives: BTreeMap<Ws, TsString>,
}

impl MultiString {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, ws: Ws) -> Option<&TsString> {
        self.alternatives.get(&ws)
    }

    /// The alternative for `ws`, or an empty string tagged `ws`.
    pub fn get_or_empty(&self, ws: Ws) -> TsString {
        self.get(ws).cloned().unwrap_or_else(|| TsString::empty(ws))
    }

    /// Sets one alternative; an empty value clears the slot.
    pub fn set(&mut self, ws: Ws, value: TsString) {
        if value.is_empty() {
            self.alternatives.remove(&ws);
        } else {
            self.alternatives.insert(ws, value);
        }
    }

    pub fn alternatives(&self) -> impl Iterator<Item = (Ws, &TsString)> {
        self.alternatives.iter().map(|(ws, s)| (*ws, s))
    }

    pub fn writing_systems(&self) -> Vec<Ws> {
        self.alternatives.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.alternatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }
}

/// One plain string per writing system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiUnicode {
    alternatives: BTreeMap<Ws, String>,
}

impl MultiUnicode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, ws: Ws) -> Option<&str> {
        self.alternatives.get(&ws).map(String::as_str)
    }

    pub fn set(&mut self, ws: Ws, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.alternatives.remove(&ws);
        } else {
            self.alternatives.insert(ws, value);
        }
    }

    pub fn alternatives(&self) -> impl Iterator<Item = (Ws, &str)> {
        self.alternatives.iter().map(|(ws, s)| (*ws, s.as_str()))
    }

    pub fn len(&self) -> usize {
        self.alternatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    /// Rich view of the bundle; each alternative becomes a single run.
    pub fn to_multi_string(&self) -> MultiString {
        let mut ms = MultiString::new();
        for (ws, text) in self.alternatives() {
            ms.set(ws, TsString::new(text, ws));
        }
        ms
    }
}
