//! Per-model backing store of raw wire values.
//!
//! Every model owns exactly one [`FieldStore`]. Typed accessors read from it
//! and write into it; nothing is cached beside it, so equality of two models
//! is equality of their stores.

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// A JSON-like wire value: null, boolean, number, string, sequence or map.
pub type WireValue = serde_json::Value;

/// An ordered mapping from key to [`WireValue`], as produced by the parser.
pub type RawDocument = serde_json::Map<String, WireValue>;

/// Tri-state read of a single key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldState<'a> {
    Absent,
    PresentNull,
    PresentValue(&'a WireValue),
}

impl<'a> FieldState<'a> {
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldState::Absent)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldState::PresentNull)
    }

    /// The non-null value, if any.
    pub fn value(&self) -> Option<&'a WireValue> {
        match self {
            FieldState::PresentValue(value) => Some(value),
            FieldState::Absent | FieldState::PresentNull => None,
        }
    }
}

/// Name of the wire kind of `value`, used in shape errors.
pub fn wire_kind(value: &WireValue) -> &'static str {
    match value {
        WireValue::Null => "null",
        WireValue::Bool(_) => "boolean",
        WireValue::Number(_) => "number",
        WireValue::String(_) => "string",
        WireValue::Array(_) => "array",
        WireValue::Object(_) => "object",
    }
}

/// Ordered raw field store backing a model.
///
/// `unset` removes a key entirely while `set_null` keeps it with an explicit
/// null; the two states survive serialization unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldStore {
    doc: RawDocument,
}

impl FieldStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopts a parsed document verbatim, unknown keys included.
    pub fn from_document(doc: RawDocument) -> Self {
        Self { doc }
    }

    /// Adopts a parsed value, which must be a map.
    pub fn from_value(value: WireValue) -> Result<Self> {
        match value {
            WireValue::Object(doc) => Ok(Self::from_document(doc)),
            other => Err(Error::malformed("object", wire_kind(&other))),
        }
    }

    pub fn get(&self, key: &str) -> FieldState<'_> {
        match self.doc.get(key) {
            None => FieldState::Absent,
            Some(WireValue::Null) => FieldState::PresentNull,
            Some(value) => FieldState::PresentValue(value),
        }
    }

    /// Writes `value` under `key`. An existing key keeps its position.
    pub fn set_value(&mut self, key: impl Into<String>, value: impl Into<WireValue>) {
        self.doc.insert(key.into(), value.into());
    }

    /// Writes an explicit null under `key`.
    pub fn set_null(&mut self, key: impl Into<String>) {
        self.doc.insert(key.into(), WireValue::Null);
    }

    /// Removes `key`, keeping the order of the remaining keys.
    pub fn unset(&mut self, key: &str) -> Option<WireValue> {
        self.doc.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.doc.contains_key(key)
    }

    /// Keys in parse/insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.doc.keys().map(String::as_str)
    }

    /// Keys not named in `declared`, in store order.
    pub fn extra_keys<'a>(&'a self, declared: &'a [&'a str]) -> impl Iterator<Item = &'a str> + 'a {
        self.keys().filter(move |key| !declared.contains(key))
    }

    pub fn len(&self) -> usize {
        self.doc.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc.is_empty()
    }

    pub fn as_document(&self) -> &RawDocument {
        &self.doc
    }

    pub fn into_document(self) -> RawDocument {
        self.doc
    }

    pub fn to_value(&self) -> WireValue {
        WireValue::Object(self.doc.clone())
    }

    pub fn into_value(self) -> WireValue {
        WireValue::Object(self.doc)
    }
}

impl From<RawDocument> for FieldStore {
    fn from(doc: RawDocument) -> Self {
        Self::from_document(doc)
    }
}

impl From<FieldStore> for WireValue {
    fn from(store: FieldStore) -> Self {
        store.into_value()
    }
}
