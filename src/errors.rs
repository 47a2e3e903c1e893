use std::fmt;

use thiserror::Error;

use crate::store::WireValue;

/// One step in a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a field inside a wire document, rendered JSONPath-style
/// (`$`, `$.cadence`, `$.tiers[0].unit_amount`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The document root (`$`).
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns a copy of this path extended by an object key.
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.segments.push(PathSegment::Key(key.into()));
        next
    }

    /// Returns a copy of this path extended by a sequence index.
    pub fn index(&self, index: usize) -> Self {
        let mut next = self.clone();
        next.segments.push(PathSegment::Index(index));
        next
    }

    /// The last object key on the path, if any.
    pub fn last_key(&self) -> Option<&str> {
        self.segments.iter().rev().find_map(|segment| match segment {
            PathSegment::Key(key) => Some(key.as_str()),
            PathSegment::Index(_) => None,
        })
    }

    fn prepend(&mut self, segment: PathSegment) {
        self.segments.insert(0, segment);
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for segment in &self.segments {
            match segment {
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Convenience alias for fallible binding-layer results.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unified error type surfaced by the binding layer.
///
/// Decoding and encoding never fail on unknown keys, enum values or union
/// members. Everything except [`Error::MalformedWireShape`] and
/// [`Error::Serialization`] is produced only by explicit validation.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{path}: unrecognized {enum_name} value {raw}")]
    UnrecognizedEnumValue {
        enum_name: &'static str,
        raw: WireValue,
        path: FieldPath,
    },

    #[error("{path}: unrecognized {union_name} variant {discriminant}")]
    UnrecognizedVariant {
        union_name: &'static str,
        /// Raw discriminant value, `null` when the document carried none.
        discriminant: WireValue,
        path: FieldPath,
    },

    #[error("{path}: missing required field `{key}`")]
    MissingRequiredField { key: String, path: FieldPath },

    #[error("{path}: field is not nullable but holds null")]
    UnexpectedNull { path: FieldPath },

    #[error("{path}: malformed wire shape: expected {expected}, found {found}")]
    MalformedWireShape {
        expected: String,
        found: &'static str,
        path: FieldPath,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn malformed(expected: impl Into<String>, found: &'static str) -> Self {
        Error::MalformedWireShape {
            expected: expected.into(),
            found,
            path: FieldPath::root(),
        }
    }

    /// Location of the offending field, when the error has one.
    pub fn path(&self) -> Option<&FieldPath> {
        match self {
            Error::UnrecognizedEnumValue { path, .. }
            | Error::UnrecognizedVariant { path, .. }
            | Error::MissingRequiredField { path, .. }
            | Error::UnexpectedNull { path }
            | Error::MalformedWireShape { path, .. } => Some(path),
            Error::Serialization(_) => None,
        }
    }

    /// Re-roots an error produced while decoding a child value under `key`.
    pub(crate) fn under_key(self, key: &str) -> Self {
        self.nest(PathSegment::Key(key.to_string()))
    }

    /// Re-roots an error produced while decoding a sequence element.
    pub(crate) fn under_index(self, index: usize) -> Self {
        self.nest(PathSegment::Index(index))
    }

    /// Re-roots an error produced relative to a nested document at `base`.
    pub(crate) fn rebase(mut self, base: &FieldPath) -> Self {
        for segment in base.segments.iter().rev() {
            self = self.nest(segment.clone());
        }
        self
    }

    fn nest(mut self, segment: PathSegment) -> Self {
        match &mut self {
            Error::UnrecognizedEnumValue { path, .. }
            | Error::UnrecognizedVariant { path, .. }
            | Error::MissingRequiredField { path, .. }
            | Error::UnexpectedNull { path }
            | Error::MalformedWireShape { path, .. } => path.prepend(segment),
            Error::Serialization(_) => {}
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_path_renders_json_path_style() {
        let path = FieldPath::root()
            .key("bulk_with_filters_config")
            .key("tiers")
            .index(0)
            .key("unit_amount");
        assert_eq!(
            path.to_string(),
            "$.bulk_with_filters_config.tiers[0].unit_amount"
        );
        assert_eq!(path.last_key(), Some("unit_amount"));
        assert_eq!(FieldPath::root().to_string(), "$");
    }

    #[test]
    fn missing_field_formats_with_path() {
        let err = Error::MissingRequiredField {
            key: "item_id".into(),
            path: FieldPath::root().key("item_id"),
        };
        assert_eq!(err.to_string(), "$.item_id: missing required field `item_id`");
    }

    #[test]
    fn nesting_prepends_segments() {
        let err = Error::malformed("string", "number")
            .under_index(2)
            .under_key("tiers");
        assert_eq!(err.path().map(ToString::to_string).as_deref(), Some("$.tiers[2]"));
        assert_eq!(
            err.to_string(),
            "$.tiers[2]: malformed wire shape: expected string, found number"
        );
    }

    #[test]
    fn unrecognized_enum_value_keeps_raw() {
        let err = Error::UnrecognizedEnumValue {
            enum_name: "Cadence",
            raw: WireValue::from("biannual_xyz"),
            path: FieldPath::root().key("cadence"),
        };
        assert_eq!(
            err.to_string(),
            "$.cadence: unrecognized Cadence value \"biannual_xyz\""
        );
    }
}
